//! Catalog commit router: sends each approved draft to the catalog of its kind.

use std::sync::Arc;

use pipeline::{
    CatalogError, ContentKind, MachineryCatalog, MachineryRecord, TrainingCatalog,
    TrainingModuleRecord, ValidatedDraft,
};
use serde::Serialize;
use tracing::{info, instrument};

/// The record a catalog created for a committed draft.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommitReceipt {
    Machinery(MachineryRecord),
    Training(TrainingModuleRecord),
}

impl CommitReceipt {
    /// The catalog that accepted the record.
    pub fn kind(&self) -> ContentKind {
        match self {
            CommitReceipt::Machinery(_) => ContentKind::Machinery,
            CommitReceipt::Training(_) => ContentKind::Training,
        }
    }

    /// The catalog-assigned identifier.
    pub fn id(&self) -> u64 {
        match self {
            CommitReceipt::Machinery(r) => r.id.as_u64(),
            CommitReceipt::Training(r) => r.id.as_u64(),
        }
    }
}

/// Dispatches drafts to the machinery or training catalog.
///
/// Routing is by the draft's own variant, so a machinery draft can only ever
/// reach [`MachineryCatalog::insert`] and a training draft only
/// [`TrainingCatalog::insert`].
#[derive(Clone)]
pub struct CommitRouter {
    machinery: Arc<dyn MachineryCatalog>,
    training: Arc<dyn TrainingCatalog>,
}

impl CommitRouter {
    pub fn new(machinery: Arc<dyn MachineryCatalog>, training: Arc<dyn TrainingCatalog>) -> Self {
        Self {
            machinery,
            training,
        }
    }

    /// Hands `draft` to its catalog. The router keeps no reference afterwards.
    #[instrument(skip_all, fields(kind = %draft.kind(), label = %draft.label()))]
    pub async fn commit(&self, draft: ValidatedDraft) -> Result<CommitReceipt, CatalogError> {
        let receipt = match draft {
            ValidatedDraft::Machinery(d) => CommitReceipt::Machinery(self.machinery.insert(d).await?),
            ValidatedDraft::Training(d) => CommitReceipt::Training(self.training.insert(d).await?),
        };
        info!(id = receipt.id(), "draft committed");
        Ok(receipt)
    }

    /// Machinery catalog this router commits to.
    pub fn machinery(&self) -> &Arc<dyn MachineryCatalog> {
        &self.machinery
    }

    /// Training catalog this router commits to.
    pub fn training(&self) -> &Arc<dyn TrainingCatalog> {
        &self.training
    }
}
