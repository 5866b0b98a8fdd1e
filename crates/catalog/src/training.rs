//! Training module catalog.

use std::path::PathBuf;

use async_trait::async_trait;
use pipeline::{CatalogError, TrainingCatalog, TrainingDraft, TrainingModuleId, TrainingModuleRecord};
use tracing::{info, instrument};

use crate::collection::Collection;

/// Training modules, in memory or backed by a JSON file.
///
/// Only the identifier is derived: one greater than the largest existing one.
pub struct TrainingStore {
    records: Collection<TrainingModuleRecord>,
}

impl TrainingStore {
    pub fn in_memory() -> Self {
        Self {
            records: Collection::in_memory(Vec::new()),
        }
    }

    pub async fn open(file: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        Ok(Self {
            records: Collection::open(file).await?,
        })
    }
}

#[async_trait]
impl TrainingCatalog for TrainingStore {
    #[instrument(skip_all, fields(title = %draft.title))]
    async fn insert(&self, draft: TrainingDraft) -> Result<TrainingModuleRecord, CatalogError> {
        let record = self
            .records
            .append_with(|existing| {
                let id = existing
                    .iter()
                    .map(|r| r.id)
                    .max()
                    .map_or(TrainingModuleId::new(1), TrainingModuleId::next);
                TrainingModuleRecord { id, draft }
            })
            .await?;
        info!(id = %record.id, "training module added");
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<TrainingModuleRecord>, CatalogError> {
        let mut records = self.records.snapshot().await;
        records.sort_by_key(|r| r.id);
        Ok(records)
    }
}
