//! Machinery catalog.

use std::path::PathBuf;

use async_trait::async_trait;
use pipeline::{
    CatalogError, ListingOwner, MachineryCatalog, MachineryDraft, MachineryId, MachineryRecord,
};
use tracing::{info, instrument};

use crate::collection::Collection;

/// Machinery listings, in memory or backed by a JSON file.
///
/// Derived fields are filled by a fixed policy:
///
/// - `id`: one greater than the largest existing identifier (first is 1);
/// - `owner`, `phone`, `address`: copied from the configured [`ListingOwner`];
/// - `rating`: `None` (unrated until a renter reviews it);
/// - `distance_km`: `None` (distance depends on the viewing renter).
pub struct MachineryStore {
    records: Collection<MachineryRecord>,
    owner: ListingOwner,
}

impl MachineryStore {
    /// An empty in-memory catalog.
    pub fn in_memory(owner: ListingOwner) -> Self {
        Self::with_records(owner, Vec::new())
    }

    /// An in-memory catalog seeded with `records`.
    pub fn with_records(owner: ListingOwner, records: Vec<MachineryRecord>) -> Self {
        Self {
            records: Collection::in_memory(records),
            owner,
        }
    }

    /// Opens (or prepares to create) a catalog stored at `file`.
    pub async fn open(file: impl Into<PathBuf>, owner: ListingOwner) -> Result<Self, CatalogError> {
        Ok(Self {
            records: Collection::open(file).await?,
            owner,
        })
    }

    fn build_record(&self, existing: &[MachineryRecord], draft: MachineryDraft) -> MachineryRecord {
        let id = existing
            .iter()
            .map(|r| r.id)
            .max()
            .map_or(MachineryId::new(1), MachineryId::next);
        MachineryRecord {
            id,
            draft,
            rating: None,
            distance_km: None,
            owner: self.owner.name.clone(),
            phone: self.owner.phone.clone(),
            address: self.owner.address.clone(),
        }
    }
}

#[async_trait]
impl MachineryCatalog for MachineryStore {
    #[instrument(skip_all, fields(name = %draft.name))]
    async fn insert(&self, draft: MachineryDraft) -> Result<MachineryRecord, CatalogError> {
        let record = self
            .records
            .append_with(|existing| self.build_record(existing, draft))
            .await?;
        info!(id = %record.id, "machinery listing added");
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<MachineryRecord>, CatalogError> {
        let mut records = self.records.snapshot().await;
        records.sort_by_key(|r| r.id);
        Ok(records)
    }
}
