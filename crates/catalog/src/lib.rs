//! Agrirent catalog adapter.
//!
//! Implements [`pipeline::MachineryCatalog`] and [`pipeline::TrainingCatalog`]
//! either purely in memory or mirrored to one JSON file per collection in a
//! data directory.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Identifier assignment, derived-field defaults, and file
//! persistence live here. The [`pipeline`] crate sees only the two catalog
//! traits and the records they return.

use std::path::Path;

use pipeline::{CatalogError, ListingOwner};

mod collection;
mod machinery;
mod training;

pub use machinery::MachineryStore;
pub use training::TrainingStore;

/// File name of the machinery collection inside a data directory.
pub const MACHINERY_FILE: &str = "machinery.json";
/// File name of the training collection inside a data directory.
pub const TRAINING_FILE: &str = "training.json";

/// Opens both JSON-backed catalogs under `data_dir`.
pub async fn open_catalogs(
    data_dir: &Path,
    owner: ListingOwner,
) -> Result<(MachineryStore, TrainingStore), CatalogError> {
    let machinery = MachineryStore::open(data_dir.join(MACHINERY_FILE), owner).await?;
    let training = TrainingStore::open(data_dir.join(TRAINING_FILE)).await?;
    Ok((machinery, training))
}
