//! Core domain for the Agrirent AI content assistant.
//!
//! The assistant turns free-text operator intent into catalog content: it asks
//! an external model for a schema-constrained JSON object, validates the
//! result, stages it for human review, and only then hands it to the machinery
//! or training catalog. This crate holds every piece of that flow that needs no
//! I/O, plus the port traits infrastructure crates implement.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`RequestId`, `MachineryId`, `TrainingModuleId`) |
//! | [`types`] | Value types (`ContentKind`, `Prompt`, enumerated value sets, `Timestamp`) |
//! | [`drafts`] | Validated drafts and the committed records catalogs create from them |
//! | [`schema`] | Schema registry and system instructions, one per kind |
//! | [`validator`] | Raw model text → `ValidatedDraft` or a typed rejection |
//! | [`staging`] | The single-slot pending-draft store |
//! | [`ports`] | `GenerationClient`, `MachineryCatalog`, `TrainingCatalog` traits |
//! | [`errors`] | `PipelineError` and `RetryPolicy` |

pub mod drafts;
pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod schema;
pub mod staging;
pub mod types;
pub mod validator;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use drafts::{
    ListingOwner, MachineryDraft, MachineryRecord, ResourceLink, TrainingContent, TrainingDraft,
    TrainingModuleRecord, ValidatedDraft,
};
pub use errors::{PipelineError, RetryPolicy};
pub use identifiers::{MachineryId, RequestId, TrainingModuleId};
pub use ports::{
    CatalogError, GenerationClient, GenerationError, MachineryCatalog, TrainingCatalog,
};
pub use schema::{instruction_for, schema_for, Schema};
pub use staging::{PendingDraft, StagingStore};
pub use types::{
    ContentFormat, ContentKind, Demand, Difficulty, MachineryType, Prompt, RawModelResponse,
    Timestamp, TrainingType,
};
pub use validator::{validate, ValidationError};
