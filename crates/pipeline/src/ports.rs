//! Port traits the pipeline needs from the outside world.
//!
//! Infrastructure crates implement these: `llm` supplies a [`GenerationClient`],
//! `catalog` supplies [`MachineryCatalog`] and [`TrainingCatalog`]. The
//! controller receives them as explicit dependencies at construction time, so
//! tests substitute fakes without any process-wide state.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    ContentKind, MachineryDraft, MachineryRecord, Prompt, RawModelResponse, RetryPolicy,
    TrainingDraft, TrainingModuleRecord,
};

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Failure of a single call to the generative service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    /// The request never produced an HTTP response (DNS, TLS, timeout, ...).
    #[error("transport error: {reason}")]
    Transport { reason: String },

    /// The service answered with a non-success status.
    #[error("service returned HTTP {status}: {body}")]
    Status {
        status: u16,
        body: String,
        /// Parsed `Retry-After` header, when present.
        retry_after: Option<Duration>,
    },

    /// The service answered with an error object instead of content.
    #[error("service error: {message}")]
    Api { message: String },

    /// The service answered successfully but without any text.
    #[error("service returned no content")]
    EmptyResponse,
}

impl GenerationError {
    /// Back-off hint carried by the failure, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            GenerationError::Status { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Issues schema-constrained generation calls to an external model.
///
/// Implementations make exactly one outbound call per invocation and never
/// retry. The schema and system instruction for `kind` come from
/// [`crate::schema::schema_for`] and [`crate::schema::instruction_for`].
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Requests a draft of `kind` described by `prompt`, returning the raw text.
    async fn generate(
        &self,
        kind: ContentKind,
        prompt: &Prompt,
    ) -> Result<RawModelResponse, GenerationError>;
}

#[async_trait]
impl<T: GenerationClient + ?Sized> GenerationClient for Arc<T> {
    async fn generate(
        &self,
        kind: ContentKind,
        prompt: &Prompt,
    ) -> Result<RawModelResponse, GenerationError> {
        (**self).generate(kind, prompt).await
    }
}

// ---------------------------------------------------------------------------
// Catalogs
// ---------------------------------------------------------------------------

/// Failure of a catalog operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// Reading or writing the backing store failed.
    #[error("catalog storage error: {reason}")]
    Storage { reason: String },

    /// The stored catalog could not be encoded or decoded.
    #[error("catalog serialization error: {reason}")]
    Serialization { reason: String },

    /// The catalog refused the record.
    #[error("catalog rejected record: {reason}")]
    Rejected { reason: String },
}

impl CatalogError {
    /// Storage failures may be transient; everything else needs intervention.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            CatalogError::Storage { .. } => RetryPolicy::NOW,
            CatalogError::Serialization { .. } | CatalogError::Rejected { .. } => {
                RetryPolicy::NonRetryable
            }
        }
    }
}

/// The machinery listing collection.
///
/// Insertion assigns the fields a draft never carries: identifier, rating,
/// distance, and owner contact details.
#[async_trait]
pub trait MachineryCatalog: Send + Sync {
    /// Adds a listing built from `draft` and returns the stored record.
    async fn insert(&self, draft: MachineryDraft) -> Result<MachineryRecord, CatalogError>;

    /// Returns every listing in identifier order.
    async fn list(&self) -> Result<Vec<MachineryRecord>, CatalogError>;
}

/// The training module collection. Insertion assigns only an identifier.
#[async_trait]
pub trait TrainingCatalog: Send + Sync {
    /// Adds a module built from `draft` and returns the stored record.
    async fn insert(&self, draft: TrainingDraft) -> Result<TrainingModuleRecord, CatalogError>;

    /// Returns every module in identifier order.
    async fn list(&self) -> Result<Vec<TrainingModuleRecord>, CatalogError>;
}

#[async_trait]
impl<T: MachineryCatalog + ?Sized> MachineryCatalog for Arc<T> {
    async fn insert(&self, draft: MachineryDraft) -> Result<MachineryRecord, CatalogError> {
        (**self).insert(draft).await
    }

    async fn list(&self) -> Result<Vec<MachineryRecord>, CatalogError> {
        (**self).list().await
    }
}

#[async_trait]
impl<T: TrainingCatalog + ?Sized> TrainingCatalog for Arc<T> {
    async fn insert(&self, draft: TrainingDraft) -> Result<TrainingModuleRecord, CatalogError> {
        (**self).insert(draft).await
    }

    async fn list(&self) -> Result<Vec<TrainingModuleRecord>, CatalogError> {
        (**self).list().await
    }
}
