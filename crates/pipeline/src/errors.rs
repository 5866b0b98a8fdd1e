//! Top-level error and retry-policy types for the content assistant pipeline.
//!
//! [`PipelineError`] is what the controller reports to the operator. Component
//! errors ([`crate::ports::GenerationError`], [`crate::ports::CatalogError`],
//! [`crate::validator::ValidationError`]) are defined next to their component
//! and convert into it.
//!
//! [`RetryPolicy`] tells the surface whether offering "try again" makes sense.
//! No layer retries on its own; a retry is always a new operator action.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ports::{CatalogError, GenerationError};
use crate::validator::ValidationError;
use crate::{ContentKind, RequestId};

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is worth retrying and, if so, after what delay.
///
/// ## Rules
///
/// - `Retryable` errors: generation unavailable, malformed or non-conforming
///   model output, transient catalog I/O failures.
/// - `NonRetryable` errors: empty prompt (needs new input), approve with
///   nothing staged (caller ordering bug), catalog rejections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    Retryable {
        /// Minimum back-off before the next attempt, e.g. from a `Retry-After`
        /// header. `None` means retry whenever the operator chooses.
        after: Option<Duration>,
    },
    /// Retrying the same action cannot succeed.
    NonRetryable,
}

impl RetryPolicy {
    /// Retryable with no minimum delay.
    pub const NOW: RetryPolicy = RetryPolicy::Retryable { after: None };

    /// Returns `true` for [`RetryPolicy::Retryable`].
    pub fn is_retryable(&self) -> bool {
        matches!(self, RetryPolicy::Retryable { .. })
    }
}

// ---------------------------------------------------------------------------
// Pipeline-level errors
// ---------------------------------------------------------------------------

/// Errors reported by the content assistant pipeline.
///
/// None of these are fatal to a pipeline instance: after any of them the
/// controller is in a state from which a fresh submission is possible.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// A generation was requested with a blank prompt. No external call was made.
    #[error("Prompt cannot be empty")]
    EmptyPrompt,

    /// A generation is already outstanding for this pipeline instance.
    #[error("Generation {request_id} is still in progress")]
    GenerationInFlight {
        /// The outstanding request.
        request_id: RequestId,
    },

    /// An approved draft is still being handed to its catalog.
    #[error("Draft from {request_id} is still being committed")]
    CommitInProgress {
        /// The request whose draft is being committed.
        request_id: RequestId,
    },

    /// The generative service could not be reached or returned no text.
    #[error("Content generation unavailable: {reason}")]
    GenerationUnavailable {
        /// Description of the underlying failure.
        reason: String,
        /// Back-off hint from the service, if it sent one.
        retry_after: Option<Duration>,
    },

    /// The service returned text that is not structured data.
    #[error("Generated content was not valid JSON: {reason}")]
    MalformedResponse {
        /// Parser diagnostic.
        reason: String,
    },

    /// The service returned structured data that does not conform to the schema.
    #[error("Generated content does not match the schema at '{field_path}'")]
    SchemaViolation {
        /// Dotted path of the first offending field (e.g. `content.links`).
        field_path: String,
    },

    /// Approve was invoked with nothing staged.
    ///
    /// Indicates a caller ordering bug rather than an operator-facing condition.
    #[error("No draft is staged for approval")]
    NothingStaged,

    /// The target catalog did not accept an approved draft.
    ///
    /// The draft is re-staged so the approval can be repeated.
    #[error("Could not add {kind} to the catalog: {source}")]
    CommitFailed {
        /// Catalog the draft was routed to.
        kind: ContentKind,
        /// The catalog's failure.
        source: CatalogError,
    },
}

impl PipelineError {
    /// Whether the operator should be offered a retry.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            PipelineError::EmptyPrompt | PipelineError::NothingStaged => RetryPolicy::NonRetryable,
            PipelineError::GenerationInFlight { .. }
            | PipelineError::CommitInProgress { .. }
            | PipelineError::MalformedResponse { .. }
            | PipelineError::SchemaViolation { .. } => RetryPolicy::NOW,
            PipelineError::GenerationUnavailable { retry_after, .. } => RetryPolicy::Retryable {
                after: *retry_after,
            },
            PipelineError::CommitFailed { source, .. } => source.retry_policy(),
        }
    }
}

impl From<GenerationError> for PipelineError {
    fn from(err: GenerationError) -> Self {
        PipelineError::GenerationUnavailable {
            retry_after: err.retry_after(),
            reason: err.to_string(),
        }
    }
}

impl From<ValidationError> for PipelineError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Malformed { reason } => PipelineError::MalformedResponse { reason },
            ValidationError::SchemaViolation { field_path } => {
                PipelineError::SchemaViolation { field_path }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_failures_are_retryable() {
        let err = PipelineError::from(GenerationError::Status {
            status: 429,
            body: "slow down".to_string(),
            retry_after: Some(Duration::from_secs(7)),
        });
        assert_eq!(
            err.retry_policy(),
            RetryPolicy::Retryable {
                after: Some(Duration::from_secs(7))
            }
        );
        assert!(matches!(err, PipelineError::GenerationUnavailable { .. }));
    }

    #[test]
    fn validation_failures_keep_their_field_path() {
        let err = PipelineError::from(ValidationError::SchemaViolation {
            field_path: "demand".to_string(),
        });
        assert_eq!(
            err,
            PipelineError::SchemaViolation {
                field_path: "demand".to_string()
            }
        );
        assert!(err.retry_policy().is_retryable());
    }

    #[test]
    fn caller_bugs_are_not_retryable() {
        assert_eq!(PipelineError::EmptyPrompt.retry_policy(), RetryPolicy::NonRetryable);
        assert_eq!(PipelineError::NothingStaged.retry_policy(), RetryPolicy::NonRetryable);
    }

    #[test]
    fn busy_session_errors_can_be_retried() {
        let request_id = RequestId::new_random();
        assert!(PipelineError::GenerationInFlight { request_id }
            .retry_policy()
            .is_retryable());
        assert!(PipelineError::CommitInProgress { request_id }
            .retry_policy()
            .is_retryable());
    }
}
