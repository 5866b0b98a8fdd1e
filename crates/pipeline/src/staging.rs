//! Single-slot holding area between validation and human approval.
//!
//! At most one [`PendingDraft`] is live at a time. Staging over an unapproved
//! draft replaces it (last write wins); the displaced draft is handed back to
//! the caller so the replacement is observable rather than a silent overwrite.

use serde::Serialize;

use crate::{ContentKind, PipelineError, RequestId, Timestamp, ValidatedDraft};

/// A validated draft awaiting an approve or discard decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingDraft {
    /// The generation attempt that produced this draft.
    pub request_id: RequestId,
    pub draft: ValidatedDraft,
    pub staged_at: Timestamp,
}

impl PendingDraft {
    /// Pairs a draft with the request that produced it, stamped now.
    pub fn new(request_id: RequestId, draft: ValidatedDraft) -> Self {
        Self {
            request_id,
            draft,
            staged_at: Timestamp::now(),
        }
    }

    /// The kind of the held draft; this decides the commit target.
    pub fn kind(&self) -> ContentKind {
        self.draft.kind()
    }
}

/// The staging slot. Owned by exactly one pipeline instance.
#[derive(Debug, Default)]
pub struct StagingStore {
    slot: Option<PendingDraft>,
}

impl StagingStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages `pending`, returning the draft it displaced, if any.
    #[must_use = "a displaced draft is discarded; inspect or log it"]
    pub fn stage(&mut self, pending: PendingDraft) -> Option<PendingDraft> {
        self.slot.replace(pending)
    }

    /// Returns the staged draft without removing it.
    pub fn peek(&self) -> Option<&PendingDraft> {
        self.slot.as_ref()
    }

    /// Empties the slot, returning what it held.
    pub fn clear(&mut self) -> Option<PendingDraft> {
        self.slot.take()
    }

    /// Removes and returns the staged draft for commit.
    pub fn approve(&mut self) -> Result<PendingDraft, PipelineError> {
        self.slot.take().ok_or(PipelineError::NothingStaged)
    }

    /// Returns `true` if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}
