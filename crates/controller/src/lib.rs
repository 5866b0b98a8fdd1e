//! Agrirent content assistant orchestration.
//!
//! This crate provides the [`AssistantController`] that drives one review
//! session (generate → validate → stage → approve or discard) and the
//! [`CommitRouter`] that hands approved drafts to the right catalog.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** The controller sequences calls between business
//! logic in the [`pipeline`] crate and the port traits (generation client,
//! catalogs). It contains no validation rules of its own.

mod assistant;
mod router;

pub use assistant::{AssistantController, Snapshot, Status, SubmitOutcome};
pub use router::{CommitReceipt, CommitRouter};
