//! The content assistant controller.
//!
//! Drives one review session through its states:
//!
//! ```text
//!            submit                 draft valid              approve
//!   Idle ───────────▶ Awaiting ───────────────▶ Reviewing ─────────▶ Committing ──▶ Idle
//!    ▲                 │    ▲                      │  ▲                  │
//!    │   discard       │    │ submit / retry       │  └── catalog fails ─┘
//!    ├─────────────────┘    │                      │ discard
//!    │            fails ▼   │                      │
//!    │               Failed ┘                      │
//!    └─────────────────────────────────────────────┘
//! ```
//!
//! Neither the generation call nor the catalog commit is awaited while holding
//! the session lock, so status queries stay responsive. New submissions and
//! prompt edits are rejected while either is outstanding. When the operator abandons a request, its
//! eventual response is matched against the request identity the session is
//! waiting for and dropped if it no longer matches.

use std::sync::Arc;

use pipeline::{
    validate, ContentKind, GenerationClient, PendingDraft, PipelineError, Prompt, RequestId,
    StagingStore,
};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::router::{CommitReceipt, CommitRouter};

// ---------------------------------------------------------------------------
// Observable state
// ---------------------------------------------------------------------------

/// Where the review session currently is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Status {
    /// Nothing outstanding and nothing staged.
    Idle,
    /// A generation call is in flight.
    AwaitingGeneration {
        request_id: RequestId,
        kind: ContentKind,
    },
    /// A validated draft is staged and waiting for approve or discard.
    Reviewing { request_id: RequestId },
    /// An approved draft is being handed to its catalog.
    Committing { request_id: RequestId },
    /// The last attempt failed. The prompt is kept so it can be retried.
    Failed {
        #[serde(serialize_with = "serialize_display")]
        error: PipelineError,
    },
}

fn serialize_display<S: serde::Serializer>(
    error: &PipelineError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Point-in-time copy of the session for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub status: Status,
    /// Kind the next submission will generate.
    pub selected_kind: ContentKind,
    pub prompt: String,
    pub pending: Option<PendingDraft>,
}

/// Result of a submission that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The draft is staged for review.
    Staged(PendingDraft),
    /// The request was abandoned before its response arrived; the response
    /// was dropped and nothing changed.
    Superseded { request_id: RequestId },
}

struct Session {
    status: Status,
    kind: ContentKind,
    prompt: String,
    staging: StagingStore,
}

impl Session {
    fn ensure_not_busy(&self) -> Result<(), PipelineError> {
        match self.status {
            Status::AwaitingGeneration { request_id, .. } => {
                Err(PipelineError::GenerationInFlight { request_id })
            }
            Status::Committing { request_id } => Err(PipelineError::CommitInProgress { request_id }),
            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Orchestrates generation, validation, staging, and commit for one session.
///
/// Dependencies are supplied at construction; nothing is looked up globally.
/// A controller is reused for any number of drafts and has no terminal state.
pub struct AssistantController {
    client: Arc<dyn GenerationClient>,
    router: CommitRouter,
    session: Mutex<Session>,
}

impl AssistantController {
    /// Creates an idle controller with machinery selected and an empty prompt.
    pub fn new(client: Arc<dyn GenerationClient>, router: CommitRouter) -> Self {
        Self {
            client,
            router,
            session: Mutex::new(Session {
                status: Status::Idle,
                kind: ContentKind::Machinery,
                prompt: String::new(),
                staging: StagingStore::new(),
            }),
        }
    }

    /// The commit router, for read access to the catalogs.
    pub fn router(&self) -> &CommitRouter {
        &self.router
    }

    /// Selects the kind used by the next submission.
    ///
    /// A staged draft keeps its own kind and is unaffected.
    pub async fn select_kind(&self, kind: ContentKind) {
        self.session.lock().await.kind = kind;
    }

    /// Replaces the prompt text used by the next submission.
    ///
    /// Refused while a request or a commit is outstanding, so a failure keeps
    /// the prompt that was actually sent.
    pub async fn set_prompt(&self, text: impl Into<String>) -> Result<(), PipelineError> {
        let mut session = self.session.lock().await;
        session.ensure_not_busy()?;
        session.prompt = text.into();
        Ok(())
    }

    /// Generates and validates a draft from the current kind and prompt.
    ///
    /// Drops any unapproved staged draft before the call is issued. On
    /// failure the session moves to [`Status::Failed`] and the error is
    /// returned; the prompt is preserved.
    pub async fn submit(&self) -> Result<SubmitOutcome, PipelineError> {
        let (request_id, kind, prompt) = self.begin_attempt().await?;

        let outcome = self.generate_draft(request_id, kind, &prompt).await;

        let mut session = self.session.lock().await;
        let still_current = matches!(
            session.status,
            Status::AwaitingGeneration { request_id: awaited, .. } if awaited == request_id
        );
        if !still_current {
            debug!(%request_id, "dropping response for abandoned request");
            return Ok(SubmitOutcome::Superseded { request_id });
        }

        match outcome {
            Ok(pending) => {
                if let Some(displaced) = session.staging.stage(pending.clone()) {
                    warn!(
                        displaced = %displaced.request_id,
                        "replaced an unapproved draft"
                    );
                }
                session.status = Status::Reviewing { request_id };
                info!(%request_id, %kind, label = pending.draft.label(), "draft staged for review");
                Ok(SubmitOutcome::Staged(pending))
            }
            Err(error) => {
                warn!(%request_id, %kind, %error, "generation attempt failed");
                session.status = Status::Failed {
                    error: error.clone(),
                };
                Err(error)
            }
        }
    }

    /// Resubmits the preserved prompt after a failure.
    pub async fn retry(&self) -> Result<SubmitOutcome, PipelineError> {
        debug!("retrying with preserved prompt");
        self.submit().await
    }

    async fn begin_attempt(&self) -> Result<(RequestId, ContentKind, Prompt), PipelineError> {
        let mut session = self.session.lock().await;
        session.ensure_not_busy()?;
        let prompt = Prompt::new(session.prompt.as_str()).ok_or(PipelineError::EmptyPrompt)?;

        if let Some(dropped) = session.staging.clear() {
            info!(
                dropped = %dropped.request_id,
                "discarding unapproved draft for new submission"
            );
        }
        let request_id = RequestId::new_random();
        let kind = session.kind;
        session.status = Status::AwaitingGeneration { request_id, kind };
        Ok((request_id, kind, prompt))
    }

    #[instrument(skip_all, fields(%request_id, %kind))]
    async fn generate_draft(
        &self,
        request_id: RequestId,
        kind: ContentKind,
        prompt: &Prompt,
    ) -> Result<PendingDraft, PipelineError> {
        let raw = self.client.generate(kind, prompt).await?;
        let draft = validate(kind, &raw)?;
        Ok(PendingDraft::new(request_id, draft))
    }

    /// Commits the staged draft to its catalog and returns to idle.
    ///
    /// The session lock is not held while the catalog works; the session
    /// reports [`Status::Committing`] meanwhile. The prompt is cleared on
    /// success. If the catalog refuses the draft it is staged again and
    /// [`PipelineError::CommitFailed`] is returned.
    pub async fn approve(&self) -> Result<CommitReceipt, PipelineError> {
        let pending = {
            let mut session = self.session.lock().await;
            session.ensure_not_busy()?;
            let pending = session.staging.approve().inspect_err(|_| {
                warn!(status = ?session.status, "approve invoked with nothing staged");
            })?;
            session.status = Status::Committing {
                request_id: pending.request_id,
            };
            pending
        };
        let kind = pending.kind();
        let request_id = pending.request_id;

        let result = self.router.commit(pending.draft.clone()).await;

        let mut session = self.session.lock().await;
        match result {
            Ok(receipt) => {
                session.status = Status::Idle;
                session.prompt.clear();
                Ok(receipt)
            }
            Err(source) => {
                warn!(%request_id, %kind, error = %source, "catalog rejected approved draft");
                let _ = session.staging.stage(pending);
                session.status = Status::Reviewing { request_id };
                Err(PipelineError::CommitFailed { kind, source })
            }
        }
    }

    /// Drops the staged draft, abandons an outstanding request, or clears a
    /// failure, leaving the session idle. The prompt is kept.
    ///
    /// A commit already handed to a catalog cannot be abandoned; discard is a
    /// no-op until it finishes.
    pub async fn discard(&self) -> Option<PendingDraft> {
        let mut session = self.session.lock().await;
        match session.status {
            Status::Committing { request_id } => {
                info!(%request_id, "commit in progress, nothing to discard");
                return None;
            }
            Status::AwaitingGeneration { request_id, .. } => {
                info!(%request_id, "abandoning outstanding request");
            }
            _ => {}
        }
        session.status = Status::Idle;
        session.staging.clear()
    }

    /// The staged draft, if any.
    pub async fn peek(&self) -> Option<PendingDraft> {
        self.session.lock().await.staging.peek().cloned()
    }

    /// Current status.
    pub async fn status(&self) -> Status {
        self.session.lock().await.status.clone()
    }

    /// Copy of the whole session for rendering.
    pub async fn snapshot(&self) -> Snapshot {
        let session = self.session.lock().await;
        Snapshot {
            status: session.status.clone(),
            selected_kind: session.kind,
            prompt: session.prompt.clone(),
            pending: session.staging.peek().cloned(),
        }
    }
}
