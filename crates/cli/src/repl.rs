//! Interactive review loop and the renderers shared with one-shot commands.

use std::io::Write as _;
use std::sync::Arc;

use controller::{AssistantController, CommitReceipt, CommitRouter, Status, SubmitOutcome};
use pipeline::{ContentKind, PendingDraft, PipelineError, RetryPolicy};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error};

use crate::commands::{self, Command, HELP};

/// Reads commands from stdin until `:quit` or end of input.
///
/// Generation runs in a background task so the operator can keep typing;
/// `:discard` while a request is outstanding abandons it.
pub async fn run(controller: Arc<AssistantController>) -> anyhow::Result<()> {
    println!("Agrirent content assistant. Type :help for commands.");
    print_selected(&controller).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match commands::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        debug!(?command, "operator command");

        match command {
            Command::Kind(kind) => {
                controller.select_kind(kind).await;
                print_selected(&controller).await;
            }
            Command::Generate(text) => {
                if let Some(text) = text {
                    if let Err(e) = controller.set_prompt(text).await {
                        print_error(&e);
                        continue;
                    }
                }
                spawn_submit(controller.clone(), false);
            }
            Command::Retry => spawn_submit(controller.clone(), true),
            Command::Approve => match controller.approve().await {
                Ok(receipt) => print_receipt(&receipt),
                Err(e) => print_error(&e),
            },
            Command::Discard => match controller.discard().await {
                Some(dropped) => println!("Discarded draft '{}'.", dropped.draft.label()),
                None => println!("Nothing staged. Session is idle."),
            },
            Command::Show => show(&controller).await,
            Command::List(kind) => {
                let kind = match kind {
                    Some(kind) => kind,
                    None => controller.snapshot().await.selected_kind,
                };
                if let Err(e) = print_listing(controller.router(), kind).await {
                    println!("Could not read the {kind} catalog: {e}");
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }
    Ok(())
}

fn spawn_submit(controller: Arc<AssistantController>, retry: bool) {
    tokio::spawn(async move {
        let result = if retry {
            controller.retry().await
        } else {
            controller.submit().await
        };
        match result {
            Ok(SubmitOutcome::Staged(pending)) => print_pending(&pending),
            Ok(SubmitOutcome::Superseded { request_id }) => {
                debug!(%request_id, "response for abandoned request ignored");
            }
            Err(e) => print_error(&e),
        }
    });
}

async fn print_selected(controller: &AssistantController) {
    let kind = controller.snapshot().await.selected_kind;
    println!("Generating {kind} drafts.");
}

async fn show(controller: &AssistantController) {
    let snapshot = controller.snapshot().await;
    let status = match &snapshot.status {
        Status::Idle => "idle".to_string(),
        Status::AwaitingGeneration { request_id, kind } => {
            format!("generating {kind} (request {request_id})")
        }
        Status::Reviewing { request_id } => format!("reviewing (request {request_id})"),
        Status::Committing { request_id } => format!("committing (request {request_id})"),
        Status::Failed { error } => format!("failed: {error}"),
    };
    println!("Status:   {status}");
    println!("Kind:     {}", snapshot.selected_kind);
    println!("Prompt:   {}", snapshot.prompt);
    if let Some(pending) = &snapshot.pending {
        print_pending(pending);
    }
}

pub fn print_pending(pending: &PendingDraft) {
    match pending.draft.to_preview_json() {
        Ok(json) => {
            println!(
                "Draft {} '{}' staged at {}:",
                pending.kind(),
                pending.draft.label(),
                pending.staged_at
            );
            println!("{json}");
            println!("Approve with :approve or drop with :discard.");
        }
        Err(e) => {
            error!(error = %e, "failed to render draft preview");
            println!("Draft '{}' is staged but could not be rendered.", pending.draft.label());
        }
    }
}

pub fn print_receipt(receipt: &CommitReceipt) {
    println!("Added {} #{} to the catalog.", receipt.kind(), receipt.id());
}

pub fn print_error(error: &PipelineError) {
    match error.retry_policy() {
        RetryPolicy::Retryable { after: Some(after) } => println!(
            "{error}. Try :retry in {}s.",
            after.as_secs().max(1)
        ),
        RetryPolicy::Retryable { after: None } => println!("{error}. Try :retry."),
        RetryPolicy::NonRetryable => println!("{error}."),
    }
}

pub async fn print_listing(
    router: &CommitRouter,
    kind: ContentKind,
) -> Result<(), pipeline::CatalogError> {
    match kind {
        ContentKind::Machinery => {
            let records = router.machinery().list().await?;
            if records.is_empty() {
                println!("No machinery listed yet.");
            }
            for r in records {
                println!(
                    "#{:<4} {} {} | {} | {} | {:.0}/day | {} | demand {}",
                    r.id.as_u64(),
                    r.draft.image_glyph,
                    r.draft.name,
                    r.draft.machinery_type,
                    r.draft.power,
                    r.draft.price_per_day,
                    r.draft.location,
                    r.draft.demand
                );
            }
        }
        ContentKind::Training => {
            let records = router.training().list().await?;
            if records.is_empty() {
                println!("No training modules yet.");
            }
            for r in records {
                println!(
                    "#{:<4} {} {} | {} | {} | {} min",
                    r.id.as_u64(),
                    r.draft.icon_glyph,
                    r.draft.title,
                    r.draft.training_type,
                    r.draft.difficulty,
                    r.draft.duration_minutes
                );
            }
        }
    }
    Ok(())
}
