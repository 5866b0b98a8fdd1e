//! Agrirent content assistant entry point.
//!
//! This binary is the composition root. It:
//!
//! 1. **Parses configuration**: loads `agrirent.toml`, applies flag and
//!    environment overrides, and validates the result.
//! 2. **Wires observability**: installs the `tracing` subscriber and, when
//!    configured, the OpenTelemetry OTLP exporter.
//! 3. **Constructs infrastructure**: the Gemini provider and the JSON-file
//!    catalogs, injected into an [`AssistantController`].
//! 4. **Runs a mode**: the interactive review loop, a one-shot generation,
//!    or a catalog listing.

mod commands;
mod config;
mod repl;
mod telemetry;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use catalog::open_catalogs;
use clap::{Parser, Subcommand};
use controller::{AssistantController, CommitRouter, SubmitOutcome};
use llm::GeminiProvider;
use pipeline::ContentKind;
use tracing::info;

use crate::config::{AppConfig, DEFAULT_CONFIG_FILE};

#[derive(Parser)]
#[command(name = "agrirent-assistant", version)]
#[command(about = "Generate, review, and publish Agrirent machinery listings and training modules")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Catalog data directory (overrides config file)
    #[arg(short, long, env = "AGRIRENT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Gemini model name (overrides config file)
    #[arg(long)]
    model: Option<String>,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand)]
enum Mode {
    /// Review drafts interactively (default)
    Interactive,
    /// Generate a single draft and print it
    Generate {
        /// machinery or training
        #[arg(long)]
        kind: ContentKind,
        /// Description of what to generate
        #[arg(long)]
        prompt: String,
        /// Add the draft to its catalog without review
        #[arg(long)]
        approve: bool,
    },
    /// Print a catalog
    List {
        /// machinery or training
        kind: ContentKind,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)?;
    config.apply_overrides(cli.data_dir, cli.model);
    config.validate()?;

    let telemetry = telemetry::init(&config.telemetry)?;
    info!(
        config = %cli.config.display(),
        data_dir = %config.catalog.data_dir.display(),
        model = %config.gemini.model,
        "starting agrirent-assistant"
    );

    let result = run(cli.mode.unwrap_or(Mode::Interactive), &config).await;
    telemetry.shutdown();
    result
}

async fn run(mode: Mode, config: &AppConfig) -> anyhow::Result<()> {
    let (machinery, training) =
        open_catalogs(&config.catalog.data_dir, config.owner.clone().into())
            .await
            .with_context(|| {
                format!(
                    "failed to open catalogs in {}",
                    config.catalog.data_dir.display()
                )
            })?;
    let router = CommitRouter::new(Arc::new(machinery), Arc::new(training));

    match mode {
        Mode::List { kind } => repl::print_listing(&router, kind).await?,
        Mode::Generate {
            kind,
            prompt,
            approve,
        } => generate_once(&build_controller(config, router)?, kind, prompt, approve).await?,
        Mode::Interactive => repl::run(Arc::new(build_controller(config, router)?)).await?,
    }
    Ok(())
}

fn build_controller(config: &AppConfig, router: CommitRouter) -> anyhow::Result<AssistantController> {
    let api_key = config.resolve_api_key(|var| std::env::var(var).ok())?;
    let provider = GeminiProvider::new(config.gemini_config(api_key))?;
    info!(model = provider.model(), "gemini provider ready");
    Ok(AssistantController::new(Arc::new(provider), router))
}

async fn generate_once(
    controller: &AssistantController,
    kind: ContentKind,
    prompt: String,
    approve: bool,
) -> anyhow::Result<()> {
    controller.select_kind(kind).await;
    controller.set_prompt(prompt).await?;

    let pending = match controller.submit().await? {
        SubmitOutcome::Staged(pending) => pending,
        SubmitOutcome::Superseded { request_id } => {
            anyhow::bail!("request {request_id} was abandoned before it completed")
        }
    };
    repl::print_pending(&pending);

    if approve {
        let receipt = controller.approve().await?;
        repl::print_receipt(&receipt);
    }
    Ok(())
}
