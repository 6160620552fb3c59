//! On-demand sync commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use gallery_core::error::AppError;
use gallery_service::{StageOutcome, SyncOrchestrator, SyncStage};

/// Arguments for the sync command
#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Sync subcommand
    #[command(subcommand)]
    pub command: SyncCommand,
}

/// Sync subcommands
#[derive(Debug, Subcommand)]
pub enum SyncCommand {
    /// Run every stage in order under the configured failure policy
    All,
    /// Mirror the media namespace folders and images
    Folders,
    /// Import testimonials
    Testimonials,
    /// Import packages and addons
    Packages,
    /// Import FAQ categories and entries
    Faqs,
}

impl SyncCommand {
    fn stage(&self) -> Option<SyncStage> {
        match self {
            Self::All => None,
            Self::Folders => Some(SyncStage::Folders),
            Self::Testimonials => Some(SyncStage::Testimonials),
            Self::Packages => Some(SyncStage::Packages),
            Self::Faqs => Some(SyncStage::Faqs),
        }
    }
}

/// One table row per stage outcome
#[derive(Debug, Serialize, Tabled)]
struct StageRow {
    #[tabled(rename = "Stage")]
    stage: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Duration (ms)")]
    duration_ms: u64,
    #[tabled(rename = "Summary")]
    summary: String,
}

impl From<&StageOutcome> for StageRow {
    fn from(outcome: &StageOutcome) -> Self {
        let summary = if let Some(error) = &outcome.error {
            error.clone()
        } else if let Some(stats) = &outcome.folders {
            format!(
                "{} visited, {} new folders, {} new images, {} skipped, {} events, {} listing failures",
                stats.folders_visited,
                stats.folders_created,
                stats.images_inserted,
                stats.images_skipped,
                stats.event_folders_marked,
                stats.listing_failures,
            )
        } else if let Some(report) = &outcome.import {
            format!(
                "{}: {} written, {} skipped, {} failed",
                report.document, report.written, report.skipped, report.failed
            )
        } else {
            String::new()
        };

        Self {
            stage: outcome.stage.to_string(),
            status: if outcome.succeeded() { "ok" } else { "failed" }.to_string(),
            duration_ms: outcome.duration_ms,
            summary,
        }
    }
}

/// Run the selected stages and collect their outcomes
async fn run_command(
    orchestrator: &SyncOrchestrator,
    command: &SyncCommand,
) -> Result<Vec<StageOutcome>, AppError> {
    match command.stage() {
        None => {
            tracing::info!(policy = %orchestrator.policy(), "Running full sync");
            Ok(orchestrator.run_sync().await?.stages)
        }
        Some(stage) => Ok(vec![orchestrator.run_stage(stage).await?]),
    }
}

/// Execute sync commands
pub async fn execute(args: &SyncArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let pool = super::create_db_pool(&config).await?;
    let orchestrator = super::build_orchestrator(&config, &pool).await;

    let result = run_command(&orchestrator, &args.command).await;
    pool.close().await;
    let outcomes = result?;

    let rows: Vec<StageRow> = outcomes.iter().map(StageRow::from).collect();
    output::print_list(&rows, format);
    output::print_success("Sync complete.");
    Ok(())
}
