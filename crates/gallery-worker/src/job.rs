//! The catalog sync job.

use gallery_core::error::ErrorKind;
use gallery_service::{SyncOrchestrator, SyncReport};

/// Run one full sync and log its outcome.
///
/// A run that overlaps one already in progress is skipped with a warning.
/// Returns the report when every stage succeeded.
pub async fn run_sync_job(orchestrator: &SyncOrchestrator, trigger: &str) -> Option<SyncReport> {
    tracing::info!(trigger, "Catalog sync triggered");
    match orchestrator.run_sync().await {
        Ok(report) => {
            tracing::info!(
                trigger,
                stages = report.stages.len(),
                "Catalog sync finished"
            );
            Some(report)
        }
        Err(e) if e.kind == ErrorKind::Conflict => {
            tracing::warn!(trigger, "Catalog sync skipped: {}", e.message);
            None
        }
        Err(e) => {
            tracing::error!(trigger, "Catalog sync failed: {}", e);
            None
        }
    }
}
