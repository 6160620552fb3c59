//! Cron scheduler for periodic catalog syncs.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use gallery_core::config::WorkerConfig;
use gallery_core::error::AppError;
use gallery_service::SyncOrchestrator;

use crate::job::run_sync_job;

/// Cron-based scheduler for the catalog sync.
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Orchestrator invoked by every trigger
    orchestrator: Arc<SyncOrchestrator>,
    config: WorkerConfig,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler")
            .field("schedule", &self.config.sync_schedule)
            .finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(
        orchestrator: Arc<SyncOrchestrator>,
        config: WorkerConfig,
    ) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            orchestrator,
            config,
        })
    }

    /// Register the catalog sync on the configured schedule
    pub async fn register_sync(&self) -> Result<(), AppError> {
        let schedule = self.config.sync_schedule.as_str();
        let orchestrator = Arc::clone(&self.orchestrator);
        let job = CronJob::new_async(schedule, move |_uuid, _lock| {
            let orchestrator = Arc::clone(&orchestrator);
            Box::pin(async move {
                run_sync_job(&orchestrator, "schedule").await;
            })
        })
        .map_err(|e| {
            AppError::configuration(format!("Invalid sync schedule '{schedule}': {e}"))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add catalog_sync schedule: {e}")))?;

        tracing::info!(schedule, "Registered: catalog_sync");
        Ok(())
    }

    /// Start the scheduler, and kick off an immediate run when
    /// `run_on_startup` is set.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;
        tracing::info!("Cron scheduler started");

        if self.config.run_on_startup {
            let orchestrator = Arc::clone(&self.orchestrator);
            tokio::spawn(async move {
                run_sync_job(&orchestrator, "startup").await;
            });
        }
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }
}
