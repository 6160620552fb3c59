//! Sync orchestrator.
//!
//! Runs the folder reconciler and the three document importers in a fixed
//! order under the configured [`FailurePolicy`]. Only one run executes at a
//! time; an overlapping request fails with a conflict.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{error, info, warn};

use gallery_core::config::{AppConfig, FailurePolicy};
use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_core::traits::{DocumentStore, NamespaceClient};
use gallery_database::store::{ContentCatalog, MediaCatalog};

use crate::import::{FaqImporter, ImportReport, PackageImporter, TestimonialImporter};
use crate::sync::reconciler::{FolderReconciler, ReconcileStats};

/// A step of a sync run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStage {
    /// Folder/image reconciliation.
    Folders,
    /// Testimonials import.
    Testimonials,
    /// Packages and addons import.
    Packages,
    /// FAQ import.
    Faqs,
}

impl SyncStage {
    /// Every stage in execution order.
    pub const ALL: [SyncStage; 4] = [
        SyncStage::Folders,
        SyncStage::Testimonials,
        SyncStage::Packages,
        SyncStage::Faqs,
    ];

    /// Stage name used in logs and errors.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Folders => "folders",
            Self::Testimonials => "testimonials",
            Self::Packages => "packages",
            Self::Faqs => "faqs",
        }
    }
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageOutcome {
    /// Stage that ran.
    pub stage: SyncStage,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
    /// Reconciler counters, for the folders stage.
    pub folders: Option<ReconcileStats>,
    /// Importer report, for the import stages.
    pub import: Option<ImportReport>,
    /// Error message when the stage failed.
    pub error: Option<String>,
}

impl StageOutcome {
    /// Whether the stage completed without error.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary of a full sync run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
    /// Failure policy in effect.
    pub policy: FailurePolicy,
    /// Outcomes of the stages that ran, in order.
    pub stages: Vec<StageOutcome>,
}

#[derive(Debug)]
struct Importers {
    testimonials: TestimonialImporter,
    packages: PackageImporter,
    faqs: FaqImporter,
}

/// Runs the sync stages in order.
#[derive(Debug)]
pub struct SyncOrchestrator {
    /// Unset when the namespace client could not be built.
    reconciler: Result<FolderReconciler, AppError>,
    /// Unset when the document store could not be built.
    importers: Result<Importers, AppError>,
    root_folders: Vec<String>,
    policy: FailurePolicy,
    running: Mutex<()>,
}

impl SyncOrchestrator {
    /// Create an orchestrator from configuration and providers.
    ///
    /// A provider that failed to build disables the stages that need it;
    /// those stages report the build error when run.
    pub fn new(
        config: &AppConfig,
        namespace: AppResult<Arc<dyn NamespaceClient>>,
        documents: AppResult<Arc<dyn DocumentStore>>,
        media_catalog: Arc<dyn MediaCatalog>,
        content_catalog: Arc<dyn ContentCatalog>,
    ) -> Self {
        let reconciler = namespace.map(|namespace| {
            FolderReconciler::new(namespace, media_catalog, &config.media, &config.sync)
        });

        let bucket = config.documents.bucket().map(str::to_string);
        let importers = documents.map(|documents| Importers {
            testimonials: TestimonialImporter::new(
                documents.clone(),
                content_catalog.clone(),
                bucket.clone(),
                &config.import.testimonials,
            ),
            packages: PackageImporter::new(
                documents.clone(),
                content_catalog.clone(),
                bucket.clone(),
                &config.import.packages,
            ),
            faqs: FaqImporter::new(documents, content_catalog, bucket, &config.import.faqs),
        });

        Self {
            reconciler,
            importers,
            root_folders: config.sync.root_folders.clone(),
            policy: config.sync.failure_policy,
            running: Mutex::new(()),
        }
    }

    /// Failure policy in effect.
    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    fn acquire(&self) -> AppResult<MutexGuard<'_, ()>> {
        self.running
            .try_lock()
            .map_err(|_| AppError::conflict("A sync run is already in progress"))
    }

    /// Run every stage in order.
    ///
    /// Under `fail_fast` the first failing stage ends the run and its error
    /// is returned. Under `isolate` every stage runs and a single error
    /// naming each failed stage is returned.
    pub async fn run_sync(&self) -> AppResult<SyncReport> {
        let _guard = self.acquire()?;
        let started_at = Utc::now();
        info!(policy = %self.policy, "Sync run started");

        let mut stages = Vec::with_capacity(SyncStage::ALL.len());
        let mut failures: Vec<AppError> = Vec::new();

        for stage in SyncStage::ALL {
            let (outcome, result) = self.execute(stage).await;
            stages.push(outcome);
            if let Err(e) = result {
                failures.push(e);
                if self.policy == FailurePolicy::FailFast {
                    break;
                }
            }
        }

        let report = SyncReport {
            started_at,
            finished_at: Utc::now(),
            policy: self.policy,
            stages,
        };

        if let Some(err) = aggregate(failures) {
            error!(error = %err, "Sync run failed");
            return Err(err);
        }
        info!(
            duration_ms = (report.finished_at - report.started_at).num_milliseconds(),
            "Sync run complete"
        );
        Ok(report)
    }

    /// Run a single stage on its own.
    pub async fn run_stage(&self, stage: SyncStage) -> AppResult<StageOutcome> {
        let _guard = self.acquire()?;
        let (outcome, result) = self.execute(stage).await;
        result.map(|()| outcome)
    }

    /// Run only the folder/image reconciler.
    pub async fn run_folders(&self) -> AppResult<ReconcileStats> {
        let _guard = self.acquire()?;
        self.folders().await.map_err(|e| stage_error(SyncStage::Folders, e))
    }

    /// Run only the testimonials importer.
    pub async fn run_testimonials(&self) -> AppResult<ImportReport> {
        let _guard = self.acquire()?;
        self.import(SyncStage::Testimonials)
            .await
            .map_err(|e| stage_error(SyncStage::Testimonials, e))
    }

    /// Run only the packages importer.
    pub async fn run_packages(&self) -> AppResult<ImportReport> {
        let _guard = self.acquire()?;
        self.import(SyncStage::Packages)
            .await
            .map_err(|e| stage_error(SyncStage::Packages, e))
    }

    /// Run only the FAQ importer.
    pub async fn run_faqs(&self) -> AppResult<ImportReport> {
        let _guard = self.acquire()?;
        self.import(SyncStage::Faqs)
            .await
            .map_err(|e| stage_error(SyncStage::Faqs, e))
    }

    async fn execute(&self, stage: SyncStage) -> (StageOutcome, AppResult<()>) {
        info!(stage = %stage, "Sync stage started");
        let started = Instant::now();

        let mut outcome = StageOutcome {
            stage,
            duration_ms: 0,
            folders: None,
            import: None,
            error: None,
        };
        let result = match stage {
            SyncStage::Folders => self.folders().await.map(|stats| {
                outcome.folders = Some(stats);
            }),
            _ => self.import(stage).await.map(|report| {
                outcome.import = Some(report);
            }),
        };
        outcome.duration_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(()) => {
                info!(stage = %stage, duration_ms = outcome.duration_ms, "Sync stage complete");
                (outcome, Ok(()))
            }
            Err(e) => {
                let err = stage_error(stage, e);
                error!(stage = %stage, error = %err, "Sync stage failed");
                outcome.error = Some(err.message.clone());
                (outcome, Err(err))
            }
        }
    }

    async fn folders(&self) -> AppResult<ReconcileStats> {
        if self.root_folders.is_empty() {
            warn!("No root folders configured, skipping folder sync");
            return Ok(ReconcileStats::default());
        }
        let reconciler = self.reconciler.as_ref().map_err(Clone::clone)?;
        reconciler.reconcile(&self.root_folders).await
    }

    async fn import(&self, stage: SyncStage) -> AppResult<ImportReport> {
        let importers = self.importers.as_ref().map_err(Clone::clone)?;
        match stage {
            SyncStage::Testimonials => importers.testimonials.import().await,
            SyncStage::Packages => importers.packages.import().await,
            SyncStage::Faqs => importers.faqs.import().await,
            SyncStage::Folders => Err(AppError::internal("folders is not an import stage")),
        }
    }
}

fn stage_error(stage: SyncStage, err: AppError) -> AppError {
    err.context(format!("{stage} stage failed"))
}

/// Fold stage errors into one. The first failure's kind is kept.
fn aggregate(mut failures: Vec<AppError>) -> Option<AppError> {
    match failures.len() {
        0 => None,
        1 => failures.pop(),
        _ => {
            let message = failures
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            Some(AppError::new(failures[0].kind, message))
        }
    }
}
