//! Folder reconciliation and sync orchestration.

pub mod orchestrator;
pub mod reconciler;

pub use orchestrator::{StageOutcome, SyncOrchestrator, SyncReport, SyncStage};
pub use reconciler::{FolderReconciler, ReconcileStats};
