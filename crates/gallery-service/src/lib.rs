//! # gallery-service
//!
//! The catalog sync engine. The folder reconciler mirrors the external media
//! namespace into the catalog, the document importers replace the content
//! tables from JSON documents, and the orchestrator runs them in order under
//! a failure policy.
//!
//! Services take their providers as `Arc` trait objects at construction.

pub mod import;
pub mod sync;

pub use import::{FaqImporter, ImportReport, PackageImporter, TestimonialImporter};
pub use sync::{
    FolderReconciler, ReconcileStats, StageOutcome, SyncOrchestrator, SyncReport, SyncStage,
};
