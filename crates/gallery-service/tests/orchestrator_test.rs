//! Integration tests for the sync orchestrator.

mod helpers;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;

use gallery_core::config::FailurePolicy;
use gallery_core::error::{AppError, ErrorKind};
use gallery_core::result::AppResult;
use gallery_core::traits::{AssetPage, NamespaceClient};
use gallery_service::SyncStage;

use helpers::{BUCKET, TestEnv, asset};

/// Namespace whose first listing blocks until released.
#[derive(Debug, Default)]
struct GatedNamespace {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl NamespaceClient for GatedNamespace {
    fn provider_type(&self) -> &str {
        "gated"
    }

    async fn list_subfolders(&self, _path: &str) -> AppResult<Vec<String>> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(Vec::new())
    }

    async fn list_assets(
        &self,
        _path: &str,
        _cursor: Option<&str>,
        _page_size: u32,
    ) -> AppResult<AssetPage> {
        Ok(AssetPage::default())
    }
}

#[tokio::test]
async fn test_full_run_executes_every_stage() {
    let env = TestEnv::new();
    env.seed_documents().await;
    env.namespace.add_asset("Events/2024", asset("a1", "shot")).await;

    let report = env.orchestrator().run_sync().await.unwrap();

    let stages: Vec<SyncStage> = report.stages.iter().map(|s| s.stage).collect();
    assert_eq!(stages, SyncStage::ALL.to_vec());
    assert!(report.stages.iter().all(|s| s.succeeded()));
    assert_eq!(report.stages[0].folders.unwrap().images_inserted, 1);

    let counts = env.store.counts().await;
    assert_eq!(counts.folders, 2);
    assert_eq!(counts.images, 1);
    assert_eq!(counts.testimonials, 1);
    assert_eq!(counts.packages, 1);
    assert_eq!(counts.addons, 1);
    assert_eq!(counts.faq_categories, 1);
    assert_eq!(counts.faqs, 1);
}

#[tokio::test]
async fn test_fail_fast_stops_after_first_failure() {
    let env = TestEnv::new();
    env.seed_documents().await;
    env.documents
        .fail(BUCKET, "testimonials.json", AppError::external("storage down"))
        .await;

    let err = env.orchestrator().run_sync().await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::ExternalService);
    assert!(err.message.starts_with("testimonials stage failed"));
    assert_eq!(
        env.documents.requests().await,
        vec![format!("{BUCKET}/testimonials.json")]
    );
    assert_eq!(env.store.counts().await.packages, 0);
}

#[tokio::test]
async fn test_isolate_runs_every_stage_and_names_failures() {
    let mut env = TestEnv::new();
    env.config.sync.failure_policy = FailurePolicy::Isolate;
    env.seed_documents().await;
    env.documents
        .fail(BUCKET, "testimonials.json", AppError::external("storage down"))
        .await;
    env.documents
        .insert(BUCKET, "faq.json", "not json")
        .await;

    let err = env.orchestrator().run_sync().await.unwrap_err();

    assert!(err.message.contains("testimonials stage failed"));
    assert!(err.message.contains("faqs stage failed"));
    assert!(!err.message.contains("packages stage failed"));
    assert_eq!(env.store.counts().await.packages, 1);
}

#[tokio::test]
async fn test_missing_namespace_configuration_fails_folders_stage() {
    let env = TestEnv::new();
    let orchestrator =
        env.orchestrator_with(Err(AppError::configuration("Cloudinary cloud name is not configured")));

    let err = orchestrator.run_folders().await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Configuration);
    assert!(err.message.starts_with("folders stage failed"));
}

#[tokio::test]
async fn test_empty_root_list_is_not_an_error() {
    let mut env = TestEnv::new();
    env.config.sync.root_folders.clear();
    let orchestrator =
        env.orchestrator_with(Err(AppError::configuration("Cloudinary cloud name is not configured")));

    let stats = orchestrator.run_folders().await.unwrap();
    assert_eq!(stats.folders_visited, 0);
}

#[tokio::test]
async fn test_single_stage_entry_points() {
    let env = TestEnv::new();
    env.seed_documents().await;
    let orchestrator = env.orchestrator();

    assert_eq!(orchestrator.run_packages().await.unwrap().written, 2);
    assert_eq!(orchestrator.run_faqs().await.unwrap().written, 2);
    assert_eq!(orchestrator.run_testimonials().await.unwrap().written, 1);

    let outcome = orchestrator.run_stage(SyncStage::Folders).await.unwrap();
    assert_eq!(outcome.folders.unwrap().folders_visited, 1);
    assert_eq!(
        env.documents.requests().await,
        vec![
            format!("{BUCKET}/packages.json"),
            format!("{BUCKET}/faq.json"),
            format!("{BUCKET}/testimonials.json"),
        ]
    );
}

#[tokio::test]
async fn test_overlapping_run_is_rejected() {
    let env = TestEnv::new();
    env.seed_documents().await;
    let gated = Arc::new(GatedNamespace::default());
    let namespace: Arc<dyn NamespaceClient> = gated.clone();
    let orchestrator = Arc::new(env.orchestrator_with(Ok(namespace)));

    let first = tokio::spawn({
        let orchestrator = orchestrator.clone();
        async move { orchestrator.run_sync().await }
    });
    gated.entered.notified().await;

    let err = orchestrator.run_sync().await.unwrap_err();
    assert!(err.is_conflict());

    gated.release.notify_one();
    let report = first.await.unwrap().unwrap();
    assert_eq!(report.stages.len(), 4);
}
