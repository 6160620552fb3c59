//! Integration tests for the folder/image reconciler.

mod helpers;

use std::collections::HashSet;
use std::sync::Arc;

use gallery_core::error::{AppError, ErrorKind};
use gallery_service::FolderReconciler;

use helpers::{TestEnv, asset, asset_with_context};

async fn seed_tree(env: &TestEnv) {
    env.namespace.add_folder("Events/2024/Wedding").await;
    env.namespace.add_folder("Events/2023").await;
    env.namespace
        .add_asset("Events/2024/Wedding", asset("w1", "Wedding/first_dance"))
        .await;
    env.namespace
        .add_asset("Events/2023", asset("e1", "party"))
        .await;
}

fn roots() -> Vec<String> {
    vec!["Events".to_string()]
}

#[tokio::test]
async fn test_reconcile_mirrors_tree() {
    let env = TestEnv::new();
    seed_tree(&env).await;

    let stats = env.reconciler().reconcile(&roots()).await.unwrap();

    assert_eq!(stats.folders_visited, 4);
    assert_eq!(stats.folders_created, 4);
    assert_eq!(stats.edges_created, 3);
    assert_eq!(stats.images_inserted, 2);

    let paths: Vec<String> = env
        .store
        .folders()
        .await
        .into_iter()
        .map(|f| f.cloudinary_path)
        .collect();
    assert_eq!(
        paths,
        vec!["Events", "Events/2023", "Events/2024", "Events/2024/Wedding"]
    );

    let wedding = env
        .store
        .folders()
        .await
        .into_iter()
        .find(|f| f.cloudinary_path == "Events/2024/Wedding")
        .unwrap();
    assert_eq!(wedding.name, "Wedding");
    let image = &env.store.images().await[1];
    assert_eq!(image.cloudinary_asset_id, "w1");
    assert_eq!(image.folder_id, wedding.id);
}

#[tokio::test]
async fn test_walk_is_preorder_in_listing_order() {
    let env = TestEnv::new();
    seed_tree(&env).await;

    env.reconciler().reconcile(&roots()).await.unwrap();

    assert_eq!(
        env.namespace.subfolder_calls().await,
        vec!["Events", "Events/2024", "Events/2024/Wedding", "Events/2023"]
    );
}

#[tokio::test]
async fn test_second_run_is_noop() {
    let env = TestEnv::new();
    seed_tree(&env).await;
    let reconciler = env.reconciler();

    reconciler.reconcile(&roots()).await.unwrap();
    let folders = env.store.folders().await;
    let images = env.store.images().await;
    let edges = env.store.edges().await;

    let stats = reconciler.reconcile(&roots()).await.unwrap();

    assert_eq!(stats.folders_created, 0);
    assert_eq!(stats.edges_created, 0);
    assert_eq!(stats.images_inserted, 0);
    assert_eq!(stats.images_skipped, 2);
    assert_eq!(env.store.folders().await, folders);
    assert_eq!(env.store.images().await, images);
    assert_eq!(env.store.edges().await, edges);
}

#[tokio::test]
async fn test_cover_asset_marks_event_folder() {
    let env = TestEnv::new();
    env.namespace
        .add_asset(
            "Events/Reunion",
            asset_with_context(
                "c1",
                "Covers/COVER_shot.jpg",
                &[("event_name", "Reunion"), ("event_date", "2024-05-01")],
            ),
        )
        .await;
    env.namespace
        .add_asset("Events/Reunion", asset("p1", "guests"))
        .await;

    let stats = env.reconciler().reconcile(&roots()).await.unwrap();
    assert_eq!(stats.event_folders_marked, 1);

    let folder = env
        .store
        .folders()
        .await
        .into_iter()
        .find(|f| f.cloudinary_path == "Events/Reunion")
        .unwrap();
    assert!(folder.is_event_folder);
    assert_eq!(folder.event_name.as_deref(), Some("Reunion"));
    assert_eq!(folder.event_date.as_deref(), Some("2024-05-01"));

    let root = env
        .store
        .folders()
        .await
        .into_iter()
        .find(|f| f.cloudinary_path == "Events")
        .unwrap();
    assert!(!root.is_event_folder);
}

#[tokio::test]
async fn test_cover_without_context_sets_null_details() {
    let env = TestEnv::new();
    env.namespace
        .add_asset("Events", asset("c1", "cover"))
        .await;

    env.reconciler().reconcile(&roots()).await.unwrap();

    let folder = &env.store.folders().await[0];
    assert!(folder.is_event_folder);
    assert!(folder.event_name.is_none());
    assert!(folder.event_date.is_none());
}

#[tokio::test]
async fn test_subfolder_listing_failure_records_folder_only() {
    let env = TestEnv::new();
    seed_tree(&env).await;
    env.namespace.fail_subfolders("Events", u32::MAX).await;

    let stats = env.reconciler().reconcile(&roots()).await.unwrap();

    assert_eq!(stats.listing_failures, 1);
    let folders = env.store.folders().await;
    assert_eq!(folders.len(), 1);
    assert_eq!(folders[0].cloudinary_path, "Events");
}

#[tokio::test]
async fn test_subfolder_listing_is_retried() {
    let mut env = TestEnv::new();
    env.config.media.list_retries = 2;
    seed_tree(&env).await;
    env.namespace.fail_subfolders("Events", 2).await;

    let stats = env.reconciler().reconcile(&roots()).await.unwrap();

    assert_eq!(stats.listing_failures, 0);
    assert_eq!(env.store.folders().await.len(), 4);
}

#[tokio::test]
async fn test_pagination_follows_cursor() {
    let mut env = TestEnv::new();
    env.config.media.page_size = 2;
    for i in 0..5 {
        env.namespace
            .add_asset("Events", asset(&format!("a{i}"), "shot"))
            .await;
    }

    let stats = env.reconciler().reconcile(&roots()).await.unwrap();

    assert_eq!(stats.images_inserted, 5);
    let cursors: Vec<Option<String>> = env
        .namespace
        .asset_calls()
        .await
        .into_iter()
        .map(|(_, cursor)| cursor)
        .collect();
    assert_eq!(
        cursors,
        vec![None, Some("2".to_string()), Some("4".to_string())]
    );
}

#[tokio::test]
async fn test_asset_listing_failure_aborts() {
    let env = TestEnv::new();
    seed_tree(&env).await;
    env.namespace
        .fail_assets("Events/2023", AppError::external("search unavailable"))
        .await;

    let err = env.reconciler().reconcile(&roots()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExternalService);
}

#[tokio::test]
async fn test_depth_bound_limits_walk() {
    let mut env = TestEnv::new();
    env.config.sync.max_depth = 1;
    seed_tree(&env).await;

    let stats = env.reconciler().reconcile(&roots()).await.unwrap();

    assert_eq!(stats.depth_limited, 1);
    let paths: HashSet<String> = env
        .store
        .folders()
        .await
        .into_iter()
        .map(|f| f.cloudinary_path)
        .collect();
    assert!(!paths.contains("Events/2024/Wedding"));
    assert_eq!(paths.len(), 3);
}

#[tokio::test]
async fn test_empty_roots_do_nothing() {
    let env = TestEnv::new();
    seed_tree(&env).await;

    let stats = env.reconciler().reconcile(&[]).await.unwrap();

    assert_eq!(stats.folders_visited, 0);
    assert!(env.store.folders().await.is_empty());
    assert!(env.namespace.subfolder_calls().await.is_empty());
}

#[tokio::test]
async fn test_asset_in_two_folders_stored_once() {
    let env = TestEnv::new();
    env.namespace.add_asset("Events/A", asset("shared", "x")).await;
    env.namespace.add_asset("Events/B", asset("shared", "x")).await;

    let stats = env.reconciler().reconcile(&roots()).await.unwrap();

    assert_eq!(stats.images_inserted, 1);
    assert_eq!(stats.images_skipped, 1);
    assert_eq!(env.store.images().await.len(), 1);
}

#[tokio::test]
async fn test_concurrent_walks_share_folder_rows() {
    let env = TestEnv::new();
    env.namespace.add_folder("Events/2024/Wedding").await;
    env.namespace.add_folder("Events/2023").await;

    let first: Arc<FolderReconciler> = Arc::new(env.reconciler());
    let second = Arc::new(env.reconciler());
    let (a, b) = tokio::join!(
        {
            let r = first.clone();
            async move { r.reconcile(&roots()).await }
        },
        {
            let r = second.clone();
            async move { r.reconcile(&roots()).await }
        }
    );
    a.unwrap();
    b.unwrap();

    assert_eq!(env.store.folders().await.len(), 4);
    assert_eq!(env.store.edges().await.len(), 3);
}
