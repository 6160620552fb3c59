//! Integration tests for the document importers.

mod helpers;

use std::sync::Arc;

use serde_json::json;

use gallery_core::error::ErrorKind;
use gallery_database::MemoryCatalogStore;
use gallery_service::{FaqImporter, PackageImporter, TestimonialImporter};

use helpers::{BUCKET, TestEnv};

fn testimonials(env: &TestEnv) -> TestimonialImporter {
    TestimonialImporter::new(
        Arc::new(env.documents.clone()),
        Arc::new(env.store.clone()),
        env.config.documents.bucket().map(str::to_string),
        &env.config.import.testimonials,
    )
}

fn packages(env: &TestEnv) -> PackageImporter {
    PackageImporter::new(
        Arc::new(env.documents.clone()),
        Arc::new(env.store.clone()),
        env.config.documents.bucket().map(str::to_string),
        &env.config.import.packages,
    )
}

fn faqs(env: &TestEnv) -> FaqImporter {
    FaqImporter::new(
        Arc::new(env.documents.clone()),
        Arc::new(env.store.clone()),
        env.config.documents.bucket().map(str::to_string),
        &env.config.import.faqs,
    )
}

#[tokio::test]
async fn test_testimonials_replace_existing_rows() {
    let env = TestEnv::new();
    env.seed_documents().await;
    testimonials(&env).import().await.unwrap();

    env.documents
        .insert_json(
            BUCKET,
            "testimonials.json",
            &json!([
                { "heading": "A", "details": "B", "name": "Jo", "occasion": "Portrait", "date": "May" },
                { "heading": "C", "details": "D", "name": "Kim", "occasion": "Family", "date": "April",
                  "image_url": "https://cdn.example/kim.jpg" }
            ]),
        )
        .await;
    let (rows, skipped) = testimonials(&env).import_rows().await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(skipped, 0);
    let names: Vec<String> = env
        .store
        .testimonials()
        .await
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["Jo", "Kim"]);
}

#[tokio::test]
async fn test_invalid_testimonial_leaves_table_untouched() {
    let env = TestEnv::new();
    env.seed_documents().await;
    testimonials(&env).import().await.unwrap();

    env.documents
        .insert_json(
            BUCKET,
            "testimonials.json",
            &json!([
                { "heading": "h", "details": "d", "name": "n", "occasion": "o", "date": "x" },
                { "heading": "h", "details": "d", "name": "n", "occasion": "o" }
            ]),
        )
        .await;
    let err = testimonials(&env).import().await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    let kept = env.store.testimonials().await;
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].name, "Alex");
}

#[tokio::test]
async fn test_missing_bucket_is_configuration_error() {
    let mut env = TestEnv::new();
    env.config.documents.bucket = Some("   ".to_string());
    env.seed_documents().await;

    let err = faqs(&env).import().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Configuration);
    assert!(env.documents.requests().await.is_empty());
}

#[tokio::test]
async fn test_download_errors_propagate() {
    let env = TestEnv::new();

    let err = packages(&env).import().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_non_json_document_is_malformed() {
    let env = TestEnv::new();
    env.documents
        .insert(BUCKET, "faq.json", "<html>oops</html>")
        .await;

    let err = faqs(&env).import().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedDocument);
}

#[tokio::test]
async fn test_packages_skip_nameless_and_store_standalone_addons() {
    let env = TestEnv::new();
    env.documents
        .insert_json(
            BUCKET,
            "packages.json",
            &json!({
                "packages": [{ "name": "Gold" }, { "ideal_for": "x" }],
                "addons": [{ "name": "Extra hour", "priceAUD": 100 }]
            }),
        )
        .await;

    let report = packages(&env).import().await.unwrap();

    assert_eq!(report.written, 2);
    assert_eq!(report.skipped, 1);
    let stored = env.store.packages().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Gold");
    let addons = env.store.addons().await;
    assert_eq!(addons.len(), 1);
    assert_eq!(addons[0].price_aud, Some(100.0));
    assert!(addons[0].is_standalone());
}

#[tokio::test]
async fn test_package_row_failure_does_not_abort() {
    let env = TestEnv::with_store(MemoryCatalogStore::rejecting(["Silver"]));
    env.documents
        .insert_json(
            BUCKET,
            "packages.json",
            &json!({ "packages": [{ "name": "Silver" }, { "name": "Gold" }] }),
        )
        .await;

    let report = packages(&env).import().await.unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.written, 1);
    assert_eq!(env.store.packages().await[0].name, "Gold");
}

#[tokio::test]
async fn test_faqs_keep_valid_entries() {
    let env = TestEnv::new();
    env.documents
        .insert_json(
            BUCKET,
            "faq.json",
            &json!({
                "categories": [{
                    "name": "Booking",
                    "faqs": [{ "question": "Q1", "answer": "A1" }, { "question": "Q2" }]
                }]
            }),
        )
        .await;

    let report = faqs(&env).import().await.unwrap();

    assert_eq!(report.skipped, 1);
    let categories = env.store.faq_categories().await;
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "Booking");
    let entries = env.store.faqs().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].question, "Q1");
    assert_eq!(entries[0].category_id, categories[0].id);
}

#[tokio::test]
async fn test_custom_document_names() {
    let mut env = TestEnv::new();
    env.config.import.faqs.file = "content/faq-2024.json".to_string();
    env.documents
        .insert_json(BUCKET, "content/faq-2024.json", &json!({ "categories": [] }))
        .await;

    let report = faqs(&env).import().await.unwrap();
    assert_eq!(report.document, "content/faq-2024.json");
    assert_eq!(report.written, 0);
}
