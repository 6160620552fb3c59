//! Shared fixtures for the sync engine integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use gallery_core::config::AppConfig;
use gallery_core::result::AppResult;
use gallery_core::traits::{Asset, DocumentStore, NamespaceClient};
use gallery_database::MemoryCatalogStore;
use gallery_media::MemoryNamespace;
use gallery_service::{FolderReconciler, SyncOrchestrator};
use gallery_storage::MemoryDocumentStore;

pub const BUCKET: &str = "content";

/// In-memory providers wired to one configuration.
pub struct TestEnv {
    pub config: AppConfig,
    pub namespace: MemoryNamespace,
    pub documents: MemoryDocumentStore,
    pub store: MemoryCatalogStore,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_store(MemoryCatalogStore::new())
    }

    pub fn with_store(store: MemoryCatalogStore) -> Self {
        let mut config = AppConfig::default();
        config.sync.root_folders = vec!["Events".to_string()];
        config.documents.bucket = Some(BUCKET.to_string());
        Self {
            config,
            namespace: MemoryNamespace::new(),
            documents: MemoryDocumentStore::new(),
            store,
        }
    }

    pub fn reconciler(&self) -> FolderReconciler {
        FolderReconciler::new(
            Arc::new(self.namespace.clone()),
            Arc::new(self.store.clone()),
            &self.config.media,
            &self.config.sync,
        )
    }

    pub fn orchestrator(&self) -> SyncOrchestrator {
        let namespace: Arc<dyn NamespaceClient> = Arc::new(self.namespace.clone());
        self.orchestrator_with(Ok(namespace))
    }

    pub fn orchestrator_with(
        &self,
        namespace: AppResult<Arc<dyn NamespaceClient>>,
    ) -> SyncOrchestrator {
        let documents: Arc<dyn DocumentStore> = Arc::new(self.documents.clone());
        SyncOrchestrator::new(
            &self.config,
            namespace,
            Ok(documents),
            Arc::new(self.store.clone()),
            Arc::new(self.store.clone()),
        )
    }

    /// Seed all three documents with valid content.
    pub async fn seed_documents(&self) {
        self.documents
            .insert_json(
                BUCKET,
                "testimonials.json",
                &serde_json::json!([{
                    "heading": "Wonderful",
                    "details": "Captured every moment",
                    "name": "Alex",
                    "occasion": "Wedding",
                    "date": "June 2024"
                }]),
            )
            .await;
        self.documents
            .insert_json(
                BUCKET,
                "packages.json",
                &serde_json::json!({
                    "packages": [{ "name": "Gold", "priceAUD": 2500 }],
                    "addons": [{ "name": "Extra hour", "priceAUD": 100 }]
                }),
            )
            .await;
        self.documents
            .insert_json(
                BUCKET,
                "faq.json",
                &serde_json::json!({
                    "categories": [{
                        "name": "Booking",
                        "faqs": [{ "question": "How?", "answer": "Online." }]
                    }]
                }),
            )
            .await;
    }
}

pub fn asset(id: &str, display_name: &str) -> Asset {
    Asset {
        asset_id: id.to_string(),
        filename: id.to_string(),
        display_name: Some(display_name.to_string()),
        format: Some("jpg".to_string()),
        created_at: None,
        url: format!("https://res.cloudinary.com/demo/{id}.jpg"),
        context: HashMap::new(),
    }
}

pub fn asset_with_context(id: &str, display_name: &str, context: &[(&str, &str)]) -> Asset {
    let mut asset = asset(id, display_name);
    asset.context = context
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    asset
}
