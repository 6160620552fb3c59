//! In-memory document store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_core::traits::DocumentStore;

type ObjectKey = (String, String);

#[derive(Debug, Default)]
struct Objects {
    blobs: HashMap<ObjectKey, Bytes>,
    failures: HashMap<ObjectKey, AppError>,
    requests: Vec<String>,
}

/// Document store backed by a map of `(bucket, name)` to bytes.
///
/// Missing objects are reported as not found. Individual objects can be
/// primed with an error to exercise download failures.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    objects: Arc<RwLock<Objects>>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw bytes under `bucket/name`.
    pub async fn insert(&self, bucket: &str, name: &str, data: impl Into<Bytes>) {
        let mut objects = self.objects.write().await;
        objects
            .blobs
            .insert((bucket.to_string(), name.to_string()), data.into());
    }

    /// Store a JSON value under `bucket/name`.
    pub async fn insert_json(&self, bucket: &str, name: &str, value: &serde_json::Value) {
        self.insert(bucket, name, value.to_string()).await;
    }

    /// Make every download of `bucket/name` fail with `error`.
    pub async fn fail(&self, bucket: &str, name: &str, error: AppError) {
        let mut objects = self.objects.write().await;
        objects
            .failures
            .insert((bucket.to_string(), name.to_string()), error);
    }

    /// Every `bucket/name` requested so far, in order.
    pub async fn requests(&self) -> Vec<String> {
        self.objects.read().await.requests.clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn download(&self, bucket: &str, name: &str) -> AppResult<Bytes> {
        let mut objects = self.objects.write().await;
        objects.requests.push(format!("{bucket}/{name}"));

        let key = (bucket.to_string(), name.to_string());
        if let Some(error) = objects.failures.get(&key) {
            return Err(error.clone());
        }
        objects
            .blobs
            .get(&key)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Object '{bucket}/{name}' not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_core::error::ErrorKind;

    #[tokio::test]
    async fn test_download_returns_stored_bytes() {
        let store = MemoryDocumentStore::new();
        store.insert("content", "faq.json", "{}").await;
        let data = store.download("content", "faq.json").await.unwrap();
        assert_eq!(&data[..], b"{}");
        assert_eq!(store.requests().await, vec!["content/faq.json"]);
    }

    #[tokio::test]
    async fn test_missing_and_failing_objects() {
        let store = MemoryDocumentStore::new();
        let err = store.download("content", "nope.json").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        store
            .fail("content", "locked.json", AppError::access_denied("denied"))
            .await;
        let err = store.download("content", "locked.json").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::AccessDenied);
    }
}
