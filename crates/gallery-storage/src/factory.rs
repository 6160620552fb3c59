//! Builds the configured document store.

use std::sync::Arc;
use std::time::Duration;

use gallery_core::config::DocumentsConfig;
use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_core::traits::DocumentStore;

use crate::providers::SupabaseDocumentStore;

/// Create the document store selected by `documents.provider`.
pub async fn build_document_store(config: &DocumentsConfig) -> AppResult<Arc<dyn DocumentStore>> {
    let timeout = Duration::from_secs(config.timeout_seconds);
    match config.provider.as_str() {
        "supabase" => Ok(Arc::new(SupabaseDocumentStore::new(
            &config.supabase,
            timeout,
        )?)),
        #[cfg(feature = "s3")]
        "s3" => Ok(Arc::new(
            crate::providers::S3DocumentStore::new(&config.s3, timeout).await?,
        )),
        #[cfg(not(feature = "s3"))]
        "s3" => Err(AppError::configuration(
            "S3 document store requires the 's3' feature",
        )),
        other => Err(AppError::configuration(format!(
            "Unknown document store provider '{other}'"
        ))),
    }
}
