//! # gallery-media
//!
//! Clients for the external media namespace the reconciler walks: the
//! Cloudinary Admin and Search APIs, and an in-memory tree for tests
//! behind the `memory` feature.

pub mod providers;

use std::sync::Arc;

use gallery_core::config::MediaConfig;
use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_core::traits::NamespaceClient;

pub use providers::CloudinaryClient;
#[cfg(any(test, feature = "memory"))]
pub use providers::MemoryNamespace;

/// Create the namespace client selected by `media.provider`.
pub fn build_namespace_client(config: &MediaConfig) -> AppResult<Arc<dyn NamespaceClient>> {
    match config.provider.as_str() {
        "cloudinary" => Ok(Arc::new(CloudinaryClient::new(config)?)),
        other => Err(AppError::configuration(format!(
            "Unknown media provider '{other}'"
        ))),
    }
}
