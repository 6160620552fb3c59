//! External media namespace trait.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// An asset record as reported by the media-hosting provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Provider-assigned immutable asset id.
    pub asset_id: String,
    /// Stored filename.
    pub filename: String,
    /// Display name, possibly containing `/` separated segments.
    pub display_name: Option<String>,
    /// File format (e.g. `jpg`).
    pub format: Option<String>,
    /// Upload time reported by the provider.
    pub created_at: Option<DateTime<Utc>>,
    /// Canonical delivery URL.
    pub url: String,
    /// Free-form key/value metadata.
    #[serde(default)]
    pub context: HashMap<String, String>,
}

impl Asset {
    /// Look up a context value, treating blanks as absent.
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

/// One page of an asset listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetPage {
    /// Assets on this page.
    pub assets: Vec<Asset>,
    /// Cursor for the next page; `None` or empty when exhausted.
    pub next_cursor: Option<String>,
}

/// Read access to the provider's folder tree.
#[async_trait]
pub trait NamespaceClient: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g. "cloudinary").
    fn provider_type(&self) -> &str;

    /// List the full paths of the immediate sub-folders of `path`.
    async fn list_subfolders(&self, path: &str) -> AppResult<Vec<String>>;

    /// List one page of assets directly inside `path`.
    async fn list_assets(
        &self,
        path: &str,
        cursor: Option<&str>,
        page_size: u32,
    ) -> AppResult<AssetPage>;
}
