//! Image entities mirrored from media namespace assets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An image asset known to the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Image {
    /// Surrogate identifier.
    pub id: Uuid,
    /// Provider asset id, unique and immutable.
    pub cloudinary_asset_id: String,
    /// Stored filename.
    pub cloudinary_filename: String,
    /// Display name.
    pub cloudinary_display_name: Option<String>,
    /// File format.
    pub cloudinary_format: Option<String>,
    /// Upload time reported by the provider.
    pub cloudinary_created_at: Option<DateTime<Utc>>,
    /// Canonical delivery URL.
    pub cloudinary_image_url: String,
    /// Owning folder.
    pub folder_id: Uuid,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to insert an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewImage {
    /// Provider asset id.
    pub cloudinary_asset_id: String,
    /// Stored filename.
    pub cloudinary_filename: String,
    /// Display name.
    pub cloudinary_display_name: Option<String>,
    /// File format.
    pub cloudinary_format: Option<String>,
    /// Upload time reported by the provider.
    pub cloudinary_created_at: Option<DateTime<Utc>>,
    /// Canonical delivery URL.
    pub cloudinary_image_url: String,
    /// Owning folder.
    pub folder_id: Uuid,
}
