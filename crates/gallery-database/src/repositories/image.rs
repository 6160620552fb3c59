//! Image repository.

use sqlx::PgPool;
use uuid::Uuid;

use gallery_core::error::{AppError, ErrorKind};
use gallery_core::result::AppResult;
use gallery_entity::image::{Image, NewImage};

/// Repository for images mirrored from namespace assets.
#[derive(Debug, Clone)]
pub struct ImageRepository {
    pool: PgPool,
}

impl ImageRepository {
    /// Create a new image repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Whether an image with the given provider asset id exists.
    pub async fn exists_by_asset_id(&self, asset_id: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM images WHERE cloudinary_asset_id = $1)",
        )
        .bind(asset_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to look up image", e))
    }

    /// Insert a new image.
    ///
    /// A duplicate asset id is reported as a conflict.
    pub async fn create(&self, data: &NewImage) -> AppResult<Image> {
        sqlx::query_as::<_, Image>(
            "INSERT INTO images (id, cloudinary_asset_id, cloudinary_filename, \
             cloudinary_display_name, cloudinary_format, cloudinary_created_at, \
             cloudinary_image_url, folder_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&data.cloudinary_asset_id)
        .bind(&data.cloudinary_filename)
        .bind(&data.cloudinary_display_name)
        .bind(&data.cloudinary_format)
        .bind(data.cloudinary_created_at)
        .bind(&data.cloudinary_image_url)
        .bind(data.folder_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("images_cloudinary_asset_id_key") =>
            {
                AppError::conflict(format!(
                    "Image with asset id '{}' already exists",
                    data.cloudinary_asset_id
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create image", e),
        })
    }

    /// Count images.
    pub async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM images")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count images", e))?;
        Ok(count as u64)
    }
}
