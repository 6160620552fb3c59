//! Folder and folder hierarchy repository.

use sqlx::PgPool;
use uuid::Uuid;

use gallery_core::error::{AppError, ErrorKind};
use gallery_core::result::AppResult;
use gallery_entity::folder::{EventDetails, Folder, NewFolder};

/// Repository for folders mirrored from the media namespace.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_by_path(&self, path: &str) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE cloudinary_path = $1")
            .bind(path)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find folder by path", e)
            })
    }

    /// Insert a folder, or return the row that already owns the path.
    ///
    /// The unique constraint on `cloudinary_path` decides races: the loser's
    /// insert is a no-op and it re-reads the winner's row. The flag is
    /// `true` when this call created the row.
    pub async fn create_or_get(&self, data: &NewFolder) -> AppResult<(Folder, bool)> {
        let inserted = sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (id, name, cloudinary_path) VALUES ($1, $2, $3) \
             ON CONFLICT (cloudinary_path) DO NOTHING RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(&data.cloudinary_path)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create folder", e))?;

        if let Some(folder) = inserted {
            return Ok((folder, true));
        }

        self.find_by_path(&data.cloudinary_path)
            .await?
            .map(|folder| (folder, false))
            .ok_or_else(|| {
                AppError::database(format!(
                    "Folder '{}' conflicted on insert but could not be re-read",
                    data.cloudinary_path
                ))
            })
    }

    /// Record a parent/child edge. Returns `false` when the edge already existed.
    pub async fn link(&self, parent_id: Uuid, folder_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO folder_hierarchy (id, parent_folder_id, folder_id) VALUES ($1, $2, $3) \
             ON CONFLICT (parent_folder_id, folder_id) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(parent_id)
        .bind(folder_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to link folders", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Flag a folder as an event folder and store its event metadata.
    pub async fn mark_event(&self, folder_id: Uuid, details: &EventDetails) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE folders SET is_event_folder = TRUE, event_date = $2, event_name = $3, \
             updated_at = NOW() WHERE id = $1",
        )
        .bind(folder_id)
        .bind(&details.event_date)
        .bind(&details.event_name)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark event folder", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Folder {folder_id} not found")));
        }
        Ok(())
    }

    /// Count folders.
    pub async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM folders")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count folders", e))?;
        Ok(count as u64)
    }

    /// Count event folders.
    pub async fn count_events(&self) -> AppResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM folders WHERE is_event_folder = TRUE")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count event folders", e)
                })?;
        Ok(count as u64)
    }
}
