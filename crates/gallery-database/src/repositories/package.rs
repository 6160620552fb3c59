//! Package and addon repository.

use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use tracing::warn;
use uuid::Uuid;

use gallery_core::error::{AppError, ErrorKind};
use gallery_core::result::AppResult;
use gallery_entity::package::{Addon, NewAddon, NewPackage, Package};

/// Rows written by a package replace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageReplace {
    /// Packages inserted.
    pub packages: Vec<Package>,
    /// Addons inserted.
    pub addons: Vec<Addon>,
    /// Rows whose insert failed and were left out.
    pub failed: usize,
}

/// Repository for packages and their addons.
#[derive(Debug, Clone)]
pub struct PackageRepository {
    pool: PgPool,
}

impl PackageRepository {
    /// Create a new package repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Replace every package and addon in one transaction.
    ///
    /// Addons are deleted first to satisfy the addon to package reference.
    /// Each row is inserted under its own savepoint; a failing row is
    /// logged, rolled back and counted without aborting the rest.
    pub async fn replace_all(
        &self,
        packages: &[NewPackage],
        addons: &[NewAddon],
    ) -> AppResult<PackageReplace> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("DELETE FROM addons")
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete addons", e))?;
        sqlx::query("DELETE FROM packages")
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete packages", e)
            })?;

        let mut outcome = PackageReplace::default();

        for package in packages {
            let mut savepoint = sqlx::Acquire::begin(&mut *tx).await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to open savepoint", e)
            })?;
            match insert_package(&mut savepoint, package).await {
                Ok(row) => {
                    savepoint.commit().await.map_err(|e| {
                        AppError::with_source(ErrorKind::Database, "Failed to release savepoint", e)
                    })?;
                    outcome.packages.push(row);
                }
                Err(e) => {
                    warn!(package = %package.name, error = %e, "Failed to insert package");
                    savepoint.rollback().await.map_err(|e| {
                        AppError::with_source(ErrorKind::Database, "Failed to roll back savepoint", e)
                    })?;
                    outcome.failed += 1;
                }
            }
        }

        for addon in addons {
            let mut savepoint = sqlx::Acquire::begin(&mut *tx).await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to open savepoint", e)
            })?;
            match insert_addon(&mut savepoint, addon).await {
                Ok(row) => {
                    savepoint.commit().await.map_err(|e| {
                        AppError::with_source(ErrorKind::Database, "Failed to release savepoint", e)
                    })?;
                    outcome.addons.push(row);
                }
                Err(e) => {
                    warn!(addon = %addon.name, error = %e, "Failed to insert addon");
                    savepoint.rollback().await.map_err(|e| {
                        AppError::with_source(ErrorKind::Database, "Failed to roll back savepoint", e)
                    })?;
                    outcome.failed += 1;
                }
            }
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit package replace", e)
        })?;

        Ok(outcome)
    }

    /// Count packages and addons.
    pub async fn count(&self) -> AppResult<(u64, u64)> {
        let (packages, addons): (i64, i64) = sqlx::query_as(
            "SELECT (SELECT COUNT(*) FROM packages), (SELECT COUNT(*) FROM addons)",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count packages", e))?;
        Ok((packages as u64, addons as u64))
    }
}

async fn insert_package(conn: &mut PgConnection, data: &NewPackage) -> Result<Package, sqlx::Error> {
    sqlx::query_as::<_, Package>(
        "INSERT INTO packages (id, name, ideal_for, includes, price_aud, image) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&data.name)
    .bind(&data.ideal_for)
    .bind(&data.includes)
    .bind(data.price_aud)
    .bind(&data.image)
    .fetch_one(conn)
    .await
}

async fn insert_addon(conn: &mut PgConnection, data: &NewAddon) -> Result<Addon, sqlx::Error> {
    sqlx::query_as::<_, Addon>(
        "INSERT INTO addons (id, name, price_aud, unit, delivery, package_id) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&data.name)
    .bind(data.price_aud)
    .bind(&data.unit)
    .bind(&data.delivery)
    .bind(data.package_id)
    .fetch_one(conn)
    .await
}
