//! Catalog schema migrations.

use std::collections::HashSet;

use serde::Serialize;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use gallery_core::error::{AppError, ErrorKind};
use gallery_core::result::AppResult;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// A known migration and whether the database has applied it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    pub version: i64,
    pub description: String,
    pub applied: bool,
}

/// Apply every pending catalog migration.
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    let pending = migration_status(pool)
        .await?
        .into_iter()
        .filter(|m| !m.applied)
        .count();
    info!(pending, "Applying catalog migrations");

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to run migrations: {e}"),
            e,
        )
    })?;

    info!("Catalog schema is up to date");
    Ok(())
}

/// List the embedded migrations in version order with their applied state.
pub async fn migration_status(pool: &PgPool) -> AppResult<Vec<MigrationStatus>> {
    let applied = applied_versions(pool).await?;
    Ok(MIGRATOR
        .iter()
        .filter(|m| !m.migration_type.is_down_migration())
        .map(|m| MigrationStatus {
            version: m.version,
            description: m.description.to_string(),
            applied: applied.contains(&m.version),
        })
        .collect())
}

async fn applied_versions(pool: &PgPool) -> AppResult<HashSet<i64>> {
    let tracked: bool =
        sqlx::query_scalar("SELECT to_regclass('_sqlx_migrations') IS NOT NULL")
            .fetch_one(pool)
            .await
            .map_err(db_error)?;
    if !tracked {
        return Ok(HashSet::new());
    }

    let versions: Vec<i64> =
        sqlx::query_scalar("SELECT version FROM _sqlx_migrations WHERE success")
            .fetch_all(pool)
            .await
            .map_err(db_error)?;
    Ok(versions.into_iter().collect())
}

fn db_error(e: sqlx::Error) -> AppError {
    AppError::with_source(
        ErrorKind::Database,
        format!("Failed to read migration history: {e}"),
        e,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_migrations_are_ordered() {
        let versions: Vec<i64> = MIGRATOR.iter().map(|m| m.version).collect();
        assert_eq!(versions.len(), 2);
        assert!(versions.windows(2).all(|w| w[0] < w[1]));
    }
}
