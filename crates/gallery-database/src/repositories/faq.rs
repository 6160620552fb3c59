//! FAQ category and entry repository.

use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use tracing::warn;
use uuid::Uuid;

use gallery_core::error::{AppError, ErrorKind};
use gallery_core::result::AppResult;
use gallery_entity::faq::{Faq, FaqCategory, NewFaq, NewFaqCategory};

/// Rows written by a FAQ replace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaqReplace {
    /// Categories inserted.
    pub categories: Vec<FaqCategory>,
    /// Entries inserted.
    pub faqs: Vec<Faq>,
    /// Rows whose insert failed and were left out.
    pub failed: usize,
}

/// Repository for FAQ categories and entries.
#[derive(Debug, Clone)]
pub struct FaqRepository {
    pool: PgPool,
}

impl FaqRepository {
    /// Create a new FAQ repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Replace every category and entry in one transaction.
    ///
    /// A category whose insert fails is skipped together with its entries.
    pub async fn replace_all(&self, categories: &[NewFaqCategory]) -> AppResult<FaqReplace> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("DELETE FROM faqs")
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete FAQs", e))?;
        sqlx::query("DELETE FROM faq_categories")
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete FAQ categories", e)
            })?;

        let mut outcome = FaqReplace::default();

        for category in categories {
            let mut savepoint = sqlx::Acquire::begin(&mut *tx).await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to open savepoint", e)
            })?;
            let row = match insert_category(&mut savepoint, &category.name).await {
                Ok(row) => row,
                Err(e) => {
                    warn!(category = %category.name, error = %e, "Failed to insert FAQ category");
                    savepoint.rollback().await.map_err(|e| {
                        AppError::with_source(ErrorKind::Database, "Failed to roll back savepoint", e)
                    })?;
                    outcome.failed += 1;
                    continue;
                }
            };
            savepoint.commit().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to release savepoint", e)
            })?;

            for faq in &category.faqs {
                let mut savepoint = sqlx::Acquire::begin(&mut *tx).await.map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to open savepoint", e)
                })?;
                match insert_faq(&mut savepoint, row.id, faq).await {
                    Ok(inserted) => {
                        savepoint.commit().await.map_err(|e| {
                            AppError::with_source(
                                ErrorKind::Database,
                                "Failed to release savepoint",
                                e,
                            )
                        })?;
                        outcome.faqs.push(inserted);
                    }
                    Err(e) => {
                        warn!(category = %category.name, question = %faq.question, error = %e, "Failed to insert FAQ");
                        savepoint.rollback().await.map_err(|e| {
                            AppError::with_source(
                                ErrorKind::Database,
                                "Failed to roll back savepoint",
                                e,
                            )
                        })?;
                        outcome.failed += 1;
                    }
                }
            }

            outcome.categories.push(row);
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit FAQ replace", e)
        })?;

        Ok(outcome)
    }

    /// Count categories and entries.
    pub async fn count(&self) -> AppResult<(u64, u64)> {
        let (categories, faqs): (i64, i64) = sqlx::query_as(
            "SELECT (SELECT COUNT(*) FROM faq_categories), (SELECT COUNT(*) FROM faqs)",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count FAQs", e))?;
        Ok((categories as u64, faqs as u64))
    }
}

async fn insert_category(conn: &mut PgConnection, name: &str) -> Result<FaqCategory, sqlx::Error> {
    sqlx::query_as::<_, FaqCategory>(
        "INSERT INTO faq_categories (id, name) VALUES ($1, $2) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .fetch_one(conn)
    .await
}

async fn insert_faq(
    conn: &mut PgConnection,
    category_id: Uuid,
    data: &NewFaq,
) -> Result<Faq, sqlx::Error> {
    sqlx::query_as::<_, Faq>(
        "INSERT INTO faqs (id, category_id, question, answer) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(category_id)
    .bind(&data.question)
    .bind(&data.answer)
    .fetch_one(conn)
    .await
}
