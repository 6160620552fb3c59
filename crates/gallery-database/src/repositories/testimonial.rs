//! Testimonial repository.

use sqlx::PgPool;
use uuid::Uuid;

use gallery_core::error::{AppError, ErrorKind};
use gallery_core::result::AppResult;
use gallery_entity::testimonial::{NewTestimonial, Testimonial};

/// Repository for testimonials.
#[derive(Debug, Clone)]
pub struct TestimonialRepository {
    pool: PgPool,
}

impl TestimonialRepository {
    /// Create a new testimonial repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Replace every testimonial in one transaction.
    ///
    /// Any failing insert rolls the whole replace back.
    pub async fn replace_all(&self, rows: &[NewTestimonial]) -> AppResult<Vec<Testimonial>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("DELETE FROM testimonials")
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete testimonials", e)
            })?;

        let mut inserted = Vec::with_capacity(rows.len());
        for row in rows {
            let testimonial = sqlx::query_as::<_, Testimonial>(
                "INSERT INTO testimonials (id, heading, details, name, occasion, date, image_url) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
            )
            .bind(Uuid::new_v4())
            .bind(&row.heading)
            .bind(&row.details)
            .bind(&row.name)
            .bind(&row.occasion)
            .bind(&row.date)
            .bind(&row.image_url)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to insert testimonial", e)
            })?;
            inserted.push(testimonial);
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit testimonial replace", e)
        })?;

        Ok(inserted)
    }

    /// Count testimonials.
    pub async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM testimonials")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count testimonials", e)
            })?;
        Ok(count as u64)
    }
}
