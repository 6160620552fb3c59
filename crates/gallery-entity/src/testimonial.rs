//! Client testimonials.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A published testimonial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Testimonial {
    /// Surrogate identifier.
    pub id: Uuid,
    /// Short heading.
    pub heading: String,
    /// Body text.
    pub details: String,
    /// Author name.
    pub name: String,
    /// Occasion photographed.
    pub occasion: String,
    /// Date, as written in the source document.
    pub date: String,
    /// Optional portrait or event image.
    pub image_url: Option<String>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to insert a testimonial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTestimonial {
    /// Short heading.
    pub heading: String,
    /// Body text.
    pub details: String,
    /// Author name.
    pub name: String,
    /// Occasion photographed.
    pub occasion: String,
    /// Date.
    pub date: String,
    /// Optional image.
    pub image_url: Option<String>,
}
