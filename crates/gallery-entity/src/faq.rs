//! FAQ categories and entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A group of FAQs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FaqCategory {
    /// Surrogate identifier.
    pub id: Uuid,
    /// Category name.
    pub name: String,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
}

/// A question/answer pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Faq {
    /// Surrogate identifier.
    pub id: Uuid,
    /// Owning category.
    pub category_id: Uuid,
    /// Question text.
    pub question: String,
    /// Answer text.
    pub answer: String,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
}

/// A category to insert along with its entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFaqCategory {
    /// Category name.
    pub name: String,
    /// Entries belonging to the category.
    pub faqs: Vec<NewFaq>,
}

/// A question/answer pair to insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFaq {
    /// Question text.
    pub question: String,
    /// Answer text.
    pub answer: String,
}
