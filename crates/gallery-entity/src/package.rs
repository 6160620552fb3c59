//! Photography packages and addons.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A bookable package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Package {
    /// Surrogate identifier.
    pub id: Uuid,
    /// Package name.
    pub name: String,
    /// Who the package suits.
    pub ideal_for: Option<String>,
    /// What the package includes.
    pub includes: Option<String>,
    /// Price in AUD.
    pub price_aud: Option<f64>,
    /// Image reference.
    pub image: Option<String>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to insert a package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPackage {
    /// Package name.
    pub name: String,
    /// Who the package suits.
    pub ideal_for: Option<String>,
    /// What the package includes.
    pub includes: Option<String>,
    /// Price in AUD.
    pub price_aud: Option<f64>,
    /// Image reference.
    pub image: Option<String>,
}

/// An addon, either attached to a package or standalone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Addon {
    /// Surrogate identifier.
    pub id: Uuid,
    /// Addon name.
    pub name: String,
    /// Price in AUD.
    pub price_aud: Option<f64>,
    /// Pricing unit (e.g. "per hour").
    pub unit: Option<String>,
    /// Delivery description.
    pub delivery: Option<String>,
    /// Owning package; `None` for standalone addons.
    pub package_id: Option<Uuid>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
}

impl Addon {
    /// Whether the addon is sold on its own.
    pub fn is_standalone(&self) -> bool {
        self.package_id.is_none()
    }
}

/// Data required to insert an addon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAddon {
    /// Addon name.
    pub name: String,
    /// Price in AUD.
    pub price_aud: Option<f64>,
    /// Pricing unit.
    pub unit: Option<String>,
    /// Delivery description.
    pub delivery: Option<String>,
    /// Owning package.
    pub package_id: Option<Uuid>,
}
