//! Catalog store traits and the PostgreSQL implementation.
//!
//! The sync engine writes only through these traits. Every method is atomic
//! on its own; the replace methods run their delete and inserts in a single
//! transaction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use gallery_core::result::AppResult;
use gallery_entity::faq::NewFaqCategory;
use gallery_entity::folder::{EventDetails, Folder, NewFolder};
use gallery_entity::image::{Image, NewImage};
use gallery_entity::package::{NewAddon, NewPackage};
use gallery_entity::testimonial::{NewTestimonial, Testimonial};

pub use crate::repositories::{FaqReplace, PackageReplace};
use crate::repositories::{
    FaqRepository, FolderRepository, ImageRepository, PackageRepository, TestimonialRepository,
};

/// Writes performed by the folder/image reconciler.
#[async_trait]
pub trait MediaCatalog: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a folder or return the existing row for its path.
    ///
    /// Never fails with a conflict; the flag is `true` when the row was
    /// created by this call.
    async fn create_or_get_folder(&self, data: &NewFolder) -> AppResult<(Folder, bool)>;

    /// Record a parent/child edge, ignoring an existing one.
    ///
    /// Returns `true` when a new edge was written.
    async fn link_folders(&self, parent_id: Uuid, folder_id: Uuid) -> AppResult<bool>;

    /// Whether an image with this provider asset id is already stored.
    async fn image_exists(&self, asset_id: &str) -> AppResult<bool>;

    /// Flag a folder as an event folder with the given metadata.
    async fn mark_event_folder(&self, folder_id: Uuid, details: &EventDetails) -> AppResult<()>;

    /// Insert an image. A duplicate asset id is a conflict error.
    async fn insert_image(&self, data: &NewImage) -> AppResult<Image>;
}

/// Replace-wholesale writes performed by the document importers.
#[async_trait]
pub trait ContentCatalog: Send + Sync + std::fmt::Debug + 'static {
    /// Delete every testimonial and insert `rows`; all or nothing.
    async fn replace_testimonials(&self, rows: &[NewTestimonial]) -> AppResult<Vec<Testimonial>>;

    /// Delete every addon and package, then insert the given ones.
    ///
    /// Individual row failures are skipped and counted.
    async fn replace_packages(
        &self,
        packages: &[NewPackage],
        addons: &[NewAddon],
    ) -> AppResult<PackageReplace>;

    /// Delete every FAQ and category, then insert the given ones.
    ///
    /// Individual row failures are skipped and counted.
    async fn replace_faqs(&self, categories: &[NewFaqCategory]) -> AppResult<FaqReplace>;
}

/// Row counts per catalog table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCounts {
    /// Folders.
    pub folders: u64,
    /// Folders flagged as events.
    pub event_folders: u64,
    /// Images.
    pub images: u64,
    /// Packages.
    pub packages: u64,
    /// Addons.
    pub addons: u64,
    /// FAQ categories.
    pub faq_categories: u64,
    /// FAQ entries.
    pub faqs: u64,
    /// Testimonials.
    pub testimonials: u64,
}

/// PostgreSQL catalog store composed of the table repositories.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    folders: FolderRepository,
    images: ImageRepository,
    packages: PackageRepository,
    faqs: FaqRepository,
    testimonials: TestimonialRepository,
}

impl PgCatalogStore {
    /// Create a store over a connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            folders: FolderRepository::new(pool.clone()),
            images: ImageRepository::new(pool.clone()),
            packages: PackageRepository::new(pool.clone()),
            faqs: FaqRepository::new(pool.clone()),
            testimonials: TestimonialRepository::new(pool),
        }
    }

    /// Count rows in every catalog table.
    pub async fn counts(&self) -> AppResult<CatalogCounts> {
        let (packages, addons) = self.packages.count().await?;
        let (faq_categories, faqs) = self.faqs.count().await?;
        Ok(CatalogCounts {
            folders: self.folders.count().await?,
            event_folders: self.folders.count_events().await?,
            images: self.images.count().await?,
            packages,
            addons,
            faq_categories,
            faqs,
            testimonials: self.testimonials.count().await?,
        })
    }
}

#[async_trait]
impl MediaCatalog for PgCatalogStore {
    async fn create_or_get_folder(&self, data: &NewFolder) -> AppResult<(Folder, bool)> {
        self.folders.create_or_get(data).await
    }

    async fn link_folders(&self, parent_id: Uuid, folder_id: Uuid) -> AppResult<bool> {
        self.folders.link(parent_id, folder_id).await
    }

    async fn image_exists(&self, asset_id: &str) -> AppResult<bool> {
        self.images.exists_by_asset_id(asset_id).await
    }

    async fn mark_event_folder(&self, folder_id: Uuid, details: &EventDetails) -> AppResult<()> {
        self.folders.mark_event(folder_id, details).await
    }

    async fn insert_image(&self, data: &NewImage) -> AppResult<Image> {
        self.images.create(data).await
    }
}

#[async_trait]
impl ContentCatalog for PgCatalogStore {
    async fn replace_testimonials(&self, rows: &[NewTestimonial]) -> AppResult<Vec<Testimonial>> {
        self.testimonials.replace_all(rows).await
    }

    async fn replace_packages(
        &self,
        packages: &[NewPackage],
        addons: &[NewAddon],
    ) -> AppResult<PackageReplace> {
        self.packages.replace_all(packages, addons).await
    }

    async fn replace_faqs(&self, categories: &[NewFaqCategory]) -> AppResult<FaqReplace> {
        self.faqs.replace_all(categories).await
    }
}
