//! In-memory catalog store.
//!
//! Enforces the same uniqueness and reference rules as the PostgreSQL
//! schema. Each call holds a single lock for its whole duration, so replace
//! operations are atomic.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_entity::faq::{Faq, FaqCategory, NewFaqCategory};
use gallery_entity::folder::{EventDetails, Folder, FolderEdge, NewFolder};
use gallery_entity::image::{Image, NewImage};
use gallery_entity::package::{Addon, NewAddon, NewPackage, Package};
use gallery_entity::testimonial::{NewTestimonial, Testimonial};

use crate::store::{CatalogCounts, ContentCatalog, FaqReplace, MediaCatalog, PackageReplace};

#[derive(Debug, Default)]
struct CatalogState {
    folders: HashMap<Uuid, Folder>,
    folder_paths: HashMap<String, Uuid>,
    edges: Vec<FolderEdge>,
    images: HashMap<String, Image>,
    packages: Vec<Package>,
    addons: Vec<Addon>,
    faq_categories: Vec<FaqCategory>,
    faqs: Vec<Faq>,
    testimonials: Vec<Testimonial>,
}

/// In-memory catalog store.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalogStore {
    state: Arc<Mutex<CatalogState>>,
    /// Names whose insert is refused, used to exercise row failures.
    rejected_names: Arc<HashSet<String>>,
}

impl MemoryCatalogStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that refuses to insert any package, addon,
    /// FAQ category or testimonial with one of the given names.
    pub fn rejecting<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            state: Arc::default(),
            rejected_names: Arc::new(names.into_iter().map(Into::into).collect()),
        }
    }

    fn check_name(&self, table: &str, name: &str) -> AppResult<()> {
        if self.rejected_names.contains(name) {
            return Err(AppError::database(format!(
                "insert into {table} rejected for '{name}'"
            )));
        }
        Ok(())
    }

    /// All folders, ordered by path.
    pub async fn folders(&self) -> Vec<Folder> {
        let state = self.state.lock().await;
        let mut folders: Vec<Folder> = state.folders.values().cloned().collect();
        folders.sort_by(|a, b| a.cloudinary_path.cmp(&b.cloudinary_path));
        folders
    }

    /// All hierarchy edges in insertion order.
    pub async fn edges(&self) -> Vec<FolderEdge> {
        self.state.lock().await.edges.clone()
    }

    /// All images, ordered by asset id.
    pub async fn images(&self) -> Vec<Image> {
        let state = self.state.lock().await;
        let mut images: Vec<Image> = state.images.values().cloned().collect();
        images.sort_by(|a, b| a.cloudinary_asset_id.cmp(&b.cloudinary_asset_id));
        images
    }

    /// All packages in insertion order.
    pub async fn packages(&self) -> Vec<Package> {
        self.state.lock().await.packages.clone()
    }

    /// All addons in insertion order.
    pub async fn addons(&self) -> Vec<Addon> {
        self.state.lock().await.addons.clone()
    }

    /// All FAQ categories in insertion order.
    pub async fn faq_categories(&self) -> Vec<FaqCategory> {
        self.state.lock().await.faq_categories.clone()
    }

    /// All FAQ entries in insertion order.
    pub async fn faqs(&self) -> Vec<Faq> {
        self.state.lock().await.faqs.clone()
    }

    /// All testimonials in insertion order.
    pub async fn testimonials(&self) -> Vec<Testimonial> {
        self.state.lock().await.testimonials.clone()
    }

    /// Count rows in every table.
    pub async fn counts(&self) -> CatalogCounts {
        let state = self.state.lock().await;
        CatalogCounts {
            folders: state.folders.len() as u64,
            event_folders: state.folders.values().filter(|f| f.is_event_folder).count() as u64,
            images: state.images.len() as u64,
            packages: state.packages.len() as u64,
            addons: state.addons.len() as u64,
            faq_categories: state.faq_categories.len() as u64,
            faqs: state.faqs.len() as u64,
            testimonials: state.testimonials.len() as u64,
        }
    }
}

#[async_trait]
impl MediaCatalog for MemoryCatalogStore {
    async fn create_or_get_folder(&self, data: &NewFolder) -> AppResult<(Folder, bool)> {
        let mut state = self.state.lock().await;
        if let Some(existing) = state
            .folder_paths
            .get(&data.cloudinary_path)
            .and_then(|id| state.folders.get(id))
        {
            return Ok((existing.clone(), false));
        }

        let now = Utc::now();
        let folder = Folder {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            cloudinary_path: data.cloudinary_path.clone(),
            is_event_folder: false,
            event_name: None,
            event_date: None,
            created_at: now,
            updated_at: now,
        };
        state
            .folder_paths
            .insert(folder.cloudinary_path.clone(), folder.id);
        state.folders.insert(folder.id, folder.clone());
        Ok((folder, true))
    }

    async fn link_folders(&self, parent_id: Uuid, folder_id: Uuid) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        if !state.folders.contains_key(&parent_id) || !state.folders.contains_key(&folder_id) {
            return Err(AppError::database(format!(
                "folder_hierarchy references a missing folder ({parent_id} -> {folder_id})"
            )));
        }
        if state
            .edges
            .iter()
            .any(|e| e.parent_folder_id == parent_id && e.folder_id == folder_id)
        {
            return Ok(false);
        }
        state.edges.push(FolderEdge {
            id: Uuid::new_v4(),
            parent_folder_id: parent_id,
            folder_id,
        });
        Ok(true)
    }

    async fn image_exists(&self, asset_id: &str) -> AppResult<bool> {
        Ok(self.state.lock().await.images.contains_key(asset_id))
    }

    async fn mark_event_folder(&self, folder_id: Uuid, details: &EventDetails) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let folder = state
            .folders
            .get_mut(&folder_id)
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))?;
        folder.is_event_folder = true;
        folder.event_name = details.event_name.clone();
        folder.event_date = details.event_date.clone();
        folder.updated_at = Utc::now();
        Ok(())
    }

    async fn insert_image(&self, data: &NewImage) -> AppResult<Image> {
        let mut state = self.state.lock().await;
        if state.images.contains_key(&data.cloudinary_asset_id) {
            return Err(AppError::conflict(format!(
                "Image with asset id '{}' already exists",
                data.cloudinary_asset_id
            )));
        }
        if !state.folders.contains_key(&data.folder_id) {
            return Err(AppError::database(format!(
                "images references missing folder {}",
                data.folder_id
            )));
        }

        let now = Utc::now();
        let image = Image {
            id: Uuid::new_v4(),
            cloudinary_asset_id: data.cloudinary_asset_id.clone(),
            cloudinary_filename: data.cloudinary_filename.clone(),
            cloudinary_display_name: data.cloudinary_display_name.clone(),
            cloudinary_format: data.cloudinary_format.clone(),
            cloudinary_created_at: data.cloudinary_created_at,
            cloudinary_image_url: data.cloudinary_image_url.clone(),
            folder_id: data.folder_id,
            created_at: now,
            updated_at: now,
        };
        state
            .images
            .insert(image.cloudinary_asset_id.clone(), image.clone());
        Ok(image)
    }
}

#[async_trait]
impl ContentCatalog for MemoryCatalogStore {
    async fn replace_testimonials(&self, rows: &[NewTestimonial]) -> AppResult<Vec<Testimonial>> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let mut inserted = Vec::with_capacity(rows.len());
        for row in rows {
            self.check_name("testimonials", &row.name)?;
            inserted.push(Testimonial {
                id: Uuid::new_v4(),
                heading: row.heading.clone(),
                details: row.details.clone(),
                name: row.name.clone(),
                occasion: row.occasion.clone(),
                date: row.date.clone(),
                image_url: row.image_url.clone(),
                created_at: now,
            });
        }
        state.testimonials = inserted.clone();
        Ok(inserted)
    }

    async fn replace_packages(
        &self,
        packages: &[NewPackage],
        addons: &[NewAddon],
    ) -> AppResult<PackageReplace> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let mut outcome = PackageReplace::default();

        for package in packages {
            if self.check_name("packages", &package.name).is_err() {
                outcome.failed += 1;
                continue;
            }
            outcome.packages.push(Package {
                id: Uuid::new_v4(),
                name: package.name.clone(),
                ideal_for: package.ideal_for.clone(),
                includes: package.includes.clone(),
                price_aud: package.price_aud,
                image: package.image.clone(),
                created_at: now,
            });
        }

        for addon in addons {
            let dangling = addon
                .package_id
                .is_some_and(|id| !outcome.packages.iter().any(|p| p.id == id));
            if dangling || self.check_name("addons", &addon.name).is_err() {
                outcome.failed += 1;
                continue;
            }
            outcome.addons.push(Addon {
                id: Uuid::new_v4(),
                name: addon.name.clone(),
                price_aud: addon.price_aud,
                unit: addon.unit.clone(),
                delivery: addon.delivery.clone(),
                package_id: addon.package_id,
                created_at: now,
            });
        }

        state.packages = outcome.packages.clone();
        state.addons = outcome.addons.clone();
        Ok(outcome)
    }

    async fn replace_faqs(&self, categories: &[NewFaqCategory]) -> AppResult<FaqReplace> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let mut outcome = FaqReplace::default();

        for category in categories {
            if self.check_name("faq_categories", &category.name).is_err() {
                outcome.failed += 1;
                continue;
            }
            let row = FaqCategory {
                id: Uuid::new_v4(),
                name: category.name.clone(),
                created_at: now,
            };
            for faq in &category.faqs {
                outcome.faqs.push(Faq {
                    id: Uuid::new_v4(),
                    category_id: row.id,
                    question: faq.question.clone(),
                    answer: faq.answer.clone(),
                    created_at: now,
                });
            }
            outcome.categories.push(row);
        }

        state.faq_categories = outcome.categories.clone();
        state.faqs = outcome.faqs.clone();
        Ok(outcome)
    }
}
