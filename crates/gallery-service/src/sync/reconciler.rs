//! Folder and image reconciler.
//!
//! Walks the external namespace depth-first from each root path and
//! mirrors every visited folder, parent/child edge and asset into the
//! catalog. Existing rows are never modified except for the event-folder
//! flag set by a cover asset.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use gallery_core::config::{MediaConfig, SyncConfig};
use gallery_core::result::AppResult;
use gallery_core::traits::{Asset, NamespaceClient};
use gallery_database::store::MediaCatalog;
use gallery_entity::folder::{EventDetails, NewFolder};
use gallery_entity::image::NewImage;

/// Counters collected over one reconcile run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileStats {
    /// Folders visited by the walk.
    pub folders_visited: usize,
    /// Folders created in the catalog.
    pub folders_created: usize,
    /// Parent/child edges created.
    pub edges_created: usize,
    /// Images inserted.
    pub images_inserted: usize,
    /// Assets already present and left alone.
    pub images_skipped: usize,
    /// Folders flagged as event folders by a cover asset.
    pub event_folders_marked: usize,
    /// Sub-folder listings that failed after all retries.
    pub listing_failures: usize,
    /// Folders beyond the depth bound that were not visited.
    pub depth_limited: usize,
}

#[derive(Debug)]
struct Pending {
    path: String,
    parent: Option<Uuid>,
    depth: usize,
}

/// Mirrors the media namespace tree into the catalog.
#[derive(Debug, Clone)]
pub struct FolderReconciler {
    namespace: Arc<dyn NamespaceClient>,
    catalog: Arc<dyn MediaCatalog>,
    page_size: u32,
    list_retries: u32,
    max_depth: usize,
}

impl FolderReconciler {
    /// Creates a new reconciler.
    pub fn new(
        namespace: Arc<dyn NamespaceClient>,
        catalog: Arc<dyn MediaCatalog>,
        media: &MediaConfig,
        sync: &SyncConfig,
    ) -> Self {
        Self {
            namespace,
            catalog,
            page_size: media.page_size.max(1),
            list_retries: media.list_retries,
            max_depth: sync.max_depth,
        }
    }

    /// Reconcile every root path in order.
    ///
    /// Sub-folder listing failures are logged and read as "no children".
    /// Asset listing and store failures abort the run.
    pub async fn reconcile(&self, roots: &[String]) -> AppResult<ReconcileStats> {
        let mut stats = ReconcileStats::default();
        if roots.is_empty() {
            warn!("No root folders configured, skipping folder sync");
            return Ok(stats);
        }

        for root in roots {
            info!(root = %root, "Reconciling folder tree");
            self.sync_tree(root, &mut stats).await?;
        }

        info!(
            folders_visited = stats.folders_visited,
            folders_created = stats.folders_created,
            images_inserted = stats.images_inserted,
            images_skipped = stats.images_skipped,
            event_folders_marked = stats.event_folders_marked,
            listing_failures = stats.listing_failures,
            "Folder reconcile complete"
        );
        Ok(stats)
    }

    /// Pre-order walk using an explicit stack. Children are pushed in
    /// reverse so they pop in listing order.
    async fn sync_tree(&self, root: &str, stats: &mut ReconcileStats) -> AppResult<()> {
        let mut stack = vec![Pending {
            path: root.to_string(),
            parent: None,
            depth: 0,
        }];

        while let Some(Pending {
            path,
            parent,
            depth,
        }) = stack.pop()
        {
            if depth > self.max_depth {
                warn!(path = %path, depth, max_depth = self.max_depth, "Folder exceeds depth bound, not visited");
                stats.depth_limited += 1;
                continue;
            }

            let children = self.list_children(&path, stats).await;
            let folder_id = self.upsert_folder(&path, parent, stats).await?;
            self.sync_images(&path, folder_id, stats).await?;
            stats.folders_visited += 1;

            stack.extend(children.into_iter().rev().map(|child| Pending {
                path: child,
                parent: Some(folder_id),
                depth: depth + 1,
            }));
        }
        Ok(())
    }

    async fn list_children(&self, path: &str, stats: &mut ReconcileStats) -> Vec<String> {
        let mut attempt = 0;
        loop {
            match self.namespace.list_subfolders(path).await {
                Ok(children) => return children,
                Err(e) if attempt < self.list_retries => {
                    attempt += 1;
                    debug!(path, attempt, error = %e, "Retrying sub-folder listing");
                }
                Err(e) => {
                    warn!(path, error = %e, "Sub-folder listing failed, treating as leaf");
                    stats.listing_failures += 1;
                    return Vec::new();
                }
            }
        }
    }

    async fn upsert_folder(
        &self,
        path: &str,
        parent: Option<Uuid>,
        stats: &mut ReconcileStats,
    ) -> AppResult<Uuid> {
        let (folder, created) = self
            .catalog
            .create_or_get_folder(&NewFolder::from_path(path))
            .await?;
        if created {
            debug!(path, id = %folder.id, "Folder created");
            stats.folders_created += 1;
        }

        if let Some(parent_id) = parent {
            if self.catalog.link_folders(parent_id, folder.id).await? {
                stats.edges_created += 1;
            }
        }
        Ok(folder.id)
    }

    async fn sync_images(
        &self,
        path: &str,
        folder_id: Uuid,
        stats: &mut ReconcileStats,
    ) -> AppResult<()> {
        let mut cursor: Option<String> = None;
        loop {
            let page = self
                .namespace
                .list_assets(path, cursor.as_deref(), self.page_size)
                .await?;

            for asset in &page.assets {
                self.sync_asset(asset, folder_id, stats).await?;
            }

            match page.next_cursor.filter(|c| !c.is_empty()) {
                Some(next) => cursor = Some(next),
                None => return Ok(()),
            }
        }
    }

    async fn sync_asset(
        &self,
        asset: &Asset,
        folder_id: Uuid,
        stats: &mut ReconcileStats,
    ) -> AppResult<()> {
        if self.catalog.image_exists(&asset.asset_id).await? {
            stats.images_skipped += 1;
            return Ok(());
        }

        if is_cover(asset.display_name.as_deref()) {
            let details = EventDetails {
                event_name: asset.context_value("event_name").map(str::to_string),
                event_date: asset.context_value("event_date").map(str::to_string),
            };
            self.catalog.mark_event_folder(folder_id, &details).await?;
            info!(
                folder_id = %folder_id,
                asset_id = %asset.asset_id,
                event_name = ?details.event_name,
                "Folder marked as event folder"
            );
            stats.event_folders_marked += 1;
        }

        self.catalog
            .insert_image(&NewImage {
                cloudinary_asset_id: asset.asset_id.clone(),
                cloudinary_filename: asset.filename.clone(),
                cloudinary_display_name: asset.display_name.clone(),
                cloudinary_format: asset.format.clone(),
                cloudinary_created_at: asset.created_at,
                cloudinary_image_url: asset.url.clone(),
                folder_id,
            })
            .await?;
        stats.images_inserted += 1;
        Ok(())
    }
}

/// Whether an asset's display name marks its folder as an event folder:
/// the final `/` segment starts with "cover", ignoring case.
pub fn is_cover(display_name: Option<&str>) -> bool {
    display_name
        .and_then(|name| name.rsplit('/').next())
        .is_some_and(|last| last.to_lowercase().starts_with("cover"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_cover() {
        assert!(is_cover(Some("Covers/COVER_shot.jpg")));
        assert!(is_cover(Some("cover")));
        assert!(is_cover(Some("Cover-2024")));
        assert!(!is_cover(Some("Covers/shot.jpg")));
        assert!(!is_cover(Some("discover")));
        assert!(!is_cover(None));
    }
}
