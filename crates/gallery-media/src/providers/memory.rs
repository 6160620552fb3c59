//! In-memory namespace: a folder tree with assets, paginated by offset.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_core::traits::{Asset, AssetPage, NamespaceClient};

#[derive(Debug, Default)]
struct Node {
    children: Vec<String>,
    assets: Vec<Asset>,
}

#[derive(Debug, Default)]
struct Tree {
    nodes: HashMap<String, Node>,
    /// Remaining sub-folder listing failures per path; `u32::MAX` never recovers.
    subfolder_failures: HashMap<String, u32>,
    asset_failures: HashMap<String, AppError>,
    subfolder_calls: Vec<String>,
    asset_calls: Vec<(String, Option<String>)>,
}

/// Namespace client over an in-memory folder tree.
///
/// Children are listed in insertion order. Asset cursors are decimal
/// offsets into the folder's asset list.
#[derive(Debug, Clone, Default)]
pub struct MemoryNamespace {
    tree: Arc<RwLock<Tree>>,
}

impl MemoryNamespace {
    /// Create an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a folder and every missing ancestor, linking each to its parent.
    pub async fn add_folder(&self, path: &str) {
        let mut tree = self.tree.write().await;
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut current = String::new();
        for segment in segments {
            let parent = current.clone();
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(segment);

            if !tree.nodes.contains_key(&current) {
                tree.nodes.insert(current.clone(), Node::default());
                if !parent.is_empty() {
                    tree.nodes
                        .entry(parent)
                        .or_default()
                        .children
                        .push(current.clone());
                }
            }
        }
    }

    /// Add an asset to a folder, creating the folder if needed.
    pub async fn add_asset(&self, path: &str, asset: Asset) {
        self.add_folder(path).await;
        let mut tree = self.tree.write().await;
        tree.nodes.entry(path.to_string()).or_default().assets.push(asset);
    }

    /// Fail the next `times` sub-folder listings of `path`.
    pub async fn fail_subfolders(&self, path: &str, times: u32) {
        let mut tree = self.tree.write().await;
        tree.subfolder_failures.insert(path.to_string(), times);
    }

    /// Fail every asset listing of `path` with `error`.
    pub async fn fail_assets(&self, path: &str, error: AppError) {
        let mut tree = self.tree.write().await;
        tree.asset_failures.insert(path.to_string(), error);
    }

    /// Paths whose sub-folders were requested, in call order.
    pub async fn subfolder_calls(&self) -> Vec<String> {
        self.tree.read().await.subfolder_calls.clone()
    }

    /// `(path, cursor)` of every asset listing, in call order.
    pub async fn asset_calls(&self) -> Vec<(String, Option<String>)> {
        self.tree.read().await.asset_calls.clone()
    }
}

#[async_trait]
impl NamespaceClient for MemoryNamespace {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn list_subfolders(&self, path: &str) -> AppResult<Vec<String>> {
        let mut tree = self.tree.write().await;
        tree.subfolder_calls.push(path.to_string());

        if let Some(remaining) = tree.subfolder_failures.get_mut(path) {
            if *remaining > 0 {
                if *remaining != u32::MAX {
                    *remaining -= 1;
                }
                return Err(AppError::external(format!(
                    "Listing sub-folders of '{path}' failed"
                )));
            }
        }

        Ok(tree
            .nodes
            .get(path)
            .map(|node| node.children.clone())
            .unwrap_or_default())
    }

    async fn list_assets(
        &self,
        path: &str,
        cursor: Option<&str>,
        page_size: u32,
    ) -> AppResult<AssetPage> {
        let mut tree = self.tree.write().await;
        tree.asset_calls
            .push((path.to_string(), cursor.map(str::to_string)));

        if let Some(error) = tree.asset_failures.get(path) {
            return Err(error.clone());
        }

        let offset = match cursor {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|_| AppError::external(format!("Invalid cursor '{raw}'")))?,
            None => 0,
        };
        let assets = tree
            .nodes
            .get(path)
            .map(|node| node.assets.as_slice())
            .unwrap_or_default();

        let end = offset.saturating_add(page_size.max(1) as usize).min(assets.len());
        let page = assets.get(offset..end).unwrap_or_default().to_vec();
        let next_cursor = (end < assets.len()).then(|| end.to_string());

        Ok(AssetPage {
            assets: page,
            next_cursor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(id: &str) -> Asset {
        Asset {
            asset_id: id.to_string(),
            filename: id.to_string(),
            display_name: None,
            format: Some("jpg".to_string()),
            created_at: None,
            url: format!("https://cdn.example/{id}.jpg"),
            context: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn test_add_folder_links_ancestors() {
        let ns = MemoryNamespace::new();
        ns.add_folder("Events/2024/Wedding").await;
        ns.add_folder("Events/2023").await;

        assert_eq!(
            ns.list_subfolders("Events").await.unwrap(),
            vec!["Events/2024", "Events/2023"]
        );
        assert_eq!(
            ns.list_subfolders("Events/2024").await.unwrap(),
            vec!["Events/2024/Wedding"]
        );
        assert!(ns.list_subfolders("Missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_assets_paginate_by_offset() {
        let ns = MemoryNamespace::new();
        for id in ["a", "b", "c"] {
            ns.add_asset("Events", asset(id)).await;
        }

        let first = ns.list_assets("Events", None, 2).await.unwrap();
        assert_eq!(first.assets.len(), 2);
        assert_eq!(first.next_cursor.as_deref(), Some("2"));

        let second = ns.list_assets("Events", Some("2"), 2).await.unwrap();
        assert_eq!(second.assets.len(), 1);
        assert_eq!(second.assets[0].asset_id, "c");
        assert!(second.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_subfolder_failures_recover() {
        let ns = MemoryNamespace::new();
        ns.add_folder("Events/2024").await;
        ns.fail_subfolders("Events", 1).await;

        assert!(ns.list_subfolders("Events").await.is_err());
        assert_eq!(ns.list_subfolders("Events").await.unwrap().len(), 1);
    }
}
