//! Folder entities mirrored from the media namespace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A folder of the external namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Surrogate identifier, generated once.
    pub id: Uuid,
    /// Display name (last path segment).
    pub name: String,
    /// Full namespace path, unique and immutable.
    pub cloudinary_path: String,
    /// Set once a cover asset has been seen in the folder.
    pub is_event_folder: bool,
    /// Event name copied from the cover asset's context.
    pub event_name: Option<String>,
    /// Event date copied verbatim from the cover asset's context.
    pub event_date: Option<String>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFolder {
    /// Display name.
    pub name: String,
    /// Full namespace path.
    pub cloudinary_path: String,
}

impl NewFolder {
    /// Build a folder payload from a namespace path; the name is the final
    /// `/` segment.
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        let name = trimmed.rsplit('/').next().unwrap_or(trimmed);
        Self {
            name: name.to_string(),
            cloudinary_path: path.to_string(),
        }
    }
}

/// A directed parent to child edge between two folders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FolderEdge {
    /// Surrogate identifier.
    pub id: Uuid,
    /// Parent folder.
    pub parent_folder_id: Uuid,
    /// Child folder.
    pub folder_id: Uuid,
}

/// Event metadata carried by a cover asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDetails {
    /// Event name.
    pub event_name: Option<String>,
    /// Event date, as written in the asset context.
    pub event_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_last_segment() {
        let folder = NewFolder::from_path("Events/2024/Wedding");
        assert_eq!(folder.name, "Wedding");
        assert_eq!(folder.cloudinary_path, "Events/2024/Wedding");
    }

    #[test]
    fn test_root_path_name() {
        assert_eq!(NewFolder::from_path("Events").name, "Events");
        assert_eq!(NewFolder::from_path("Events/").name, "Events");
    }
}
