//! Sync engine configuration.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// How the orchestrator reacts to a failing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// The first failing stage aborts the rest of the run.
    #[default]
    FailFast,
    /// Every stage runs; failures are collected and reported together.
    Isolate,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailFast => write!(f, "fail_fast"),
            Self::Isolate => write!(f, "isolate"),
        }
    }
}

/// Folder/image reconciliation and orchestration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Namespace paths the folder walk starts from.
    ///
    /// Accepts either a list or a single comma-separated string.
    #[serde(default, deserialize_with = "deserialize_root_folders")]
    pub root_folders: Vec<String>,
    /// Maximum folder depth below a root that the walk visits.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Stage failure handling.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            root_folders: Vec::new(),
            max_depth: default_max_depth(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// Split a comma-separated list of root paths, dropping blanks.
pub fn parse_root_folders(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn deserialize_root_folders<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RootFolders {
        Joined(String),
        List(Vec<String>),
    }

    Ok(match RootFolders::deserialize(deserializer)? {
        RootFolders::Joined(raw) => parse_root_folders(&raw),
        RootFolders::List(list) => list
            .iter()
            .flat_map(|entry| parse_root_folders(entry))
            .collect(),
    })
}

fn default_max_depth() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_root_folders_trims_and_drops_blanks() {
        assert_eq!(
            parse_root_folders(" Events , Portraits,, ,Weddings/2024 "),
            vec!["Events", "Portraits", "Weddings/2024"]
        );
        assert!(parse_root_folders("").is_empty());
    }

    #[test]
    fn test_root_folders_accepts_string_or_list() {
        let joined: SyncConfig =
            serde_json::from_value(serde_json::json!({"root_folders": "A, B"})).unwrap();
        assert_eq!(joined.root_folders, vec!["A", "B"]);

        let list: SyncConfig =
            serde_json::from_value(serde_json::json!({"root_folders": ["A", " B "]})).unwrap();
        assert_eq!(list.root_folders, vec!["A", "B"]);
        assert_eq!(list.failure_policy, FailurePolicy::FailFast);
    }

    #[test]
    fn test_failure_policy_snake_case() {
        let cfg: SyncConfig =
            serde_json::from_value(serde_json::json!({"failure_policy": "isolate"})).unwrap();
        assert_eq!(cfg.failure_policy, FailurePolicy::Isolate);
    }
}
