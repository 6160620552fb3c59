//! Catalog database configuration.

use serde::{Deserialize, Serialize};

/// PostgreSQL pool settings for the catalog store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL. `DATABASE_URL` overrides it.
    #[serde(default)]
    pub url: String,
    /// Name reported to the server in `pg_stat_activity`.
    #[serde(default = "default_application_name")]
    pub application_name: String,
    /// Pool size upper bound.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connections kept open while idle.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Seconds to wait for a free connection.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Seconds before an idle connection is closed.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            application_name: default_application_name(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_seconds: default_connect_timeout(),
            idle_timeout_seconds: default_idle_timeout(),
        }
    }
}

fn default_application_name() -> String {
    "gallery-sync".to_string()
}

// A sync run is sequential; a handful of connections covers the scheduler
// and an overlapping CLI invocation.
fn default_max_connections() -> u32 {
    5
}

fn default_min_connections() -> u32 {
    0
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    300
}
