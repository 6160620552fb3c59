//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Scheduled sync configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the scheduler is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Six-field cron expression (with seconds) for the periodic sync.
    #[serde(default = "default_sync_schedule")]
    pub sync_schedule: String,
    /// Run one full sync as soon as the scheduler starts.
    #[serde(default)]
    pub run_on_startup: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sync_schedule: default_sync_schedule(),
            run_on_startup: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_sync_schedule() -> String {
    "0 0 */6 * * *".to_string()
}
