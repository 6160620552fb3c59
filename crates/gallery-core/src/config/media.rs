//! External media namespace (Cloudinary) configuration.

use serde::{Deserialize, Serialize};

/// Media-hosting provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Provider name. Only `"cloudinary"` is supported by the server.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// API base URL, without the cloud name.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Cloud name.
    #[serde(default)]
    pub cloud_name: String,
    /// API key.
    #[serde(default)]
    pub api_key: String,
    /// API secret.
    #[serde(default)]
    pub api_secret: String,
    /// Number of assets requested per search page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Extra attempts for a failed sub-folder listing before giving up.
    #[serde(default = "default_list_retries")]
    pub list_retries: u32,
    /// Per-request deadline in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: default_base_url(),
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            page_size: default_page_size(),
            list_retries: default_list_retries(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_provider() -> String {
    "cloudinary".to_string()
}

fn default_base_url() -> String {
    "https://api.cloudinary.com/v1_1".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_list_retries() -> u32 {
    2
}

fn default_timeout() -> u64 {
    30
}
