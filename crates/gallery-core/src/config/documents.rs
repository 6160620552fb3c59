//! Document store configuration.

use serde::{Deserialize, Serialize};

/// Object storage holding the JSON catalog documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsConfig {
    /// Provider name: `"supabase"` or `"s3"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Bucket holding the documents. Every importer requires it.
    #[serde(default)]
    pub bucket: Option<String>,
    /// Per-request deadline in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Supabase storage settings.
    #[serde(default)]
    pub supabase: SupabaseConfig,
    /// S3-compatible storage settings.
    #[serde(default)]
    pub s3: S3Config,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            bucket: None,
            timeout_seconds: default_timeout(),
            supabase: SupabaseConfig::default(),
            s3: S3Config::default(),
        }
    }
}

impl DocumentsConfig {
    /// The configured bucket, treating a blank value as unset.
    pub fn bucket(&self) -> Option<&str> {
        self.bucket
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
    }
}

/// Supabase storage settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    #[serde(default)]
    pub url: String,
    /// Service role key used as bearer token.
    #[serde(default)]
    pub service_key: String,
}

/// S3-compatible object storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// Endpoint URL (for non-AWS services such as Supabase or MinIO).
    #[serde(default)]
    pub endpoint: String,
    /// Region.
    #[serde(default = "default_region")]
    pub region: String,
    /// Access key ID.
    #[serde(default)]
    pub access_key: String,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: String,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            region: default_region(),
            access_key: String::new(),
            secret_key: String::new(),
        }
    }
}

fn default_provider() -> String {
    "supabase".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_region() -> String {
    "us-east-1".to_string()
}
