//! Application configuration schemas.
//!
//! Configuration is merged from TOML files and environment variables via
//! the `config` crate. Each sub-module represents a logical section.

pub mod database;
pub mod documents;
pub mod import;
pub mod logging;
pub mod media;
pub mod sync;
pub mod worker;

use serde::{Deserialize, Serialize};

pub use self::database::DatabaseConfig;
pub use self::documents::{DocumentsConfig, S3Config, SupabaseConfig};
pub use self::import::{ImportConfig, ImporterConfig};
pub use self::logging::{LogFormat, LoggingConfig};
pub use self::media::MediaConfig;
pub use self::sync::{FailurePolicy, SyncConfig};
pub use self::worker::WorkerConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Top-level deserialization target for `config/default.toml`, the
/// environment overlay, `GALLERY__*` variables and the flat provider
/// variables (`CLOUDINARY_ROOT_FOLDERS`, `SUPABASE_STORAGE_BUCKET`, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Media namespace provider settings.
    #[serde(default)]
    pub media: MediaConfig,
    /// Document store settings.
    #[serde(default)]
    pub documents: DocumentsConfig,
    /// Reconciler and orchestrator settings.
    #[serde(default)]
    pub sync: SyncConfig,
    /// Document importer settings.
    #[serde(default)]
    pub import: ImportConfig,
    /// Scheduler settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Reads `.env` if present, merges `config/default` with the `env`
    /// overlay and `GALLERY__` prefixed variables, then applies the flat
    /// provider variables on top.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("GALLERY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let mut app: AppConfig = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        app.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(app)
    }

    /// Apply the flat provider variables using `lookup` to read them.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |target: &mut String, key: &str| {
            if let Some(value) = lookup(key) {
                *target = value;
            }
        };

        set(&mut self.database.url, "DATABASE_URL");
        set(&mut self.media.cloud_name, "CLOUDINARY_CLOUD_NAME");
        set(&mut self.media.api_key, "CLOUDINARY_API_KEY");
        set(&mut self.media.api_secret, "CLOUDINARY_API_SECRET");
        set(&mut self.documents.supabase.url, "SUPABASE_URL");
        set(
            &mut self.documents.supabase.service_key,
            "SUPABASE_SERVICE_ROLE_KEY",
        );
        set(&mut self.import.testimonials.file, "TESTIMONIALS_JSON_FILE");
        set(&mut self.import.packages.file, "PACKAGES_JSON_FILE");
        set(&mut self.import.faqs.file, "FAQ_JSON_FILE");

        if let Some(roots) = lookup("CLOUDINARY_ROOT_FOLDERS") {
            self.sync.root_folders = sync::parse_root_folders(&roots);
        }
        if let Some(bucket) = lookup("SUPABASE_STORAGE_BUCKET") {
            self.documents.bucket = Some(bucket);
        }
    }

    /// Copy of the configuration with credentials replaced by `****`.
    pub fn masked(&self) -> Self {
        let mut copy = self.clone();
        mask(&mut copy.media.api_secret);
        mask(&mut copy.documents.supabase.service_key);
        mask(&mut copy.documents.s3.secret_key);
        copy.database.url = mask_password(&copy.database.url);
        copy
    }
}

fn mask(value: &mut String) {
    if !value.is_empty() {
        *value = "****".to_string();
    }
}

/// Mask the password portion of a database URL for safe logging.
pub fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
            if colon_pos > scheme_end {
                return format!("{}:****@{}", &url[..colon_pos], &url[at_pos + 1..]);
            }
        }
    }
    url.to_string()
}
