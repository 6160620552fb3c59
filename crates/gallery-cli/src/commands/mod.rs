//! CLI command definitions and dispatch.

pub mod config;
pub mod migrate;
pub mod status;
pub mod sync;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use gallery_core::config::AppConfig;
use gallery_core::error::AppError;
use gallery_database::{DatabasePool, PgCatalogStore};
use gallery_service::SyncOrchestrator;

/// Gallery catalog administration
#[derive(Debug, Parser)]
#[command(name = "gallery-cli", version, about, long_about = None)]
pub struct Cli {
    /// Configuration overlay to load from `config/{env}.toml`
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a catalog sync now
    Sync(sync::SyncArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Configuration inspection
    Config(config::ConfigArgs),
    /// Show catalog row counts
    Status,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Sync(args) => sync::execute(args, &self.env, self.format).await,
            Commands::Migrate(args) => migrate::execute(args, &self.env, self.format).await,
            Commands::Config(args) => config::execute(args, &self.env, self.format).await,
            Commands::Status => status::execute(&self.env, self.format).await,
        }
    }
}

/// Helper: load configuration for an environment
pub fn load_config(env: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(env).map_err(|e| e.context("Failed to load config"))
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}

/// Helper: wire the orchestrator against the PostgreSQL catalog.
///
/// Provider build errors are handed to the orchestrator so that only the
/// stages needing the missing provider fail.
pub async fn build_orchestrator(
    config: &AppConfig,
    pool: &DatabasePool,
) -> SyncOrchestrator {
    let store = PgCatalogStore::new(pool.pool().clone());
    let namespace = gallery_media::build_namespace_client(&config.media);
    let documents = gallery_storage::build_document_store(&config.documents).await;

    SyncOrchestrator::new(
        config,
        namespace,
        documents,
        Arc::new(store.clone()),
        Arc::new(store),
    )
}
