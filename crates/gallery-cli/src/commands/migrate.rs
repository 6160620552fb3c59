//! Database migration commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use gallery_core::error::AppError;
use gallery_database::DatabasePool;
use gallery_database::migration::{self, MigrationStatus};

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Show which migrations have been applied
    Status,
}

#[derive(Debug, Serialize, Tabled)]
struct MigrationRow {
    #[tabled(rename = "Version")]
    version: i64,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

impl From<MigrationStatus> for MigrationRow {
    fn from(m: MigrationStatus) -> Self {
        Self {
            version: m.version,
            description: m.description,
            status: if m.applied { "applied" } else { "pending" },
        }
    }
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let pool = super::create_db_pool(&config).await?;

    let result = run_command(&args.command, &pool, format).await;
    pool.close().await;
    result
}

async fn run_command(
    command: &MigrateCommand,
    pool: &DatabasePool,
    format: OutputFormat,
) -> Result<(), AppError> {
    match command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            migration::run_migrations(pool.pool())
                .await
                .map_err(|e| e.context("Migration failed"))?;
            output::print_success("All migrations applied successfully.");
        }
        MigrateCommand::Status => {
            let rows: Vec<MigrationRow> = migration::migration_status(pool.pool())
                .await?
                .into_iter()
                .map(MigrationRow::from)
                .collect();
            output::print_list(&rows, format);
        }
    }
    Ok(())
}
