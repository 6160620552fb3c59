//! Configuration inspection commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use gallery_core::config::mask_password;
use gallery_core::error::AppError;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration with secrets masked
    Show,
    /// Load the configuration and report what each stage will use
    Validate,
}

/// Execute config commands
pub async fn execute(args: &ConfigArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let config = super::load_config(env)?;
            output::print_item(&config.masked(), format);
        }
        ConfigCommand::Validate => {
            let config = match super::load_config(env) {
                Ok(config) => config,
                Err(e) => {
                    output::print_error(&format!("Configuration invalid: {e}"));
                    return Err(e);
                }
            };

            output::print_success(&format!("Configuration for '{env}' loaded"));
            output::print_kv("Database", &mask_password(&config.database.url));
            output::print_kv("Media provider", &config.media.provider);
            output::print_kv("Root folders", &config.sync.root_folders.join(", "));
            output::print_kv("Document provider", &config.documents.provider);
            output::print_kv("Bucket", config.documents.bucket().unwrap_or("-"));
            output::print_kv("Failure policy", &config.sync.failure_policy.to_string());
            output::print_kv("Schedule", &config.worker.sync_schedule);

            if config.sync.root_folders.is_empty() {
                output::print_warning("No root folders configured; the folders stage is a no-op");
            }
            if let Err(e) = gallery_media::build_namespace_client(&config.media) {
                output::print_warning(&format!("Folders stage unavailable: {}", e.message));
            }
            if config.documents.bucket().is_none() {
                output::print_warning("No document bucket configured; every import will fail");
            }
            if let Err(e) = gallery_storage::build_document_store(&config.documents).await {
                output::print_warning(&format!("Import stages unavailable: {}", e.message));
            }
        }
    }

    Ok(())
}
