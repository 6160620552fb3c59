//! Gallery sync server.
//!
//! Wires the catalog store, the media and document providers and the sync
//! orchestrator together, then runs the cron scheduler until shutdown.

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use gallery_core::config::{AppConfig, LogFormat};
use gallery_core::error::AppError;
use gallery_database::{DatabasePool, PgCatalogStore};
use gallery_service::SyncOrchestrator;
use gallery_worker::CronScheduler;

#[tokio::main]
async fn main() {
    let env = std::env::var("GALLERY_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting gallery sync v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let pool = DatabasePool::connect(&config.database).await?;
    gallery_database::migration::run_migrations(pool.pool()).await?;
    let store = PgCatalogStore::new(pool.pool().clone());

    // ── Step 2: Providers ────────────────────────────────────────
    // A provider that cannot be built only disables its stages.
    let namespace = gallery_media::build_namespace_client(&config.media);
    match &namespace {
        Ok(client) => tracing::info!(provider = client.provider_type(), "Media namespace ready"),
        Err(e) => tracing::warn!("Media namespace unavailable: {}", e),
    }

    let documents = gallery_storage::build_document_store(&config.documents).await;
    match &documents {
        Ok(client) => tracing::info!(provider = client.provider_type(), "Document store ready"),
        Err(e) => tracing::warn!("Document store unavailable: {}", e),
    }

    // ── Step 3: Orchestrator ─────────────────────────────────────
    let orchestrator = Arc::new(SyncOrchestrator::new(
        &config,
        namespace,
        documents,
        Arc::new(store.clone()),
        Arc::new(store),
    ));

    // ── Step 4: Scheduler ────────────────────────────────────────
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let mut scheduler = if config.worker.enabled {
        let scheduler = CronScheduler::new(Arc::clone(&orchestrator), config.worker.clone()).await?;
        scheduler.register_sync().await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Scheduler disabled; syncs run only through gallery-cli");
        None
    };

    // ── Step 5: Graceful shutdown ────────────────────────────────
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    while !*shutdown_rx.borrow() {
        if shutdown_rx.changed().await.is_err() {
            break;
        }
    }

    if let Some(scheduler) = scheduler.as_mut() {
        scheduler.shutdown().await?;
    }
    pool.close().await;

    tracing::info!("Gallery sync shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
