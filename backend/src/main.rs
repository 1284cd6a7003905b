use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use family_ledger::config::{AppConfig, StorageBackend};
use family_ledger::storage::{Connection, CsvConnection, MemoryConnection};
use family_ledger::{create_router, initialize_backend};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .with_context(|| format!("Invalid log filter {:?}", config.log_filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match config.storage {
        StorageBackend::Csv => {
            info!("Using CSV storage in {}", config.data_directory.display());
            let connection = CsvConnection::new(&config.data_directory)?;
            serve(Arc::new(connection), &config).await
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; data is lost on exit");
            serve(Arc::new(MemoryConnection::new()), &config).await
        }
    }
}

async fn serve<C: Connection>(connection: Arc<C>, config: &AppConfig) -> Result<()> {
    let app_state = initialize_backend(connection, config);
    let app = create_router(app_state, config)?;

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
