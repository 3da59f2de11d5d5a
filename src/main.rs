//! eventdesk server entry point.
//!
//! Loads configuration, reconciles stored counts, and serves the REST
//! API and WebSocket feed until interrupted.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use eventdesk::api;
use eventdesk::app_state::AppState;
use eventdesk::config::{AppConfig, LogFormat, StorageBackend};
use eventdesk::domain::EventBus;
use eventdesk::persistence::{CatalogStore, JsonFileStore, MemoryStore};
use eventdesk::service::RegistrationService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;
    init_tracing(config.log_format);

    tracing::info!(addr = %config.listen_addr, backend = ?config.storage_backend, "starting eventdesk");

    let store: Arc<dyn CatalogStore> = match config.storage_backend {
        StorageBackend::File => Arc::new(JsonFileStore::new(&config.data_dir)),
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
    };
    tracing::info!(store = %store.describe(), "catalog store ready");

    let event_bus = EventBus::new(config.event_bus_capacity);
    let service = Arc::new(RegistrationService::new(store, event_bus));

    match service.reconcile_counts().await {
        Ok(0) => {}
        Ok(fixed) => tracing::warn!(fixed, "reconciled registration counts at startup"),
        Err(e) => tracing::warn!(error = %e, "could not reconcile registration counts"),
    }

    let app = api::build_app(AppState::new(service), config.request_timeout);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
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
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
