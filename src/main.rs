//! LAN Drop Server
//!
//! Relays files between devices on the same local network. Clients upload
//! files under a session ID; any other client that knows the session ID can
//! list and download them.

use std::net::{IpAddr, SocketAddr};

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lan_drop_server::config::Config;
use lan_drop_server::network;
use lan_drop_server::retention;
use lan_drop_server::routes;
use lan_drop_server::sessions::SessionRegistry;
use lan_drop_server::state::AppState;
use lan_drop_server::storage::BlobStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "lan_drop_server=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        Config::default()
    });

    tracing::info!("Starting LAN Drop Server v{}", env!("CARGO_PKG_VERSION"));

    let blob_store = BlobStore::new(config.storage.upload_dir.clone());
    blob_store.ensure_dir().await.with_context(|| {
        format!(
            "Failed to create upload directory {}",
            config.storage.upload_dir.display()
        )
    })?;
    tracing::info!("Storing uploads in {}", config.storage.upload_dir.display());

    let registry = SessionRegistry::new();

    let host = network::advertised_host(&config.server);
    let public_url = network::public_base_url(&host, config.server.port);

    let _sweeper = retention::start_sweeper(&config.retention, registry.clone(), blob_store.clone());

    let ip: IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.server.host))?;
    let addr = SocketAddr::new(ip, config.server.port);

    let app_state = AppState::new(config.clone(), blob_store, registry, public_url.clone());
    let app = routes::app(app_state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server running on {}", addr);
    tracing::info!("Local access:  {}", network::local_url(config.server.port));
    tracing::info!("Mobile access: {}", public_url);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
