//! # Cache Inspection HTTP Server
//!
//! An HTTP front for a managed Redis cache, exposing two endpoints:
//!
//! - **`/InspectCache`**: returns the value stored under `cachekey`, or a JSON
//!   listing of every key when no key is given.
//! - **`/SetCache`**: writes `value` under `cachekey` and returns the value read
//!   back from the cache.
//!
//! The connection string (`CACHE_CONNSTR`) is resolved once at startup; each
//! request opens its own TLS session to the cache and releases it when the
//! request completes.

mod cache_logic;

use anyhow::Context;
use clap::Parser;
use lib_common::configs::config_cache::ConnectionDescriptor;
use lib_common::connections::cache_redis::CacheHandler;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cache_logic::config::AppConfig;
use cache_logic::state::AppState;

#[tokio::main]
/// # Main Entry Point
///
/// 1.  Loads `.env` and initializes the `tracing` subscriber.
/// 2.  Parses configuration and resolves the cache connection string (fails fast).
/// 3.  Builds the cache connector and the `axum` router.
/// 4.  Serves until Ctrl-C.
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set global default tracing subscriber")?;

    // Explicitly install the default crypto provider for rustls
    let _ = rustls::crypto::ring::default_provider().install_default();

    let app_config = AppConfig::parse();
    let descriptor = ConnectionDescriptor::resolve(app_config.cache_connstr.as_deref())
        .context("Invalid cache connection string")?;
    info!(
        "Configuration loaded: cache {} (tls: {}, password hidden), Port: {}",
        descriptor.endpoint(),
        descriptor.tls,
        app_config.port
    );

    let connector = CacheHandler::new(
        &descriptor,
        Duration::from_secs(app_config.connect_timeout_secs),
    )
    .context("Failed to build cache client")?;

    let app = cache_logic::router(AppState::new(Arc::new(connector)));

    let addr = SocketAddr::from(([0, 0, 0, 0], app_config.port));
    info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
