//! mention-search: prefix lookup service for user and channel mentions
//!
//! This is the main entry point for the application.

use anyhow::{Context, Result};
use mention_search::{
    config::{self, Settings},
    store::StoreLoader,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration before logging so `general.debug` can pick the level
    let settings_path = config::find_settings_file();
    let settings = Settings::load(settings_path.as_deref())?;

    let default_level = if settings.general.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    info!("Starting mention-search v{}", mention_search::VERSION);
    match settings_path {
        Some(ref path) => info!("Loaded settings from: {}", path.display()),
        None => info!("No settings file found, using defaults"),
    }
    info!("Loaded configuration for instance: {}", settings.general.instance_name);

    // Connect the document store
    let store = StoreLoader::load(&settings.store)?;

    // Create application state
    let state = AppState::new(settings.clone(), store);
    info!("Application state initialized");

    // Create router
    let app = create_router(state);

    // Bind address
    let addr = SocketAddr::new(
        settings
            .server
            .bind_address
            .parse()
            .context("invalid bind address")?,
        settings.server.port,
    );

    info!("Starting server on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolve on Ctrl-C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
