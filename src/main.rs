//! imagetoprompt-api: OpenAI-compatible front for the imagetoprompt.app
//! image captioning service
//!
//! Provides endpoints for:
//! - POST /v1/chat/completions - Caption the newest image in a chat conversation
//! - POST /api/generate-from-upload - Caption an uploaded image (multipart)
//! - GET  /v1/models - List configured models
//! - GET  /api/languages - Supported caption languages
//! - GET  / - Browser test page, assets under /static
//!
//! The captioning pipeline is created once at startup and shared by all
//! handlers, so the outbound HTTP clients pool their connections.

use eyre::Context;
use salvo::prelude::*;

mod config;
mod error;
mod state;

mod handlers;
mod router;

mod image;
mod response;
mod service;
mod types;
mod upstream;

use config::{Config, APP_NAME, APP_VERSION};
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imagetoprompt_api=info".into()),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("Starting {} v{}", APP_NAME, APP_VERSION);
    if config.auth_key().is_none() {
        tracing::warn!("API_MASTER_KEY not set, authentication is disabled");
    }

    let port = config.port;
    let state = AppState::new(config).context("Failed to initialize caption service")?;
    let router = router::build_router(state);

    let listen_addr = format!("0.0.0.0:{}", port);
    let acceptor = TcpListener::new(&listen_addr).bind().await;

    tracing::info!("HTTP server listening on http://{}", listen_addr);
    tracing::info!("Web UI available at http://localhost:{}/", port);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /");
    tracing::info!("  GET  /health");
    tracing::info!("  GET  /v1/models");
    tracing::info!("  GET  /api/languages");
    tracing::info!("  POST /v1/chat/completions");
    tracing::info!("  POST /api/generate-from-upload");

    let server = Server::new(acceptor);
    let handle = server.handle();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received, draining connections");
        handle.stop_graceful(None);
    });

    server.serve(router).await;

    tracing::info!("Server stopped");
    Ok(())
}
