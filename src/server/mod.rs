//! HTTP interface: scrape API and live websocket feed
//!
//! The server is a collaborator of the scrape core, not part of it: each
//! `POST /api/scrape` builds its own worker pool and forwards the pool's
//! result stream to the subscriber hub.

mod handlers;
pub mod hub;

pub use hub::EventHub;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::{Config, ConfigError, Result};

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub hub: Arc<EventHub>,
}

/// Runs the HTTP server until a shutdown signal arrives.
pub async fn run(config: Config) -> Result<()> {
    let address: SocketAddr = config.server.listen_addr.parse().map_err(|e| {
        ConfigError::Validation(format!(
            "listen_addr '{}' is not a valid socket address: {}",
            config.server.listen_addr, e
        ))
    })?;

    let state = AppState {
        config: Arc::new(config),
        hub: Arc::new(EventHub::new()),
    };

    let app = Router::new()
        .route("/api/scrape", post(handlers::start_scrape))
        .route("/api/ws", get(handlers::ws_feed))
        .route("/health", get(handlers::health))
        .with_state(state)
        // The dashboard is served from another origin during development.
        .layer(CorsLayer::permissive());

    let listener = TcpListener::bind(address).await?;
    info!(%address, "PagePulse server listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
