//! Request handlers for the scrape API and the websocket feed

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::scrape::build_pool;
use crate::url::is_valid_url;

#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    pub urls: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ScrapeStarted {
    pub status: &'static str,
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Starts a scrape in the background and replies immediately.
///
/// Invalid URLs are filtered out here so only validated jobs ever reach the
/// pool; each skipped line is logged.
pub async fn start_scrape(
    State(state): State<AppState>,
    Json(request): Json<ScrapeRequest>,
) -> impl IntoResponse {
    let (valid, invalid): (Vec<_>, Vec<_>) =
        request.urls.into_iter().partition(|url| is_valid_url(url));

    for url in &invalid {
        tracing::warn!(%url, "invalid URL skipped");
    }
    tracing::info!(urls = valid.len(), "scrape requested");

    tokio::spawn(run_scrape(state, valid));

    Json(ScrapeStarted { status: "started" })
}

/// Drives one scrape run and publishes every event to the live hub.
async fn run_scrape(state: AppState, urls: Vec<String>) {
    let (mut pool, mut results) = match build_pool(&state.config.scraper) {
        Ok(parts) => parts,
        Err(e) => {
            tracing::error!(error = %e, "failed to build worker pool");
            return;
        }
    };
    pool.start();

    let feeder = tokio::spawn(async move {
        for url in urls {
            if pool.add_job(url).await.is_err() {
                tracing::error!("job queue closed before all URLs were submitted");
                break;
            }
        }
        if let Err(e) = pool.close().await {
            tracing::error!(error = %e, "worker pool closed with an error");
        }
    });

    while let Some(event) = results.recv().await {
        state.hub.publish(&event);
    }

    if feeder.await.is_err() {
        tracing::error!("job feeder task failed");
    }
    tracing::info!("scrape run finished");
}

/// Upgrades the connection and subscribes it to the live event feed.
pub async fn ws_feed(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| stream_events(socket, state))
}

async fn stream_events(mut socket: WebSocket, state: AppState) {
    let (id, mut events) = state.hub.register();

    loop {
        tokio::select! {
            event = events.recv() => {
                // The channel ends when the hub drops us for falling behind.
                let Some(event) = event else { break };
                let Ok(text) = serde_json::to_string(&event) else { continue };
                if socket.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    // Client messages are ignored; disconnect ends the feed.
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }
        }
    }

    state.hub.unregister(id);
}
