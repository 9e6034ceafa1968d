//! HTTP API for the GWF reroll service.
//!
//! This module provides:
//! - Health monitoring
//! - The WebSocket endpoint the Foundry client module connects to

use axum::{
    Json, Router,
    extract::{State, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::service::RerollService;
use crate::websocket::{WebSocketManager, handle_ws_connection};

/// Application state
pub struct AppState {
    pub service: Arc<RerollService>,
    pub start_time: Instant,
    pub ws_manager: Arc<WebSocketManager>,
}

/// Build the API router
pub fn router(service: Arc<RerollService>) -> Router {
    let ws_manager = service.ws_manager.clone();

    let state = Arc::new(AppState {
        service,
        start_time: Instant::now(),
        ws_manager,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// === Health ===

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let service = &state.service;

    Json(HealthResponse {
        status: service
            .i18n
            .get(service.locale(), "health-status-healthy", None),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        connections: state.ws_manager.connection_count(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    uptime_seconds: u64,
    connections: usize,
}

// === WebSocket ===

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    info!("WebSocket upgrade request received");
    ws.on_upgrade(move |socket| {
        handle_ws_connection(socket, state.ws_manager.clone(), state.service.clone())
    })
}
