// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP + WebSocket transport for the controller.

pub mod http;
pub mod ws;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::ControlState;

/// Build the axum `Router` with all controller routes.
pub fn build_router(state: Arc<ControlState>) -> Router {
    Router::new()
        // Status view (read-only)
        .route("/api/v1/health", get(http::health))
        .route("/api/v1/agents", get(http::list_agents))
        .route("/api/v1/status", get(http::status_text))
        // Agent connections
        .route("/ws", get(ws::ws_handler))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
