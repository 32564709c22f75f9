// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only HTTP view over the status snapshots.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::state::{AgentStatus, ControlState};

/// `GET /api/v1/health` — liveness plus basic identity.
pub async fn health(State(state): State<Arc<ControlState>>) -> Json<serde_json::Value> {
    let agents = state.agents.read().await.len();
    Json(serde_json::json!({
        "status": "running",
        "name": state.config.info.name,
        "author": state.config.info.author,
        "agents": agents,
    }))
}

/// `GET /api/v1/agents` — one snapshot per connected agent.
pub async fn list_agents(State(state): State<Arc<ControlState>>) -> Json<Vec<AgentStatus>> {
    let mut statuses = Vec::new();
    for entry in state.agents_snapshot().await {
        statuses.push(entry.status.read().await.clone());
    }
    statuses.sort_by_key(|s| s.uid);
    Json(statuses)
}

/// `GET /api/v1/status` — the human-readable status panel.
pub async fn status_text(State(state): State<Arc<ControlState>>) -> String {
    let mut blocks = Vec::new();
    for entry in state.agents_snapshot().await {
        let status = entry.status.read().await.clone();
        blocks.push(format!("Agent {}\n{}", entry.uid, status.render()));
    }
    if blocks.is_empty() {
        "No agents connected\n".to_owned()
    } else {
        let mut out = blocks.join("\n\n");
        out.push('\n');
        out
    }
}
