// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic status reporter.
//!
//! A singleton task that polls every registered agent's published snapshot
//! and emits the human-readable block. It reads copies only; driver tasks
//! are never blocked by reporting.

use std::sync::Arc;

use crate::state::ControlState;

/// Spawn the reporter task. It runs until shutdown.
pub fn spawn_status_reporter(state: Arc<ControlState>) -> tokio::task::JoinHandle<()> {
    let interval = state.config.status_interval();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = state.shutdown.cancelled() => break,
                _ = ticker.tick() => report(&state).await,
            }
        }
    })
}

async fn report(state: &ControlState) {
    for entry in state.agents_snapshot().await {
        let status = entry.status.read().await.clone();
        tracing::debug!(
            target: "warren::status",
            uid = entry.uid,
            "\n{}",
            status.render()
        );
    }
}
