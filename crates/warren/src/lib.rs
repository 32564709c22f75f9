// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Warren: controller for a fleet of block-world mining agents.
//!
//! Agents ("turtles") connect over WebSockets, register, and are driven
//! synchronously through a command/response protocol. The controller owns
//! the mining plan (path planning on the block grid, inventory handling,
//! fuel accounting, torch placement) and guarantees an agent is never left
//! stranded without the fuel to walk home.

pub mod agent;
pub mod config;
pub mod error;
pub mod protocol;
pub mod state;
pub mod status;
pub mod strategy;
pub mod test_support;
pub mod transport;
pub mod types;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::state::ControlState;

/// Run the controller until shutdown.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let shutdown = CancellationToken::new();
    let state = Arc::new(ControlState::new(config, shutdown.clone()));

    status::spawn_status_reporter(Arc::clone(&state));

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
            signal_shutdown.cancel();
        }
    });

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("warren listening on {addr}");
    let router = transport::build_router(state);
    axum::serve(listener, router).with_graceful_shutdown(shutdown.cancelled_owned()).await?;

    Ok(())
}
