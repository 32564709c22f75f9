// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test infrastructure: stub agents, record builders, and an
//! in-process server spawner.

use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;

use crate::agent::{AgentLink, AgentRecord};
use crate::config::Config;
use crate::protocol::Frame;
use crate::state::{AgentEntry, ControlState};

/// A success response with null data.
pub fn response_ok() -> Frame {
    Frame::Response { status: true, data: serde_json::Value::Null }
}

/// A success response with the given data payload.
pub fn response_with(data: serde_json::Value) -> Frame {
    Frame::Response { status: true, data }
}

/// A failure response with null data.
pub fn response_failed() -> Frame {
    Frame::Response { status: false, data: serde_json::Value::Null }
}

/// Handle to an in-process stub agent spawned by [`stub_record_with`].
///
/// The stub records every snippet it receives and answers each with the
/// responder's frame, mimicking a turtle on the far side of the link.
pub struct StubAgent {
    commands: Arc<Mutex<Vec<String>>>,
    handle: tokio::task::JoinHandle<()>,
}

impl StubAgent {
    /// Snippets received so far, in arrival order.
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Drop for StubAgent {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// An `AgentRecord` wired to a stub that answers every command with success.
pub fn stub_record(uid: u32) -> (AgentRecord, StubAgent) {
    stub_record_with(uid, |_| response_ok())
}

/// An `AgentRecord` wired to a stub with a custom per-command responder.
pub fn stub_record_with<F>(uid: u32, mut respond: F) -> (AgentRecord, StubAgent)
where
    F: FnMut(&str) -> Frame + Send + 'static,
{
    let (driver_link, agent_link) = AgentLink::pair(16);
    let (tx, mut rx) = agent_link.into_parts();

    let commands = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&commands);
    let handle = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if let Frame::Command { command } = frame {
                seen.lock().unwrap_or_else(|e| e.into_inner()).push(command.clone());
                if tx.send(respond(&command)).await.is_err() {
                    break;
                }
            }
        }
    });

    let entry = Arc::new(AgentEntry::new(uid, CancellationToken::new()));
    let record = AgentRecord::new(uid, driver_link, entry);
    (record, StubAgent { commands, handle })
}

/// Spawn the full controller router on an ephemeral port.
pub async fn spawn_server(
    config: Config,
) -> anyhow::Result<(std::net::SocketAddr, Arc<ControlState>, tokio::task::JoinHandle<()>)> {
    let state = Arc::new(ControlState::new(config, CancellationToken::new()));
    let router = crate::transport::build_router(Arc::clone(&state));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok((addr, state, handle))
}
