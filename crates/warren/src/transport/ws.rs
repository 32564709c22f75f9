// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent-facing WebSocket transport.
//!
//! Each accepted connection must open with a `register` frame. The upgraded
//! handler then becomes the socket pump: it bridges frames between the
//! WebSocket and the driver task's link, keeping the per-agent exchange
//! strictly half-duplex (the driver is the only command sender, and every
//! command awaits its single response). Cleanup (deregistration plus a
//! best-effort notice) runs on every exit path.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};

use crate::agent::{self, AgentLink, AgentRecord};
use crate::error::RunOutcome;
use crate::protocol::{self, Frame};
use crate::state::{AgentEntry, ControlState};

/// `GET /ws` — WebSocket upgrade for agent connections.
pub async fn ws_handler(
    State(state): State<Arc<ControlState>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_agent(socket, state))
}

/// How the registration handshake failed.
enum HandshakeFailure {
    /// A frame arrived but was not a valid `register`; the message is sent
    /// back in an `error` frame before closing.
    Protocol(String),
    /// The socket closed before registering.
    Closed,
}

/// Per-connection task: handshake, pump, cleanup.
async fn handle_agent(mut socket: WebSocket, state: Arc<ControlState>) {
    let uid = match await_register(&mut socket).await {
        Ok(uid) => uid,
        Err(HandshakeFailure::Protocol(message)) => {
            tracing::warn!(err = %message, "agent handshake failed");
            let _ = socket.send(Message::Text(Frame::error(message).encode().into())).await;
            return;
        }
        Err(HandshakeFailure::Closed) => return,
    };

    let entry = Arc::new(AgentEntry::new(uid, state.shutdown.child_token()));
    state.agents.write().await.insert(entry.id, Arc::clone(&entry));
    tracing::info!(uid, conn = %entry.id, "agent registered");

    if socket
        .send(Message::Text(Frame::data("Registered").encode().into()))
        .await
        .is_err()
    {
        state.agents.write().await.remove(&entry.id);
        return;
    }

    // The driver owns one end of the link; this task pumps the other.
    let (driver_link, socket_link) = AgentLink::pair(16);
    let record = AgentRecord::new(uid, driver_link, Arc::clone(&entry));
    let strategy = state.config.strategy.build();
    let driver = tokio::spawn(agent::drive(record, strategy));

    let (mut ws_tx, mut ws_rx) = socket.split();
    let (to_driver, mut from_driver) = socket_link.into_parts();

    loop {
        tokio::select! {
            _ = entry.cancel.cancelled() => break,

            // Driver -> agent
            frame = from_driver.recv() => match frame {
                Some(frame) => {
                    if ws_tx.send(Message::Text(frame.encode().into())).await.is_err() {
                        break;
                    }
                }
                // Driver finished and dropped its link.
                None => break,
            },

            // Agent -> driver
            msg = ws_rx.next() => match msg {
                Some(Ok(Message::Text(text))) => match protocol::decode(text.as_str()) {
                    Ok(frame) => {
                        if to_driver.send(frame).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(uid, "unparseable frame from agent");
                        let _ = ws_tx
                            .send(Message::Text(Frame::error(e.to_string()).encode().into()))
                            .await;
                        break;
                    }
                },
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!(uid, "agent disconnected");
                    break;
                }
                Some(Err(e)) => {
                    tracing::debug!(uid, err = %e, "agent socket error");
                    break;
                }
                // Ping/pong/binary ignored.
                _ => {}
            },
        }
    }

    // Closing the link unblocks the driver whichever side ended first.
    drop(to_driver);
    drop(from_driver);

    state.agents.write().await.remove(&entry.id);
    if ws_tx
        .send(Message::Text(Frame::data("Deregistered").encode().into()))
        .await
        .is_err()
    {
        tracing::debug!(uid, "deregister notice not delivered");
    }

    match driver.await {
        Ok(Ok(RunOutcome::Completed)) => tracing::info!(uid, "strategy run complete"),
        Ok(Ok(RunOutcome::Halted(halt))) => tracing::info!(uid, ?halt, "strategy run halted"),
        Ok(Err(e)) => tracing::error!(uid, err = %e, "strategy run failed"),
        Err(e) => tracing::error!(uid, err = %e, "driver task aborted"),
    }
}

/// Await the opening `register` frame. Exactly one text frame is consumed;
/// ping/pong noise is skipped.
async fn await_register(socket: &mut WebSocket) -> Result<u32, HandshakeFailure> {
    loop {
        match socket.recv().await {
            Some(Ok(Message::Text(text))) => {
                return match protocol::decode(text.as_str()) {
                    Ok(Frame::Register { id }) => Ok(id),
                    Ok(frame) => Err(HandshakeFailure::Protocol(format!(
                        "First frame must be register, got {}",
                        frame.kind()
                    ))),
                    Err(e) => Err(HandshakeFailure::Protocol(e.to_string())),
                };
            }
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
            Some(Ok(Message::Binary(_))) => {
                return Err(HandshakeFailure::Protocol(
                    "Could not parse: <binary frame>".to_owned(),
                ));
            }
            Some(Ok(Message::Close(_))) | Some(Err(_)) | None => {
                return Err(HandshakeFailure::Closed);
            }
        }
    }
}
