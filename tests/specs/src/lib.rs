// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for the end-to-end suite: a scripted turtle simulator
//! speaking the wire protocol against a real in-process controller.

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// A scripted agent on the far side of the controller's WebSocket.
pub struct TurtleSim {
    ws: WsStream,
    /// Every command snippet received so far, in order.
    pub commands: Vec<String>,
}

impl TurtleSim {
    /// Connect to a controller's `/ws` endpoint.
    pub async fn connect(addr: &SocketAddr) -> anyhow::Result<Self> {
        let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws")).await?;
        Ok(Self { ws, commands: Vec::new() })
    }

    /// Send a raw JSON value as a text frame.
    pub async fn send_json(&mut self, value: &serde_json::Value) -> anyhow::Result<()> {
        self.ws.send(Message::Text(value.to_string().into())).await?;
        Ok(())
    }

    /// Send arbitrary text, bypassing JSON encoding.
    pub async fn send_raw(&mut self, text: &str) -> anyhow::Result<()> {
        self.ws.send(Message::Text(text.to_owned().into())).await?;
        Ok(())
    }

    /// Send the opening `register` frame.
    pub async fn register(&mut self, id: u32) -> anyhow::Result<()> {
        self.send_json(&serde_json::json!({"type": "register", "id": id})).await
    }

    /// Receive the next text frame as JSON, with a timeout.
    pub async fn recv_json(&mut self) -> anyhow::Result<serde_json::Value> {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, self.ws.next())
                .await
                .map_err(|_| anyhow::anyhow!("ws recv timeout"))?
                .ok_or_else(|| anyhow::anyhow!("ws stream closed"))??;
            match msg {
                Message::Text(text) => return Ok(serde_json::from_str(text.as_str())?),
                Message::Close(_) => anyhow::bail!("ws closed by controller"),
                // Ping/pong noise.
                _ => continue,
            }
        }
    }

    /// Expect a `data` frame with the given message.
    pub async fn expect_data(&mut self, message: &str) -> anyhow::Result<()> {
        let frame = self.recv_json().await?;
        anyhow::ensure!(frame["type"] == "data", "expected data frame, got: {frame}");
        anyhow::ensure!(frame["message"] == message, "unexpected message: {frame}");
        Ok(())
    }

    /// Receive one `command` frame and record its snippet.
    pub async fn recv_command(&mut self) -> anyhow::Result<String> {
        let frame = self.recv_json().await?;
        anyhow::ensure!(frame["type"] == "command", "expected command frame, got: {frame}");
        let command = frame["command"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("command is not a string: {frame}"))?
            .to_owned();
        self.commands.push(command.clone());
        Ok(command)
    }

    /// Reply to the outstanding command.
    pub async fn reply(&mut self, status: bool, data: serde_json::Value) -> anyhow::Result<()> {
        self.send_json(&serde_json::json!({"type": "response", "status": status, "data": data}))
            .await
    }

    /// Serve commands with a responder until a `data` frame arrives; returns
    /// its message. This is the lockstep loop of a healthy agent: exactly one
    /// reply per command, in order.
    pub async fn serve_until_data<F>(&mut self, mut respond: F) -> anyhow::Result<String>
    where
        F: FnMut(&str) -> (bool, serde_json::Value),
    {
        loop {
            let frame = self.recv_json().await?;
            match frame["type"].as_str() {
                Some("command") => {
                    let command = frame["command"]
                        .as_str()
                        .ok_or_else(|| anyhow::anyhow!("command is not a string: {frame}"))?
                        .to_owned();
                    self.commands.push(command.clone());
                    let (status, data) = respond(&command);
                    self.reply(status, data).await?;
                }
                Some("data") => {
                    let message = frame["message"].as_str().unwrap_or_default().to_owned();
                    return Ok(message);
                }
                _ => anyhow::bail!("unexpected frame: {frame}"),
            }
        }
    }
}

/// Spawn a controller with the given config on an ephemeral port.
pub async fn spawn_controller(
    config: warren::config::Config,
) -> anyhow::Result<(SocketAddr, std::sync::Arc<warren::state::ControlState>)> {
    let (addr, state, _handle) = warren::test_support::spawn_server(config).await?;
    Ok((addr, state))
}

/// Controller config running a tiny quarry, guard-friendly for stubs.
pub fn quarry_config(xz_size: i64, y_size: i64) -> warren::config::Config {
    let mut config = warren::config::Config::default();
    config.strategy.kind = warren::config::StrategyKind::Quarry;
    config.strategy.xz_size = Some(xz_size);
    config.strategy.y_size = Some(y_size);
    config.strategy.prerun_fuel_check = Some(false);
    config
}
