// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Duplex frame channel between an agent driver and its socket task.
//!
//! The socket task owns the WebSocket and pumps frames between it and the
//! driver's end of the link; the driver never touches the socket directly.
//! Either side closing (socket drop, driver exit) surfaces on the other as a
//! closed channel.

use tokio::sync::mpsc;

use crate::error::AgentError;
use crate::protocol::Frame;

/// One end of a bidirectional frame channel.
pub struct AgentLink {
    tx: mpsc::Sender<Frame>,
    rx: mpsc::Receiver<Frame>,
}

impl AgentLink {
    /// Build a connected pair of link ends.
    pub fn pair(buffer: usize) -> (AgentLink, AgentLink) {
        let (a_tx, b_rx) = mpsc::channel(buffer);
        let (b_tx, a_rx) = mpsc::channel(buffer);
        (AgentLink { tx: a_tx, rx: a_rx }, AgentLink { tx: b_tx, rx: b_rx })
    }

    /// Send one frame to the peer.
    pub async fn send(&self, frame: Frame) -> Result<(), AgentError> {
        self.tx
            .send(frame)
            .await
            .map_err(|_| AgentError::CommandProtocol("connection closed".to_owned()))
    }

    /// Receive one frame from the peer.
    pub async fn recv(&mut self) -> Result<Frame, AgentError> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| AgentError::CommandProtocol("connection closed".to_owned()))
    }

    /// Split into raw channel halves (used by the socket pump and stubs).
    pub fn into_parts(self) -> (mpsc::Sender<Frame>, mpsc::Receiver<Frame>) {
        (self.tx, self.rx)
    }
}
