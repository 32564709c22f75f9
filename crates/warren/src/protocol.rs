// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire codec for the agent protocol.
//!
//! Every frame is a UTF-8 JSON object with a mandatory `type` discriminator.
//! Five kinds exist; anything else (an unknown tag, missing fields, or
//! non-JSON text) is a decode error carrying the offending payload, which
//! the transport reports back verbatim before failing the connection.

use serde::{Deserialize, Serialize};

/// A single protocol frame, tagged by its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Frame {
    /// First frame of every connection; announces the agent uid.
    Register { id: u32 },
    /// Human-readable status for the agent (e.g. `"Registered"`).
    Data { message: String },
    /// Protocol error; the controller closes after sending.
    Error { message: String },
    /// A single expression snippet for the agent to execute.
    Command { command: String },
    /// Exactly one per `command`: outcome flag plus an arbitrary payload.
    Response {
        status: bool,
        #[serde(default)]
        data: serde_json::Value,
    },
}

impl Frame {
    pub fn data(message: impl Into<String>) -> Self {
        Self::Data { message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error { message: message.into() }
    }

    /// Human-readable tag of this frame kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Register { .. } => "register",
            Self::Data { .. } => "data",
            Self::Error { .. } => "error",
            Self::Command { .. } => "command",
            Self::Response { .. } => "response",
        }
    }

    /// Serialize to the JSON wire form.
    pub fn encode(&self) -> String {
        // None of the variants can fail to serialize.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// A frame that failed to decode, with the raw payload preserved.
#[derive(Debug, thiserror::Error)]
#[error("Could not parse: {payload}")]
pub struct DecodeError {
    pub payload: String,
}

/// Decode one frame from its JSON wire form.
pub fn decode(text: &str) -> Result<Frame, DecodeError> {
    serde_json::from_str(text).map_err(|_| DecodeError { payload: text.to_owned() })
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
