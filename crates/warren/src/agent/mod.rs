// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-agent driver state and the low-level command channel.
//!
//! An [`AgentRecord`] is the controller's working model of one turtle: its
//! believed pose, last observed fuel, home location, and the frame link to
//! the socket task. It is exclusively owned by the driver task; cross-task
//! observers see only the snapshot it publishes into its registry entry.

pub mod inventory;
pub mod link;
pub mod movement;

use std::sync::Arc;

use crate::error::{AgentError, RunOutcome};
use crate::protocol::Frame;
use crate::state::AgentEntry;
use crate::strategy::Strategy;
use crate::types::{Location, Pose};

pub use link::AgentLink;

/// Outcome of one command round trip.
#[derive(Debug, Clone)]
pub struct CommandResponse {
    pub status: bool,
    pub data: serde_json::Value,
}

/// The controller's working model of one connected agent.
pub struct AgentRecord {
    pub uid: u32,
    link: AgentLink,
    /// Believed pose. Updated before a movement command is sent, so a failed
    /// command leaves the belief one step ahead of reality.
    pub pose: Pose,
    /// Where the fuel guard retreats to. Strategies only ever advance this
    /// to the current pose.
    pub home: Location,
    /// Whether movement runs the pre-flight fuel guard. Cleared for the
    /// final return so the guard cannot recurse.
    pub check_fuel: bool,
    pub latest_fuel: i64,
    pub latest_command: String,
    pub steps_from_home: i64,
    pub light_level: Option<i64>,
    entry: Arc<AgentEntry>,
}

impl AgentRecord {
    pub fn new(uid: u32, link: AgentLink, entry: Arc<AgentEntry>) -> Self {
        Self {
            uid,
            link,
            pose: Pose::default(),
            home: Location::default(),
            check_fuel: true,
            latest_fuel: 0,
            latest_command: String::new(),
            steps_from_home: 0,
            light_level: None,
            entry,
        }
    }

    /// Send one snippet and await exactly one response frame.
    ///
    /// The snippet must contain `"return"`; the agent's executor evaluates
    /// expression-returning snippets only. Anything else is refused before a
    /// frame is sent. A reply of any other frame kind is a protocol error;
    /// `status=false` replies are returned to the caller for classification.
    pub async fn send_command(&mut self, snippet: &str) -> Result<CommandResponse, AgentError> {
        if !snippet.contains("return") {
            return Err(AgentError::CommandMalformed(format!(
                "snippet must return a value: {snippet:?}"
            )));
        }

        self.latest_command = format!("{snippet} (PENDING)");
        self.publish().await;
        tracing::debug!(uid = self.uid, command = snippet, "sending command");

        self.link.send(Frame::Command { command: snippet.to_owned() }).await?;
        let reply = self.link.recv().await?;

        let kind = reply.kind();
        let Frame::Response { status, data } = reply else {
            self.latest_command = format!("{snippet} (FAILURE)");
            self.publish().await;
            return Err(AgentError::CommandProtocol(format!(
                "expected a response frame, got {kind}"
            )));
        };

        let outcome = if status { "SUCCESS" } else { "FAILURE" };
        self.latest_command = format!("{snippet} ({outcome})");
        self.publish().await;
        if !status {
            tracing::debug!(uid = self.uid, command = snippet, "command reported failure");
        }

        Ok(CommandResponse { status, data })
    }

    /// Read the agent's current fuel level. Non-success replies are fatal.
    pub async fn fuel_level(&mut self) -> Result<i64, AgentError> {
        let res = self.send_command("return turtle.getFuelLevel()").await?;
        if !res.status {
            return Err(AgentError::CommandProtocol("fuel level read failed".to_owned()));
        }
        let fuel = res
            .data
            .as_i64()
            .ok_or_else(|| AgentError::CommandProtocol(format!("fuel level not an integer: {}", res.data)))?;
        self.latest_fuel = fuel;
        self.publish().await;
        Ok(fuel)
    }

    /// Publish the current field values into the registry snapshot.
    pub(crate) async fn publish(&self) {
        let mut status = self.entry.status.write().await;
        status.pose = self.pose;
        status.fuel = self.latest_fuel;
        status.latest_command = self.latest_command.clone();
        status.steps_from_home = self.steps_from_home;
        status.light_level = self.light_level;
    }
}

/// Run the configured strategy over an agent until completion, halt, or
/// error. Halts come back as the success side of the result; real errors
/// propagate and tear the connection down in the supervisor's cleanup.
pub async fn drive(mut agent: AgentRecord, strategy: Strategy) -> Result<RunOutcome, AgentError> {
    match strategy.run(&mut agent).await {
        Ok(()) => Ok(RunOutcome::Completed),
        Err(AgentError::HaltReturned) => Ok(RunOutcome::Halted(crate::error::Halt::Returned)),
        Err(AgentError::HaltFuel) => Ok(RunOutcome::Halted(crate::error::Halt::Fuel)),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
