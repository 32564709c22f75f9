// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared controller state: the active agent set and published snapshots.
//!
//! Each `AgentRecord` is exclusively owned by its driver task; the only
//! cross-task view of an agent is the [`AgentStatus`] its driver publishes
//! into the registry entry. The status reporter and the HTTP view read those
//! snapshots and never touch driver state.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::Config;
use crate::types::Pose;

/// Shared controller state.
pub struct ControlState {
    /// Active agents, keyed by connection identity. Duplicate agent uids are
    /// permitted; the uuid key keeps entries distinct.
    pub agents: RwLock<HashMap<Uuid, Arc<AgentEntry>>>,
    pub config: Config,
    pub shutdown: CancellationToken,
}

impl ControlState {
    pub fn new(config: Config, shutdown: CancellationToken) -> Self {
        Self { agents: RwLock::new(HashMap::new()), config, shutdown }
    }

    /// A point-in-time copy of the active set, safe to iterate without
    /// holding the registry lock.
    pub async fn agents_snapshot(&self) -> Vec<Arc<AgentEntry>> {
        self.agents.read().await.values().cloned().collect()
    }
}

/// Registry entry for one connected agent.
pub struct AgentEntry {
    pub id: Uuid,
    pub uid: u32,
    pub connected_at: Instant,
    /// Latest snapshot published by the driver.
    pub status: RwLock<AgentStatus>,
    pub cancel: CancellationToken,
}

impl AgentEntry {
    pub fn new(uid: u32, cancel: CancellationToken) -> Self {
        Self {
            id: Uuid::new_v4(),
            uid,
            connected_at: Instant::now(),
            status: RwLock::new(AgentStatus { uid, ..AgentStatus::default() }),
            cancel,
        }
    }
}

/// Read-only view of one agent, published by its driver.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AgentStatus {
    pub uid: u32,
    pub pose: Pose,
    pub fuel: i64,
    pub latest_command: String,
    pub steps_from_home: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light_level: Option<i64>,
}

impl AgentStatus {
    /// Render the human-readable snapshot block.
    pub fn render(&self) -> String {
        let mut out = format!(
            "Position:        {}\nFuel:            {}\nLatest Command:  {}\nBlocks from Home: {}",
            self.pose.location, self.fuel, self.latest_command, self.steps_from_home,
        );
        if let Some(light) = self.light_level {
            out.push_str(&format!("\nLight Level:     {light}"));
        }
        out
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
