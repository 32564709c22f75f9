// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mining strategies and their shared routines.
//!
//! A strategy is a value carrying its parameters; the supervisor hands the
//! configured strategy to every driver, which runs it over the agent until
//! completion, a controlled halt, or an error.

pub mod quarry;
pub mod stripmine;

use serde_json::Value;

use crate::agent::AgentRecord;
use crate::error::AgentError;
use crate::types::{Direction, FALLING_BLOCKS};

pub use quarry::QuarryParams;
pub use stripmine::StripmineParams;

/// The configured mining plan for an agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    Quarry(QuarryParams),
    Stripmine(StripmineParams),
}

impl Strategy {
    /// Drive `agent` through the full mining plan.
    pub async fn run(&self, agent: &mut AgentRecord) -> Result<(), AgentError> {
        match self {
            Self::Quarry(params) => quarry::run(agent, params).await,
            Self::Stripmine(params) => stripmine::run(agent, params).await,
        }
    }
}

/// Wrap up a finished run: disable the fuel guard and walk back home.
pub(crate) async fn process_complete(agent: &mut AgentRecord) -> Result<(), AgentError> {
    tracing::info!(uid = agent.uid, "run complete, returning home");
    agent.check_fuel = false;
    let home = agent.home;
    agent.move_to_location(home, false).await?;
    Ok(())
}

/// Keep digging forward while gravel or sand keeps sliding into the face.
pub async fn clear_falling_blocks(agent: &mut AgentRecord) -> Result<(), AgentError> {
    loop {
        let data = agent.inspect(Direction::Forward).await?;
        let name = data.get("name").and_then(Value::as_str).unwrap_or("");
        if FALLING_BLOCKS.iter().any(|block| name.contains(block)) {
            agent.dig(Direction::Forward).await?;
        } else {
            return Ok(());
        }
    }
}

/// Shared pre-run fuel check: top up toward `required` and refuse to start
/// when the tank still falls short.
///
/// Refuel shortfalls and out-of-range targets are tolerated here: the
/// re-read below decides, and only the fuel level actually observed matters.
pub(crate) async fn prerun_refuel(agent: &mut AgentRecord, required: i64) -> Result<(), AgentError> {
    match agent.refuel(required).await {
        Ok(_) => {}
        Err(AgentError::InventoryMissing(_) | AgentError::InvalidParameter(_)) => {}
        Err(e) => return Err(e),
    }

    let fuel = agent.fuel_level().await?;
    if fuel < required {
        tracing::warn!(uid = agent.uid, fuel, required, "not enough fuel to start");
        return Err(AgentError::HaltFuel);
    }
    Ok(())
}

#[cfg(test)]
#[path = "strategy_tests.rs"]
mod tests;
