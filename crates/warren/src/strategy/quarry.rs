// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Open quarry: serpentine over a square, drop a layer, repeat.

use super::{prerun_refuel, process_complete};
use crate::agent::AgentRecord;
use crate::error::AgentError;
use crate::types::Direction;

/// Quarry dimensions and options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuarryParams {
    /// Side length of the square footprint.
    pub xz_size: i64,
    /// Layers to descend below the starting one.
    pub y_size: i64,
    pub prerun_fuel_check: bool,
}

impl Default for QuarryParams {
    fn default() -> Self {
        Self { xz_size: 8, y_size: 10, prerun_fuel_check: false }
    }
}

impl QuarryParams {
    /// Fuel needed for the whole prism plus the walk home. The divisor is a
    /// domain constant inherited from field practice.
    pub fn required_fuel(&self) -> i64 {
        (self.xz_size * self.xz_size * self.y_size + 2 * self.xz_size + self.y_size) / 80 + 1
    }
}

/// Mine a rectangular prism downward from the starting pose.
pub(crate) async fn run(agent: &mut AgentRecord, params: &QuarryParams) -> Result<(), AgentError> {
    if params.prerun_fuel_check {
        prerun_refuel(agent, params.required_fuel()).await?;
    }

    tracing::info!(
        uid = agent.uid,
        xz_size = params.xz_size,
        y_size = params.y_size,
        "starting quarry"
    );

    for layer in 0..=params.y_size {
        for row_number in 0..params.xz_size {
            for _ in 0..params.xz_size - 1 {
                agent.dig_move(Direction::Forward).await?;
            }
            // Serpentine into the next row, alternating the turn side.
            if row_number < params.xz_size - 1 {
                if row_number % 2 == 0 {
                    agent.turn_right().await?;
                    agent.dig_move(Direction::Forward).await?;
                    agent.turn_right().await?;
                } else {
                    agent.turn_left().await?;
                    agent.dig_move(Direction::Forward).await?;
                    agent.turn_left().await?;
                }
            }
        }
        // Face back along the serpentine and drop to the next layer.
        if params.xz_size % 2 == 0 {
            agent.turn_right().await?;
        } else {
            agent.turn_left().await?;
        }
        agent.dig_move(Direction::Down).await?;
        tracing::debug!(uid = agent.uid, layer, "quarry layer finished");
    }

    process_complete(agent).await
}

#[cfg(test)]
#[path = "quarry_tests.rs"]
mod tests;
