// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Movement primitives, the relative planner, and the fuel guard.
//!
//! Pose updates are belief-first: the record's pose advances *before* the
//! movement command goes out, so a failed command leaves the belief one step
//! ahead of reality. The update and the send stay adjacent in `move_step`.

use serde_json::Value;

use super::AgentRecord;
use crate::error::AgentError;
use crate::types::{Bearing, Direction, Location};

/// Block tags the dig-if-block check treats as mineable.
const MINEABLE_TAGS: [&str; 2] = ["minecraft:mineable/pickaxe", "minecraft:mineable/shovel"];

impl AgentRecord {
    /// Move one step. Runs the fuel guard first (unless disabled), then
    /// advances the believed pose, then issues the movement snippet.
    ///
    /// A `status=false` reply is not an error here: the agent stayed put and
    /// the belief is now one step ahead of reality.
    pub async fn move_step(&mut self, direction: Direction) -> Result<(), AgentError> {
        if self.check_fuel {
            Box::pin(self.fuel_guard()).await?;
        }

        let snippet = match direction {
            Direction::Forward | Direction::Back => {
                let (dx, dz) = self.pose.bearing.forward_delta();
                let sign = if direction == Direction::Forward { 1 } else { -1 };
                // Belief advances before the send.
                self.pose.location.x += dx * sign;
                self.pose.location.z += dz * sign;
                if direction == Direction::Forward {
                    "return turtle.forward()"
                } else {
                    "return turtle.back()"
                }
            }
            Direction::Up => {
                self.pose.location.y += 1;
                "return turtle.up()"
            }
            Direction::Down => {
                self.pose.location.y -= 1;
                "return turtle.down()"
            }
        };

        self.send_command(snippet).await?;
        Ok(())
    }

    pub async fn turn_left(&mut self) -> Result<(), AgentError> {
        self.pose.bearing = self.pose.bearing.left();
        self.send_command("return turtle.turnLeft()").await?;
        Ok(())
    }

    pub async fn turn_right(&mut self) -> Result<(), AgentError> {
        self.pose.bearing = self.pose.bearing.right();
        self.send_command("return turtle.turnRight()").await?;
        Ok(())
    }

    /// Dig in a direction. Digging at nothing is not an error: the agent
    /// simply reports `false`.
    pub async fn dig(&mut self, direction: Direction) -> Result<(), AgentError> {
        let snippet = match direction {
            Direction::Forward => "return turtle.dig()",
            Direction::Down => "return turtle.digDown()",
            Direction::Up => "return turtle.digUp()",
            Direction::Back => {
                return Err(AgentError::CommandMalformed("cannot dig backwards".to_owned()));
            }
        };
        self.send_command(snippet).await?;
        Ok(())
    }

    /// Inspect the adjacent block. Success yields the block's metadata
    /// mapping; failure means there is no block and yields an empty mapping.
    pub async fn inspect(
        &mut self,
        direction: Direction,
    ) -> Result<serde_json::Map<String, Value>, AgentError> {
        let snippet = match direction {
            Direction::Forward => "return turtle.inspect()",
            Direction::Down => "return turtle.inspectDown()",
            Direction::Up => "return turtle.inspectUp()",
            Direction::Back => {
                return Err(AgentError::CommandMalformed("cannot inspect backwards".to_owned()));
            }
        };
        let res = self.send_command(snippet).await?;
        match res.data {
            Value::Object(map) if res.status => Ok(map),
            _ => Ok(serde_json::Map::new()),
        }
    }

    /// Dig then move in the same direction. The dig is unconditional.
    pub async fn dig_move(&mut self, direction: Direction) -> Result<(), AgentError> {
        self.dig(direction).await?;
        self.move_step(direction).await?;
        Ok(())
    }

    /// Inspect, and dig only when the block carries a mineable tag.
    pub async fn dig_if_block(&mut self, direction: Direction) -> Result<(), AgentError> {
        if direction == Direction::Back {
            return Err(AgentError::MovementInvalid("cannot dig backwards".to_owned()));
        }
        let data = self.inspect(direction).await?;
        let mineable = data
            .get("tags")
            .and_then(Value::as_object)
            .is_some_and(|tags| {
                MINEABLE_TAGS
                    .iter()
                    .any(|tag| tags.get(*tag).and_then(Value::as_bool) == Some(true))
            });
        if mineable {
            self.dig(direction).await?;
        }
        Ok(())
    }

    /// Walk to `target` axis by axis: y first, then x, then z, digging
    /// through anything in the way, and finish facing north.
    ///
    /// Rotation is by right turns only (at most three per axis); callers may
    /// not assume a shortest turn. With `cost_only` no commands are sent and
    /// the pose is untouched; only the Manhattan cost comes back.
    pub async fn move_to_location(
        &mut self,
        target: Location,
        cost_only: bool,
    ) -> Result<i64, AgentError> {
        let mut cost = 0i64;

        let dx = target.x - self.pose.location.x;
        let dy = target.y - self.pose.location.y;
        let dz = target.z - self.pose.location.z;

        for _ in 0..dy.abs() {
            if !cost_only {
                let step = if dy > 0 { Direction::Up } else { Direction::Down };
                self.dig_move(step).await?;
            }
            cost += 1;
        }

        if !cost_only && dx != 0 {
            let toward = if dx > 0 { Bearing::East } else { Bearing::West };
            while self.pose.bearing != toward {
                self.turn_right().await?;
            }
        }
        for _ in 0..dx.abs() {
            if !cost_only {
                self.dig_move(Direction::Forward).await?;
            }
            cost += 1;
        }

        if !cost_only && dz != 0 {
            let toward = if dz > 0 { Bearing::South } else { Bearing::North };
            while self.pose.bearing != toward {
                self.turn_right().await?;
            }
        }
        for _ in 0..dz.abs() {
            if !cost_only {
                self.dig_move(Direction::Forward).await?;
            }
            cost += 1;
        }

        if !cost_only {
            while self.pose.bearing != Bearing::North {
                self.turn_right().await?;
            }
        }

        Ok(cost)
    }

    /// Pre-flight fuel check: if the fuel left would not cover the walk back
    /// home, disable further checks, walk home now, and halt the run.
    ///
    /// The cost is conservative: one unit per step along the axis-ordered
    /// return, turns free.
    async fn fuel_guard(&mut self) -> Result<(), AgentError> {
        let fuel = self.fuel_level().await?;
        let home = self.home;
        let return_cost = self.move_to_location(home, true).await?;
        self.steps_from_home = return_cost;
        self.publish().await;

        if return_cost >= fuel {
            tracing::warn!(
                uid = self.uid,
                fuel,
                return_cost,
                "fuel exhausted, returning home"
            );
            self.check_fuel = false;
            self.move_to_location(home, false).await?;
            return Err(AgentError::HaltReturned);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "movement_tests.rs"]
mod tests;
