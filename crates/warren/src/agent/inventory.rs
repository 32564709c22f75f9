// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inventory operations: slot scan/select, drop, place, dump, and refuel.

use super::AgentRecord;
use crate::error::AgentError;
use crate::types::{Direction, SlotDetail, FUEL_BLOCKS, FUEL_LIMIT, SLOT_RANGE};

impl AgentRecord {
    /// Scan slots 1..=16 for an item whose name contains `search` and select
    /// the first match.
    pub async fn select_item(&mut self, search: &str) -> Result<SlotDetail, AgentError> {
        for slot in SLOT_RANGE {
            let res = self.send_command(&format!("return turtle.getItemDetail({slot})")).await?;
            if res.data.is_null() {
                continue;
            }
            let detail: SlotDetail = serde_json::from_value(res.data.clone()).map_err(|_| {
                AgentError::CommandProtocol(format!("unreadable slot detail: {}", res.data))
            })?;
            if detail.name.contains(search) {
                self.send_command(&format!("return turtle.select({slot})")).await?;
                return Ok(detail);
            }
        }
        Err(AgentError::InventoryMissing(search.to_owned()))
    }

    /// Drop the selected stack in a direction.
    pub async fn drop_item(&mut self, direction: Direction) -> Result<(), AgentError> {
        let snippet = match direction {
            Direction::Forward => "return turtle.drop()",
            Direction::Down => "return turtle.dropDown()",
            Direction::Up => "return turtle.dropUp()",
            Direction::Back => {
                return Err(AgentError::CommandMalformed("cannot drop backwards".to_owned()));
            }
        };
        let res = self.send_command(snippet).await?;
        if !res.status {
            return Err(AgentError::InteractionFailed("drop refused".to_owned()));
        }
        Ok(())
    }

    /// Place a block from the selected stack in a direction.
    pub async fn place_block(&mut self, direction: Direction) -> Result<(), AgentError> {
        let snippet = match direction {
            Direction::Forward => "return turtle.place()",
            Direction::Down => "return turtle.placeDown()",
            Direction::Up => "return turtle.placeUp()",
            Direction::Back => {
                return Err(AgentError::CommandMalformed("cannot place backwards".to_owned()));
            }
        };
        let res = self.send_command(snippet).await?;
        if !res.status {
            return Err(AgentError::InteractionFailed("place refused".to_owned()));
        }
        Ok(())
    }

    /// Select an item by name fragment and drop it. Either substep failing
    /// to find or shed the item comes back as [`AgentError::InventoryMissing`];
    /// protocol errors propagate unchanged.
    pub async fn dump_item(&mut self, search: &str, direction: Direction) -> Result<(), AgentError> {
        self.select_item(search).await?;
        match self.drop_item(direction).await {
            Ok(()) => Ok(()),
            Err(AgentError::InteractionFailed(_)) => {
                Err(AgentError::InventoryMissing(search.to_owned()))
            }
            Err(e) => Err(e),
        }
    }

    /// Burn fuel items until the fuel level exceeds `target`.
    ///
    /// Walks the known fuel kinds in order, selecting and burning stacks
    /// until the level clears `target` (or the tank cap). When every kind is
    /// exhausted the level is read once more; if it still falls short the
    /// shortfall is an [`AgentError::InventoryMissing`].
    pub async fn refuel(&mut self, target: i64) -> Result<i64, AgentError> {
        if target <= 0 || target >= FUEL_LIMIT {
            return Err(AgentError::InvalidParameter(format!(
                "refuel target must be within 0..{FUEL_LIMIT}, got {target}"
            )));
        }

        for fuel_name in FUEL_BLOCKS {
            loop {
                match self.select_item(fuel_name).await {
                    Ok(_) => {}
                    // This kind is spent; try the next one.
                    Err(AgentError::InventoryMissing(_)) => break,
                    Err(e) => return Err(e),
                }
                self.send_command("return turtle.refuel()").await?;
                let fuel = self.fuel_level().await?;
                if fuel > target || fuel >= FUEL_LIMIT {
                    return Ok(fuel);
                }
            }
        }

        let fuel = self.fuel_level().await?;
        if fuel > target {
            Ok(fuel)
        } else {
            tracing::warn!(uid = self.uid, fuel, target, "refuel fell short of target");
            Err(AgentError::InventoryMissing("fuel".to_owned()))
        }
    }
}

#[cfg(test)]
#[path = "inventory_tests.rs"]
mod tests;
