// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Branching stripmine: a two-tall trunk with paired, torch-lit branches.
//!
//! Each cycle advances the trunk, pins `home` to the junction so the fuel
//! guard retreats there rather than to the origin, then mines a branch to
//! the left and one to the right. The walk back along a branch places
//! torches against a decaying light model and purges junk blocks first.

use super::{clear_falling_blocks, prerun_refuel, process_complete};
use crate::agent::AgentRecord;
use crate::error::AgentError;
use crate::types::{Direction, BAD_BLOCKS};

/// Stripmine layout and options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripmineParams {
    /// Solid blocks left between neighbouring branch pairs.
    pub branch_spacing: i64,
    /// Length of each branch corridor.
    pub branch_length: i64,
    /// How many left/right branch pairs to mine.
    pub branch_pair_count: i64,
    pub prerun_fuel_check: bool,
    pub do_place_torches: bool,
    /// Light emitted by a freshly placed torch.
    pub torch_light: i64,
}

impl Default for StripmineParams {
    fn default() -> Self {
        Self {
            branch_spacing: 3,
            branch_length: 47,
            branch_pair_count: 8,
            prerun_fuel_check: true,
            do_place_torches: true,
            torch_light: 12,
        }
    }
}

impl StripmineParams {
    /// Fuel for the trunk advance plus four branch legs per pair.
    pub fn required_fuel(&self) -> i64 {
        ((self.branch_spacing + 1) + (self.branch_length * 4 + 1)) * self.branch_pair_count
    }
}

/// Mine `branch_pair_count` pairs of branches off a two-tall trunk.
pub(crate) async fn run(agent: &mut AgentRecord, params: &StripmineParams) -> Result<(), AgentError> {
    if params.prerun_fuel_check {
        prerun_refuel(agent, params.required_fuel()).await?;
    }

    tracing::info!(
        uid = agent.uid,
        pairs = params.branch_pair_count,
        length = params.branch_length,
        "starting stripmine"
    );

    let mut do_place_torches = params.do_place_torches;

    for pair in 0..params.branch_pair_count {
        // Advance the trunk, keeping the corridor two tall.
        for _ in 0..params.branch_spacing + 1 {
            clear_falling_blocks(agent).await?;
            agent.dig_move(Direction::Forward).await?;
            agent.dig(Direction::Up).await?;
        }

        // Guards now retreat to this junction instead of the origin.
        agent.home = agent.pose.location;
        agent.publish().await;
        tracing::debug!(uid = agent.uid, pair, home = %agent.home, "trunk junction reached");

        agent.turn_left().await?;
        for _branch in 0..2 {
            mine_branch(agent, params, &mut do_place_torches).await?;
        }
        // Line up along the trunk for the next pair.
        agent.turn_right().await?;
    }

    process_complete(agent).await
}

/// Mine one branch out and walk it back lit. Ends facing the opposite
/// branch of the pair (the outbound turnaround is two right turns).
async fn mine_branch(
    agent: &mut AgentRecord,
    params: &StripmineParams,
    do_place_torches: &mut bool,
) -> Result<(), AgentError> {
    // Outbound: dig a two-tall corridor.
    for _ in 0..params.branch_length {
        clear_falling_blocks(agent).await?;
        agent.dig_move(Direction::Forward).await?;
        agent.dig(Direction::Up).await?;
    }

    // Turn around.
    agent.turn_right().await?;
    agent.turn_right().await?;

    // Shed the junk picked up on the way out.
    for bad_block in BAD_BLOCKS {
        loop {
            match agent.dump_item(bad_block, Direction::Up).await {
                Ok(()) => {}
                Err(AgentError::InventoryMissing(_)) => break,
                Err(e) => return Err(e),
            }
        }
    }

    // Lit return: the corridor is already mined, so walk without digging,
    // placing torches as the modelled light level decays.
    let mut light = params.torch_light;
    let mut threshold = 0;
    for branch_position in 0..params.branch_length {
        if *do_place_torches && light <= threshold {
            place_torch(agent, params, do_place_torches, &mut light, &mut threshold).await?;
        }
        // Backstop just before the junction so the branch mouth stays lit.
        if *do_place_torches && branch_position == params.branch_length - 2 && light <= -1 {
            place_torch(agent, params, do_place_torches, &mut light, &mut threshold).await?;
        }

        agent.move_step(Direction::Forward).await?;
        light -= 1;
        agent.light_level = Some(light);
        agent.publish().await;
    }

    Ok(())
}

/// Select a torch and place it overhead. Running out of torches disables
/// placement for the rest of the run.
async fn place_torch(
    agent: &mut AgentRecord,
    params: &StripmineParams,
    do_place_torches: &mut bool,
    light: &mut i64,
    threshold: &mut i64,
) -> Result<(), AgentError> {
    let placed = async {
        agent.select_item("torch").await?;
        agent.place_block(Direction::Up).await?;
        Ok::<(), AgentError>(())
    }
    .await;

    match placed {
        Ok(()) => {
            *light = params.torch_light;
            // After the first torch, wait for full decay plus one before the next.
            *threshold = -(params.torch_light + 1);
            Ok(())
        }
        Err(AgentError::InventoryMissing(_)) => {
            tracing::warn!(uid = agent.uid, "out of torches, lighting disabled");
            *do_place_torches = false;
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
#[path = "stripmine_tests.rs"]
mod tests;
