// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for agent drivers.
//!
//! The two `Halt*` variants are control flow rather than failures: the driver
//! converts them into the success side of its result (see [`RunOutcome`]).
//! Everything else terminates the driver and tears the connection down.

use thiserror::Error;

/// Errors raised by agent primitives and strategies.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Bad direction or bearing input to a movement primitive.
    #[error("invalid movement: {0}")]
    MovementInvalid(String),

    /// Controller-side refusal: the snippet or direction is unusable, so
    /// nothing was sent to the agent.
    #[error("malformed command: {0}")]
    CommandMalformed(String),

    /// The agent replied with an unexpected or unparseable frame, the
    /// connection dropped mid-exchange, or a fuel read failed.
    #[error("protocol violation: {0}")]
    CommandProtocol(String),

    /// A place or drop command reported failure.
    #[error("interaction failed: {0}")]
    InteractionFailed(String),

    /// No inventory slot matched the search, or a dump could not complete.
    #[error("no inventory item matching {0:?}")]
    InventoryMissing(String),

    /// Out-of-range strategy or refuel parameter.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The fuel guard preempted the run and walked the agent home.
    #[error("fuel guard returned the agent home")]
    HaltReturned,

    /// The pre-run fuel check found too little fuel to start.
    #[error("insufficient fuel to start the run")]
    HaltFuel,
}

/// Why a run stopped early without failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// The fuel guard walked the agent home mid-run.
    Returned,
    /// The pre-run fuel check refused to start.
    Fuel,
}

/// Result of a driver run that did not error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The strategy ran to completion.
    Completed,
    /// The strategy stopped at a controlled halt.
    Halted(Halt),
}
