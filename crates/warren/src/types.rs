// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Core spatial types: locations, bearings, directions, and inventory slots.
//!
//! The coordinate system is the block world's: `x` grows east, `y` grows up,
//! `z` grows south. A bearing is one of the four cardinal headings with fixed
//! ordinals `{North=0, East=1, South=2, West=3}`; turning left or right steps
//! the ordinal modulo four.

use serde::{Deserialize, Serialize};

/// Inventory slots an agent exposes.
pub const SLOT_RANGE: std::ops::RangeInclusive<u8> = 1..=16;

/// Block name fragments an agent discards during an inventory purge.
pub const BAD_BLOCKS: [&str; 3] = ["cobble", "dirt", "gravel"];

/// Block name fragments accepted as burnable fuel.
pub const FUEL_BLOCKS: [&str; 1] = ["coal"];

/// Block name fragments that fall into a freshly dug hole.
pub const FALLING_BLOCKS: [&str; 2] = ["gravel", "sand"];

/// Hard cap on an agent's fuel tank.
pub const FUEL_LIMIT: i64 = 20_000;

/// A position on the world's discrete 3D grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Location {
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Manhattan distance to `other`, the cost of an axis-aligned walk.
    pub fn manhattan(&self, other: &Location) -> i64 {
        (other.x - self.x).abs() + (other.y - self.y).abs() + (other.z - self.z).abs()
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Cardinal heading with the fixed ordinal mapping `{N=0, E=1, S=2, W=3}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bearing {
    #[default]
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Bearing {
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    const fn from_ordinal(value: u8) -> Self {
        match value % 4 {
            0 => Self::North,
            1 => Self::East,
            2 => Self::South,
            _ => Self::West,
        }
    }

    /// The bearing after one left turn: `(b - 1) mod 4`.
    pub const fn left(self) -> Self {
        Self::from_ordinal((self as u8 + 3) % 4)
    }

    /// The bearing after one right turn: `(b + 1) mod 4`.
    pub const fn right(self) -> Self {
        Self::from_ordinal((self as u8 + 1) % 4)
    }

    /// The `(dx, dz)` delta of one forward step on this bearing.
    pub const fn forward_delta(self) -> (i64, i64) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// A movement or interaction direction relative to the agent.
///
/// `Forward`/`Back` are relative to the current bearing; `Up`/`Down` are
/// absolute on the y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Back,
    Up,
    Down,
}

/// The controller's belief of an agent's location and heading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pose {
    pub location: Location,
    pub bearing: Bearing,
}

/// Details of one occupied inventory slot, as reported by `getItemDetail`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDetail {
    pub name: String,
    pub count: u32,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
