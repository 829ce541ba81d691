use alloc::collections::BTreeMap;
use alloc::string::String;
use serde::{Deserialize, Serialize};

use crate::*;

/// Avatars offered by the character picker.
pub const AVAILABLE_AVATARS: [&str; 3] = ["🧙‍♂️", "🕵️‍♂️", "🥷"];

pub const STARTING_HEALTH: i32 = 100;

/// Compass movement, diagonals included. Deltas are in screen
/// coordinates: y grows downward.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::UpLeft => (-1, -1),
            Self::UpRight => (1, -1),
            Self::DownLeft => (-1, 1),
            Self::DownRight => (1, 1),
        }
    }
}

/// The player avatar. One per session, mutated by the session only.
/// Health carries no floor; the session decides when it ends the game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub position: Coord2,
    pub health: i32,
    pub points: u32,
    pub inventory: BTreeMap<LootKind, u32>,
    pub avatar: String,
}

impl Character {
    pub fn new(position: Coord2, health: i32, avatar: &str) -> Self {
        Self {
            position,
            health,
            points: 0,
            inventory: BTreeMap::new(),
            avatar: String::from(avatar),
        }
    }

    /// Where a step would land: each axis clamped to the board, so a
    /// move into the edge is absorbed rather than rejected.
    pub fn step_target(&self, direction: Direction, bounds: Coord2) -> Coord2 {
        let (dx, dy) = direction.delta();
        (
            step_axis(self.position.0, dx, bounds.0),
            step_axis(self.position.1, dy, bounds.1),
        )
    }

    pub(crate) fn collect(&mut self, kind: LootKind) {
        *self.inventory.entry(kind).or_insert(0) += 1;
    }

    pub(crate) fn award_points(&mut self, cells: CellCount) {
        self.points = self.points.saturating_add(cells.into());
    }
}

fn step_axis(value: Coord, delta: i8, bound: Coord) -> Coord {
    match value.checked_add_signed(delta) {
        Some(next) if next < bound => next,
        Some(_) => bound - 1,
        None => 0,
    }
}
