#![no_std]

extern crate alloc;

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use character::*;
pub use error::*;
pub use generator::*;
pub use journal::*;
pub use loot::LootKind;
pub use session::*;
pub use types::*;

mod board;
mod cell;
mod character;
mod error;
mod generator;
mod journal;
pub mod loot;
mod session;
mod types;

/// Whether reaching the downstairs cell descends by itself or waits for
/// a dedicated input while standing on it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DescendTrigger {
    Automatic,
    Explicit,
}

/// Mine density ramp over levels: `min(base + per_level * level, cap)`
/// of the board, truncated to a whole count.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineDensity {
    pub base: f32,
    pub per_level: f32,
    pub cap: f32,
}

impl MineDensity {
    pub const fn flat(base: f32) -> Self {
        Self {
            base,
            per_level: 0.0,
            cap: base,
        }
    }

    pub fn at_level(&self, level: u32) -> f32 {
        (self.base + self.per_level * level as f32).min(self.cap)
    }

    pub fn mines_for(&self, level: u32, total_cells: CellCount) -> CellCount {
        (self.at_level(level) * f32::from(total_cells)) as CellCount
    }
}

impl Default for MineDensity {
    fn default() -> Self {
        Self {
            base: 0.15,
            per_level: 0.05,
            cap: 0.50,
        }
    }
}

/// Tunable surface for one play session.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub density: MineDensity,
    pub downstairs: bool,
    pub descend: DescendTrigger,
    pub starting_health: i32,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, density: MineDensity) -> Self {
        Self {
            size,
            density,
            downstairs: true,
            descend: DescendTrigger::Automatic,
            starting_health: STARTING_HEALTH,
        }
    }

    pub fn new((size_x, size_y): Coord2, density: MineDensity) -> Self {
        let size_x = size_x.clamp(1, Coord::MAX);
        let size_y = size_y.clamp(1, Coord::MAX);
        Self::new_unchecked((size_x, size_y), density)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub fn mine_count(&self, level: u32) -> CellCount {
        self.density.mines_for(level, self.total_cells())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked((25, 20), MineDensity::default())
    }
}

/// Immutable facts of one generated level: where the mines are and
/// where the stairs down are. Play state lives in [`Board`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    mines: Array2<bool>,
    mine_count: CellCount,
    downstairs: Option<Coord2>,
}

impl LevelLayout {
    pub fn from_parts(mines: Array2<bool>, downstairs: Option<Coord2>) -> Self {
        let mine_count = mines
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap();
        if let Some(stairs) = downstairs {
            debug_assert!(!mines[stairs.nd()], "downstairs placed on a mine");
        }
        Self {
            mines,
            mine_count,
            downstairs,
        }
    }

    pub fn from_mine_coords(
        size: Coord2,
        mine_coords: &[Coord2],
        downstairs: Option<Coord2>,
    ) -> Result<Self> {
        let mut mines: Array2<bool> = Array2::default(size.nd());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::OutOfBounds);
            }
            mines[coords.nd()] = true;
        }

        if let Some(stairs) = downstairs {
            if stairs.0 >= size.0 || stairs.1 >= size.1 {
                return Err(GameError::OutOfBounds);
            }
        }

        Ok(Self::from_parts(mines, downstairs))
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    pub fn size(&self) -> Coord2 {
        self.mines.bounds()
    }

    pub fn total_cells(&self) -> CellCount {
        self.mines.len().try_into().unwrap()
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn downstairs(&self) -> Option<Coord2> {
        self.downstairs
    }

    pub fn is_downstairs(&self, coords: Coord2) -> bool {
        self.downstairs == Some(coords)
    }

    pub fn count_adjacent_mines(&self, coords: Coord2) -> u8 {
        self.mines
            .iter_adjacent(coords)
            .filter(|&pos| self[pos])
            .count()
            .try_into()
            .unwrap()
    }

    pub(crate) fn iter_adjacent(&self, coords: Coord2) -> impl Iterator<Item = Coord2> {
        self.mines.iter_adjacent(coords)
    }
}

impl Index<Coord2> for LevelLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mines[coords.nd()]
    }
}
