use serde::{Deserialize, Serialize};

/// Canonical play-state of a single grid position.
///
/// `Revealed` carries the 8-neighbor mine count; a dug mine becomes
/// `Exploded` and never carries a count.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Flagged,
    Revealed(u8),
    Exploded,
}

impl CellState {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}

/// What a renderer is allowed to see for one cell. Hidden and flagged
/// cells leak nothing about the layout underneath.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellSnapshot {
    Hidden,
    Flagged,
    Open { adjacent_mines: u8, is_downstairs: bool },
    Exploded,
}
