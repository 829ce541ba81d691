use alloc::collections::{BTreeSet, VecDeque};
use core::num::Saturating;
use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Result of one dig call: the unit of player interaction with the
/// grid. `cells_revealed` counts every unrevealed-to-revealed
/// transition of this single call, cascade included.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DigOutcome {
    pub hit_mine: bool,
    pub loot: Option<LootKind>,
    pub cells_revealed: CellCount,
}

impl DigOutcome {
    pub const fn has_update(self) -> bool {
        self.hit_mine || self.cells_revealed > 0
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FlagOutcome {
    NoChange,
    Changed,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Mutable play state over one level's layout. Discarded wholesale on
/// descent; never partially rebuilt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    layout: LevelLayout,
    cells: Array2<CellState>,
    revealed_count: Saturating<CellCount>,
}

impl Board {
    pub fn new(layout: LevelLayout) -> Self {
        let size = layout.size();
        Self {
            layout,
            cells: Array2::default(size.nd()),
            revealed_count: Saturating(0),
        }
    }

    pub fn size(&self) -> Coord2 {
        self.layout.size()
    }

    pub fn layout(&self) -> &LevelLayout {
        &self.layout
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count.0
    }

    pub fn state_at(&self, coords: Coord2) -> CellState {
        self.cells[coords.nd()]
    }

    /// Render-facing view of one cell.
    pub fn snapshot_at(&self, coords: Coord2) -> CellSnapshot {
        match self.state_at(coords) {
            CellState::Hidden => CellSnapshot::Hidden,
            CellState::Flagged => CellSnapshot::Flagged,
            CellState::Revealed(adjacent_mines) => CellSnapshot::Open {
                adjacent_mines,
                is_downstairs: self.layout.is_downstairs(coords),
            },
            CellState::Exploded => CellSnapshot::Exploded,
        }
    }

    /// Flips the flag on a hidden cell. Revealed cells are immune.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        use FlagOutcome::*;

        let coords = self.layout.validate_coords(coords)?;

        Ok(match self.cells[coords.nd()] {
            CellState::Hidden => {
                self.cells[coords.nd()] = CellState::Flagged;
                Changed
            }
            CellState::Flagged => {
                self.cells[coords.nd()] = CellState::Hidden;
                Changed
            }
            CellState::Revealed(_) | CellState::Exploded => NoChange,
        })
    }

    /// Digs one cell. Flagged and already-revealed targets are a no-op.
    /// A mine explodes with no cascade and no loot; a safe cell rolls
    /// the loot ladder exactly once and cascades when it borders no
    /// mines.
    pub fn dig<R: Rng + ?Sized>(&mut self, coords: Coord2, rng: &mut R) -> Result<DigOutcome> {
        let coords = self.layout.validate_coords(coords)?;

        if !matches!(self.cells[coords.nd()], CellState::Hidden) {
            return Ok(DigOutcome::default());
        }

        if self.layout.contains_mine(coords) {
            self.cells[coords.nd()] = CellState::Exploded;
            self.revealed_count += 1;
            return Ok(DigOutcome {
                hit_mine: true,
                loot: None,
                cells_revealed: 1,
            });
        }

        let loot = loot::roll(rng);
        let cells_revealed = self.reveal_cascading(coords);

        Ok(DigOutcome {
            hit_mine: false,
            loot,
            cells_revealed,
        })
    }

    /// Pre-reveals the generation safe zone with the same cascade a dig
    /// uses. No loot and no points for these cells.
    pub(crate) fn reveal_safe_zone(&mut self, origin: Coord2) {
        for coords in safe_zone(origin, self.size()) {
            // generated layouts keep the zone mine-free; fixed layouts
            // may not, and a mine must never be opened by the pre-reveal
            if !self.layout.contains_mine(coords) {
                self.reveal_cascading(coords);
            }
        }
    }

    /// Reveals `start` and, when it borders no mines, flood-fills the
    /// connected zero region plus its rim. Iterative: the work list is
    /// bounded by the board, the call stack is not. Flagged cells stop
    /// the flood; mines are unreachable from a zero cell.
    fn reveal_cascading(&mut self, start: Coord2) -> CellCount {
        if !matches!(self.cells[start.nd()], CellState::Hidden) {
            return 0;
        }

        let mut revealed = 0;
        let mut visited = BTreeSet::from([start]);
        let mut to_visit = VecDeque::from([start]);

        while let Some(coords) = to_visit.pop_front() {
            if !matches!(self.cells[coords.nd()], CellState::Hidden) {
                continue;
            }

            let adjacent_mines = self.layout.count_adjacent_mines(coords);
            self.cells[coords.nd()] = CellState::Revealed(adjacent_mines);
            self.revealed_count += 1;
            revealed += 1;

            if adjacent_mines == 0 {
                to_visit.extend(
                    self.layout
                        .iter_adjacent(coords)
                        .filter(|&pos| matches!(self.cells[pos.nd()], CellState::Hidden))
                        .filter(|&pos| visited.insert(pos)),
                );
            }
        }

        revealed
    }
}
