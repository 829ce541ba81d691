use super::*;
use ndarray::Array2;

/// Seeded uniform generator. Blocks out the safe zone, places the exact
/// mine count by free-slot index (no rejection sampling, so a mine
/// count that fits always terminates), then picks the downstairs cell
/// among whatever is still free.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomLevelGenerator {
    seed: u64,
    origin: Coord2,
}

impl RandomLevelGenerator {
    pub fn new(seed: u64, origin: Coord2) -> Self {
        Self { seed, origin }
    }
}

impl LevelGenerator for RandomLevelGenerator {
    fn generate(self, config: GameConfig, level: u32) -> Result<LevelLayout> {
        use rand::prelude::*;

        let size = config.size;
        let mines_wanted = config.mine_count(level);
        let zone = safe_zone(self.origin, size);

        let reserved: CellCount = if config.downstairs { 1 } else { 0 };
        let usable = config.total_cells() - zone.len() as CellCount;
        if mines_wanted.saturating_add(reserved) > usable {
            return Err(GameError::TooManyMines);
        }

        // Blocked cells count as occupied while placing, then revert.
        let mut mask: Array2<bool> = Array2::default(size.nd());
        for &coords in &zone {
            mask[coords.nd()] = true;
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut free = usable;
        for _ in 0..mines_wanted {
            let slot = rng.random_range(0..free);
            let coords = nth_free_cell(&mask, slot);
            mask[coords.nd()] = true;
            free -= 1;
        }

        let downstairs = config
            .downstairs
            .then(|| nth_free_cell(&mask, rng.random_range(0..free)));

        for &coords in &zone {
            mask[coords.nd()] = false;
        }

        let layout = LevelLayout::from_parts(mask, downstairs);
        if layout.mine_count() != mines_wanted {
            log::warn!(
                "mine placement mismatch: placed {}, wanted {}",
                layout.mine_count(),
                mines_wanted
            );
        }
        Ok(layout)
    }
}

/// Coordinates of the `slot`-th unoccupied cell in row-major order.
fn nth_free_cell(mask: &Array2<bool>, mut slot: CellCount) -> Coord2 {
    for ((x, y), &occupied) in mask.indexed_iter() {
        if occupied {
            continue;
        }
        if slot == 0 {
            return (x as Coord, y as Coord);
        }
        slot -= 1;
    }
    unreachable!("free-slot index past the end of the board");
}
