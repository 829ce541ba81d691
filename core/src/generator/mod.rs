use crate::*;
use smallvec::SmallVec;

pub use random::*;

mod random;

/// Builds the immutable layout for one level.
pub trait LevelGenerator {
    fn generate(self, config: GameConfig, level: u32) -> Result<LevelLayout>;
}

/// The 3x3 block around the entry point, clipped to the board. Always
/// mine-free, stairs-free, and pre-revealed.
pub fn safe_zone(origin: Coord2, bounds: Coord2) -> SmallVec<[Coord2; 9]> {
    debug_assert!(origin.0 < bounds.0 && origin.1 < bounds.1);

    let mut zone = SmallVec::new();
    zone.push(origin);
    zone.extend(iter_adjacent(origin, bounds));
    zone
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_zone_is_nine_cells_in_the_interior() {
        let zone = safe_zone((5, 5), (10, 10));

        assert_eq!(zone.len(), 9);
        assert!(zone.contains(&(5, 5)));
        assert!(zone.contains(&(4, 4)));
        assert!(zone.contains(&(6, 6)));
    }

    #[test]
    fn safe_zone_is_clipped_at_the_corner() {
        let zone = safe_zone((0, 0), (10, 10));

        assert_eq!(zone.len(), 4);
        assert!(zone.contains(&(0, 0)));
        assert!(zone.contains(&(1, 1)));
    }
}
