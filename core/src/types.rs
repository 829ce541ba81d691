use ndarray::Array2;

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

/// Glue between `Coord2` and `ndarray` indexing.
pub trait AsNdIndex {
    fn nd(self) -> [usize; 2];
}

impl AsNdIndex for Coord2 {
    fn nd(self) -> [usize; 2] {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

const ADJACENT_DELTAS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// The up-to-8 in-bounds neighbors of `center`, in fixed scan order.
pub fn iter_adjacent(center: Coord2, bounds: Coord2) -> impl Iterator<Item = Coord2> {
    ADJACENT_DELTAS.iter().filter_map(move |&(dx, dy)| {
        let x = center.0.checked_add_signed(dx)?;
        let y = center.1.checked_add_signed(dy)?;
        (x < bounds.0 && y < bounds.1).then_some((x, y))
    })
}

pub trait AdjacentExt {
    fn bounds(&self) -> Coord2;

    fn iter_adjacent(&self, center: Coord2) -> impl Iterator<Item = Coord2> {
        iter_adjacent(center, self.bounds())
    }
}

impl<T> AdjacentExt for Array2<T> {
    fn bounds(&self) -> Coord2 {
        let dim = self.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn interior_cell_has_eight_neighbors() {
        let neighbors: Vec<_> = iter_adjacent((1, 1), (3, 3)).collect();

        assert_eq!(neighbors.len(), 8);
        assert!(!neighbors.contains(&(1, 1)));
    }

    #[test]
    fn corner_and_edge_cells_are_clipped() {
        assert_eq!(iter_adjacent((0, 0), (3, 3)).count(), 3);
        assert_eq!(iter_adjacent((1, 0), (3, 3)).count(), 5);
        assert_eq!(iter_adjacent((2, 2), (3, 3)).count(), 3);
    }

    #[test]
    fn degenerate_board_has_no_neighbors() {
        assert_eq!(iter_adjacent((0, 0), (1, 1)).count(), 0);
    }

    #[test]
    fn mult_saturates_instead_of_overflowing() {
        assert_eq!(mult(2, 3), 6);
        assert_eq!(mult(Coord::MAX, Coord::MAX), 65025);
    }
}
