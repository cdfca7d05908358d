use ndarray::Array2;

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for mine counts, tile counts, and constraint targets.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Linearizes `(x, y)` into row-major order, matching the index space
/// benchmark case files are written in.
pub const fn linear_index(coords: Coord2, size: Coord2) -> usize {
    coords.1 as usize * size.0 as usize + coords.0 as usize
}

pub const fn coords_of(index: usize, size: Coord2) -> Coord2 {
    let cols = size.0 as usize;
    ((index % cols) as Coord, (index / cols) as Coord)
}

pub trait NeighborIterExt {
    /// 8-neighbourhood (king move), clipped at the grid edges.
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter;
    /// 4-neighbourhood (orthogonal), clipped at the grid edges.
    fn iter_orthogonal_neighbors(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter {
        let dim = self.dim();
        let size = (dim.0.try_into().unwrap(), dim.1.try_into().unwrap());
        NeighborIter::new(index, size, &DISPLACEMENTS_8)
    }

    fn iter_orthogonal_neighbors(&self, index: Coord2) -> NeighborIter {
        let dim = self.dim();
        let size = (dim.0.try_into().unwrap(), dim.1.try_into().unwrap());
        NeighborIter::new(index, size, &DISPLACEMENTS_4)
    }
}

const DISPLACEMENTS_8: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const DISPLACEMENTS_4: [(isize, isize); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (isize, isize), bounds: Coord2) -> Option<Coord2> {
    let (x, y) = coords;
    let (dx, dy) = delta;
    let (max_x, max_y) = bounds;

    let next_x = x.checked_add_signed(dx.try_into().ok()?)?;
    if next_x >= max_x {
        return None;
    }

    let next_y = y.checked_add_signed(dy.try_into().ok()?)?;
    if next_y >= max_y {
        return None;
    }

    Some((next_x, next_y))
}

#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    displacements: &'static [(isize, isize)],
    index: u8,
}

impl NeighborIter {
    fn new(center: Coord2, bounds: Coord2, displacements: &'static [(isize, isize)]) -> Self {
        Self {
            center,
            bounds,
            displacements,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= self.displacements.len() {
                return None;
            }

            let next_item = apply_delta(self.center, self.displacements[self.index as usize], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn corner_has_three_neighbors() {
        let grid: Array2<u8> = Array2::default((3, 3));
        let neighbors: Vec<_> = grid.iter_neighbors((0, 0)).collect();
        assert_eq!(neighbors.len(), 3);
    }

    #[test]
    fn orthogonal_neighbors_exclude_diagonals() {
        let grid: Array2<u8> = Array2::default((3, 3));
        let neighbors: Vec<_> = grid.iter_orthogonal_neighbors((1, 1)).collect();
        assert_eq!(neighbors.len(), 4);
        assert!(!neighbors.contains(&(0, 0)));
    }

    #[test]
    fn linear_index_round_trips() {
        let size = (9, 9);
        for y in 0..size.1 {
            for x in 0..size.0 {
                let idx = linear_index((x, y), size);
                assert_eq!(coords_of(idx, size), (x, y));
            }
        }
    }
}
