//! Transition rule: Conway's B3/S23 over a bounded grid.
//!
//! Cells outside the grid are dead. The rule never updates in place; the
//! next generation is always written into a separate buffer.

use super::grid::{Grid, GridError};

/// Relative offsets of the eight Moore neighbors.
#[rustfmt::skip]
const NEIGHBORS: [(isize, isize); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0),           (1, 0),
    (-1, 1),  (0, 1),  (1, 1),
];

/// Count the living neighbors of (x, y). Out-of-bounds neighbors are dead.
#[inline]
pub fn count_neighbors(grid: &Grid, x: isize, y: isize) -> u8 {
    NEIGHBORS
        .iter()
        .map(|&(dx, dy)| grid.get(x + dx, y + dy))
        .sum()
}

/// Compute the next state of one cell.
#[inline]
const fn next_state(alive: bool, neighbors: u8) -> u8 {
    match (alive, neighbors) {
        (true, 2 | 3) | (false, 3) => 1, // survival, birth
        _ => 0,
    }
}

/// Compute the next generation of `cur` into `next`.
///
/// # Errors
///
/// Returns [`GridError::Unallocated`] if either grid has no storage and
/// [`GridError::DimensionMismatch`] if the sizes differ. `next` is not
/// touched when an error is returned.
#[allow(clippy::cast_possible_wrap)]
pub fn step(cur: &Grid, next: &mut Grid) -> Result<(), GridError> {
    if !cur.is_allocated() || !next.is_allocated() {
        return Err(GridError::Unallocated);
    }
    if !cur.same_dimensions(next) {
        return Err(GridError::DimensionMismatch {
            expected: cur.dimensions(),
            found: next.dimensions(),
        });
    }

    for (y, row) in next.rows_mut().enumerate() {
        for (x, cell) in row.iter_mut().enumerate() {
            let (x, y) = (x as isize, y as isize);
            *cell = next_state(cur.is_alive(x, y), count_neighbors(cur, x, y));
        }
    }
    Ok(())
}

/// Run `steps` generations starting from `seed` and return the result.
///
/// Two buffers are swapped every generation; no history is kept.
///
/// # Errors
///
/// Propagates allocation and validation errors from [`step`].
pub fn advance(seed: &Grid, steps: usize) -> Result<Grid, GridError> {
    let mut cur = seed.try_clone()?;
    if steps == 0 {
        return Ok(cur);
    }
    let mut next = Grid::new(seed.width(), seed.height())?;
    for _ in 0..steps {
        step(&cur, &mut next)?;
        cur.swap(&mut next);
    }
    Ok(cur)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blinker() -> Grid {
        let mut grid = Grid::new(5, 5).unwrap();
        for x in 1..=3 {
            grid.set(x, 2, 1);
        }
        grid
    }

    #[test]
    fn test_count_neighbors_at_edges() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set(1, 0, 1);
        grid.set(0, 1, 1);
        grid.set(1, 1, 1);
        assert_eq!(count_neighbors(&grid, 0, 0), 3);
        assert_eq!(count_neighbors(&grid, 1, 1), 2);
        assert_eq!(count_neighbors(&grid, 2, 2), 1);
    }

    #[test]
    fn test_blinker_oscillates() {
        let grid = blinker();
        let mut next = Grid::new(5, 5).unwrap();
        step(&grid, &mut next).unwrap();
        for y in 0..5 {
            for x in 0..5 {
                assert_eq!(next.is_alive(x, y), x == 2 && (1..=3).contains(&y));
            }
        }
        assert_eq!(advance(&grid, 2).unwrap(), grid);
    }

    #[test]
    fn test_block_is_still_life() {
        let mut grid = Grid::new(4, 4).unwrap();
        for (x, y) in [(1, 1), (2, 1), (1, 2), (2, 2)] {
            grid.set(x, y, 1);
        }
        assert_eq!(advance(&grid, 7).unwrap(), grid);
    }

    #[test]
    fn test_step_rejects_mismatch_without_touching_next() {
        let grid = blinker();
        let mut next = Grid::new(4, 5).unwrap();
        next.set(0, 0, 1);
        assert!(matches!(
            step(&grid, &mut next),
            Err(GridError::DimensionMismatch { .. })
        ));
        assert!(next.is_alive(0, 0));
    }

    #[test]
    fn test_step_rejects_unallocated() {
        let mut next = Grid::new(2, 2).unwrap();
        assert_eq!(step(&Grid::default(), &mut next), Err(GridError::Unallocated));
    }

    #[test]
    fn test_advance_zero_steps_is_copy() {
        let grid = blinker();
        assert_eq!(advance(&grid, 0).unwrap(), grid);
    }
}
