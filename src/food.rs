use std::collections::HashSet;

use rand::Rng;

use crate::grid::{Cell, GridSize};

/// Random draws attempted before falling back to a scan of free cells.
pub const MAX_SAMPLE_ATTEMPTS: usize = 64;

/// Picks a uniformly random cell that is not in `occupied`.
///
/// Samples the whole grid and redraws on collision. After
/// [`MAX_SAMPLE_ATTEMPTS`] misses the free cells are enumerated and one is
/// picked directly, so a crowded board still resolves in bounded time.
/// Returns `None` only when `occupied` covers every cell.
#[must_use]
pub fn place<R: Rng + ?Sized>(
    rng: &mut R,
    grid: GridSize,
    occupied: &HashSet<Cell>,
) -> Option<Cell> {
    let bound = i32::from(grid.tile_count());

    for _ in 0..MAX_SAMPLE_ATTEMPTS {
        let candidate = Cell {
            x: rng.gen_range(0..bound),
            y: rng.gen_range(0..bound),
        };
        if !occupied.contains(&candidate) {
            return Some(candidate);
        }
    }

    let free: Vec<Cell> = grid.cells().filter(|cell| !occupied.contains(cell)).collect();
    if free.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..free.len());
    Some(free[index])
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;

    use crate::grid::{Cell, GridSize};

    use super::place;

    #[test]
    fn food_never_lands_on_occupied_cell() {
        let mut rng = StdRng::seed_from_u64(7);
        let grid = GridSize::new(8);
        let occupied: HashSet<Cell> = [Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0)]
            .into_iter()
            .collect();

        for _ in 0..200 {
            let cell = place(&mut rng, grid, &occupied).expect("grid has free cells");
            assert!(!occupied.contains(&cell));
            assert!(cell.is_within(grid));
        }
    }

    #[test]
    fn crowded_boards_still_yield_a_free_cell() {
        let grid = GridSize::new(12);
        let total = grid.total_cells();

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            for percent in [10, 40, 75, 91, 95, 98, 99] {
                let mut cells: Vec<Cell> = grid.cells().collect();
                cells.shuffle(&mut rng);
                let taken = (total * percent / 100).min(total - 1);
                let occupied: HashSet<Cell> = cells.into_iter().take(taken).collect();

                let cell = place(&mut rng, grid, &occupied)
                    .unwrap_or_else(|| panic!("seed {seed} at {percent}% found no cell"));
                assert!(cell.is_within(grid));
                assert!(!occupied.contains(&cell), "seed {seed} at {percent}% hit {cell:?}");
            }
        }
    }

    #[test]
    fn single_free_cell_is_found() {
        let mut rng = StdRng::seed_from_u64(11);
        let grid = GridSize::new(10);
        let free = Cell::new(7, 3);
        let occupied: HashSet<Cell> = grid.cells().filter(|cell| *cell != free).collect();

        assert_eq!(place(&mut rng, grid, &occupied), Some(free));
    }

    #[test]
    fn full_grid_yields_none() {
        let mut rng = StdRng::seed_from_u64(3);
        let grid = GridSize::new(4);
        let occupied: HashSet<Cell> = grid.cells().collect();

        assert_eq!(place(&mut rng, grid, &occupied), None);
    }
}
