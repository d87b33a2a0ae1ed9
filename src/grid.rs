/// Default canvas edge length in pixels.
pub const DEFAULT_CANVAS_PX: u32 = 400;

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_PX: u32 = 20;

/// Smallest grid that leaves room for food beside a one-cell snake.
pub const MIN_TILE_COUNT: u16 = 2;

/// Grid cell in logical tile coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this cell shifted by a unit delta.
    #[must_use]
    pub fn offset(self, (dx, dy): (i32, i32)) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Returns true when the cell lies inside `[0, tile_count)` on both axes.
    #[must_use]
    pub fn is_within(self, grid: GridSize) -> bool {
        let bound = i32::from(grid.tile_count());
        (0..bound).contains(&self.x) && (0..bound).contains(&self.y)
    }
}

/// Square play field measured in tiles.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    tile_count: u16,
}

impl GridSize {
    /// Creates a grid with `tile_count` tiles per side.
    ///
    /// # Panics
    ///
    /// Panics when `tile_count` is below [`MIN_TILE_COUNT`]; a 1×1 grid has no
    /// cell left for food once the snake spawns.
    #[must_use]
    pub fn new(tile_count: u16) -> Self {
        assert!(
            tile_count >= MIN_TILE_COUNT,
            "grid tile count must be at least {MIN_TILE_COUNT}"
        );
        Self { tile_count }
    }

    /// Derives the tile count from a canvas edge and a tile edge, both in pixels.
    ///
    /// # Panics
    ///
    /// Panics when `tile_px` is zero or the canvas holds fewer than
    /// [`MIN_TILE_COUNT`] whole tiles per side.
    #[must_use]
    pub fn from_canvas(canvas_px: u32, tile_px: u32) -> Self {
        assert!(tile_px > 0, "tile size must be positive");
        let tiles = u16::try_from(canvas_px / tile_px).unwrap_or(u16::MAX);
        Self::new(tiles)
    }

    #[must_use]
    pub fn tile_count(self) -> u16 {
        self.tile_count
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.tile_count) * usize::from(self.tile_count)
    }

    /// Iterates every cell row by row.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        let bound = i32::from(self.tile_count);
        (0..bound).flat_map(move |y| (0..bound).map(move |x| Cell { x, y }))
    }

    /// Returns the fixed spawn cell at the center of the grid.
    #[must_use]
    pub fn origin(self) -> Cell {
        let half = i32::from(self.tile_count / 2);
        Cell { x: half, y: half }
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::from_canvas(DEFAULT_CANVAS_PX, DEFAULT_TILE_PX)
    }
}
