//! Viewport: Fit a grid into a terminal area.
//!
//! Terminal cells are roughly twice as tall as they are wide, so one grid
//! cell is drawn as `2 * scale` columns by `scale` rows. The scale is the
//! largest integer that fits the whole grid, never less than 1; a grid that
//! is too large even at scale 1 is clipped to its top-left corner.

/// Placement of a grid inside a terminal area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Terminal rows per grid cell; a cell spans twice as many columns.
    pub scale: usize,
    /// First terminal column of the grid.
    pub offset_x: usize,
    /// First terminal row of the grid.
    pub offset_y: usize,
    /// Number of grid columns that fit.
    pub visible_width: usize,
    /// Number of grid rows that fit.
    pub visible_height: usize,
}

impl Viewport {
    /// Compute the placement of a `grid_width` x `grid_height` grid in an
    /// area of `cols` x `rows` terminal cells.
    pub fn fit(grid_width: usize, grid_height: usize, cols: u16, rows: u16) -> Self {
        let cols = usize::from(cols);
        let rows = usize::from(rows);
        if grid_width == 0 || grid_height == 0 {
            return Self {
                scale: 1,
                offset_x: 0,
                offset_y: 0,
                visible_width: 0,
                visible_height: 0,
            };
        }

        let scale = (cols / (2 * grid_width)).min(rows / grid_height).max(1);
        let cell_cols = 2 * scale;
        let visible_width = grid_width.min(cols / cell_cols);
        let visible_height = grid_height.min(rows / scale);

        Self {
            scale,
            offset_x: (cols - visible_width * cell_cols) / 2,
            offset_y: (rows - visible_height * scale) / 2,
            visible_width,
            visible_height,
        }
    }

    /// Columns per grid cell.
    #[inline]
    pub const fn cell_cols(&self) -> usize {
        2 * self.scale
    }

    /// The grid cell drawn at terminal position (`col`, `row`), if any.
    pub const fn cell_at(&self, col: usize, row: usize) -> Option<(usize, usize)> {
        if col < self.offset_x || row < self.offset_y {
            return None;
        }
        let x = (col - self.offset_x) / self.cell_cols();
        let y = (row - self.offset_y) / self.scale;
        if x < self.visible_width && y < self.visible_height {
            Some((x, y))
        } else {
            None
        }
    }
}
