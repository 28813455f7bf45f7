//! Grid: A fixed-size 2D buffer of boolean cells.
//!
//! The grid uses contiguous memory allocation for cache efficiency.
//! Cells are stored in row-major order, one `u8` per cell holding 0 or 1.

use std::fmt;

/// Errors produced by grid construction and grid-to-grid operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Width or height is zero.
    InvalidDimensions {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },
    /// `width * height` does not fit in `usize`.
    Overflow {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },
    /// The cell storage could not be allocated.
    Allocation {
        /// Number of cells requested.
        cells: usize,
    },
    /// Two grids that must share dimensions do not.
    DimensionMismatch {
        /// Dimensions of the source grid.
        expected: (usize, usize),
        /// Dimensions of the destination grid.
        found: (usize, usize),
    },
    /// The grid has no cell storage.
    Unallocated,
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => {
                write!(f, "invalid grid dimensions {width}x{height}")
            }
            Self::Overflow { width, height } => {
                write!(f, "grid dimensions {width}x{height} overflow the addressable size")
            }
            Self::Allocation { cells } => write!(f, "failed to allocate {cells} cells"),
            Self::DimensionMismatch { expected, found } => write!(
                f,
                "grid dimension mismatch: expected {}x{}, found {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
            Self::Unallocated => write!(f, "grid is not allocated"),
        }
    }
}

impl std::error::Error for GridError {}

/// Validate dimensions and compute the cell count without allocating.
fn cell_count(width: usize, height: usize) -> Result<usize, GridError> {
    if width == 0 || height == 0 {
        return Err(GridError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(GridError::Overflow { width, height })
}

/// Allocate `count` zeroed cells, reporting failure instead of aborting.
fn zeroed_cells(count: usize) -> Result<Vec<u8>, GridError> {
    let mut cells = Vec::new();
    cells
        .try_reserve_exact(count)
        .map_err(|_| GridError::Allocation { cells: count })?;
    cells.resize(count, 0);
    Ok(cells)
}

/// A grid of cells, each either dead (0) or alive (1).
///
/// Access is in row-major order: `index = y * width + x`.
///
/// A `Grid::default()` is *unallocated*: it has no storage and reads as
/// 0x0. It is distinct from any sized grid, which always has `width > 0`
/// and `height > 0`. Reads on it return 0 and writes are ignored.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Grid {
    /// Contiguous cell storage (row-major order). Empty when unallocated.
    cells: Vec<u8>,
    /// Width in cells.
    width: usize,
    /// Height in cells.
    height: usize,
}

impl Grid {
    /// Create a new grid with the given dimensions.
    ///
    /// All cells are initialized to dead.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] if either dimension is 0,
    /// [`GridError::Overflow`] if `width * height` overflows, and
    /// [`GridError::Allocation`] if the storage cannot be reserved. The
    /// overflow check runs before anything is allocated.
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        let count = cell_count(width, height)?;
        Ok(Self {
            cells: zeroed_cells(count)?,
            width,
            height,
        })
    }

    /// Wrap already-parsed cells. `cells` must hold `width * height` values
    /// of 0 or 1.
    pub(crate) fn from_cells(
        width: usize,
        height: usize,
        cells: Vec<u8>,
    ) -> Result<Self, GridError> {
        if cell_count(width, height)? != cells.len() {
            return Err(GridError::InvalidDimensions { width, height });
        }
        Ok(Self {
            cells,
            width,
            height,
        })
    }

    /// Get the grid width (0 when unallocated).
    #[inline]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Get the grid height (0 when unallocated).
    #[inline]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Get `(width, height)`.
    #[inline]
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Get the total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the grid has no cells (only true when unallocated).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Check whether the grid owns cell storage.
    #[inline]
    pub fn is_allocated(&self) -> bool {
        !self.cells.is_empty()
    }

    /// Check whether two grids have identical dimensions.
    #[inline]
    pub const fn same_dimensions(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Get a reference to the underlying cell slice.
    #[inline]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Convert signed (x, y) coordinates to a linear index.
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn index_of(&self, x: isize, y: isize) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    /// Read the cell at (x, y).
    ///
    /// Returns 0 for coordinates outside the grid and for an unallocated
    /// grid, so neighbor counting needs no edge special-casing.
    #[inline]
    pub fn get(&self, x: isize, y: isize) -> u8 {
        self.index_of(x, y).map_or(0, |i| self.cells[i])
    }

    /// Check whether the cell at (x, y) is alive.
    #[inline]
    pub fn is_alive(&self, x: isize, y: isize) -> bool {
        self.get(x, y) != 0
    }

    /// Write the cell at (x, y), normalizing `value` to 0 or 1.
    ///
    /// Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: isize, y: isize, value: u8) {
        if let Some(i) = self.index_of(x, y) {
            self.cells[i] = u8::from(value != 0);
        }
    }

    /// Mark the cell at (x, y) alive or dead.
    #[inline]
    pub fn set_alive(&mut self, x: isize, y: isize, alive: bool) {
        self.set(x, y, u8::from(alive));
    }

    /// Flip the cell at (x, y).
    pub fn toggle(&mut self, x: isize, y: isize) {
        if let Some(i) = self.index_of(x, y) {
            self.cells[i] ^= 1;
        }
    }

    /// Count living cells.
    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    /// Kill every cell in place.
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Resize the grid, preserving the overlapping rectangle.
    ///
    /// Newly exposed cells are dead. On an unallocated grid this behaves
    /// exactly like [`Grid::new`].
    ///
    /// # Errors
    ///
    /// Same as [`Grid::new`]. On error the grid is left unchanged.
    pub fn resize(&mut self, new_width: usize, new_height: usize) -> Result<(), GridError> {
        let new_count = cell_count(new_width, new_height)?;

        if !self.is_allocated() {
            *self = Self::new(new_width, new_height)?;
            return Ok(());
        }

        let mut new_cells = zeroed_cells(new_count)?;

        let copy_width = self.width.min(new_width);
        let copy_height = self.height.min(new_height);

        for y in 0..copy_height {
            let old_start = y * self.width;
            let new_start = y * new_width;
            new_cells[new_start..new_start + copy_width]
                .copy_from_slice(&self.cells[old_start..old_start + copy_width]);
        }

        self.cells = new_cells;
        self.width = new_width;
        self.height = new_height;
        Ok(())
    }

    /// Deep copy that reports allocation failure instead of aborting.
    ///
    /// Cloning an unallocated grid yields another unallocated grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Allocation`] if the copy cannot be reserved.
    pub fn try_clone(&self) -> Result<Self, GridError> {
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(self.cells.len())
            .map_err(|_| GridError::Allocation {
                cells: self.cells.len(),
            })?;
        cells.extend_from_slice(&self.cells);
        Ok(Self {
            cells,
            width: self.width,
            height: self.height,
        })
    }

    /// Swap the contents of two grids.
    ///
    /// This is O(1) - just pointer swaps.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Get an iterator over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Get a mutable iterator over rows.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [u8]> {
        self.cells.chunks_mut(self.width.max(1))
    }

}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("alive", &self.alive_count())
            .finish()
    }
}
