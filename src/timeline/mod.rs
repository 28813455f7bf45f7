//! Timeline module: Bounded undo/redo history of grid snapshots.
//!
//! A timeline records a linear sequence of immutable [`Grid`] snapshots and
//! a cursor addressing the "present" one. Two storage strategies implement
//! the same [`Timeline`] contract:
//!
//! - [`ChainTimeline`]: a doubly-linked chain of arena nodes, evicting from the head
//! - [`RingTimeline`]: a preallocated circular buffer with logical/physical translation
//!
//! # Contract
//!
//! - The timeline is never empty and the cursor always addresses a live snapshot.
//! - `push` from a non-tail cursor first discards everything after the cursor.
//! - With a non-zero capacity, a push that overflows evicts the oldest snapshot.
//! - `back`/`forward` never allocate; at either end they return `false`.
//! - A failed `push` leaves the timeline exactly as it was.

mod chain;
mod ring;

pub use chain::ChainTimeline;
pub use ring::{RingTimeline, DEFAULT_RING_CAPACITY};

use crate::grid::{Grid, GridError};
use std::fmt;
use std::str::FromStr;

/// Errors produced by timeline construction and `push`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineError {
    /// The seed or pushed grid has no cell storage.
    Unallocated,
    /// Cloning the grid into a snapshot failed.
    Snapshot(GridError),
    /// The timeline's own storage (node or slot) could not be reserved.
    Storage {
        /// Number of entries requested.
        entries: usize,
    },
}

impl fmt::Display for TimelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unallocated => write!(f, "cannot record an unallocated grid"),
            Self::Snapshot(e) => write!(f, "snapshot failed: {e}"),
            Self::Storage { entries } => {
                write!(f, "failed to reserve timeline storage for {entries} entries")
            }
        }
    }
}

impl std::error::Error for TimelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Snapshot(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for TimelineError {
    fn from(e: GridError) -> Self {
        Self::Snapshot(e)
    }
}

/// Clone `grid` into a new snapshot, rejecting unallocated grids.
fn snapshot(grid: &Grid) -> Result<Grid, TimelineError> {
    if !grid.is_allocated() {
        return Err(TimelineError::Unallocated);
    }
    Ok(grid.try_clone()?)
}

/// The capability set shared by every timeline strategy.
///
/// Construction (`init`) is each strategy's `new`; destruction is `Drop`.
pub trait Timeline {
    /// Record a clone of `grid` as the new present.
    ///
    /// Discards every snapshot after the cursor, appends the clone at the
    /// tail, evicts the oldest snapshot if the capacity is exceeded, and
    /// moves the cursor to the new tail. The caller keeps ownership of
    /// `grid`.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::Unallocated`] for an unallocated grid and an
    /// allocation error if the snapshot or its storage cannot be reserved.
    /// On error the timeline is unchanged.
    fn push(&mut self, grid: &Grid) -> Result<(), TimelineError>;

    /// Move the cursor one snapshot back. Returns whether it moved.
    fn back(&mut self) -> bool;

    /// Move the cursor one snapshot forward. Returns whether it moved.
    fn forward(&mut self) -> bool;

    /// The snapshot at the cursor.
    fn current(&self) -> &Grid;

    /// Whether [`Timeline::back`] would move.
    fn can_back(&self) -> bool;

    /// Whether [`Timeline::forward`] would move.
    fn can_forward(&self) -> bool;

    /// Discard every snapshot after the cursor.
    fn clear_forward(&mut self);

    /// Number of stored snapshots (always at least 1).
    fn len(&self) -> usize;

    /// Always `false`: a live timeline holds at least one snapshot.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Logical position of the cursor, 0 being the oldest snapshot.
    fn cursor(&self) -> usize;

    /// Maximum number of snapshots, 0 meaning unbounded.
    fn capacity(&self) -> usize;

    /// The snapshot at logical position `index`, oldest first.
    fn get(&self, index: usize) -> Option<&Grid>;

    /// Which strategy backs this timeline.
    fn strategy(&self) -> Strategy;
}

/// Storage strategy selected when a timeline is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// Linked chain of nodes, unbounded when the capacity is 0.
    #[default]
    Chain,
    /// Fixed-size circular buffer.
    Ring,
}

impl Strategy {
    /// All strategies, for exhaustive testing and benchmarking.
    pub const ALL: [Self; 2] = [Self::Chain, Self::Ring];

    /// Create a timeline of this strategy seeded with a clone of `seed`.
    ///
    /// # Errors
    ///
    /// See [`ChainTimeline::new`] and [`RingTimeline::new`].
    pub fn build(self, seed: &Grid, capacity: usize) -> Result<Box<dyn Timeline>, TimelineError> {
        Ok(match self {
            Self::Chain => Box::new(ChainTimeline::new(seed, capacity)?),
            Self::Ring => Box::new(RingTimeline::new(seed, capacity)?),
        })
    }

    /// Short lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Chain => "chain",
            Self::Ring => "ring",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chain" | "list" => Ok(Self::Chain),
            "ring" => Ok(Self::Ring),
            other => Err(format!("unknown timeline strategy '{other}' (expected chain or ring)")),
        }
    }
}

impl fmt::Debug for dyn Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("strategy", &self.strategy())
            .field("len", &self.len())
            .field("cursor", &self.cursor())
            .field("capacity", &self.capacity())
            .finish()
    }
}
