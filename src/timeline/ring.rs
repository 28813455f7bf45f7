//! Ring timeline: A fixed-size circular buffer of snapshot slots.
//!
//! ```text
//!  physical:  0     1     2     3     4
//!           ┌─────┬─────┬─────┬─────┬─────┐
//!           │ g5  │ g6  │  ·  │ g3  │ g4  │     capacity = 5
//!           └─────┴─────┴─────┴─────┴─────┘
//!                              ▲
//!                            start          logical 0 = g3, logical 3 = g6
//! ```
//!
//! The cursor and length are logical; every slot access goes through
//! [`physical`], so wrap-around lives in exactly one place.

use super::{snapshot, Strategy, Timeline, TimelineError};
use crate::grid::Grid;

/// Capacity used when a ring timeline is asked to be unbounded.
///
/// A ring needs a physical backing array, so "unbounded" (capacity 0) is
/// approximated by this many slots.
pub const DEFAULT_RING_CAPACITY: usize = 512;

/// Translate a logical offset into a physical slot index.
#[inline]
pub(crate) const fn physical(start: usize, logical: usize, capacity: usize) -> usize {
    (start + logical) % capacity
}

/// Timeline backed by a preallocated circular buffer.
///
/// All slots are reserved up front, so memory is sized to the capacity
/// regardless of how many snapshots are stored.
#[derive(Debug)]
pub struct RingTimeline {
    /// Physical slots; `None` outside the live window.
    slots: Vec<Option<Grid>>,
    /// Physical index of the logically oldest snapshot.
    start: usize,
    /// Number of live snapshots.
    len: usize,
    /// Logical offset of the cursor in `[0, len)`.
    cursor: usize,
}

impl RingTimeline {
    /// Create a ring holding a clone of `seed` as its only snapshot.
    ///
    /// A `capacity` of 0 is replaced by [`DEFAULT_RING_CAPACITY`].
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::Unallocated`] for an unallocated seed and an
    /// allocation error if the clone or the slot array cannot be reserved.
    pub fn new(seed: &Grid, capacity: usize) -> Result<Self, TimelineError> {
        let capacity = if capacity == 0 {
            log::debug!(
                "ring timeline cannot be unbounded, using {DEFAULT_RING_CAPACITY} slots"
            );
            DEFAULT_RING_CAPACITY
        } else {
            capacity
        };

        let grid = snapshot(seed)?;
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| TimelineError::Storage { entries: capacity })?;
        slots.resize_with(capacity, || None);
        slots[0] = Some(grid);

        log::debug!(
            "ring timeline created ({}x{}, capacity {})",
            seed.width(),
            seed.height(),
            capacity
        );

        Ok(Self {
            slots,
            start: 0,
            len: 1,
            cursor: 0,
        })
    }

    #[inline]
    fn physical(&self, logical: usize) -> usize {
        physical(self.start, logical, self.slots.len())
    }

    fn slot(&self, logical: usize) -> Option<&Grid> {
        self.slots[self.physical(logical)].as_ref()
    }
}

impl Timeline for RingTimeline {
    fn push(&mut self, grid: &Grid) -> Result<(), TimelineError> {
        let grid = snapshot(grid)?;

        if self.cursor + 1 != self.len {
            self.clear_forward();
        }

        let capacity = self.slots.len();
        if self.len < capacity {
            let phys = self.physical(self.len);
            self.slots[phys] = Some(grid);
            self.len += 1;
        } else {
            // Full: drop the oldest, then write at the new logical tail.
            self.slots[self.start] = None;
            self.start = physical(self.start, 1, capacity);
            let phys = self.physical(self.len - 1);
            self.slots[phys] = Some(grid);
            log::trace!("ring timeline evicted oldest snapshot, start = {}", self.start);
        }
        self.cursor = self.len - 1;
        Ok(())
    }

    fn back(&mut self) -> bool {
        if self.can_back() {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    fn forward(&mut self) -> bool {
        if self.can_forward() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    fn current(&self) -> &Grid {
        self.slot(self.cursor)
            .unwrap_or_else(|| unreachable!("ring cursor {} addresses an empty slot", self.cursor))
    }

    fn can_back(&self) -> bool {
        self.cursor > 0
    }

    fn can_forward(&self) -> bool {
        self.cursor + 1 < self.len
    }

    fn clear_forward(&mut self) {
        for logical in self.cursor + 1..self.len {
            let phys = self.physical(logical);
            self.slots[phys] = None;
        }
        self.len = self.cursor + 1;
    }

    fn len(&self) -> usize {
        self.len
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn get(&self, index: usize) -> Option<&Grid> {
        if index < self.len {
            self.slot(index)
        } else {
            None
        }
    }

    fn strategy(&self) -> Strategy {
        Strategy::Ring
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marked(i: isize) -> Grid {
        let mut grid = Grid::new(8, 1).unwrap();
        grid.set(i, 0, 1);
        grid
    }

    fn marker(grid: &Grid) -> Option<isize> {
        (0..8).find(|&x| grid.is_alive(x, 0))
    }

    #[test]
    fn test_physical_wraps() {
        assert_eq!(physical(0, 0, 5), 0);
        assert_eq!(physical(3, 1, 5), 4);
        assert_eq!(physical(3, 2, 5), 0);
        assert_eq!(physical(4, 4, 5), 3);
        assert_eq!(physical(0, 4, 1), 0);
    }

    #[test]
    fn test_ring_unbounded_uses_default_capacity() {
        let timeline = RingTimeline::new(&marked(0), 0).unwrap();
        assert_eq!(timeline.capacity(), DEFAULT_RING_CAPACITY);
    }

    #[test]
    fn test_ring_wraps_start() {
        let mut timeline = RingTimeline::new(&marked(0), 5).unwrap();
        for i in 1..=6 {
            timeline.push(&marked(i)).unwrap();
        }
        // Seven pushes into five slots: g0 and g1 evicted, start moved twice.
        assert_eq!(timeline.len(), 5);
        assert_eq!(timeline.start, 2);
        let order: Vec<_> = (0..5).map(|i| timeline.get(i).and_then(marker)).collect();
        assert_eq!(order, [Some(2), Some(3), Some(4), Some(5), Some(6)]);
    }

    #[test]
    fn test_ring_clear_forward_across_wrap() {
        let mut timeline = RingTimeline::new(&marked(0), 4).unwrap();
        for i in 1..=5 {
            timeline.push(&marked(i)).unwrap();
        }
        // Live window is g2..g5 with start = 2, wrapping past the end.
        timeline.back();
        timeline.back();
        timeline.clear_forward();
        assert_eq!(timeline.len(), 2);
        assert_eq!(marker(timeline.current()), Some(3));

        let live = timeline.slots.iter().filter(|s| s.is_some()).count();
        assert_eq!(live, 2);
    }

    #[test]
    fn test_ring_branch_then_fill() {
        let mut timeline = RingTimeline::new(&marked(0), 3).unwrap();
        timeline.push(&marked(1)).unwrap();
        timeline.push(&marked(2)).unwrap();
        timeline.back();
        timeline.back();
        timeline.push(&marked(5)).unwrap();
        assert_eq!(timeline.len(), 2);
        timeline.push(&marked(6)).unwrap();
        timeline.push(&marked(7)).unwrap();
        let order: Vec<_> = (0..3).map(|i| timeline.get(i).and_then(marker)).collect();
        assert_eq!(order, [Some(5), Some(6), Some(7)]);
    }

    #[test]
    fn test_ring_failed_push_is_noop() {
        let mut timeline = RingTimeline::new(&marked(0), 3).unwrap();
        timeline.push(&marked(1)).unwrap();
        timeline.back();
        assert!(timeline.push(&Grid::default()).is_err());
        assert!(timeline.can_forward());
        assert_eq!(timeline.len(), 2);
    }
}
