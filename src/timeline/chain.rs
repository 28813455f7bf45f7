//! Chain timeline: A doubly-linked chain of snapshot nodes.
//!
//! Nodes live in an arena and link to each other by stable index, so the
//! chain has no reference cycles and either end can be detached in O(1).
//! Vacated slots are threaded onto an intrusive free list and reused by
//! later pushes; the snapshot a slot held is dropped as soon as the node is
//! released.

use super::{snapshot, Strategy, Timeline, TimelineError};
use crate::grid::Grid;

/// Stable index of a node in the arena.
type NodeId = usize;

/// One entry of the chain.
#[derive(Debug)]
struct Node {
    /// The snapshot owned by this node.
    grid: Grid,
    /// Older neighbor.
    prev: Option<NodeId>,
    /// Newer neighbor.
    next: Option<NodeId>,
}

/// An arena slot.
#[derive(Debug)]
enum Slot {
    Occupied(Node),
    Vacant { next_free: Option<NodeId> },
}

/// Timeline backed by a doubly-linked chain with head eviction.
///
/// Capacity 0 means unbounded: the chain grows one node per push and never
/// evicts.
#[derive(Debug)]
pub struct ChainTimeline {
    /// Node arena.
    slots: Vec<Slot>,
    /// Head of the vacant-slot free list.
    free: Option<NodeId>,
    /// Oldest node.
    head: NodeId,
    /// Newest node.
    tail: NodeId,
    /// Node at the cursor.
    cursor: NodeId,
    /// Logical index of the cursor node.
    position: usize,
    /// Number of linked nodes.
    len: usize,
    /// Maximum number of nodes (0 = unbounded).
    capacity: usize,
}

impl ChainTimeline {
    /// Create a chain holding a clone of `seed` as its only snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::Unallocated`] for an unallocated seed and an
    /// allocation error if the clone or the first node cannot be reserved.
    pub fn new(seed: &Grid, capacity: usize) -> Result<Self, TimelineError> {
        let grid = snapshot(seed)?;
        let mut slots = Vec::new();
        slots
            .try_reserve(1)
            .map_err(|_| TimelineError::Storage { entries: 1 })?;
        slots.push(Slot::Occupied(Node {
            grid,
            prev: None,
            next: None,
        }));

        log::debug!(
            "chain timeline created ({}x{}, capacity {})",
            seed.width(),
            seed.height(),
            capacity
        );

        Ok(Self {
            slots,
            free: None,
            head: 0,
            tail: 0,
            cursor: 0,
            position: 0,
            len: 1,
            capacity,
        })
    }

    /// Number of arena slots, occupied or vacant.
    pub fn arena_len(&self) -> usize {
        self.slots.len()
    }

    fn node(&self, id: NodeId) -> &Node {
        match &self.slots[id] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("chain links to vacant slot {id}"),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        match &mut self.slots[id] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("chain links to vacant slot {id}"),
        }
    }

    /// Make sure `alloc` cannot fail.
    fn reserve_slot(&mut self) -> Result<(), TimelineError> {
        if self.free.is_none() {
            self.slots
                .try_reserve(1)
                .map_err(|_| TimelineError::Storage {
                    entries: self.slots.len() + 1,
                })?;
        }
        Ok(())
    }

    /// Place `node` in a vacant slot, or append one. Requires `reserve_slot`.
    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(id) = self.free {
            if let Slot::Vacant { next_free } = self.slots[id] {
                self.free = next_free;
            }
            self.slots[id] = Slot::Occupied(node);
            id
        } else {
            self.slots.push(Slot::Occupied(node));
            self.slots.len() - 1
        }
    }

    /// Vacate `id`, dropping its snapshot. Returns the node's `next` link.
    fn release(&mut self, id: NodeId) -> Option<NodeId> {
        let vacant = Slot::Vacant {
            next_free: self.free,
        };
        self.free = Some(id);
        match std::mem::replace(&mut self.slots[id], vacant) {
            Slot::Occupied(node) => node.next,
            Slot::Vacant { .. } => None,
        }
    }

    /// Detach and free head nodes until the capacity holds.
    fn evict_oldest_if_needed(&mut self) {
        if self.capacity == 0 {
            return;
        }
        while self.len > self.capacity && self.head != self.cursor {
            let old = self.head;
            let Some(new_head) = self.release(old) else {
                break;
            };
            self.node_mut(new_head).prev = None;
            self.head = new_head;
            self.len -= 1;
            self.position = self.position.saturating_sub(1);
            log::trace!("chain timeline evicted oldest snapshot (slot {old})");
        }
    }
}

impl Timeline for ChainTimeline {
    fn push(&mut self, grid: &Grid) -> Result<(), TimelineError> {
        // Everything fallible happens before the chain is touched.
        let grid = snapshot(grid)?;
        self.reserve_slot()?;

        if self.cursor != self.tail {
            self.clear_forward();
        }

        let tail = self.tail;
        let id = self.alloc(Node {
            grid,
            prev: Some(tail),
            next: None,
        });
        self.node_mut(tail).next = Some(id);
        self.tail = id;
        self.cursor = id;
        self.len += 1;
        self.position = self.len - 1;

        self.evict_oldest_if_needed();
        Ok(())
    }

    fn back(&mut self) -> bool {
        match self.node(self.cursor).prev {
            Some(prev) => {
                self.cursor = prev;
                self.position -= 1;
                true
            }
            None => false,
        }
    }

    fn forward(&mut self) -> bool {
        match self.node(self.cursor).next {
            Some(next) => {
                self.cursor = next;
                self.position += 1;
                true
            }
            None => false,
        }
    }

    fn current(&self) -> &Grid {
        &self.node(self.cursor).grid
    }

    fn can_back(&self) -> bool {
        self.node(self.cursor).prev.is_some()
    }

    fn can_forward(&self) -> bool {
        self.node(self.cursor).next.is_some()
    }

    fn clear_forward(&mut self) {
        let mut it = self.node_mut(self.cursor).next.take();
        self.tail = self.cursor;
        while let Some(id) = it {
            it = self.release(id);
            self.len -= 1;
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    fn cursor(&self) -> usize {
        self.position
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn get(&self, index: usize) -> Option<&Grid> {
        if index >= self.len {
            return None;
        }
        let mut id = self.head;
        for _ in 0..index {
            id = self.node(id).next?;
        }
        Some(&self.node(id).grid)
    }

    fn strategy(&self) -> Strategy {
        Strategy::Chain
    }
}
