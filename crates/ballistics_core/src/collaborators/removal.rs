//! Deferred entity removal

use crate::foundation::logging::debug;
use crate::physics::ItemId;

/// Items waiting to be removed from the world
///
/// Queuing never removes anything immediately; the owner drains the queue at a
/// fixed point in the simulation loop.
#[derive(Debug, Default, Clone)]
pub struct RemovalQueue {
    pending: Vec<ItemId>,
}

impl RemovalQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an item, ignoring repeats
    pub fn queue(&mut self, item: ItemId) {
        if self.contains(item) {
            return;
        }
        debug!("Queued {item:?} for removal");
        self.pending.push(item);
    }

    /// Whether the item is waiting for removal
    pub fn contains(&self, item: ItemId) -> bool {
        self.pending.contains(&item)
    }

    /// Number of pending removals
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every pending item in queue order
    pub fn drain(&mut self) -> Vec<ItemId> {
        std::mem::take(&mut self.pending)
    }
}
