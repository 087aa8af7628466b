//! Items carried inside a projectile (casings, payloads)

use thiserror::Error;

use crate::physics::{BodyHandle, ItemId};

/// Container rule violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContainError {
    /// An item cannot contain itself
    #[error("Item {0:?} cannot contain itself")]
    SelfContainment(ItemId),

    /// The item is already inside
    #[error("Item {0:?} is already contained")]
    AlreadyContained(ItemId),

    /// No free slot
    #[error("Container full: capacity {capacity}")]
    Full {
        /// Slot count
        capacity: usize,
    },
}

/// One contained item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainedItem {
    /// The item
    pub item: ItemId,
    /// Its physics body, if it has one
    pub body: Option<BodyHandle>,
}

/// Bounded slot list owned by a projectile
#[derive(Debug, Clone, Default)]
pub struct ContainedItems {
    capacity: usize,
    items: Vec<ContainedItem>,
}

impl ContainedItems {
    /// Empty list with `capacity` slots
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::with_capacity(capacity),
        }
    }

    /// Put `entry` into the container owned by `owner`
    pub fn insert(&mut self, owner: ItemId, entry: ContainedItem) -> Result<(), ContainError> {
        if entry.item == owner {
            return Err(ContainError::SelfContainment(owner));
        }
        if self.contains(entry.item) {
            return Err(ContainError::AlreadyContained(entry.item));
        }
        if self.items.len() >= self.capacity {
            return Err(ContainError::Full {
                capacity: self.capacity,
            });
        }
        self.items.push(entry);
        Ok(())
    }

    /// Take `item` out, returning whether it was inside
    pub fn remove(&mut self, item: ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|entry| entry.item != item);
        self.items.len() != before
    }

    /// Whether `item` is inside
    pub fn contains(&self, item: ItemId) -> bool {
        self.items.iter().any(|entry| entry.item == item)
    }

    /// Slot count
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of contained items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is inside
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Contained items in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &ContainedItem> {
        self.items.iter()
    }
}
