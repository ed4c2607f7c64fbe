//! Inventory and item components (spec §3, §4.8 pickup strategy).

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Strong (owning, in the sense that the inventory is the only place that
/// keeps track of these ids once the item leaves the map) reference list of
/// carried items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(skip)]
    pub items: Vec<EntityId>,
    pub capacity: usize,
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.items.len() >= self.capacity
    }

    pub fn add(&mut self, item: EntityId) -> bool {
        if self.is_full() {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove by index. Returns `None` (InvalidInput, spec §8 boundary
    /// behavior) for an out-of-range index; never panics.
    pub fn remove_at(&mut self, index: usize) -> Option<EntityId> {
        if index >= self.items.len() {
            return None;
        }
        Some(self.items.remove(index))
    }
}

/// Marker + pickup metadata for item entities on the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub stackable: bool,
    pub quantity: i32,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            stackable: false,
            quantity: 1,
        }
    }
}
