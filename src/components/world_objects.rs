//! Interactable world-object components consumed by the interaction
//! dispatcher (spec §4.8).

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chest {
    pub opened: bool,
    pub locked: bool,
    pub required_key_tag: Option<String>,
    pub trapped: bool,
    pub loot: Vec<EntityId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signpost {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mural {
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Stairs {
    pub descending: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockedDoor {
    pub required_key_tag: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Portal {
    pub linked_to: Option<(i32, i32)>,
}

/// Placed by an ability/ring to later spawn a [`Portal`]; tracked separately
/// because the placement and the activation are distinct turns.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PortalPlacer {
    pub charges: i32,
}
