//! Per-entity pathfinding/auto-action state (spec §3 Path state, §4.7).

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Deferred auto-action queued for when a multi-step path completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoAction {
    Pickup(EntityId),
    Open(EntityId),
    Talk(EntityId),
    Stairs,
}

/// Tracks an in-progress A*-driven move-to-destination command, grounded on
/// the player's click-to-move pathfinding state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathfindingState {
    pub current_path: Vec<(i32, i32)>,
    pub path_index: usize,
    pub destination: Option<(i32, i32)>,
    pub is_moving: bool,
    pub movement_interrupted: bool,
    pub pending_auto_action: Option<AutoAction>,
}

impl PathfindingState {
    pub fn set_path(&mut self, path: Vec<(i32, i32)>, destination: (i32, i32)) {
        self.current_path = path;
        self.path_index = 0;
        self.destination = Some(destination);
        self.is_moving = !self.current_path.is_empty();
        self.movement_interrupted = false;
    }

    pub fn next_step(&self) -> Option<(i32, i32)> {
        self.current_path.get(self.path_index).copied()
    }

    pub fn advance(&mut self) {
        self.path_index += 1;
        if self.path_index >= self.current_path.len() {
            self.is_moving = false;
        }
    }

    pub fn interrupt(&mut self) {
        self.movement_interrupted = true;
        self.is_moving = false;
        self.pending_auto_action = None;
    }

    pub fn cancel(&mut self) {
        self.current_path.clear();
        self.path_index = 0;
        self.destination = None;
        self.is_moving = false;
        self.movement_interrupted = false;
        self.pending_auto_action = None;
    }
}
