//! Combat log: records messages for display and post-match analysis.
//!
//! Adapted from the teacher's real-time `CombatLog` (which timestamps by
//! match-time seconds) to the turn-based engine's discrete tick counter.

use crate::entity::EntityId;

/// A single entry in the combat log.
#[derive(Debug, Clone)]
pub struct CombatLogEntry {
    pub turn: u32,
    pub event_type: CombatLogEventType,
    pub message: String,
    pub entities: Vec<EntityId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatLogEventType {
    Damage,
    Healing,
    StatusApplied,
    StatusFaded,
    Death,
    Interaction,
    Pathfinding,
    TurnEvent,
}

/// All log entries accumulated over a run.
#[derive(Debug, Default)]
pub struct CombatLog {
    pub entries: Vec<CombatLogEntry>,
    pub turn: u32,
}

impl CombatLog {
    pub fn clear(&mut self) {
        self.entries.clear();
        self.turn = 0;
    }

    pub fn log(&mut self, event_type: CombatLogEventType, message: impl Into<String>) {
        self.entries.push(CombatLogEntry {
            turn: self.turn,
            event_type,
            message: message.into(),
            entities: Vec::new(),
        });
    }

    pub fn log_with_entities(
        &mut self,
        event_type: CombatLogEventType,
        message: impl Into<String>,
        entities: Vec<EntityId>,
    ) {
        self.entries.push(CombatLogEntry {
            turn: self.turn,
            event_type,
            message: message.into(),
            entities,
        });
    }

    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries.iter().filter(|e| e.event_type == event_type).collect()
    }

    pub fn hp_changes_only(&self) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.event_type, CombatLogEventType::Damage | CombatLogEventType::Healing))
            .collect()
    }

    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }
}
