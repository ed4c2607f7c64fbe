//! The result stream: every pipeline operation returns an ordered
//! `Vec<ActionResult>` rather than a heterogeneous map (spec §3 "Result
//! record", §9 "model these as a sum type with payload; avoid heterogeneous
//! maps when reimplementing"). Downstream consumers (UI, metrics, the
//! state-manager flag layer) `match` on the variants they care about and
//! ignore the rest.

use crate::components::EquipmentSlot;
use crate::entity::EntityId;

/// One tagged result record. Field names on each variant mirror the key
/// names spec §3 lists for the Python prototype's result dict, so a reader
/// who knows the original vocabulary can map one-to-one onto these variants.
#[derive(Debug, Clone)]
pub enum ActionResult {
    /// A styled, user-visible message (combat text, warnings, ambient ticks).
    Message(String),
    /// The entity died and has been corpse-transformed; carries the XP award.
    Dead { entity: EntityId, xp: i32 },
    /// An Orc Chieftain-style rally buff ended, e.g. because its source took damage.
    EndRally(EntityId),
    /// An Orc Shaman-style chant was interrupted by damage.
    InterruptChant(EntityId),
    /// "Split Under Pressure": death is pre-empted, a new entity spawns in its place.
    Split { parent: EntityId, spawn_tag: String },
    DoorOpened(EntityId),
    ItemDropped(EntityId),
    /// The caller should enter a targeting UI mode (throw-item, wand, etc.).
    Targeting(TargetingMode),
    /// Whether this action consumed the player's turn.
    Consumed(bool),
    Equip { entity: EntityId, slot: EquipmentSlot, item: EntityId },
    Dequipped { entity: EntityId, slot: EquipmentSlot },
    ContinuePathfinding,
    /// Signal to the turn controller: run the monster-AI half of the round.
    EnemyTurn,
    FovRecompute,
    PortalEntry,
    VictoryTriggered,
    TakeStairs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetingMode {
    ThrowSelectItem,
    ThrowTargeting,
}

impl ActionResult {
    pub fn message(text: impl Into<String>) -> Self {
        ActionResult::Message(text.into())
    }
}

/// Convenience extension for result-stream construction/inspection sites
/// that only care whether a specific tag is present, mirroring the
/// "upstream consumers scan for the keys they care about" reading pattern
/// from spec §3 without bringing back a heterogeneous map.
pub trait ResultStreamExt {
    fn has_death(&self) -> bool;
    fn consumed_turn(&self) -> bool;
}

impl ResultStreamExt for [ActionResult] {
    fn has_death(&self) -> bool {
        self.iter().any(|r| matches!(r, ActionResult::Dead { .. }))
    }

    fn consumed_turn(&self) -> bool {
        self.iter().any(|r| matches!(r, ActionResult::Consumed(true)))
    }
}
