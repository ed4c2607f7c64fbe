//! AI, Faction and Boss components (spec §3, §4.1d Command-the-Dead, §4.2 boss hooks).

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Monster faction. Command-the-Dead (spec §4.1d) keys off `Undead`; other
/// values gate friendly/hostile resolution for the interaction dispatcher
/// and threat checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Monsters,
    Undead,
    Neutral,
}

/// Marker + behavior data for monster-controlled entities. The concrete
/// decision logic (what to attack, whether to flee) lives outside the core
/// per spec §1 — the core only needs to know an entity *has* AI (for e.g.
/// the invisibility-surprise rule) and which species/behavior labels it
/// carries for the knowledge system and turn controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ai {
    pub behavior: AiBehavior,
    pub special_abilities: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiBehavior {
    Basic,
    Skirmisher,
    Swarm,
    Caster,
    Stationary,
}

impl Ai {
    pub fn has_ability(&self, name: &str) -> bool {
        self.special_abilities.iter().any(|a| a == name)
    }
}

/// Boss dialogue/enrage hooks, fired by the damage pipeline at HP thresholds
/// (spec §4.2 step 7: "boss dialogue hooks may have fired earlier at >0 HP").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub enrage_hp_fraction: f32,
    pub enraged: bool,
    pub low_hp_warned: bool,
    pub low_hp_fraction: f32,
}

impl Default for Boss {
    fn default() -> Self {
        Self {
            enrage_hp_fraction: 0.5,
            enraged: false,
            low_hp_warned: false,
            low_hp_fraction: 0.25,
        }
    }
}

/// Tracks a temporary speed multiplier granted by an effect/ability, read by
/// the knowledge system's speed label (spec §4.10).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpeedBonusTracker {
    pub speed_bonus: f32,
}

impl Default for SpeedBonusTracker {
    fn default() -> Self {
        Self { speed_bonus: 1.0 }
    }
}

/// Marker for entities that should be included in auto-explore goal
/// selection (external collaborator; the core only stores the flag).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AutoExplore {
    pub enabled: bool,
}

/// Per-run combat statistics tracked on an entity (damage dealt/taken,
/// survived flag) — used by scenario results, not by pipeline decisions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Statistics {
    pub damage_dealt: i64,
    pub damage_taken: i64,
    pub healing_done: i64,
    pub kills: i32,
}

/// Explicit species override, consulted by [`crate::entity::Entity::knowledge_species_id`]
/// before the tag and name fallbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterKnowledgeKey(pub String);

/// NPC dialogue marker (spec §4.8 NPC strategy; dialogue content is an
/// external collaborator, the core only needs to know dialogue exists).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Npc {
    pub has_dialogue: bool,
    pub owner_faction: Faction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingBonus {
    pub damage_dice: Option<(i32, i32)>,
    pub source: EntityId,
}
