//! Monster knowledge: per-species observation/engagement/kill counters that
//! gate a tier-projected info view for the UI.

use std::collections::{HashMap, HashSet};

use crate::components::{AiBehavior, Faction};
use crate::entity::Entity;

pub const TIER_1_SEEN_COUNT: u32 = 1;
pub const TIER_2_ENGAGED_COUNT: u32 = 3;
pub const TIER_3_KILLED_COUNT: u32 = 5;

pub const TRAIT_PLAGUE_CARRIER: &str = "plague_carrier";
pub const TRAIT_SWARM_AI: &str = "swarm_ai";
pub const TRAIT_PORTAL_CURIOUS: &str = "portal_curious";
pub const TRAIT_FAST_ATTACKER: &str = "fast_attacker";

/// Traits that, experienced personally, unlock Tier 3 regardless of kill count.
pub fn major_traits() -> HashSet<&'static str> {
    [TRAIT_PLAGUE_CARRIER, TRAIT_SWARM_AI].into_iter().collect()
}

pub const DURABILITY_BUCKETS: [(i32, &str); 3] = [(20, "fragile"), (40, "sturdy"), (70, "very tough")];
pub const DAMAGE_BUCKETS: [(i32, &str); 3] = [(4, "light"), (8, "moderate"), (14, "heavy")];
pub const SPEED_BUCKETS: [(f32, &str); 2] = [(0.6, "sluggish"), (1.2, "normal")];
pub const SPEED_FAST_MAX: f32 = 1.8;
pub const ACCURACY_BUCKETS: [(i32, &str); 2] = [(1, "often misses"), (3, "usually hits")];
pub const EVASION_BUCKETS: [(i32, &str); 1] = [(1, "easy to hit")];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KnowledgeTier {
    Unknown,
    Observed,
    Battled,
    Understood,
}

/// Per-species accumulated knowledge. Append-only within a run.
#[derive(Debug, Clone, Default)]
pub struct MonsterKnowledgeEntry {
    pub species_id: String,
    pub seen_count: u32,
    pub engaged_count: u32,
    pub killed_count: u32,
    pub first_depth_seen: Option<i32>,
    pub traits_discovered: HashSet<String>,
}

impl MonsterKnowledgeEntry {
    fn new(species_id: impl Into<String>) -> Self {
        Self {
            species_id: species_id.into(),
            ..Default::default()
        }
    }
}

/// Pure function of an entry's counters to a tier; Tier 3 via kill count or
/// major trait takes priority over Tier 2's engagement count — trait-unlock
/// always wins over count thresholds.
pub fn knowledge_tier(entry: &MonsterKnowledgeEntry) -> KnowledgeTier {
    if entry.seen_count < TIER_1_SEEN_COUNT {
        return KnowledgeTier::Unknown;
    }
    if entry.killed_count >= TIER_3_KILLED_COUNT {
        return KnowledgeTier::Understood;
    }
    let majors = major_traits();
    if entry.traits_discovered.iter().any(|t| majors.contains(t.as_str())) {
        return KnowledgeTier::Understood;
    }
    if entry.engaged_count >= TIER_2_ENGAGED_COUNT {
        return KnowledgeTier::Battled;
    }
    KnowledgeTier::Observed
}

/// Tier-gated view for UI consumption; the only function that decides what
/// a monster's knowledge tier reveals.
#[derive(Debug, Clone, Default)]
pub struct MonsterInfoView {
    pub name: String,
    pub glyph: char,
    pub knowledge_tier: Option<KnowledgeTier>,
    pub faction_label: Option<String>,
    pub role_label: Option<String>,
    pub durability_label: Option<String>,
    pub damage_label: Option<String>,
    pub speed_label: Option<String>,
    pub accuracy_label: Option<String>,
    pub evasion_label: Option<String>,
    pub special_warnings: Vec<String>,
    pub behavior_labels: Vec<String>,
    pub advice_line: Option<String>,
}

/// Central manager: tracks all encounters for a run, owned by the world and
/// passed by reference to whatever needs it rather than held as a global.
#[derive(Debug, Default)]
pub struct MonsterKnowledgeSystem {
    entries: HashMap<String, MonsterKnowledgeEntry>,
    seen_this_cycle: HashSet<u32>,
}

impl MonsterKnowledgeSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.entries.clear();
        self.seen_this_cycle.clear();
    }

    /// Call once at the start of each world tick so `register_seen`
    /// deduplicates per entity per cycle.
    pub fn begin_update_cycle(&mut self) {
        self.seen_this_cycle.clear();
    }

    fn entry_mut(&mut self, species_id: &str) -> &mut MonsterKnowledgeEntry {
        self.entries
            .entry(species_id.to_string())
            .or_insert_with(|| MonsterKnowledgeEntry::new(species_id))
    }

    pub fn get_entry(&self, species_id: &str) -> MonsterKnowledgeEntry {
        self.entries
            .get(species_id)
            .cloned()
            .unwrap_or_else(|| MonsterKnowledgeEntry::new(species_id))
    }

    pub fn register_seen(&mut self, monster: &Entity, current_depth: Option<i32>) {
        if !self.seen_this_cycle.insert(monster.id.0) {
            return;
        }
        let species_id = monster.knowledge_species_id();
        let entry = self.entry_mut(&species_id);
        entry.seen_count += 1;
        if let Some(depth) = current_depth {
            entry.first_depth_seen = Some(match entry.first_depth_seen {
                Some(existing) => existing.min(depth),
                None => depth,
            });
        }
    }

    pub fn register_engaged(&mut self, monster: &Entity) {
        let species_id = monster.knowledge_species_id();
        let entry = self.entry_mut(&species_id);
        entry.engaged_count += 1;
        if entry.seen_count == 0 {
            entry.seen_count = 1;
        }
    }

    pub fn register_killed(&mut self, monster: &Entity) {
        let species_id = monster.knowledge_species_id();
        let entry = self.entry_mut(&species_id);
        entry.killed_count += 1;
        if entry.seen_count == 0 {
            entry.seen_count = 1;
        }
        if entry.engaged_count == 0 {
            entry.engaged_count = 1;
        }
    }

    pub fn register_trait(&mut self, monster: &Entity, trait_name: &str) {
        let species_id = monster.knowledge_species_id();
        self.entry_mut(&species_id).traits_discovered.insert(trait_name.to_string());
    }

    pub fn all_entries(&self) -> impl Iterator<Item = &MonsterKnowledgeEntry> {
        self.entries.values()
    }
}

fn bucket_label(value: i32, buckets: &[(i32, &'static str)], beyond: &'static str) -> String {
    buckets
        .iter()
        .find(|(max, _)| value <= *max)
        .map(|(_, label)| *label)
        .unwrap_or(beyond)
        .to_string()
}

fn durability_label(entity: &Entity) -> Option<String> {
    let fighter = entity.fighter()?;
    let durability = fighter.base_max_hp + fighter.base_defense * 5;
    Some(bucket_label(durability, &DURABILITY_BUCKETS, "monstrous"))
}

fn damage_label(entity: &Entity) -> Option<String> {
    let fighter = entity.fighter()?;
    let avg = (fighter.damage_min + fighter.damage_max) as f32 / 2.0 + fighter.base_power as f32;
    let label = if avg <= DAMAGE_BUCKETS[0].0 as f32 {
        DAMAGE_BUCKETS[0].1
    } else if avg <= DAMAGE_BUCKETS[1].0 as f32 {
        DAMAGE_BUCKETS[1].1
    } else if avg <= DAMAGE_BUCKETS[2].0 as f32 {
        DAMAGE_BUCKETS[2].1
    } else {
        "brutal"
    };
    Some(label.to_string())
}

fn speed_bonus_of(entity: &Entity) -> f32 {
    entity.speed_bonus_tracker().map(|t| t.speed_bonus).unwrap_or(1.0)
}

fn speed_label(entity: &Entity, detailed: bool) -> Option<String> {
    let speed = speed_bonus_of(entity);
    if speed <= SPEED_BUCKETS[0].0 {
        Some(SPEED_BUCKETS[0].1.to_string())
    } else if speed <= SPEED_BUCKETS[1].0 {
        if detailed {
            Some(SPEED_BUCKETS[1].1.to_string())
        } else {
            None
        }
    } else if speed <= SPEED_FAST_MAX {
        Some("fast".to_string())
    } else if detailed {
        Some("lightning fast".to_string())
    } else {
        Some("fast".to_string())
    }
}

fn accuracy_label(entity: &Entity) -> Option<String> {
    let fighter = entity.fighter()?;
    Some(bucket_label(fighter.accuracy, &ACCURACY_BUCKETS, "rarely misses"))
}

/// Unlike the other buckets, "average" evasion (the middle band) is
/// deliberately not surfaced — only the edges get a label.
fn evasion_label(entity: &Entity) -> Option<String> {
    let fighter = entity.fighter()?;
    if fighter.evasion <= EVASION_BUCKETS[0].0 {
        Some(EVASION_BUCKETS[0].1.to_string())
    } else if fighter.evasion <= 2 {
        None
    } else {
        Some("hard to hit".to_string())
    }
}

fn faction_label(entity: &Entity) -> Option<String> {
    match *entity.faction()? {
        Faction::Neutral => None,
        Faction::Player => Some("Player".to_string()),
        Faction::Monsters => Some("Monsters".to_string()),
        Faction::Undead => Some("Undead".to_string()),
    }
}

fn role_label(entity: &Entity) -> Option<String> {
    if let Some(ai) = entity.ai() {
        if ai.has_ability("swarm") {
            return Some("Swarm".to_string());
        }
        if matches!(ai.behavior, AiBehavior::Caster) {
            return Some("Caster".to_string());
        }
    }
    if entity.has_tag("boss") || entity.boss().is_some() {
        return Some("Boss".to_string());
    }
    if entity.has_tag("mindless") {
        return Some("Mindless".to_string());
    }
    if entity.has_tag("venomous") {
        return Some("Venomous".to_string());
    }
    if entity.has_tag("regenerating") {
        return Some("Regenerator".to_string());
    }
    let name = entity.name.to_lowercase();
    if name.contains("brute") {
        return Some("Brute".to_string());
    }
    if name.contains("scout") {
        return Some("Scout".to_string());
    }
    if name.contains("blademaster") || name.contains("veteran") {
        return Some("Elite".to_string());
    }
    if name.contains("chieftain") || name.contains("ancient") {
        return Some("Leader".to_string());
    }
    None
}

fn special_warnings(entity: &Entity, entry: &MonsterKnowledgeEntry) -> Vec<String> {
    let mut warnings = Vec::new();
    if entry.traits_discovered.contains(TRAIT_PLAGUE_CARRIER) {
        warnings.push("carries the Plague of Restless Death".to_string());
    }
    if entry.traits_discovered.contains(TRAIT_SWARM_AI) {
        warnings.push("swarm behavior: retargets when adjacent to multiple foes".to_string());
    }
    if entry.traits_discovered.contains(TRAIT_FAST_ATTACKER) {
        warnings.push("fast attacker: can strike multiple times".to_string());
    }
    if entry.traits_discovered.contains(TRAIT_PORTAL_CURIOUS) {
        warnings.push("often steps into portals".to_string());
    }
    if entity.has_tag("plague_carrier") && !entry.traits_discovered.contains(TRAIT_PLAGUE_CARRIER) {
        warnings.push("suspected plague carrier".to_string());
    }
    if entity.ai().map(|a| a.has_ability("corrosion")).unwrap_or(false) {
        warnings.push("acid: corrodes equipment".to_string());
    }
    warnings
}

fn behavior_labels(entity: &Entity) -> Vec<String> {
    let mut labels = Vec::new();
    if let Some(ai) = entity.ai() {
        if ai.has_ability("swarm") {
            labels.push("Swarm".to_string());
        }
    }
    if entity.has_tag("mindless") {
        labels.push("Mindless".to_string());
    }
    if entity.has_tag("regenerating") {
        labels.push("Regenerating".to_string());
    }
    labels
}

/// Tactical advice, priority order: plague > swarm > corrosion >
/// portal-curious > lightning-fast > regenerator.
fn advice_line(entity: &Entity, entry: &MonsterKnowledgeEntry) -> Option<String> {
    if entry.traits_discovered.contains(TRAIT_PLAGUE_CARRIER) || entity.has_tag("plague_carrier") {
        return Some("Avoid getting hit. Cure plague immediately with antidotes.".to_string());
    }
    let has_swarm_ability = entity.ai().map(|a| a.has_ability("swarm")).unwrap_or(false);
    if entry.traits_discovered.contains(TRAIT_SWARM_AI) || has_swarm_ability {
        return Some("Avoid being adjacent alongside other enemies; retargets chaotically.".to_string());
    }
    if entity.ai().map(|a| a.has_ability("corrosion")).unwrap_or(false) {
        return Some("Keep distance if possible. Each hit risks corroding your equipment.".to_string());
    }
    if entry.traits_discovered.contains(TRAIT_PORTAL_CURIOUS) {
        return Some("Use portals to redirect them away from you.".to_string());
    }
    if speed_label(entity, true).as_deref() == Some("lightning fast") {
        return Some("Very fast enemy. Build momentum slowly or use crowd control.".to_string());
    }
    if entity.has_tag("regenerating") {
        return Some("Kill quickly before it regenerates. Focus fire is effective.".to_string());
    }
    None
}

/// Project a tier-gated [`MonsterInfoView`] for `monster`. The only function
/// allowed to decide what a knowledge tier reveals.
pub fn get_monster_info_view(monster: &Entity, knowledge: &MonsterKnowledgeSystem) -> MonsterInfoView {
    let species_id = monster.knowledge_species_id();
    let entry = knowledge.get_entry(&species_id);
    let tier = knowledge_tier(&entry);

    let mut view = MonsterInfoView {
        name: monster.name.clone(),
        glyph: monster.presentation.glyph,
        knowledge_tier: Some(tier),
        ..Default::default()
    };

    if tier == KnowledgeTier::Unknown {
        return view;
    }

    view.faction_label = faction_label(monster);
    view.role_label = role_label(monster);
    view.speed_label = speed_label(monster, false);

    if tier >= KnowledgeTier::Battled {
        view.durability_label = durability_label(monster);
        view.damage_label = damage_label(monster);
        view.speed_label = speed_label(monster, true);
        view.accuracy_label = accuracy_label(monster);
        view.evasion_label = evasion_label(monster);
    }

    if tier == KnowledgeTier::Understood {
        view.special_warnings = special_warnings(monster, &entry);
        view.behavior_labels = behavior_labels(monster);
        view.advice_line = advice_line(monster, &entry);
    }

    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Fighter;
    use crate::entity::EntityId;

    fn zombie() -> Entity {
        let mut e = Entity::new(EntityId(0), "Plague Zombie", 0, 0);
        e.set_component(crate::components::Component::Fighter(Fighter::new(30, 2, 3)));
        e
    }

    #[test]
    fn tier_jumps_to_understood_via_major_trait_not_kill_count() {
        let mut knowledge = MonsterKnowledgeSystem::new();
        let z = zombie();
        knowledge.register_seen(&z, None);
        knowledge.register_engaged(&z);
        knowledge.register_trait(&z, TRAIT_PLAGUE_CARRIER);

        let entry = knowledge.get_entry(&z.knowledge_species_id());
        assert_eq!(knowledge_tier(&entry), KnowledgeTier::Understood);
    }

    #[test]
    fn seen_dedup_within_cycle() {
        let mut knowledge = MonsterKnowledgeSystem::new();
        let z = zombie();
        knowledge.register_seen(&z, None);
        knowledge.register_seen(&z, None);
        assert_eq!(knowledge.get_entry(&z.knowledge_species_id()).seen_count, 1);
        knowledge.begin_update_cycle();
        knowledge.register_seen(&z, None);
        assert_eq!(knowledge.get_entry(&z.knowledge_species_id()).seen_count, 2);
    }

    #[test]
    fn register_killed_backfills_seen_and_engaged() {
        let mut knowledge = MonsterKnowledgeSystem::new();
        let z = zombie();
        knowledge.register_killed(&z);
        let entry = knowledge.get_entry(&z.knowledge_species_id());
        assert_eq!(entry.seen_count, 1);
        assert_eq!(entry.engaged_count, 1);
        assert_eq!(entry.killed_count, 1);
    }

    #[test]
    fn unknown_tier_reveals_only_name_and_glyph() {
        let knowledge = MonsterKnowledgeSystem::new();
        let z = zombie();
        let view = get_monster_info_view(&z, &knowledge);
        assert_eq!(view.knowledge_tier, Some(KnowledgeTier::Unknown));
        assert!(view.faction_label.is_none());
        assert!(view.durability_label.is_none());
    }
}
