//! Monster knowledge tiering and info-view projection, exercised through
//! `rogue_core::knowledge` as an external consumer would.

use rogue_core::components::{AiBehavior, Component, Fighter};
use rogue_core::entity::{Entity, EntityId};
use rogue_core::knowledge::{
    get_monster_info_view, knowledge_tier, KnowledgeTier, MonsterKnowledgeSystem, TRAIT_SWARM_AI,
};

fn orc_brute() -> Entity {
    let mut e = Entity::new(EntityId(0), "Orc Brute", 0, 0);
    let mut fighter = Fighter::new(40, 3, 2);
    fighter.damage_min = 5;
    fighter.damage_max = 9;
    e.set_component(Component::Fighter(fighter));
    e
}

#[test]
fn three_engagements_without_a_kill_reaches_the_battled_tier() {
    let mut knowledge = MonsterKnowledgeSystem::new();
    let brute = orc_brute();
    knowledge.register_seen(&brute, Some(2));
    knowledge.register_engaged(&brute);
    knowledge.register_engaged(&brute);
    knowledge.register_engaged(&brute);

    let entry = knowledge.get_entry(&brute.knowledge_species_id());
    assert_eq!(knowledge_tier(&entry), KnowledgeTier::Battled);

    let view = get_monster_info_view(&brute, &knowledge);
    assert!(view.durability_label.is_some());
    assert!(view.special_warnings.is_empty(), "warnings are Understood-tier only");
}

#[test]
fn a_swarm_trait_discovery_unlocks_understood_and_a_matching_warning() {
    let mut knowledge = MonsterKnowledgeSystem::new();
    let mut swarmer = Entity::new(EntityId(1), "Rat Swarm", 0, 0);
    swarmer.set_component(Component::Fighter(Fighter::new(6, 0, 1)));
    swarmer.set_component(Component::Ai(rogue_core::components::Ai {
        behavior: AiBehavior::Swarm,
        special_abilities: vec!["swarm".to_string()],
    }));

    knowledge.register_seen(&swarmer, None);
    knowledge.register_trait(&swarmer, TRAIT_SWARM_AI);

    let view = get_monster_info_view(&swarmer, &knowledge);
    assert_eq!(view.knowledge_tier, Some(KnowledgeTier::Understood));
    assert!(view.special_warnings.iter().any(|w| w.contains("swarm")));
    assert!(view.advice_line.is_some());
}

#[test]
fn begin_update_cycle_allows_a_fresh_seen_count_per_cycle() {
    let mut knowledge = MonsterKnowledgeSystem::new();
    let brute = orc_brute();
    knowledge.register_seen(&brute, None);
    knowledge.register_seen(&brute, None);
    assert_eq!(knowledge.get_entry(&brute.knowledge_species_id()).seen_count, 1);

    knowledge.begin_update_cycle();
    knowledge.register_seen(&brute, None);
    assert_eq!(knowledge.get_entry(&brute.knowledge_species_id()).seen_count, 2);
}

#[test]
fn resetting_the_system_drops_all_accumulated_entries() {
    let mut knowledge = MonsterKnowledgeSystem::new();
    let brute = orc_brute();
    knowledge.register_killed(&brute);
    assert_eq!(knowledge.get_entry(&brute.knowledge_species_id()).killed_count, 1);
    knowledge.reset();
    assert_eq!(knowledge.get_entry(&brute.knowledge_species_id()).killed_count, 0);
}
