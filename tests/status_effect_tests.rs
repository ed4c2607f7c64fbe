//! Status-effect application/ticking as seen through `TurnController` and the
//! attack pipeline, as an external consumer of `rogue_core`.

use rogue_core::combat::log::CombatLog;
use rogue_core::combat::{attack, ActionResult, AttackContext, AttackOptions};
use rogue_core::components::status::{ActiveEffect, Duration, EffectKind};
use rogue_core::components::{Ai, AiBehavior, Component, Equipment, EquipmentSlot, Equippable, Fighter, StatusEffects};
use rogue_core::config::GameConfig;
use rogue_core::entity::{Entity, EntitySet};
use rogue_core::map::{SimpleMap, SingleTileKnockback};
use rogue_core::rng::GameRng;
use rogue_core::TurnController;

#[test]
fn poison_weapon_applies_a_timed_poison_on_hit() {
    let mut entities = EntitySet::new();
    let attacker = entities.spawn(|id| {
        let mut e = Entity::new(id, "assassin", 0, 0);
        e.set_component(Component::Fighter(Fighter::new(10, 0, 0)));
        e
    });
    let dagger = entities.spawn(|id| {
        let mut e = Entity::new(id, "venomous dagger", 0, 0);
        e.set_component(Component::Equippable(Equippable {
            slot: EquipmentSlot::MainHand,
            applies_poison_on_hit: true,
            damage_dice: Some((1, 2)),
            ..Default::default()
        }));
        e
    });
    if let Some(a) = entities.get_mut(attacker) {
        let mut equipment = Equipment::default();
        equipment.equip(EquipmentSlot::MainHand, dagger);
        a.set_component(Component::Equipment(equipment));
    }
    let target = entities.spawn(|id| {
        let mut e = Entity::new(id, "guard", 1, 0);
        e.set_component(Component::Fighter(Fighter::new(20, 0, 0)));
        e
    });

    let map = SimpleMap::open(10, 10);
    let mut rng = GameRng::from_seed(5);
    let mut log = CombatLog::default();
    let knockback = SingleTileKnockback;
    let config = GameConfig::default();
    let mut ctx = AttackContext {
        entities: &mut entities,
        map: &map,
        rng: &mut rng,
        knowledge: None,
        metrics: None,
        log: &mut log,
        knockback: &knockback,
        config: &config,
        current_turn: 0,
    };

    attack(
        &mut ctx,
        attacker,
        target,
        AttackOptions {
            is_surprise: true,
            ..Default::default()
        },
    );
    assert!(ctx.entities.get(target).unwrap().status_effects().unwrap().has(EffectKind::Poison));
}

#[test]
fn end_of_round_burning_damage_can_kill_a_monster_with_no_actor_supplied() {
    let mut entities = EntitySet::new();
    let monster = entities.spawn(|id| {
        let mut e = Entity::new(id, "kobold", 0, 0);
        e.set_component(Component::Fighter(Fighter::new(2, 0, 0)));
        e.set_component(Component::Ai(Ai {
            behavior: AiBehavior::Basic,
            special_abilities: Vec::new(),
        }));
        let mut status = StatusEffects::default();
        let mut burn = ActiveEffect::new(EffectKind::Burning, Duration::Turns(1));
        burn.damage_per_turn = 4;
        status.add(burn);
        e.set_component(Component::StatusEffects(status));
        e
    });

    let mut controller = TurnController::new();
    let results = controller.end_player_action(&mut entities, true, None);
    assert!(results.iter().any(|r| matches!(r, ActionResult::Dead { entity, .. } if *entity == monster)));
}

#[test]
fn regeneration_heals_at_start_of_turn_up_to_max_hp() {
    let mut entities = EntitySet::new();
    let hero = entities.spawn(|id| {
        let mut e = Entity::new(id, "hero", 0, 0);
        let mut fighter = Fighter::new(10, 0, 0);
        fighter.hp = 8;
        e.set_component(Component::Fighter(fighter));
        let mut status = StatusEffects::default();
        let mut regen = ActiveEffect::new(EffectKind::Regeneration, Duration::Turns(5));
        regen.heal_per_turn = 5;
        status.add(regen);
        e.set_component(Component::StatusEffects(status));
        e
    });

    let mut controller = TurnController::new();
    controller.end_player_action(&mut entities, true, None);
    assert_eq!(entities.get(hero).unwrap().fighter().unwrap().hp, 10);
}

#[test]
fn paralysis_blocks_retaliation_on_an_adjacent_ranged_shot() {
    // A paralyzed target cannot fire back even from inside retaliation range.
    let mut entities = EntitySet::new();
    let archer = entities.spawn(|id| {
        let mut e = Entity::new(id, "archer", 0, 0);
        e.set_component(Component::Fighter(Fighter::new(10, 0, 0)));
        e
    });
    let bow = entities.spawn(|id| {
        let mut e = Entity::new(id, "bow", 0, 0);
        e.set_component(Component::Equippable(Equippable {
            slot: EquipmentSlot::MainHand,
            is_ranged_weapon: true,
            damage_dice: Some((2, 4)),
            ..Default::default()
        }));
        e
    });
    if let Some(a) = entities.get_mut(archer) {
        let mut equipment = Equipment::default();
        equipment.equip(EquipmentSlot::MainHand, bow);
        a.set_component(Component::Equipment(equipment));
    }
    let target = entities.spawn(|id| {
        let mut e = Entity::new(id, "paralyzed orc", 1, 0);
        e.set_component(Component::Fighter(Fighter::new(20, 0, 0)));
        let mut status = StatusEffects::default();
        status.add(ActiveEffect::new(EffectKind::Paralysis, Duration::Turns(2)));
        e.set_component(Component::StatusEffects(status));
        e
    });

    let map = SimpleMap::open(10, 10);
    let mut rng = GameRng::from_seed(9);
    let mut log = CombatLog::default();
    let knockback = SingleTileKnockback;
    let config = GameConfig::default();
    let mut ctx = AttackContext {
        entities: &mut entities,
        map: &map,
        rng: &mut rng,
        knowledge: None,
        metrics: None,
        log: &mut log,
        knockback: &knockback,
        config: &config,
        current_turn: 0,
    };

    let results = attack(
        &mut ctx,
        archer,
        target,
        AttackOptions {
            is_surprise: true,
            ..Default::default()
        },
    );
    // Archer's own hp should be untouched by a nested retaliation swing.
    assert_eq!(ctx.entities.get(archer).unwrap().fighter().unwrap().hp, 10);
    let _ = results;
}
