//! Turn controller: advances the tick counter, gives every AI-bearing
//! entity a chance to act, flushes status effects, and hands control back
//! to the player-turn state.
//!
//! The actual monster decision algorithm (targeting, pathing toward a foe,
//! whether to flee) is an external collaborator — the core only guarantees
//! *that* each monster gets a turn, in entity-set order, and that the
//! surrounding status-tick/turn-counter bookkeeping happens in a fixed
//! order. Callers supply a [`MonsterTurnActor`] that performs the actual
//! decision and calls back into [`crate::combat::attack`] or
//! [`crate::movement::execute_movement`] as it sees fit.

use smallvec::SmallVec;

use crate::combat::events::ActionResult;
use crate::components::status::StatusTickEvent;
use crate::entity::{EntityId, EntitySet};

/// External collaborator: decides and executes one monster's turn. Nullable
/// — with no actor supplied, monsters simply do nothing on their turn but
/// still receive their status ticks.
pub trait MonsterTurnActor {
    fn take_turn(&mut self, monster: EntityId, entities: &mut EntitySet) -> Vec<ActionResult>;
}

/// Drives ticks forward. Holds only the turn counter; every other piece of
/// state (entities, map, knowledge, metrics) is passed in per call rather
/// than held as a module-level global.
#[derive(Debug, Default)]
pub struct TurnController {
    pub current_turn: u32,
}

impl TurnController {
    pub fn new() -> Self {
        Self::default()
    }

    /// If `turn_consumed`, advances the counter, then iterates every
    /// non-player AI entity in insertion order giving each a start-of-turn
    /// status tick and a chance to act, then runs one end-of-round status
    /// tick across the whole entity set, in that order: status tick,
    /// monster AI, attack pipeline, status tick.
    pub fn end_player_action(
        &mut self,
        entities: &mut EntitySet,
        turn_consumed: bool,
        mut monster_actor: Option<&mut dyn MonsterTurnActor>,
    ) -> Vec<ActionResult> {
        let mut results = Vec::new();
        if !turn_consumed {
            return results;
        }
        self.current_turn += 1;

        let monster_ids: SmallVec<[EntityId; 16]> = entities
            .iter_in_order()
            .filter(|e| e.ai().is_some() && e.fighter().map(|f| f.is_alive()).unwrap_or(true))
            .map(|e| e.id)
            .collect();

        for monster_id in monster_ids {
            if !entities.contains(monster_id) {
                continue; // may have died/been removed by an earlier monster's turn
            }
            tick_start_of_turn(entities, monster_id, &mut results);
            if let Some(actor) = monster_actor.as_deref_mut() {
                results.extend(actor.take_turn(monster_id, entities));
            }
        }

        tick_end_of_round(entities, &mut results);
        results
    }
}

fn tick_start_of_turn(entities: &mut EntitySet, id: EntityId, results: &mut Vec<ActionResult>) {
    let Some(entity) = entities.get_mut(id) else { return };
    let Some(status) = entity.status_effects_mut() else { return };
    let events = status.process_turn_start();
    let name = entity.name.clone();
    push_tick_messages(&name, &events, results);
    apply_heal_events(entities, id, &events);
}

fn apply_heal_events(entities: &mut EntitySet, id: EntityId, events: &[StatusTickEvent]) {
    let Some(max_hp) = entities.get(id).and_then(|entity| {
        let hp_bonus = crate::components::equipment::aggregate_bonuses(entities, entity).hp_bonus;
        entity.fighter().map(|f| f.derived_max_hp(hp_bonus))
    }) else {
        return;
    };
    let Some(entity) = entities.get_mut(id) else { return };
    let Some(fighter) = entity.fighter_mut() else { return };
    for event in events {
        if let StatusTickEvent::HealOverTime(_, amount) = event {
            fighter.hp = (fighter.hp + amount).min(max_hp);
        }
    }
}

/// End-of-round tick: damage-over-time, then duration decrement, for every
/// entity with a `StatusEffects` component, walked in entity-set (insertion)
/// order — the same order monster turns use.
fn tick_end_of_round(entities: &mut EntitySet, results: &mut Vec<ActionResult>) {
    let ids: SmallVec<[EntityId; 32]> = entities
        .iter_in_order()
        .filter(|e| e.status_effects().is_some())
        .map(|e| e.id)
        .collect();

    for id in ids {
        let Some(entity) = entities.get_mut(id) else { continue };
        let Some(status) = entity.status_effects_mut() else { continue };
        let events = status.process_turn_end();
        if events.is_empty() {
            continue;
        }
        let name = entity.name.clone();
        push_tick_messages(&name, &events, results);
        apply_dot_events(entities, id, &events, results);
    }
}

fn apply_dot_events(entities: &mut EntitySet, id: EntityId, events: &[StatusTickEvent], results: &mut Vec<ActionResult>) {
    let Some(entity) = entities.get_mut(id) else { return };
    let Some(fighter) = entity.fighter_mut() else { return };
    for event in events {
        if let StatusTickEvent::DamageOverTime(_, amount) = event {
            fighter.hp -= amount;
            if fighter.hp <= 0 {
                let xp = fighter.xp_value;
                results.push(ActionResult::Dead { entity: id, xp });
            }
        }
    }
}

/// Emits at most one message per effect per turn.
fn push_tick_messages(name: &str, events: &[StatusTickEvent], results: &mut Vec<ActionResult>) {
    for event in events {
        let message = match event {
            StatusTickEvent::Applied(kind) => format!("{name} is affected by {kind:?}."),
            StatusTickEvent::Refreshed(_) => continue,
            StatusTickEvent::Faded(kind) => format!("{name}'s {kind:?} fades."),
            StatusTickEvent::DamageOverTime(kind, amount) => format!("{name} takes {amount} damage from {kind:?}."),
            StatusTickEvent::HealOverTime(kind, amount) => format!("{name} regains {amount} HP from {kind:?}."),
        };
        results.push(ActionResult::message(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::status::{ActiveEffect, Duration, EffectKind};
    use crate::components::{Ai, AiBehavior, Component, Fighter, StatusEffects};
    use crate::entity::Entity;

    struct NoopActor {
        calls: Vec<EntityId>,
    }

    impl MonsterTurnActor for NoopActor {
        fn take_turn(&mut self, monster: EntityId, _entities: &mut EntitySet) -> Vec<ActionResult> {
            self.calls.push(monster);
            Vec::new()
        }
    }

    fn monster(entities: &mut EntitySet, hp: i32) -> EntityId {
        entities.spawn(|id| {
            let mut e = Entity::new(id, "orc", 0, 0);
            e.set_component(Component::Fighter(Fighter::new(hp, 0, 0)));
            e.set_component(Component::Ai(Ai {
                behavior: AiBehavior::Basic,
                special_abilities: Vec::new(),
            }));
            e
        })
    }

    #[test]
    fn no_turn_consumed_skips_the_whole_round() {
        let mut entities = EntitySet::new();
        monster(&mut entities, 10);
        let mut controller = TurnController::new();
        let mut actor = NoopActor { calls: Vec::new() };
        let results = controller.end_player_action(&mut entities, false, Some(&mut actor));
        assert!(results.is_empty());
        assert_eq!(controller.current_turn, 0);
        assert!(actor.calls.is_empty());
    }

    #[test]
    fn every_living_monster_gets_a_turn_in_insertion_order() {
        let mut entities = EntitySet::new();
        let a = monster(&mut entities, 10);
        let b = monster(&mut entities, 10);
        let mut controller = TurnController::new();
        let mut actor = NoopActor { calls: Vec::new() };
        controller.end_player_action(&mut entities, true, Some(&mut actor));
        assert_eq!(actor.calls, vec![a, b]);
        assert_eq!(controller.current_turn, 1);
    }

    #[test]
    fn end_of_round_poison_tick_can_kill_and_is_reported_once() {
        let mut entities = EntitySet::new();
        let id = entities.spawn(|id| {
            let mut e = Entity::new(id, "hero", 0, 0);
            e.set_component(Component::Fighter(Fighter::new(3, 0, 0)));
            let mut status = StatusEffects::default();
            let mut poison = ActiveEffect::new(EffectKind::Poison, Duration::Turns(1));
            poison.damage_per_turn = 5;
            status.add(poison);
            e.set_component(Component::StatusEffects(status));
            e
        });
        let mut controller = TurnController::new();
        let results = controller.end_player_action(&mut entities, true, None);
        assert!(results.iter().any(|r| matches!(r, ActionResult::Dead { entity, .. } if *entity == id)));
        let dot_messages = results
            .iter()
            .filter(|r| matches!(r, ActionResult::Message(m) if m.contains("takes 5 damage")))
            .count();
        assert_eq!(dot_messages, 1);
    }
}
