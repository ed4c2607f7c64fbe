//! Pathfinding-driven auto-action loop (spec §4.7): the per-tick driver the
//! turn controller calls while an entity has an active path or a deferred
//! goal. Composes the Movement Service (C6), hazard/threat interruption
//! rules, and the interaction dispatcher's deferred-goal dispatch (C8) in
//! the fixed order spec §5 lists: "movement -> hazard check -> threat check
//! -> (on arrival) deferred action".

use crate::combat::events::ActionResult;
use crate::components::{aggregate_bonuses, AutoAction, Faction};
use crate::entity::{EntityId, EntitySet};
use crate::interaction;
use crate::map::{FovMap, GameMap};
use crate::movement::execute_movement;
use crate::pathfind;
use crate::rng::GameRng;

/// Outcome of a single auto-action tick. Mirrors [`crate::movement::MovementOutcome`]'s
/// "independent fields, not one enum" shape for the same reason: callers
/// need to react to several of these in combination.
#[derive(Debug, Clone, Default)]
pub struct AutoActionOutcome {
    pub interrupted: bool,
    pub continue_pathfinding: bool,
    pub yield_turn: bool,
    pub results: Vec<ActionResult>,
}

fn hostile_to(actor_faction: Option<Faction>, other_faction: Option<Faction>) -> bool {
    match (actor_faction, other_faction) {
        (Some(a), Some(b)) => a != b && b != Faction::Neutral,
        _ => false,
    }
}

/// Step 7 (spec §4.7): `threat_distance = min(reach, 2) * 1.5`. Ranged
/// attackers (large reach) keep closing until a foe crosses into melee
/// danger; melee attackers (reach 1) stop the instant any foe is spotted.
fn threat_distance(reach: i32) -> f32 {
    (reach.min(2)) as f32 * 1.5
}

fn any_threat_within(
    entities: &EntitySet,
    map: &dyn GameMap,
    fov: &dyn FovMap,
    actor: EntityId,
    actor_x: i32,
    actor_y: i32,
    actor_faction: Option<Faction>,
    threat_distance: f32,
) -> bool {
    let _ = map;
    entities.iter_in_order().any(|e| {
        e.id != actor
            && hostile_to(actor_faction, e.faction().copied())
            && e.fighter().map(|f| f.is_alive()).unwrap_or(false)
            && fov.is_in_fov(e.x, e.y)
            && crate::geometry::euclidean_distance(actor_x, actor_y, e.x, e.y) <= threat_distance
    })
}

/// Runs exactly one tick of the auto-action loop for `actor` (spec §4.7).
/// Assumes `actor` has an active [`crate::components::PathfindingState`];
/// callers should not invoke this for an entity that isn't pathfinding.
pub fn step(
    entities: &mut EntitySet,
    map: &mut dyn GameMap,
    fov: &dyn FovMap,
    rng: &mut GameRng,
    actor: EntityId,
) -> AutoActionOutcome {
    let mut outcome = AutoActionOutcome::default();

    let Some((dx, dy)) = entities
        .get(actor)
        .and_then(|e| e.pathfinding())
        .and_then(|p| p.next_step())
        .zip(entities.get(actor).map(|e| (e.x, e.y)))
        .map(|((nx, ny), (x, y))| (nx - x, ny - y))
    else {
        outcome.interrupted = true;
        return outcome;
    };

    // Step 1: movement.
    let movement = execute_movement(entities, map, actor, dx, dy);

    // Step 2/3: wall/entity/status block interrupts.
    if movement.blocked_by_wall || movement.blocked_by_entity.is_some() {
        pathfind::interrupt_movement(entities, actor);
        outcome.interrupted = true;
        outcome.results.push(ActionResult::message("Your path is blocked."));
        return outcome;
    }
    if movement.blocked_by_status {
        pathfind::interrupt_movement(entities, actor);
        outcome.interrupted = true;
        outcome.results.extend(movement.messages.into_iter().map(ActionResult::message));
        return outcome;
    }

    // Step 4: successful step — advance the path index and forward signals.
    pathfind::get_next_move(entities, actor);
    if movement.fov_recompute {
        outcome.results.push(ActionResult::FovRecompute);
    }
    outcome.results.extend(movement.messages.iter().cloned().map(ActionResult::message));

    let Some((x, y)) = entities.get(actor).map(|e| (e.x, e.y)) else {
        outcome.interrupted = true;
        return outcome;
    };

    // Step 5: portal entry.
    if movement.portal_entry {
        pathfind::interrupt_movement(entities, actor);
        outcome.interrupted = true;
        outcome.results.push(ActionResult::message("You step onto a portal."));
        outcome.results.push(ActionResult::PortalEntry);
        return outcome;
    }

    // Step 6: ground hazard.
    if let Some(hazard) = map.hazard_at(x, y) {
        pathfind::interrupt_movement(entities, actor);
        outcome.interrupted = true;
        outcome.yield_turn = true;
        outcome.results.push(ActionResult::message(format!("You step into {}!", hazard.name)));
        outcome.results.push(ActionResult::EnemyTurn);
        return outcome;
    }

    // Step 7: threat check.
    let reach = entities
        .get(actor)
        .map(|e| aggregate_bonuses(entities, e).reach)
        .unwrap_or(1);
    let actor_faction = entities.get(actor).and_then(|e| e.faction().copied());
    if any_threat_within(entities, map, fov, actor, x, y, actor_faction, threat_distance(reach)) {
        pathfind::interrupt_movement(entities, actor);
        outcome.interrupted = true;
        outcome.yield_turn = true;
        outcome.results.push(ActionResult::message("Enemy spotted!"));
        outcome.results.push(ActionResult::EnemyTurn);
        return outcome;
    }

    // Step 8/9: still moving, or arrived and ready to fire the deferred goal.
    let still_moving = entities.get(actor).and_then(|e| e.pathfinding()).map(|p| p.is_moving).unwrap_or(false);
    if still_moving {
        outcome.continue_pathfinding = true;
        outcome.results.push(ActionResult::ContinuePathfinding);
        return outcome;
    }

    let pending = entities.get_mut(actor).and_then(|e| e.pathfinding_mut()).and_then(|p| p.pending_auto_action.take());
    if let Some(action) = pending {
        let dispatch_outcome = match action {
            AutoAction::Pickup(item_id) => interaction::dispatch_pickup(entities, actor, item_id),
            other => interaction::dispatch_auto_action(entities, rng, other),
        };
        outcome.results.extend(dispatch_outcome.results);
    }
    if let Some(state) = entities.get_mut(actor).and_then(|e| e.pathfinding_mut()) {
        state.cancel();
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Chest, Component, Faction as FactionComponent, Item};
    use crate::entity::Entity;
    use crate::map::{AlwaysVisible, SimpleMap};

    #[test]
    fn path_step_reports_continue_pathfinding_when_no_threat_nearby() {
        let mut entities = EntitySet::new();
        let actor = entities.spawn(|id| {
            let mut e = Entity::new(id, "hero", 0, 0);
            e.set_component(Component::Faction(FactionComponent::Player));
            e
        });
        let mut map = SimpleMap::open(10, 10);
        let mut rng = GameRng::from_seed(1);
        let fov = AlwaysVisible;
        pathfind::set_destination(&mut entities, &map, actor, 3, 0, 64);

        let outcome = step(&mut entities, &mut map, &fov, &mut rng, actor);
        assert!(!outcome.interrupted);
        assert!(outcome.results.iter().any(|r| matches!(r, ActionResult::ContinuePathfinding)));
    }

    #[test]
    fn nearby_hostile_interrupts_and_yields_turn() {
        let mut entities = EntitySet::new();
        let actor = entities.spawn(|id| {
            let mut e = Entity::new(id, "hero", 0, 0);
            e.set_component(Component::Faction(FactionComponent::Player));
            e
        });
        entities.spawn(|id| {
            let mut e = Entity::new(id, "orc", 1, 1);
            e.set_component(Component::Faction(FactionComponent::Monsters));
            e.set_component(Component::Fighter(crate::components::Fighter::new(10, 0, 0)));
            e
        });
        let mut map = SimpleMap::open(10, 10);
        let mut rng = GameRng::from_seed(1);
        let fov = AlwaysVisible;
        pathfind::set_destination(&mut entities, &map, actor, 5, 0, 64);

        let outcome = step(&mut entities, &mut map, &fov, &mut rng, actor);
        assert!(outcome.interrupted);
        assert!(outcome.yield_turn);
    }

    #[test]
    fn arriving_at_destination_fires_pending_pickup_and_clears_state() {
        let mut entities = EntitySet::new();
        let actor = entities.spawn(|id| {
            let mut e = Entity::new(id, "hero", 0, 0);
            e.set_component(Component::Inventory(crate::components::Inventory::new(5)));
            e.set_component(Component::Faction(FactionComponent::Player));
            e
        });
        let item = entities.spawn(|id| {
            let mut e = Entity::new(id, "potion", 1, 0);
            e.set_component(Component::Item(Item::default()));
            e
        });
        let mut map = SimpleMap::open(10, 10);
        let mut rng = GameRng::from_seed(1);
        let fov = AlwaysVisible;
        pathfind::set_destination(&mut entities, &map, actor, 1, 0, 64);
        if let Some(e) = entities.get_mut(actor) {
            e.pathfinding_mut().unwrap().pending_auto_action = Some(crate::components::AutoAction::Pickup(item));
        }

        let outcome = step(&mut entities, &mut map, &fov, &mut rng, actor);
        assert!(!outcome.interrupted);
        assert!(entities.get(actor).unwrap().inventory().unwrap().items.contains(&item));
        assert!(entities.get(actor).unwrap().pathfinding().unwrap().pending_auto_action.is_none());
    }

    #[test]
    fn arriving_at_chest_opens_it() {
        let mut entities = EntitySet::new();
        let actor = entities.spawn(|id| {
            let mut e = Entity::new(id, "hero", 0, 0);
            e.set_component(Component::Faction(FactionComponent::Player));
            e
        });
        let chest = entities.spawn(|id| {
            let mut e = Entity::new(id, "chest", 0, 1);
            e.add_tag("openable");
            e.set_component(Component::Chest(Chest::default()));
            e
        });
        let mut map = SimpleMap::open(10, 10);
        let mut rng = GameRng::from_seed(1);
        let fov = AlwaysVisible;
        pathfind::set_destination(&mut entities, &map, actor, 0, 1, 64);
        // standing adjacent below the chest isn't possible since chest itself
        // blocks the destination; pathfinding to the chest's own cell here is
        // only for the unit test's sake since chest does not block movement.
        if let Some(e) = entities.get_mut(actor) {
            e.pathfinding_mut().unwrap().pending_auto_action = Some(crate::components::AutoAction::Open(chest));
        }

        let outcome = step(&mut entities, &mut map, &fov, &mut rng, actor);
        assert!(!outcome.interrupted);
        assert!(entities.get(chest).unwrap().chest().unwrap().opened);
    }
}
