//! Interaction dispatcher: a fixed strategy registry keyed by priority,
//! tried against whatever occupies the clicked/targeted cell.

use crate::combat::events::ActionResult;
use crate::components::{AutoAction, Component, Faction, Npc, PathfindingState};
use crate::entity::{Entity, EntityId, EntitySet};
use crate::geometry::is_adjacent;
use crate::pathfind;
use crate::map::GameMap;
use crate::rng::GameRng;

/// The three independent result axes an interaction can produce: whether an
/// action actually dispatched, whether it consumed the turn, and whether
/// the actor should now be pathfinding toward the target. These vary
/// independently — e.g. clicking an already-open chest from across the room
/// starts pathfinding without having taken an action or consumed a turn.
#[derive(Debug, Clone, Default)]
pub struct InteractionOutcome {
    pub action_taken: bool,
    pub consume_turn: bool,
    pub start_pathfinding: bool,
    pub results: Vec<ActionResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Enemy,
    Chest,
    Signpost,
    Item,
    Stairs,
    Npc,
}

/// Lower sorts first: lower = higher priority. Ties within the same numeric
/// priority resolve to entity-set order, not this value.
fn priority(strategy: Strategy) -> i32 {
    match strategy {
        Strategy::Enemy => 0,
        Strategy::Chest => 1,
        Strategy::Signpost => 1,
        Strategy::Item => 2,
        Strategy::Stairs => 3,
        Strategy::Npc => 4,
    }
}

fn hostile_to(actor: &Entity, target: &Entity) -> bool {
    match (actor.faction(), target.faction()) {
        (Some(a), Some(b)) => a != b && *b != Faction::Neutral,
        _ => false,
    }
}

fn matching_strategy(actor: &Entity, target: &Entity) -> Option<Strategy> {
    if target.fighter().map(|f| f.is_alive()).unwrap_or(false) && hostile_to(actor, target) {
        return Some(Strategy::Enemy);
    }
    if target.has_tag("openable") && target.chest().is_some() {
        return Some(Strategy::Chest);
    }
    if target.has_tag("interactable") && (target.signpost().is_some() || target.mural().is_some()) {
        return Some(Strategy::Signpost);
    }
    if target.item().is_some() {
        return Some(Strategy::Item);
    }
    if target.stairs().is_some() {
        return Some(Strategy::Stairs);
    }
    if target.npc().map(|n: &Npc| n.has_dialogue).unwrap_or(false) {
        return Some(Strategy::Npc);
    }
    None
}

/// Picks the (entity, strategy) pair the dispatcher acts on: the priority
/// table above, with the entity-set-order tie-break for equal priorities.
fn select_candidate(entities: &EntitySet, actor: &Entity, cell: (i32, i32)) -> Option<(EntityId, Strategy)> {
    entities
        .all_at(cell.0, cell.1)
        .into_iter()
        .filter(|&id| id != actor.id)
        .filter_map(|id| entities.get(id).and_then(|e| matching_strategy(actor, e).map(|s| (id, s))))
        .min_by_key(|&(_, strategy)| priority(strategy))
}

const NEIGHBOR_READING_ORDER: [(i32, i32); 8] = [(0, -1), (1, -1), (1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1)];

/// Enumerates the 8 neighbors of `target`, keeps those walkable and not
/// blocked by another entity, and returns the one closest (Manhattan) to
/// `from`, reading-order tie-broken rather than always defaulting to the
/// same corner.
pub fn pick_adjacent_tile(entities: &EntitySet, map: &dyn GameMap, actor: EntityId, target: (i32, i32), from: (i32, i32)) -> Option<(i32, i32)> {
    NEIGHBOR_READING_ORDER
        .iter()
        .map(|&(dx, dy)| (target.0 + dx, target.1 + dy))
        .filter(|&(x, y)| map.in_bounds(x, y) && !map.blocked(x, y))
        .filter(|&(x, y)| entities.blocking_at(x, y, Some(actor)).is_none())
        .min_by_key(|&(x, y)| (x - from.0).abs() + (y - from.1).abs())
}

fn ensure_pathfinding(entity: &mut Entity) -> &mut PathfindingState {
    if entity.pathfinding().is_none() {
        entity.set_component(Component::Pathfinding(PathfindingState::default()));
    }
    entity.pathfinding_mut().expect("just inserted")
}

fn start_pathfinding_to(entities: &mut EntitySet, map: &dyn GameMap, actor: EntityId, target_id: EntityId, target_cell: (i32, i32), max_path_length: usize, auto_action: AutoAction) -> bool {
    let Some(actor_pos) = entities.get(actor).map(|e| (e.x, e.y)) else {
        return false;
    };
    let Some(stand_at) = pick_adjacent_tile(entities, map, actor, target_cell, actor_pos) else {
        return false;
    };
    if !pathfind::set_destination(entities, map, actor, stand_at.0, stand_at.1, max_path_length) {
        return false;
    }
    if let Some(entity) = entities.get_mut(actor) {
        ensure_pathfinding(entity).pending_auto_action = Some(auto_action);
    }
    let _ = target_id;
    true
}

/// Dispatch an interaction with whatever occupies `cell`.
pub fn interact(entities: &mut EntitySet, map: &dyn GameMap, rng: &mut GameRng, actor: EntityId, cell: (i32, i32), max_path_length: usize) -> InteractionOutcome {
    let mut outcome = InteractionOutcome::default();
    let Some(actor_entity) = entities.get(actor).cloned() else {
        return outcome;
    };
    let Some((target_id, strategy)) = select_candidate(entities, &actor_entity, cell) else {
        return outcome;
    };

    let adjacent = is_adjacent(actor_entity.x, actor_entity.y, cell.0, cell.1);

    match strategy {
        Strategy::Enemy => {
            if adjacent {
                outcome.action_taken = true;
                outcome.results.push(ActionResult::Targeting(crate::combat::events::TargetingMode::ThrowSelectItem));
            }
            // No deferred action: the table lists none for Enemy.
        }
        Strategy::Chest => {
            if adjacent {
                open_chest(entities, rng, target_id, &mut outcome);
            } else {
                outcome.start_pathfinding = start_pathfinding_to(entities, map, actor, target_id, cell, max_path_length, AutoAction::Open(target_id));
            }
        }
        Strategy::Signpost => {
            if adjacent {
                if let Some(target) = entities.get(target_id) {
                    let message = target
                        .signpost()
                        .map(|s| s.message.clone())
                        .or_else(|| target.mural().map(|m| m.message.clone()))
                        .unwrap_or_default();
                    outcome.results.push(ActionResult::message(message));
                    outcome.action_taken = true;
                }
            } else {
                outcome.start_pathfinding = start_pathfinding_to(entities, map, actor, target_id, cell, max_path_length, AutoAction::Open(target_id));
            }
        }
        Strategy::Item => {
            if adjacent {
                pickup_item(entities, actor, target_id, &mut outcome);
            } else {
                outcome.start_pathfinding = start_pathfinding_to(entities, map, actor, target_id, cell, max_path_length, AutoAction::Pickup(target_id));
            }
        }
        Strategy::Stairs => {
            if adjacent {
                outcome.action_taken = true;
                outcome.consume_turn = true;
                outcome.results.push(ActionResult::TakeStairs);
            } else {
                outcome.start_pathfinding = start_pathfinding_to(entities, map, actor, target_id, cell, max_path_length, AutoAction::Stairs);
            }
        }
        Strategy::Npc => {
            if adjacent {
                outcome.action_taken = true;
                outcome.results.push(ActionResult::message("..."));
            } else {
                outcome.start_pathfinding = start_pathfinding_to(entities, map, actor, target_id, cell, max_path_length, AutoAction::Talk(target_id));
            }
        }
    }

    outcome
}

/// Fires a previously-queued deferred goal (pickup, open, or talk — cleared
/// after dispatch). Used by the auto-action runner once a path completes;
/// shares the same action bodies the adjacent-click path above uses.
///
/// `AutoAction::Pickup` is not handled here: it needs the pathfinding
/// entity's own id as the inventory owner, which this call shape doesn't
/// carry. Callers route it to [`dispatch_pickup`] instead.
pub fn dispatch_auto_action(entities: &mut EntitySet, rng: &mut GameRng, action: AutoAction) -> InteractionOutcome {
    let mut outcome = InteractionOutcome::default();
    match action {
        AutoAction::Pickup(_) => {}
        AutoAction::Open(chest_id) => open_chest(entities, rng, chest_id, &mut outcome),
        AutoAction::Talk(_) => {
            outcome.action_taken = true;
            outcome.results.push(ActionResult::message("..."));
        }
        AutoAction::Stairs => {
            outcome.action_taken = true;
            outcome.consume_turn = true;
            outcome.results.push(ActionResult::TakeStairs);
        }
    }
    outcome
}

/// Pickup variant of [`dispatch_auto_action`] that needs the actor id (the
/// inventory the item is added to).
pub fn dispatch_pickup(entities: &mut EntitySet, actor: EntityId, item_id: EntityId) -> InteractionOutcome {
    let mut outcome = InteractionOutcome::default();
    pickup_item(entities, actor, item_id, &mut outcome);
    outcome
}

fn open_chest(entities: &mut EntitySet, rng: &mut GameRng, chest_id: EntityId, outcome: &mut InteractionOutcome) {
    let Some(chest_entity) = entities.get_mut(chest_id) else { return };
    let Some(chest) = chest_entity.chest_mut() else { return };
    if chest.opened {
        outcome.action_taken = false;
        outcome.results.push(ActionResult::message("The chest is already empty."));
        return;
    }
    if chest.locked {
        outcome.results.push(ActionResult::message("The chest is locked."));
        return;
    }
    chest.opened = true;
    let trapped = chest.trapped;
    outcome.action_taken = true;
    outcome.consume_turn = true;
    outcome.results.push(ActionResult::DoorOpened(chest_id));
    if trapped && rng.chance(0.5) {
        outcome.results.push(ActionResult::message("A trap springs as the chest opens!"));
    }
}

fn pickup_item(entities: &mut EntitySet, actor: EntityId, item_id: EntityId, outcome: &mut InteractionOutcome) {
    let added = entities
        .get_mut(actor)
        .and_then(|e| e.inventory_mut())
        .map(|inv| inv.add(item_id))
        .unwrap_or(false);
    outcome.action_taken = true;
    outcome.consume_turn = true;
    if added {
        if let Some(item) = entities.get_mut(item_id) {
            item.blocks = false;
        }
        outcome.results.push(ActionResult::message("You pick it up."));
    } else {
        outcome.results.push(ActionResult::message("Your inventory is full."));
    }
}
