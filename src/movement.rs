//! Movement service: the single place that actually changes an entity's
//! `(x, y)`. Auto-actions and the player's manual step command both funnel
//! through `execute_movement`.

use crate::entity::{EntityId, EntitySet};
use crate::map::GameMap;

/// Structured outcome the caller (action layer, auto-action runner) branches
/// on. Kept as independent fields rather than a single enum — the
/// auto-action loop needs to react to several of these in combination (e.g.
/// forward `messages` and `fov_recompute` together on a successful step).
#[derive(Debug, Clone, Default)]
pub struct MovementOutcome {
    pub success: bool,
    pub blocked_by_wall: bool,
    pub blocked_by_entity: Option<EntityId>,
    pub blocked_by_status: bool,
    pub fov_recompute: bool,
    pub portal_entry: bool,
    pub messages: Vec<String>,
}

/// Move `source` by `(dx, dy)`: bounds check, incapacitation check, wall
/// check, then blocking-entity check, in that order; the first denial
/// short-circuits the rest.
pub fn execute_movement(entities: &mut EntitySet, map: &mut dyn GameMap, source: EntityId, dx: i32, dy: i32) -> MovementOutcome {
    let mut outcome = MovementOutcome::default();

    let Some((x, y)) = entities.get(source).map(|e| (e.x, e.y)) else {
        return outcome;
    };
    let (tx, ty) = (x + dx, y + dy);

    if !map.in_bounds(tx, ty) {
        outcome.blocked_by_wall = true;
        return outcome;
    }

    let incapacitated = entities
        .get(source)
        .and_then(|e| e.status_effects())
        .map(|s| s.is_incapacitated())
        .unwrap_or(false);
    if incapacitated {
        outcome.blocked_by_status = true;
        return outcome;
    }

    if map.blocked(tx, ty) {
        outcome.blocked_by_wall = true;
        return outcome;
    }

    if let Some(blocker) = entities.blocking_at(tx, ty, Some(source)) {
        outcome.blocked_by_entity = Some(blocker);
        return outcome;
    }

    if let Some(entity) = entities.get_mut(source) {
        entity.x = tx;
        entity.y = ty;
    }
    outcome.success = true;
    outcome.fov_recompute = true;

    let portal_here = entities
        .all_at(tx, ty)
        .into_iter()
        .filter_map(|id| entities.get(id))
        .any(|e| e.portal().is_some());
    if portal_here {
        outcome.portal_entry = true;
        outcome.messages.push("You step through the portal.".to_string());
    }

    for _ in map.check_secret_door_reveals(tx, ty, 3) {
        outcome.messages.push("You notice a hidden door nearby.".to_string());
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::status::{ActiveEffect, Duration, EffectKind};
    use crate::components::{Component, StatusEffects};
    use crate::entity::Entity;
    use crate::map::SimpleMap;

    #[test]
    fn blocked_by_wall_does_not_move_the_entity() {
        let mut entities = EntitySet::new();
        let id = entities.spawn(|id| Entity::new(id, "hero", 1, 1));
        let mut map = SimpleMap::open(5, 5);
        map.set_wall(2, 1, true);

        let outcome = execute_movement(&mut entities, &mut map, id, 1, 0);
        assert!(outcome.blocked_by_wall);
        assert!(!outcome.success);
        assert_eq!((entities.get(id).unwrap().x, entities.get(id).unwrap().y), (1, 1));
    }

    #[test]
    fn paralysis_denies_movement_before_touching_the_map() {
        let mut entities = EntitySet::new();
        let id = entities.spawn(|id| {
            let mut e = Entity::new(id, "hero", 1, 1);
            let mut status = StatusEffects::default();
            status.add(ActiveEffect::new(EffectKind::Paralysis, Duration::Turns(2)));
            e.set_component(Component::StatusEffects(status));
            e
        });
        let mut map = SimpleMap::open(5, 5);

        let outcome = execute_movement(&mut entities, &mut map, id, 1, 0);
        assert!(outcome.blocked_by_status);
        assert!(!outcome.success);
    }

    #[test]
    fn successful_step_updates_position_and_requests_fov() {
        let mut entities = EntitySet::new();
        let id = entities.spawn(|id| Entity::new(id, "hero", 1, 1));
        let mut map = SimpleMap::open(5, 5);

        let outcome = execute_movement(&mut entities, &mut map, id, 1, 0);
        assert!(outcome.success);
        assert!(outcome.fov_recompute);
        assert_eq!((entities.get(id).unwrap().x, entities.get(id).unwrap().y), (2, 1));
    }

    #[test]
    fn blocking_entity_prevents_the_move_and_is_reported() {
        let mut entities = EntitySet::new();
        let mover = entities.spawn(|id| Entity::new(id, "hero", 1, 1));
        let blocker = entities.spawn(|id| {
            let mut e = Entity::new(id, "orc", 2, 1);
            e.blocks = true;
            e
        });
        let mut map = SimpleMap::open(5, 5);

        let outcome = execute_movement(&mut entities, &mut map, mover, 1, 0);
        assert_eq!(outcome.blocked_by_entity, Some(blocker));
        assert!(!outcome.success);
    }
}
