//! Pathfinding Core (C7, spec §4.6): true grid A* via the `pathfinding`
//! crate, replacing the teacher's continuous steering (it has no use for
//! grid A*; its combat is real-time positional) and the Python prototype's
//! `tcod`-backed path_new_using_map/path_compute pair this is grounded on.

use std::collections::HashSet;

use pathfinding::prelude::astar;

use crate::components::{Component, PathfindingState};
use crate::entity::{Entity, EntityId, EntitySet};
use crate::map::GameMap;

const ORTHOGONAL_COST: i32 = 10;
const DIAGONAL_COST: i32 = 14;

fn octile_heuristic(from: (i32, i32), to: (i32, i32)) -> i32 {
    let dx = (from.0 - to.0).abs();
    let dy = (from.1 - to.1).abs();
    ORTHOGONAL_COST * dx.max(dy) + (DIAGONAL_COST - ORTHOGONAL_COST) * dx.min(dy)
}

fn neighbors(x: i32, y: i32) -> [(i32, i32); 8] {
    [
        (x + 1, y),
        (x - 1, y),
        (x, y + 1),
        (x, y - 1),
        (x + 1, y + 1),
        (x + 1, y - 1),
        (x - 1, y + 1),
        (x - 1, y - 1),
    ]
}

/// Computes an A* path from `from` to `to`. Every *other* blocking entity is
/// marked impassable except at the destination cell itself (spec §4.6: "even
/// if an entity stands there", so the mover can path up to and attack it).
pub fn compute_path(entities: &EntitySet, map: &dyn GameMap, mover: EntityId, from: (i32, i32), to: (i32, i32)) -> Option<Vec<(i32, i32)>> {
    let blocked_cells: HashSet<(i32, i32)> = entities
        .iter_in_order()
        .filter(|e| e.blocks && e.id != mover && (e.x, e.y) != to)
        .map(|e| (e.x, e.y))
        .collect();

    let result = astar(
        &from,
        |&(x, y)| {
            neighbors(x, y)
                .into_iter()
                .filter(|&(nx, ny)| map.in_bounds(nx, ny) && !map.blocked(nx, ny) && !blocked_cells.contains(&(nx, ny)))
                .map(|(nx, ny)| {
                    let cost = if nx != x && ny != y { DIAGONAL_COST } else { ORTHOGONAL_COST };
                    ((nx, ny), cost)
                })
                .collect::<Vec<_>>()
        },
        |&p| octile_heuristic(p, to),
        |&p| p == to,
    );
    result.map(|(path, _cost)| path)
}

fn ensure_pathfinding_state(entity: &mut Entity) -> &mut PathfindingState {
    if entity.pathfinding().is_none() {
        entity.set_component(Component::Pathfinding(PathfindingState::default()));
    }
    entity.pathfinding_mut().expect("just inserted")
}

/// `set_destination` (spec §4.6): refuses out-of-bounds, wall, or
/// already-there destinations; stores the computed path on success.
pub fn set_destination(entities: &mut EntitySet, map: &dyn GameMap, mover: EntityId, tx: i32, ty: i32, max_path_length: usize) -> bool {
    if !map.in_bounds(tx, ty) || map.blocked(tx, ty) {
        return false;
    }
    let Some((x, y)) = entities.get(mover).map(|e| (e.x, e.y)) else {
        return false;
    };
    if (x, y) == (tx, ty) {
        return false;
    }

    let Some(path) = compute_path(entities, map, mover, (x, y), (tx, ty)) else {
        return false;
    };
    // `astar` includes the start cell; the mover is already standing there.
    let steps: Vec<(i32, i32)> = path.into_iter().skip(1).collect();
    if steps.is_empty() || steps.len() > max_path_length {
        return false;
    }

    let Some(entity) = entities.get_mut(mover) else {
        return false;
    };
    ensure_pathfinding_state(entity).set_path(steps, (tx, ty));
    true
}

/// Per-tick step (spec §4.6): returns the next cell and advances the index.
pub fn get_next_move(entities: &mut EntitySet, mover: EntityId) -> Option<(i32, i32)> {
    let state = entities.get_mut(mover)?.pathfinding_mut()?;
    let next = state.next_step();
    if next.is_some() {
        state.advance();
    }
    next
}

pub fn interrupt_movement(entities: &mut EntitySet, mover: EntityId) {
    if let Some(state) = entities.get_mut(mover).and_then(|e| e.pathfinding_mut()) {
        state.interrupt();
    }
}

pub fn cancel_movement(entities: &mut EntitySet, mover: EntityId) {
    if let Some(state) = entities.get_mut(mover).and_then(|e| e.pathfinding_mut()) {
        state.cancel();
    }
}
