//! Collaborator interfaces the core consumes but does not own: the map,
//! FOV, and the two optional map-side systems (hazards, secret doors). A
//! minimal in-memory implementation is provided for tests and the scenario
//! runner; real map generation lives entirely outside the core.

use crate::entity::EntityId;

/// Grid of tiles the core reads (never generates). `next_floor` is the only
/// mutating entry point, and it is explicitly out of the core's scope to
/// implement — callers provide their own `GameMap` that knows how to
/// regenerate itself.
pub trait GameMap {
    fn width(&self) -> i32;
    fn height(&self) -> i32;
    fn blocked(&self, x: i32, y: i32) -> bool;
    fn block_sight(&self, x: i32, y: i32) -> bool;
    fn explored(&self, x: i32, y: i32) -> bool;
    fn set_explored(&mut self, x: i32, y: i32);

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width() && y < self.height()
    }

    /// Ground hazard at a cell, if any. Optional collaborator.
    fn hazard_at(&self, _x: i32, _y: i32) -> Option<Hazard> {
        None
    }

    /// Secret-door reveal check near a position. Optional collaborator;
    /// fails closed (no reveals) when absent.
    fn check_secret_door_reveals(&mut self, _x: i32, _y: i32, _max_distance: i32) -> Vec<(i32, i32)> {
        Vec::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hazard {
    pub name: String,
}

/// FOV consumer: a boolean grid the core reads, never computes. FOV
/// computation itself is out of scope for this crate.
pub trait FovMap {
    fn is_in_fov(&self, x: i32, y: i32) -> bool;
}

/// Simple rectangular map backed by a flat `Vec<bool>`, good enough for unit
/// tests, integration tests, and the scenario runner. Not a production map
/// generator — that collaborator lives outside the core.
#[derive(Debug, Clone)]
pub struct SimpleMap {
    pub width: i32,
    pub height: i32,
    wall: Vec<bool>,
    explored: Vec<bool>,
}

impl SimpleMap {
    pub fn open(width: i32, height: i32) -> Self {
        let size = (width * height).max(0) as usize;
        Self {
            width,
            height,
            wall: vec![false; size],
            explored: vec![false; size],
        }
    }

    fn index(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    pub fn set_wall(&mut self, x: i32, y: i32, wall: bool) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.wall[idx] = wall;
        }
    }
}

impl GameMap for SimpleMap {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn blocked(&self, x: i32, y: i32) -> bool {
        if !self.in_bounds(x, y) {
            return true;
        }
        self.wall[self.index(x, y)]
    }

    fn block_sight(&self, x: i32, y: i32) -> bool {
        self.blocked(x, y)
    }

    fn explored(&self, x: i32, y: i32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.explored[self.index(x, y)]
    }

    fn set_explored(&mut self, x: i32, y: i32) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.explored[idx] = true;
        }
    }
}

/// An always-visible FOV, for tests that don't exercise visibility gating.
#[derive(Debug, Default)]
pub struct AlwaysVisible;

impl FovMap for AlwaysVisible {
    fn is_in_fov(&self, _x: i32, _y: i32) -> bool {
        true
    }
}

/// Narrow, nullable collaborator API — the core tolerates this being
/// entirely absent at any call site.
pub trait KnockbackService {
    /// Attempts to push `entity`, currently at `(from_x, from_y)`, one tile
    /// further along the `(dx, dy)` direction. Returns the new position on
    /// success; `None` if the destination is blocked, occupied, or the
    /// direction is zero.
    fn apply_knockback_single_tile(
        &self,
        entity: EntityId,
        from_x: i32,
        from_y: i32,
        dx: i32,
        dy: i32,
        map: &dyn GameMap,
        occupied: &dyn Fn(i32, i32) -> bool,
    ) -> Option<(i32, i32)>;
}

/// Default knockback: moves exactly one tile in the given direction if the
/// destination is in bounds, unblocked, and unoccupied (grounded on
/// `apply_knockback_single_tile`'s "respects Entity.move" contract).
#[derive(Debug, Default)]
pub struct SingleTileKnockback;

impl KnockbackService for SingleTileKnockback {
    fn apply_knockback_single_tile(
        &self,
        _entity: EntityId,
        from_x: i32,
        from_y: i32,
        dx: i32,
        dy: i32,
        map: &dyn GameMap,
        occupied: &dyn Fn(i32, i32) -> bool,
    ) -> Option<(i32, i32)> {
        let step_x = dx.signum();
        let step_y = dy.signum();
        if step_x == 0 && step_y == 0 {
            return None;
        }
        let (tx, ty) = (from_x + step_x, from_y + step_y);
        if !map.blocked(tx, ty) && !occupied(tx, ty) {
            Some((tx, ty))
        } else {
            None
        }
    }
}
