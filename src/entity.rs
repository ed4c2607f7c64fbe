//! Entity identity, position, and the per-entity component registry (C1).
//!
//! An [`Entity`] is a uniquely-identified actor or object. It owns its
//! position, its render/UI-opaque presentation data, a free-form tag set,
//! and a [`ComponentRegistry`] mapping a closed enumeration of component
//! kinds to exactly one component object each. The registry is the single
//! source of truth; `entity.fighter()` and friends are read-through
//! shortcuts over it.
//!
//! Components never hold a strong (owning) reference back to their entity —
//! an owner lookup is a plain [`EntityId`], resolved against the owning
//! [`EntitySet`] when needed. This avoids reference cycles between an entity
//! and the things it refers to (rings tracking their source, ammo tracking
//! its quiver, and so on).

use std::collections::HashMap;

use crate::components::{Component, ComponentKind};

/// Stable identifier for an entity, unique for the lifetime of a run.
///
/// Plain incrementing index rather than a generational handle: the core
/// never reuses ids (dead combatants become corpses in place; only items
/// and ephemeral spawns are actually removed, and removed slots are never
/// recycled — see [`EntitySet::remove`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Draw-order tiebreak, used only by the (external) renderer; the core
/// keeps it because death transforms it (combatant -> corpse).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RenderOrder {
    Corpse,
    Item,
    Actor,
    Player,
}

/// Opaque-to-the-core presentation data. The core never interprets glyph or
/// color; it only mutates them on death.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub glyph: char,
    pub color: (u8, u8, u8),
}

/// A uniquely-identified actor or object.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub x: i32,
    pub y: i32,
    pub name: String,
    pub presentation: Presentation,
    pub blocks: bool,
    pub render_order: RenderOrder,
    pub tags: Vec<String>,
    components: HashMap<ComponentKind, Component>,
}

impl Entity {
    pub fn new(id: EntityId, name: impl Into<String>, x: i32, y: i32) -> Self {
        Self {
            id,
            x,
            y,
            name: name.into(),
            presentation: Presentation {
                glyph: '?',
                color: (255, 255, 255),
            },
            blocks: false,
            render_order: RenderOrder::Actor,
            tags: Vec::new(),
            components: HashMap::new(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.has_tag(&tag) {
            self.tags.push(tag);
        }
    }

    /// Insert or replace the component of this kind. Exactly-one-per-kind is
    /// enforced by construction: the map key is the component's own kind.
    pub fn set_component(&mut self, component: Component) {
        self.components.insert(component.kind(), component);
    }

    pub fn remove_component(&mut self, kind: ComponentKind) -> Option<Component> {
        self.components.remove(&kind)
    }

    pub fn has_component(&self, kind: ComponentKind) -> bool {
        self.components.contains_key(&kind)
    }

    pub fn component(&self, kind: ComponentKind) -> Option<&Component> {
        self.components.get(&kind)
    }

    pub fn component_mut(&mut self, kind: ComponentKind) -> Option<&mut Component> {
        self.components.get_mut(&kind)
    }

    pub fn component_kinds(&self) -> impl Iterator<Item = &ComponentKind> {
        self.components.keys()
    }

    /// Chebyshev distance to another entity's position (see [`crate::geometry`]).
    pub fn chebyshev_distance_to(&self, other: &Entity) -> i32 {
        crate::geometry::chebyshev_distance(self.x, self.y, other.x, other.y)
    }

    /// Euclidean distance, used by the interaction dispatcher's adjacency
    /// check (diagonals count as adjacent up to 1.5).
    pub fn euclidean_distance_to(&self, other: &Entity) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Species identifier used by the monster knowledge system: explicit tag
    /// of the form `species:<id>` if present, else the lowercased name with
    /// spaces replaced by underscores.
    pub fn knowledge_species_id(&self) -> String {
        for tag in &self.tags {
            if let Some(id) = tag.strip_prefix("species:") {
                return id.to_string();
            }
        }
        self.name.to_lowercase().replace(' ', "_")
    }
}

/// Ordered, append-only (within a run) owner of every entity.
///
/// Ordering matters: per-round monster turns iterate the entity set in
/// insertion order, and the tie-break for multiple entities stacked on one
/// cell uses that same insertion order.
#[derive(Debug, Default)]
pub struct EntitySet {
    order: Vec<EntityId>,
    entities: HashMap<EntityId, Entity>,
    next_id: u32,
}

impl EntitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, build: impl FnOnce(EntityId) -> Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        let entity = build(id);
        self.order.push(id);
        self.entities.insert(id, entity);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Remove an entity entirely (items after pickup, splits, teleports).
    /// Invalidates ordering immediately; no sorting cache survives removal.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.order.retain(|existing| *existing != id);
        self.entities.remove(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Iterate entities in insertion order (stable — used for stacked-entity
    /// tie-breaks and monster turn order).
    pub fn iter_in_order(&self) -> impl Iterator<Item = &Entity> {
        self.order.iter().filter_map(move |id| self.entities.get(id))
    }

    pub fn ids_in_order(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn blocking_at(&self, x: i32, y: i32, exclude: Option<EntityId>) -> Option<EntityId> {
        self.order.iter().copied().find(|&id| {
            if Some(id) == exclude {
                return false;
            }
            match self.entities.get(&id) {
                Some(e) => e.blocks && e.x == x && e.y == y,
                None => false,
            }
        })
    }

    pub fn all_at(&self, x: i32, y: i32) -> Vec<EntityId> {
        self.order
            .iter()
            .copied()
            .filter(|&id| matches!(self.entities.get(&id), Some(e) if e.x == x && e.y == y))
            .collect()
    }

    /// Runs `f` with simultaneous mutable access to two distinct entities
    /// (e.g. attacker and target). `HashMap` has no safe "two keys at once"
    /// accessor without an unstable/unsafe API, so this temporarily takes
    /// `a` out of the map, hands `f` both entities, then puts `a` back —
    /// `order` is untouched since no id changes. Returns `None` if either id
    /// is missing or `a == b`.
    pub fn with_pair_mut<R>(
        &mut self,
        a: EntityId,
        b: EntityId,
        f: impl FnOnce(&mut Entity, &mut Entity) -> R,
    ) -> Option<R> {
        if a == b {
            return None;
        }
        let mut entity_a = self.entities.remove(&a)?;
        let result = self.entities.get_mut(&b).map(|entity_b| f(&mut entity_a, entity_b));
        self.entities.insert(a, entity_a);
        result
    }
}
