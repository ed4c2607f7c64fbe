//! Death Handling (spec §4.5): the two ways an entity stops participating —
//! corpse transformation in place, or outright removal from the entity set.

use crate::components::ComponentKind;
use crate::entity::{Entity, EntityId, EntitySet, RenderOrder};

const CORPSE_GLYPH: char = '%';
const CORPSE_COLOR: (u8, u8, u8) = (139, 0, 0);

/// Combat/corpse transformation: the entity stays in the world (lootable,
/// raisable) but stops acting or blocking. Idempotent — a second call on an
/// already-corpsed entity is a no-op, checked via `render_order`.
pub fn transform_to_corpse(entity: &mut Entity) {
    if entity.render_order == RenderOrder::Corpse {
        return;
    }
    entity.presentation.glyph = CORPSE_GLYPH;
    entity.presentation.color = CORPSE_COLOR;
    entity.blocks = false;
    entity.render_order = RenderOrder::Corpse;
    entity.remove_component(ComponentKind::Fighter);
    entity.remove_component(ComponentKind::Ai);
}

/// Removal: items after pickup, or entities destroyed by splits/teleports.
/// `EntitySet::remove` already invalidates the insertion-order cache.
pub fn remove_entity(entities: &mut EntitySet, id: EntityId) -> Option<Entity> {
    entities.remove(id)
}
