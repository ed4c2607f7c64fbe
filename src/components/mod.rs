//! Component registry: a closed sum type per spec §9 Design Notes, rather
//! than an open trait-object or framework ECS. Each entity stores at most
//! one [`Component`] per [`ComponentKind`] in a `HashMap`.

pub mod ai;
pub mod equipment;
pub mod fighter;
pub mod inventory;
pub mod pathfinding;
pub mod status;
pub mod world_objects;

pub use ai::{Ai, AiBehavior, AutoExplore, Boss, Faction, MonsterKnowledgeKey, Npc, RingBonus, SpeedBonusTracker, Statistics};
pub use equipment::{aggregate_bonuses, AmmoEffect, Equipment, EquipmentBonuses, EquipmentSlot, Equippable};
pub use fighter::{AbilityScores, DamageType, Fighter};
pub use inventory::{Inventory, Item};
pub use pathfinding::{AutoAction, PathfindingState};
pub use status::StatusEffects;
pub use world_objects::{Chest, LockedDoor, Mural, Portal, PortalPlacer, Signpost, Stairs};

/// Discriminant for [`Component`], used as the registry's `HashMap` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Fighter,
    Equipment,
    Equippable,
    Inventory,
    Item,
    Ai,
    StatusEffects,
    Pathfinding,
    Chest,
    Signpost,
    Mural,
    Stairs,
    LockedDoor,
    Portal,
    PortalPlacer,
    Boss,
    SpeedBonusTracker,
    AutoExplore,
    Statistics,
    Faction,
    MonsterKnowledgeKey,
    Npc,
    RingBonus,
}

/// The component sum type. Every concrete component struct gets exactly one
/// variant; `kind()` is the single source of truth mapping a value to its
/// [`ComponentKind`], so the two can never drift apart silently.
#[derive(Debug, Clone)]
pub enum Component {
    Fighter(Fighter),
    Equipment(Equipment),
    Equippable(Equippable),
    Inventory(Inventory),
    Item(Item),
    Ai(Ai),
    StatusEffects(StatusEffects),
    Pathfinding(PathfindingState),
    Chest(Chest),
    Signpost(Signpost),
    Mural(Mural),
    Stairs(Stairs),
    LockedDoor(LockedDoor),
    Portal(Portal),
    PortalPlacer(PortalPlacer),
    Boss(Boss),
    SpeedBonusTracker(SpeedBonusTracker),
    AutoExplore(AutoExplore),
    Statistics(Statistics),
    Faction(Faction),
    MonsterKnowledgeKey(MonsterKnowledgeKey),
    Npc(Npc),
    RingBonus(RingBonus),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Fighter(_) => ComponentKind::Fighter,
            Component::Equipment(_) => ComponentKind::Equipment,
            Component::Equippable(_) => ComponentKind::Equippable,
            Component::Inventory(_) => ComponentKind::Inventory,
            Component::Item(_) => ComponentKind::Item,
            Component::Ai(_) => ComponentKind::Ai,
            Component::StatusEffects(_) => ComponentKind::StatusEffects,
            Component::Pathfinding(_) => ComponentKind::Pathfinding,
            Component::Chest(_) => ComponentKind::Chest,
            Component::Signpost(_) => ComponentKind::Signpost,
            Component::Mural(_) => ComponentKind::Mural,
            Component::Stairs(_) => ComponentKind::Stairs,
            Component::LockedDoor(_) => ComponentKind::LockedDoor,
            Component::Portal(_) => ComponentKind::Portal,
            Component::PortalPlacer(_) => ComponentKind::PortalPlacer,
            Component::Boss(_) => ComponentKind::Boss,
            Component::SpeedBonusTracker(_) => ComponentKind::SpeedBonusTracker,
            Component::AutoExplore(_) => ComponentKind::AutoExplore,
            Component::Statistics(_) => ComponentKind::Statistics,
            Component::Faction(_) => ComponentKind::Faction,
            Component::MonsterKnowledgeKey(_) => ComponentKind::MonsterKnowledgeKey,
            Component::Npc(_) => ComponentKind::Npc,
            Component::RingBonus(_) => ComponentKind::RingBonus,
        }
    }
}

/// Generates `From<T> for Component`, and on `Entity`, `{name}()` /
/// `{name}_mut()` typed accessors backed by the generic component map.
/// Keeps the registry closed (spec §9) while giving call sites the ergonomics
/// of per-kind fields.
#[macro_export]
macro_rules! impl_component_accessors {
    ($($variant:ident => $ty:ty, $getter:ident, $getter_mut:ident;)*) => {
        $(
            impl From<$ty> for $crate::components::Component {
                fn from(value: $ty) -> Self {
                    $crate::components::Component::$variant(value)
                }
            }
        )*

        impl $crate::entity::Entity {
            $(
                pub fn $getter(&self) -> Option<&$ty> {
                    match self.component($crate::components::ComponentKind::$variant) {
                        Some($crate::components::Component::$variant(c)) => Some(c),
                        _ => None,
                    }
                }

                pub fn $getter_mut(&mut self) -> Option<&mut $ty> {
                    match self.component_mut($crate::components::ComponentKind::$variant) {
                        Some($crate::components::Component::$variant(c)) => Some(c),
                        _ => None,
                    }
                }
            )*
        }
    };
}

impl_component_accessors! {
    Fighter => Fighter, fighter, fighter_mut;
    Equipment => Equipment, equipment, equipment_mut;
    Equippable => Equippable, equippable, equippable_mut;
    Inventory => Inventory, inventory, inventory_mut;
    Item => Item, item, item_mut;
    Ai => Ai, ai, ai_mut;
    StatusEffects => StatusEffects, status_effects, status_effects_mut;
    Pathfinding => PathfindingState, pathfinding, pathfinding_mut;
    Chest => Chest, chest, chest_mut;
    Signpost => Signpost, signpost, signpost_mut;
    Mural => Mural, mural, mural_mut;
    Stairs => Stairs, stairs, stairs_mut;
    LockedDoor => LockedDoor, locked_door, locked_door_mut;
    Portal => Portal, portal, portal_mut;
    PortalPlacer => PortalPlacer, portal_placer, portal_placer_mut;
    Boss => Boss, boss, boss_mut;
    SpeedBonusTracker => SpeedBonusTracker, speed_bonus_tracker, speed_bonus_tracker_mut;
    AutoExplore => AutoExplore, auto_explore, auto_explore_mut;
    Statistics => Statistics, statistics, statistics_mut;
    Faction => Faction, faction, faction_mut;
    MonsterKnowledgeKey => MonsterKnowledgeKey, monster_knowledge_key, monster_knowledge_key_mut;
    Npc => Npc, npc, npc_mut;
    RingBonus => RingBonus, ring_bonus, ring_bonus_mut;
}
