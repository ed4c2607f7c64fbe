//! Equipment component: named slots and the derived bonuses they aggregate
//! (spec §3 Equipment, consumed throughout §4.1).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::components::fighter::DamageType;
use crate::entity::{Entity, EntityId, EntitySet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    MainHand,
    OffHand,
    Head,
    Chest,
    Feet,
    LeftRing,
    RightRing,
    Quiver,
}

impl EquipmentSlot {
    pub const ALL: [EquipmentSlot; 8] = [
        EquipmentSlot::MainHand,
        EquipmentSlot::OffHand,
        EquipmentSlot::Head,
        EquipmentSlot::Chest,
        EquipmentSlot::Feet,
        EquipmentSlot::LeftRing,
        EquipmentSlot::RightRing,
        EquipmentSlot::Quiver,
    ];
}

/// Component carried by item entities that can be equipped into a slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equippable {
    pub slot: EquipmentSlot,
    pub ac_bonus: i32,
    pub to_hit_bonus: i32,
    pub damage_dice: Option<(i32, i32)>,
    pub resistances: HashMap<DamageType, u8>,
    pub speed_bonus: f32,
    pub applies_poison_on_hit: bool,
    pub applies_knockback_on_hit: bool,
    pub is_ranged_weapon: bool,
    pub reach: i32,
    pub crit_threshold: i32,
    pub dex_cap: Option<i32>,
    /// Flat bonus to derived max HP while worn (e.g. a Ring of Vitality).
    pub hp_bonus: i32,
    pub damage_type: DamageType,
    /// Ammo consumed quantity, for quiver slot occupants.
    pub ammo_quantity: Option<i32>,
    pub ammo_effect: Option<AmmoEffect>,
    /// Ring-specific bonus dice added to damage rolls (e.g. Ring of Might -> 1d4).
    pub ring_damage_dice: Option<(i32, i32)>,
}

impl Default for Equippable {
    fn default() -> Self {
        Self {
            slot: EquipmentSlot::MainHand,
            ac_bonus: 0,
            to_hit_bonus: 0,
            damage_dice: None,
            resistances: HashMap::new(),
            speed_bonus: 0.0,
            applies_poison_on_hit: false,
            applies_knockback_on_hit: false,
            is_ranged_weapon: false,
            reach: 1,
            crit_threshold: 20,
            dex_cap: None,
            hp_bonus: 0,
            damage_type: DamageType::Physical,
            ammo_quantity: None,
            ammo_effect: None,
            ring_damage_dice: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmmoEffect {
    Burning,
    Entangle,
}

/// Aggregate bonuses derived by summing every occupied slot's [`Equippable`].
#[derive(Debug, Clone, Default)]
pub struct EquipmentBonuses {
    pub ac_bonus: i32,
    pub to_hit_bonus: i32,
    pub resistances: HashMap<DamageType, u8>,
    pub speed_bonus: f32,
    pub applies_poison_on_hit: bool,
    pub applies_knockback_on_hit: bool,
    pub is_ranged_weapon: bool,
    pub reach: i32,
    pub crit_threshold: i32,
    pub dex_cap: Option<i32>,
    pub hp_bonus: i32,
    /// Bonus damage dice contributed by equipped rings (spec §4.1g "ring
    /// damage dice", e.g. Ring of Might -> 1d4), one entry per ring worn that
    /// carries one.
    pub ring_damage_dice: Vec<(i32, i32)>,
}

/// The wearer's slots. Holds weak (lookup-only) references to item entities —
/// the registry never owns the items it equips; the inventory does for items
/// not currently worn (spec §3 Ownership).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Equipment {
    #[serde(skip)]
    pub slots: HashMap<EquipmentSlot, EntityId>,
}

impl Equipment {
    pub fn get(&self, slot: EquipmentSlot) -> Option<EntityId> {
        self.slots.get(&slot).copied()
    }

    pub fn equip(&mut self, slot: EquipmentSlot, item: EntityId) -> Option<EntityId> {
        self.slots.insert(slot, item)
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Option<EntityId> {
        self.slots.remove(&slot)
    }

    pub fn main_hand(&self) -> Option<EntityId> {
        self.get(EquipmentSlot::MainHand)
    }

    pub fn quiver(&self) -> Option<EntityId> {
        self.get(EquipmentSlot::Quiver)
    }
}

/// Sums every occupied slot's [`Equippable`] into one [`EquipmentBonuses`].
/// Slot-specific fields (reach, crit threshold, ranged flag, on-hit riders)
/// are read from the main hand only — off-hand and armor slots never carry
/// them (spec §3 Equipment).
pub fn aggregate_bonuses(entities: &EntitySet, wearer: &Entity) -> EquipmentBonuses {
    let mut bonuses = EquipmentBonuses {
        reach: 1,
        crit_threshold: 20,
        ..Default::default()
    };
    let Some(equipment) = wearer.equipment() else {
        return bonuses;
    };
    for slot in EquipmentSlot::ALL {
        let Some(item) = equipment.get(slot).and_then(|id| entities.get(id)) else {
            continue;
        };
        let Some(equippable) = item.equippable() else {
            continue;
        };
        bonuses.ac_bonus += equippable.ac_bonus;
        bonuses.to_hit_bonus += equippable.to_hit_bonus;
        bonuses.speed_bonus += equippable.speed_bonus;
        bonuses.hp_bonus += equippable.hp_bonus;
        for (&damage_type, &percent) in &equippable.resistances {
            let entry = bonuses.resistances.entry(damage_type).or_insert(0);
            *entry = (*entry + percent).min(100);
        }
        if slot == EquipmentSlot::MainHand {
            bonuses.applies_poison_on_hit = equippable.applies_poison_on_hit;
            bonuses.applies_knockback_on_hit = equippable.applies_knockback_on_hit;
            bonuses.is_ranged_weapon = equippable.is_ranged_weapon;
            bonuses.reach = equippable.reach;
            bonuses.crit_threshold = equippable.crit_threshold;
            bonuses.dex_cap = equippable.dex_cap;
        }
        if matches!(slot, EquipmentSlot::LeftRing | EquipmentSlot::RightRing) {
            if let Some(dice) = equippable.ring_damage_dice {
                bonuses.ring_damage_dice.push(dice);
            }
        }
    }
    bonuses
}
