//! Attack Pipeline (C5, spec §4.1): the single `attack()` entry point every
//! combat action funnels through, in the fixed phase order (a)-(n).

use crate::combat::events::ActionResult;
use crate::combat::log::CombatLog;
use crate::combat::riders::{apply_riders, RiderContext};
use crate::components::fighter::ability_modifier;
use crate::components::status::EffectKind;
use crate::components::{aggregate_bonuses, DamageType};
use crate::config::GameConfig;
use crate::damage::{apply_damage, DamageRequest};
use crate::entity::{EntityId, EntitySet};
use crate::geometry::{chebyshev_distance, range_band, RangeBand};
use crate::knowledge::MonsterKnowledgeSystem;
use crate::map::{GameMap, KnockbackService};
use crate::metrics::{self, Metrics};
use crate::rng::GameRng;

/// Everything `attack()` needs that is not attacker/target-specific. Bundled
/// the same way [`RiderContext`] is, for the same reason: one `&mut`
/// argument instead of seven.
pub struct AttackContext<'a> {
    pub entities: &'a mut EntitySet,
    pub map: &'a dyn GameMap,
    pub rng: &'a mut GameRng,
    pub knowledge: Option<&'a mut MonsterKnowledgeSystem>,
    pub metrics: Option<&'a mut Metrics>,
    pub log: &'a mut CombatLog,
    pub knockback: &'a dyn KnockbackService,
    pub config: &'a GameConfig,
    pub current_turn: u32,
}

/// Per-call overrides. `target_ac_override` is how phase (f)'s "halve the
/// attacker's equipment AC for the nested retaliation swing" requirement is
/// satisfied: a true RAII guard would need to hold a live mutable borrow
/// into the same `EntitySet` the nested `attack()` call also needs mutable
/// access to, which safe Rust cannot express. Computing the halved value
/// once and threading it through as data sidesteps the aliasing problem
/// entirely — nothing mutable is touched, so there is nothing to restore.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttackOptions {
    pub is_surprise: bool,
    pub target_ac_override: Option<i32>,
    /// Set on the nested retaliation call to suppress a second round of
    /// retaliation (one level of nesting, not infinite).
    pub suppress_retaliation: bool,
}

fn is_monster(entities: &EntitySet, id: EntityId) -> bool {
    entities.get(id).map(|e| e.ai().is_some()).unwrap_or(false)
}

fn status_ac_delta(entities: &EntitySet, id: EntityId) -> i32 {
    entities
        .get(id)
        .and_then(|e| e.status_effects())
        .map(|s| s.kinds().filter_map(|k| s.get(k)).map(|e| e.ac_delta).sum())
        .unwrap_or(0)
}

fn status_sum(entities: &EntitySet, id: EntityId, select: impl Fn(&crate::components::status::ActiveEffect) -> i32) -> i32 {
    entities
        .get(id)
        .and_then(|e| e.status_effects())
        .map(|s| s.kinds().filter_map(|k| s.get(k)).map(&select).sum())
        .unwrap_or(0)
}

fn target_armor_class(entities: &EntitySet, target_id: EntityId, override_value: Option<i32>) -> i32 {
    if let Some(value) = override_value {
        return value;
    }
    let Some(target) = entities.get(target_id) else { return 10 };
    let Some(fighter) = target.fighter() else { return 10 };
    let equipment_ac = aggregate_bonuses(entities, target).ac_bonus;
    10 + fighter.base_defense + ability_modifier(fighter.abilities.dexterity) + equipment_ac + status_ac_delta(entities, target_id)
}

/// The armor class a ranged-threatened defender presents to its own nested
/// retaliation swing: equipment's AC contribution halved, everything else
/// (base defense, dex, status) untouched (spec §4.1f).
fn halved_equipment_ac(entities: &EntitySet, attacker_id: EntityId) -> i32 {
    let Some(attacker) = entities.get(attacker_id) else { return 10 };
    let Some(fighter) = attacker.fighter() else { return 10 };
    let equipment_ac = aggregate_bonuses(entities, attacker).ac_bonus;
    10 + fighter.base_defense + ability_modifier(fighter.abilities.dexterity) + equipment_ac / 2 + status_ac_delta(entities, attacker_id)
}

/// Command-the-Dead: +1 to-hit if the attacker is undead AI and an allied
/// living entity tagged `lich` (the command source) is within Chebyshev
/// distance 6. Fails closed (returns 0) if any lookup comes up empty.
fn command_the_dead_bonus(entities: &EntitySet, attacker_id: EntityId) -> i32 {
    let Some(attacker) = entities.get(attacker_id) else { return 0 };
    if attacker.ai().is_none() {
        return 0;
    }
    if !matches!(attacker.faction(), Some(crate::components::Faction::Undead)) {
        return 0;
    }
    let has_nearby_lich = entities.iter_in_order().any(|e| {
        e.id != attacker_id
            && e.has_tag("lich")
            && e.fighter().map(|f| f.is_alive()).unwrap_or(false)
            && chebyshev_distance(attacker.x, attacker.y, e.x, e.y) <= 6
    });
    if has_nearby_lich {
        1
    } else {
        0
    }
}

fn main_hand_equippable(entities: &EntitySet, id: EntityId) -> Option<crate::components::Equippable> {
    entities
        .get(id)?
        .equipment()?
        .main_hand()
        .and_then(|item_id| entities.get(item_id))
        .and_then(|item| item.equippable())
        .cloned()
}

/// The attack pipeline entry point (spec §4.1). Produces an ordered result
/// list; phases run in the strict order the spec lists them in.
pub fn attack(ctx: &mut AttackContext, attacker_id: EntityId, target_id: EntityId, options: AttackOptions) -> Vec<ActionResult> {
    let mut results = Vec::new();

    let attacker_is_monster = is_monster(ctx.entities, attacker_id);
    metrics::incr(
        ctx.metrics.as_deref_mut(),
        if attacker_is_monster { "monster_attacks_made" } else { "player_attacks_made" },
    );

    let weapon = main_hand_equippable(ctx.entities, attacker_id);
    let is_ranged = weapon.as_ref().map(|w| w.is_ranged_weapon).unwrap_or(false);

    // (a) Ranged pre-check.
    let mut band_multiplier = 1.0_f32;
    let mut band_retaliates = false;
    if is_ranged {
        let (ax, ay, tx, ty) = match (ctx.entities.get(attacker_id), ctx.entities.get(target_id)) {
            (Some(a), Some(t)) => (a.x, a.y, t.x, t.y),
            _ => return results,
        };
        let distance = chebyshev_distance(ax, ay, tx, ty);
        let entry = range_band(distance);
        metrics::incr(ctx.metrics.as_deref_mut(), "ranged_attacks_attempted");
        let Some(multiplier) = entry.multiplier else {
            results.push(ActionResult::message("Out of range."));
            metrics::incr(ctx.metrics.as_deref_mut(), "ranged_attacks_denied");
            return results;
        };
        band_multiplier = multiplier;
        band_retaliates = entry.retaliation;
        if entry.band != RangeBand::Optimal {
            metrics::incr(ctx.metrics.as_deref_mut(), "ranged_attacks_suboptimal");
        }
    }

    // (b) Canonical invisibility/surprise bonus. Single point that grants it.
    let attacker_invisible = ctx
        .entities
        .get(attacker_id)
        .and_then(|e| e.status_effects())
        .map(|s| s.has(EffectKind::Invisibility))
        .unwrap_or(false);
    let mut is_surprise = options.is_surprise;
    if attacker_invisible && !attacker_is_monster && is_monster(ctx.entities, target_id) {
        is_surprise = true;
        metrics::incr(ctx.metrics.as_deref_mut(), "surprise_attacks");
    }
    if attacker_invisible {
        metrics::incr(ctx.metrics.as_deref_mut(), "invis_attacks");
    }

    // (c) Knowledge bookkeeping: either side's monster gets an "engaged" tick.
    for id in [attacker_id, target_id] {
        if let (Some(knowledge), Some(entity)) = (ctx.knowledge.as_deref_mut(), ctx.entities.get(id)) {
            if entity.ai().is_some() {
                knowledge.register_engaged(entity);
            }
        }
    }

    // (d) To-hit roll. Effect-specific to-hit modifiers (Rally, Heroism,
    // Sonic-Bellow, Crippling-Hex, Blinded) all flow through the generic
    // `to_hit_delta` rider field rather than a per-kind match (spec §9:
    // model riders as data, not an unrolled chain).
    let roll = ctx.rng.roll_d20();
    let dex_mod = ctx
        .entities
        .get(attacker_id)
        .and_then(|e| e.fighter())
        .map(|f| ability_modifier(f.abilities.dexterity))
        .unwrap_or(0);
    let weapon_to_hit = weapon.as_ref().map(|w| w.to_hit_bonus).unwrap_or(0);
    let status_to_hit = status_sum(ctx.entities, attacker_id, |e| e.to_hit_delta);
    let command_bonus = command_the_dead_bonus(ctx.entities, attacker_id);
    let total = roll + dex_mod + weapon_to_hit + status_to_hit + command_bonus;

    let blinded = ctx
        .entities
        .get(attacker_id)
        .and_then(|e| e.status_effects())
        .map(|s| s.has(EffectKind::Blinded))
        .unwrap_or(false);
    if blinded {
        metrics::incr(ctx.metrics.as_deref_mut(), "blind_attacks_attempted");
    }

    // (e) Crit / fumble / hit resolution.
    let crit_threshold = weapon.as_ref().map(|w| w.crit_threshold).unwrap_or(20);
    let is_critical = roll >= crit_threshold || is_surprise;
    let is_fumble = roll == 1 && !is_surprise;
    let target_ac = target_armor_class(ctx.entities, target_id, options.target_ac_override);
    let is_hit = !is_fumble && (is_surprise || is_critical || total >= target_ac);

    if !is_hit {
        results.push(ActionResult::message("The attack misses."));
        if blinded {
            metrics::incr(ctx.metrics.as_deref_mut(), "blind_attacks_missed");
        }
        consume_ammo(ctx, attacker_id, &mut results);
        break_invisibility(ctx, attacker_id, attacker_invisible, &mut results);
        return results;
    }

    // (f) Retaliation: only for a ranged shot fired from inside threatened
    // range, and only one level deep.
    if is_ranged && band_retaliates && !options.suppress_retaliation {
        let can_retaliate = ctx.entities.get(target_id).map(|t| {
            t.fighter().map(|f| f.is_alive()).unwrap_or(false)
                && !t.status_effects().map(|s| s.is_incapacitated()).unwrap_or(false)
        });
        if can_retaliate == Some(true) {
            metrics::incr(ctx.metrics.as_deref_mut(), "ranged_adjacent_retaliations_triggered");
            let attacker_ac_for_retaliation = halved_equipment_ac(ctx.entities, attacker_id);
            let nested = attack(
                ctx,
                target_id,
                attacker_id,
                AttackOptions {
                    is_surprise: false,
                    target_ac_override: Some(attacker_ac_for_retaliation),
                    suppress_retaliation: true,
                },
            );
            let attacker_died = nested.has_death_of(attacker_id);
            results.extend(nested);
            if attacker_died {
                return results;
            }
        }
    }

    // (g) Damage roll.
    let attacker_disarmed = ctx.entities.get(attacker_id).map(|e| e.has_tag("disarmed")).unwrap_or(false);
    if attacker_disarmed && weapon.is_some() {
        metrics::incr(ctx.metrics.as_deref_mut(), "disarmed_weapon_attacks_prevented");
    }
    let (damage_min, damage_max, damage_type) = if let (Some(w), false) = (&weapon, attacker_disarmed) {
        (w.damage_dice.map(|d| d.0).unwrap_or(1), w.damage_dice.map(|d| d.1).unwrap_or(2), w.damage_type)
    } else if attacker_disarmed {
        (1, 2, DamageType::Physical)
    } else {
        let fighter = ctx.entities.get(attacker_id).and_then(|e| e.fighter());
        (
            fighter.map(|f| f.damage_min).unwrap_or(1),
            fighter.map(|f| f.damage_max).unwrap_or(2),
            fighter.map(|f| f.natural_damage_type).unwrap_or(DamageType::Physical),
        )
    };
    let base_roll = ctx.rng.roll_range(damage_min, damage_max);
    let str_mod = ctx
        .entities
        .get(attacker_id)
        .and_then(|e| e.fighter())
        .map(|f| ability_modifier(f.abilities.strength))
        .unwrap_or(0);
    let status_damage_bonus = status_sum(ctx.entities, attacker_id, |e| e.damage_bonus);
    // Ring damage dice (spec §4.1g): the attacker's `RingBonus` component
    // (a ring tracked outside the equipment slots, e.g. a scripted boon) plus
    // every equipped left/right ring's own `ring_damage_dice` (spec §3
    // Equipment), each rolled independently.
    let ring_bonus_roll = ctx
        .entities
        .get(attacker_id)
        .and_then(|e| e.ring_bonus())
        .and_then(|r| r.damage_dice)
        .map(|(lo, hi)| ctx.rng.roll_range(lo, hi))
        .unwrap_or(0);
    let equipped_ring_dice = ctx
        .entities
        .get(attacker_id)
        .map(|attacker| aggregate_bonuses(ctx.entities, attacker).ring_damage_dice)
        .unwrap_or_default();
    let equipped_ring_roll: i32 = equipped_ring_dice.iter().map(|&(lo, hi)| ctx.rng.roll_range(lo, hi)).sum();
    let mut damage = (base_roll + str_mod + status_damage_bonus + ring_bonus_roll + equipped_ring_roll).max(0);

    // (h) Damage-type modifier.
    if let Some(target) = ctx.entities.get(target_id) {
        if let Some(fighter) = target.fighter() {
            if let Some(&multiplier) = fighter.damage_type_modifiers.get(&damage_type) {
                damage = (damage as f32 * multiplier).floor() as i32;
            } else if fighter.damage_resistance == Some(damage_type) {
                damage -= 1;
            } else if fighter.damage_vulnerability == Some(damage_type) {
                damage += 1;
            }
        }
    }

    // (i) Range-band damage multiplier.
    let pre_band_damage = damage;
    damage = ((damage as f32 * band_multiplier).floor() as i32).max(1);
    let penalty = (pre_band_damage - damage).max(0);
    if penalty > 0 {
        metrics::record(ctx.metrics.as_deref_mut(), "ranged_damage_penalty_total", penalty as f64);
    }

    // (j) Critical doubling.
    if is_critical {
        damage = (damage * 2).max(1);
    }

    // (k) Apply damage.
    let target_is_monster = is_monster(ctx.entities, target_id);
    let resistance_percent = ctx
        .entities
        .get(target_id)
        .map(|target| crate::damage::combined_resistance_percent(ctx.entities, target, damage_type))
        .unwrap_or(0);
    let apply_results = apply_damage(
        ctx.entities.get_mut(target_id).expect("target existed through to-hit"),
        DamageRequest {
            amount: damage,
            damage_type: Some(damage_type),
            resistance_percent,
            current_turn: ctx.current_turn,
            god_mode: ctx.config.difficulty.god_mode && !target_is_monster,
        },
        ctx.log,
        ctx.knowledge.as_deref_mut(),
    );
    let target_died = apply_results.has_death();
    results.extend(apply_results);

    // (l) Rider effects on hit, unless the target just died.
    if !target_died {
        let mut rider_ctx = RiderContext {
            entities: ctx.entities,
            map: ctx.map,
            rng: ctx.rng,
            knowledge: ctx.knowledge.as_deref_mut(),
            metrics: ctx.metrics.as_deref_mut(),
            log: ctx.log,
            knockback: ctx.knockback,
            attacker_id,
            target_id,
            damage_dealt: damage,
            is_ranged,
        };
        results.extend(apply_riders(&mut rider_ctx));
    }

    // (m) Ammo consumption (hit or miss, so this also covers the hit path).
    consume_ammo(ctx, attacker_id, &mut results);

    // (n) Invisibility break.
    break_invisibility(ctx, attacker_id, attacker_invisible, &mut results);

    results
}

fn consume_ammo(ctx: &mut AttackContext, attacker_id: EntityId, results: &mut Vec<ActionResult>) {
    let quiver_item = ctx
        .entities
        .get(attacker_id)
        .and_then(|e| e.equipment())
        .and_then(|eq| eq.quiver());
    let Some(item_id) = quiver_item else { return };
    let depleted = if let Some(item) = ctx.entities.get_mut(item_id) {
        if let Some(equippable) = item.equippable_mut() {
            if let Some(qty) = equippable.ammo_quantity.as_mut() {
                *qty -= 1;
                *qty <= 0
            } else {
                false
            }
        } else {
            false
        }
    } else {
        false
    };
    if depleted {
        if let Some(attacker) = ctx.entities.get_mut(attacker_id) {
            if let Some(equipment) = attacker.equipment_mut() {
                equipment.unequip(crate::components::EquipmentSlot::Quiver);
            }
        }
        ctx.entities.remove(item_id);
        results.push(ActionResult::message("You are out of ammunition."));
    }
}

fn break_invisibility(ctx: &mut AttackContext, attacker_id: EntityId, was_invisible: bool, results: &mut Vec<ActionResult>) {
    if !was_invisible {
        return;
    }
    let removed = ctx
        .entities
        .get_mut(attacker_id)
        .and_then(|attacker| attacker.status_effects_mut())
        .map(|status| status.remove(EffectKind::Invisibility))
        .unwrap_or(false);
    if removed {
        results.push(ActionResult::message("You are no longer invisible."));
        metrics::incr(ctx.metrics.as_deref_mut(), "invis_broken_by_attack");
    }
}

/// Narrow extension used only by phase (f): did a specific entity die in
/// this result stream? (The generic [`crate::combat::events::ResultStreamExt`]
/// only asks "did anyone die".)
trait DeathOfExt {
    fn has_death_of(&self, id: EntityId) -> bool;
}

impl DeathOfExt for [ActionResult] {
    fn has_death_of(&self, id: EntityId) -> bool {
        self.iter().any(|r| matches!(r, ActionResult::Dead { entity, .. } if *entity == id))
    }
}
