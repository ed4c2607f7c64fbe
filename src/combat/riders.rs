//! Rider effects: the fixed ordered table of on-hit applicators dispatched
//! by the attack pipeline after damage lands (spec §4.1(l), §9 "Rider-effect
//! proliferation... implement as a table of (predicate, applicator) pairs
//! processed in the defined order, not as an unrolled chain").

use crate::combat::events::ActionResult;
use crate::combat::log::{CombatLog, CombatLogEventType};
use crate::components::status::{ActiveEffect, Duration, EffectKind};
use crate::components::{Component, StatusEffects};
use crate::entity::{Entity, EntityId, EntitySet};
use crate::geometry::RANGED_KNOCKBACK_CHANCE;
use crate::knowledge::{MonsterKnowledgeSystem, TRAIT_PLAGUE_CARRIER};
use crate::map::{GameMap, KnockbackService};
use crate::metrics::{self, Metrics};
use crate::rng::GameRng;

/// Everything a rider applicator needs. Bundled so the ordered table in
/// [`apply_riders`] can pass one `&mut` argument per call instead of seven.
pub struct RiderContext<'a> {
    pub entities: &'a mut EntitySet,
    pub map: &'a dyn GameMap,
    pub rng: &'a mut GameRng,
    pub knowledge: Option<&'a mut MonsterKnowledgeSystem>,
    pub metrics: Option<&'a mut Metrics>,
    pub log: &'a mut CombatLog,
    pub knockback: &'a dyn KnockbackService,
    pub attacker_id: EntityId,
    pub target_id: EntityId,
    pub damage_dealt: i32,
    pub is_ranged: bool,
}

/// Runs every rider in the fixed order. Each is independently conditional on
/// its own trigger; most are no-ops most of the time.
pub fn apply_riders(ctx: &mut RiderContext) -> Vec<ActionResult> {
    let mut results = Vec::new();
    corrosion(ctx, &mut results);
    engulf(ctx, &mut results);
    life_drain(ctx, &mut results);
    plague_spread(ctx, &mut results);
    poison(ctx, &mut results);
    burning(ctx, &mut results);
    slow(ctx, &mut results);
    special_ammo(ctx, &mut results);
    oath_effects(ctx, &mut results);
    weapon_knockback(ctx, &mut results);
    ranged_knockback(ctx, &mut results);
    results
}

/// A `StatusEffects` component is added lazily on first use rather than at
/// spawn time for every entity (most never need one).
fn ensure_status_effects(entity: &mut Entity) -> &mut StatusEffects {
    if entity.status_effects().is_none() {
        entity.set_component(Component::StatusEffects(StatusEffects::default()));
    }
    entity.status_effects_mut().expect("just inserted")
}

fn attacker_has_ability(ctx: &RiderContext, ability: &str) -> bool {
    ctx.entities
        .get(ctx.attacker_id)
        .and_then(|e| e.ai())
        .map(|ai| ai.has_ability(ability))
        .unwrap_or(false)
}

/// (1) Corrosion: acid-wielding monsters have a chance to clamp the target's
/// wielded weapon's max damage die at half its current value.
fn corrosion(ctx: &mut RiderContext, results: &mut Vec<ActionResult>) {
    if !attacker_has_ability(ctx, "corrosion") {
        return;
    }
    if !ctx.rng.chance(0.25) {
        return;
    }
    let Some(weapon_id) = ctx
        .entities
        .get(ctx.target_id)
        .and_then(|e| e.equipment())
        .and_then(|eq| eq.main_hand())
    else {
        return;
    };
    let target_name = ctx.entities.get(ctx.target_id).map(|e| e.name.clone()).unwrap_or_default();
    if let Some(weapon) = ctx.entities.get_mut(weapon_id) {
        if let Some(equippable) = weapon.equippable_mut() {
            if let Some((min, max)) = equippable.damage_dice {
                equippable.damage_dice = Some((min, (max / 2).max(min)));
                results.push(ActionResult::message(format!("{target_name}'s weapon corrodes!")));
            }
        }
    }
}

/// (2) Engulf: deterministic status on hit from an Engulf-capable attacker.
fn engulf(ctx: &mut RiderContext, results: &mut Vec<ActionResult>) {
    if !attacker_has_ability(ctx, "engulf") {
        return;
    }
    let attacker_id = ctx.attacker_id;
    if let Some(target) = ctx.entities.get_mut(ctx.target_id) {
        let name = target.name.clone();
        let status = ensure_status_effects(target);
        let mut effect = ActiveEffect::new(EffectKind::Engulfed, Duration::Turns(2));
        effect.source = Some(attacker_id);
        status.add(effect);
        results.push(ActionResult::message(format!("{name} is engulfed!")));
    }
}

/// (3) Life-drain: heals the attacker a percent of damage dealt, capped at
/// missing HP, blocked entirely by Ward-Against-Drain.
fn life_drain(ctx: &mut RiderContext, results: &mut Vec<ActionResult>) {
    let pct = ctx
        .entities
        .get(ctx.attacker_id)
        .and_then(|e| e.ai())
        .filter(|ai| ai.has_ability("life_drain"))
        .map(|_| 0.5)
        .unwrap_or(0.0);
    if pct <= 0.0 {
        return;
    }
    let warded = ctx
        .entities
        .get(ctx.target_id)
        .and_then(|e| e.status_effects())
        .map(|s| s.has(EffectKind::WardAgainstDrain))
        .unwrap_or(false);
    if warded {
        metrics::incr(ctx.metrics.as_deref_mut(), "life_drain_blocked_by_ward");
        return;
    }
    let heal = ((ctx.damage_dealt as f32) * pct) as i32;
    if heal <= 0 {
        return;
    }
    let max_hp = ctx.entities.get(ctx.attacker_id).and_then(|attacker| {
        let hp_bonus = crate::components::equipment::aggregate_bonuses(ctx.entities, attacker).hp_bonus;
        attacker.fighter().map(|f| f.derived_max_hp(hp_bonus))
    });
    let Some(max_hp) = max_hp else { return };
    if let Some(attacker) = ctx.entities.get_mut(ctx.attacker_id) {
        if let Some(fighter) = attacker.fighter_mut() {
            let missing = max_hp - fighter.hp;
            let actual = heal.min(missing.max(0));
            if actual > 0 {
                fighter.hp += actual;
                results.push(ActionResult::message(format!("{} drains {} life.", attacker.name, actual)));
            }
        }
    }
}

/// (4) Plague spread: 25% chance if attacker is a plague carrier and target
/// is corporeal flesh not yet infected.
fn plague_spread(ctx: &mut RiderContext, results: &mut Vec<ActionResult>) {
    let carrier = ctx
        .entities
        .get(ctx.attacker_id)
        .map(|e| e.has_tag("plague_carrier"))
        .unwrap_or(false);
    if !carrier {
        return;
    }
    let target_ok = ctx
        .entities
        .get(ctx.target_id)
        .map(|e| e.has_tag("corporeal") && !e.has_tag("undead"))
        .unwrap_or(false);
    if !target_ok {
        return;
    }
    let already_infected = ctx
        .entities
        .get(ctx.target_id)
        .and_then(|e| e.status_effects())
        .map(|s| s.has(EffectKind::Poison))
        .unwrap_or(false);
    if already_infected {
        return;
    }
    if !ctx.rng.chance(0.25) {
        return;
    }
    if let Some(target) = ctx.entities.get_mut(ctx.target_id) {
        let name = target.name.clone();
        let status = ensure_status_effects(target);
        status.add(ActiveEffect::new(EffectKind::Poison, Duration::Turns(6)));
        results.push(ActionResult::message(format!(
            "{name} is infected with the Plague of Restless Death!"
        )));
    }
    if let Some(attacker) = ctx.entities.get(ctx.attacker_id).cloned() {
        if let Some(knowledge) = ctx.knowledge.as_deref_mut() {
            knowledge.register_trait(&attacker, TRAIT_PLAGUE_CARRIER);
        }
    }
}

fn apply_timed_status(ctx: &mut RiderContext, kind: EffectKind, duration_turns: i32, message: String, results: &mut Vec<ActionResult>) {
    if let Some(target) = ctx.entities.get_mut(ctx.target_id) {
        let status = ensure_status_effects(target);
        status.add(ActiveEffect::new(kind, Duration::Turns(duration_turns)));
        results.push(ActionResult::message(message));
    }
}

/// (5) Poison: from a `poison_attack` ability, or the attacker's weapon
/// flagged `applies_poison_on_hit`.
fn poison(ctx: &mut RiderContext, results: &mut Vec<ActionResult>) {
    let from_ability = attacker_has_ability(ctx, "poison_attack");
    let from_weapon = ctx
        .entities
        .get(ctx.attacker_id)
        .and_then(|e| e.equipment())
        .and_then(|eq| eq.main_hand())
        .and_then(|item_id| ctx.entities.get(item_id))
        .and_then(|item| item.equippable())
        .map(|w| w.applies_poison_on_hit)
        .unwrap_or(false);
    if !from_ability && !from_weapon {
        return;
    }
    let name = ctx.entities.get(ctx.target_id).map(|e| e.name.clone()).unwrap_or_default();
    apply_timed_status(ctx, EffectKind::Poison, 5, format!("{name} is poisoned!"), results);
}

/// (6) Burning: from a `burning_attack` ability.
fn burning(ctx: &mut RiderContext, results: &mut Vec<ActionResult>) {
    if !attacker_has_ability(ctx, "burning_attack") {
        return;
    }
    let name = ctx.entities.get(ctx.target_id).map(|e| e.name.clone()).unwrap_or_default();
    apply_timed_status(ctx, EffectKind::Burning, 3, format!("{name} catches fire!"), results);
}

/// (7) Slow: from `web_spit` / `slow_attack`.
fn slow(ctx: &mut RiderContext, results: &mut Vec<ActionResult>) {
    if !attacker_has_ability(ctx, "web_spit") && !attacker_has_ability(ctx, "slow_attack") {
        return;
    }
    let name = ctx.entities.get(ctx.target_id).map(|e| e.name.clone()).unwrap_or_default();
    apply_timed_status(ctx, EffectKind::Slowed, 3, format!("{name} is slowed!"), results);
}

/// (8) Special ammo effect (burning/entangle), gated by a per-shot chance.
fn special_ammo(ctx: &mut RiderContext, results: &mut Vec<ActionResult>) {
    if !ctx.is_ranged {
        return;
    }
    let ammo_effect = ctx
        .entities
        .get(ctx.attacker_id)
        .and_then(|e| e.equipment())
        .and_then(|eq| eq.quiver())
        .and_then(|item_id| ctx.entities.get(item_id))
        .and_then(|item| item.equippable())
        .and_then(|e| e.ammo_effect);
    let Some(ammo_effect) = ammo_effect else { return };
    if !ctx.rng.chance(0.20) {
        return;
    }
    let name = ctx.entities.get(ctx.target_id).map(|e| e.name.clone()).unwrap_or_default();
    match ammo_effect {
        crate::components::AmmoEffect::Burning => {
            apply_timed_status(ctx, EffectKind::Burning, 3, format!("{name} is set ablaze by the arrow!"), results)
        }
        crate::components::AmmoEffect::Entangle => {
            apply_timed_status(ctx, EffectKind::Slowed, 2, format!("{name} is entangled!"), results)
        }
    }
}

/// (9) Player Oath effects: Embers (33% burning proc + self-burn if still
/// adjacent to the target), Venom (25% poison proc; extends an existing
/// Poison instead of stacking, via [`StatusEffects::add`]'s Oath-of-Venom
/// special case).
fn oath_effects(ctx: &mut RiderContext, results: &mut Vec<ActionResult>) {
    let has_embers = ctx
        .entities
        .get(ctx.attacker_id)
        .and_then(|e| e.status_effects())
        .map(|s| s.has(EffectKind::OathOfEmbers))
        .unwrap_or(false);
    if has_embers && ctx.rng.chance(0.33) {
        let target_name = ctx.entities.get(ctx.target_id).map(|e| e.name.clone()).unwrap_or_default();
        apply_timed_status(ctx, EffectKind::Burning, 3, format!("{target_name} is seared by Oath-of-Embers!"), results);

        // Self-burn only if attacker is still adjacent to target (spec §9
        // Open Question, resolved in DESIGN.md: checked after any knockback
        // this swing has already applied).
        let still_adjacent = match (ctx.entities.get(ctx.attacker_id), ctx.entities.get(ctx.target_id)) {
            (Some(a), Some(t)) => crate::geometry::chebyshev_distance(a.x, a.y, t.x, t.y) <= 1,
            _ => false,
        };
        if still_adjacent {
            if let Some(attacker) = ctx.entities.get_mut(ctx.attacker_id) {
                let name = attacker.name.clone();
                let status = ensure_status_effects(attacker);
                status.add(ActiveEffect::new(EffectKind::Burning, Duration::Turns(2)));
                results.push(ActionResult::message(format!("{name} is singed by their own Oath-of-Embers!")));
            }
        }
    }

    let has_venom = ctx
        .entities
        .get(ctx.attacker_id)
        .and_then(|e| e.status_effects())
        .map(|s| s.has(EffectKind::OathOfVenom))
        .unwrap_or(false);
    if has_venom && ctx.rng.chance(0.25) {
        let target_name = ctx.entities.get(ctx.target_id).map(|e| e.name.clone()).unwrap_or_default();
        apply_timed_status(ctx, EffectKind::Poison, 5, format!("{target_name} is poisoned by Oath-of-Venom!"), results);
    }
}

fn knockback_target(ctx: &mut RiderContext, results: &mut Vec<ActionResult>, metric_name: &str) {
    let Some((ax, ay, tx, ty)) = ctx
        .entities
        .get(ctx.attacker_id)
        .zip(ctx.entities.get(ctx.target_id))
        .map(|(a, t)| (a.x, a.y, t.x, t.y))
    else {
        return;
    };
    let dx = tx - ax;
    let dy = ty - ay;
    let target_id = ctx.target_id;
    let entities = &*ctx.entities;
    let occupied = |x: i32, y: i32| entities.blocking_at(x, y, Some(target_id)).is_some();
    let new_pos = ctx.knockback.apply_knockback_single_tile(target_id, tx, ty, dx, dy, ctx.map, &occupied);
    if let Some((nx, ny)) = new_pos {
        if let Some(target) = ctx.entities.get_mut(target_id) {
            target.x = nx;
            target.y = ny;
            results.push(ActionResult::message(format!("{} is knocked back!", target.name)));
        }
        metrics::incr(ctx.metrics.as_deref_mut(), metric_name);
    }
}

/// (10) Weapon knockback, from `applies_knockback_on_hit`.
fn weapon_knockback(ctx: &mut RiderContext, results: &mut Vec<ActionResult>) {
    let applies = ctx
        .entities
        .get(ctx.attacker_id)
        .and_then(|e| e.equipment())
        .and_then(|eq| eq.main_hand())
        .and_then(|item_id| ctx.entities.get(item_id))
        .and_then(|item| item.equippable())
        .map(|w| w.applies_knockback_on_hit)
        .unwrap_or(false);
    if applies {
        knockback_target(ctx, results, "weapon_knockback_procs");
    }
}

/// (11) Ranged knockback: 10% proc chance, ranged hits only.
fn ranged_knockback(ctx: &mut RiderContext, results: &mut Vec<ActionResult>) {
    if !ctx.is_ranged {
        return;
    }
    if !ctx.rng.chance(RANGED_KNOCKBACK_CHANCE) {
        return;
    }
    knockback_target(ctx, results, "ranged_knockback_procs");
    ctx.log.log(CombatLogEventType::Damage, "ranged knockback proc");
}
