//! Damage application and resistance reduction.

use crate::combat::events::ActionResult;
use crate::combat::log::{CombatLog, CombatLogEventType};
use crate::components::{aggregate_bonuses, DamageType};
use crate::entity::{Entity, EntityId, EntitySet};
use crate::knowledge::MonsterKnowledgeSystem;

/// Inputs to [`apply_damage`]. `current_turn` is needed only to stamp the
/// regeneration-suppression deadline. `resistance_percent` is the caller's
/// precomputed combined percent (spec §4.2 step 1: Fighter base + aggregated
/// equipment, capped at 100) — see [`combined_resistance_percent`]. This
/// function takes only `&mut Entity`, so it cannot aggregate equipment
/// itself; the caller (which has the `EntitySet`) is expected to have done
/// so.
pub struct DamageRequest {
    pub amount: i32,
    pub damage_type: Option<DamageType>,
    pub resistance_percent: u8,
    pub current_turn: u32,
    pub god_mode: bool,
}

/// Resistance percent for `damage_type` against `target`, combining the
/// Fighter's base `resistances` table and every occupied equipment slot's
/// own resistance entries, capped at 100 (spec §4.2 step 1).
pub fn combined_resistance_percent(entities: &EntitySet, target: &Entity, damage_type: DamageType) -> u8 {
    let base = target.fighter().map(|f| f.resistance_percent(damage_type) as u32).unwrap_or(0);
    let equipment = aggregate_bonuses(entities, target)
        .resistances
        .get(&damage_type)
        .copied()
        .unwrap_or(0) as u32;
    (base + equipment).min(100) as u8
}

/// Applies resistance, the god-mode floor, chant/rally interruption, the
/// split pre-emption hook, and death/XP/knowledge registration, in that
/// fixed order. Returns the ordered result stream; never panics on a target
/// lacking a Fighter (callers are expected to have checked — the
/// `ContractViolation` boundary lives at the attack-pipeline entry point,
/// not this narrower helper).
pub fn apply_damage(
    target: &mut Entity,
    request: DamageRequest,
    log: &mut CombatLog,
    knowledge: Option<&mut MonsterKnowledgeSystem>,
) -> Vec<ActionResult> {
    let mut results = Vec::new();
    let name = target.name.clone();

    let Some(fighter) = target.fighter_mut() else {
        return results;
    };

    let mut amount = request.amount.max(0);

    if request.damage_type.is_some() {
        let percent = request.resistance_percent.min(100) as i32;
        let reduced = (amount * (100 - percent)) / 100;
        if percent >= 100 {
            results.push(ActionResult::message(format!("{name} is immune to this damage.")));
        } else if percent >= 50 {
            results.push(ActionResult::message(format!("{name} resists much of the damage.")));
        }
        amount = reduced.max(0);
    }

    if request.god_mode && amount >= fighter.hp {
        amount = fighter.hp.saturating_sub(1).max(0);
    }

    fighter.hp -= amount;
    let hp_after = fighter.hp;

    if matches!(request.damage_type, Some(DamageType::Acid) | Some(DamageType::Fire)) {
        if let Some(fighter) = target.fighter_mut() {
            fighter.regen_suppressed_until_turn = Some(request.current_turn + 1);
        }
    }

    if amount > 0 {
        if target.has_tag("chanting") {
            results.push(ActionResult::InterruptChant(target.id));
            target.tags.retain(|t| t != "chanting");
        }
        if let Some(rally_source) = rally_source(target) {
            results.push(ActionResult::EndRally(rally_source));
        }
        log.log(CombatLogEventType::Damage, format!("{} takes {} damage", target.name, amount));
    }

    if split_under_pressure(target, hp_after) {
        results.push(ActionResult::Split {
            parent: target.id,
            spawn_tag: "split".to_string(),
        });
        return results;
    }

    if hp_after <= 0 {
        let xp = target.fighter().map(|f| f.xp_value).unwrap_or(0);
        results.push(ActionResult::Dead { entity: target.id, xp });
        if let Some(knowledge) = knowledge {
            knowledge.register_killed(target);
        }
    }

    results
}

fn rally_source(target: &Entity) -> Option<EntityId> {
    target
        .status_effects()
        .and_then(|s| s.get(crate::components::status::EffectKind::RallyBuff))
        .and_then(|effect| effect.source)
}

/// "Split Under Pressure": read off a tag convention rather than a
/// dedicated component (see DESIGN.md).
fn split_under_pressure(target: &Entity, hp_after: i32) -> bool {
    hp_after <= 0 && target.has_tag("splits_under_pressure") && !target.has_tag("already_split")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Component, Fighter};
    use crate::entity::EntityId;

    fn make_target(hp: i32) -> Entity {
        let mut e = Entity::new(EntityId(0), "orc", 0, 0);
        let mut fighter = Fighter::new(hp, 0, 0);
        fighter.hp = hp;
        e.set_component(Component::Fighter(fighter));
        e
    }

    #[test]
    fn resistance_reduces_damage_and_floors() {
        let mut target = make_target(10);
        target.fighter_mut().unwrap().resistances.insert(DamageType::Fire, 50);
        let mut log = CombatLog::default();
        let results = apply_damage(
            &mut target,
            DamageRequest {
                amount: 5,
                damage_type: Some(DamageType::Fire),
                resistance_percent: 50,
                current_turn: 0,
                god_mode: false,
            },
            &mut log,
            None,
        );
        assert_eq!(target.fighter().unwrap().hp, 8);
        assert!(results.iter().any(|r| matches!(r, ActionResult::Message(_))));
    }

    #[test]
    fn god_mode_floors_at_one_hp() {
        let mut target = make_target(5);
        let mut log = CombatLog::default();
        apply_damage(
            &mut target,
            DamageRequest {
                amount: 99,
                damage_type: None,
                resistance_percent: 0,
                current_turn: 0,
                god_mode: true,
            },
            &mut log,
            None,
        );
        assert_eq!(target.fighter().unwrap().hp, 1);
    }

    #[test]
    fn lethal_damage_emits_dead_result() {
        let mut target = make_target(3);
        let mut log = CombatLog::default();
        let mut knowledge = MonsterKnowledgeSystem::new();
        let results = apply_damage(
            &mut target,
            DamageRequest {
                amount: 10,
                damage_type: None,
                resistance_percent: 0,
                current_turn: 0,
                god_mode: false,
            },
            &mut log,
            Some(&mut knowledge),
        );
        assert!(results.iter().any(|r| matches!(r, ActionResult::Dead { .. })));
        assert_eq!(knowledge.get_entry("orc").killed_count, 1);
    }
}
