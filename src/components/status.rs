//! Status-effect system (spec §4.3, C3): tagged-variant effects, held by the
//! [`StatusEffects`] component itself — the "StatusEffectManager" of spec §3
//! *is* this component, not a separate collaborator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One status-effect variant. Mirrors spec §3's enumeration exactly; Oath
/// variants carry no duration (permanent, read at attack time per §4.3).
///
/// Ordered (`PartialOrd`/`Ord`, by declaration order) so [`StatusEffects`]
/// can key its map on a `BTreeMap` rather than a `HashMap` — a per-process
/// randomized iteration order would make the tick event stream (and thus
/// which `Dead` a multi-DoT tick reports first) run-to-run nondeterministic
/// (spec §5/§8 determinism).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Poison,
    Burning,
    Slowed,
    Paralysis,
    Blinded,
    Focused,
    Invisibility,
    Heroism,
    Weakness,
    Protection,
    Engulfed,
    WardAgainstDrain,
    RallyBuff,
    CripplingHex,
    DissonantChant,
    Regeneration,
    OathOfEmbers,
    OathOfVenom,
    OathOfChains,
}

impl EffectKind {
    /// Flag checked by movement/retaliation/action gates (spec §4.3, §4.4, glossary "Incapacitated").
    pub fn incapacitates(self) -> bool {
        matches!(self, EffectKind::Paralysis)
    }

    /// Oaths are permanent riders, not timed effects.
    pub fn is_oath(self) -> bool {
        matches!(
            self,
            EffectKind::OathOfEmbers | EffectKind::OathOfVenom | EffectKind::OathOfChains
        )
    }
}

/// Remaining duration in turns. Oaths are always `Permanent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Duration {
    Turns(i32),
    Permanent,
}

/// A live status effect instance and its numeric rider parameters. Not every
/// field is meaningful for every kind; unused ones stay at their default.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: EffectKind,
    pub duration: Duration,
    pub damage_per_turn: i32,
    pub heal_per_turn: i32,
    pub to_hit_delta: i32,
    pub ac_delta: i32,
    pub damage_bonus: i32,
    pub proc_chance: f32,
    pub magnitude: f32,
    /// Source entity for effects whose behavior depends on adjacency to the
    /// applier (Engulfed's scoped speed penalty, spec §4.3).
    pub source: Option<crate::entity::EntityId>,
}

impl ActiveEffect {
    pub fn new(kind: EffectKind, duration: Duration) -> Self {
        Self {
            kind,
            duration,
            damage_per_turn: 0,
            heal_per_turn: 0,
            to_hit_delta: 0,
            ac_delta: 0,
            damage_bonus: 0,
            proc_chance: 0.0,
            magnitude: 0.0,
            source: None,
        }
    }
}

/// Outcome of a single effect tick, reported to the caller (turn controller /
/// pipeline) rather than formatted here — this component never touches a
/// message log directly (spec §9: avoid heterogeneous result maps leaking
/// into every layer; keep the tick operation narrow).
#[derive(Debug, Clone, Copy)]
pub enum StatusTickEvent {
    Applied(EffectKind),
    Refreshed(EffectKind),
    Faded(EffectKind),
    DamageOverTime(EffectKind, i32),
    HealOverTime(EffectKind, i32),
}

/// Per-entity collection of active status effects. At most one [`ActiveEffect`]
/// per [`EffectKind`] (spec §8 invariant).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusEffects {
    effects: BTreeMap<EffectKind, ActiveEffect>,
}

impl StatusEffects {
    pub fn has(&self, kind: EffectKind) -> bool {
        self.effects.contains_key(&kind)
    }

    pub fn get(&self, kind: EffectKind) -> Option<&ActiveEffect> {
        self.effects.get(&kind)
    }

    pub fn get_mut(&mut self, kind: EffectKind) -> Option<&mut ActiveEffect> {
        self.effects.get_mut(&kind)
    }

    pub fn is_incapacitated(&self) -> bool {
        self.effects.keys().any(|k| k.incapacitates())
    }

    /// Non-stacking, refresh-on-reapply (spec §4.3/§8), except
    /// Oath-of-Venom, which extends an existing Poison's duration instead of
    /// being inserted itself (Oaths are permanent and never stored as a
    /// timed Poison entry).
    pub fn add(&mut self, effect: ActiveEffect) -> StatusTickEvent {
        if effect.kind == EffectKind::OathOfVenom {
            if let Some(poison) = self.effects.get_mut(&EffectKind::Poison) {
                if let (Duration::Turns(current), Duration::Turns(extra)) =
                    (poison.duration, effect.duration)
                {
                    poison.duration = Duration::Turns(current + extra);
                }
                return StatusTickEvent::Refreshed(EffectKind::Poison);
            }
        }

        let kind = effect.kind;
        let existed = self.effects.insert(kind, effect).is_some();
        if existed {
            StatusTickEvent::Refreshed(kind)
        } else {
            StatusTickEvent::Applied(kind)
        }
    }

    pub fn remove(&mut self, kind: EffectKind) -> bool {
        self.effects.remove(&kind).is_some()
    }

    /// Heal-over-time first (spec §4.3 ordering).
    pub fn process_turn_start(&mut self) -> Vec<StatusTickEvent> {
        let mut events = Vec::new();
        for effect in self.effects.values() {
            if effect.heal_per_turn > 0 {
                events.push(StatusTickEvent::HealOverTime(effect.kind, effect.heal_per_turn));
            }
        }
        events
    }

    /// Damage-over-time, then duration decrement, then drop expired (spec §4.3).
    pub fn process_turn_end(&mut self) -> Vec<StatusTickEvent> {
        let mut events = Vec::new();
        for effect in self.effects.values() {
            if effect.damage_per_turn > 0 {
                events.push(StatusTickEvent::DamageOverTime(effect.kind, effect.damage_per_turn));
            }
        }

        let mut expired = Vec::new();
        for effect in self.effects.values_mut() {
            if let Duration::Turns(turns) = effect.duration {
                let remaining = turns - 1;
                effect.duration = Duration::Turns(remaining);
                if remaining <= 0 {
                    expired.push(effect.kind);
                }
            }
        }
        for kind in expired {
            self.effects.remove(&kind);
            events.push(StatusTickEvent::Faded(kind));
        }
        events
    }

    pub fn kinds(&self) -> impl Iterator<Item = EffectKind> + '_ {
        self.effects.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reapplying_refreshes_without_stacking_riders() {
        let mut mgr = StatusEffects::default();
        let mut first = ActiveEffect::new(EffectKind::Poison, Duration::Turns(3));
        first.damage_per_turn = 2;
        mgr.add(first);

        let mut second = ActiveEffect::new(EffectKind::Poison, Duration::Turns(5));
        second.damage_per_turn = 2;
        let event = mgr.add(second);

        assert!(matches!(event, StatusTickEvent::Refreshed(EffectKind::Poison)));
        assert_eq!(mgr.get(EffectKind::Poison).unwrap().duration, Duration::Turns(5));
    }

    #[test]
    fn oath_of_venom_extends_existing_poison_instead_of_replacing() {
        let mut mgr = StatusEffects::default();
        mgr.add(ActiveEffect::new(EffectKind::Poison, Duration::Turns(3)));
        mgr.add(ActiveEffect::new(EffectKind::OathOfVenom, Duration::Turns(2)));

        assert_eq!(mgr.get(EffectKind::Poison).unwrap().duration, Duration::Turns(5));
        assert!(!mgr.has(EffectKind::OathOfVenom));
    }

    #[test]
    fn process_turn_end_expires_effects_at_zero_duration() {
        let mut mgr = StatusEffects::default();
        mgr.add(ActiveEffect::new(EffectKind::Slowed, Duration::Turns(1)));
        let events = mgr.process_turn_end();
        assert!(events
            .iter()
            .any(|e| matches!(e, StatusTickEvent::Faded(EffectKind::Slowed))));
        assert!(!mgr.has(EffectKind::Slowed));
    }

    #[test]
    fn paralysis_is_incapacitating() {
        let mut mgr = StatusEffects::default();
        mgr.add(ActiveEffect::new(EffectKind::Paralysis, Duration::Turns(1)));
        assert!(mgr.is_incapacitated());
    }
}
