//! Typed configuration value (spec §6): tier thresholds, stat-label bucket
//! boundaries, range-band table, and difficulty settings, loadable from an
//! external RON/JSON file the way the teacher's `GameSettings` is
//! (`settings.rs`'s `ron::from_str` pattern).

use serde::{Deserialize, Serialize};

use crate::geometry::{OPTIMAL_MAX, RANGED_KNOCKBACK_CHANCE};
use crate::knowledge::{
    ACCURACY_BUCKETS, DAMAGE_BUCKETS, DURABILITY_BUCKETS, SPEED_BUCKETS, EVASION_BUCKETS,
    TIER_1_SEEN_COUNT, TIER_2_ENGAGED_COUNT, TIER_3_KILLED_COUNT,
};

/// Difficulty/tuning knobs that are safe to override per scenario without
/// touching the compiled-in doctrine constants (those stay `const` in
/// `geometry.rs`/`knowledge.rs` as the single source of truth; this struct
/// only carries values genuinely meant to be data-driven).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultySettings {
    pub god_mode: bool,
    pub max_path_length: usize,
}

impl Default for DifficultySettings {
    fn default() -> Self {
        Self {
            god_mode: false,
            max_path_length: 64,
        }
    }
}

/// Read-only snapshot of the knowledge-tier thresholds, mirrored here for
/// serialization round-tripping; `knowledge.rs` remains the source of truth
/// for the actual gating logic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KnowledgeThresholds {
    pub tier_1_seen_count: u32,
    pub tier_2_engaged_count: u32,
    pub tier_3_killed_count: u32,
}

impl Default for KnowledgeThresholds {
    fn default() -> Self {
        Self {
            tier_1_seen_count: TIER_1_SEEN_COUNT,
            tier_2_engaged_count: TIER_2_ENGAGED_COUNT,
            tier_3_killed_count: TIER_3_KILLED_COUNT,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RangedCombatConstants {
    pub optimal_max: i32,
    pub ranged_knockback_chance: f32,
}

impl Default for RangedCombatConstants {
    fn default() -> Self {
        Self {
            optimal_max: OPTIMAL_MAX,
            ranged_knockback_chance: RANGED_KNOCKBACK_CHANCE,
        }
    }
}

/// Numeric bucket boundaries behind the monster-knowledge stat labels
/// (spec §4.10). Stored as ascending `(max_inclusive, label)` pairs per
/// stat; the last entry's `max_inclusive` is never consulted since the
/// lookup falls through to it as the final bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatLabelBuckets {
    pub durability: Vec<(i32, String)>,
    pub damage: Vec<(i32, String)>,
    pub speed: Vec<(f32, String)>,
    pub accuracy: Vec<(i32, String)>,
    pub evasion: Vec<(i32, String)>,
}

impl Default for StatLabelBuckets {
    fn default() -> Self {
        Self {
            durability: DURABILITY_BUCKETS
                .iter()
                .map(|(max, label)| (*max, label.to_string()))
                .collect(),
            damage: DAMAGE_BUCKETS.iter().map(|(max, label)| (*max, label.to_string())).collect(),
            speed: SPEED_BUCKETS.iter().map(|(max, label)| (*max, label.to_string())).collect(),
            accuracy: ACCURACY_BUCKETS
                .iter()
                .map(|(max, label)| (*max, label.to_string()))
                .collect(),
            evasion: EVASION_BUCKETS.iter().map(|(max, label)| (*max, label.to_string())).collect(),
        }
    }
}

/// The full loaded configuration value (spec §6: "the core exposes the
/// constants as a typed configuration value").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConfig {
    pub difficulty: DifficultySettings,
    pub knowledge_thresholds: KnowledgeThresholds,
    pub ranged_combat: RangedCombatConstants,
    pub stat_label_buckets: StatLabelBuckets,
}

impl GameConfig {
    /// Load from a RON string, falling back to defaults on any field the
    /// document omits (`serde(default)` semantics throughout).
    pub fn from_ron_str(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }

    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }
}
