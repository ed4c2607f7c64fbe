//! Range and geometry: Chebyshev distance, adjacency, and the ranged
//! range-band table. Single source of truth for the band boundaries.

use serde::{Deserialize, Serialize};

/// Maximum distance for full ranged damage. Promoted to a named constant
/// rather than inlined in the band table below, and overridable via the
/// loaded config.
pub const OPTIMAL_MAX: i32 = 6;

/// Chance, per successful ranged hit, of a 1-tile knockback proc.
pub const RANGED_KNOCKBACK_CHANCE: f32 = 0.10;

pub fn chebyshev_distance(x1: i32, y1: i32, x2: i32, y2: i32) -> i32 {
    (x1 - x2).abs().max((y1 - y2).abs())
}

pub fn euclidean_distance(x1: i32, y1: i32, x2: i32, y2: i32) -> f32 {
    let dx = (x1 - x2) as f32;
    let dy = (y1 - y2) as f32;
    (dx * dx + dy * dy).sqrt()
}

/// Adjacency for the interaction dispatcher: diagonals count.
pub fn is_adjacent(x1: i32, y1: i32, x2: i32, y2: i32) -> bool {
    euclidean_distance(x1, y1, x2, y2) <= 1.5
}

/// Named range band, spanning the full distance table below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeBand {
    AdjacentThreatened,
    Close,
    Optimal,
    Far,
    Extreme,
    Denied,
}

/// Multiplier and retaliation flag for a [`RangeBand`]. `None` multiplier
/// means the band is [`RangeBand::Denied`] — no hit roll is ever attempted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeBandEntry {
    pub band: RangeBand,
    pub multiplier: Option<f32>,
    pub retaliation: bool,
}

/// Look up the range band for a Chebyshev distance. The table is keyed off
/// [`OPTIMAL_MAX`] exactly as the Python doctrine describes it: 3..=OPTIMAL_MAX
/// is optimal, OPTIMAL_MAX+1 is far, OPTIMAL_MAX+2 is extreme, beyond that
/// denied.
pub fn range_band(distance: i32) -> RangeBandEntry {
    match distance {
        1 => RangeBandEntry {
            band: RangeBand::AdjacentThreatened,
            multiplier: Some(0.25),
            retaliation: true,
        },
        2 => RangeBandEntry {
            band: RangeBand::Close,
            multiplier: Some(0.50),
            retaliation: false,
        },
        d if d >= 3 && d <= OPTIMAL_MAX => RangeBandEntry {
            band: RangeBand::Optimal,
            multiplier: Some(1.00),
            retaliation: false,
        },
        d if d == OPTIMAL_MAX + 1 => RangeBandEntry {
            band: RangeBand::Far,
            multiplier: Some(0.50),
            retaliation: false,
        },
        d if d == OPTIMAL_MAX + 2 => RangeBandEntry {
            band: RangeBand::Extreme,
            multiplier: Some(0.25),
            retaliation: false,
        },
        _ => RangeBandEntry {
            band: RangeBand::Denied,
            multiplier: None,
            retaliation: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chebyshev_matches_max_of_axis_deltas() {
        assert_eq!(chebyshev_distance(0, 0, 3, 4), 4);
        assert_eq!(chebyshev_distance(0, 0, -2, 1), 2);
    }

    #[test]
    fn range_band_table_matches_doctrine() {
        assert_eq!(range_band(1).band, RangeBand::AdjacentThreatened);
        assert!(range_band(1).retaliation);
        assert_eq!(range_band(2).band, RangeBand::Close);
        assert_eq!(range_band(3).band, RangeBand::Optimal);
        assert_eq!(range_band(6).band, RangeBand::Optimal);
        assert_eq!(range_band(7).band, RangeBand::Far);
        assert_eq!(range_band(8).band, RangeBand::Extreme);
        assert_eq!(range_band(9).band, RangeBand::Denied);
        assert_eq!(range_band(9).multiplier, None);
        assert_eq!(range_band(100).band, RangeBand::Denied);
    }

    #[test]
    fn adjacency_counts_diagonals() {
        assert!(is_adjacent(5, 5, 6, 6));
        assert!(!is_adjacent(5, 5, 7, 7));
    }
}
