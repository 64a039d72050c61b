// Needs, scarcity, tiering, and pick-value analysis for one league.

pub mod needs;
pub mod pick_value;
pub mod scarcity;
pub mod tiers;
pub mod vor;

use serde::{Deserialize, Serialize};

use crate::rules::RosterRules;

pub use needs::RosterNeed;
pub use pick_value::PickValueBreakdown;
pub use scarcity::{PositionScarcity, ScarcityLevel};

/// Heuristic weights used by the analysis. Defaults are the league-tested
/// values; every one can be overridden from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisTuning {
    /// Fraction of a position's ranked pool counted as starter quality.
    pub starter_threshold_percentile: f64,
    /// Score drop that starts a new tier.
    pub tier_gap: f64,
    pub max_tiers: usize,
    /// Need priority boost for QB/RB/WR.
    pub key_position_boost: f64,
    /// Need priority boost for flex-eligible positions while FLEX options
    /// are below `flex_shortage_threshold`.
    pub flex_shortage_boost: f64,
    pub flex_shortage_threshold: usize,
    /// Fixed priority of the synthetic FLEX-depth need.
    pub flex_depth_priority: f64,
    /// K/DST scarcity is only considered this many rounds from the end.
    pub late_round_window: u32,
    /// Value of a pick that breaks a roster limit.
    pub invalid_pick_value: f64,
    /// Multiplier applied when the roster rules raise any warning.
    pub warning_penalty: f64,
    /// Weight of need priority when the pick fills its own position.
    pub direct_need_weight: f64,
    /// Weight of need priority when the pick fills FLEX.
    pub flex_need_weight: f64,
    /// Need multiplier for a flex-eligible pick with no open need.
    pub flex_depth_multiplier: f64,
    /// Need multiplier for a pick at a position with no need.
    pub no_need_multiplier: f64,
    /// Multiplier when at most one roster slot remains at the position.
    pub near_cap_multiplier: f64,
    /// Maximum scarcity boost (score 1.0 -> +this fraction).
    pub scarcity_weight: f64,
    pub flex_bonus: f64,
    /// FLEX bonus applies while total FLEX options are below this.
    pub flex_bonus_threshold: usize,
}

impl Default for AnalysisTuning {
    fn default() -> Self {
        AnalysisTuning {
            starter_threshold_percentile: 0.8,
            tier_gap: 3.0,
            max_tiers: 5,
            key_position_boost: 1.2,
            flex_shortage_boost: 1.1,
            flex_shortage_threshold: 3,
            flex_depth_priority: 0.8,
            late_round_window: 3,
            invalid_pick_value: 0.1,
            warning_penalty: 0.9,
            direct_need_weight: 0.3,
            flex_need_weight: 0.25,
            flex_depth_multiplier: 0.8,
            no_need_multiplier: 0.7,
            near_cap_multiplier: 0.8,
            scarcity_weight: 0.2,
            flex_bonus: 1.05,
            flex_bonus_threshold: 4,
        }
    }
}

/// Analysis bound to one league's rules and size.
#[derive(Debug, Clone)]
pub struct LeagueAnalyzer {
    pub rules: RosterRules,
    pub num_teams: usize,
    pub tuning: AnalysisTuning,
}

impl LeagueAnalyzer {
    pub fn new(rules: RosterRules, num_teams: usize, tuning: AnalysisTuning) -> Self {
        LeagueAnalyzer {
            rules,
            num_teams,
            tuning,
        }
    }
}
