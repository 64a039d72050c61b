// Draft strategies and their scoring rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::guidance::Urgency;
use super::RecommendError;
use crate::draft::player::{Player, Position};
use crate::valuation::ScarcityLevel;

/// Spread between a player's best source score and their average that marks
/// an upside swing.
const UPSIDE_SPREAD: f64 = 4.0;

/// Spread between best and worst source scores that makes a player too
/// volatile for a safe pick.
const VOLATILE_SPREAD: f64 = 10.0;

/// Rounds in which upside still means elite talent rather than sleepers.
const EARLY_UPSIDE_ROUNDS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Balanced,
    BestAvailable,
    Upside,
    Safe,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Balanced,
        Strategy::BestAvailable,
        Strategy::Upside,
        Strategy::Safe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Balanced => "balanced",
            Strategy::BestAvailable => "best_available",
            Strategy::Upside => "upside",
            Strategy::Safe => "safe",
        }
    }

    /// How much of the roster-urgency factor this strategy keeps.
    /// Best-available ignores roster need entirely.
    pub fn need_weight(&self) -> f64 {
        match self {
            Strategy::Balanced => 1.0,
            Strategy::Upside | Strategy::Safe => 0.5,
            Strategy::BestAvailable => 0.0,
        }
    }

    /// Strategy multiplier for one candidate. `tier_rank` is 1-based.
    pub fn multiplier(&self, ctx: &StrategyContext<'_>) -> f64 {
        let tier = ctx.tier_rank;
        match self {
            Strategy::BestAvailable => {
                if tier <= 2 {
                    1.8
                } else if tier <= 3 {
                    1.4
                } else {
                    1.0
                }
            }
            Strategy::Balanced => match ctx.urgency {
                Urgency::Critical => 1.6,
                Urgency::High if tier <= 3 => 1.4,
                _ if tier <= 2 => 1.3,
                Urgency::High | Urgency::Medium => 1.1,
                Urgency::Low => 1.0,
            },
            Strategy::Upside => {
                if ctx.round <= EARLY_UPSIDE_ROUNDS {
                    if tier <= 2 {
                        1.5
                    } else if ctx.scarcity == ScarcityLevel::High && tier <= 3 {
                        1.3
                    } else {
                        1.0
                    }
                } else if ceiling_spread(ctx.player) >= UPSIDE_SPREAD {
                    1.4
                } else if ctx.scarcity == ScarcityLevel::High {
                    1.2
                } else {
                    1.0
                }
            }
            Strategy::Safe => {
                let mut m = if tier <= 3 && ctx.scarcity != ScarcityLevel::High {
                    1.4
                } else if matches!(ctx.player.position, Position::RunningBack | Position::WideReceiver)
                    && tier <= 4
                {
                    1.2
                } else if ctx.player.position.is_late_round_position() {
                    0.7
                } else {
                    1.0
                };
                if ctx.player.is_injured() {
                    m *= 0.8;
                }
                if score_spread(ctx.player) > VOLATILE_SPREAD {
                    m *= 0.9;
                }
                m
            }
        }
    }

    /// One line explaining the pick in this strategy's terms.
    pub fn reasoning(&self, urgency: Urgency, round: u32) -> &'static str {
        match self {
            Strategy::BestAvailable => "Best available player regardless of position needs",
            Strategy::Balanced => match urgency {
                Urgency::Critical | Urgency::High => "Perfect balance of value and roster need",
                _ => "Balanced value pick that keeps roster needs in view",
            },
            Strategy::Upside if round <= EARLY_UPSIDE_ROUNDS => {
                "High-ceiling player with league-winning potential"
            }
            Strategy::Upside => "Upside play - ceiling well above current ranking",
            Strategy::Safe => "Reliable, consistent production with a high floor and low bust risk",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = RecommendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Strategy::ALL
            .into_iter()
            .find(|st| st.as_str() == wanted)
            .ok_or_else(|| RecommendError::InvalidStrategy { given: s.to_string() })
    }
}

/// Inputs a strategy looks at for one candidate.
#[derive(Debug, Clone, Copy)]
pub struct StrategyContext<'a> {
    pub player: &'a Player,
    pub tier_rank: usize,
    pub urgency: Urgency,
    pub scarcity: ScarcityLevel,
    pub round: u32,
}

fn ceiling_spread(player: &Player) -> f64 {
    match (player.ceiling_score(), player.average_score()) {
        (Some(ceiling), Some(avg)) => ceiling - avg,
        _ => 0.0,
    }
}

fn score_spread(player: &Player) -> f64 {
    match (player.ceiling_score(), player.floor_score()) {
        (Some(ceiling), Some(floor)) => ceiling - floor,
        _ => 0.0,
    }
}
