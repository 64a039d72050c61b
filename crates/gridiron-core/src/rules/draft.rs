// Draft round configuration: auction, keeper, and snake rounds.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftRulesError {
    #[error("invalid round {round}: snake pick order starts at round {snake_start_round}")]
    InvalidRound { round: u32, snake_start_round: u32 },
}

/// How picks are made in a given round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundType {
    Auction,
    Keeper,
    Snake,
}

impl fmt::Display for RoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RoundType::Auction => "AUCTION",
            RoundType::Keeper => "KEEPER",
            RoundType::Snake => "SNAKE",
        })
    }
}

/// Draft stage used for strategic guidance. Snake rounds are split into
/// early, middle, and late bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    Auction,
    Keeper,
    EarlySnake,
    MidSnake,
    LateSnake,
}

impl RoundPhase {
    pub fn label(&self) -> &'static str {
        match self {
            RoundPhase::Auction => "auction",
            RoundPhase::Keeper => "keeper",
            RoundPhase::EarlySnake => "early_snake",
            RoundPhase::MidSnake => "mid_snake",
            RoundPhase::LateSnake => "late_snake",
        }
    }
}

/// Last round counted as early snake.
const EARLY_SNAKE_LAST_ROUND: u32 = 6;
/// Last round counted as mid snake.
const MID_SNAKE_LAST_ROUND: u32 = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftRules {
    pub auction_rounds: Vec<u32>,
    pub keeper_round: Option<u32>,
    pub snake_start_round: u32,
    pub total_rounds: u32,
}

impl Default for DraftRules {
    fn default() -> Self {
        DraftRules {
            auction_rounds: vec![1, 2, 3],
            keeper_round: Some(4),
            snake_start_round: 5,
            total_rounds: 20,
        }
    }
}

impl DraftRules {
    /// Round type by static configuration. Rounds not covered by any range
    /// are snake rounds.
    pub fn round_type(&self, round: u32) -> RoundType {
        if self.auction_rounds.contains(&round) {
            RoundType::Auction
        } else if self.keeper_round == Some(round) {
            RoundType::Keeper
        } else {
            RoundType::Snake
        }
    }

    pub fn is_auction_round(&self, round: u32) -> bool {
        self.round_type(round) == RoundType::Auction
    }

    pub fn is_keeper_round(&self, round: u32) -> bool {
        self.round_type(round) == RoundType::Keeper
    }

    pub fn is_snake_round(&self, round: u32) -> bool {
        self.round_type(round) == RoundType::Snake
    }

    pub fn round_phase(&self, round: u32) -> RoundPhase {
        match self.round_type(round) {
            RoundType::Auction => RoundPhase::Auction,
            RoundType::Keeper => RoundPhase::Keeper,
            RoundType::Snake if round <= EARLY_SNAKE_LAST_ROUND => RoundPhase::EarlySnake,
            RoundType::Snake if round <= MID_SNAKE_LAST_ROUND => RoundPhase::MidSnake,
            RoundType::Snake => RoundPhase::LateSnake,
        }
    }

    /// Zero-based team order for a snake round.
    ///
    /// Snake round index is `round - snake_start_round + 1`. Odd indices run
    /// 0..N-1, even indices run N-1..0. Rounds before the snake start, or not
    /// configured as snake, are rejected.
    pub fn snake_pick_order(&self, round: u32, total_teams: usize) -> Result<Vec<usize>, DraftRulesError> {
        if round < self.snake_start_round || !self.is_snake_round(round) {
            return Err(DraftRulesError::InvalidRound {
                round,
                snake_start_round: self.snake_start_round,
            });
        }
        let snake_index = round - self.snake_start_round + 1;
        let order: Vec<usize> = if snake_index % 2 == 1 {
            (0..total_teams).collect()
        } else {
            (0..total_teams).rev().collect()
        };
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_types_by_default_ranges() {
        let rules = DraftRules::default();
        assert_eq!(rules.round_type(1), RoundType::Auction);
        assert_eq!(rules.round_type(3), RoundType::Auction);
        assert_eq!(rules.round_type(4), RoundType::Keeper);
        assert_eq!(rules.round_type(5), RoundType::Snake);
        assert_eq!(rules.round_type(25), RoundType::Snake);
    }

    #[test]
    fn undefined_gap_defaults_to_snake() {
        let rules = DraftRules {
            auction_rounds: vec![1],
            keeper_round: None,
            snake_start_round: 5,
            total_rounds: 16,
        };
        assert_eq!(rules.round_type(3), RoundType::Snake);
    }

    #[test]
    fn snake_order_alternates() {
        let rules = DraftRules::default();
        assert_eq!(rules.snake_pick_order(5, 4).unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(rules.snake_pick_order(6, 4).unwrap(), vec![3, 2, 1, 0]);
        assert_eq!(rules.snake_pick_order(7, 4).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn snake_order_rejects_non_snake_round() {
        let rules = DraftRules::default();
        assert_eq!(
            rules.snake_pick_order(2, 10),
            Err(DraftRulesError::InvalidRound { round: 2, snake_start_round: 5 })
        );
        assert!(rules.snake_pick_order(4, 10).is_err());
    }

    #[test]
    fn phases_split_snake_rounds() {
        let rules = DraftRules::default();
        assert_eq!(rules.round_phase(2), RoundPhase::Auction);
        assert_eq!(rules.round_phase(4), RoundPhase::Keeper);
        assert_eq!(rules.round_phase(6), RoundPhase::EarlySnake);
        assert_eq!(rules.round_phase(9), RoundPhase::MidSnake);
        assert_eq!(rules.round_phase(13).label(), "late_snake");
    }
}
