// Positional scarcity: starter-quality supply against league-wide demand.

use serde::Serialize;

use super::LeagueAnalyzer;
use crate::draft::player::{Player, Position};

/// Scarcity of one position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionScarcity {
    pub position: Position,
    /// Starters the whole league fields at this position.
    pub total_starters_needed: usize,
    /// Available players ranked inside the starter-quality threshold.
    pub quality_players_available: usize,
    /// 0.0 = plenty of supply, 1.0 = none left.
    pub scarcity_score: f64,
}

/// Coarse scarcity bucket for display and strategy rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScarcityLevel {
    High,
    Medium,
    Low,
}

impl ScarcityLevel {
    pub fn from_score(score: f64) -> Self {
        if score > 0.6 {
            ScarcityLevel::High
        } else if score > 0.3 {
            ScarcityLevel::Medium
        } else {
            ScarcityLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScarcityLevel::High => "High",
            ScarcityLevel::Medium => "Medium",
            ScarcityLevel::Low => "Low",
        }
    }
}

impl LeagueAnalyzer {
    /// Scarcity for each starting position, scarcest first.
    ///
    /// K and DST are only assessed in the final rounds of the draft. Quality
    /// supply is the top `starter_threshold_percentile` of each position's
    /// ranked pool; unranked players never count.
    pub fn calculate_position_scarcity(
        &self,
        available: &[Player],
        current_round: u32,
        total_rounds: u32,
    ) -> Vec<PositionScarcity> {
        let late_rounds = current_round + self.tuning.late_round_window >= total_rounds;

        let mut list: Vec<PositionScarcity> = self
            .rules
            .starters
            .iter()
            .filter(|(pos, _)| **pos != Position::Flex)
            .filter(|(pos, _)| late_rounds || !pos.is_late_round_position())
            .map(|(&position, &required)| {
                let ranked = available
                    .iter()
                    .filter(|p| p.position == position && p.average_rank().is_some())
                    .count();
                let quality =
                    (ranked as f64 * self.tuning.starter_threshold_percentile).floor() as usize;
                let total_needed = self.num_teams * required;
                let score = if total_needed > 0 {
                    (1.0 - quality as f64 / total_needed as f64).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                PositionScarcity {
                    position,
                    total_starters_needed: total_needed,
                    quality_players_available: quality,
                    scarcity_score: score,
                }
            })
            .collect();

        list.sort_by(|a, b| b.scarcity_score.total_cmp(&a.scarcity_score));
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RosterRules;
    use crate::valuation::AnalysisTuning;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn pool(position: Position, n: usize) -> Vec<Player> {
        (0..n)
            .map(|i| {
                Player::new(format!("{position}{i}"), position, "DAL", 7)
                    .with_ranking("espn", i as u32 + 1, 90.0 - i as f64)
            })
            .collect()
    }

    fn analyzer(num_teams: usize) -> LeagueAnalyzer {
        LeagueAnalyzer::new(RosterRules::default(), num_teams, AnalysisTuning::default())
    }

    #[test]
    fn quality_is_top_percentile_of_ranked_pool() {
        // 25 RBs ranked -> 20 quality; 10 teams * 2 starters = 20 needed.
        let s = analyzer(10).calculate_position_scarcity(&pool(Position::RunningBack, 25), 5, 20);
        let rb = s.iter().find(|s| s.position == Position::RunningBack).unwrap();
        assert_eq!(rb.quality_players_available, 20);
        assert_eq!(rb.total_starters_needed, 20);
        assert!(approx_eq(rb.scarcity_score, 0.0, 1e-9));
    }

    #[test]
    fn thin_position_is_scarce() {
        // 5 QBs -> 4 quality of 10 needed -> 0.6
        let s = analyzer(10).calculate_position_scarcity(&pool(Position::Quarterback, 5), 5, 20);
        let qb = s.iter().find(|s| s.position == Position::Quarterback).unwrap();
        assert!(approx_eq(qb.scarcity_score, 0.6, 1e-9));
        assert_eq!(ScarcityLevel::from_score(qb.scarcity_score), ScarcityLevel::Medium);
    }

    #[test]
    fn unranked_players_do_not_count() {
        let players = vec![Player::new("No Rank", Position::TightEnd, "KC", 6)];
        let s = analyzer(10).calculate_position_scarcity(&players, 5, 20);
        let te = s.iter().find(|s| s.position == Position::TightEnd).unwrap();
        assert_eq!(te.quality_players_available, 0);
        assert_eq!(te.scarcity_score, 1.0);
    }

    #[test]
    fn kicker_and_defense_only_late() {
        let a = analyzer(10);
        let early = a.calculate_position_scarcity(&[], 10, 20);
        assert!(!early.iter().any(|s| s.position.is_late_round_position()));
        assert!(!early.iter().any(|s| s.position == Position::Flex));
        let late = a.calculate_position_scarcity(&[], 17, 20);
        assert!(late.iter().any(|s| s.position == Position::Kicker));
        assert!(late.iter().any(|s| s.position == Position::Defense));
    }

    #[test]
    fn sorted_by_scarcity_and_clamped() {
        let mut players = pool(Position::RunningBack, 40);
        players.extend(pool(Position::WideReceiver, 10));
        let s = analyzer(10).calculate_position_scarcity(&players, 1, 20);
        for pair in s.windows(2) {
            assert!(pair[0].scarcity_score >= pair[1].scarcity_score);
        }
        for entry in &s {
            assert!((0.0..=1.0).contains(&entry.scarcity_score));
        }
    }

    #[test]
    fn zero_teams_is_not_a_fault() {
        let s = analyzer(0).calculate_position_scarcity(&pool(Position::RunningBack, 3), 1, 20);
        assert!(s.iter().all(|e| e.scarcity_score == 0.0));
    }
}
