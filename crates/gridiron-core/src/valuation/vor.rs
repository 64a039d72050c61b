// Value over replacement within a position's available pool.

use super::LeagueAnalyzer;
use crate::draft::player::Player;

impl LeagueAnalyzer {
    /// Score above the last starter-quality player at the same position.
    ///
    /// Replacement is the player at index `starters * num_teams` of the
    /// position's score-sorted pool, capped at the last player. An unscored
    /// player has VOR 0; an empty pool leaves the player's own score.
    pub fn value_over_replacement(&self, player: &Player, available: &[Player]) -> f64 {
        let Some(score) = player.average_score() else {
            return 0.0;
        };

        let mut pool: Vec<f64> = available
            .iter()
            .filter(|p| p.position == player.position)
            .filter_map(Player::average_score)
            .collect();
        if pool.is_empty() {
            return score;
        }
        pool.sort_by(|a, b| b.total_cmp(a));

        let starters_needed = self.rules.required(player.position) * self.num_teams;
        let replacement_index = starters_needed.min(pool.len() - 1);
        score - pool[replacement_index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::player::Position;
    use crate::rules::RosterRules;
    use crate::valuation::AnalysisTuning;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn te(name: &str, score: f64) -> Player {
        Player::new(name, Position::TightEnd, "KC", 6).with_ranking("espn", 1, score)
    }

    #[test]
    fn replacement_is_last_starter() {
        // 2 teams * 1 TE -> replacement index 2
        let analyzer = LeagueAnalyzer::new(RosterRules::default(), 2, AnalysisTuning::default());
        let pool = vec![te("A", 80.0), te("B", 75.0), te("C", 60.0), te("D", 50.0)];
        assert!(approx_eq(analyzer.value_over_replacement(&pool[0], &pool), 20.0, 1e-9));
    }

    #[test]
    fn replacement_capped_at_pool_end() {
        let analyzer = LeagueAnalyzer::new(RosterRules::default(), 10, AnalysisTuning::default());
        let pool = vec![te("A", 80.0), te("B", 71.5)];
        assert!(approx_eq(analyzer.value_over_replacement(&pool[0], &pool), 8.5, 1e-9));
    }

    #[test]
    fn degenerate_inputs() {
        let analyzer = LeagueAnalyzer::new(RosterRules::default(), 10, AnalysisTuning::default());
        let unscored = Player::new("X", Position::TightEnd, "KC", 6);
        assert_eq!(analyzer.value_over_replacement(&unscored, &[te("A", 80.0)]), 0.0);
        assert_eq!(analyzer.value_over_replacement(&te("A", 80.0), &[]), 80.0);
    }
}
