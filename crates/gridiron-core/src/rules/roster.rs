// Roster composition rules: starter requirements, slot limits, FLEX.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::draft::player::{Player, Position, DRAFTABLE_POSITIONS};
use crate::draft::team::Team;

/// Extra flex-eligible bodies recommended beyond the starting requirement.
const FLEX_DEPTH_CUSHION: usize = 2;

/// Round before which drafting an already-filled position draws a warning.
const EARLY_ROUND_CUTOFF: u32 = 8;

/// Rounds in which leaving other starter needs open draws a warning.
const PRIORITY_ROUND_CUTOFF: u32 = 3;

/// Static league roster configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterRules {
    /// Starters required per lineup slot, including FLEX.
    pub starters: BTreeMap<Position, usize>,
    /// Maximum players rostered per position.
    pub limits: BTreeMap<Position, usize>,
    /// Positions that may fill the FLEX slot.
    pub flex_positions: Vec<Position>,
    pub bench_slots: usize,
    pub ir_slots: usize,
}

impl Default for RosterRules {
    fn default() -> Self {
        let starters = BTreeMap::from([
            (Position::Quarterback, 1),
            (Position::RunningBack, 2),
            (Position::WideReceiver, 2),
            (Position::TightEnd, 1),
            (Position::Flex, 1),
            (Position::Kicker, 1),
            (Position::Defense, 1),
        ]);
        let limits = BTreeMap::from([
            (Position::Quarterback, 4),
            (Position::RunningBack, 8),
            (Position::WideReceiver, 8),
            (Position::TightEnd, 4),
            (Position::Kicker, 3),
            (Position::Defense, 3),
        ]);
        RosterRules {
            starters,
            limits,
            flex_positions: vec![Position::RunningBack, Position::WideReceiver, Position::TightEnd],
            bench_slots: 7,
            ir_slots: 2,
        }
    }
}

/// FLEX-eligible surplus on a roster.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlexEligibility {
    pub rb_options: usize,
    pub wr_options: usize,
    pub te_options: usize,
    /// Best-scoring player among the surplus, if any.
    pub best_flex_option: Option<Player>,
}

impl FlexEligibility {
    pub fn total(&self) -> usize {
        self.rb_options + self.wr_options + self.te_options
    }
}

/// Open starter needs for one team.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PositionNeeds {
    /// Position -> unfilled starter slots (never negative). FLEX counts only
    /// surplus RB/WR/TE as filling it.
    pub deficits: BTreeMap<Position, usize>,
    /// Additional flex-eligible depth recommended for byes and injuries.
    pub flex_depth: usize,
}

impl PositionNeeds {
    pub fn deficit(&self, position: Position) -> usize {
        self.deficits.get(&position).copied().unwrap_or(0)
    }
}

/// Outcome of checking a prospective pick against the rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PickValidation {
    pub is_valid: bool,
    pub violations: Vec<String>,
    pub warnings: Vec<String>,
}

impl RosterRules {
    pub fn required(&self, position: Position) -> usize {
        self.starters.get(&position).copied().unwrap_or(0)
    }

    pub fn limit(&self, position: Position) -> Option<usize> {
        self.limits.get(&position).copied()
    }

    pub fn is_flex_eligible(&self, position: Position) -> bool {
        self.flex_positions.contains(&position)
    }

    /// Starters plus bench, excluding IR.
    pub fn max_roster_size(&self) -> usize {
        self.starters.values().sum::<usize>() + self.bench_slots
    }

    /// Count rostered RB/WR/TE beyond each position's own starter requirement.
    pub fn flex_eligibility(&self, team: &Team) -> FlexEligibility {
        let surplus = |pos: Position| {
            if self.is_flex_eligible(pos) {
                team.count_at(pos).saturating_sub(self.required(pos))
            } else {
                0
            }
        };

        // The surplus players at a position are those beyond the best
        // `required` ones, ranked by score with unscored players last.
        let mut surplus_players: Vec<&Player> = Vec::new();
        for pos in &self.flex_positions {
            let mut at_pos: Vec<&Player> = team.players_at(*pos).collect();
            sort_by_score_desc(&mut at_pos);
            surplus_players.extend(at_pos.into_iter().skip(self.required(*pos)));
        }
        sort_by_score_desc(&mut surplus_players);

        FlexEligibility {
            rb_options: surplus(Position::RunningBack),
            wr_options: surplus(Position::WideReceiver),
            te_options: surplus(Position::TightEnd),
            best_flex_option: surplus_players.first().map(|p| (*p).clone()),
        }
    }

    /// Unfilled starter slots per position.
    pub fn position_needs(&self, team: &Team, consider_flex_depth: bool) -> PositionNeeds {
        let mut deficits = BTreeMap::new();
        for (&pos, &required) in &self.starters {
            if pos == Position::Flex {
                continue;
            }
            deficits.insert(pos, required.saturating_sub(team.count_at(pos)));
        }

        let flex_options = self.flex_eligibility(team).total();
        let flex_required = self.required(Position::Flex);
        if flex_required > 0 {
            deficits.insert(Position::Flex, flex_required.saturating_sub(flex_options));
        }

        let flex_depth = if consider_flex_depth {
            (flex_required + FLEX_DEPTH_CUSHION).saturating_sub(flex_options)
        } else {
            0
        };

        PositionNeeds { deficits, flex_depth }
    }

    /// Open roster slots per position: limit minus current count, floor 0.
    pub fn remaining_slots(&self, team: &Team) -> BTreeMap<Position, usize> {
        self.limits
            .iter()
            .map(|(&pos, &limit)| (pos, limit.saturating_sub(team.count_at(pos))))
            .collect()
    }

    pub fn is_at_position_limit(&self, team: &Team, position: Position) -> bool {
        self.limit(position)
            .is_some_and(|limit| team.count_at(position) >= limit)
    }

    /// Adding one more player at `position` would exceed its slot maximum.
    pub fn would_exceed_limit(&self, team: &Team, position: Position) -> bool {
        self.is_at_position_limit(team, position)
    }

    /// Check a prospective pick. Exceeding a slot maximum is invalid;
    /// drafting a filled position while starters elsewhere are open is a
    /// warning only.
    pub fn validate_draft_pick(&self, team: &Team, player: &Player, round: u32) -> PickValidation {
        let mut result = PickValidation {
            is_valid: true,
            ..Default::default()
        };
        let pos = player.position;

        if self.would_exceed_limit(team, pos) {
            result.is_valid = false;
            result
                .violations
                .push(format!("Adding {} would exceed {} limit", player.name, pos));
        }

        let needs = self.position_needs(team, false);
        let fills_flex = self.is_flex_eligible(pos) && needs.deficit(Position::Flex) > 0;
        if needs.deficit(pos) == 0 && !fills_flex && round < EARLY_ROUND_CUTOFF {
            result
                .warnings
                .push(format!("{pos} position may already be adequately filled"));
        }

        if round <= PRIORITY_ROUND_CUTOFF && needs.deficit(pos) == 0 {
            let open: Vec<&str> = DRAFTABLE_POSITIONS
                .iter()
                .filter(|p| needs.deficit(**p) > 0)
                .map(|p| p.display_str())
                .take(2)
                .collect();
            if !open.is_empty() {
                result
                    .warnings
                    .push(format!("Consider addressing {} before {pos}", open.join(", ")));
            }
        }

        result
    }
}

fn sort_by_score_desc(players: &mut [&Player]) {
    players.sort_by(|a, b| {
        let a = a.average_score().unwrap_or(f64::NEG_INFINITY);
        let b = b.average_score().unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team_with(players: &[(&str, Position, Option<f64>)]) -> Team {
        let mut team = Team::new("Gridiron Gang", "Sam", 1);
        for (name, pos, score) in players {
            let mut p = Player::new(*name, *pos, "DAL", 7);
            if let Some(s) = score {
                p = p.with_ranking("espn", 10, *s);
            }
            team.roster.push(p);
        }
        team
    }

    #[test]
    fn empty_roster_needs_every_starter() {
        let rules = RosterRules::default();
        let needs = rules.position_needs(&Team::new("T", "O", 1), true);
        assert_eq!(needs.deficit(Position::RunningBack), 2);
        assert_eq!(needs.deficit(Position::Quarterback), 1);
        assert_eq!(needs.deficit(Position::Flex), 1);
        assert_eq!(needs.flex_depth, 3);
    }

    #[test]
    fn flex_filled_by_surplus_only() {
        let rules = RosterRules::default();
        let team = team_with(&[
            ("RB1", Position::RunningBack, Some(80.0)),
            ("RB2", Position::RunningBack, Some(75.0)),
            ("RB3", Position::RunningBack, Some(60.0)),
            ("WR1", Position::WideReceiver, Some(82.0)),
        ]);
        let needs = rules.position_needs(&team, true);
        assert_eq!(needs.deficit(Position::RunningBack), 0);
        assert_eq!(needs.deficit(Position::WideReceiver), 1);
        assert_eq!(needs.deficit(Position::Flex), 0);
        assert_eq!(needs.flex_depth, 2);
    }

    #[test]
    fn flex_eligibility_counts_surplus_and_best_option() {
        let rules = RosterRules::default();
        let team = team_with(&[
            ("RB1", Position::RunningBack, Some(80.0)),
            ("RB2", Position::RunningBack, Some(75.0)),
            ("RB3", Position::RunningBack, Some(60.0)),
            ("TE1", Position::TightEnd, Some(70.0)),
            ("TE2", Position::TightEnd, Some(65.0)),
            ("WR1", Position::WideReceiver, None),
        ]);
        let flex = rules.flex_eligibility(&team);
        assert_eq!(flex.rb_options, 1);
        assert_eq!(flex.wr_options, 0);
        assert_eq!(flex.te_options, 1);
        assert_eq!(flex.total(), 2);
        assert_eq!(flex.best_flex_option.map(|p| p.name), Some("TE2".to_string()));
    }

    #[test]
    fn flex_eligibility_empty_has_no_best_option() {
        let rules = RosterRules::default();
        let flex = rules.flex_eligibility(&team_with(&[("WR1", Position::WideReceiver, Some(90.0))]));
        assert_eq!(flex.total(), 0);
        assert!(flex.best_flex_option.is_none());
    }

    #[test]
    fn remaining_slots_floor_at_zero() {
        let mut rules = RosterRules::default();
        rules.limits.insert(Position::Kicker, 1);
        let team = team_with(&[("K1", Position::Kicker, None), ("K2", Position::Kicker, None)]);
        let slots = rules.remaining_slots(&team);
        assert_eq!(slots[&Position::Kicker], 0);
        assert_eq!(slots[&Position::Quarterback], 4);
    }

    #[test]
    fn pick_over_limit_is_invalid() {
        let mut rules = RosterRules::default();
        rules.limits.insert(Position::Quarterback, 1);
        let team = team_with(&[("QB1", Position::Quarterback, None)]);
        let qb = Player::new("QB2", Position::Quarterback, "KC", 6);
        let result = rules.validate_draft_pick(&team, &qb, 10);
        assert!(!result.is_valid);
        assert_eq!(result.violations.len(), 1);
    }

    #[test]
    fn early_filled_position_warns() {
        let rules = RosterRules::default();
        let team = team_with(&[("QB1", Position::Quarterback, None)]);
        let qb = Player::new("QB2", Position::Quarterback, "KC", 6);
        let result = rules.validate_draft_pick(&team, &qb, 2);
        assert!(result.is_valid);
        assert!(result.warnings.iter().any(|w| w.contains("adequately filled")));
        assert!(result.warnings.iter().any(|w| w.starts_with("Consider addressing RB, WR")));
    }

    #[test]
    fn needed_position_has_no_warnings() {
        let rules = RosterRules::default();
        let rb = Player::new("RB1", Position::RunningBack, "BAL", 14);
        let result = rules.validate_draft_pick(&Team::new("T", "O", 1), &rb, 1);
        assert!(result.is_valid);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn max_roster_size_counts_starters_and_bench() {
        assert_eq!(RosterRules::default().max_roster_size(), 16);
    }
}
