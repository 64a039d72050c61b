// Per-position roster needs with priority scores.

use serde::Serialize;

use super::LeagueAnalyzer;
use crate::draft::player::Position;
use crate::draft::team::Team;

/// One position's requirement against the current roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterNeed {
    pub position: Position,
    pub needed_count: usize,
    pub current_count: usize,
    pub priority_score: f64,
    /// True for the synthetic FLEX-depth entry.
    pub flex_depth: bool,
}

impl RosterNeed {
    /// Needed minus current; zero or negative once the need is met.
    pub fn deficit(&self) -> i64 {
        self.needed_count as i64 - self.current_count as i64
    }

    pub fn is_open(&self) -> bool {
        self.deficit() > 0
    }
}

impl LeagueAnalyzer {
    /// Needs for every rules-defined position, highest priority first.
    ///
    /// Priority is the unfilled fraction of the requirement, boosted for
    /// QB/RB/WR and for flex-eligible positions while FLEX options are thin.
    /// A synthetic FLEX entry is appended when flex depth is short.
    pub fn analyze_roster_needs(&self, team: &Team, consider_flex_depth: bool) -> Vec<RosterNeed> {
        let rules = &self.rules;
        let tuning = &self.tuning;
        let flex = rules.flex_eligibility(team);
        let flex_options = flex.total();
        let position_needs = rules.position_needs(team, consider_flex_depth);

        let mut needs: Vec<RosterNeed> = rules
            .starters
            .iter()
            .map(|(&position, &required)| {
                let current = if position == Position::Flex {
                    flex_options
                } else {
                    team.count_at(position)
                };
                let deficit = required.saturating_sub(current);

                let mut priority = 0.0;
                if required > 0 {
                    priority = deficit as f64 / required as f64;
                    if matches!(
                        position,
                        Position::Quarterback | Position::RunningBack | Position::WideReceiver
                    ) {
                        priority *= tuning.key_position_boost;
                    }
                    if rules.is_flex_eligible(position) && flex_options < tuning.flex_shortage_threshold {
                        priority *= tuning.flex_shortage_boost;
                    }
                }

                RosterNeed {
                    position,
                    needed_count: required,
                    current_count: current,
                    priority_score: priority,
                    flex_depth: false,
                }
            })
            .collect();

        if position_needs.flex_depth > 0 {
            needs.push(RosterNeed {
                position: Position::Flex,
                needed_count: position_needs.flex_depth,
                current_count: 0,
                priority_score: tuning.flex_depth_priority,
                flex_depth: true,
            });
        }

        needs.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));
        needs
    }
}
