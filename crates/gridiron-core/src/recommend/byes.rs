// Bye-week conflict detection for a candidate against a roster.

use serde::Serialize;

use crate::draft::player::{Player, Position};
use crate::draft::team::Team;
use crate::rules::RosterRules;

/// Players sharing one bye week (candidate included) that count as a
/// concentration.
const CONCENTRATION_THRESHOLD: usize = 3;
/// Penalty per player beyond two sharing a week.
const CONCENTRATION_STEP: f64 = 0.1;
/// Floor for any bye-week penalty.
const MIN_PENALTY: f64 = 0.5;
/// Small reward for a candidate that spreads bye weeks out.
const DIVERSITY_BONUS: f64 = 1.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConflictSeverity {
    None,
    Low,
    Medium,
    High,
}

impl ConflictSeverity {
    pub fn from_penalty(penalty: f64) -> Self {
        if penalty <= 0.6 {
            ConflictSeverity::High
        } else if penalty <= 0.8 {
            ConflictSeverity::Medium
        } else if penalty < 1.0 {
            ConflictSeverity::Low
        } else {
            ConflictSeverity::None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ByeWeekAnalysis {
    pub bye_week: u8,
    /// Score factor: below 1.0 for conflicts, slightly above for diversity.
    pub penalty: f64,
    pub severity: ConflictSeverity,
    pub conflicts: Vec<String>,
    pub helps_bye_diversity: bool,
}

impl ByeWeekAnalysis {
    fn neutral(bye_week: u8) -> Self {
        ByeWeekAnalysis {
            bye_week,
            penalty: 1.0,
            severity: ConflictSeverity::None,
            conflicts: Vec::new(),
            helps_bye_diversity: false,
        }
    }

    /// Conflicts serious enough to push the candidate behind comparable
    /// alternatives.
    pub fn is_severe(&self) -> bool {
        matches!(self.severity, ConflictSeverity::Medium | ConflictSeverity::High)
    }
}

/// Check how adding `candidate` affects the roster's bye-week coverage.
pub fn assess_bye_week(rules: &RosterRules, team: &Team, candidate: &Player) -> ByeWeekAnalysis {
    let week = candidate.bye_week;
    if week == 0 {
        return ByeWeekAnalysis::neutral(week);
    }

    let pos = candidate.position;
    let on_bye = |p: Position| team.players_at(p).filter(|x| x.bye_week == week).count();
    let same_position_on_bye = on_bye(pos);
    let current_at_position = team.count_at(pos);
    let min_needed = rules.required(pos).max(1);

    let mut analysis = ByeWeekAnalysis::neutral(week);

    if same_position_on_bye > 0 {
        if matches!(pos, Position::RunningBack | Position::WideReceiver) {
            // RB and WR share the FLEX slot, so they are judged together.
            let skill_on_bye = on_bye(Position::RunningBack) + on_bye(Position::WideReceiver) + 1;
            let skill_total =
                team.count_at(Position::RunningBack) + team.count_at(Position::WideReceiver) + 1;
            if skill_on_bye + 2 >= skill_total {
                analysis.penalty = 0.7;
                analysis.conflicts.push(format!("FLEX conflict on bye week {week}"));
            } else if skill_on_bye + 3 >= skill_total {
                analysis.penalty = 0.85;
                analysis.conflicts.push(format!("Potential FLEX issue on bye week {week}"));
            }
        } else {
            let on_bye_after = same_position_on_bye + 1;
            if on_bye_after >= current_at_position + 1 {
                analysis.penalty = 0.5;
                analysis
                    .conflicts
                    .push(format!("Complete {pos} bye week conflict on week {week}"));
            } else if on_bye_after >= min_needed {
                analysis.penalty = 0.75;
                analysis
                    .conflicts
                    .push(format!("{pos} starter conflict on bye week {week}"));
            }
        }
    }

    let sharing = team.roster.iter().filter(|p| p.bye_week == week).count() + 1;
    if sharing >= CONCENTRATION_THRESHOLD {
        let concentration = (1.0 - CONCENTRATION_STEP * (sharing - 2) as f64).max(MIN_PENALTY);
        analysis.penalty = analysis.penalty.min(concentration);
        analysis
            .conflicts
            .push(format!("{sharing} rostered players would share bye week {week}"));
    }

    if analysis.conflicts.is_empty() && same_position_on_bye == 0 && current_at_position < min_needed * 2 {
        analysis.penalty = DIVERSITY_BONUS;
        analysis.helps_bye_diversity = true;
    }

    analysis.severity = ConflictSeverity::from_penalty(analysis.penalty);
    analysis
}

/// Bye weeks on which two or more rostered players sit out.
pub fn problematic_weeks(team: &Team) -> Vec<u8> {
    let mut counts = std::collections::BTreeMap::<u8, usize>::new();
    for p in team.roster.iter().filter(|p| p.bye_week > 0) {
        *counts.entry(p.bye_week).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, n)| *n >= 2)
        .map(|(week, _)| week)
        .collect()
}
