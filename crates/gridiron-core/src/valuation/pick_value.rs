// Combined pick value in [0, 1] for one candidate on one roster.

use serde::Serialize;

use super::LeagueAnalyzer;
use crate::draft::player::{Player, Position};
use crate::draft::team::Team;

/// Every factor that went into a pick value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PickValueBreakdown {
    pub value: f64,
    pub base: f64,
    pub valid: bool,
    pub warning_penalty: f64,
    pub need_multiplier: f64,
    pub scarcity_multiplier: f64,
    pub flex_bonus: f64,
    pub vor: f64,
    pub warnings: Vec<String>,
}

impl LeagueAnalyzer {
    /// Pick value clamped to [0, 1]. A player with no score is worth exactly 0.
    pub fn evaluate_pick_value(
        &self,
        player: &Player,
        team: &Team,
        available: &[Player],
        round: u32,
        total_rounds: u32,
    ) -> f64 {
        self.pick_value_breakdown(player, team, available, round, total_rounds)
            .value
    }

    /// `evaluate_pick_value` with the intermediate factors kept.
    ///
    /// value = base * warning * need * scarcity * flex + VOR/100, where base
    /// is score/100. Picks that break a roster limit collapse to the
    /// configured invalid value before any other factor applies.
    pub fn pick_value_breakdown(
        &self,
        player: &Player,
        team: &Team,
        available: &[Player],
        round: u32,
        total_rounds: u32,
    ) -> PickValueBreakdown {
        let tuning = &self.tuning;
        let rules = &self.rules;

        let Some(score) = player.average_score() else {
            return PickValueBreakdown::default();
        };
        let base = score / 100.0;

        let validation = rules.validate_draft_pick(team, player, round);
        if !validation.is_valid {
            return PickValueBreakdown {
                value: tuning.invalid_pick_value.clamp(0.0, 1.0),
                base,
                valid: false,
                warnings: validation.violations,
                ..Default::default()
            };
        }
        let warning_penalty = if validation.warnings.is_empty() {
            1.0
        } else {
            tuning.warning_penalty
        };

        // Need
        let needs = self.analyze_roster_needs(team, true);
        let direct = needs
            .iter()
            .find(|n| n.position == player.position && !n.flex_depth && n.is_open());
        let mut need_multiplier = match direct {
            Some(need) => 1.0 + need.priority_score * tuning.direct_need_weight,
            None if rules.is_flex_eligible(player.position) => {
                let flex_priority = needs
                    .iter()
                    .filter(|n| n.position == Position::Flex && n.is_open())
                    .map(|n| n.priority_score)
                    .reduce(f64::max);
                match flex_priority {
                    Some(p) => 1.0 + p * tuning.flex_need_weight,
                    None => tuning.flex_depth_multiplier,
                }
            }
            None => tuning.no_need_multiplier,
        };

        let remaining = rules.remaining_slots(team);
        if remaining.get(&player.position).is_some_and(|r| *r <= 1) {
            need_multiplier *= tuning.near_cap_multiplier;
        }

        // Scarcity
        let scarcity_multiplier = self
            .calculate_position_scarcity(available, round, total_rounds)
            .iter()
            .find(|s| s.position == player.position)
            .map(|s| 1.0 + s.scarcity_score * tuning.scarcity_weight)
            .unwrap_or(1.0);

        // FLEX depth
        let flex_bonus = if rules.is_flex_eligible(player.position)
            && rules.flex_eligibility(team).total() < tuning.flex_bonus_threshold
        {
            tuning.flex_bonus
        } else {
            1.0
        };

        let vor = self.value_over_replacement(player, available);
        let raw = base * warning_penalty * need_multiplier * scarcity_multiplier * flex_bonus + vor / 100.0;
        let value = if raw.is_finite() { raw.clamp(0.0, 1.0) } else { 0.0 };

        PickValueBreakdown {
            value,
            base,
            valid: true,
            warning_penalty,
            need_multiplier,
            scarcity_multiplier,
            flex_bonus,
            vor,
            warnings: validation.warnings,
        }
    }
}
