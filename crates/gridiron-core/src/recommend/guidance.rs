// Roster urgency, balance scoring, and round/position guidance.

use std::collections::BTreeMap;

use serde::Serialize;

use super::strategy::Strategy;
use super::Candidate;
use crate::draft::player::{Position, DRAFTABLE_POSITIONS};
use crate::draft::team::Team;
use crate::rules::{RosterRules, RoundPhase};

// ---------------------------------------------------------------------------
// Urgency
// ---------------------------------------------------------------------------

/// How pressing a position's starter need is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Urgency {
    /// Starters required and none rostered.
    Critical,
    /// At least half the starter requirement still open.
    High,
    /// Some starter slots open.
    Medium,
    /// Starters filled.
    Low,
}

impl Urgency {
    pub fn assess(required: usize, current: usize) -> Self {
        let deficit = required.saturating_sub(current);
        if required > 0 && current == 0 {
            Urgency::Critical
        } else if deficit > 0 && deficit as f64 / required as f64 >= 0.5 {
            Urgency::High
        } else if deficit > 0 {
            Urgency::Medium
        } else {
            Urgency::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Urgency::Critical => "Critical",
            Urgency::High => "High",
            Urgency::Medium => "Medium",
            Urgency::Low => "Low",
        }
    }

    /// Score factor for drafting into this need.
    pub fn multiplier(&self) -> f64 {
        match self {
            Urgency::Critical => 2.0,
            Urgency::High => 1.5,
            Urgency::Medium => 1.2,
            Urgency::Low => 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Roster analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionNeedSummary {
    pub current_count: usize,
    pub starters_needed: usize,
    pub depth_needed: usize,
    pub urgency: Urgency,
    pub urgency_multiplier: f64,
    pub current_players: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterAnalysis {
    pub position_needs: BTreeMap<Position, PositionNeedSummary>,
    pub current_roster: BTreeMap<Position, Vec<String>>,
    /// 0-100, how close each position is to its recommended depth.
    pub roster_balance_score: f64,
}

impl RosterAnalysis {
    pub fn urgency(&self, position: Position) -> Urgency {
        self.position_needs
            .get(&position)
            .map(|n| n.urgency)
            .unwrap_or(Urgency::Low)
    }

    pub fn any_critical(&self) -> bool {
        self.position_needs.values().any(|n| n.urgency == Urgency::Critical)
    }
}

/// Depth worth carrying at a position: a backup for every starter, except
/// K and DST which are streamed.
pub fn recommended_depth(rules: &RosterRules, position: Position) -> usize {
    let starters = rules.required(position);
    if position.is_late_round_position() {
        starters
    } else {
        starters * 2
    }
}

pub fn analyze_roster(rules: &RosterRules, team: &Team) -> RosterAnalysis {
    let mut position_needs = BTreeMap::new();
    let mut current_roster = BTreeMap::new();

    for &pos in DRAFTABLE_POSITIONS {
        let players: Vec<String> = team.players_at(pos).map(|p| p.name.clone()).collect();
        let current = players.len();
        let required = rules.required(pos);
        let urgency = Urgency::assess(required, current);
        position_needs.insert(
            pos,
            PositionNeedSummary {
                current_count: current,
                starters_needed: required.saturating_sub(current),
                depth_needed: recommended_depth(rules, pos).saturating_sub(current),
                urgency,
                urgency_multiplier: urgency.multiplier(),
                current_players: players.clone(),
            },
        );
        current_roster.insert(pos, players);
    }

    RosterAnalysis {
        roster_balance_score: roster_balance_score(rules, team),
        position_needs,
        current_roster,
    }
}

/// Weighted closeness of each position to its recommended depth, 0-100.
/// Positions with more starters weigh more (weight = 2 * starters + 1).
pub fn roster_balance_score(rules: &RosterRules, team: &Team) -> f64 {
    let mut total = 0.0;
    let mut weights = 0.0;
    for &pos in DRAFTABLE_POSITIONS {
        let optimal = recommended_depth(rules, pos);
        let current = team.count_at(pos);
        let score = if optimal == 0 || current >= optimal {
            100.0
        } else {
            current as f64 / optimal as f64 * 100.0
        };
        let weight = (rules.required(pos) * 2 + 1) as f64;
        total += score * weight;
        weights += weight;
    }
    if weights == 0.0 {
        return 0.0;
    }
    (total / weights * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Round guidance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundGuidance {
    pub round_type: &'static str,
    pub key_focus: &'static str,
    pub strategy_notes: Vec<&'static str>,
}

pub fn round_guidance(phase: RoundPhase) -> RoundGuidance {
    let (key_focus, strategy_notes) = match phase {
        RoundPhase::Auction => (
            "Target specific players you want",
            vec![
                "Focus on elite talent and positional scarcity",
                "Traditional draft value matters less than fit",
                "Target players that fit your long-term roster construction",
                "Consider which positions will be thin in snake rounds",
            ],
        ),
        RoundPhase::Keeper => (
            "Value opportunity if drafting",
            vec![
                "Limited participation creates value opportunities",
                "Good chance for above-ADP picks",
                "Fill gaps not covered by your keeper",
                "Consider positions that will be scarce later",
            ],
        ),
        RoundPhase::EarlySnake => (
            "Secure elite talent and fill critical needs",
            vec![
                "Priority on RB/WR scarcity positions",
                "Avoid QB/TE/K/DST unless elite tier",
                "Build foundation with consistent producers",
                "Watch for positional runs",
            ],
        ),
        RoundPhase::MidSnake => (
            "Balance starters and depth",
            vec![
                "Fill remaining starter needs",
                "Begin building bench depth",
                "Consider QB/TE if not addressed",
                "Target high-upside players in deeper positions",
            ],
        ),
        RoundPhase::LateSnake => (
            "Depth, upside, and late-round value",
            vec![
                "Target handcuffs and lottery tickets",
                "Fill K/DST if not done yet",
                "Look for breakout candidates",
                "Consider stashing injured players",
            ],
        ),
    };
    RoundGuidance {
        round_type: phase.label(),
        key_focus,
        strategy_notes,
    }
}

// ---------------------------------------------------------------------------
// Position recommendations
// ---------------------------------------------------------------------------

/// Average rank under which taking a K or DST is a reach.
const KICKER_REACH_RANK: f64 = 150.0;
/// Average rank past which a QB is considered late-round depth.
const QB_DEPTH_RANK: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopAvailable {
    pub name: String,
    pub rank: Option<f64>,
    pub tier: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRecommendation {
    pub urgency: Urgency,
    pub current_count: usize,
    pub top_available: Vec<TopAvailable>,
    pub recommendation: String,
}

/// Top three candidates and a timing note for each major position.
/// `candidates` must already be in ranked order.
pub fn position_recommendations(
    candidates: &[Candidate],
    roster: &RosterAnalysis,
    strategy: Strategy,
) -> BTreeMap<Position, PositionRecommendation> {
    let mut out = BTreeMap::new();
    for &pos in DRAFTABLE_POSITIONS {
        let top: Vec<&Candidate> = candidates.iter().filter(|c| c.position == pos).take(3).collect();
        let Some(best) = top.first() else {
            continue;
        };
        let current_count = roster
            .position_needs
            .get(&pos)
            .map(|n| n.current_count)
            .unwrap_or(0);
        let urgency = roster.urgency(pos);
        out.insert(
            pos,
            PositionRecommendation {
                urgency,
                current_count,
                top_available: top
                    .iter()
                    .map(|c| TopAvailable {
                        name: c.name.clone(),
                        rank: c.average_rank,
                        tier: c.value_metrics.tier,
                        value: c.value_metrics.pick_value,
                    })
                    .collect(),
                recommendation: timing_note(pos, urgency, current_count, best, strategy),
            },
        );
    }
    out
}

fn timing_note(pos: Position, urgency: Urgency, current: usize, best: &Candidate, strategy: Strategy) -> String {
    let tier_rank = best.value_metrics.tier_rank;
    let rank = best.average_rank.unwrap_or(f64::INFINITY);
    let name = &best.name;

    match urgency {
        Urgency::Critical => {
            return format!("Draft now - Critical need and {name} ({}) available", best.value_metrics.tier)
        }
        Urgency::High if tier_rank <= 3 => {
            return format!("Strong consideration - {name} fills need with good value")
        }
        _ => {}
    }

    match pos {
        Position::Kicker | Position::Defense if rank < KICKER_REACH_RANK => {
            "Wait - Don't reach for K/DST this early".to_string()
        }
        Position::Kicker | Position::Defense => format!("Reasonable timing for {name}"),
        Position::Quarterback if current == 0 => {
            if tier_rank <= 2 {
                format!("Consider now - {name} is elite QB talent")
            } else if rank > QB_DEPTH_RANK {
                "Can wait - QB depth still available later".to_string()
            } else {
                format!("Solid timing for {name}")
            }
        }
        Position::TightEnd if current == 0 => {
            if tier_rank <= 2 {
                format!("Consider now - Elite TE {name} available")
            } else {
                "Can wait - TE streaming options available".to_string()
            }
        }
        _ if matches!(urgency, Urgency::High | Urgency::Medium) => {
            format!("Good depth option - {name} adds roster flexibility")
        }
        _ if strategy == Strategy::BestAvailable => {
            format!("Optional - take {name} on pure value")
        }
        _ => format!("Optional - {name} available if value aligns"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::player::Player;

    fn team(players: &[Position]) -> Team {
        let mut t = Team::new("T", "O", 1);
        for (i, pos) in players.iter().enumerate() {
            t.roster.push(Player::new(format!("P{i}"), *pos, "DAL", 7));
        }
        t
    }

    #[test]
    fn urgency_levels() {
        assert_eq!(Urgency::assess(2, 0), Urgency::Critical);
        assert_eq!(Urgency::assess(2, 1), Urgency::High);
        assert_eq!(Urgency::assess(3, 2), Urgency::Medium);
        assert_eq!(Urgency::assess(1, 1), Urgency::Low);
        assert_eq!(Urgency::assess(0, 0), Urgency::Low);
        assert_eq!(Urgency::Critical.multiplier(), 2.0);
    }

    #[test]
    fn analysis_lists_players_and_needs() {
        let rules = RosterRules::default();
        let analysis = analyze_roster(&rules, &team(&[Position::WideReceiver]));
        assert_eq!(analysis.urgency(Position::RunningBack), Urgency::Critical);
        assert_eq!(analysis.urgency(Position::WideReceiver), Urgency::High);
        assert_eq!(analysis.current_roster[&Position::WideReceiver], vec!["P0".to_string()]);
        assert_eq!(analysis.position_needs[&Position::WideReceiver].depth_needed, 3);
        assert!(analysis.any_critical());
    }

    #[test]
    fn balance_score_bounds() {
        let rules = RosterRules::default();
        assert_eq!(roster_balance_score(&rules, &team(&[])), 0.0);
        let full = team(&[
            Position::Quarterback,
            Position::Quarterback,
            Position::RunningBack,
            Position::RunningBack,
            Position::RunningBack,
            Position::RunningBack,
            Position::WideReceiver,
            Position::WideReceiver,
            Position::WideReceiver,
            Position::WideReceiver,
            Position::TightEnd,
            Position::TightEnd,
            Position::Kicker,
            Position::Defense,
        ]);
        assert_eq!(roster_balance_score(&rules, &full), 100.0);
    }

    #[test]
    fn balance_score_weights_starters() {
        // One QB of two recommended: 50 * 3 / (3+5+5+3+3+3) = 6.8
        let rules = RosterRules::default();
        assert_eq!(roster_balance_score(&rules, &team(&[Position::Quarterback])), 6.8);
    }

    #[test]
    fn guidance_labels_match_phase() {
        assert_eq!(round_guidance(RoundPhase::Auction).round_type, "auction");
        assert_eq!(round_guidance(RoundPhase::LateSnake).round_type, "late_snake");
        assert_eq!(round_guidance(RoundPhase::MidSnake).strategy_notes.len(), 4);
    }
}
