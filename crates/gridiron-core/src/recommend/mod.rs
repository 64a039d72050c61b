// Pick recommendation: scores every available player for one owner's team
// under a chosen strategy and explains the result.
//
// Pipeline per request:
// 1. Validate the strategy and find the owner's team
// 2. Drop already-drafted players from the pool
// 3. Pick value, tiers, scarcity, and urgency per candidate
// 4. Strategy, need, and bye-week factors -> strategy score
// 5. Rank, push severe bye conflicts behind comparable picks
// 6. Reasoning, guidance, and confidence signals

pub mod byes;
pub mod guidance;
pub mod strategy;

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::draft::player::{Player, Position};
use crate::draft::state::DraftState;
use crate::draft::team::Team;
use crate::identity;
use crate::rules::{DraftRules, RosterRules, RoundType};
use crate::sources::RankingSource;
use crate::valuation::tiers::{tier_index, tier_label};
use crate::valuation::{AnalysisTuning, LeagueAnalyzer, ScarcityLevel};

pub use byes::{assess_bye_week, ByeWeekAnalysis, ConflictSeverity};
pub use guidance::{PositionRecommendation, RosterAnalysis, RoundGuidance, Urgency};
pub use strategy::{Strategy, StrategyContext};

/// A severely conflicted candidate yields to any clean candidate scoring
/// within this fraction of it.
const COMPARABLE_SCORE_MARGIN: f64 = 0.15;
/// Primary pick score above which the recommendation is confident.
const HIGH_CONFIDENCE_SCORE: f64 = 50.0;
/// Lead over the first alternative that makes the primary a clear best.
const CLEAR_BEST_GAP: f64 = 10.0;
const MAX_ALTERNATIVES: usize = 3;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RecommendError {
    #[error("Invalid strategy: {given}. Valid strategies: balanced, best_available, upside, safe")]
    InvalidStrategy { given: String },

    #[error("no players available after removing drafted players")]
    NoPlayersAvailable,

    #[error("player analysis unavailable: {message}")]
    AnalysisUnavailable { message: String },

    #[error("owner '{owner}' not found in draft data; available owners: {available:?}")]
    OwnerNotFound { owner: String, available: Vec<String> },
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueMetrics {
    /// Roster-aware pick value in [0, 1].
    pub pick_value: f64,
    pub vor: f64,
    pub tier: &'static str,
    /// 1-based tier within the candidate's position.
    pub tier_rank: usize,
    /// 1-based rank by score within the candidate's position.
    pub positional_rank: usize,
    pub scarcity_score: f64,
    pub scarcity_level: ScarcityLevel,
    pub strategy_multiplier: f64,
    pub need_factor: f64,
    pub bye_week_factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub name: String,
    pub position: Position,
    pub team: String,
    pub bye_week: u8,
    pub average_rank: Option<f64>,
    pub average_score: Option<f64>,
    pub strategy_score: f64,
    pub urgency: Urgency,
    pub detailed_reasoning: Vec<String>,
    pub value_metrics: ValueMetrics,
    /// Present when bye weeks were considered.
    pub bye_week_analysis: Option<ByeWeekAnalysis>,
}

impl Candidate {
    fn has_severe_conflict(&self) -> bool {
        self.bye_week_analysis.as_ref().is_some_and(ByeWeekAnalysis::is_severe)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceFactors {
    pub high_confidence: bool,
    pub clear_best_pick: bool,
    pub positional_need_urgent: bool,
    pub bye_week_conflicts: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategicGuidance {
    pub round_guidance: RoundGuidance,
    pub position_recommendations: BTreeMap<Position, PositionRecommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub primary_pick: Candidate,
    pub alternatives: Vec<Candidate>,
    pub strategy_used: Strategy,
    pub consider_bye_weeks: bool,
    pub current_round: u32,
    pub round_type: RoundType,
    pub team_analyzed: String,
    pub total_options_analyzed: usize,
    pub roster_analysis: RosterAnalysis,
    pub strategic_guidance: StrategicGuidance,
    pub confidence_factors: ConfidenceFactors,
}

// ---------------------------------------------------------------------------
// Recommender
// ---------------------------------------------------------------------------

/// Scores candidate picks. Holds only static league configuration; every
/// request supplies the draft state and player pool.
#[derive(Debug, Clone, Default)]
pub struct PickRecommender {
    pub roster_rules: RosterRules,
    pub draft_rules: DraftRules,
    pub tuning: AnalysisTuning,
}

impl PickRecommender {
    pub fn new(roster_rules: RosterRules, draft_rules: DraftRules, tuning: AnalysisTuning) -> Self {
        PickRecommender {
            roster_rules,
            draft_rules,
            tuning,
        }
    }

    /// Recommend a pick for `owner` from `pool`.
    ///
    /// Fails on an unknown strategy before anything else is looked at; drafted
    /// players are removed from the pool before scoring.
    pub fn recommend(
        &self,
        state: &DraftState,
        owner: &str,
        pool: &[Player],
        strategy: &str,
        consider_bye_weeks: bool,
    ) -> Result<Recommendation, RecommendError> {
        let strategy: Strategy = strategy.parse()?;
        self.recommend_with(state, owner, pool, strategy, consider_bye_weeks)
    }

    /// Recommend using the ranking source's full pool.
    ///
    /// A source failure surfaces as `AnalysisUnavailable` carrying the
    /// source's error text; nothing is scored on partial data.
    pub async fn recommend_from_source(
        &self,
        state: &DraftState,
        owner: &str,
        source: &dyn RankingSource,
        strategy: &str,
        consider_bye_weeks: bool,
    ) -> Result<Recommendation, RecommendError> {
        let strategy: Strategy = strategy.parse()?;
        let pool = source
            .fetch_players(None, false)
            .await
            .map_err(|e| RecommendError::AnalysisUnavailable { message: e.to_string() })?;
        self.recommend_with(state, owner, &pool, strategy, consider_bye_weeks)
    }

    fn recommend_with(
        &self,
        state: &DraftState,
        owner: &str,
        pool: &[Player],
        strategy: Strategy,
        consider_bye_weeks: bool,
    ) -> Result<Recommendation, RecommendError> {
        let team = state
            .team_for_owner(owner)
            .ok_or_else(|| RecommendError::OwnerNotFound {
                owner: owner.to_string(),
                available: state.owners(),
            })?;

        let available = identity::filter_available(pool, state);
        if available.is_empty() {
            return Err(RecommendError::NoPlayersAvailable);
        }
        debug!(
            "Scoring {} of {} players for '{}' ({})",
            available.len(),
            pool.len(),
            team.team_name,
            strategy
        );

        let round = state.current_round();
        let analyzer = LeagueAnalyzer::new(self.roster_rules.clone(), state.team_count(), self.tuning.clone());
        let roster_analysis = guidance::analyze_roster(&self.roster_rules, team);

        let mut ranked = self.score_candidates(
            &analyzer,
            team,
            &available,
            &roster_analysis,
            strategy,
            round,
            consider_bye_weeks,
        );
        rank_candidates(&mut ranked);
        if consider_bye_weeks {
            deprioritize_severe_conflicts(&mut ranked);
        }

        let phase = self.draft_rules.round_phase(round);
        let position_recommendations = guidance::position_recommendations(&ranked, &roster_analysis, strategy);

        let bye_week_conflicts = consider_bye_weeks
            && (ranked
                .iter()
                .any(|c| c.bye_week_analysis.as_ref().is_some_and(|b| !b.conflicts.is_empty()))
                || !byes::problematic_weeks(team).is_empty());

        let total = ranked.len();
        let mut iter = ranked.into_iter();
        let mut primary = iter.next().ok_or(RecommendError::NoPlayersAvailable)?;
        let mut alternatives: Vec<Candidate> = iter.take(MAX_ALTERNATIVES).collect();

        primary.detailed_reasoning = pick_reasoning(&primary, strategy, round, consider_bye_weeks, false);
        for alt in &mut alternatives {
            alt.detailed_reasoning = pick_reasoning(alt, strategy, round, consider_bye_weeks, true);
        }

        let confidence_factors = ConfidenceFactors {
            high_confidence: primary.strategy_score > HIGH_CONFIDENCE_SCORE,
            clear_best_pick: alternatives
                .first()
                .is_some_and(|alt| primary.strategy_score - alt.strategy_score > CLEAR_BEST_GAP),
            positional_need_urgent: roster_analysis.any_critical(),
            bye_week_conflicts,
        };

        info!(
            "Recommended {} ({}) for '{}' in round {}: score {:.1}, {} alternatives",
            primary.name,
            primary.position,
            team.team_name,
            round,
            primary.strategy_score,
            alternatives.len()
        );

        Ok(Recommendation {
            primary_pick: primary,
            alternatives,
            strategy_used: strategy,
            consider_bye_weeks,
            current_round: round,
            round_type: self.draft_rules.round_type(round),
            team_analyzed: team.team_name.clone(),
            total_options_analyzed: total,
            strategic_guidance: StrategicGuidance {
                round_guidance: guidance::round_guidance(phase),
                position_recommendations,
            },
            roster_analysis,
            confidence_factors,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn score_candidates(
        &self,
        analyzer: &LeagueAnalyzer,
        team: &Team,
        available: &[Player],
        roster: &RosterAnalysis,
        strategy: Strategy,
        round: u32,
        consider_bye_weeks: bool,
    ) -> Vec<Candidate> {
        let total_rounds = self.draft_rules.total_rounds;
        let late_rounds = round + self.tuning.late_round_window >= total_rounds;

        // Per-position tiers and score order, computed once.
        let mut by_position: HashMap<Position, Vec<Player>> = HashMap::new();
        for p in available {
            by_position.entry(p.position).or_default().push(p.clone());
        }
        let tiers: HashMap<Position, Vec<Vec<Player>>> = by_position
            .iter()
            .map(|(pos, players)| (*pos, analyzer.positional_tiers(players)))
            .collect();
        for players in by_position.values_mut() {
            players.sort_by(|a, b| cmp_score_desc(a.average_score(), b.average_score()));
        }

        let scarcity: HashMap<Position, f64> = analyzer
            .calculate_position_scarcity(available, round, total_rounds)
            .into_iter()
            .map(|s| (s.position, s.scarcity_score))
            .collect();

        available
            .iter()
            .map(|player| {
                let pos = player.position;
                let breakdown = analyzer.pick_value_breakdown(player, team, available, round, total_rounds);

                let pos_tiers = tiers.get(&pos).map(Vec::as_slice).unwrap_or_default();
                let tier_idx = tier_index(pos_tiers, player).unwrap_or(pos_tiers.len());
                let positional_rank = by_position
                    .get(&pos)
                    .and_then(|list| list.iter().position(|p| p == player))
                    .map_or(1, |i| i + 1);

                let scarcity_score = scarcity.get(&pos).copied().unwrap_or(0.0);
                let scarcity_level = ScarcityLevel::from_score(scarcity_score);
                let urgency = roster.urgency(pos);

                let ctx = StrategyContext {
                    player,
                    tier_rank: tier_idx + 1,
                    urgency,
                    scarcity: scarcity_level,
                    round,
                };
                let strategy_multiplier = strategy.multiplier(&ctx);

                // K/DST needs stay dormant until the final rounds.
                let need_factor = if pos.is_late_round_position() && !late_rounds {
                    1.0
                } else {
                    1.0 + (urgency.multiplier() - 1.0) * strategy.need_weight()
                };

                let bye_week_analysis =
                    consider_bye_weeks.then(|| assess_bye_week(&self.roster_rules, team, player));
                let bye_week_factor = bye_week_analysis.as_ref().map_or(1.0, |b| b.penalty);

                let strategy_score =
                    100.0 * breakdown.value * strategy_multiplier * need_factor * bye_week_factor;

                Candidate {
                    name: player.name.clone(),
                    position: pos,
                    team: player.team.clone(),
                    bye_week: player.bye_week,
                    average_rank: player.average_rank(),
                    average_score: player.average_score(),
                    strategy_score,
                    urgency,
                    detailed_reasoning: Vec::new(),
                    value_metrics: ValueMetrics {
                        pick_value: breakdown.value,
                        vor: breakdown.vor,
                        tier: tier_label(tier_idx),
                        tier_rank: tier_idx + 1,
                        positional_rank,
                        scarcity_score,
                        scarcity_level,
                        strategy_multiplier,
                        need_factor,
                        bye_week_factor,
                    },
                    bye_week_analysis,
                }
            })
            .collect()
    }
}

fn cmp_score_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    b.unwrap_or(f64::NEG_INFINITY)
        .total_cmp(&a.unwrap_or(f64::NEG_INFINITY))
}

/// Strategy score descending; ties go to the higher average score, then name.
fn rank_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        b.strategy_score
            .total_cmp(&a.strategy_score)
            .then_with(|| cmp_score_desc(a.average_score, b.average_score))
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Move clean candidates ahead of severely conflicted ones they nearly match.
fn deprioritize_severe_conflicts(ranked: &mut Vec<Candidate>) {
    let mut i = 0;
    while i < ranked.len() {
        if ranked[i].has_severe_conflict() {
            let floor = ranked[i].strategy_score * (1.0 - COMPARABLE_SCORE_MARGIN);
            let replacement = ranked[i + 1..]
                .iter()
                .position(|c| !c.has_severe_conflict() && c.strategy_score >= floor);
            if let Some(offset) = replacement {
                let clean = ranked.remove(i + 1 + offset);
                ranked.insert(i, clean);
            }
        }
        i += 1;
    }
}

fn pick_reasoning(
    c: &Candidate,
    strategy: Strategy,
    round: u32,
    consider_bye_weeks: bool,
    is_alternative: bool,
) -> Vec<String> {
    let mut reasons = Vec::new();
    let pos = c.position;
    let metrics = &c.value_metrics;

    if is_alternative {
        reasons.push(format!(
            "Alternative option: {} ({pos}) offers different strategic value",
            c.name
        ));
    } else {
        match c.average_rank {
            Some(rank) => reasons.push(format!("Primary recommendation: {} ({pos}) - Rank {rank:.0}", c.name)),
            None => reasons.push(format!("Primary recommendation: {} ({pos})", c.name)),
        }
    }

    match metrics.tier_rank {
        1 | 2 => reasons.push(format!(
            "Excellent value - {} player still available at this pick",
            metrics.tier
        )),
        3 => reasons.push(format!("Good value - Solid {} option", metrics.tier)),
        _ => {}
    }

    match c.urgency {
        Urgency::Critical => reasons.push(format!("Critical need - no {pos} on the roster yet")),
        Urgency::High => reasons.push(format!("Important need - fills a starting {pos} slot")),
        Urgency::Medium => reasons.push(format!("Depth need - adds {pos} depth to your roster")),
        Urgency::Low => {}
    }

    reasons.push(strategy.reasoning(c.urgency, round).to_string());

    if metrics.scarcity_level == ScarcityLevel::High {
        reasons.push(format!(
            "Positional scarcity - quality {pos}s are running out (#{} at the position)",
            metrics.positional_rank
        ));
    } else if matches!(pos, Position::TightEnd | Position::Quarterback) && metrics.positional_rank <= 8 {
        reasons.push(format!(
            "Position timing - good value for {pos}{} at this stage",
            metrics.positional_rank
        ));
    }

    if consider_bye_weeks {
        if let Some(bye) = &c.bye_week_analysis {
            if bye.is_severe() {
                reasons.push(format!("Bye week concern - week {} creates roster conflicts", bye.bye_week));
            } else if bye.helps_bye_diversity {
                reasons.push(format!("Bye week help - week {} improves roster flexibility", bye.bye_week));
            }
        }
    }

    reasons.push(
        if c.strategy_score > 60.0 {
            "Strong overall fit for your team and strategy"
        } else if c.strategy_score > 40.0 {
            "Solid pick that addresses multiple factors"
        } else {
            "Reasonable option given current board state"
        }
        .to_string(),
    );

    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::pick::Pick;

    fn candidate(name: &str, score: f64, severe: bool) -> Candidate {
        let bye = ByeWeekAnalysis {
            bye_week: 9,
            penalty: if severe { 0.7 } else { 1.0 },
            severity: if severe { ConflictSeverity::Medium } else { ConflictSeverity::None },
            conflicts: Vec::new(),
            helps_bye_diversity: false,
        };
        Candidate {
            name: name.into(),
            position: Position::WideReceiver,
            team: "DAL".into(),
            bye_week: 9,
            average_rank: Some(10.0),
            average_score: Some(score),
            strategy_score: score,
            urgency: Urgency::Low,
            detailed_reasoning: Vec::new(),
            value_metrics: ValueMetrics {
                pick_value: score / 100.0,
                vor: 0.0,
                tier: "Elite",
                tier_rank: 1,
                positional_rank: 1,
                scarcity_score: 0.0,
                scarcity_level: ScarcityLevel::Low,
                strategy_multiplier: 1.0,
                need_factor: 1.0,
                bye_week_factor: 1.0,
            },
            bye_week_analysis: Some(bye),
        }
    }

    fn names(c: &[Candidate]) -> Vec<&str> {
        c.iter().map(|c| c.name.as_str()).collect()
    }

    fn league() -> DraftState {
        let mut state = DraftState::new(vec![
            Team::new("Gridiron Gang", "Sam", 1),
            Team::new("Blitz", "Riley", 2),
        ]);
        state.apply_pick(Pick {
            pick_number: 1,
            round: 1,
            team: "Blitz".into(),
            player_name: "Ja'Marr Chase CIN".into(),
            position: Position::WideReceiver,
            bye_week: 10,
        });
        state
    }

    #[test]
    fn severe_conflict_yields_to_close_clean_candidate() {
        let mut ranked = vec![
            candidate("Clash", 100.0, true),
            candidate("Clean", 90.0, false),
            candidate("Far", 50.0, false),
        ];
        deprioritize_severe_conflicts(&mut ranked);
        assert_eq!(names(&ranked), vec!["Clean", "Clash", "Far"]);
    }

    #[test]
    fn severe_conflict_keeps_lead_when_gap_is_large() {
        let mut ranked = vec![candidate("Clash", 100.0, true), candidate("Far", 70.0, false)];
        deprioritize_severe_conflicts(&mut ranked);
        assert_eq!(names(&ranked), vec!["Clash", "Far"]);
    }

    #[test]
    fn ties_break_on_average_score() {
        let mut a = candidate("Lower", 80.0, false);
        let mut b = candidate("Higher", 80.0, false);
        a.average_score = Some(70.0);
        b.average_score = Some(85.0);
        let mut ranked = vec![a, b];
        rank_candidates(&mut ranked);
        assert_eq!(names(&ranked), vec!["Higher", "Lower"]);
    }

    #[test]
    fn invalid_strategy_checked_first() {
        let rec = PickRecommender::default();
        let err = rec.recommend(&league(), "Nobody", &[], "bogus", true).unwrap_err();
        assert!(matches!(err, RecommendError::InvalidStrategy { .. }));
    }

    #[test]
    fn unknown_owner_lists_owners() {
        let rec = PickRecommender::default();
        let pool = vec![Player::new("A", Position::TightEnd, "KC", 6).with_ranking("espn", 1, 70.0)];
        let err = rec.recommend(&league(), "Casey", &pool, "balanced", true).unwrap_err();
        assert_eq!(
            err,
            RecommendError::OwnerNotFound {
                owner: "Casey".into(),
                available: vec!["Sam".into(), "Riley".into()],
            }
        );
    }

    #[test]
    fn fully_drafted_pool_is_empty() {
        let rec = PickRecommender::default();
        let pool = vec![Player::new("Ja'Marr Chase", Position::WideReceiver, "CIN", 10).with_ranking("espn", 1, 95.0)];
        let err = rec.recommend(&league(), "Sam", &pool, "safe", false).unwrap_err();
        assert_eq!(err, RecommendError::NoPlayersAvailable);
    }

    #[test]
    fn reasoning_marks_alternatives() {
        let c = candidate("Alt", 55.0, false);
        let lines = pick_reasoning(&c, Strategy::Balanced, 3, false, true);
        assert!(lines[0].contains("Alternative"));
        assert!(lines.iter().any(|l| l.to_lowercase().contains("balance")));
    }
}
