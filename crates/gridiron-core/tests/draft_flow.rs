// Integration tests for the draft core.
//
// These drive the public API end to end: board rows are reconciled into a
// draft state, folded into the cache across polls, and handed to the
// recommender together with a ranked pool.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use gridiron_core::cache::{CacheSettings, StateCache};
use gridiron_core::draft::pick::{Pick, RawDraftRows, RawPickRow, RawTeamRow};
use gridiron_core::draft::player::{Player, Position};
use gridiron_core::draft::state::DraftState;
use gridiron_core::draft::team::Team;
use gridiron_core::identity;
use gridiron_core::recommend::{ConflictSeverity, PickRecommender, RecommendError, Urgency};
use gridiron_core::rules::RoundType;
use gridiron_core::sources::{RankingSource, RawStateReader, SourceError};
use gridiron_core::sync::DraftSync;

// ===========================================================================
// Test helpers
// ===========================================================================

const RANGE: &str = "Draft!A1:V24";

fn pick(n: u32, round: u32, team: &str, player: &str, position: Position, bye: u8) -> Pick {
    Pick {
        pick_number: n,
        round,
        team: team.into(),
        player_name: player.into(),
        position,
        bye_week: bye,
    }
}

fn ranked(name: &str, position: Position, team: &str, bye: u8, score: f64) -> Player {
    Player::new(name, position, team, bye)
        .with_ranking("fantasypros", 10, score)
        .with_ranking("espn", 12, score)
}

/// A two-team league where "Gridiron Gang" (owner Sam) holds one WR on bye 10
/// and the sheet says round 2 is on the clock.
fn scenario_state() -> DraftState {
    let mut state = DraftState::new(vec![
        Team::new("Gridiron Gang", "Sam", 1),
        Team::new("Blitz", "Riley", 2),
    ]);
    state.apply_pick(pick(1, 1, "Gridiron Gang", "Mike Evans TB", Position::WideReceiver, 10));
    state.apply_pick(pick(2, 1, "Blitz", "Ja'Marr Chase CIN", Position::WideReceiver, 10));
    state.metadata.current_round = Some(2);
    state
}

fn scenario_pool() -> Vec<Player> {
    vec![
        ranked("Derrick Henry", Position::RunningBack, "BAL", 14, 88.2),
        ranked("Josh Allen", Position::Quarterback, "BUF", 12, 78.5),
        ranked("Cooper Kupp", Position::WideReceiver, "LAR", 10, 82.1),
        // Already drafted; must never be recommended.
        ranked("Ja'Marr Chase", Position::WideReceiver, "CIN", 10, 95.0),
    ]
}

fn raw_pick(n: u32, round: u32, team: &str, player: &str) -> RawPickRow {
    RawPickRow {
        pick_number: Some(n),
        round: Some(round),
        team: Some(team.into()),
        player: Some(player.into()),
        position: Some("RB".into()),
        bye_week: Some(7),
    }
}

fn raw_team(name: &str, owner: &str, number: u32) -> RawTeamRow {
    RawTeamRow {
        team_name: Some(name.into()),
        owner: Some(owner.into()),
        team_number: Some(number),
    }
}

/// Board reader whose rows can be replaced between polls.
struct Board {
    rows: Mutex<RawDraftRows>,
}

#[async_trait]
impl RawStateReader for Board {
    async fn read_rows(&self, _sheet_id: &str, range: &str) -> Result<RawDraftRows, SourceError> {
        let first_row = gridiron_core::cache::SheetRange::parse(range).map_or(1, |r| r.start_row);
        let mut rows = self.rows.lock().unwrap().clone();
        rows.picks.retain(|p| p.round.unwrap_or(0) + 4 >= first_row);
        Ok(rows)
    }
}

struct FixedRankings(Result<Vec<Player>, SourceError>);

#[async_trait]
impl RankingSource for FixedRankings {
    async fn fetch_players(&self, position: Option<Position>, _refresh: bool) -> Result<Vec<Player>, SourceError> {
        let players = self.0.clone()?;
        Ok(players
            .into_iter()
            .filter(|p| position.map_or(true, |pos| p.position == pos))
            .collect())
    }
}

// ===========================================================================
// Recommendation scenarios
// ===========================================================================

#[test]
fn critical_need_without_bye_clash_wins() {
    let rec = PickRecommender::default();
    let result = rec
        .recommend(&scenario_state(), "Sam", &scenario_pool(), "balanced", true)
        .unwrap();

    assert_eq!(result.primary_pick.name, "Derrick Henry");
    assert_eq!(result.primary_pick.urgency, Urgency::Critical);
    assert_eq!(result.current_round, 2);
    assert_eq!(result.round_type, RoundType::Auction);
    assert_eq!(result.team_analyzed, "Gridiron Gang");
    assert_eq!(result.total_options_analyzed, 3);

    let kupp = result
        .alternatives
        .iter()
        .find(|c| c.name == "Cooper Kupp")
        .expect("Kupp should be an alternative");
    let bye = kupp.bye_week_analysis.as_ref().unwrap();
    assert_eq!(bye.severity, ConflictSeverity::Medium);
    assert!(kupp.strategy_score < result.primary_pick.strategy_score);

    assert!(result.alternatives.iter().all(|c| c.name != "Ja'Marr Chase"));
    assert!(result.alternatives.iter().all(|c| c.detailed_reasoning[0].contains("Alternative")));
    assert!(result.confidence_factors.high_confidence);
    assert!(result.confidence_factors.positional_need_urgent);
    assert!(result.confidence_factors.bye_week_conflicts);
}

fn receiver_pool() -> Vec<Player> {
    vec![
        ranked("Cooper Kupp", Position::WideReceiver, "LAR", 10, 90.0),
        ranked("Amon-Ra St. Brown", Position::WideReceiver, "DET", 5, 88.0),
    ]
}

#[test]
fn bye_clash_alone_demotes_higher_scored_receiver() {
    let rec = PickRecommender::default();

    let ignoring = rec
        .recommend(&scenario_state(), "Sam", &receiver_pool(), "best_available", false)
        .unwrap();
    assert_eq!(ignoring.primary_pick.name, "Cooper Kupp");

    let weighing = rec
        .recommend(&scenario_state(), "Sam", &receiver_pool(), "best_available", true)
        .unwrap();
    assert_eq!(weighing.primary_pick.name, "Amon-Ra St. Brown");
    let kupp = weighing
        .alternatives
        .iter()
        .find(|c| c.name == "Cooper Kupp")
        .expect("Kupp should drop to the alternatives");
    assert!(kupp.bye_week_analysis.as_ref().unwrap().is_severe());
    assert!(kupp.average_score > weighing.primary_pick.average_score);
}

#[test]
fn recommendation_serialises_camel_case() {
    let rec = PickRecommender::default();
    let result = rec
        .recommend(&scenario_state(), "sam", &scenario_pool(), "safe", false)
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert!(json["primaryPick"]["valueMetrics"]["pickValue"].is_number());
    assert_eq!(json["strategyUsed"], "safe");
    assert_eq!(json["considerByeWeeks"], false);
    assert!(json["primaryPick"]["byeWeekAnalysis"].is_null());
    assert!(json["strategicGuidance"]["roundGuidance"]["keyFocus"].is_string());
}

#[test]
fn bogus_strategy_names_all_valid_options() {
    let err = PickRecommender::default()
        .recommend(&scenario_state(), "Sam", &scenario_pool(), "bogus", true)
        .unwrap_err();
    let msg = err.to_string();
    for name in ["balanced", "best_available", "upside", "safe"] {
        assert!(msg.contains(name), "{msg}");
    }
}

#[tokio::test]
async fn upstream_failure_becomes_analysis_unavailable() {
    let source = FixedRankings(Err(SourceError::upstream("rankings", "HTTP 503")));
    let err = PickRecommender::default()
        .recommend_from_source(&scenario_state(), "Sam", &source, "balanced", true)
        .await
        .unwrap_err();
    match err {
        RecommendError::AnalysisUnavailable { message } => assert!(message.contains("HTTP 503")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn source_pool_is_scored() {
    let source = FixedRankings(Ok(scenario_pool()));
    let result = PickRecommender::default()
        .recommend_from_source(&scenario_state(), "Sam", &source, "best_available", false)
        .await
        .unwrap();
    assert_eq!(result.total_options_analyzed, 3);
}

// ===========================================================================
// Identity and reconciliation
// ===========================================================================

#[test]
fn suffix_and_team_drift_still_filters_drafted_player() {
    let mut state = DraftState::new(vec![Team::new("A", "Ann", 1)]);
    state.apply_pick(pick(1, 1, "A", "Calvin Johnson Sr.   DET", Position::WideReceiver, 9));
    state.apply_pick(pick(2, 1, "A", "Travis Etienne Jr.  JAC", Position::RunningBack, 9));
    let pool = vec![
        ranked("Calvin Johnson", Position::WideReceiver, "DET", 9, 80.0),
        ranked("Calvin Johnston", Position::WideReceiver, "DET", 9, 40.0),
        ranked("Travis Etienne", Position::RunningBack, "JAX", 9, 75.0),
    ];
    let available = identity::filter_available(&pool, &state);
    let names: Vec<&str> = available.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Calvin Johnston"]);
}

#[test]
fn completed_rounds_stop_at_first_partial_round() {
    let teams: Vec<RawTeamRow> = (1..=10).map(|i| raw_team(&format!("T{i}"), &format!("O{i}"), i)).collect();
    let mut picks = Vec::new();
    let mut n = 0;
    for (round, count) in [(1, 10), (2, 10), (3, 4)] {
        for i in 0..count {
            n += 1;
            picks.push(raw_pick(n, round, &format!("T{}", i + 1), &format!("P{n}")));
        }
    }
    let state = DraftState::from_raw(&RawDraftRows {
        picks,
        teams,
        current_round: None,
    })
    .unwrap();
    assert_eq!(state.completed_rounds(), 2);
    assert_eq!(state.current_round(), 3);
}

// ===========================================================================
// Cache and polling
// ===========================================================================

#[test]
fn merge_twice_equals_merge_once() {
    let cache = StateCache::new(CacheSettings::default());
    let base = scenario_state();
    cache.update("s", RANGE, base.clone());
    let new = vec![pick(3, 2, "Blitz", "Bijan Robinson ATL", Position::RunningBack, 12)];

    let once = cache.merge("s", RANGE, &base, new.clone());
    let twice = cache.merge("s", RANGE, &once, new);
    assert_eq!(once, twice);
    assert_eq!(twice.picks.len(), 3);
}

#[test]
fn board_without_team_rows_counts_rounds_against_ten_teams() {
    let rows = RawDraftRows {
        picks: (1..=3).map(|n| raw_pick(n, 1, &format!("T{n}"), &format!("Back {n} NYG"))).collect(),
        teams: vec![],
        current_round: None,
    };
    let state = DraftState::from_raw(&rows).unwrap();
    assert_eq!(state.teams.len(), 3);
    assert_eq!(state.completed_rounds(), 0);

    let cache = StateCache::new(CacheSettings::default());
    cache.update("s", RANGE, state.clone());
    let merged = cache.merge(
        "s",
        RANGE,
        &state,
        vec![pick(4, 1, "T4", "Back 4 NYG", Position::RunningBack, 7)],
    );
    assert_eq!(merged.teams.len(), 4);
    assert_eq!(merged.completed_rounds(), 0);
    assert_eq!(cache.completed_rounds("s"), 0);
}

#[tokio::test]
async fn board_without_team_rows_never_skips_open_round() {
    let board = Board {
        rows: Mutex::new(RawDraftRows {
            picks: (1..=3).map(|n| raw_pick(n, 1, &format!("T{n}"), &format!("Back {n} NYG"))).collect(),
            teams: vec![],
            current_round: None,
        }),
    };
    let sync = DraftSync::new(Arc::new(StateCache::new(CacheSettings::default())));
    let first = sync.refresh(&board, "s", RANGE, false).await.unwrap();
    assert_eq!(first.completed_rounds, 0);

    board
        .rows
        .lock()
        .unwrap()
        .picks
        .push(raw_pick(4, 1, "T4", "Back 4 NYG"));
    let second = sync.refresh(&board, "s", RANGE, false).await.unwrap();
    assert!(!second.incremental);
    assert_eq!(second.state.picks.len(), 4);
}

#[test]
fn narrowed_range_keeps_columns_and_end_row() {
    let cache = StateCache::new(CacheSettings::default());
    assert_eq!(cache.incremental_range("s", RANGE, 6), "Draft!A10:V24");
}

#[tokio::test]
async fn polls_feed_recommendations() {
    let board = Board {
        rows: Mutex::new(RawDraftRows {
            picks: vec![raw_pick(1, 1, "Blitz", "Bijan Robinson ATL"), raw_pick(2, 1, "Gang", "Saquon Barkley PHI")],
            teams: vec![raw_team("Gang", "Sam", 1), raw_team("Blitz", "Riley", 2)],
            current_round: None,
        }),
    };
    let sync = DraftSync::new(Arc::new(StateCache::new(CacheSettings::default())));

    let first = sync.refresh(&board, "s", RANGE, false).await.unwrap();
    assert!(!first.incremental);
    assert_eq!(first.completed_rounds, 1);

    board
        .rows
        .lock()
        .unwrap()
        .picks
        .push(raw_pick(3, 2, "Gang", "Josh Allen BUF"));
    let second = sync.refresh(&board, "s", RANGE, false).await.unwrap();
    assert!(second.incremental);
    assert_eq!(second.state.picks.len(), 3);
    assert!(sync.cache().completed_rounds("s") >= first.completed_rounds);

    let pool = vec![
        ranked("Josh Allen", Position::Quarterback, "BUF", 7, 78.5),
        ranked("Bijan Robinson", Position::RunningBack, "ATL", 7, 85.0),
        ranked("CeeDee Lamb", Position::WideReceiver, "DAL", 7, 84.0),
    ];
    let result = PickRecommender::default()
        .recommend(&second.state, "Sam", &pool, "balanced", true)
        .unwrap();
    assert_eq!(result.primary_pick.name, "CeeDee Lamb");
    assert_eq!(result.total_options_analyzed, 1);
}
