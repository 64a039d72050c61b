// Reconciled draft state: picks, teams, and round bookkeeping.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::pick::{reconcile_picks, Pick, RawDraftRows, ReconcileError};
use super::team::Team;

/// Team count assumed when the sheet has not listed its teams.
pub const DEFAULT_TEAM_COUNT: usize = 10;

/// Non-pick information read alongside the board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftMetadata {
    /// Round the sheet reports as current, when it tracks one.
    pub current_round: Option<u32>,
    /// When the underlying rows were read.
    pub read_at: Option<DateTime<Utc>>,
}

/// The complete reconciled state of one draft board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftState {
    /// All recorded picks, ascending by pick number.
    pub picks: Vec<Pick>,
    pub teams: Vec<Team>,
    pub metadata: DraftMetadata,
    /// Teams the league is known to have, from the sheet's team rows or the
    /// configured league size. Zero when neither is known. Teams registered
    /// on the fly by `apply_pick` never change it.
    #[serde(default)]
    pub league_size: usize,
}

impl DraftState {
    pub fn new(teams: Vec<Team>) -> Self {
        DraftState {
            picks: Vec::new(),
            league_size: teams.len(),
            teams,
            metadata: DraftMetadata::default(),
        }
    }

    /// Build a state from one full read of the sheet.
    ///
    /// Teams are taken in sheet order, picks are validated and sorted, and
    /// every roster is rebuilt from the picks.
    pub fn from_raw(raw: &RawDraftRows) -> Result<Self, ReconcileError> {
        Self::from_raw_for_league(raw, None)
    }

    /// Like [`DraftState::from_raw`], with `league_size` standing in for the
    /// team count when the sheet lists no teams.
    pub fn from_raw_for_league(raw: &RawDraftRows, league_size: Option<usize>) -> Result<Self, ReconcileError> {
        let mut teams = Vec::new();
        for (idx, row) in raw.teams.iter().enumerate() {
            if let Some(team) = Team::from_raw(idx, row)? {
                teams.push(team);
            }
        }

        let mut state = DraftState::new(teams);
        if state.league_size == 0 {
            state.league_size = league_size.unwrap_or(0);
        }
        state.picks = reconcile_picks(&raw.picks)?;
        state.picks.sort_by_key(|p| p.pick_number);
        state.picks.dedup_by_key(|p| p.pick_number);
        state.metadata = DraftMetadata {
            current_round: raw.current_round,
            read_at: Some(Utc::now()),
        };
        state.rebuild_rosters();
        Ok(state)
    }

    /// Teams in the league, falling back to the default when neither the
    /// sheet nor the configuration says.
    pub fn team_count(&self) -> usize {
        if self.league_size == 0 {
            DEFAULT_TEAM_COUNT
        } else {
            self.league_size
        }
    }

    /// Number of contiguous fully-drafted rounds, starting at round 1.
    pub fn completed_rounds(&self) -> u32 {
        completed_rounds(&self.picks, self.team_count())
    }

    /// The round now on the clock: the sheet's own value when present,
    /// otherwise derived from the pick count.
    pub fn current_round(&self) -> u32 {
        self.metadata
            .current_round
            .unwrap_or_else(|| (self.picks.len() / self.team_count()) as u32 + 1)
    }

    /// Apply one pick to its team's roster and append it to the pick list.
    ///
    /// Picks for a team that is not yet known register that team, so a board
    /// read before the team header row still produces rosters.
    pub fn apply_pick(&mut self, pick: Pick) {
        let idx = match self.teams.iter().position(|t| t.team_name == pick.team) {
            Some(idx) => idx,
            None => {
                warn!("Auto-registered unknown team: '{}'", pick.team);
                let number = self.teams.len() as u32 + 1;
                self.teams.push(Team::new(pick.team.clone(), "", number));
                self.teams.len() - 1
            }
        };
        self.teams[idx].roster.push(pick.to_player());
        self.picks.push(pick);
    }

    /// Clear every roster and replay all picks in pick-number order.
    pub fn rebuild_rosters(&mut self) {
        for team in &mut self.teams {
            team.roster.clear();
        }
        let mut picks = std::mem::take(&mut self.picks);
        picks.sort_by_key(|p| p.pick_number);
        for pick in picks {
            self.apply_pick(pick);
        }
    }

    /// Find the team run by `owner`: exact (case-insensitive) match first,
    /// then a partial match in either direction.
    pub fn team_for_owner(&self, owner: &str) -> Option<&Team> {
        let wanted = owner.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        self.teams
            .iter()
            .find(|t| t.owner.to_lowercase() == wanted)
            .or_else(|| {
                self.teams.iter().find(|t| {
                    let have = t.owner.to_lowercase();
                    !have.is_empty() && (have.contains(&wanted) || wanted.contains(&have))
                })
            })
    }

    pub fn owners(&self) -> Vec<String> {
        self.teams.iter().map(|t| t.owner.clone()).collect()
    }
}

/// Pure completed-round computation over a pick set.
///
/// A round is complete when at least `team_count` picks are recorded for it.
/// Scanning stops at the first incomplete round, so a later full round after
/// a gap does not count.
pub fn completed_rounds(picks: &[Pick], team_count: usize) -> u32 {
    let team_count = if team_count == 0 { DEFAULT_TEAM_COUNT } else { team_count };
    let mut per_round: BTreeMap<u32, usize> = BTreeMap::new();
    for pick in picks {
        *per_round.entry(pick.round).or_default() += 1;
    }

    let mut completed = 0;
    let mut round = 1;
    while per_round.get(&round).copied().unwrap_or(0) >= team_count {
        completed = round;
        round += 1;
    }
    completed
}
