// Pick records and the raw-row reconciliation boundary.
//
// Sheet reads arrive as loosely-typed rows. Everything is validated here so
// the scoring engine only ever sees complete `Pick` and `Team` records.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::player::{Player, Position};
use crate::identity;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("pick row {row} names a player but is missing `{field}`")]
    MalformedPick { row: usize, field: &'static str },

    #[error("team row {row} is missing `{field}`")]
    MalformedTeam { row: usize, field: &'static str },
}

// ---------------------------------------------------------------------------
// Raw rows (as supplied by the state reader)
// ---------------------------------------------------------------------------

/// One cell-group of the draft board, every field optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPickRow {
    #[serde(default)]
    pub pick_number: Option<u32>,
    #[serde(default)]
    pub round: Option<u32>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub player: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub bye_week: Option<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTeamRow {
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub team_number: Option<u32>,
}

/// Everything one read of the draft sheet returns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDraftRows {
    #[serde(default)]
    pub picks: Vec<RawPickRow>,
    #[serde(default)]
    pub teams: Vec<RawTeamRow>,
    /// Round the sheet itself reports as current, if it tracks one.
    #[serde(default)]
    pub current_round: Option<u32>,
}

// ---------------------------------------------------------------------------
// Pick
// ---------------------------------------------------------------------------

/// A completed draft selection. Pick numbers are unique within a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    pub pick_number: u32,
    pub round: u32,
    /// Fantasy team that made the pick.
    pub team: String,
    /// Player cell as written on the sheet, e.g. "Travis Etienne Jr.  JAC".
    pub player_name: String,
    pub position: Position,
    /// Bye week, 0 when the sheet does not record one.
    pub bye_week: u8,
}

impl Pick {
    /// Validate a raw row. Rows with an empty player cell are unfilled board
    /// slots and yield `Ok(None)`.
    pub fn from_raw(row: usize, raw: &RawPickRow) -> Result<Option<Pick>, ReconcileError> {
        let player_name = match raw.player.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => return Ok(None),
        };

        let pick_number = raw
            .pick_number
            .ok_or(ReconcileError::MalformedPick { row, field: "pick_number" })?;
        let round = raw
            .round
            .filter(|r| *r > 0)
            .ok_or(ReconcileError::MalformedPick { row, field: "round" })?;
        let team = raw
            .team
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ReconcileError::MalformedPick { row, field: "team" })?
            .to_string();
        let position = raw
            .position
            .as_deref()
            .and_then(Position::from_str_pos)
            .filter(|p| *p != Position::Flex)
            .ok_or(ReconcileError::MalformedPick { row, field: "position" })?;

        Ok(Some(Pick {
            pick_number,
            round,
            team,
            player_name,
            position,
            bye_week: raw.bye_week.unwrap_or(0),
        }))
    }

    /// The drafted player as a roster entry. Drafted players carry no ranking
    /// data; the NFL team is split off the player cell when present.
    pub fn to_player(&self) -> Player {
        let (name, team) = identity::split_name_team(&self.player_name);
        Player::new(name, self.position, team.unwrap_or_default(), self.bye_week)
    }
}

/// Validate every raw pick row, dropping unfilled slots.
pub fn reconcile_picks(rows: &[RawPickRow]) -> Result<Vec<Pick>, ReconcileError> {
    let mut picks = Vec::with_capacity(rows.len());
    for (idx, raw) in rows.iter().enumerate() {
        if let Some(pick) = Pick::from_raw(idx, raw)? {
            picks.push(pick);
        }
    }
    debug!("Reconciled {} picks from {} raw rows", picks.len(), rows.len());
    Ok(picks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pick: u32, round: u32, team: &str, player: &str, pos: &str) -> RawPickRow {
        RawPickRow {
            pick_number: Some(pick),
            round: Some(round),
            team: Some(team.into()),
            player: Some(player.into()),
            position: Some(pos.into()),
            bye_week: Some(9),
        }
    }

    #[test]
    fn valid_row_converts() {
        let pick = Pick::from_raw(0, &raw(3, 1, "Gridiron Gang", "CeeDee Lamb DAL", "WR"))
            .unwrap()
            .unwrap();
        assert_eq!(pick.pick_number, 3);
        assert_eq!(pick.position, Position::WideReceiver);
        assert_eq!(pick.bye_week, 9);
    }

    #[test]
    fn empty_player_cell_is_skipped() {
        let mut row = raw(4, 1, "Team", "   ", "RB");
        assert_eq!(Pick::from_raw(0, &row), Ok(None));
        row.player = None;
        row.pick_number = None;
        assert_eq!(Pick::from_raw(0, &row), Ok(None));
    }

    #[test]
    fn missing_pick_number_is_rejected() {
        let mut row = raw(4, 1, "Team", "Saquon Barkley PHI", "RB");
        row.pick_number = None;
        assert_eq!(
            Pick::from_raw(7, &row),
            Err(ReconcileError::MalformedPick { row: 7, field: "pick_number" })
        );
    }

    #[test]
    fn unknown_position_is_rejected() {
        let row = raw(4, 1, "Team", "Some Linebacker", "LB");
        assert!(matches!(
            Pick::from_raw(0, &row),
            Err(ReconcileError::MalformedPick { field: "position", .. })
        ));
    }

    #[test]
    fn missing_bye_defaults_to_zero() {
        let mut row = raw(4, 1, "Team", "Saquon Barkley PHI", "RB");
        row.bye_week = None;
        assert_eq!(Pick::from_raw(0, &row).unwrap().unwrap().bye_week, 0);
    }

    #[test]
    fn to_player_splits_team_code() {
        let pick = Pick::from_raw(0, &raw(1, 1, "Team", "Travis Etienne Jr.  JAC", "RB"))
            .unwrap()
            .unwrap();
        let player = pick.to_player();
        assert_eq!(player.name, "Travis Etienne Jr.");
        assert_eq!(player.team, "JAC");
        assert_eq!(player.bye_week, 9);
    }

    #[test]
    fn reconcile_skips_blanks_and_keeps_order() {
        let rows = vec![
            raw(1, 1, "A", "Player One", "QB"),
            RawPickRow::default(),
            raw(2, 1, "B", "Player Two", "TE"),
        ];
        let picks = reconcile_picks(&rows).unwrap();
        assert_eq!(picks.len(), 2);
        assert_eq!(picks[1].pick_number, 2);
    }
}
