// Fantasy teams and their rosters.

use serde::{Deserialize, Serialize};

use super::pick::{RawTeamRow, ReconcileError};
use super::player::{Player, Position};

/// One owner's team. The roster is only ever changed by pick application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub team_name: String,
    pub owner: String,
    pub team_number: u32,
    #[serde(default)]
    pub roster: Vec<Player>,
}

impl Team {
    pub fn new(team_name: impl Into<String>, owner: impl Into<String>, team_number: u32) -> Self {
        Team {
            team_name: team_name.into(),
            owner: owner.into(),
            team_number,
            roster: Vec::new(),
        }
    }

    /// Validate a raw team row. Rows with no team name are blank and yield
    /// `Ok(None)`; a missing owner is tolerated as an empty string.
    pub fn from_raw(row: usize, raw: &RawTeamRow) -> Result<Option<Team>, ReconcileError> {
        let name = match raw.team_name.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => return Ok(None),
        };
        let number = raw
            .team_number
            .ok_or(ReconcileError::MalformedTeam { row, field: "team_number" })?;
        let owner = raw.owner.as_deref().map(str::trim).unwrap_or_default();
        Ok(Some(Team::new(name, owner, number)))
    }

    /// Number of rostered players at a position.
    pub fn count_at(&self, position: Position) -> usize {
        self.roster.iter().filter(|p| p.position == position).count()
    }

    pub fn players_at(&self, position: Position) -> impl Iterator<Item = &Player> {
        self.roster.iter().filter(move |p| p.position == position)
    }
}
