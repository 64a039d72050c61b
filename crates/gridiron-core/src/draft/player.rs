// Player identity, positions, and per-source ranking data.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Football roster positions. `Flex` is a lineup slot, never a player's own
/// position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "QB")]
    Quarterback,
    #[serde(rename = "RB")]
    RunningBack,
    #[serde(rename = "WR")]
    WideReceiver,
    #[serde(rename = "TE")]
    TightEnd,
    #[serde(rename = "K")]
    Kicker,
    #[serde(rename = "DST")]
    Defense,
    #[serde(rename = "FLEX")]
    Flex,
}

/// Positions a player can actually be drafted at, in display order.
pub const DRAFTABLE_POSITIONS: &[Position] = &[
    Position::Quarterback,
    Position::RunningBack,
    Position::WideReceiver,
    Position::TightEnd,
    Position::Kicker,
    Position::Defense,
];

impl Position {
    /// Parse a position string into a Position enum.
    ///
    /// Handles the common sheet and ranking-site spellings:
    /// - "D/ST", "DEF", "D" -> Defense
    /// - "PK" -> Kicker
    /// - "W/R/T" -> Flex
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "K" | "PK" => Some(Position::Kicker),
            "DST" | "D/ST" | "DEF" | "D" => Some(Position::Defense),
            "FLEX" | "W/R/T" => Some(Position::Flex),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
            Position::Defense => "DST",
            Position::Flex => "FLEX",
        }
    }

    /// Deterministic ordering index for roster display.
    pub fn sort_order(&self) -> u8 {
        match self {
            Position::Quarterback => 0,
            Position::RunningBack => 1,
            Position::WideReceiver => 2,
            Position::TightEnd => 3,
            Position::Flex => 4,
            Position::Kicker => 5,
            Position::Defense => 6,
        }
    }

    /// Kickers and defenses are conventionally left to the last rounds.
    pub fn is_late_round_position(&self) -> bool {
        matches!(self, Position::Kicker | Position::Defense)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Injury status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InjuryStatus {
    #[default]
    Healthy,
    Probable,
    Questionable,
    Doubtful,
    Out,
}

impl InjuryStatus {
    /// Parse an injury designation. Unknown or empty strings are healthy.
    pub fn from_str_status(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "P" | "PROBABLE" => InjuryStatus::Probable,
            "Q" | "QUESTIONABLE" => InjuryStatus::Questionable,
            "D" | "DOUBTFUL" => InjuryStatus::Doubtful,
            "O" | "OUT" | "IR" => InjuryStatus::Out,
            _ => InjuryStatus::Healthy,
        }
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// One ranking source's opinion of a player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceRanking {
    pub rank: u32,
    pub score: f64,
}

/// A football player as seen by the draft engine.
///
/// Equality and hashing use only `(name, position, team)`, so the same player
/// keeps its identity across ranking refreshes and injury updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub position: Position,
    /// NFL team code, empty when unknown (free agents).
    pub team: String,
    /// Bye week number, 0 when unknown.
    pub bye_week: u8,
    #[serde(default)]
    pub injury_status: InjuryStatus,
    /// Ranking source identifier -> that source's rank and score.
    #[serde(default)]
    pub rankings: BTreeMap<String, SourceRanking>,
}

impl Player {
    pub fn new(name: impl Into<String>, position: Position, team: impl Into<String>, bye_week: u8) -> Self {
        Player {
            name: name.into(),
            position,
            team: team.into(),
            bye_week,
            injury_status: InjuryStatus::Healthy,
            rankings: BTreeMap::new(),
        }
    }

    /// Builder-style helper that records one source's ranking.
    pub fn with_ranking(mut self, source: impl Into<String>, rank: u32, score: f64) -> Self {
        self.add_ranking(source, SourceRanking { rank, score });
        self
    }

    /// Record a source's ranking. A source contributes at most one entry, so a
    /// second call for the same source replaces the first.
    pub fn add_ranking(&mut self, source: impl Into<String>, ranking: SourceRanking) {
        self.rankings.insert(source.into(), ranking);
    }

    /// Mean rank across sources; `None` when no source ranks this player.
    pub fn average_rank(&self) -> Option<f64> {
        if self.rankings.is_empty() {
            return None;
        }
        let total: f64 = self.rankings.values().map(|r| r.rank as f64).sum();
        Some(total / self.rankings.len() as f64)
    }

    /// Mean score across sources; `None` when no source scores this player.
    pub fn average_score(&self) -> Option<f64> {
        if self.rankings.is_empty() {
            return None;
        }
        let total: f64 = self.rankings.values().map(|r| r.score).sum();
        Some(total / self.rankings.len() as f64)
    }

    /// Highest score any single source gives this player.
    pub fn ceiling_score(&self) -> Option<f64> {
        self.rankings.values().map(|r| r.score).reduce(f64::max)
    }

    /// Lowest score any single source gives this player.
    pub fn floor_score(&self) -> Option<f64> {
        self.rankings.values().map(|r| r.score).reduce(f64::min)
    }

    pub fn is_injured(&self) -> bool {
        matches!(
            self.injury_status,
            InjuryStatus::Questionable | InjuryStatus::Doubtful | InjuryStatus::Out
        )
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.position == other.position && self.team == other.team
    }
}

impl Eq for Player {}

impl Hash for Player {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.position.hash(state);
        self.team.hash(state);
    }
}
