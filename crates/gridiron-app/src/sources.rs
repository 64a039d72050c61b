// File-backed collaborators: a JSON snapshot of the draft board and a
// rankings CSV with one row per (player, source).

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use gridiron_core::cache::SheetRange;
use gridiron_core::draft::pick::RawDraftRows;
use gridiron_core::draft::player::{InjuryStatus, Player, Position, SourceRanking};
use gridiron_core::identity;
use gridiron_core::sources::{RankingSource, RawStateReader, SourceError};

const SNAPSHOT_SOURCE: &str = "draft snapshot";
const RANKINGS_SOURCE: &str = "rankings csv";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SourceLoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Draft board snapshot
// ---------------------------------------------------------------------------

/// On-disk board: the raw rows plus, optionally, the sheet they belong to.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftSnapshot {
    #[serde(default)]
    pub sheet_id: Option<String>,
    #[serde(flatten)]
    pub rows: RawDraftRows,
}

pub async fn load_snapshot(path: &Path) -> Result<DraftSnapshot, SourceLoadError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SourceLoadError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
    serde_json::from_str(&text).map_err(|e| SourceLoadError::Json {
        path: path.display().to_string(),
        source: e,
    })
}

/// Keep only the pick rows a sheet read of `range` would return: round N
/// lives on row N + `header_rows`. Rows without a round are kept so the
/// reconciler can reject them. Team rows and metadata always come back.
pub fn rows_in_range(mut rows: RawDraftRows, range: &str, header_rows: u32) -> RawDraftRows {
    let Some(range) = SheetRange::parse(range) else {
        return rows;
    };
    rows.picks.retain(|p| match p.round {
        Some(round) => (range.start_row..=range.end_row).contains(&(round + header_rows)),
        None => true,
    });
    rows
}

/// Serves board reads from a snapshot file, re-read on every call so edits
/// to the file show up on the next poll.
pub struct SnapshotReader {
    path: PathBuf,
    header_rows: u32,
}

impl SnapshotReader {
    pub fn new(path: impl Into<PathBuf>, header_rows: u32) -> Self {
        SnapshotReader {
            path: path.into(),
            header_rows,
        }
    }
}

#[async_trait]
impl RawStateReader for SnapshotReader {
    async fn read_rows(&self, sheet_id: &str, range: &str) -> Result<RawDraftRows, SourceError> {
        let snapshot = load_snapshot(&self.path)
            .await
            .map_err(|e| SourceError::upstream(SNAPSHOT_SOURCE, e))?;
        if let Some(id) = snapshot.sheet_id.as_deref() {
            if id != sheet_id {
                return Err(SourceError::upstream(
                    SNAPSHOT_SOURCE,
                    format!("snapshot holds sheet '{id}', not '{sheet_id}'"),
                ));
            }
        }
        let rows = rows_in_range(snapshot.rows, range, self.header_rows);
        debug!("Snapshot read of {sheet_id}/{range}: {} pick rows", rows.picks.len());
        Ok(rows)
    }
}

// ---------------------------------------------------------------------------
// Rankings CSV
// ---------------------------------------------------------------------------

/// One ranking of one player by one source.
#[derive(Debug, Deserialize)]
struct RawRankingRow {
    name: String,
    position: String,
    #[serde(default)]
    team: String,
    #[serde(default)]
    bye_week: Option<u8>,
    source: String,
    rank: u32,
    score: f64,
    #[serde(default)]
    injury: Option<String>,
}

fn load_rankings_from_reader<R: Read>(rdr: R) -> Result<Vec<Player>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut players: Vec<Player> = Vec::new();
    let mut index: HashMap<(String, Position, String), usize> = HashMap::new();

    for result in reader.deserialize::<RawRankingRow>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed ranking row: {}", e);
                continue;
            }
        };
        let name = raw.name.trim();
        let Some(position) = Position::from_str_pos(&raw.position).filter(|p| *p != Position::Flex) else {
            warn!("skipping ranking for '{}': unknown position '{}'", name, raw.position);
            continue;
        };
        if !raw.score.is_finite() {
            warn!("skipping ranking for '{}': non-finite score", name);
            continue;
        }
        let team = identity::canonical_team(&raw.team).unwrap_or_default();

        let key = (identity::canonical_name(name), position, team.clone());
        let idx = *index.entry(key).or_insert_with(|| {
            players.push(Player::new(name, position, team, raw.bye_week.unwrap_or(0)));
            players.len() - 1
        });
        let player = &mut players[idx];

        let source = raw.source.trim().to_string();
        if player.rankings.contains_key(&source) {
            warn!("duplicate '{}' ranking for '{}', using latest value", source, name);
        }
        player.add_ranking(
            source,
            SourceRanking {
                rank: raw.rank,
                score: raw.score,
            },
        );
        if player.bye_week == 0 {
            player.bye_week = raw.bye_week.unwrap_or(0);
        }
        if let Some(status) = raw.injury.as_deref().filter(|s| !s.trim().is_empty()) {
            player.injury_status = InjuryStatus::from_str_status(status);
        }
    }
    Ok(players)
}

/// Load and aggregate a rankings CSV
/// (`name,position,team,bye_week,source,rank,score[,injury]`).
pub fn load_rankings(path: &Path) -> Result<Vec<Player>, SourceLoadError> {
    let file = std::fs::File::open(path).map_err(|e| SourceLoadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let players = load_rankings_from_reader(file).map_err(|e| SourceLoadError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    if players.is_empty() {
        return Err(SourceLoadError::Validation(format!(
            "rankings CSV {} produced zero valid rows",
            path.display()
        )));
    }
    Ok(players)
}

/// Rankings served from a CSV file, loaded once and kept until a refresh.
pub struct CsvRankings {
    path: PathBuf,
    players: Mutex<Option<Vec<Player>>>,
}

impl CsvRankings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvRankings {
            path: path.into(),
            players: Mutex::new(None),
        }
    }
}

#[async_trait]
impl RankingSource for CsvRankings {
    async fn fetch_players(&self, position: Option<Position>, refresh: bool) -> Result<Vec<Player>, SourceError> {
        let mut cached = self.players.lock().await;
        if refresh || cached.is_none() {
            let players = load_rankings(&self.path).map_err(|e| SourceError::upstream(RANKINGS_SOURCE, e))?;
            info!("Loaded {} ranked players from {}", players.len(), self.path.display());
            *cached = Some(players);
        }
        let players = cached.as_deref().unwrap_or_default();
        Ok(players
            .iter()
            .filter(|p| position.map_or(true, |pos| p.position == pos))
            .cloned()
            .collect())
    }
}

/// Re-fetch the full pool from `source`, bypassing its cache. On failure the
/// current pool is kept and `false` is returned.
pub async fn reload_pool(source: &dyn RankingSource, pool: &mut Vec<Player>) -> bool {
    match source.fetch_players(None, true).await {
        Ok(players) => {
            debug!("Ranking pool reloaded: {} -> {} players", pool.len(), players.len());
            *pool = players;
            true
        }
        Err(e) => {
            warn!("Rankings reload failed, keeping {} cached players: {}", pool.len(), e);
            false
        }
    }
}
