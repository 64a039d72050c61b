// Boundaries to the outside world: the draft board reader and the player
// ranking source. The core never talks to a spreadsheet or ranking feed
// directly; it consumes these traits.

use async_trait::async_trait;
use thiserror::Error;

use crate::draft::pick::RawDraftRows;
use crate::draft::player::{Player, Position};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("{source_name} failed: {message}")]
    Upstream { source_name: String, message: String },
}

impl SourceError {
    pub fn upstream(source_name: impl Into<String>, message: impl ToString) -> Self {
        SourceError::Upstream {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }
}

/// Reads raw, unvalidated rows for a range of a draft board.
#[async_trait]
pub trait RawStateReader: Send + Sync {
    async fn read_rows(&self, sheet_id: &str, range: &str) -> Result<RawDraftRows, SourceError>;
}

/// Supplies ranked players. `position` narrows the result; `refresh` asks
/// the source to bypass anything it has cached.
#[async_trait]
pub trait RankingSource: Send + Sync {
    async fn fetch_players(&self, position: Option<Position>, refresh: bool) -> Result<Vec<Player>, SourceError>;
}
