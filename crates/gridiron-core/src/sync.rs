// Poll pipeline: plan a read, fetch rows, reconcile, and fold the result into
// the shared cache.
//
// One refresh per sheet runs at a time. The sheet's async guard is held from
// planning through the cache write so two racing polls cannot both merge
// against the same stale entry; different sheets never wait on each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::StateCache;
use crate::draft::pick::{reconcile_picks, ReconcileError};
use crate::draft::state::DraftState;
use crate::sources::{RawStateReader, SourceError};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("reading draft rows failed: {0}")]
    Source(#[from] SourceError),

    #[error("draft rows could not be reconciled: {0}")]
    Reconcile(#[from] ReconcileError),
}

/// Result of one refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOutcome {
    pub state: DraftState,
    /// Whether only the rows after the completed rounds were read.
    pub incremental: bool,
    /// The range actually requested from the reader.
    pub range_read: String,
    /// Picks present in the rows that were read.
    pub picks_read: usize,
    pub completed_rounds: u32,
}

pub struct DraftSync {
    cache: Arc<StateCache>,
    /// Configured team count, used when a sheet lists no team rows.
    league_size: Option<usize>,
    guards: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl DraftSync {
    pub fn new(cache: Arc<StateCache>) -> Self {
        DraftSync {
            cache,
            league_size: None,
            guards: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_league_size(mut self, teams: usize) -> Self {
        self.league_size = (teams > 0).then_some(teams);
        self
    }

    pub fn cache(&self) -> &Arc<StateCache> {
        &self.cache
    }

    /// Bring the cached state of `(sheet_id, range)` up to date.
    pub async fn refresh(
        &self,
        reader: &dyn RawStateReader,
        sheet_id: &str,
        range: &str,
        force_full: bool,
    ) -> Result<SyncOutcome, SyncError> {
        let guard = self.guard(sheet_id);
        let _held = guard.lock().await;

        let plan = self.cache.plan_read(sheet_id, range, force_full);
        if plan.incremental {
            if let Some(entry) = self.cache.get(sheet_id, range) {
                let narrowed = self.cache.incremental_range(sheet_id, range, plan.first_round);
                debug!("Reading {sheet_id} rows {narrowed}");
                let raw = reader.read_rows(sheet_id, &narrowed).await?;
                let picks = reconcile_picks(&raw.picks)?;
                let picks_read = picks.len();

                let mut base = entry.state;
                if raw.current_round.is_some() {
                    base.metadata.current_round = raw.current_round;
                }
                base.metadata.read_at = Some(Utc::now());

                let state = self.cache.merge(sheet_id, range, &base, picks);
                return Ok(SyncOutcome {
                    completed_rounds: self.cache.completed_rounds(sheet_id),
                    state,
                    incremental: true,
                    range_read: narrowed,
                    picks_read,
                });
            }
            warn!("Cached entry for {sheet_id}/{range} vanished before merge; reading in full");
        }

        let raw = reader.read_rows(sheet_id, range).await?;
        let state = DraftState::from_raw_for_league(&raw, self.league_size)?;
        let picks_read = state.picks.len();
        self.cache.update(sheet_id, range, state.clone());
        info!("Full read of {sheet_id}/{range}: {picks_read} picks");

        Ok(SyncOutcome {
            completed_rounds: self.cache.completed_rounds(sheet_id),
            state,
            incremental: false,
            range_read: range.to_string(),
            picks_read,
        })
    }

    fn guard(&self, sheet_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut guards = self.guards.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        guards.entry(sheet_id.to_string()).or_default().clone()
    }
}
