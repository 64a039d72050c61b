// Incremental draft-state cache.
//
// Holds the last reconciled draft state per (sheet, range) and tracks how many
// rounds of each sheet are known complete. Completed rounds never change once
// every team has picked in them, so a poll only needs to re-read rows from the
// first incomplete round onward.
//
// Invalidation is driven purely by round completeness: there is no TTL and
// no eviction. Entries live until the owning process clears them.

pub mod range;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::draft::pick::Pick;
use crate::draft::state::DraftState;

pub use range::SheetRange;

// ---------------------------------------------------------------------------
// Settings and entry types
// ---------------------------------------------------------------------------

/// Sheet layout constants used for range narrowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Rows above round 1; round N's data starts at row N + header_rows.
    pub header_rows: u32,
    /// Most rounds the board supports.
    pub max_rounds: u32,
}

impl Default for CacheSettings {
    fn default() -> Self {
        CacheSettings {
            header_rows: 4,
            max_rounds: 20,
        }
    }
}

/// A cached, fully reconciled draft state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftCacheEntry {
    pub state: DraftState,
    pub cached_at: DateTime<Utc>,
    pub completed_rounds: u32,
    pub total_picks: usize,
}

impl DraftCacheEntry {
    fn new(state: DraftState) -> Self {
        DraftCacheEntry {
            completed_rounds: state.completed_rounds(),
            total_picks: state.picks.len(),
            cached_at: Utc::now(),
            state,
        }
    }
}

/// How the next poll of a sheet should read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadPlan {
    pub incremental: bool,
    pub first_round: u32,
}

impl ReadPlan {
    pub const FULL: ReadPlan = ReadPlan {
        incremental: false,
        first_round: 1,
    };
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SheetStats {
    pub completed_rounds: u32,
    pub ranges: Vec<String>,
    pub cached_picks: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub sheets: BTreeMap<String, SheetStats>,
}

/// Everything cached for one sheet identity.
#[derive(Debug, Default)]
struct SheetSlot {
    /// Highest completed-rounds value seen for this sheet.
    completed_rounds: u32,
    /// Range descriptor -> cached entry.
    entries: HashMap<String, DraftCacheEntry>,
}

// ---------------------------------------------------------------------------
// StateCache
// ---------------------------------------------------------------------------

/// Process-wide draft cache, shared by `Arc` between pollers.
///
/// Each sheet has its own lock, so operations on one sheet never wait on
/// another. Cache operations do not fail: a miss is `None` and a poisoned
/// lock is recovered rather than surfaced.
#[derive(Debug, Default)]
pub struct StateCache {
    settings: CacheSettings,
    sheets: Mutex<HashMap<String, Arc<Mutex<SheetSlot>>>>,
}

impl StateCache {
    pub fn new(settings: CacheSettings) -> Self {
        StateCache {
            settings,
            sheets: Mutex::new(HashMap::new()),
        }
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    /// The cached entry for `(sheet_id, range)`, if any.
    pub fn get(&self, sheet_id: &str, range: &str) -> Option<DraftCacheEntry> {
        let slot = self.existing_slot(sheet_id)?;
        let slot = lock(&slot);
        let hit = slot.entries.get(range).cloned();
        match &hit {
            Some(entry) => debug!(
                "Cache hit for {sheet_id}/{range}: {} picks, {} completed rounds",
                entry.total_picks, entry.completed_rounds
            ),
            None => debug!("Cache miss for {sheet_id}/{range}"),
        }
        hit
    }

    /// Store a freshly read full state.
    pub fn update(&self, sheet_id: &str, range: &str, state: DraftState) {
        let slot = self.slot(sheet_id);
        let mut slot = lock(&slot);
        let entry = DraftCacheEntry::new(state);
        record_completed(&mut slot, sheet_id, entry.completed_rounds);
        info!(
            "Cached {sheet_id}/{range}: {} picks, {} completed rounds",
            entry.total_picks, entry.completed_rounds
        );
        slot.entries.insert(range.to_string(), entry);
    }

    /// Decide between a full and an incremental read.
    ///
    /// A forced read resets the sheet's completed rounds to zero. Without a
    /// cached entry or any completed round the read is full from round 1;
    /// otherwise only rounds after the last completed one are read.
    pub fn plan_read(&self, sheet_id: &str, range: &str, force_full: bool) -> ReadPlan {
        let slot = self.slot(sheet_id);
        let mut slot = lock(&slot);

        if force_full {
            info!("Forced full read of {sheet_id}; completed rounds reset");
            slot.completed_rounds = 0;
            return ReadPlan::FULL;
        }

        if !slot.entries.contains_key(range) || slot.completed_rounds == 0 {
            debug!("Full read planned for {sheet_id}/{range}");
            return ReadPlan::FULL;
        }

        let plan = ReadPlan {
            incremental: true,
            first_round: slot.completed_rounds + 1,
        };
        debug!(
            "Incremental read planned for {sheet_id}/{range} from round {}",
            plan.first_round
        );
        plan
    }

    /// Narrow `range` to the rows from `first_round` onward. Unparseable
    /// descriptors come back unchanged, which degrades to a full read.
    pub fn incremental_range(&self, sheet_id: &str, range: &str, first_round: u32) -> String {
        let Some(parsed) = SheetRange::parse(range) else {
            warn!("Unparseable range '{range}' for {sheet_id}; reading it in full");
            return range.to_string();
        };
        let end_row = self.settings.max_rounds + self.settings.header_rows;
        let start_row = (first_round + self.settings.header_rows).min(end_row);
        parsed.with_rows(start_row, end_row).to_string()
    }

    /// Fold newly read picks into a cached state and store the result.
    ///
    /// Picks whose number is already present are ignored, so replaying the
    /// same read is a no-op. New picks are applied to their team's roster;
    /// every other field of `cached` is carried over as is.
    pub fn merge(&self, sheet_id: &str, range: &str, cached: &DraftState, new_picks: Vec<Pick>) -> DraftState {
        let slot = self.slot(sheet_id);
        let mut slot = lock(&slot);

        let mut merged = cached.clone();
        let mut seen: HashSet<u32> = merged.picks.iter().map(|p| p.pick_number).collect();
        let mut added = 0usize;
        for pick in new_picks {
            if seen.insert(pick.pick_number) {
                merged.apply_pick(pick);
                added += 1;
            }
        }
        merged.picks.sort_by_key(|p| p.pick_number);

        let entry = DraftCacheEntry::new(merged.clone());
        record_completed(&mut slot, sheet_id, entry.completed_rounds);
        info!(
            "Merged {added} new picks into {sheet_id}/{range}: {} total, {} completed rounds",
            entry.total_picks, entry.completed_rounds
        );
        slot.entries.insert(range.to_string(), entry);
        merged
    }

    /// Drop cached data.
    ///
    /// - `(Some(sheet), Some(range))`: that entry; when one was removed the
    ///   sheet's completed rounds reset to zero.
    /// - `(Some(sheet), None)`: everything for that sheet.
    /// - `(None, Some(range))`: that range on every sheet.
    /// - `(None, None)`: everything.
    pub fn clear(&self, sheet_id: Option<&str>, range: Option<&str>) {
        let mut sheets = lock(&self.sheets);
        match (sheet_id, range) {
            (Some(sheet), Some(range)) => {
                if let Some(slot) = sheets.get(sheet) {
                    let mut slot = lock(slot);
                    if slot.entries.remove(range).is_some() {
                        slot.completed_rounds = 0;
                    }
                }
            }
            (Some(sheet), None) => {
                sheets.remove(sheet);
            }
            (None, Some(range)) => {
                for slot in sheets.values() {
                    let mut slot = lock(slot);
                    if slot.entries.remove(range).is_some() {
                        slot.completed_rounds = 0;
                    }
                }
            }
            (None, None) => sheets.clear(),
        }
        info!("Cache cleared (sheet={sheet_id:?}, range={range:?})");
    }

    /// Highest completed-rounds value recorded for a sheet (0 if unknown).
    pub fn completed_rounds(&self, sheet_id: &str) -> u32 {
        match self.existing_slot(sheet_id) {
            Some(slot) => {
                let completed = lock(&slot).completed_rounds;
                completed
            }
            None => 0,
        }
    }

    pub fn stats(&self) -> CacheStats {
        let sheets = lock(&self.sheets);
        let mut stats = CacheStats::default();
        for (sheet_id, slot) in sheets.iter() {
            let slot = lock(slot);
            let mut ranges: Vec<String> = slot.entries.keys().cloned().collect();
            ranges.sort();
            stats.total_entries += slot.entries.len();
            stats.sheets.insert(
                sheet_id.clone(),
                SheetStats {
                    completed_rounds: slot.completed_rounds,
                    ranges,
                    cached_picks: slot.entries.values().map(|e| e.total_picks).sum(),
                },
            );
        }
        stats
    }

    // -- internals ----------------------------------------------------------

    fn existing_slot(&self, sheet_id: &str) -> Option<Arc<Mutex<SheetSlot>>> {
        lock(&self.sheets).get(sheet_id).cloned()
    }

    fn slot(&self, sheet_id: &str) -> Arc<Mutex<SheetSlot>> {
        lock(&self.sheets)
            .entry(sheet_id.to_string())
            .or_default()
            .clone()
    }
}

/// Completed rounds only move forward between resets.
fn record_completed(slot: &mut SheetSlot, sheet_id: &str, computed: u32) {
    if computed < slot.completed_rounds {
        warn!(
            "Sheet {sheet_id} reports {computed} completed rounds, below the recorded {}; keeping the higher value",
            slot.completed_rounds
        );
        return;
    }
    slot.completed_rounds = computed;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
