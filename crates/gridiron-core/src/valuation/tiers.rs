// Score-gap tiering of a player pool.

use super::LeagueAnalyzer;
use crate::draft::player::Player;

/// Display labels by zero-based tier index.
const TIER_LABELS: &[&str] = &["Elite", "Tier 1", "Tier 2", "Tier 3", "Tier 4"];

/// Split players into tiers by score.
///
/// Players are sorted by average score, highest first; a new tier starts
/// whenever the drop from the previous player exceeds `gap`, with at most
/// `max_tiers - 1` splits. Unscored players are left out.
pub fn positional_tiers(players: &[Player], max_tiers: usize, gap: f64) -> Vec<Vec<Player>> {
    if max_tiers == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(f64, &Player)> = players
        .iter()
        .filter_map(|p| p.average_score().map(|s| (s, p)))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut tiers: Vec<Vec<Player>> = Vec::new();
    let mut current: Vec<Player> = Vec::new();
    let mut prev_score: Option<f64> = None;

    for (score, player) in scored {
        if let Some(prev) = prev_score {
            if prev - score > gap && tiers.len() < max_tiers - 1 {
                tiers.push(std::mem::take(&mut current));
            }
        }
        current.push(player.clone());
        prev_score = Some(score);
    }
    if !current.is_empty() {
        tiers.push(current);
    }
    tiers.truncate(max_tiers);
    tiers
}

/// Zero-based tier index of `player`, if it appears in `tiers`.
pub fn tier_index(tiers: &[Vec<Player>], player: &Player) -> Option<usize> {
    tiers.iter().position(|tier| tier.contains(player))
}

pub fn tier_label(index: usize) -> &'static str {
    TIER_LABELS.get(index).copied().unwrap_or("Depth")
}

impl LeagueAnalyzer {
    /// Tiers using the configured gap and tier cap.
    pub fn positional_tiers(&self, players: &[Player]) -> Vec<Vec<Player>> {
        positional_tiers(players, self.tuning.max_tiers, self.tuning.tier_gap)
    }
}
