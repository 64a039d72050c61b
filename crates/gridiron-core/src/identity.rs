// Player identity normalization.
//
// Draft boards and ranking sites spell the same player differently
// ("Travis Etienne Jr.  JAC" vs "Travis Etienne" / "JAX"). Every comparison
// between a drafted player and a ranked player goes through this module.
//
// Canonical name: lowercase, parenthesised text removed, `.` `'` `-` `,`
// removed, generational suffix tokens dropped, single-space joined.
// Canonical team: uppercase code mapped through a static synonym table.

use std::collections::HashMap;

use crate::draft::player::Player;
use crate::draft::state::DraftState;

/// Canonical NFL team codes.
const TEAM_CODES: &[&str] = &[
    "ARI", "ATL", "BAL", "BUF", "CAR", "CHI", "CIN", "CLE", "DAL", "DEN", "DET", "GB", "HOU",
    "IND", "JAC", "KC", "LAC", "LAR", "LV", "MIA", "MIN", "NE", "NO", "NYG", "NYJ", "PHI", "PIT",
    "SEA", "SF", "TB", "TEN", "WAS",
];

/// Alternate spellings seen across ranking sources, mapped to canonical codes.
const TEAM_SYNONYMS: &[(&str, &str)] = &[
    ("GBP", "GB"),
    ("KCC", "KC"),
    ("LVR", "LV"),
    ("OAK", "LV"),
    ("NEP", "NE"),
    ("NOS", "NO"),
    ("SFO", "SF"),
    ("TBB", "TB"),
    ("JAX", "JAC"),
    ("WSH", "WAS"),
    ("LA", "LAR"),
    ("STL", "LAR"),
    ("SD", "LAC"),
];

/// Tokens dropped from the end of names.
const NAME_SUFFIXES: &[&str] = &["jr", "sr", "ii", "iii", "iv", "v"];

/// Map a team code to its canonical form.
///
/// Free agents and blanks (`FA`, `UNK`, empty) have no team. Codes outside
/// the table pass through uppercased.
pub fn canonical_team(code: &str) -> Option<String> {
    let upper = code.trim().to_uppercase();
    match upper.as_str() {
        "" | "FA" | "UNK" | "N/A" => None,
        other => {
            let mapped = TEAM_SYNONYMS
                .iter()
                .find(|(alias, _)| *alias == other)
                .map(|(_, canonical)| *canonical)
                .unwrap_or(other);
            Some(mapped.to_string())
        }
    }
}

/// Whether a token is a recognised NFL team code in any spelling.
pub fn is_team_code(token: &str) -> bool {
    let upper = token.trim().to_uppercase();
    TEAM_CODES.contains(&upper.as_str()) || TEAM_SYNONYMS.iter().any(|(alias, _)| *alias == upper)
}

/// Split a "Name Suffix   TEAM" cell into the name and canonical team.
///
/// Only a trailing token that is a known team code is treated as the team;
/// anything else stays part of the name.
pub fn split_name_team(raw: &str) -> (String, Option<String>) {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    match tokens.split_last() {
        Some((last, rest)) if !rest.is_empty() && is_team_code(last) => {
            (rest.join(" "), canonical_team(last))
        }
        _ => (tokens.join(" "), None),
    }
}

/// Canonical comparison form of a player name.
pub fn canonical_name(name: &str) -> String {
    let mut stripped = String::with_capacity(name.len());
    let mut depth = 0usize;
    for ch in name.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '.' | '\'' | '-' | ',' => {}
            _ if depth == 0 => stripped.extend(ch.to_lowercase()),
            _ => {}
        }
    }

    let mut tokens: Vec<&str> = stripped.split_whitespace().collect();
    while tokens.len() > 1 && tokens.last().is_some_and(|t| NAME_SUFFIXES.contains(t)) {
        tokens.pop();
    }
    tokens.join(" ")
}

/// Whether two (name, team) pairs refer to the same player. A missing team on
/// either side matches on name alone.
pub fn same_player(name_a: &str, team_a: Option<&str>, name_b: &str, team_b: Option<&str>) -> bool {
    if canonical_name(name_a) != canonical_name(name_b) {
        return false;
    }
    match (team_a.and_then(canonical_team), team_b.and_then(canonical_team)) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

// ---------------------------------------------------------------------------
// Drafted-player index
// ---------------------------------------------------------------------------

/// Lookup of every drafted player by canonical name.
#[derive(Debug, Default)]
pub struct DraftedIndex {
    /// canonical name -> canonical teams it was drafted with (None = unknown)
    by_name: HashMap<String, Vec<Option<String>>>,
}

impl DraftedIndex {
    pub fn from_state(state: &DraftState) -> Self {
        let mut index = DraftedIndex::default();
        for pick in &state.picks {
            let (name, team) = split_name_team(&pick.player_name);
            index.insert(&name, team);
        }
        index
    }

    pub fn insert(&mut self, name: &str, team: Option<String>) {
        self.by_name
            .entry(canonical_name(name))
            .or_default()
            .push(team.as_deref().and_then(canonical_team));
    }

    pub fn len(&self) -> usize {
        self.by_name.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Whether a ranked player has already been drafted.
    pub fn is_drafted(&self, player: &Player) -> bool {
        let Some(teams) = self.by_name.get(&canonical_name(&player.name)) else {
            return false;
        };
        let candidate_team = canonical_team(&player.team);
        teams.iter().any(|drafted_team| match (drafted_team, &candidate_team) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        })
    }
}

/// The subset of `pool` nobody has drafted yet.
pub fn filter_available(pool: &[Player], state: &DraftState) -> Vec<Player> {
    let index = DraftedIndex::from_state(state);
    pool.iter().filter(|p| !index.is_drafted(p)).cloned().collect()
}
