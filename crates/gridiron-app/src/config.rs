// Configuration loading and parsing (league.toml, strategy.toml).

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use gridiron_core::cache::CacheSettings;
use gridiron_core::draft::player::Position;
use gridiron_core::recommend::Strategy;
use gridiron_core::rules::{DraftRules, RosterRules};
use gridiron_core::valuation::AnalysisTuning;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    /// Roster rules built from `[league]` starters, limits, and slots.
    pub roster: RosterRules,
    pub draft: DraftRules,
    pub sheet: SheetConfig,
    pub recommend: RecommendConfig,
    pub tuning: AnalysisTuning,
    pub cache: CacheSettings,
    pub poll: PollConfig,
    pub data_paths: DataPaths,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
    #[serde(default)]
    draft: DraftRules,
    sheet: SheetConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    pub num_teams: usize,
    /// Owner whose team receives recommendations.
    pub owner: String,
    /// Starters per lineup slot, keyed by position code (QB, RB, ..., FLEX).
    pub starters: BTreeMap<String, usize>,
    /// Maximum rostered players per position code.
    pub roster_limits: BTreeMap<String, usize>,
    #[serde(default = "default_bench_slots")]
    pub bench_slots: usize,
    #[serde(default = "default_ir_slots")]
    pub ir_slots: usize,
}

fn default_bench_slots() -> usize {
    7
}

fn default_ir_slots() -> usize {
    2
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetConfig {
    pub sheet_id: String,
    pub range: String,
}

// ---------------------------------------------------------------------------
// strategy.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire strategy.toml file.
#[derive(Debug, Clone, Deserialize)]
struct StrategyFile {
    recommend: RecommendSection,
    #[serde(default)]
    tuning: AnalysisTuning,
    #[serde(default)]
    cache: CacheSettings,
    poll: PollConfig,
    data_paths: DataPaths,
}

#[derive(Debug, Clone, Deserialize)]
struct RecommendSection {
    strategy: String,
    #[serde(default = "default_consider_bye_weeks")]
    consider_bye_weeks: bool,
}

fn default_consider_bye_weeks() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendConfig {
    pub strategy: Strategy,
    pub consider_bye_weeks: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    /// JSON snapshot of the draft board.
    pub draft_snapshot: String,
    /// Player rankings CSV.
    pub rankings: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` and
/// `config/strategy.toml`, relative to the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- league.toml (required) ---
    let league_path = config_dir.join("league.toml");
    let league_file: LeagueFile = parse_file(&league_path)?;

    // --- strategy.toml (required) ---
    let strategy_path = config_dir.join("strategy.toml");
    let strategy_file: StrategyFile = parse_file(&strategy_path)?;

    validate_league(&league_file)?;
    let roster = roster_rules(&league_file.league)?;

    let strategy = strategy_file
        .recommend
        .strategy
        .parse::<Strategy>()
        .map_err(|e| ConfigError::ValidationError {
            field: "recommend.strategy".into(),
            message: e.to_string(),
        })?;

    let config = Config {
        league: league_file.league,
        roster,
        draft: league_file.draft,
        sheet: league_file.sheet,
        recommend: RecommendConfig {
            strategy,
            consider_bye_weeks: strategy_file.recommend.consider_bye_weeks,
        },
        tuning: strategy_file.tuning,
        cache: strategy_file.cache,
        poll: strategy_file.poll,
        data_paths: strategy_file.data_paths,
    };

    validate(&config)?;

    Ok(config)
}

/// Files that make up a gridiron configuration, in load order.
pub const CONFIG_FILES: [&str; 2] = ["league.toml", "strategy.toml"];

/// Seed `config/` with any of [`CONFIG_FILES`] it is missing, taken from
/// `defaults/`. Files already in `config/` are left alone, and nothing else in
/// `defaults/` is looked at. Returns the files that were written.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    let missing: Vec<&str> = CONFIG_FILES
        .into_iter()
        .filter(|name| !config_dir.join(name).exists())
        .collect();
    if missing.is_empty() {
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("cannot create {}: {e}", config_dir.display()),
    })?;

    let mut seeded = Vec::with_capacity(missing.len());
    for name in missing {
        let source = defaults_dir.join(name);
        let target = config_dir.join(name);
        let mut from = std::fs::File::open(&source).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!(
                "config/{name} is missing and no default is available at {}: {e}",
                source.display()
            ),
        })?;
        // create_new: a file that appeared since the check above is kept.
        let mut to = match std::fs::OpenOptions::new().write(true).create_new(true).open(&target) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("cannot create {}: {e}", target.display()),
                })
            }
        };
        std::io::copy(&mut from, &mut to).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("cannot seed {} from defaults: {e}", target.display()),
        })?;
        seeded.push(target);
    }
    Ok(seeded)
}

/// Load `config/` under the working directory, seeding any missing league or
/// strategy file from `defaults/` first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn position_map(field: &str, raw: &BTreeMap<String, usize>) -> Result<BTreeMap<Position, usize>, ConfigError> {
    raw.iter()
        .map(|(code, count)| {
            Position::from_str_pos(code)
                .map(|pos| (pos, *count))
                .ok_or_else(|| ConfigError::ValidationError {
                    field: format!("{field}.{code}"),
                    message: "unknown position code".into(),
                })
        })
        .collect()
}

fn roster_rules(league: &LeagueConfig) -> Result<RosterRules, ConfigError> {
    let starters = position_map("league.starters", &league.starters)?;
    let limits = position_map("league.roster_limits", &league.roster_limits)?;
    if limits.contains_key(&Position::Flex) {
        return Err(ConfigError::ValidationError {
            field: "league.roster_limits.FLEX".into(),
            message: "FLEX is a lineup slot, not a rostered position".into(),
        });
    }
    Ok(RosterRules {
        starters,
        limits,
        bench_slots: league.bench_slots,
        ir_slots: league.ir_slots,
        ..RosterRules::default()
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_league(file: &LeagueFile) -> Result<(), ConfigError> {
    if file.league.num_teams == 0 {
        return Err(ConfigError::ValidationError {
            field: "league.num_teams".into(),
            message: "must be greater than 0".into(),
        });
    }

    if file.league.owner.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "league.owner".into(),
            message: "must not be empty".into(),
        });
    }

    let draft = &file.draft;
    let round_fields: &[(&str, u32)] = &[
        ("draft.snake_start_round", draft.snake_start_round),
        ("draft.total_rounds", draft.total_rounds),
    ];
    for (name, val) in round_fields {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be greater than 0".into(),
            });
        }
    }

    Ok(())
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    let pct = config.tuning.starter_threshold_percentile;
    if !(pct > 0.0 && pct <= 1.0) {
        return Err(ConfigError::ValidationError {
            field: "tuning.starter_threshold_percentile".into(),
            message: format!("must be in (0.0, 1.0], got {pct}"),
        });
    }

    if config.tuning.tier_gap <= 0.0 {
        return Err(ConfigError::ValidationError {
            field: "tuning.tier_gap".into(),
            message: format!("must be > 0, got {}", config.tuning.tier_gap),
        });
    }

    if config.tuning.max_tiers == 0 {
        return Err(ConfigError::ValidationError {
            field: "tuning.max_tiers".into(),
            message: "must be > 0".into(),
        });
    }

    if config.poll.interval_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "poll.interval_secs".into(),
            message: "must be > 0".into(),
        });
    }

    if config.cache.max_rounds < config.draft.total_rounds {
        return Err(ConfigError::ValidationError {
            field: "cache.max_rounds".into(),
            message: format!(
                "board holds {} rounds but the draft has {}",
                config.cache.max_rounds, config.draft.total_rounds
            ),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
