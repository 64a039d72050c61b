// Draft poller entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, stdout carries recommendations)
// 2. Load config
// 3. Build the cache, sync pipeline, and recommender
// 4. Build the board reader and ranking source
// 5. Poll the board; print a recommendation whenever the pick count changes
// 6. Exit on Ctrl+C

use std::sync::Arc;
use std::time::Duration;

use gridiron_app::config::{self, Config};
use gridiron_app::sources::{self, CsvRankings, SnapshotReader};
use gridiron_core::cache::StateCache;
use gridiron_core::draft::player::Player;
use gridiron_core::recommend::PickRecommender;
use gridiron_core::sources::RankingSource;
use gridiron_core::sync::DraftSync;

use anyhow::Context;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Gridiron draft assistant starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, {} teams, owner={}, strategy={}",
        config.league.name, config.league.num_teams, config.league.owner, config.recommend.strategy
    );

    // 3. Core services
    let cache = Arc::new(StateCache::new(config.cache));
    let sync = DraftSync::new(Arc::clone(&cache)).with_league_size(config.league.num_teams);
    let recommender = PickRecommender::new(config.roster.clone(), config.draft.clone(), config.tuning.clone());

    // 4. Collaborators
    let reader = SnapshotReader::new(&config.data_paths.draft_snapshot, config.cache.header_rows);
    let rankings = CsvRankings::new(&config.data_paths.rankings);
    let mut pool = rankings
        .fetch_players(None, false)
        .await
        .context("failed to load player rankings")?;
    info!("Loaded {} ranked players", pool.len());

    // 5. Poll loop
    info!(
        "Polling {}/{} every {}s",
        config.sheet.sheet_id, config.sheet.range, config.poll.interval_secs
    );
    let mut interval = tokio::time::interval(Duration::from_secs(config.poll.interval_secs));
    let mut last_pick_count: Option<usize> = None;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, shutting down");
                break;
            }
            _ = interval.tick() => {
                if let Err(e) = poll_once(&config, &sync, &reader, &rankings, &recommender, &mut pool, &mut last_pick_count).await {
                    error!("Poll failed: {:#}", e);
                }
            }
        }
    }

    let stats = cache.stats();
    info!(
        "Gridiron shut down cleanly ({} cached entries across {} sheets)",
        stats.total_entries,
        stats.sheets.len()
    );
    Ok(())
}

/// One poll: refresh the board and, when new picks arrived, reload the
/// rankings and print the recommendation for the configured owner as JSON on
/// stdout. A failed rankings reload keeps the previous pool.
async fn poll_once(
    config: &Config,
    sync: &DraftSync,
    reader: &SnapshotReader,
    rankings: &CsvRankings,
    recommender: &PickRecommender,
    pool: &mut Vec<Player>,
    last_pick_count: &mut Option<usize>,
) -> anyhow::Result<()> {
    let outcome = sync
        .refresh(reader, &config.sheet.sheet_id, &config.sheet.range, false)
        .await
        .context("board refresh failed")?;

    let pick_count = outcome.state.picks.len();
    if *last_pick_count == Some(pick_count) {
        return Ok(());
    }
    *last_pick_count = Some(pick_count);
    info!(
        "Board now has {} picks ({} completed rounds, {} read)",
        pick_count,
        outcome.completed_rounds,
        if outcome.incremental { "incremental" } else { "full" }
    );

    sources::reload_pool(rankings, pool).await;

    match recommender.recommend(
        &outcome.state,
        &config.league.owner,
        pool.as_slice(),
        config.recommend.strategy.as_str(),
        config.recommend.consider_bye_weeks,
    ) {
        Ok(rec) => {
            let json = serde_json::to_string_pretty(&rec).context("failed to serialize recommendation")?;
            println!("{json}");
        }
        Err(e) => warn!("No recommendation for '{}': {}", config.league.owner, e),
    }
    Ok(())
}

/// Initialize tracing to log to `logs/gridiron.log`.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("gridiron.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gridiron=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("failed to set tracing subscriber")?;

    Ok(())
}
