//! Command-line entry point for the Courtside Elo rating service
//!
//! Runs the nightly single-day update, full historical rebuilds, and pick
//! generation against a JSON rating store and a directory of scoreboard
//! snapshots.

use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, Local, NaiveDate};
use clap::{Parser, Subcommand};
use courtside_elo::config::AppConfig;
use courtside_elo::feed::{DirectoryFeed, GameFeed};
use courtside_elo::metrics::ReplayMetrics;
use courtside_elo::prediction::{attach_market, best_price_map, predict_games, OddsEvent};
use courtside_elo::rating::RatingEngine;
use courtside_elo::replay::{cancel_pair, CancelHandle, ReplayOrchestrator};
use courtside_elo::store::{JsonFileStore, Store};
use courtside_elo::utils::parse_day;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

/// Courtside Elo - team ratings, historical replay and daily picks
#[derive(Parser)]
#[command(
    name = "courtside-elo",
    version,
    about = "Elo ratings for college basketball with deterministic historical replay",
    long_about = "Courtside Elo maintains one Elo rating per team from daily final scores, \
                 can rebuild every rating from a date range of scoreboard snapshots, and \
                 ranks upcoming games by win probability."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Store path override
    #[arg(long, value_name = "FILE", help = "Override the rating store file")]
    store: Option<PathBuf>,

    /// Feed directory override
    #[arg(long, value_name = "DIR", help = "Override the scoreboard snapshot directory")]
    feed_dir: Option<PathBuf>,

    /// Print Prometheus metrics after the command
    #[arg(long, help = "Print metrics in Prometheus text format when done")]
    print_metrics: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without running the command")]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply one day of final scores (defaults to yesterday)
    ApplyDay {
        #[arg(long, value_name = "YYYY-MM-DD")]
        day: Option<String>,
        /// Re-apply even if the day is already in the ledger
        #[arg(long)]
        force: bool,
    },
    /// Reset every rating and replay a date range
    Rebuild {
        #[arg(long, value_name = "YYYY-MM-DD")]
        start: String,
        #[arg(long, value_name = "YYYY-MM-DD")]
        end: String,
        /// Pause between days in milliseconds
        #[arg(long, value_name = "MS")]
        delay_ms: Option<u64>,
    },
    /// Rank upcoming games by win probability (defaults to today)
    Predict {
        #[arg(long, value_name = "YYYY-MM-DD")]
        day: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
        /// Saved Odds API response to compare picks against
        #[arg(long, value_name = "FILE")]
        odds: Option<PathBuf>,
    },
    /// List current ratings, highest first
    Ratings {
        #[arg(long, default_value_t = 25)]
        top: usize,
    },
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load configuration and apply CLI overrides
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(store) = &args.store {
        config.storage.store_path = store.clone();
    }

    if let Some(feed_dir) = &args.feed_dir {
        config.feed.scoreboard_dir = feed_dir.clone();
    }

    courtside_elo::config::validate_config(&config)?;
    Ok(config)
}

fn display_startup_banner(config: &AppConfig) {
    info!("Courtside Elo v{}", courtside_elo::VERSION);
    info!("   Service: {}", config.service.name);
    info!("   Store: {}", config.storage.store_path.display());
    info!("   Scoreboards: {}", config.feed.scoreboard_dir.display());
    info!(
        "   K-factor: {}, base rating: {}, home advantage: {}",
        config.rating.k_factor, config.rating.base_rating, config.rating.home_advantage
    );
}

/// Raise the replay cancel signal on Ctrl+C
fn spawn_cancel_on_ctrl_c(handle: CancelHandle) {
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                warn!("Received Ctrl+C, stopping after the current day");
                handle.cancel();
            }
            Err(e) => warn!("Failed to install Ctrl+C handler: {}", e),
        }
    });
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn day_or(raw: Option<&str>, fallback: NaiveDate) -> Result<NaiveDate> {
    raw.map(parse_day).transpose().map(|day| day.unwrap_or(fallback))
}

async fn run(args: Args, config: AppConfig) -> Result<()> {
    let metrics = Arc::new(ReplayMetrics::new()?);
    let store: Arc<dyn Store> = Arc::new(JsonFileStore::open(&config.storage.store_path)?);
    let feed = Arc::new(DirectoryFeed::new(&config.feed.scoreboard_dir));

    match &args.command {
        Command::ApplyDay { day, force } => {
            let day = day_or(day.as_deref(), today() - ChronoDuration::days(1))?;
            let engine = RatingEngine::new(config.rating.clone())?.with_metrics(metrics.clone());
            let orchestrator = ReplayOrchestrator::new(store, feed, engine);
            let outcome = orchestrator.update_day(day, *force).await?;
            print_json(&outcome)?;
        }
        Command::Rebuild {
            start,
            end,
            delay_ms,
        } => {
            let start = parse_day(start)?;
            let end = parse_day(end)?;
            let delay = delay_ms
                .map(std::time::Duration::from_millis)
                .unwrap_or_else(|| config.per_day_delay());

            let (handle, cancel) = cancel_pair();
            spawn_cancel_on_ctrl_c(handle);

            let engine = RatingEngine::new(config.rating.clone())?.with_metrics(metrics.clone());
            let orchestrator =
                ReplayOrchestrator::new(store, feed, engine).with_metrics(metrics.clone());
            let result = orchestrator.rebuild(start, end, delay, &cancel).await?;
            print_json(&result)?;
        }
        Command::Predict { day, limit, odds } => {
            let day = day_or(day.as_deref(), today())?;
            let games = feed.games_for_day(day).await?;
            let limit = limit.unwrap_or(config.replay.pick_limit);
            let mut picks = predict_games(store.as_ref(), &games, &config.rating, limit)?;

            if let Some(odds_path) = odds.as_ref().or(config.feed.odds_path.as_ref()) {
                let raw = tokio::fs::read_to_string(odds_path)
                    .await
                    .with_context(|| format!("Failed to read odds file {}", odds_path.display()))?;
                let events: Vec<OddsEvent> = serde_json::from_str(&raw)
                    .with_context(|| format!("Malformed odds file {}", odds_path.display()))?;
                attach_market(&mut picks, &best_price_map(&events));
            }

            info!(%day, picks = picks.len(), "Generated picks");
            print_json(&picks)?;
        }
        Command::Ratings { top } => {
            let mut teams = store.all_teams()?;
            teams.sort_by(|a, b| {
                b.rating
                    .partial_cmp(&a.rating)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.canonical_id.cmp(&b.canonical_id))
            });
            teams.truncate(*top);
            print_json(&teams)?;
        }
    }

    if args.print_metrics {
        print!("{}", metrics.render()?);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    display_startup_banner(&config);

    if args.dry_run {
        info!("Configuration validation successful");
        info!("Dry run completed - exiting without running the command");
        return Ok(());
    }

    if let Err(e) = run(args, config).await {
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
