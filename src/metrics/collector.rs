//! Metrics collection using Prometheus

use crate::rating::DayUpdate;
use anyhow::Result;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use std::sync::Arc;
use std::time::Duration;

/// Counters for rating updates and replays
#[derive(Clone)]
pub struct ReplayMetrics {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Games that changed ratings
    pub games_applied_total: IntCounter,

    /// Games left out, by reason (not_final, data_quality)
    pub games_skipped_total: IntCounterVec,

    /// Days committed, by single-day update or rebuild
    pub days_processed_total: IntCounter,

    /// Rebuild runs by outcome (success, cancelled, failed)
    pub rebuilds_total: IntCounterVec,

    /// Teams put back to the base rating by the latest rebuild
    pub teams_reset: IntGauge,

    /// Time to stage and commit one day
    pub day_apply_duration: Histogram,
}

impl ReplayMetrics {
    /// Create a new collector with its own registry
    pub fn new() -> Result<Self> {
        Self::with_registry(Arc::new(Registry::new()))
    }

    /// Create a new collector registered in `registry`
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let games_applied_total = IntCounter::new(
            "courtside_games_applied_total",
            "Games whose result was applied to ratings",
        )?;
        registry.register(Box::new(games_applied_total.clone()))?;

        let games_skipped_total = IntCounterVec::new(
            Opts::new(
                "courtside_games_skipped_total",
                "Games skipped during rating updates",
            ),
            &["reason"],
        )?;
        registry.register(Box::new(games_skipped_total.clone()))?;

        let days_processed_total = IntCounter::new(
            "courtside_days_processed_total",
            "Days of results committed",
        )?;
        registry.register(Box::new(days_processed_total.clone()))?;

        let rebuilds_total = IntCounterVec::new(
            Opts::new("courtside_rebuilds_total", "Rating rebuilds by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(rebuilds_total.clone()))?;

        let teams_reset = IntGauge::new(
            "courtside_teams_reset",
            "Teams reset to the base rating by the latest rebuild",
        )?;
        registry.register(Box::new(teams_reset.clone()))?;

        let day_apply_duration = Histogram::with_opts(
            HistogramOpts::new(
                "courtside_day_apply_duration_seconds",
                "Time to apply and commit one day of results",
            )
            .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
        )?;
        registry.register(Box::new(day_apply_duration.clone()))?;

        Ok(Self {
            registry,
            games_applied_total,
            games_skipped_total,
            days_processed_total,
            rebuilds_total,
            teams_reset,
            day_apply_duration,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Record one committed day
    pub fn record_day(&self, update: &DayUpdate, duration: Duration) {
        self.games_applied_total.inc_by(update.games_updated as u64);
        self.games_skipped_total
            .with_label_values(&["not_final"])
            .inc_by(update.skipped_not_final as u64);
        self.games_skipped_total
            .with_label_values(&["data_quality"])
            .inc_by(update.skipped_data_quality as u64);
        self.days_processed_total.inc();
        self.day_apply_duration.observe(duration.as_secs_f64());
    }

    /// Record the end of a rebuild
    pub fn record_rebuild(&self, outcome: &str, teams_reset: usize) {
        self.rebuilds_total.with_label_values(&[outcome]).inc();
        self.teams_reset.set(teams_reset as i64);
    }
}
