//! Historical replay orchestration
//!
//! Ratings are path dependent, so a rebuild always starts from a full reset
//! and replays every day in calendar order. The processed-day ledger is
//! repopulated as it goes; it records progress and never causes a day to be
//! skipped during a rebuild.

use super::cancel::CancelSignal;
use crate::error::{RatingError, Result};
use crate::feed::GameFeed;
use crate::metrics::ReplayMetrics;
use crate::rating::{DayUpdate, RatingEngine};
use crate::store::{Store, UnitOfWork};
use crate::utils::days_inclusive;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Outcome of a rebuild
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebuildResult {
    pub run_id: Uuid,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days_processed: usize,
    /// Days on which at least one game changed ratings
    pub days_with_updates: usize,
    pub games_updated: usize,
    pub teams_reset: usize,
    /// True when every day in the range was replayed
    pub success: bool,
    pub cancelled: bool,
    pub last_processed_day: Option<NaiveDate>,
}

/// Outcome of a single-day update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DayOutcome {
    /// The ledger already had the day and the update was not forced
    AlreadyProcessed { day: NaiveDate },
    Applied { day: NaiveDate, update: DayUpdate },
}

/// Drives the rating engine across days of feed data
pub struct ReplayOrchestrator {
    store: Arc<dyn Store>,
    feed: Arc<dyn GameFeed>,
    engine: RatingEngine,
    metrics: Option<Arc<ReplayMetrics>>,
}

impl ReplayOrchestrator {
    pub fn new(store: Arc<dyn Store>, feed: Arc<dyn GameFeed>, engine: RatingEngine) -> Self {
        Self {
            store,
            feed,
            engine,
            metrics: None,
        }
    }

    /// Report rebuild outcomes to `metrics`
    pub fn with_metrics(mut self, metrics: Arc<ReplayMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Reset all ratings and replay `start..=end` from the feed.
    ///
    /// Fails with [`RatingError::InvalidRange`] before touching the store when
    /// `end < start`. Any failure on a day aborts the whole rebuild; the
    /// returned error carries [`RatingError::ReplayAborted`] naming that day.
    /// Days committed before a failure or cancellation stay committed.
    pub async fn rebuild(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        per_day_delay: Duration,
        cancel: &CancelSignal,
    ) -> Result<RebuildResult> {
        if end < start {
            return Err(RatingError::InvalidRange { start, end }.into());
        }

        let run_id = Uuid::new_v4();
        let span = info_span!("rebuild", %run_id, %start, %end);

        async move {
            let teams_reset = self.reset_state()?;
            info!(teams_reset, "Ratings reset and processed-day ledger cleared");

            let mut result = RebuildResult {
                run_id,
                start,
                end,
                days_processed: 0,
                days_with_updates: 0,
                games_updated: 0,
                teams_reset,
                success: false,
                cancelled: false,
                last_processed_day: None,
            };

            let days: Vec<NaiveDate> = days_inclusive(start, end).collect();
            let total_days = days.len();

            for (idx, day) in days.into_iter().enumerate() {
                if cancel.is_cancelled() {
                    warn!(%day, "Rebuild cancelled before fetching day");
                    result.cancelled = true;
                    break;
                }

                let update = match self.replay_day(day).await {
                    Ok(update) => update,
                    Err(e) => {
                        error!(%day, error = %format!("{:#}", e), "Rebuild aborted");
                        self.record_rebuild("failed", teams_reset);
                        return Err(e.context(RatingError::ReplayAborted { day }));
                    }
                };

                result.days_processed += 1;
                result.games_updated += update.games_updated;
                if update.games_updated > 0 {
                    result.days_with_updates += 1;
                }
                result.last_processed_day = Some(day);

                info!(
                    %day,
                    games_updated = update.games_updated,
                    progress = %format!("{}/{}", idx + 1, total_days),
                    "Replayed day"
                );

                let is_last = idx + 1 == total_days;
                if !is_last && !per_day_delay.is_zero() {
                    tokio::select! {
                        _ = tokio::time::sleep(per_day_delay) => {}
                        _ = cancel.cancelled() => {
                            warn!(%day, "Rebuild cancelled during delay");
                            result.cancelled = true;
                            break;
                        }
                    }
                }
            }

            result.success = !result.cancelled;
            self.record_rebuild(if result.success { "success" } else { "cancelled" }, teams_reset);
            info!(
                days_processed = result.days_processed,
                games_updated = result.games_updated,
                success = result.success,
                "Rebuild finished"
            );
            Ok(result)
        }
        .instrument(span)
        .await
    }

    /// Apply one day from the feed, unless the ledger already has it and
    /// `force` is false.
    pub async fn update_day(&self, day: NaiveDate, force: bool) -> Result<DayOutcome> {
        if !force && UnitOfWork::begin(self.store.as_ref()).is_processed(day)? {
            info!(%day, "Day already processed, skipping");
            return Ok(DayOutcome::AlreadyProcessed { day });
        }

        let update = self.replay_day(day).await?;
        info!(%day, games_updated = update.games_updated, "Updated ratings for day");
        Ok(DayOutcome::Applied { day, update })
    }

    /// Bulk reset and ledger clear, committed on their own before any day
    fn reset_state(&self) -> Result<usize> {
        let mut uow = UnitOfWork::begin(self.store.as_ref());
        let base_rating = self.engine.calculator().base_rating();
        let teams_reset = uow.reset_all(base_rating)?;
        uow.clear_all();
        uow.commit()?;
        Ok(teams_reset)
    }

    /// Fetch a day, then apply its games and mark it processed in one commit
    async fn replay_day(&self, day: NaiveDate) -> Result<DayUpdate> {
        let games = self.feed.games_for_day(day).await.map_err(|e| {
            if e.downcast_ref::<RatingError>().is_some() {
                e
            } else {
                RatingError::UpstreamFetch {
                    day,
                    message: format!("{:#}", e),
                }
                .into()
            }
        })?;

        let started = Instant::now();
        let mut uow = UnitOfWork::begin(self.store.as_ref());
        let update = self.engine.apply_games(&mut uow, &games)?;
        uow.mark_processed(day);
        uow.commit()?;

        self.engine.record_committed(&update, started);
        Ok(update)
    }

    fn record_rebuild(&self, outcome: &str, teams_reset: usize) {
        if let Some(metrics) = &self.metrics {
            metrics.record_rebuild(outcome, teams_reset);
        }
    }
}
