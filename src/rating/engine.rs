//! Rating update engine
//!
//! Applies one day's worth of games to the store. Every game reads its two
//! teams through the same unit of work, so a team playing twice in a day (or
//! a team created by an earlier game) is rated from its latest value, and the
//! whole day lands in a single commit.

use crate::error::{RatingError, Result};
use crate::metrics::ReplayMetrics;
use crate::rating::elo::{EloCalculator, EloConfig, GameRating};
use crate::rating::outcome::final_score;
use crate::store::{Store, UnitOfWork};
use crate::types::{NormalizedGame, TeamKey};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Rating change applied for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub home_team: TeamKey,
    pub away_team: TeamKey,
    pub home_rating_before: f64,
    pub away_rating_before: f64,
    pub rating: GameRating,
}

impl RatingChange {
    pub fn home_rating_after(&self) -> f64 {
        self.home_rating_before + self.rating.home_delta()
    }

    pub fn away_rating_after(&self) -> f64 {
        self.away_rating_before + self.rating.away_delta()
    }
}

/// Summary of applying one day's games
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayUpdate {
    pub games_updated: usize,
    /// Games whose status is not a completed one
    pub skipped_not_final: usize,
    /// Completed games with unusable scores or teams
    pub skipped_data_quality: usize,
    pub changes: Vec<RatingChange>,
}

/// Engine that turns completed games into rating updates
pub struct RatingEngine {
    calculator: EloCalculator,
    metrics: Option<Arc<ReplayMetrics>>,
}

impl RatingEngine {
    pub fn new(config: EloConfig) -> Result<Self> {
        Ok(Self {
            calculator: EloCalculator::new(config)?,
            metrics: None,
        })
    }

    /// Report applied and skipped games to `metrics`
    pub fn with_metrics(mut self, metrics: Arc<ReplayMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn calculator(&self) -> &EloCalculator {
        &self.calculator
    }

    /// Apply a day's games to `store` as one atomic commit.
    ///
    /// On any error nothing from the batch is written.
    pub fn apply_day(&self, store: &dyn Store, games: &[NormalizedGame]) -> Result<DayUpdate> {
        let started = Instant::now();
        let mut uow = UnitOfWork::begin(store);

        let update = self.apply_games(&mut uow, games)?;
        uow.commit()?;

        self.record_committed(&update, started);
        info!(
            games = games.len(),
            updated = update.games_updated,
            skipped_not_final = update.skipped_not_final,
            skipped_data_quality = update.skipped_data_quality,
            "Applied day of results"
        );
        Ok(update)
    }

    /// Stage the rating updates for `games` in `uow` without committing, so
    /// callers can commit them together with their own bookkeeping.
    pub fn apply_games(&self, uow: &mut UnitOfWork<'_>, games: &[NormalizedGame]) -> Result<DayUpdate> {
        let base_rating = self.calculator.base_rating();
        let mut update = DayUpdate::default();

        for game in games {
            let score = match final_score(game) {
                Ok(Some(score)) => score,
                Ok(None) => {
                    debug!(
                        home = %game.home_team_key,
                        away = %game.away_team_key,
                        status = %game.status,
                        "Skipping game that is not final"
                    );
                    update.skipped_not_final += 1;
                    continue;
                }
                Err(RatingError::DataQuality { reason }) => {
                    warn!(%reason, "Skipping unusable game");
                    update.skipped_data_quality += 1;
                    continue;
                }
                Err(other) => return Err(other.into()),
            };

            let home = uow.get_or_create(&game.home_team_key, &game.home_display_name, base_rating)?;
            let away = uow.get_or_create(&game.away_team_key, &game.away_display_name, base_rating)?;

            let rating = self
                .calculator
                .rate_game(home.rating, away.rating, score.home, score.away);

            uow.set_rating(&home.canonical_id, home.rating + rating.home_delta())?;
            uow.set_rating(&away.canonical_id, away.rating + rating.away_delta())?;

            debug!(
                home = %home.canonical_id,
                away = %away.canonical_id,
                home_score = score.home,
                away_score = score.away,
                delta = rating.delta,
                "Rated game"
            );

            update.changes.push(RatingChange {
                home_team: home.canonical_id,
                away_team: away.canonical_id,
                home_rating_before: home.rating,
                away_rating_before: away.rating,
                rating,
            });
            update.games_updated += 1;
        }

        Ok(update)
    }

    /// Count a committed update in the metrics, if any are attached
    pub(crate) fn record_committed(&self, update: &DayUpdate, started: Instant) {
        if let Some(metrics) = &self.metrics {
            metrics.record_day(update, started.elapsed());
        }
    }
}

impl Default for RatingEngine {
    fn default() -> Self {
        Self {
            calculator: EloCalculator::default(),
            metrics: None,
        }
    }
}
