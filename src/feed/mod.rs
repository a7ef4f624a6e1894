//! Game feed providers
//!
//! A feed hands the engine one day of [`NormalizedGame`]s. Whatever shape
//! the upstream data has is dealt with inside the provider; the engine only
//! ever sees normalized games.

pub mod directory;
pub mod scoreboard;

pub use directory::DirectoryFeed;
pub use scoreboard::{normalize_scoreboard, ScoreboardPayload};

use crate::error::{RatingError, Result};
use crate::types::NormalizedGame;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Trait for sources of daily game results
#[async_trait]
pub trait GameFeed: Send + Sync {
    /// All games for `day`.
    ///
    /// Returns an empty list when nothing was scheduled or the source has no
    /// data for the day. Transport and parse failures must come back as
    /// [`RatingError::UpstreamFetch`], never as an empty list.
    async fn games_for_day(&self, day: NaiveDate) -> Result<Vec<NormalizedGame>>;
}

/// Feed backed by a fixed map of days to games
#[derive(Debug, Default)]
pub struct StaticFeed {
    days: HashMap<NaiveDate, Vec<NormalizedGame>>,
    failing_days: HashSet<NaiveDate>,
    requests: Mutex<Vec<NaiveDate>>,
}

impl StaticFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `games` for `day`
    pub fn with_day(mut self, day: NaiveDate, games: Vec<NormalizedGame>) -> Self {
        self.days.insert(day, games);
        self
    }

    /// Fail every request for `day` with an upstream error
    pub fn failing_on(mut self, day: NaiveDate) -> Self {
        self.failing_days.insert(day);
        self
    }

    /// Days requested so far, in request order
    pub fn requested_days(&self) -> Vec<NaiveDate> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl GameFeed for StaticFeed {
    async fn games_for_day(&self, day: NaiveDate) -> Result<Vec<NormalizedGame>> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(day);
        }

        if self.failing_days.contains(&day) {
            return Err(RatingError::UpstreamFetch {
                day,
                message: "feed unavailable".to_string(),
            }
            .into());
        }

        Ok(self.days.get(&day).cloned().unwrap_or_default())
    }
}
