//! Feed reading saved scoreboard snapshots from disk
//!
//! Expects one scoreboard document per day named `YYYY-MM-DD.json`. A
//! missing file means the day had no games; an unreadable or malformed file
//! is an upstream failure.

use super::scoreboard::{normalize_scoreboard, ScoreboardPayload};
use super::GameFeed;
use crate::error::{RatingError, Result};
use crate::types::NormalizedGame;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct DirectoryFeed {
    root: PathBuf,
}

impl DirectoryFeed {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Snapshot path for `day`
    pub fn path_for(&self, day: NaiveDate) -> PathBuf {
        self.root.join(format!("{}.json", day.format("%Y-%m-%d")))
    }
}

#[async_trait]
impl GameFeed for DirectoryFeed {
    async fn games_for_day(&self, day: NaiveDate) -> Result<Vec<NormalizedGame>> {
        let path = self.path_for(day);

        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(%day, path = %path.display(), "No scoreboard snapshot for day");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(RatingError::UpstreamFetch {
                    day,
                    message: format!("Failed to read {}: {}", path.display(), e),
                }
                .into())
            }
        };

        let payload: ScoreboardPayload =
            serde_json::from_str(&raw).map_err(|e| RatingError::UpstreamFetch {
                day,
                message: format!("Malformed scoreboard {}: {}", path.display(), e),
            })?;

        let games = normalize_scoreboard(&payload);
        debug!(%day, games = games.len(), "Loaded scoreboard snapshot");
        Ok(games)
    }
}
