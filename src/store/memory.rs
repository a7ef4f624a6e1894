//! In-memory store implementation

use super::{ChangeSet, Snapshot, Store};
use crate::error::{RatingError, Result};
use crate::types::{ProcessedDay, Team};
use chrono::NaiveDate;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

/// Store kept entirely in memory. Commits apply under a single write lock.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<Snapshot>,
    commits: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with teams
    pub fn with_teams(teams: Vec<Team>) -> Self {
        let mut snapshot = Snapshot::default();
        for team in teams {
            snapshot.teams.insert(team.canonical_id.clone(), team);
        }
        Self::from_snapshot(snapshot)
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            state: RwLock::new(snapshot),
            commits: AtomicUsize::new(0),
        }
    }

    /// Copy of the full committed state
    pub fn snapshot(&self) -> Result<Snapshot> {
        let state = self.state.read().map_err(|_| RatingError::Store {
            message: "Failed to acquire store read lock".to_string(),
        })?;
        Ok(state.clone())
    }

    /// Number of non-empty commits applied so far
    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::Relaxed)
    }
}

impl Store for InMemoryStore {
    fn load_team(&self, key: &str) -> Result<Option<Team>> {
        let state = self.state.read().map_err(|_| RatingError::Store {
            message: "Failed to acquire store read lock".to_string(),
        })?;
        Ok(state.teams.get(key).cloned())
    }

    fn load_day(&self, day: NaiveDate) -> Result<Option<ProcessedDay>> {
        let state = self.state.read().map_err(|_| RatingError::Store {
            message: "Failed to acquire store read lock".to_string(),
        })?;
        Ok(state.processed_days.get(&day).cloned())
    }

    fn team_count(&self) -> Result<usize> {
        let state = self.state.read().map_err(|_| RatingError::Store {
            message: "Failed to acquire store read lock".to_string(),
        })?;
        Ok(state.teams.len())
    }

    fn all_teams(&self) -> Result<Vec<Team>> {
        let state = self.state.read().map_err(|_| RatingError::Store {
            message: "Failed to acquire store read lock".to_string(),
        })?;
        Ok(state.teams.values().cloned().collect())
    }

    fn commit(&self, changes: ChangeSet) -> Result<()> {
        let mut state = self.state.write().map_err(|_| RatingError::Store {
            message: "Failed to acquire store write lock".to_string(),
        })?;
        state.apply(changes);
        self.commits.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
