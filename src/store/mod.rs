//! Durable rating and checkpoint storage
//!
//! Backends only have to support point lookups and an atomic
//! [`Store::commit`] of a [`ChangeSet`]. All reads and writes made by the
//! engine go through a [`UnitOfWork`], which layers staged changes over the
//! committed state so that every read in a batch sees the batch's own writes.

pub mod checkpoints;
pub mod file;
pub mod memory;
pub mod ratings;
pub mod unit_of_work;

pub use file::JsonFileStore;
pub use memory::InMemoryStore;
pub use unit_of_work::UnitOfWork;

use crate::error::Result;
use crate::types::{ProcessedDay, Team, TeamKey};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Trait for rating and checkpoint persistence
pub trait Store: Send + Sync {
    /// Point lookup of a committed team
    fn load_team(&self, key: &str) -> Result<Option<Team>>;

    /// Point lookup of a committed ledger entry
    fn load_day(&self, day: NaiveDate) -> Result<Option<ProcessedDay>>;

    /// Number of committed teams
    fn team_count(&self) -> Result<usize>;

    /// All committed teams (for listing and diagnostics)
    fn all_teams(&self) -> Result<Vec<Team>>;

    /// Apply a change set atomically: either all of it becomes visible or none
    fn commit(&self, changes: ChangeSet) -> Result<()>;
}

/// Writes staged by a [`UnitOfWork`], applied in field order on commit:
/// bulk rating reset, ledger clear, then team and day upserts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    pub reset_ratings: Option<f64>,
    pub clear_days: bool,
    pub teams: BTreeMap<TeamKey, Team>,
    pub days: BTreeMap<NaiveDate, ProcessedDay>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.reset_ratings.is_none() && !self.clear_days && self.teams.is_empty() && self.days.is_empty()
    }
}

/// Full store contents; the in-memory state of both bundled backends and the
/// on-disk format of [`JsonFileStore`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub teams: BTreeMap<TeamKey, Team>,
    #[serde(default)]
    pub processed_days: BTreeMap<NaiveDate, ProcessedDay>,
}

impl Snapshot {
    pub fn apply(&mut self, changes: ChangeSet) {
        if let Some(base) = changes.reset_ratings {
            for team in self.teams.values_mut() {
                team.rating = base;
            }
        }
        if changes.clear_days {
            self.processed_days.clear();
        }
        self.teams.extend(changes.teams);
        self.processed_days.extend(changes.days);
    }
}
