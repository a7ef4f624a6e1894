//! JSON-file backed durable store
//!
//! The whole store is one JSON document. Each commit writes a complete new
//! document to a sibling temp file and renames it over the old one, so a
//! crash leaves either the previous or the new state on disk, never a mix.

use super::{ChangeSet, Snapshot, Store};
use crate::error::{RatingError, Result};
use crate::types::{ProcessedDay, Team};
use anyhow::Context;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    state: RwLock<Snapshot>,
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty if the file does not exist
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let snapshot = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read store file {}", path.display()))?;
            let snapshot: Snapshot = serde_json::from_str(&raw).map_err(|e| RatingError::Store {
                message: format!("Corrupt store file {}: {}", path.display(), e),
            })?;
            info!(
                path = %path.display(),
                teams = snapshot.teams.len(),
                days = snapshot.processed_days.len(),
                "Opened rating store"
            );
            snapshot
        } else {
            info!(path = %path.display(), "Store file not found, starting empty");
            Snapshot::default()
        };

        Ok(Self {
            path,
            state: RwLock::new(snapshot),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        let body = serde_json::to_vec_pretty(snapshot).map_err(|e| RatingError::Store {
            message: format!("Failed to serialize store: {}", e),
        })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(|e| RatingError::Store {
            message: format!("Failed to write {}: {}", tmp.display(), e),
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| RatingError::Store {
            message: format!("Failed to replace {}: {}", self.path.display(), e),
        })?;

        debug!(path = %self.path.display(), "Store persisted");
        Ok(())
    }
}

impl Store for JsonFileStore {
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

        // Only swap the in-memory state once the new file is in place
        let mut next = state.clone();
        next.apply(changes);
        self.persist(&next)?;
        *state = next;

        Ok(())
    }
}
