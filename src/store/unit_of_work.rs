//! Per-batch unit of work over a [`Store`]

use super::{ChangeSet, Store};
use crate::error::Result;
use crate::types::{ProcessedDay, Team};
use chrono::NaiveDate;
use tracing::debug;

/// Staged writes over a store, committed together or not at all.
///
/// Reads consult the staged changes first, so a team inserted or re-rated
/// earlier in the batch is what later reads see. Dropping a unit of work
/// without calling [`UnitOfWork::commit`] discards everything it staged.
pub struct UnitOfWork<'s> {
    store: &'s dyn Store,
    changes: ChangeSet,
}

impl<'s> UnitOfWork<'s> {
    pub fn begin(store: &'s dyn Store) -> Self {
        Self {
            store,
            changes: ChangeSet::default(),
        }
    }

    /// Changes staged so far
    pub fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Hand all staged changes to the store in one atomic commit
    pub fn commit(self) -> Result<()> {
        if self.changes.is_empty() {
            debug!("Nothing staged, skipping commit");
            return Ok(());
        }

        debug!(
            teams = self.changes.teams.len(),
            days = self.changes.days.len(),
            reset = self.changes.reset_ratings.is_some(),
            clear_days = self.changes.clear_days,
            "Committing unit of work"
        );
        self.store.commit(self.changes)
    }

    /// Discard staged changes
    pub fn rollback(self) {
        debug!(
            teams = self.changes.teams.len(),
            days = self.changes.days.len(),
            "Rolling back unit of work"
        );
    }

    pub(crate) fn store(&self) -> &dyn Store {
        self.store
    }

    /// Team as this unit of work sees it: staged version, else committed
    /// version (with any staged bulk reset applied).
    pub(crate) fn read_team(&self, key: &str) -> Result<Option<Team>> {
        if let Some(team) = self.changes.teams.get(key) {
            return Ok(Some(team.clone()));
        }

        let mut team = self.store.load_team(key)?;
        if let (Some(team), Some(base)) = (team.as_mut(), self.changes.reset_ratings) {
            team.rating = base;
        }
        Ok(team)
    }

    pub(crate) fn stage_team(&mut self, team: Team) {
        self.changes.teams.insert(team.canonical_id.clone(), team);
    }

    pub(crate) fn read_day(&self, day: NaiveDate) -> Result<Option<ProcessedDay>> {
        if let Some(entry) = self.changes.days.get(&day) {
            return Ok(Some(entry.clone()));
        }
        if self.changes.clear_days {
            return Ok(None);
        }
        self.store.load_day(day)
    }

    pub(crate) fn changes_mut(&mut self) -> &mut ChangeSet {
        &mut self.changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    #[test]
    fn test_dropped_unit_of_work_writes_nothing() {
        let store = InMemoryStore::new();
        {
            let mut uow = UnitOfWork::begin(&store);
            uow.stage_team(Team::new("duke", "Duke", 1500.0));
            assert!(uow.has_changes());
        }
        assert!(store.load_team("duke").unwrap().is_none());
    }

    #[test]
    fn test_rollback_writes_nothing() {
        let store = InMemoryStore::new();
        let mut uow = UnitOfWork::begin(&store);
        uow.stage_team(Team::new("duke", "Duke", 1500.0));
        uow.rollback();
        assert_eq!(store.team_count().unwrap(), 0);
    }

    #[test]
    fn test_reads_see_staged_writes() {
        let store = InMemoryStore::new();
        let mut uow = UnitOfWork::begin(&store);
        assert!(uow.read_team("duke").unwrap().is_none());

        uow.stage_team(Team::new("duke", "Duke", 1520.0));
        assert_eq!(uow.read_team("duke").unwrap().unwrap().rating, 1520.0);

        uow.commit().unwrap();
        assert_eq!(store.load_team("duke").unwrap().unwrap().rating, 1520.0);
    }

    #[test]
    fn test_empty_commit_is_noop() {
        let store = InMemoryStore::new();
        UnitOfWork::begin(&store).commit().unwrap();
        assert_eq!(store.commit_count(), 0);
    }
}
