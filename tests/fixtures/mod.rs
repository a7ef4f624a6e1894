//! Test fixtures and mock implementations for integration testing
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use courtside_elo::error::{RatingError, Result};
use courtside_elo::feed::{GameFeed, StaticFeed};
use courtside_elo::store::{ChangeSet, InMemoryStore, Store};
use courtside_elo::types::{NormalizedGame, ProcessedDay, Team};
use mockall::mock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

mock! {
    pub Feed {}

    #[async_trait]
    impl GameFeed for Feed {
        async fn games_for_day(&self, day: NaiveDate) -> Result<Vec<NormalizedGame>>;
    }
}

/// Store that delegates to an [`InMemoryStore`] but rejects one chosen commit
pub struct FailingStore {
    inner: InMemoryStore,
    fail_on_commit: usize,
    commits: AtomicUsize,
}

impl FailingStore {
    /// Fail the `n`th commit (1-based); every other commit goes through
    pub fn failing_commit(inner: InMemoryStore, n: usize) -> Self {
        Self {
            inner,
            fail_on_commit: n,
            commits: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &InMemoryStore {
        &self.inner
    }

    pub fn commit_attempts(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }
}

impl Store for FailingStore {
    fn load_team(&self, key: &str) -> Result<Option<Team>> {
        self.inner.load_team(key)
    }

    fn load_day(&self, day: NaiveDate) -> Result<Option<ProcessedDay>> {
        self.inner.load_day(day)
    }

    fn team_count(&self) -> Result<usize> {
        self.inner.team_count()
    }

    fn all_teams(&self) -> Result<Vec<Team>> {
        self.inner.all_teams()
    }

    fn commit(&self, changes: ChangeSet) -> Result<()> {
        let attempt = self.commits.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt == self.fail_on_commit {
            return Err(RatingError::store("injected commit failure").into());
        }
        self.inner.commit(changes)
    }
}

pub fn day(month: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, d).unwrap()
}

pub fn final_game(home: &str, away: &str, home_score: i64, away_score: i64) -> NormalizedGame {
    NormalizedGame::from_names(home, away, "final").with_scores(home_score, away_score)
}

/// A short stretch of conference play, with noise the engine must skip
pub fn season_days() -> Vec<(NaiveDate, Vec<NormalizedGame>)> {
    vec![
        (
            day(1, 6),
            vec![
                final_game("Duke", "North Carolina", 84, 79),
                final_game("Kansas", "Baylor", 70, 72),
                NormalizedGame::from_names("Gonzaga", "Saint Mary's", "pre"),
            ],
        ),
        (day(1, 7), vec![]),
        (
            day(1, 8),
            vec![
                final_game("Baylor", "Duke", 65, 91).at_neutral_site(),
                final_game("North Carolina", "Kansas", 77, 77),
                NormalizedGame::from_names("Gonzaga", "Saint Mary's", "final").with_scores("—", 70),
            ],
        ),
        (
            day(1, 9),
            vec![
                final_game("Kansas", "Duke", 88, 60),
                final_game("Michigan St.", "Ohio St.", 70, 58),
            ],
        ),
    ]
}

pub fn season_feed() -> StaticFeed {
    season_days()
        .into_iter()
        .fold(StaticFeed::new(), |feed, (day, games)| feed.with_day(day, games))
}

/// Committed ratings keyed by team
pub fn ratings_of(store: &dyn Store) -> BTreeMap<String, f64> {
    store
        .all_teams()
        .unwrap()
        .into_iter()
        .map(|team| (team.canonical_id, team.rating))
        .collect()
}

/// Store path inside a scratch directory that lives as long as the `TempDir`
pub fn temp_store_path() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ratings.json");
    (dir, path)
}
