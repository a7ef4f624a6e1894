//! Integration tests for the rating service
//!
//! These tests drive the replay orchestrator end to end, including:
//! - Deterministic rebuilds from any starting state
//! - Fail-fast aborts and per-day atomicity
//! - Cancellation between days
//! - Nightly single-day updates and the JSON file store

mod fixtures;

use courtside_elo::error::RatingError;
use courtside_elo::feed::StaticFeed;
use courtside_elo::metrics::ReplayMetrics;
use courtside_elo::prediction::{predict_games, DEFAULT_PICK_LIMIT};
use courtside_elo::rating::{EloConfig, RatingEngine};
use courtside_elo::replay::{cancel_pair, CancelSignal, DayOutcome, ReplayOrchestrator};
use courtside_elo::store::{InMemoryStore, JsonFileStore, Store};
use courtside_elo::types::Team;
use mockall::predicate::eq;
use std::sync::Arc;
use std::time::Duration;

use fixtures::{
    day, final_game, ratings_of, season_days, season_feed, temp_store_path, FailingStore, MockFeed,
};

fn orchestrator(store: Arc<dyn Store>, feed: Arc<dyn courtside_elo::GameFeed>) -> ReplayOrchestrator {
    ReplayOrchestrator::new(store, feed, RatingEngine::default())
}

#[tokio::test]
async fn test_rebuild_is_independent_of_prior_state() {
    let fresh = Arc::new(InMemoryStore::new());
    let dirty = Arc::new(InMemoryStore::with_teams(vec![
        Team::new("duke", "Duke", 1840.0),
        Team::new("kansas", "Kansas", 1320.0),
        Team::new("villanova", "Villanova", 1610.0),
    ]));

    for store in [fresh.clone(), dirty.clone()] {
        orchestrator(store, Arc::new(season_feed()))
            .rebuild(day(1, 6), day(1, 9), Duration::ZERO, &CancelSignal::never())
            .await
            .unwrap();
    }

    let mut dirty_ratings = ratings_of(dirty.as_ref());
    // Only reset by the rebuild, never played
    assert_eq!(dirty_ratings.remove("villanova"), Some(1500.0));
    assert_eq!(ratings_of(fresh.as_ref()), dirty_ratings);
}

#[tokio::test]
async fn test_rebuild_skips_noise_and_counts_updates() {
    let store = Arc::new(InMemoryStore::new());
    let metrics = Arc::new(ReplayMetrics::new().unwrap());
    let engine = RatingEngine::default().with_metrics(metrics.clone());
    let orch = ReplayOrchestrator::new(store.clone(), Arc::new(season_feed()), engine)
        .with_metrics(metrics.clone());

    let result = orch
        .rebuild(day(1, 6), day(1, 9), Duration::ZERO, &CancelSignal::never())
        .await
        .unwrap();

    assert!(result.success);
    assert!(!result.cancelled);
    assert_eq!(result.days_processed, 4);
    assert_eq!(result.days_with_updates, 3);
    assert_eq!(result.games_updated, 6);
    assert!(store.load_team("gonzaga").unwrap().is_none());

    let rendered = metrics.render().unwrap();
    assert!(rendered.contains("games_applied_total 6"));
}

#[tokio::test]
async fn test_tie_counts_as_home_loss() {
    let store = Arc::new(InMemoryStore::new());
    let feed = StaticFeed::new().with_day(day(2, 1), vec![final_game("Purdue", "Iowa", 77, 77)]);

    orchestrator(store.clone(), Arc::new(feed))
        .rebuild(day(2, 1), day(2, 1), Duration::ZERO, &CancelSignal::never())
        .await
        .unwrap();

    let purdue = store.load_team("purdue").unwrap().unwrap().rating;
    let iowa = store.load_team("iowa").unwrap().unwrap().rating;
    assert!((purdue - 1490.0).abs() < 1e-9);
    assert!((iowa - 1510.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_rebuild_aborts_on_failing_day() {
    let store = Arc::new(InMemoryStore::new());
    let mut feed = MockFeed::new();
    feed.expect_games_for_day()
        .with(eq(day(1, 6)))
        .times(1)
        .returning(|_| Ok(vec![final_game("Duke", "Kansas", 80, 70)]));
    feed.expect_games_for_day()
        .with(eq(day(1, 7)))
        .times(1)
        .returning(|d| {
            Err(RatingError::UpstreamFetch {
                day: d,
                message: "503 Service Unavailable".to_string(),
            }
            .into())
        });

    let err = orchestrator(store.clone(), Arc::new(feed))
        .rebuild(day(1, 6), day(1, 10), Duration::ZERO, &CancelSignal::never())
        .await
        .unwrap_err();

    match err.downcast_ref::<RatingError>() {
        Some(RatingError::ReplayAborted { day: failed }) => assert_eq!(*failed, day(1, 7)),
        other => panic!("expected ReplayAborted, got {:?}", other),
    }
    assert!(format!("{:#}", err).contains("503"));

    // The first day stays committed; nothing after the failure ran
    assert!(store.load_day(day(1, 6)).unwrap().is_some());
    assert!(store.load_day(day(1, 7)).unwrap().is_none());
    assert!((store.load_team("duke").unwrap().unwrap().rating - 1511.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_commit_failure_rolls_back_whole_day() {
    // Commits: 1 reset, 2 for 01-06, 3 for 01-07 (no games), 4 for 01-08
    let store = Arc::new(FailingStore::failing_commit(InMemoryStore::new(), 4));
    let err = orchestrator(store.clone(), Arc::new(season_feed()))
        .rebuild(day(1, 6), day(1, 9), Duration::ZERO, &CancelSignal::never())
        .await
        .unwrap_err();

    match err.downcast_ref::<RatingError>() {
        Some(RatingError::ReplayAborted { day: failed }) => assert_eq!(*failed, day(1, 8)),
        other => panic!("expected ReplayAborted, got {:?}", other),
    }
    assert_eq!(store.commit_attempts(), 4);

    let reference = Arc::new(InMemoryStore::new());
    orchestrator(reference.clone(), Arc::new(season_feed()))
        .rebuild(day(1, 6), day(1, 7), Duration::ZERO, &CancelSignal::never())
        .await
        .unwrap();

    // Neither rated game of 01-08 leaked through
    assert_eq!(ratings_of(store.inner()), ratings_of(reference.as_ref()));
    assert!(store.load_day(day(1, 7)).unwrap().is_some());
    assert!(store.load_day(day(1, 8)).unwrap().is_none());
}

#[tokio::test]
async fn test_cancellation_stops_before_next_fetch() {
    let store = Arc::new(InMemoryStore::new());
    let (handle, cancel) = cancel_pair();
    let handle = Arc::new(handle);

    let mut feed = MockFeed::new();
    feed.expect_games_for_day()
        .with(eq(day(1, 6)))
        .times(1)
        .returning(|_| Ok(vec![final_game("Duke", "Kansas", 80, 70)]));
    feed.expect_games_for_day()
        .with(eq(day(1, 7)))
        .times(1)
        .returning(move |_| {
            handle.cancel();
            Ok(vec![final_game("Kansas", "Baylor", 66, 60)])
        });

    let result = orchestrator(store.clone(), Arc::new(feed))
        .rebuild(day(1, 6), day(1, 12), Duration::from_millis(5), &cancel)
        .await
        .unwrap();

    assert!(result.cancelled);
    assert!(!result.success);
    assert_eq!(result.days_processed, 2);
    assert_eq!(result.last_processed_day, Some(day(1, 7)));
    assert!(store.load_day(day(1, 7)).unwrap().is_some());
    assert!(store.load_day(day(1, 8)).unwrap().is_none());
}

#[tokio::test]
async fn test_invalid_range_is_rejected_without_changes() {
    let store = Arc::new(InMemoryStore::with_teams(vec![Team::new("duke", "Duke", 1650.0)]));
    let err = orchestrator(store.clone(), Arc::new(season_feed()))
        .rebuild(day(1, 9), day(1, 8), Duration::ZERO, &CancelSignal::never())
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<RatingError>(),
        Some(RatingError::InvalidRange { .. })
    ));
    assert_eq!(store.commit_count(), 0);
    assert_eq!(store.load_team("duke").unwrap().unwrap().rating, 1650.0);
}

#[tokio::test]
async fn test_nightly_updates_match_rebuild() {
    let nightly = Arc::new(InMemoryStore::new());
    let orch = orchestrator(nightly.clone(), Arc::new(season_feed()));
    for (d, _) in season_days() {
        let outcome = orch.update_day(d, false).await.unwrap();
        assert!(matches!(outcome, DayOutcome::Applied { .. }));
    }
    // Rerunning the nightly job is a no-op
    assert!(matches!(
        orch.update_day(day(1, 9), false).await.unwrap(),
        DayOutcome::AlreadyProcessed { .. }
    ));

    let rebuilt = Arc::new(InMemoryStore::new());
    orchestrator(rebuilt.clone(), Arc::new(season_feed()))
        .rebuild(day(1, 6), day(1, 9), Duration::ZERO, &CancelSignal::never())
        .await
        .unwrap();

    assert_eq!(ratings_of(nightly.as_ref()), ratings_of(rebuilt.as_ref()));
}

#[tokio::test]
async fn test_file_store_survives_reopen() {
    let (_dir, path) = temp_store_path();
    let before = {
        let store = Arc::new(JsonFileStore::open(&path).unwrap());
        orchestrator(store.clone(), Arc::new(season_feed()))
            .rebuild(day(1, 6), day(1, 9), Duration::ZERO, &CancelSignal::never())
            .await
            .unwrap();
        ratings_of(store.as_ref())
    };

    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(ratings_of(&reopened), before);
    for (d, _) in season_days() {
        assert!(reopened.load_day(d).unwrap().is_some());
    }
    assert_eq!(
        reopened.load_team("michigan-state").unwrap().unwrap().display_name,
        "Michigan St."
    );
}

#[tokio::test]
async fn test_predictions_after_rebuild_are_read_only() {
    let store = Arc::new(InMemoryStore::new());
    orchestrator(store.clone(), Arc::new(season_feed()))
        .rebuild(day(1, 6), day(1, 9), Duration::ZERO, &CancelSignal::never())
        .await
        .unwrap();
    let commits = store.commit_count();

    let upcoming = vec![
        courtside_elo::NormalizedGame::from_names("Duke", "Unknown Tech", "pre"),
        courtside_elo::NormalizedGame::from_names("Kansas", "Baylor", "Scheduled"),
    ];
    let picks = predict_games(store.as_ref(), &upcoming, &EloConfig::default(), DEFAULT_PICK_LIMIT)
        .unwrap();

    assert!(picks.windows(2).all(|w| w[0].win_prob >= w[1].win_prob));
    assert_eq!(store.commit_count(), commits);
    assert!(store.load_team("unknown-tech").unwrap().is_none());
}
