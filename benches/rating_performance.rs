//! Performance benchmarks for rating updates and replay

use chrono::NaiveDate;
use courtside_elo::feed::StaticFeed;
use courtside_elo::identity::canonicalize;
use courtside_elo::rating::{EloCalculator, RatingEngine};
use courtside_elo::replay::{CancelSignal, ReplayOrchestrator};
use courtside_elo::store::InMemoryStore;
use courtside_elo::types::NormalizedGame;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use std::time::Duration;

const TEAM_NAMES: [&str; 8] = [
    "Duke",
    "North Carolina",
    "St. John's",
    "Michigan St.",
    "Texas A&M",
    "Saint Mary's (CA)",
    "UConn",
    "Mt. St. Mary's",
];

/// A day's slate: every team plays once
fn bench_slate() -> Vec<NormalizedGame> {
    TEAM_NAMES
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| {
            NormalizedGame::from_names(pair[0], pair[1], "final")
                .with_scores(70 + i as i64 * 3, 68 - i as i64)
        })
        .collect()
}

fn bench_rate_game(c: &mut Criterion) {
    let calculator = EloCalculator::default();

    c.bench_function("rate_single_game", |b| {
        b.iter(|| black_box(calculator.rate_game(black_box(1540.0), black_box(1490.0), 81, 64)))
    });
}

fn bench_canonicalize(c: &mut Criterion) {
    c.bench_function("canonicalize_team_names", |b| {
        b.iter(|| {
            for name in TEAM_NAMES {
                black_box(canonicalize(black_box(name)));
            }
        })
    });
}

fn bench_apply_day(c: &mut Criterion) {
    let engine = RatingEngine::default();
    let slate = bench_slate();

    c.bench_function("apply_day_4_games", |b| {
        b.iter(|| {
            let store = InMemoryStore::new();
            black_box(engine.apply_day(&store, &slate))
        })
    });
}

fn bench_rebuild_season(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let start = NaiveDate::from_ymd_opt(2024, 11, 4).unwrap();
    let end = NaiveDate::from_ymd_opt(2025, 3, 16).unwrap();

    let feed = Arc::new(
        start
            .iter_days()
            .take_while(|d| *d <= end)
            .fold(StaticFeed::new(), |feed, d| feed.with_day(d, bench_slate())),
    );

    c.bench_function("rebuild_full_season", |b| {
        b.iter(|| {
            rt.block_on(async {
                let orchestrator = ReplayOrchestrator::new(
                    Arc::new(InMemoryStore::new()),
                    feed.clone(),
                    RatingEngine::default(),
                );
                black_box(
                    orchestrator
                        .rebuild(start, end, Duration::ZERO, &CancelSignal::never())
                        .await,
                )
            })
        })
    });
}

criterion_group!(
    benches,
    bench_rate_game,
    bench_canonicalize,
    bench_apply_day,
    bench_rebuild_season
);
criterion_main!(benches);
