//! Single-game and aggregation benchmarks

use bb_core::engine::deterministic::{seeded_factory, trial_rng};
use bb_core::{run_monte_carlo, simulate_game, BatterStatline, Lineup, PitcherStatline};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn lineup(team: &str) -> Lineup {
    let pitcher = PitcherStatline::new(214, 76, 207, 913).unwrap();
    let batters = (1..=9)
        .map(|i| {
            BatterStatline::builder(format!("{team} #{i}"))
                .at_bats(3059)
                .hits(783)
                .extra_base_hits(160, 13, 130)
                .strikeouts(720)
                .batting_average(0.256)
                .build()
                .unwrap()
        })
        .collect();
    Lineup::new(team, pitcher, batters).unwrap()
}

fn bench_single_game(c: &mut Criterion) {
    let home = lineup("Home");
    let away = lineup("Away");
    let mut trial = 0u64;

    c.bench_function("single_game", |b| {
        b.iter(|| {
            trial += 1;
            simulate_game(black_box(&home), black_box(&away), &mut trial_rng(7, trial)).unwrap()
        })
    });
}

fn bench_aggregation_10k(c: &mut Criterion) {
    let home = lineup("Home");
    let away = lineup("Away");

    let mut group = c.benchmark_group("aggregation");
    group.sample_size(10);
    group.bench_function("monte_carlo_10k", |b| {
        b.iter(|| run_monte_carlo(black_box(&home), black_box(&away), 10_000, seeded_factory(7)).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_single_game, bench_aggregation_10k);
criterion_main!(benches);
