//! Timeline benchmark: Step + push throughput per storage strategy.
//!
//! Each iteration runs the rule on the current generation, records the
//! result, and every 128 steps walks one generation back and forward again.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lifeline::{patterns, rule, Grid, Strategy};

const STEPS: usize = 256;
const NAV_PERIOD: usize = 128;

fn seeded_grid(width: usize, height: usize, seed: u32) -> Grid {
    let mut grid = Grid::new(width, height).unwrap();
    patterns::fill_random(&mut grid, seed);
    grid
}

/// The driver loop: `steps` generations through a fresh timeline.
fn run(strategy: Strategy, seed: &Grid, capacity: usize, steps: usize) -> usize {
    let mut timeline = strategy.build(seed, capacity).unwrap();
    let mut scratch = Grid::new(seed.width(), seed.height()).unwrap();
    for i in 0..steps {
        rule::step(timeline.current(), &mut scratch).unwrap();
        timeline.push(&scratch).unwrap();
        if i % NAV_PERIOD == 0 {
            timeline.back();
            timeline.forward();
        }
    }
    timeline.len()
}

fn step_and_push(c: &mut Criterion) {
    let seed = seeded_grid(128, 96, 1);
    let mut group = c.benchmark_group("step_and_push");
    group.throughput(Throughput::Elements(STEPS as u64));

    for strategy in Strategy::ALL {
        for capacity in [16, 512] {
            group.bench_with_input(
                BenchmarkId::new(strategy.name(), capacity),
                &capacity,
                |b, &capacity| b.iter(|| run(strategy, black_box(&seed), capacity, STEPS)),
            );
        }
    }
    group.finish();
}

fn push_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_full_timeline");

    for (width, height) in [(64, 48), (256, 192)] {
        let grid = seeded_grid(width, height, 7);
        for strategy in Strategy::ALL {
            let mut timeline = strategy.build(&grid, 64).unwrap();
            // Fill so every measured push also evicts.
            for _ in 0..64 {
                timeline.push(&grid).unwrap();
            }
            group.bench_function(
                BenchmarkId::new(strategy.name(), format!("{width}x{height}")),
                |b| b.iter(|| timeline.push(black_box(&grid)).unwrap()),
            );
        }
    }
    group.finish();
}

fn navigate(c: &mut Criterion) {
    let grid = seeded_grid(64, 48, 3);
    let mut group = c.benchmark_group("back_forward");

    for strategy in Strategy::ALL {
        let mut timeline = strategy.build(&grid, 512).unwrap();
        for _ in 0..511 {
            timeline.push(&grid).unwrap();
        }
        group.bench_function(strategy.name(), |b| {
            b.iter(|| {
                while timeline.back() {}
                while timeline.forward() {}
                black_box(timeline.cursor())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, step_and_push, push_only, navigate);
criterion_main!(benches);
