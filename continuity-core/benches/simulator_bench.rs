//! Criterion benchmarks for the simulator hot paths.
//!
//! Benchmarks:
//! 1. Streak annotation over a full series
//! 2. Fused scan + aggregation (`Simulator::run`)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use continuity_core::{annotate_streaks, Bar, SimulationConfig, Simulator};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_bars(n: usize) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let open = 1.1000 + (i as f64 * 0.1).sin() * 0.01;
            let close = open + (i as f64 * 0.7).cos() * 0.0015;
            Bar::new(open, open.max(close) + 0.0008, open.min(close) - 0.0008, close)
        })
        .collect()
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_streaks(c: &mut Criterion) {
    let mut group = c.benchmark_group("annotate_streaks");
    for n in [1_000usize, 100_000] {
        let bars = make_bars(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &bars, |b, bars| {
            b.iter(|| annotate_streaks(black_box(bars)))
        });
    }
    group.finish();
}

fn bench_simulation(c: &mut Criterion) {
    let simulator = Simulator::new(SimulationConfig {
        min_streak_len: 2,
        min_body_size: 0.0005,
        ..Default::default()
    })
    .expect("valid config");

    let mut group = c.benchmark_group("simulator_run");
    for n in [1_000usize, 100_000] {
        let bars = make_bars(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &bars, |b, bars| {
            b.iter(|| simulator.run(black_box(bars)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_streaks, bench_simulation);
criterion_main!(benches);
