//! Criterion benchmarks for Monte Carlo curve throughput

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use shopodds_engine::{simulate, AcquisitionState, GameConstants, Level, PoolDepletion, SimConfig, Tier};

fn benchmark_default_curve(c: &mut Criterion) {
    let constants = GameConstants::standard();
    let level = Level::new(8).unwrap();
    let tier = Tier::new(4).unwrap();
    let state = AcquisitionState::three_star(7, 0, 42);
    let config = SimConfig::seeded(12345);

    c.bench_function("simulate_default_curve", |b| {
        b.iter(|| {
            let curve = simulate(constants, level, tier, black_box(&state), &config).unwrap();
            black_box(curve.len())
        })
    });
}

fn benchmark_cross_validation_curve(c: &mut Criterion) {
    let constants = GameConstants::standard();
    let level = Level::new(8).unwrap();
    let tier = Tier::new(4).unwrap();
    let state = AcquisitionState::three_star(7, 0, 42);
    let config = SimConfig::cross_validation(600, 12345);
    assert_eq!(config.depletion, PoolDepletion::OnHit);

    let mut group = c.benchmark_group("simulate_cross_validation");
    group.sample_size(20);
    group.bench_function("5000_trials_600_currency", |b| {
        b.iter(|| {
            let curve = simulate(constants, level, tier, black_box(&state), &config).unwrap();
            black_box(curve.mean_currency())
        })
    });
    group.finish();
}

criterion_group!(benches, benchmark_default_curve, benchmark_cross_validation_curve);
criterion_main!(benches);
