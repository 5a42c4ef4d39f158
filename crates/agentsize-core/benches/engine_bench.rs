//! Throughput of the full assessment pipeline and of the memoized assessor.

use agentsize_core::{Assessor, DimensionId, RulesConfig, ScoreSet, assess, simulate};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn profiles() -> Vec<(&'static str, ScoreSet)> {
    vec![
        ("empty", ScoreSet::new()),
        ("pilot", ScoreSet::uniform(1)),
        ("program", ScoreSet::uniform(2)),
        ("enterprise", ScoreSet::uniform(3)),
    ]
}

fn bench_assess(c: &mut Criterion) {
    let config = RulesConfig::defaults();
    let mut group = c.benchmark_group("assess");

    for (name, scores) in profiles() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &scores, |b, scores| {
            b.iter(|| assess(black_box(scores), black_box(&config)));
        });
    }

    group.finish();
}

fn bench_simulate(c: &mut Criterion) {
    let config = RulesConfig::defaults();
    let baseline = ScoreSet::uniform(2);
    let overrides = [
        (DimensionId::DataSensitivity, 3),
        (DimensionId::UserReach, 3),
    ];

    c.bench_function("simulate/two_overrides", |b| {
        b.iter(|| simulate(black_box(&baseline), black_box(&overrides), &config));
    });
}

fn bench_assessor_hit(c: &mut Criterion) {
    let mut assessor = Assessor::default();
    let scores = ScoreSet::uniform(2);
    let _ = assessor.assess(&scores);

    c.bench_function("assessor/cache_hit", |b| {
        b.iter(|| assessor.assess(black_box(&scores)));
    });
}

criterion_group!(benches, bench_assess, bench_simulate, bench_assessor_hit);
criterion_main!(benches);
