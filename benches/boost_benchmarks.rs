//! Performance benchmarks for the boosting loop and hex rendering
//!
//! Run with: cargo bench --bench boost_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gentleboost::{encode_binary, render_hex, termination, Cascade, Detector, GentleBoost, NormalizedRegion, RegressionTreeData};
use rand::{Rng, SeedableRng};
use std::convert::Infallible;

/// Benchmark the reweighting/normalization loop at different sample counts.
fn bench_training_rounds(c: &mut Criterion) {
    let mut group = c.benchmark_group("train_rounds");

    for size in [100, 1_000, 10_000].iter() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let labels: Vec<f32> = (0..*size)
            .map(|_| if rng.gen_bool(0.5) { 1.0 } else { -1.0 })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut booster: GentleBoost<f32> = GentleBoost::new();
                booster
                    .train(
                        black_box(&labels),
                        |_| Ok::<_, Infallible>(0.01f32),
                        |learner, _| *learner,
                        termination::max_rounds(32),
                    )
                    .unwrap();
                black_box(booster.len())
            });
        });
    }

    group.finish();
}

/// Benchmark encoding plus hex rendering of a mid-sized cascade.
fn bench_serialization(c: &mut Criterion) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(11);
    let mut cascade = Cascade::new();
    for _ in 0..20 {
        let learners: Vec<RegressionTreeData> = (0..64)
            .map(|_| {
                RegressionTreeData::new(
                    6,
                    (0..5).map(|_| rng.gen()).collect(),
                    (0..6).map(|_| rng.gen_range(-1.0..1.0)).collect(),
                )
                .unwrap()
            })
            .collect();
        cascade.push_stage(GentleBoost::from_learners(learners), 0.0);
    }
    let detector = Detector::new(NormalizedRegion::default(), cascade);
    let bytes = encode_binary(&detector).unwrap();

    c.bench_function("encode_binary", |b| {
        b.iter(|| black_box(encode_binary(black_box(&detector)).unwrap()));
    });

    c.bench_function("render_hex", |b| {
        b.iter(|| black_box(render_hex(black_box(&bytes))));
    });
}

criterion_group!(benches, bench_training_rounds, bench_serialization);
criterion_main!(benches);
