//! Benchmark for one generation of the evolution loop.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use gendun::EvolutionConfig;
use gendun::gp::Evolution;

fn bench_step(c: &mut Criterion) {
    let config = EvolutionConfig {
        population_limit: 120,
        seed: 42,
        ..EvolutionConfig::default()
    };
    let mut evolution = Evolution::new(config).expect("Failed to build initial population");

    let mut group = c.benchmark_group("evolution");
    group.sample_size(20);
    group.bench_function("step_pop120", |b| {
        b.iter(|| black_box(evolution.step().expect("Generation failed").stats.best_fitness));
    });
    group.finish();
}

criterion_group!(benches, bench_step);
criterion_main!(benches);
