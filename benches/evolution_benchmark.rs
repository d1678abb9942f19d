use criterion::{criterion_group, criterion_main, Criterion};
use diffevo::config::{Bounds, RunConfig};
use diffevo::evolution::EvolutionEngine;
use diffevo::objective::{Objective, Rastrigin, Sphere};
use std::time::Duration;

fn bench_config(concurrency: usize) -> RunConfig {
    RunConfig {
        population_size: 200,
        dimension: 100,
        generations: 1,
        concurrency,
        report_interval: 1,
        seed: Some(42),
        bounds: Bounds::new(-5.12, 5.12),
        crossover: Bounds::new(0.1, 0.9),
        mutation: Bounds::new(0.2, 0.8),
    }
}

fn bench_generation<O: Objective>(c: &mut Criterion, label: &str, objective: &O) {
    let mut group = c.benchmark_group(format!("EvolutionEngine Generation ({})", label));
    group.measurement_time(Duration::from_secs(10));

    for concurrency in [1, 4] {
        let config = bench_config(concurrency);
        let mut engine = EvolutionEngine::new(&config, objective, config.dimension).unwrap();
        engine.initialize_population();

        group.bench_function(format!("next_generation_{}_workers", concurrency), |b| {
            b.iter(|| engine.next_generation())
        });
    }

    group.finish();
}

fn benchmark_next_generation(c: &mut Criterion) {
    bench_generation(c, "sphere", &Sphere);
    bench_generation(c, "rastrigin", &Rastrigin);
}

criterion_group!(benches, benchmark_next_generation);
criterion_main!(benches);
