//! Benchmarks for genome diffing and population ticks.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

use genops::{
    compute::{FitnessTournament, Generator, Population, generate_diffs, similarity},
    schema::{GenePool, Genome, PopulationConfig},
};

fn bench_similarity(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity");
    let gene_pool: GenePool = (0..4).collect();
    let generator = Generator::new(&gene_pool).unwrap();
    let mut rng = StdRng::seed_from_u64(42);

    for size in [50, 200, 800] {
        let a = generator.create(size, &mut rng);
        // Close relative: a handful of point mutations away.
        let mut b = a.clone();
        for _ in 0..size / 10 {
            b = generator.mutate(&b, &mut rng);
        }

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |bench, _| {
            bench.iter(|| similarity(black_box(&a), black_box(&b)));
        });
    }

    group.finish();
}

fn bench_generate_diffs(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_diffs");
    let gene_pool: GenePool = (0..4).collect();
    let generator = Generator::new(&gene_pool).unwrap();
    let mut rng = StdRng::seed_from_u64(7);

    for size in [50, 200, 800] {
        let a = generator.create(size, &mut rng);
        let mut b = a.clone();
        for _ in 0..size / 10 {
            b = generator.mutate(&b, &mut rng);
        }

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |bench, _| {
            bench.iter(|| generate_diffs(black_box(&a), black_box(&b)));
        });
    }

    group.finish();
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    group.sample_size(20);

    for population_size in [200, 1000] {
        let target: Genome = (0..64).map(|i| i % 4).collect();
        let tournament = FitnessTournament::new(move |g: &Genome| similarity(g, &target));
        let config = PopulationConfig {
            min_population_size: population_size,
            tournament_size: 10,
            operations_per_tick: 20,
            size_window_length: 100,
            size_window_initial: 64,
            random_seed: Some(42),
            ..Default::default()
        };
        let gene_pool: GenePool = (0..4).collect();
        let mut population = Population::new(config, &gene_pool, tournament).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(population_size),
            &population_size,
            |bench, _| {
                bench.iter(|| {
                    population.tick().unwrap();
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_similarity, bench_generate_diffs, bench_tick);
criterion_main!(benches);
