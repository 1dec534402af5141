// In benches/aggregate_bench.rs

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use costar::pairing::{aggregate, pattern_for, select_top, FilmWhitelist};
use costar::types::{CreditRecord, Role};

// --- Synthetic credit stream ---

const FILM_COUNT: usize = 5_000;
const CREDITS_PER_FILM: usize = 10;
const PERSON_POOL: usize = 2_000;

/// Builds a stream contiguous by film, drawing people from a small pool so
/// that pairs recur across films.
fn generate_credits(seed: u64) -> Vec<CreditRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut records = Vec::with_capacity(FILM_COUNT * CREDITS_PER_FILM);
    for film in 0..FILM_COUNT {
        let film_id = format!("tt{:07}", film);
        for _ in 0..CREDITS_PER_FILM {
            let person_id = format!("nm{:07}", rng.random_range(0..PERSON_POOL));
            let role = Role::ALL[rng.random_range(0..Role::ALL.len())];
            records.push(CreditRecord::new(film_id.clone(), person_id, role));
        }
    }
    records
}

// --- Benchmark Suite ---

fn bench_aggregation(c: &mut Criterion) {
    let records = generate_credits(42);
    // Every other film passes the rating/year window.
    let whitelist: FilmWhitelist = (0..FILM_COUNT)
        .step_by(2)
        .map(|film| format!("tt{:07}", film))
        .collect();

    let mut group = c.benchmark_group("Pair Aggregation");
    group.throughput(criterion::Throughput::Elements(records.len() as u64));

    for choice in [2, 4] {
        let pattern = pattern_for(choice).unwrap();
        group.bench_function(format!("Aggregate [{}] {}", choice, pattern), |b| {
            b.iter(|| black_box(aggregate(black_box(records.clone()), pattern, &whitelist)))
        });
    }

    let map = aggregate(records.clone(), pattern_for(4).unwrap(), &whitelist);
    group.bench_function("Select top 10", |b| {
        b.iter(|| black_box(select_top(black_box(&map), 10)))
    });

    group.finish();
}

criterion_group!(benches, bench_aggregation);
criterion_main!(benches);
