//! Performance benchmarks for queue operations

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rift_queue::config::{EngineConfig, PairingFairness};
use rift_queue::policy::UniformPolicy;
use rift_queue::queue::Matchmaker;
use rift_queue::types::{Group, Player, PlayerId, Rank, Roles};

fn config() -> EngineConfig {
    EngineConfig {
        team_size: 5,
        backpressure_threshold: 32,
        fairness: PairingFairness::NewestFirst,
    }
}

fn make_group(size: usize, first_id: PlayerId) -> Group {
    let mut g = Group::new(5).unwrap();
    for slot in 0..size {
        g.place(
            slot,
            Player {
                id: first_id + slot as PlayerId,
                rank: Rank::Gold,
                score: 1000.0 + (first_id % 500) as f64,
                roles: Roles::for_slot(slot),
            },
        )
        .unwrap();
    }
    g
}

fn bench_push_mixed_sizes(c: &mut Criterion) {
    let sizes = [2usize, 3, 1, 4, 5];

    c.bench_function("push_100_mixed_groups", |b| {
        b.iter(|| {
            let mut engine = Matchmaker::open(config(), Box::new(UniformPolicy)).unwrap();
            let mut next_id: PlayerId = 1;
            for i in 0..100 {
                let size = sizes[i % sizes.len()];
                engine.push(black_box(make_group(size, next_id))).unwrap();
                next_id += size as PlayerId;
            }
            black_box(engine.ready_len())
        });
    });
}

fn bench_find_match_drain(c: &mut Criterion) {
    c.bench_function("drain_50_ready_groups", |b| {
        b.iter(|| {
            let mut engine = Matchmaker::open(config(), Box::new(UniformPolicy)).unwrap();
            for i in 0..50u64 {
                engine.push(make_group(5, i * 5 + 1)).unwrap();
            }
            let mut pairs = 0usize;
            while let Some(paired) = engine.find_match().unwrap() {
                black_box(&paired);
                pairs += 1;
            }
            black_box(pairs)
        });
    });
}

fn bench_pop_lifo(c: &mut Criterion) {
    c.bench_function("pop_100_ready_groups", |b| {
        b.iter(|| {
            let mut engine = Matchmaker::open(config(), Box::new(UniformPolicy)).unwrap();
            for i in 0..100u64 {
                engine.push(make_group(5, i * 5 + 1)).unwrap();
            }
            while !engine.is_empty() {
                black_box(engine.pop().unwrap());
            }
        });
    });
}

criterion_group!(
    benches,
    bench_push_mixed_sizes,
    bench_find_match_drain,
    bench_pop_lifo
);
criterion_main!(benches);
