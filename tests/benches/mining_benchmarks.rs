//! # Quantum-Chain Mining Benchmarks
//!
//! | Area | Operation | Target |
//! |------|-----------|--------|
//! | qc-17 Block Production | Double SHA-256 candidate hash | < 2µs |
//! | qc-17 Block Production | Difficulty predicate | < 100ns |
//! | qc-17 Block Production | Mine at difficulty 1000 | scales with threads |
//! | shared-bus | Publish to N subscribers | O(N) |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qc_17_block_production::{
    check_hash, BlockMiningParameters, Miner, ProofOfWork, Sha256dProofOfWork,
};
use rand::Rng;
use shared_bus::{BlockchainMessage, MessageBus, MessagePublisher};
use shared_types::entities::{Block, NULL_HASH};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// QC-17: Proof of Work
// ============================================================================

fn bench_proof_of_work(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-17-proof-of-work");

    let pow = Sha256dProofOfWork;
    let block = Block::new(42, 1_700_000_000, NULL_HASH);
    group.bench_function("sha256d_candidate_hash", |b| {
        b.iter(|| black_box(pow.hash(black_box(&block))))
    });

    let mut rng = rand::thread_rng();
    let hashes: Vec<[u8; 32]> = (0..1024).map(|_| rng.gen()).collect();
    group.throughput(Throughput::Elements(hashes.len() as u64));
    group.bench_function("check_hash_batch", |b| {
        b.iter(|| {
            hashes
                .iter()
                .filter(|hash| check_hash(hash, black_box(1_000_000)))
                .count()
        })
    });

    group.finish();
}

fn bench_mining(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-17-mining");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);

    let miner = Miner::new(Sha256dProofOfWork);
    let threads = [1, 2, 4];
    for thread_count in threads {
        let mut height = 0u64;
        group.bench_with_input(
            BenchmarkId::new("mine_difficulty_1000", thread_count),
            &thread_count,
            |b, &thread_count| {
                b.iter(|| {
                    // Fresh template each time so the search space differs.
                    height += 1;
                    let parameters = BlockMiningParameters {
                        block_template: Block::new(height, 1_700_000_000, NULL_HASH),
                        difficulty: 1000,
                    };
                    black_box(miner.mine(parameters, thread_count))
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// SHARED-BUS: Broadcast
// ============================================================================

fn bench_broadcast(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared-bus-broadcast");

    for subscribers in [1usize, 8, 64] {
        let bus = Arc::new(MessageBus::<BlockchainMessage>::new());
        let guards: Vec<_> = (0..subscribers).map(|_| bus.subscribe()).collect();

        group.throughput(Throughput::Elements(subscribers as u64));
        group.bench_with_input(
            BenchmarkId::new("publish_new_block", subscribers),
            &subscribers,
            |b, _| {
                b.iter(|| {
                    let delivered = bus.publish(BlockchainMessage::NewBlock {
                        block_hash: [7; 32],
                    });
                    for guard in &guards {
                        while guard.try_pop().is_some() {}
                    }
                    black_box(delivered)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_proof_of_work, bench_mining, bench_broadcast);
criterion_main!(benches);
