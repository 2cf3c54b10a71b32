use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use simplecoin_core::{Block, BlockTemplate, MiningConfig, Sha256Merkle, Transaction};

fn template() -> BlockTemplate {
    let mut rng = StdRng::seed_from_u64(42);
    let transactions: Vec<Transaction> = (0..10)
        .map(|i| Transaction::new(format!("alice-{i}"), "bob", rng.gen_range(1.0..10.0)))
        .collect();
    BlockTemplate {
        index: 1,
        transactions,
        prev_block: Some(0),
        prev_hash: Some([0u8; 32]),
    }
}

fn bench_pow(c: &mut Criterion) {
    c.bench_function("mine_block_difficulty_4", |b| {
        let template = template();
        b.iter(|| Block::new(template.clone(), 4).unwrap());
    });

    c.bench_function("mine_block_difficulty_4_parallel", |b| {
        let template = template();
        let config = MiningConfig {
            difficulty: 4,
            max_attempts: None,
            parallel: true,
        };
        b.iter(|| Block::mine_with(template.clone(), &config, &Sha256Merkle).unwrap());
    });
}

criterion_group!(benches, bench_pow);
criterion_main!(benches);
