use rand::Rng;
use simplecoin_core::Transaction;

pub fn first_batch() -> Vec<Transaction> {
    vec![
        Transaction::new("adam", "john", 100.0),
        Transaction::new("adam", "jane", 100.0),
        Transaction::new("jane", "adam", 5.0),
    ]
}

pub fn second_batch() -> Vec<Transaction> {
    vec![
        Transaction::new("frank", "beth", 100.0),
        Transaction::new("jimmy", "timmy", 100.0),
        Transaction::new("dude1", "dude2", 5.0),
    ]
}

pub fn random_batch<R: Rng>(rng: &mut R) -> Vec<Transaction> {
    let len = rng.gen_range(0..8);
    (0..len)
        .map(|i| {
            Transaction::new(
                format!("from-{}", rng.gen::<u32>()),
                format!("to-{i}"),
                rng.gen_range(0.0..1_000.0),
            )
        })
        .collect()
}
