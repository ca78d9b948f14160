use odbdp_challenge::Instance;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[allow(dead_code)]
pub fn example() -> Instance {
    Instance::new(
        3,
        2,
        2,
        5,
        vec![vec![true, false], vec![false, true]],
        vec![1, 2],
        vec![3, 4],
        vec![vec![10, 0, 0], vec![0, 8, 0]],
    )
    .unwrap()
}

#[allow(dead_code)]
pub fn random_instance(
    seed: u64,
    num_queries: usize,
    num_indexes: usize,
    num_configs: usize,
) -> Instance {
    let mut rng = SmallRng::seed_from_u64(seed);
    let config_indexes: Vec<Vec<bool>> = (0..num_configs)
        .map(|c| {
            let mut row: Vec<bool> = (0..num_indexes).map(|_| rng.gen_bool(0.3)).collect();
            row[c % num_indexes] = true;
            row
        })
        .collect();
    let index_costs = (0..num_indexes).map(|_| rng.gen_range(1..20)).collect();
    let index_memories: Vec<u64> = (0..num_indexes).map(|_| rng.gen_range(1..10)).collect();
    let gains = (0..num_configs)
        .map(|_| {
            (0..num_queries)
                .map(|_| if rng.gen_bool(0.4) { rng.gen_range(1..50) } else { 0 })
                .collect()
        })
        .collect();
    let memory_budget = index_memories.iter().sum::<u64>() / 2;
    Instance::new(
        num_queries,
        num_indexes,
        num_configs,
        memory_budget,
        config_indexes,
        index_costs,
        index_memories,
        gains,
    )
    .unwrap()
}

#[allow(dead_code)]
pub fn assert_valid_genes(instance: &Instance, assignment: &[Option<usize>]) {
    assert_eq!(assignment.len(), instance.num_queries);
    for (q, gene) in assignment.iter().enumerate() {
        if let Some(c) = gene {
            assert!(*c < instance.num_configs);
            assert!(instance.gain(*c, q) > 0, "query {} assigned to non-serving config {}", q, c);
        }
    }
}
