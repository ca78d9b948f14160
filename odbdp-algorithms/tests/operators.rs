mod common;

use common::*;
use odbdp_algorithms::genetic::{crossover, crossover_pairs, mutate};
use odbdp_challenge::Candidate;
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[test]
fn test_crossover_swaps_alternate_blocks() {
    let mut a = Candidate::from_assignment(vec![Some(0); 6]);
    let mut b = Candidate::from_assignment(vec![None; 6]);
    crossover(&mut a, &mut b, 3);
    assert_eq!(a.assignment(), &[None, None, Some(0), Some(0), None, None]);
    assert_eq!(b.assignment(), &[Some(0), Some(0), None, None, Some(0), Some(0)]);
}

#[test]
fn test_crossover_more_points_than_genes() {
    let mut a = Candidate::from_assignment(vec![Some(1), Some(1), Some(1)]);
    let mut b = Candidate::from_assignment(vec![None, None, None]);
    crossover(&mut a, &mut b, 10);
    assert_eq!(a.assignment(), &[None, Some(1), None]);
    assert_eq!(b.assignment(), &[Some(1), None, Some(1)]);
}

#[test]
fn test_crossover_pairs_preserves_genes_per_position() {
    let instance = random_instance(3, 20, 6, 8);
    let mut rng = SmallRng::seed_from_u64(11);
    let mut offspring: Vec<Candidate> = (0..10)
        .map(|_| {
            let mut c = Candidate::new(&instance);
            mutate(&instance, &mut c, 100, &mut rng);
            mutate(&instance, &mut c, 100, &mut rng);
            c
        })
        .collect();

    let column = |pop: &[Candidate], q: usize| {
        let mut genes: Vec<Option<usize>> = pop.iter().map(|c| c.get(q)).collect();
        genes.sort();
        genes
    };
    let before: Vec<_> = (0..20).map(|q| column(&offspring, q)).collect();
    for n in 2..=5 {
        crossover_pairs(&mut offspring, n, &mut rng);
    }
    let after: Vec<_> = (0..20).map(|q| column(&offspring, q)).collect();
    assert_eq!(before, after);
}

#[test]
fn test_mutation_only_assigns_serving_configs() {
    let instance = random_instance(5, 15, 5, 7);
    let mut rng = SmallRng::seed_from_u64(1);
    let mut candidate = Candidate::new(&instance);
    for _ in 0..500 {
        mutate(&instance, &mut candidate, 90, &mut rng);
        assert_valid_genes(&instance, candidate.assignment());
    }
    assert!(candidate.served_queries() > 0);
}

#[test]
fn test_mutation_with_zero_percent_clears_genes() {
    let instance = example();
    let mut rng = SmallRng::seed_from_u64(2);
    let mut candidate = Candidate::from_assignment(vec![Some(0), Some(1), None]);
    for _ in 0..200 {
        mutate(&instance, &mut candidate, 0, &mut rng);
    }
    assert_eq!(candidate.served_queries(), 0);
}
