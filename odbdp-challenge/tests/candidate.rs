use odbdp_challenge::*;

fn example() -> Instance {
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

#[test]
fn test_empty_candidate() {
    let instance = example();
    let mut candidate = Candidate::new(&instance);
    assert_eq!(candidate.evaluate(&instance), 0);
    assert!(candidate.is_feasible());
    assert_eq!(candidate.memory_cost(), 0);
    assert_eq!(candidate.served_queries(), 0);
}

#[test]
fn test_feasible_example() {
    let instance = example();
    let mut candidate = Candidate::from_assignment(vec![Some(0), None, None]);
    assert_eq!(candidate.evaluate(&instance), 9);
    assert!(candidate.is_feasible());
    assert_eq!(candidate.fitness_value(), 9);
    assert_eq!(candidate.memory_cost(), 3);
}

#[test]
fn test_infeasible_example() {
    let instance = example();
    let mut candidate = Candidate::from_assignment(vec![Some(0), Some(1), None]);
    assert_eq!(candidate.evaluate(&instance), INFEASIBLE);
    assert!(!candidate.is_feasible());
    assert_eq!(candidate.memory_cost(), 7);
    // (18 - 3) - (7 - 5)
    assert_eq!(candidate.fitness_value(), 13);
}

#[test]
fn test_memory_equal_to_budget_is_infeasible() {
    let mut instance = example();
    instance.memory_budget = 3;
    let mut candidate = Candidate::from_assignment(vec![Some(0), None, None]);
    assert_eq!(candidate.evaluate(&instance), INFEASIBLE);
    assert_eq!(candidate.fitness_value(), 9);
}

#[test]
fn test_shared_index_is_built_once() {
    let instance = Instance::new(
        2,
        1,
        2,
        10,
        vec![vec![true], vec![true]],
        vec![5],
        vec![4],
        vec![vec![6, 0], vec![0, 7]],
    )
    .unwrap();
    let mut candidate = Candidate::from_assignment(vec![Some(0), Some(1)]);
    assert_eq!(candidate.evaluate(&instance), 6 + 7 - 5);
    assert_eq!(candidate.memory_cost(), 4);
}

#[test]
fn test_evaluation_is_pure() {
    let instance = example();
    let mut candidate = Candidate::from_assignment(vec![Some(0), Some(1), None]);
    candidate.evaluate(&instance);
    let first = *candidate.evaluation();
    candidate.assign(1, Some(1));
    candidate.evaluate(&instance);
    assert_eq!(*candidate.evaluation(), first);
    assert_eq!(
        Candidate::evaluate_assignment(&instance, candidate.assignment()),
        first
    );
}

#[test]
fn test_assign_invalidates_cache() {
    let instance = example();
    let mut candidate = Candidate::from_assignment(vec![Some(0), None, None]);
    candidate.evaluate(&instance);
    assert!(candidate.is_evaluated());
    candidate.assign(0, None);
    assert!(!candidate.is_evaluated());
    assert_eq!(candidate.evaluate(&instance), 0);
}

#[test]
fn test_feasible_ranks_before_infeasible() {
    let instance = example();
    let mut feasible = Candidate::from_assignment(vec![Some(0), None, None]);
    let mut infeasible = Candidate::from_assignment(vec![Some(0), Some(1), None]);
    feasible.evaluate(&instance);
    infeasible.evaluate(&instance);
    assert!(infeasible.fitness_value() > feasible.fitness_value());
    assert_eq!(feasible.rank_cmp(&infeasible), std::cmp::Ordering::Less);
    assert_eq!(infeasible.rank_cmp(&feasible), std::cmp::Ordering::Greater);
}

#[test]
fn test_swap_block() {
    let mut a = Candidate::from_assignment(vec![Some(0), Some(0), Some(0)]);
    let mut b = Candidate::from_assignment(vec![None, Some(1), None]);
    Candidate::swap_block(&mut a, &mut b, 1..3);
    assert_eq!(a.assignment(), &[Some(0), Some(1), None]);
    assert_eq!(b.assignment(), &[None, Some(0), Some(0)]);
}

#[test]
fn test_used_configs() {
    let instance = example();
    let candidate = Candidate::from_assignment(vec![Some(1), None, Some(1)]);
    assert_eq!(candidate.used_configs(&instance), vec![1]);
}

#[test]
fn test_objective_at_i64_limits() {
    let max = i64::MAX as u64;
    let instance = Instance::new(
        2,
        2,
        2,
        5,
        vec![vec![true, false], vec![false, true]],
        vec![0, max],
        vec![1, max - 1],
        vec![vec![max, 0], vec![0, 0]],
    )
    .unwrap();

    let mut rich = Candidate::from_assignment(vec![Some(0), None]);
    assert_eq!(rich.evaluate(&instance), i64::MAX);

    // net = -i64::MAX, overrun close to i64::MAX
    let mut costly = Candidate::from_assignment(vec![None, Some(1)]);
    assert_eq!(costly.evaluate(&instance), INFEASIBLE);
    assert_eq!(costly.fitness_value(), i64::MIN);
}
