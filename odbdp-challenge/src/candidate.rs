use crate::Instance;
use serde::Serialize;
use std::{cmp::Ordering, ops::Range};

/// Objective value of every infeasible candidate.
pub const INFEASIBLE: i64 = i64::MIN;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Evaluation {
    pub objective: i64,
    pub fitness: i64,
    pub gain: u64,
    pub build_cost: u64,
    pub memory: u64,
    pub feasible: bool,
}

/// One query -> configuration assignment (`None` = unserved) with its cached
/// evaluation. The cache goes stale on every write to the assignment and is
/// refreshed by [`Candidate::evaluate`].
#[derive(Debug, Clone)]
pub struct Candidate {
    assignment: Vec<Option<usize>>,
    evaluation: Evaluation,
    stale: bool,
}

impl Candidate {
    pub fn new(instance: &Instance) -> Self {
        Self {
            assignment: vec![None; instance.num_queries],
            evaluation: Evaluation::default(),
            stale: true,
        }
    }

    pub fn from_assignment(assignment: Vec<Option<usize>>) -> Self {
        Self {
            assignment,
            evaluation: Evaluation::default(),
            stale: true,
        }
    }

    #[inline]
    pub fn assignment(&self) -> &[Option<usize>] {
        &self.assignment
    }

    #[inline]
    pub fn get(&self, query: usize) -> Option<usize> {
        self.assignment[query]
    }

    #[inline]
    pub fn assign(&mut self, query: usize, config: Option<usize>) {
        self.assignment[query] = config;
        self.stale = true;
    }

    pub fn set_assignment(&mut self, assignment: &[Option<usize>]) {
        self.assignment.copy_from_slice(assignment);
        self.stale = true;
    }

    /// Exchanges the genes in `range` between `a` and `b`.
    pub fn swap_block(a: &mut Candidate, b: &mut Candidate, range: Range<usize>) {
        a.assignment[range.clone()].swap_with_slice(&mut b.assignment[range]);
        a.stale = true;
        b.stale = true;
    }

    pub fn evaluate(&mut self, instance: &Instance) -> i64 {
        if self.stale {
            self.evaluation = Self::evaluate_assignment(instance, &self.assignment);
            self.stale = false;
        }
        self.evaluation.objective
    }

    pub fn evaluate_assignment(instance: &Instance, assignment: &[Option<usize>]) -> Evaluation {
        let mut built = vec![false; instance.num_indexes];
        let mut gain = 0u64;
        let mut build_cost = 0u64;
        let mut memory = 0u64;

        for (query, config) in assignment.iter().enumerate() {
            let Some(c) = *config else { continue };
            for &i in &instance.indexes_of[c] {
                if !built[i] {
                    built[i] = true;
                    build_cost += instance.index_costs[i];
                    memory += instance.index_memories[i];
                }
            }
            gain += instance.gains[c][query];
        }

        // Instance::new bounds every total by i64::MAX
        let feasible = memory < instance.memory_budget;
        let net = gain as i64 - build_cost as i64;
        Evaluation {
            objective: if feasible { net } else { INFEASIBLE },
            fitness: if feasible {
                net
            } else {
                net.saturating_sub((memory - instance.memory_budget) as i64)
            },
            gain,
            build_cost,
            memory,
            feasible,
        }
    }

    /// Cached evaluation. Only meaningful after [`Candidate::evaluate`].
    #[inline]
    pub fn evaluation(&self) -> &Evaluation {
        debug_assert!(!self.stale, "candidate read before evaluation");
        &self.evaluation
    }

    #[inline]
    pub fn objective_value(&self) -> i64 {
        self.evaluation().objective
    }

    #[inline]
    pub fn fitness_value(&self) -> i64 {
        self.evaluation().fitness
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.evaluation().feasible
    }

    #[inline]
    pub fn memory_cost(&self) -> u64 {
        self.evaluation().memory
    }

    #[inline]
    pub fn is_evaluated(&self) -> bool {
        !self.stale
    }

    /// Distinct configurations in use, ascending.
    pub fn used_configs(&self, instance: &Instance) -> Vec<usize> {
        let mut used = vec![false; instance.num_configs];
        for c in self.assignment.iter().flatten() {
            used[*c] = true;
        }
        (0..instance.num_configs).filter(|&c| used[c]).collect()
    }

    pub fn served_queries(&self) -> usize {
        self.assignment.iter().filter(|c| c.is_some()).count()
    }

    /// Selection order: feasible before infeasible, then higher fitness first.
    pub fn rank_cmp(&self, other: &Candidate) -> Ordering {
        let a = self.evaluation();
        let b = other.evaluation();
        b.feasible
            .cmp(&a.feasible)
            .then_with(|| b.fitness.cmp(&a.fitness))
    }
}
