use anyhow::Result;
use odbdp_challenge::{Candidate, INFEASIBLE};
use std::sync::{Mutex, PoisonError};

pub type SaveSolutionFn<'a> = &'a (dyn Fn(&Candidate) -> Result<()> + Sync);

/// Best feasible candidate seen by any worker. Comparing, replacing and
/// persisting happen under one lock.
pub struct BestTracker<'a> {
    best: Mutex<Option<Candidate>>,
    save_solution: Option<SaveSolutionFn<'a>>,
}

impl<'a> BestTracker<'a> {
    pub fn new(save_solution: Option<SaveSolutionFn<'a>>) -> Self {
        Self {
            best: Mutex::new(None),
            save_solution,
        }
    }

    /// Stores a copy of `candidate` if it is feasible and strictly better than
    /// the current best. Returns whether it was stored.
    pub fn try_update(&self, candidate: &Candidate) -> bool {
        if !candidate.is_feasible() {
            return false;
        }
        let mut best = self.best.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(current) = best.as_ref() {
            if candidate.objective_value() <= current.objective_value() {
                return false;
            }
        }
        *best = Some(candidate.clone());

        tracing::info!(
            objective = candidate.objective_value(),
            memory = candidate.memory_cost(),
            "new best solution"
        );
        if let Some(save) = self.save_solution {
            if let Err(e) = save(candidate) {
                tracing::warn!("failed to persist best solution: {:#}", e);
            }
        }
        true
    }

    /// Objective of the stored candidate, [`INFEASIBLE`] if there is none.
    pub fn objective(&self) -> i64 {
        self.best
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map_or(INFEASIBLE, |c| c.objective_value())
    }

    pub fn into_best(self) -> Option<Candidate> {
        self.best.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
