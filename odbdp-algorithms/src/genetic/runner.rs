use super::best_tracker::{BestTracker, SaveSolutionFn};
use super::config::Config;
use super::worker::{SearchWorker, WorkerReport};
use anyhow::{anyhow, Result};
use odbdp_challenge::{Candidate, Instance};
use std::thread;
use std::time::Instant;

pub struct SolveOutcome {
    pub best: Option<Candidate>,
    pub reports: Vec<WorkerReport>,
}

pub struct Solver;

impl Solver {
    /// Runs `config.num_workers` search workers until the time limit and
    /// returns the best feasible candidate any of them found.
    pub fn solve(
        instance: &Instance,
        config: Config,
        save_solution: Option<SaveSolutionFn>,
    ) -> Result<SolveOutcome> {
        config.validate()?;
        let tracker = BestTracker::new(save_solution);
        let start = Instant::now();

        tracing::info!(
            queries = instance.num_queries,
            indexes = instance.num_indexes,
            configs = instance.num_configs,
            memory_budget = instance.memory_budget,
            workers = config.num_workers,
            time_limit_ms = config.time_limit_ms,
            "starting genetic search"
        );

        let config = &config;
        let tracker_ref = &tracker;
        let reports = thread::scope(|scope| {
            let handles: Vec<_> = (0..config.num_workers)
                .map(|id| {
                    thread::Builder::new()
                        .name(format!("search-worker-{}", id))
                        .spawn_scoped(scope, move || {
                            SearchWorker::new(id, instance, config, tracker_ref, start).run()
                        })
                })
                .collect::<std::io::Result<_>>()
                .map_err(|e| anyhow!("Failed to spawn search worker: {}", e))?;

            handles
                .into_iter()
                .map(|h| {
                    h.join()
                        .map_err(|_| anyhow!("Search worker panicked"))
                })
                .collect::<Result<Vec<_>>>()
        })?;

        Ok(SolveOutcome {
            best: tracker.into_best(),
            reports,
        })
    }

    pub fn solve_challenge_instance(
        instance: &Instance,
        hyperparameters: &Option<serde_json::Map<String, serde_json::Value>>,
        save_solution: Option<SaveSolutionFn>,
    ) -> Result<Option<Candidate>> {
        let config = Config::initialize(hyperparameters);
        Ok(Self::solve(instance, config, save_solution)?.best)
    }
}
