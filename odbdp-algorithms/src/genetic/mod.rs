mod best_tracker;
mod config;
mod initializer;
mod local_search;
mod operators;
mod population;
mod runner;
mod usage;
mod worker;

pub use best_tracker::{BestTracker, SaveSolutionFn};
pub use config::{Config, RestartPolicy};
pub use initializer::{config_driven_greedy, query_order_greedy, Initializer};
pub use local_search::LocalSearch;
pub use operators::{crossover, crossover_pairs, mutate};
pub use population::Population;
pub use runner::{SolveOutcome, Solver};
pub use usage::IndexUsage;
pub use worker::{SearchWorker, WorkerReport, WorkerState};

use anyhow::Result;
use odbdp_challenge::{Candidate, Instance};
use serde_json::{Map, Value};

pub fn solve_challenge(
    instance: &Instance,
    save_solution: &(dyn Fn(&Candidate) -> Result<()> + Sync),
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<Option<Candidate>> {
    Solver::solve_challenge_instance(instance, hyperparameters, Some(save_solution))
}

pub fn help() {
    println!("Parallel genetic search with local search refinement and multi-start");
    println!("");
    println!("HYPERPARAMETERS (JSON object, every key optional):");
    println!("  num_workers                     search threads (default 2)");
    println!("  population_size                 parents kept per generation (default 100)");
    println!("  population_per_query            population = factor * #queries");
    println!("  min_population_size             shrink population linearly to this floor");
    println!("  min_crossover_points            lower bound of crossover blocks (default 2)");
    println!("  max_crossover_points            upper bound of crossover blocks (default 5)");
    println!("  mutation_nonzero_percent        % of mutations to a serving config (default 90)");
    println!("  final_mutation_nonzero_percent  move the % above linearly to this value");
    println!("  local_search_after              stagnant generations before refining (default 50)");
    println!("  restart_after                   stagnant generations to restart (default 1000)");
    println!("  restart_policy                  \"raise_to_last_improvement\" or \"double\"");
    println!("  time_limit_ms                   wall-clock budget (default 180000)");
    println!("  seed                            base seed for reproducible runs");
}
