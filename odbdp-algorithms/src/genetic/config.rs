use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RestartPolicy {
    /// Raise the threshold to the generation of the last improvement, if larger.
    RaiseToLastImprovement,
    Double,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Number of independent search threads
    pub num_workers: usize,

    /// Parents kept per generation (P)
    pub population_size: usize,

    /// If set, P = population_per_query * number of queries
    pub population_per_query: Option<usize>,

    /// If set, P shrinks linearly to this floor as the time limit runs out
    pub min_population_size: Option<usize>,

    /// Inclusive range of block counts for N-point crossover
    pub min_crossover_points: usize,
    pub max_crossover_points: usize,

    /// Chance (in %) that a mutated gene gets a serving configuration instead of none
    pub mutation_nonzero_percent: u32,

    /// If set, the chance above moves linearly to this value over the run
    pub final_mutation_nonzero_percent: Option<u32>,

    /// Generations without improvement before a local search pass
    pub local_search_after: u64,

    /// Initial generations without improvement before a restart
    pub restart_after: u64,
    pub restart_policy: RestartPolicy,

    pub time_limit_ms: u64,

    /// Fixed base seed for reproducible runs; OS entropy otherwise
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_workers: 2,
            population_size: 100,
            population_per_query: None,
            min_population_size: None,
            min_crossover_points: 2,
            max_crossover_points: 5,
            mutation_nonzero_percent: 90,
            final_mutation_nonzero_percent: None,
            local_search_after: 50,
            restart_after: 1000,
            restart_policy: RestartPolicy::RaiseToLastImprovement,
            time_limit_ms: 180_000,
            seed: None,
        }
    }
}

impl Config {
    /// Overlays `hyperparameters` on the defaults. Unknown keys are ignored and a
    /// map that does not deserialize falls back to the defaults.
    pub fn initialize(hyperparameters: &Option<Map<String, Value>>) -> Self {
        let mut merged = match serde_json::to_value(Self::default()) {
            Ok(v) => v,
            Err(_) => return Self::default(),
        };
        if let (Value::Object(ref mut obj), Some(map)) = (&mut merged, hyperparameters) {
            for (k, v) in map {
                if obj.contains_key(k) {
                    obj.insert(k.clone(), v.clone());
                }
            }
        }
        serde_json::from_value(merged).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_workers == 0 {
            return Err(anyhow!("num_workers must be at least 1"));
        }
        if self.population_size < 2 {
            return Err(anyhow!("population_size must be at least 2"));
        }
        if self.population_per_query == Some(0) {
            return Err(anyhow!("population_per_query must be positive"));
        }
        if let Some(min) = self.min_population_size {
            if min < 2 {
                return Err(anyhow!("min_population_size must be at least 2"));
            }
        }
        if self.min_crossover_points == 0 || self.min_crossover_points > self.max_crossover_points {
            return Err(anyhow!(
                "Invalid crossover point range [{}, {}]",
                self.min_crossover_points,
                self.max_crossover_points
            ));
        }
        if self.mutation_nonzero_percent > 100
            || self.final_mutation_nonzero_percent.map_or(false, |p| p > 100)
        {
            return Err(anyhow!("Mutation percentages must be within [0, 100]"));
        }
        if self.local_search_after == 0 || self.restart_after == 0 {
            return Err(anyhow!("Stagnation thresholds must be positive"));
        }
        Ok(())
    }

    /// Population size at the start of a run.
    pub fn initial_population_size(&self, num_queries: usize) -> usize {
        match self.population_per_query {
            Some(k) => (k * num_queries).max(2),
            None => self.population_size,
        }
    }

    /// Population size once `progress` (elapsed / time limit, in [0, 1]) of the run has passed.
    pub fn population_size_at(&self, num_queries: usize, progress: f64) -> usize {
        let start = self.initial_population_size(num_queries);
        match self.min_population_size {
            Some(min) if min < start => {
                let span = (start - min) as f64;
                let size = start as f64 - span * progress.clamp(0.0, 1.0);
                (size.round() as usize).clamp(min, start)
            }
            _ => start,
        }
    }

    pub fn mutation_nonzero_percent_at(&self, progress: f64) -> u32 {
        match self.final_mutation_nonzero_percent {
            Some(end) => {
                let start = self.mutation_nonzero_percent as f64;
                let p = start + (end as f64 - start) * progress.clamp(0.0, 1.0);
                p.round() as u32
            }
            None => self.mutation_nonzero_percent,
        }
    }

    /// Next restart threshold; never smaller than `current`.
    pub fn next_restart_threshold(&self, current: u64, last_improvement: u64) -> u64 {
        match self.restart_policy {
            RestartPolicy::RaiseToLastImprovement => current.max(last_improvement),
            RestartPolicy::Double => current.saturating_mul(2),
        }
    }
}
