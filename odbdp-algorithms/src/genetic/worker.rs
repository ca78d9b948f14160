use super::best_tracker::BestTracker;
use super::config::Config;
use super::initializer::Initializer;
use super::local_search::LocalSearch;
use super::operators::{crossover_pairs, mutate};
use super::population::Population;
use odbdp_challenge::{Candidate, Instance, INFEASIBLE};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerState {
    Init,
    Evolve,
    Restart,
    Terminate,
}

#[derive(Clone, Debug)]
pub struct WorkerReport {
    pub worker_id: usize,
    pub generations: u64,
    pub restarts: u64,
    pub refinements: u64,
    pub restart_threshold: u64,
    pub best_objective: i64,
}

/// One independent search thread: owns its RNG and population, shares only the
/// instance, the config and the [`BestTracker`].
pub struct SearchWorker<'a, 's> {
    id: usize,
    instance: &'a Instance,
    config: &'a Config,
    tracker: &'a BestTracker<'s>,
    start: Instant,
    time_limit: Duration,
    rng: SmallRng,
    local_search: LocalSearch<'a>,
    population: Population,
    local_best: Candidate,
    best_objective: i64,
    generation: u64,
    last_improvement: u64,
    last_refinement: u64,
    restart_threshold: u64,
    restarts: u64,
    refinements: u64,
    total_generations: u64,
}

impl<'a, 's> SearchWorker<'a, 's> {
    pub fn new(
        id: usize,
        instance: &'a Instance,
        config: &'a Config,
        tracker: &'a BestTracker<'s>,
        start: Instant,
    ) -> Self {
        let mut local_best = Candidate::new(instance);
        local_best.evaluate(instance);
        Self {
            id,
            instance,
            config,
            tracker,
            start,
            time_limit: Duration::from_millis(config.time_limit_ms),
            rng: SmallRng::seed_from_u64(0),
            local_search: LocalSearch::new(instance),
            population: Population::default(),
            local_best,
            best_objective: INFEASIBLE,
            generation: 0,
            last_improvement: 0,
            last_refinement: 0,
            restart_threshold: config.restart_after,
            restarts: 0,
            refinements: 0,
            total_generations: 0,
        }
    }

    pub fn run(mut self) -> WorkerReport {
        let mut state = WorkerState::Init;
        while state != WorkerState::Terminate {
            state = match state {
                WorkerState::Init => {
                    self.initialize();
                    WorkerState::Evolve
                }
                WorkerState::Evolve => self.evolve(),
                WorkerState::Restart => {
                    self.restart();
                    WorkerState::Init
                }
                WorkerState::Terminate => WorkerState::Terminate,
            };
        }

        self.best_objective = self.best_objective.max(self.local_best.objective_value());
        tracing::info!(
            worker = self.id,
            generations = self.total_generations,
            restarts = self.restarts,
            refinements = self.refinements,
            best = self.best_objective,
            "worker finished"
        );
        WorkerReport {
            worker_id: self.id,
            generations: self.total_generations,
            restarts: self.restarts,
            refinements: self.refinements,
            restart_threshold: self.restart_threshold,
            best_objective: self.best_objective,
        }
    }

    #[inline]
    pub fn restart_threshold(&self) -> u64 {
        self.restart_threshold
    }

    fn progress(&self) -> f64 {
        if self.time_limit.is_zero() {
            return 1.0;
        }
        self.start.elapsed().as_secs_f64() / self.time_limit.as_secs_f64()
    }

    fn time_is_up(&self) -> bool {
        self.start.elapsed() >= self.time_limit
    }

    fn reseed(&mut self) {
        self.rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(
                seed.wrapping_add((self.id as u64) << 32)
                    .wrapping_add(self.restarts),
            ),
            None => SmallRng::from_entropy(),
        };
    }

    pub fn initialize(&mut self) {
        self.reseed();
        let initializer = Initializer::pick(&mut self.rng);
        tracing::info!(
            worker = self.id,
            restart = self.restarts,
            initializer = initializer.name(),
            "(re)starting search"
        );

        let size = self
            .config
            .population_size_at(self.instance.num_queries, self.progress());
        self.population = initializer.build(self.instance, size, &mut self.rng);
        self.generation = 0;
        self.last_improvement = 0;
        self.last_refinement = 0;

        self.local_best = Candidate::new(self.instance);
        self.local_best.evaluate(self.instance);
        self.tracker.try_update(&self.local_best);
        // rank order puts the highest feasible objective first
        absorb(&mut self.local_best, self.tracker, self.population.best().into_iter());
    }

    /// Runs generations until the time limit or the restart threshold is hit.
    pub fn evolve(&mut self) -> WorkerState {
        loop {
            if self.time_is_up() {
                return WorkerState::Terminate;
            }
            self.step();
            if self.generation - self.last_improvement > self.restart_threshold {
                return WorkerState::Restart;
            }
        }
    }

    /// One breed / evaluate / replace cycle, plus a local search pass once the
    /// population has stagnated long enough.
    pub fn step(&mut self) {
        let instance = self.instance;
        debug_assert!(!self.population.is_empty(), "step before initialize");
        let progress = self.progress();
        let size = self.config.population_size_at(instance.num_queries, progress);

        let parents = self.population.take_top(size);
        let mut offspring = parents.clone();
        let points = self
            .rng
            .gen_range(self.config.min_crossover_points..=self.config.max_crossover_points);
        crossover_pairs(&mut offspring, points, &mut self.rng);
        let nonzero_percent = self.config.mutation_nonzero_percent_at(progress);
        for child in offspring.iter_mut() {
            mutate(instance, child, nonzero_percent, &mut self.rng);
            child.evaluate(instance);
        }

        if absorb(&mut self.local_best, self.tracker, offspring.iter()) {
            self.last_improvement = self.generation;
        }
        self.population.merge(parents, offspring);
        self.generation += 1;
        self.total_generations += 1;

        let stagnant_since = self.last_improvement.max(self.last_refinement);
        if self.generation - stagnant_since >= self.config.local_search_after {
            self.refine(size);
        }
    }

    fn refine(&mut self, size: usize) {
        tracing::debug!(
            worker = self.id,
            generation = self.generation,
            "running local search"
        );
        let mut members = self.population.take_top(size);
        for member in members.iter_mut() {
            self.local_search.refine(member);
        }
        if absorb(&mut self.local_best, self.tracker, members.iter()) {
            self.last_improvement = self.generation;
        }
        self.population = Population::from_candidates(members);
        self.last_refinement = self.generation;
        self.refinements += 1;
    }

    /// Raises the restart threshold and drops the population; the next state is Init.
    pub fn restart(&mut self) {
        let previous = self.restart_threshold;
        self.restart_threshold = self
            .config
            .next_restart_threshold(previous, self.last_improvement);
        tracing::info!(
            worker = self.id,
            generation = self.generation,
            threshold = self.restart_threshold,
            discarded = self.population.len(),
            "population stagnated, restarting"
        );
        self.best_objective = self.best_objective.max(self.local_best.objective_value());
        self.population.clear();
        self.restarts += 1;
    }

    pub fn local_best(&self) -> &Candidate {
        &self.local_best
    }

    pub fn population(&self) -> &Population {
        &self.population
    }
}

/// Copies the best of `candidates` into `local_best` if it improves on it, and
/// offers it to the tracker. Returns whether the local best changed.
fn absorb<'c>(
    local_best: &mut Candidate,
    tracker: &BestTracker,
    candidates: impl Iterator<Item = &'c Candidate>,
) -> bool {
    let best = candidates.reduce(|a, b| {
        if b.objective_value() > a.objective_value() {
            b
        } else {
            a
        }
    });
    match best {
        Some(best) if best.objective_value() > local_best.objective_value() => {
            *local_best = best.clone();
            tracing::debug!(objective = best.objective_value(), "new local best");
            tracker.try_update(local_best);
            true
        }
        _ => false,
    }
}
