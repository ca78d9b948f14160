use super::population::Population;
use super::usage::IndexUsage;
use odbdp_challenge::{Candidate, Instance};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Greedy construction strategies for a starting population. Member 0 is always
/// the all-unserved candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Initializer {
    QueryOrder,
    ConfigDriven,
}

impl Initializer {
    pub fn pick(rng: &mut SmallRng) -> Self {
        if rng.gen_bool(0.5) {
            Initializer::QueryOrder
        } else {
            Initializer::ConfigDriven
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Initializer::QueryOrder => "query-order greedy",
            Initializer::ConfigDriven => "configuration-driven greedy",
        }
    }

    pub fn build(&self, instance: &Instance, size: usize, rng: &mut SmallRng) -> Population {
        let mut members = Vec::with_capacity(size);
        members.push(Candidate::new(instance));
        for _ in 1..size {
            members.push(match self {
                Initializer::QueryOrder => query_order_greedy(instance, rng),
                Initializer::ConfigDriven => config_driven_greedy(instance, rng),
            });
        }
        for m in members.iter_mut() {
            m.evaluate(instance);
        }
        Population::from_candidates(members)
    }
}

/// Visits 2·Q random queries, then every query not visited yet in index order,
/// giving each its max-gain configuration. When that overruns the memory
/// budget, the visit counter mod 3 picks the fallback: 2 = best gain among the
/// configurations already used, 1 = a random used one that gains on the query,
/// 0 = leave unserved.
pub fn query_order_greedy(instance: &Instance, rng: &mut SmallRng) -> Candidate {
    let n = instance.num_queries;
    let mut candidate = Candidate::new(instance);
    let mut usage = IndexUsage::new(instance);
    let mut used: Vec<usize> = Vec::with_capacity(2 * n);
    let mut visited = vec![false; n];

    for attempt in 0..2 * n {
        let query = rng.gen_range(0..n);
        visited[query] = true;
        place_query(instance, &mut candidate, &mut usage, &mut used, query, attempt, rng);
    }
    for query in 0..n {
        if !visited[query] {
            place_query(instance, &mut candidate, &mut usage, &mut used, query, query, rng);
        }
    }
    candidate
}

fn place_query(
    instance: &Instance,
    candidate: &mut Candidate,
    usage: &mut IndexUsage,
    used: &mut Vec<usize>,
    query: usize,
    attempt: usize,
    rng: &mut SmallRng,
) {
    let Some(config) = instance.max_gain_config(query) else {
        usage.reassign(instance, candidate, query, None);
        return;
    };
    usage.reassign(instance, candidate, query, Some(config));
    if usage.memory <= instance.memory_budget {
        used.push(config);
        return;
    }

    let fallback = match attempt % 3 {
        2 => highest_gain_used(instance, used, query),
        1 => random_used(instance, used, query, rng),
        _ => None,
    };
    usage.reassign(instance, candidate, query, fallback);
}

fn highest_gain_used(instance: &Instance, used: &[usize], query: usize) -> Option<usize> {
    let mut best = None;
    let mut best_gain = 0;
    for &c in used {
        let g = instance.gain(c, query);
        if g > best_gain {
            best_gain = g;
            best = Some(c);
        }
    }
    best
}

fn random_used(
    instance: &Instance,
    used: &[usize],
    query: usize,
    rng: &mut SmallRng,
) -> Option<usize> {
    let mut serving: Vec<usize> = used
        .iter()
        .copied()
        .filter(|&c| instance.gain(c, query) > 0)
        .collect();
    serving.sort_unstable();
    serving.dedup();
    serving.choose(rng).copied()
}

/// Walks queries in order; each unserved one draws a random serving
/// configuration, which is committed only if its missing indexes fit in the
/// remaining memory. A committed configuration serves every still-unserved
/// query it gains on.
pub fn config_driven_greedy(instance: &Instance, rng: &mut SmallRng) -> Candidate {
    let mut candidate = Candidate::new(instance);
    let mut built = vec![false; instance.num_indexes];
    let mut memory = 0u64;

    for query in 0..instance.num_queries {
        if candidate.get(query).is_some() {
            continue;
        }
        let Some(&config) = instance.configs_serving[query].choose(rng) else {
            continue;
        };
        let extra: u64 = instance.indexes_of[config]
            .iter()
            .filter(|&&i| !built[i])
            .map(|&i| instance.index_memories[i])
            .sum();
        if memory + extra >= instance.memory_budget {
            continue;
        }
        memory += extra;
        for &i in &instance.indexes_of[config] {
            built[i] = true;
        }
        for &q in &instance.queries_gained_by[config] {
            if candidate.get(q).is_none() {
                candidate.assign(q, Some(config));
            }
        }
    }
    candidate
}
