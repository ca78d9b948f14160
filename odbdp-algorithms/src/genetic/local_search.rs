use super::usage::IndexUsage;
use odbdp_challenge::{Candidate, Instance};

/// First-improvement neighbourhood over "switch on one more configuration".
pub struct LocalSearch<'a> {
    instance: &'a Instance,
    snapshot: Vec<Option<usize>>,
    in_use: Vec<bool>,
}

impl<'a> LocalSearch<'a> {
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            instance,
            snapshot: Vec::with_capacity(instance.num_queries),
            in_use: vec![false; instance.num_configs],
        }
    }

    /// Tries every configuration the candidate does not use yet, in index order.
    /// The first one whose missing indexes fit in memory and whose gain on the
    /// unserved queries exceeds their build cost is kept; every other attempt is
    /// rolled back. Returns whether the candidate changed. The candidate is
    /// evaluated on return.
    pub fn refine(&mut self, candidate: &mut Candidate) -> bool {
        let instance = self.instance;
        candidate.evaluate(instance);

        self.snapshot.clear();
        self.snapshot.extend_from_slice(candidate.assignment());
        self.in_use.iter_mut().for_each(|u| *u = false);
        for c in candidate.used_configs(instance) {
            self.in_use[c] = true;
        }
        let usage = IndexUsage::of(instance, candidate);

        for config in 0..instance.num_configs {
            if self.in_use[config] {
                continue;
            }
            let (extra_memory, extra_cost) = usage.extra_for(instance, config);
            if usage.memory + extra_memory >= instance.memory_budget {
                continue;
            }

            let mut gain = 0u64;
            for &q in &instance.queries_gained_by[config] {
                if candidate.get(q).is_none() {
                    candidate.assign(q, Some(config));
                    gain += instance.gain(config, q);
                }
            }

            if gain > extra_cost {
                candidate.evaluate(instance);
                return true;
            }
            if gain > 0 {
                candidate.set_assignment(&self.snapshot);
            }
        }

        candidate.evaluate(instance);
        false
    }
}
