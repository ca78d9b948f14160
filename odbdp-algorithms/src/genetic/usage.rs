use odbdp_challenge::{Candidate, Instance};

/// How many served queries need each index, and the memory of all indexes in use.
#[derive(Clone, Debug)]
pub struct IndexUsage {
    pub counts: Vec<u32>,
    pub memory: u64,
}

impl IndexUsage {
    pub fn new(instance: &Instance) -> Self {
        Self {
            counts: vec![0; instance.num_indexes],
            memory: 0,
        }
    }

    pub fn of(instance: &Instance, candidate: &Candidate) -> Self {
        let mut usage = Self::new(instance);
        for c in candidate.assignment().iter().flatten() {
            usage.add(instance, *c);
        }
        usage
    }

    pub fn add(&mut self, instance: &Instance, config: usize) {
        for &i in &instance.indexes_of[config] {
            if self.counts[i] == 0 {
                self.memory += instance.index_memories[i];
            }
            self.counts[i] += 1;
        }
    }

    pub fn remove(&mut self, instance: &Instance, config: usize) {
        for &i in &instance.indexes_of[config] {
            self.counts[i] -= 1;
            if self.counts[i] == 0 {
                self.memory -= instance.index_memories[i];
            }
        }
    }

    /// Memory and build cost of the indexes `config` needs that are not in use yet.
    pub fn extra_for(&self, instance: &Instance, config: usize) -> (u64, u64) {
        let mut memory = 0;
        let mut cost = 0;
        for &i in &instance.indexes_of[config] {
            if self.counts[i] == 0 {
                memory += instance.index_memories[i];
                cost += instance.index_costs[i];
            }
        }
        (memory, cost)
    }

    /// Reassigns `query` in `candidate`, keeping the counters in sync.
    pub fn reassign(
        &mut self,
        instance: &Instance,
        candidate: &mut Candidate,
        query: usize,
        config: Option<usize>,
    ) {
        if let Some(old) = candidate.get(query) {
            self.remove(instance, old);
        }
        if let Some(new) = config {
            self.add(instance, new);
        }
        candidate.assign(query, config);
    }
}
