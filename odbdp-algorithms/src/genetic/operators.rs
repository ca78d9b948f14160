use odbdp_challenge::{Candidate, Instance};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// N-point crossover: splits the genes into blocks of `⌊Q/n⌋` (at least 1)
/// and swaps blocks 0, 2, 4, ... between `a` and `b`.
pub fn crossover(a: &mut Candidate, b: &mut Candidate, n: usize) {
    let length = a.assignment().len();
    let block = (length / n.max(1)).max(1);
    let mut start = 0;
    while start < length {
        let end = (start + block).min(length);
        Candidate::swap_block(a, b, start..end);
        start += 2 * block;
    }
}

/// Applies [`crossover`] to `offspring.len() / 2` random pairs, drawn with
/// replacement. A pair that picks the same member twice is skipped.
pub fn crossover_pairs(offspring: &mut [Candidate], n: usize, rng: &mut SmallRng) {
    let size = offspring.len();
    if size < 2 {
        return;
    }
    for _ in 0..size / 2 {
        let i = rng.gen_range(0..size);
        let j = rng.gen_range(0..size);
        if i == j {
            continue;
        }
        let (lo, hi) = (i.min(j), i.max(j));
        let (left, right) = offspring.split_at_mut(hi);
        crossover(&mut left[lo], &mut right[0], n);
    }
}

/// Each gene mutates with probability 1/Q: `nonzero_percent`% of the time to a
/// random configuration serving that query, otherwise to unserved.
pub fn mutate(
    instance: &Instance,
    candidate: &mut Candidate,
    nonzero_percent: u32,
    rng: &mut SmallRng,
) {
    let n = instance.num_queries;
    for query in 0..n {
        if rng.gen_range(0..n) != 0 {
            continue;
        }
        let value = if rng.gen_range(0..100) < nonzero_percent {
            instance.configs_serving[query].choose(rng).copied()
        } else {
            None
        };
        candidate.assign(query, value);
    }
}
