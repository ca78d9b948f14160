use odbdp_challenge::Candidate;

/// Evaluated candidates, kept sorted best first (see [`Candidate::rank_cmp`]).
#[derive(Default, Clone)]
pub struct Population {
    members: Vec<Candidate>,
}

impl Population {
    pub fn from_candidates(mut members: Vec<Candidate>) -> Self {
        members.sort_by(|a, b| a.rank_cmp(b));
        Self { members }
    }

    /// Replaces the population with `parents` and `offspring` together (2P members).
    pub fn merge(&mut self, parents: Vec<Candidate>, offspring: Vec<Candidate>) {
        self.members.clear();
        self.members.reserve(parents.len() + offspring.len());
        self.members.extend(parents);
        self.members.extend(offspring);
        self.members.sort_by(|a, b| a.rank_cmp(b));
    }

    /// Removes and returns the best `n` members, dropping the rest.
    pub fn take_top(&mut self, n: usize) -> Vec<Candidate> {
        self.members.truncate(n);
        std::mem::take(&mut self.members)
    }

    pub fn best(&self) -> Option<&Candidate> {
        self.members.first()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.members.iter()
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }
}
