use anyhow::{anyhow, Context, Result};
use std::{fs, path::Path, str::SplitWhitespace};

/// Problem data for one index-selection instance.
///
/// `configs_serving`, `queries_gained_by` and `indexes_of` are derived once in
/// [`Instance::new`] and hold exactly the non-zero cells of `gains` and
/// `config_indexes`, in ascending order.
#[derive(Debug, Clone)]
pub struct Instance {
    pub num_queries: usize,
    pub num_indexes: usize,
    pub num_configs: usize,
    pub memory_budget: u64,
    pub config_indexes: Vec<Vec<bool>>,
    pub index_costs: Vec<u64>,
    pub index_memories: Vec<u64>,
    pub gains: Vec<Vec<u64>>,
    pub configs_serving: Vec<Vec<usize>>,
    pub queries_gained_by: Vec<Vec<usize>>,
    pub indexes_of: Vec<Vec<usize>>,
}

impl Instance {
    pub fn new(
        num_queries: usize,
        num_indexes: usize,
        num_configs: usize,
        memory_budget: u64,
        config_indexes: Vec<Vec<bool>>,
        index_costs: Vec<u64>,
        index_memories: Vec<u64>,
        gains: Vec<Vec<u64>>,
    ) -> Result<Self> {
        if num_queries == 0 {
            return Err(anyhow!("Instance must have at least one query"));
        }
        if config_indexes.len() != num_configs {
            return Err(anyhow!(
                "Configuration/index matrix has {} rows, expected {}",
                config_indexes.len(),
                num_configs
            ));
        }
        if let Some((c, row)) = config_indexes
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != num_indexes)
        {
            return Err(anyhow!(
                "Configuration/index row {} has {} columns, expected {}",
                c,
                row.len(),
                num_indexes
            ));
        }
        if index_costs.len() != num_indexes {
            return Err(anyhow!(
                "Got {} index build costs, expected {}",
                index_costs.len(),
                num_indexes
            ));
        }
        if index_memories.len() != num_indexes {
            return Err(anyhow!(
                "Got {} index memory sizes, expected {}",
                index_memories.len(),
                num_indexes
            ));
        }
        if gains.len() != num_configs {
            return Err(anyhow!(
                "Gain matrix has {} rows, expected {}",
                gains.len(),
                num_configs
            ));
        }
        if let Some((c, row)) = gains
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != num_queries)
        {
            return Err(anyhow!(
                "Gain row {} has {} columns, expected {}",
                c,
                row.len(),
                num_queries
            ));
        }

        checked_total(gains.iter().flatten(), "Total gain")?;
        checked_total(index_costs.iter(), "Total index build cost")?;
        checked_total(index_memories.iter(), "Total index memory")?;
        if memory_budget > i64::MAX as u64 {
            return Err(anyhow!("Memory budget {} exceeds {}", memory_budget, i64::MAX));
        }

        let mut configs_serving = vec![Vec::new(); num_queries];
        let mut queries_gained_by = vec![Vec::new(); num_configs];
        for (c, row) in gains.iter().enumerate() {
            for (q, &g) in row.iter().enumerate() {
                if g > 0 {
                    configs_serving[q].push(c);
                    queries_gained_by[c].push(q);
                }
            }
        }
        let indexes_of = config_indexes
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter_map(|(i, &used)| used.then_some(i))
                    .collect()
            })
            .collect();

        Ok(Self {
            num_queries,
            num_indexes,
            num_configs,
            memory_budget,
            config_indexes,
            index_costs,
            index_memories,
            gains,
            configs_serving,
            queries_gained_by,
            indexes_of,
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read instance file '{}'", path.display()))?;
        Self::parse(&text).with_context(|| format!("Malformed instance file '{}'", path.display()))
    }

    /// Parses the whitespace separated text format: four `<label> <count>`
    /// headers (queries, indexes, configurations, memory), then the
    /// configuration/index matrix, index costs, index memories and the
    /// configuration/query gain matrix, each preceded by one label token.
    pub fn parse(text: &str) -> Result<Self> {
        let mut tokens = Tokens::new(text);

        let num_queries = tokens.labelled("number of queries")? as usize;
        let num_indexes = tokens.labelled("number of indexes")? as usize;
        let num_configs = tokens.labelled("number of configurations")? as usize;
        let memory_budget = tokens.labelled("memory budget")?;

        tokens.skip("configuration/index matrix")?;
        let mut config_indexes = Vec::new();
        for c in 0..num_configs {
            let mut row = Vec::new();
            for i in 0..num_indexes {
                row.push(match tokens.number("configuration/index cell")? {
                    0 => false,
                    1 => true,
                    v => {
                        return Err(anyhow!(
                            "Configuration/index cell ({}, {}) must be 0 or 1, got {}",
                            c,
                            i,
                            v
                        ))
                    }
                });
            }
            config_indexes.push(row);
        }

        tokens.skip("index build costs")?;
        let index_costs = tokens.numbers(num_indexes, "index build cost")?;
        tokens.skip("index memory sizes")?;
        let index_memories = tokens.numbers(num_indexes, "index memory size")?;

        tokens.skip("configuration/query gains")?;
        let mut gains = Vec::new();
        for _ in 0..num_configs {
            gains.push(tokens.numbers(num_queries, "configuration/query gain")?);
        }

        Self::new(
            num_queries,
            num_indexes,
            num_configs,
            memory_budget,
            config_indexes,
            index_costs,
            index_memories,
            gains,
        )
    }

    #[inline]
    pub fn gain(&self, config: usize, query: usize) -> u64 {
        self.gains[config][query]
    }

    /// Configuration with the strictly largest gain for `query`, lowest id on ties.
    pub fn max_gain_config(&self, query: usize) -> Option<usize> {
        let mut best = None;
        let mut best_gain = 0;
        for &c in &self.configs_serving[query] {
            let g = self.gains[c][query];
            if g > best_gain {
                best_gain = g;
                best = Some(c);
            }
        }
        best
    }
}

/// Sum of `values`, rejected if it does not fit in an `i64` so that every
/// candidate evaluation stays in range.
fn checked_total<'a>(mut values: impl Iterator<Item = &'a u64>, what: &str) -> Result<()> {
    values
        .try_fold(0u64, |acc, &v| acc.checked_add(v))
        .filter(|&total| total <= i64::MAX as u64)
        .map(|_| ())
        .ok_or_else(|| anyhow!("{} exceeds {}", what, i64::MAX))
}

struct Tokens<'a> {
    iter: SplitWhitespace<'a>,
    consumed: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            iter: text.split_whitespace(),
            consumed: 0,
        }
    }

    fn next(&mut self, what: &str) -> Result<&'a str> {
        let token = self.iter.next().ok_or_else(|| {
            anyhow!(
                "Unexpected end of input after {} tokens while reading {}",
                self.consumed,
                what
            )
        })?;
        self.consumed += 1;
        Ok(token)
    }

    fn skip(&mut self, what: &str) -> Result<()> {
        self.next(what).map(|_| ())
    }

    fn number(&mut self, what: &str) -> Result<u64> {
        let token = self.next(what)?;
        token
            .parse::<u64>()
            .map_err(|_| anyhow!("Expected a non-negative integer for {}, got '{}'", what, token))
    }

    fn labelled(&mut self, what: &str) -> Result<u64> {
        self.skip(what)?;
        self.number(what)
    }

    fn numbers(&mut self, n: usize, what: &str) -> Result<Vec<u64>> {
        (0..n).map(|_| self.number(what)).collect()
    }
}
