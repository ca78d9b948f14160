use crate::{Candidate, Instance};
use anyhow::{anyhow, Context, Result};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

/// Writes `candidate` as a `num_configs` x `num_queries` 0/1 matrix where cell
/// `(c, q)` is 1 iff configuration `c` serves query `q`.
pub fn write_matrix<W: Write>(
    instance: &Instance,
    candidate: &Candidate,
    mut out: W,
) -> Result<()> {
    let mut line = String::with_capacity(2 * instance.num_queries);
    for c in 0..instance.num_configs {
        line.clear();
        for (q, config) in candidate.assignment().iter().enumerate() {
            if q > 0 {
                line.push(' ');
            }
            line.push(if *config == Some(c) { '1' } else { '0' });
        }
        line.push('\n');
        out.write_all(line.as_bytes())?;
    }
    out.flush()?;
    Ok(())
}

/// Parses a matrix produced by [`write_matrix`] back into an (unevaluated) candidate.
pub fn read_matrix(instance: &Instance, text: &str) -> Result<Candidate> {
    let mut assignment: Vec<Option<usize>> = vec![None; instance.num_queries];
    let mut rows = 0;
    for (c, line) in text.lines().filter(|l| !l.trim().is_empty()).enumerate() {
        if c >= instance.num_configs {
            return Err(anyhow!(
                "Solution matrix has more than {} rows",
                instance.num_configs
            ));
        }
        let mut cols = 0;
        for (q, cell) in line.split_whitespace().enumerate() {
            if q >= instance.num_queries {
                return Err(anyhow!(
                    "Solution row {} has more than {} columns",
                    c,
                    instance.num_queries
                ));
            }
            match cell {
                "0" => {}
                "1" => {
                    if let Some(prev) = assignment[q] {
                        return Err(anyhow!(
                            "Query {} is served by both configuration {} and {}",
                            q,
                            prev,
                            c
                        ));
                    }
                    assignment[q] = Some(c);
                }
                other => {
                    return Err(anyhow!(
                        "Solution cell ({}, {}) must be 0 or 1, got '{}'",
                        c,
                        q,
                        other
                    ))
                }
            }
            cols += 1;
        }
        if cols != instance.num_queries {
            return Err(anyhow!(
                "Solution row {} has {} columns, expected {}",
                c,
                cols,
                instance.num_queries
            ));
        }
        rows += 1;
    }
    if rows != instance.num_configs {
        return Err(anyhow!(
            "Solution matrix has {} rows, expected {}",
            rows,
            instance.num_configs
        ));
    }
    Ok(Candidate::from_assignment(assignment))
}

impl Candidate {
    pub fn write_to_file<P: AsRef<Path>>(&self, instance: &Instance, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Unable to open solution file '{}'", path.display()))?;
        write_matrix(instance, self, BufWriter::new(file))
            .with_context(|| format!("Unable to write solution file '{}'", path.display()))
    }
}
