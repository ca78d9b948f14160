use anyhow::{anyhow, Context, Result};
use clap::{arg, Command};
use odbdp_algorithms::genetic::{self, Config, Solver};
use odbdp_challenge::{read_matrix, Candidate, Instance};
use serde_json::{json, Map, Value};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("odbdp-runtime")
        .about("Selects database indexes and configurations under a memory budget")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("solve")
                .about("Runs the genetic search on an instance")
                .arg(
                    arg!(<INSTANCE> "Path to the instance file")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(-t --"time-limit" [SECONDS] "Time limit in seconds (default 180)")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--workers [WORKERS] "Number of search threads")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--config [CONFIG] "Hyperparameters json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--output [OUTPUT_FILE] "Solution file (default <INSTANCE>.sol)")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("verify")
                .about("Evaluates a solution matrix against an instance")
                .arg(
                    arg!(<INSTANCE> "Path to the instance file")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(<SOLUTION> "Path to the solution matrix file")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(Command::new("hyperparameters").about("Lists the tunable search parameters"))
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("solve", sub_m)) => match sub_m.get_one::<PathBuf>("INSTANCE") {
            Some(instance) => solve(
                instance.clone(),
                sub_m.get_one::<u64>("time-limit").copied(),
                sub_m.get_one::<usize>("workers").copied(),
                sub_m.get_one::<String>("config").cloned(),
                sub_m.get_one::<PathBuf>("output").cloned(),
            ),
            None => Err(anyhow!("Missing instance path")),
        },
        Some(("verify", sub_m)) => match (
            sub_m.get_one::<PathBuf>("INSTANCE"),
            sub_m.get_one::<PathBuf>("SOLUTION"),
        ) {
            (Some(instance), Some(solution)) => verify(instance.clone(), solution.clone()),
            _ => Err(anyhow!("Missing instance or solution path")),
        },
        Some(("hyperparameters", _)) => {
            genetic::help();
            Ok(())
        }
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

pub fn solve(
    instance_path: PathBuf,
    time_limit_secs: Option<u64>,
    num_workers: Option<usize>,
    hyperparameters: Option<String>,
    output_file: Option<PathBuf>,
) -> Result<()> {
    let instance = Instance::from_file(&instance_path)?;
    let hyperparameters = hyperparameters
        .as_deref()
        .map(load_hyperparameters)
        .transpose()?;

    let mut config = Config::initialize(&hyperparameters);
    if let Some(secs) = time_limit_secs {
        config.time_limit_ms = secs.saturating_mul(1000);
    }
    if let Some(n) = num_workers {
        config.num_workers = n;
    }

    let output_file = output_file.unwrap_or_else(|| default_output_path(&instance_path));
    let save_solution = |candidate: &Candidate| candidate.write_to_file(&instance, &output_file);
    let outcome = Solver::solve(&instance, config, Some(&save_solution))?;

    let workers: Vec<Value> = outcome
        .reports
        .iter()
        .map(|r| {
            json!({
                "worker": r.worker_id,
                "generations": r.generations,
                "restarts": r.restarts,
                "refinements": r.refinements,
                "restart_threshold": r.restart_threshold,
                "best_objective": r.best_objective,
            })
        })
        .collect();

    let result = match outcome.best {
        Some(best) => {
            if let Err(e) = best.write_to_file(&instance, &output_file) {
                tracing::warn!("failed to write final solution: {:#}", e);
            }
            json!({
                "objective": best.objective_value(),
                "feasible": true,
                "memory": best.memory_cost(),
                "memory_budget": instance.memory_budget,
                "served_queries": best.served_queries(),
                "output": output_file.display().to_string(),
                "workers": workers,
            })
        }
        None => {
            tracing::warn!("no feasible solution found");
            json!({
                "objective": Value::Null,
                "feasible": false,
                "memory_budget": instance.memory_budget,
                "workers": workers,
            })
        }
    };
    println!("{}", result);
    Ok(())
}

pub fn verify(instance_path: PathBuf, solution_path: PathBuf) -> Result<()> {
    let instance = Instance::from_file(&instance_path)?;
    let text = fs::read_to_string(&solution_path)
        .with_context(|| format!("Failed to read solution file '{}'", solution_path.display()))?;
    let mut candidate = read_matrix(&instance, &text)
        .with_context(|| format!("Malformed solution file '{}'", solution_path.display()))?;
    candidate.evaluate(&instance);

    let mut result = serde_json::to_value(candidate.evaluation())?;
    if let Value::Object(ref mut obj) = result {
        obj.insert("memory_budget".to_string(), json!(instance.memory_budget));
        obj.insert("served_queries".to_string(), json!(candidate.served_queries()));
    }
    println!("{}", result);
    Ok(())
}

fn load_hyperparameters(hyperparameters: &str) -> Result<Map<String, Value>> {
    let text = if hyperparameters.ends_with(".json") {
        fs::read_to_string(hyperparameters)
            .with_context(|| format!("Failed to read hyperparameters file '{}'", hyperparameters))?
    } else {
        hyperparameters.to_string()
    };
    serde_json::from_str::<Map<String, Value>>(&text).context("Failed to parse hyperparameters")
}

fn default_output_path(instance_path: &Path) -> PathBuf {
    let mut path = instance_path.as_os_str().to_owned();
    path.push(".sol");
    PathBuf::from(path)
}
