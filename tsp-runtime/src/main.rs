use anyhow::{anyhow, Result};
use clap::{arg, Command};
use log::info;
use serde_json::{Map, Value};
use std::{cell::RefCell, fs, io::Read, path::PathBuf};
use tsp_algorithms::genetic::{solve_challenge, SolveError};
use tsp_challenges::*;

fn cli() -> Command {
    Command::new("tsp-runtime")
        .about("Solves, verifies or generates travelling salesman instances")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("solve")
                .about("Searches for a short tour within a time budget")
                .arg(
                    arg!(<CITIES> "Path to a cities file (one 'label x y' per line)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--maxtime [MAXTIME] "Time budget in seconds")
                        .default_value("20")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    arg!(--population [POPULATION] "Population size")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--selection_rate [SELECTION_RATE] "Percent of the population kept each generation")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    arg!(--mutation_rate [MUTATION_RATE] "Percent of the population mutated each generation")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    arg!(--seed [SEED] "Seed for a reproducible run")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--hyperparameters [HYPERPARAMETERS] "Hyperparameters json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--output [OUTPUT_FILE] "If set, the solution will be saved to this file path")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("verify_solution")
                .about("Verifies a solution")
                .arg(
                    arg!(<CITIES> "Path to a cities file")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(<SOLUTION> "Solution json string, path to json file, or '-' for stdin")
                        .value_parser(clap::value_parser!(String)),
                ),
        )
        .subcommand(
            Command::new("generate_instance")
                .about("Generates a random cities file")
                .arg(arg!(<SIZE> "Number of cities").value_parser(clap::value_parser!(usize)))
                .arg(
                    arg!(--seed [SEED] "Seed for the instance")
                        .default_value("0")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--output [OUTPUT_FILE] "If set, the cities will be saved to this file path")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}

fn main() {
    env_logger::init();
    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("solve", sub_m)) => solve(
            sub_m.get_one::<PathBuf>("CITIES").unwrap().clone(),
            *sub_m.get_one::<f64>("maxtime").unwrap(),
            SolveOverrides {
                population_size: sub_m.get_one::<usize>("population").copied(),
                selection_rate: sub_m.get_one::<f64>("selection_rate").copied(),
                mutation_rate: sub_m.get_one::<f64>("mutation_rate").copied(),
                seed: sub_m.get_one::<u64>("seed").copied(),
            },
            sub_m.get_one::<String>("hyperparameters").cloned(),
            sub_m.get_one::<PathBuf>("output").cloned(),
        ),
        Some(("verify_solution", sub_m)) => verify_solution(
            sub_m.get_one::<PathBuf>("CITIES").unwrap().clone(),
            sub_m.get_one::<String>("SOLUTION").unwrap().clone(),
        ),
        Some(("generate_instance", sub_m)) => generate_instance(
            *sub_m.get_one::<usize>("SIZE").unwrap(),
            *sub_m.get_one::<u64>("seed").unwrap(),
            sub_m.get_one::<PathBuf>("output").cloned(),
        ),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(e: &anyhow::Error) -> i32 {
    if e.downcast_ref::<ParseError>().is_some() || e.downcast_ref::<serde_json::Error>().is_some()
    {
        2
    } else if e.downcast_ref::<SolveError>().is_some() {
        3
    } else {
        1
    }
}

pub struct SolveOverrides {
    population_size: Option<usize>,
    selection_rate: Option<f64>,
    mutation_rate: Option<f64>,
    seed: Option<u64>,
}

pub fn solve(
    cities_path: PathBuf,
    maxtime: f64,
    overrides: SolveOverrides,
    hyperparameters: Option<String>,
    output_file: Option<PathBuf>,
) -> Result<()> {
    let registry = load_cities(&cities_path)?;
    info!(
        "Loaded {} cities from {}",
        registry.len(),
        cities_path.display()
    );

    let mut params = match hyperparameters {
        Some(hyperparameters) => load_hyperparameters(&hyperparameters)?,
        None => Map::new(),
    };
    if let Some(v) = overrides.population_size {
        params.insert("population_size".to_string(), Value::from(v));
    }
    if let Some(v) = overrides.selection_rate {
        params.insert("selection_rate".to_string(), Value::from(v));
    }
    if let Some(v) = overrides.mutation_rate {
        params.insert("mutation_rate".to_string(), Value::from(v));
    }
    if let Some(v) = overrides.seed {
        params.insert("seed".to_string(), Value::from(v));
    }

    let latest = RefCell::new(None::<Solution>);
    let save_solution = |solution: &Solution| -> Result<()> {
        info!("Best tour so far: {:.3}", solution.cost);
        *latest.borrow_mut() = Some(solution.clone());
        Ok(())
    };
    solve_challenge(&registry, maxtime, &save_solution, &Some(params))?;

    let solution = latest
        .into_inner()
        .ok_or_else(|| anyhow!("Solver finished without a solution"))?;
    let json = serde_json::to_string(&solution)?;
    match output_file {
        Some(path) => {
            fs::write(&path, json)?;
            println!("Solution saved to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

pub fn verify_solution(cities_path: PathBuf, solution: String) -> Result<()> {
    let registry = load_cities(&cities_path)?;
    let solution = load_solution(&solution)?;
    let total_distance = registry.verify_solution(&solution)?;
    info!("Recomputed tour length {}", total_distance);
    println!("Solution is valid");
    Ok(())
}

pub fn generate_instance(size: usize, seed: u64, output_file: Option<PathBuf>) -> Result<()> {
    let mut seed_bytes = [0u8; 32];
    seed_bytes[..8].copy_from_slice(&seed.to_le_bytes());
    let registry = CityRegistry::generate_instance(&seed_bytes, &Difficulty { num_cities: size })?;
    let contents = write_cities(&registry);
    match output_file {
        Some(path) => {
            fs::write(&path, contents)?;
            println!("{} cities saved to {}", size, path.display());
        }
        None => print!("{}", contents),
    }
    Ok(())
}

fn read_json_arg(arg: &str, what: &str) -> Result<String> {
    if arg == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow!("Failed to read {} from stdin: {}", what, e))?;
        Ok(buffer)
    } else if arg.ends_with(".json") {
        fs::read_to_string(arg).map_err(|e| anyhow!("Failed to read {} file {}: {}", what, arg, e))
    } else {
        Ok(arg.to_string())
    }
}

fn load_solution(solution: &str) -> Result<Solution> {
    let solution = read_json_arg(solution, "solution")?;
    Ok(serde_json::from_str::<Solution>(&solution)?)
}

fn load_hyperparameters(hyperparameters: &str) -> Result<Map<String, Value>> {
    let hyperparameters = read_json_arg(hyperparameters, "hyperparameters")?;
    Ok(serde_json::from_str::<Map<String, Value>>(&hyperparameters)?)
}
