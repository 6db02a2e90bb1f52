mod chromosome;
mod config;
mod crossover;
mod errors;
mod mutation;
mod population;
mod solver;

pub use chromosome::{is_permutation, Chromosome};
pub use config::{Config, MutationBoost, MutationPolicy, SegmentPolicy};
pub use crossover::{crossing, ox_cross, segment_bounds};
pub use errors::SolveError;
pub use mutation::{mutate, mutate_or_reject, mutating};
pub use population::{populate, select};
pub use solver::{Phase, Solver};

use anyhow::Result;
use serde_json::{Map, Value};
use std::{cell::Cell, time::Instant};
use tsp_challenges::{CityRegistry, Solution};

/// Solves the tour over `(label, x, y)` cities within `time_budget` seconds
/// and returns the best cost with the matching sequence of labels.
pub fn solve<I, S>(
    cities: I,
    time_budget: f64,
    population_size: usize,
    selection_rate: f64,
    mutation_rate: f64,
) -> Result<(f64, Vec<String>)>
where
    I: IntoIterator<Item = (S, f64, f64)>,
    S: Into<String>,
{
    let config = Config {
        population_size,
        selection_rate,
        mutation_rate,
        ..Config::default()
    };
    let solution = solve_with_config(cities, time_budget, config)?;
    Ok((solution.cost, solution.path))
}

pub fn solve_with_config<I, S>(cities: I, time_budget: f64, config: Config) -> Result<Solution>
where
    I: IntoIterator<Item = (S, f64, f64)>,
    S: Into<String>,
{
    let started = Instant::now();
    let registry = CityRegistry::from_labelled(cities);
    let mut solver = Solver::new(&registry, config, time_budget, started)?;
    let best = solver.run(None)?;
    Ok(Solution {
        cost: best.cost(),
        path: registry.labels_for(best.genes()),
    })
}

/// Runs the search on `registry`, calling `save_solution` whenever the best
/// tour improves and once more with the final result.
pub fn solve_challenge(
    registry: &CityRegistry,
    time_budget: f64,
    save_solution: &dyn Fn(&Solution) -> Result<()>,
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<()> {
    let started = Instant::now();
    let config = Config::initialize(hyperparameters)?;
    let mut solver = Solver::new(registry, config, time_budget, started)?;

    let best_cost = Cell::new(f64::INFINITY);
    let on_generation: &dyn Fn(&Chromosome) -> Result<()> = &|best: &Chromosome| {
        if best.cost() < best_cost.get() {
            best_cost.set(best.cost());
            save_solution(&Solution {
                cost: best.cost(),
                path: registry.labels_for(best.genes()),
            })?;
        }
        Ok(())
    };
    let best = solver.run(Some(on_generation))?;

    save_solution(&Solution {
        cost: best.cost(),
        path: registry.labels_for(best.genes()),
    })
}
