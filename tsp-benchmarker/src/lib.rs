use anyhow::{anyhow, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{
    cell::RefCell,
    collections::HashSet,
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::Instant,
};
use tsp_algorithms::genetic::solve_challenge;
use tsp_challenges::{calc_tour_cost, load_cities, CityRegistry, Solution};

/// One benchmark case: a cities file and the time budget it is solved under.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TestCase {
    pub datafile: PathBuf,
    pub maxtime: f64,
}

impl TestCase {
    pub fn new<P: Into<PathBuf>>(datafile: P, maxtime: f64) -> Self {
        Self {
            datafile: datafile.into(),
            maxtime,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BenchmarkConfig {
    pub tolerance: f64,
    pub tests: Vec<TestCase>,
    pub hyperparameters: Option<Map<String, Value>>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.05,
            tests: vec![
                TestCase::new("data/pb005.txt", 1.0),
                TestCase::new("data/pb010.txt", 5.0),
                TestCase::new("data/pb010.txt", 10.0),
                TestCase::new("data/pb050.txt", 30.0),
                TestCase::new("data/pb050.txt", 60.0),
                TestCase::new("data/pb100.txt", 20.0),
                TestCase::new("data/pb100.txt", 90.0),
            ],
            hyperparameters: None,
        }
    }
}

impl BenchmarkConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.display(), e))?;
        serde_json::from_str(&contents)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path.display(), e))
    }
}

/// Result of one solver on one case.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Valid { length: f64 },
    Invalid { errors: Vec<String> },
    Failed { error: String },
}

impl Outcome {
    fn cell(&self) -> String {
        match self {
            Outcome::Valid { length } => format!("{}", *length as i64),
            Outcome::Invalid { errors } => errors.join(" "),
            Outcome::Failed { error } => error.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestOutcome {
    pub case: TestCase,
    pub genetic: Outcome,
    pub greedy: Outcome,
}

/// Checks a reported tour independently of the solver. An empty result means
/// the tour is accepted.
pub fn validate(
    registry: &CityRegistry,
    length: f64,
    path: &[String],
    duration: f64,
    maxtime: f64,
    tolerance: f64,
) -> Vec<String> {
    let mut errors = Vec::new();
    if duration > maxtime * (1.0 + tolerance) {
        errors.push(format!("Timeout ({:.2})", duration - maxtime));
    }

    let index_of = registry.index_of();
    let mut visited = HashSet::new();
    let mut route = Vec::with_capacity(path.len());
    let mut complete = true;
    for label in path {
        match index_of.get(label) {
            None => {
                errors.push(format!("City {} does not exist!", label));
                complete = false;
                break;
            }
            Some(&i) if !visited.insert(i) => {
                errors.push(format!("City {} appears twice in {:?}!", label, path));
                complete = false;
                break;
            }
            Some(&i) => route.push(i),
        }
    }

    if complete && !route.is_empty() {
        let total_distance = route
            .iter()
            .zip(route.iter().cycle().skip(1))
            .map(|(&a, &b)| registry.distance(a, b))
            .sum::<f64>();
        if total_distance.trunc() != length.trunc() {
            errors.push(format!(
                "Wrong dist! ({} instead of {})",
                length as i64, total_distance as i64
            ));
        }
    }

    let unvisited: Vec<String> = (0..registry.len())
        .filter(|i| !visited.contains(i))
        .map(|i| registry.label(i))
        .collect();
    if !unvisited.is_empty() {
        errors.push(format!("Not all cities visited! {:?}", unvisited));
    }
    errors
}

fn judge(
    registry: &CityRegistry,
    solution: &Solution,
    duration: f64,
    maxtime: f64,
    tolerance: f64,
) -> Outcome {
    let errors = validate(
        registry,
        solution.cost,
        &solution.path,
        duration,
        maxtime,
        tolerance,
    );
    if errors.is_empty() {
        Outcome::Valid {
            length: solution.cost,
        }
    } else {
        Outcome::Invalid { errors }
    }
}

fn run_genetic(case: &TestCase, config: &BenchmarkConfig) -> Outcome {
    let start = Instant::now();
    let latest = RefCell::new(None::<Solution>);
    let save_solution = |solution: &Solution| -> Result<()> {
        *latest.borrow_mut() = Some(solution.clone());
        Ok(())
    };
    let result = load_cities(&case.datafile)
        .map_err(anyhow::Error::from)
        .and_then(|registry| {
            solve_challenge(
                &registry,
                case.maxtime,
                &save_solution,
                &config.hyperparameters,
            )?;
            Ok(registry)
        });
    let duration = start.elapsed().as_secs_f64();

    match (result, latest.into_inner()) {
        (Ok(registry), Some(solution)) => judge(
            &registry,
            &solution,
            duration,
            case.maxtime,
            config.tolerance,
        ),
        (Ok(_), None) => Outcome::Failed {
            error: "No solution returned".to_string(),
        },
        (Err(e), _) => Outcome::Failed {
            error: e.to_string(),
        },
    }
}

fn run_greedy(case: &TestCase, config: &BenchmarkConfig) -> Outcome {
    let start = Instant::now();
    let registry = match load_cities(&case.datafile) {
        Ok(registry) => registry,
        Err(e) => {
            return Outcome::Failed {
                error: e.to_string(),
            }
        }
    };
    let route = registry.compute_greedy_baseline();
    let cost = match calc_tour_cost(&registry, &route) {
        Ok(cost) => cost,
        Err(e) => {
            return Outcome::Failed {
                error: e.to_string(),
            }
        }
    };
    let duration = start.elapsed().as_secs_f64();
    let solution = Solution {
        cost,
        path: registry.labels_for(&route),
    };
    judge(
        &registry,
        &solution,
        duration,
        case.maxtime,
        config.tolerance,
    )
}

/// Runs the genetic solver and the greedy baseline on one case, timing each
/// from file load to result.
pub fn run_test(case: &TestCase, config: &BenchmarkConfig) -> TestOutcome {
    info!(
        "--> {}, {}s",
        case.datafile.display(),
        case.maxtime
    );
    let genetic = run_genetic(case, config);
    if let Outcome::Valid { length } = &genetic {
        info!("## genetic: {:.3}", length);
    } else {
        warn!("## genetic: {}", genetic.cell());
    }
    let greedy = run_greedy(case, config);
    info!("## greedy: {}", greedy.cell());
    TestOutcome {
        case: case.clone(),
        genetic,
        greedy,
    }
}

pub fn run_benchmark(config: &BenchmarkConfig) -> Vec<TestOutcome> {
    config
        .tests
        .iter()
        .map(|case| run_test(case, config))
        .collect()
}

/// Writes the outcome grid: a header naming each solver, then one row per case.
pub fn write_csv<W: Write>(outcomes: &[TestOutcome], writer: &mut W) -> Result<()> {
    writeln!(writer, "Test;genetic;greedy;")?;
    for outcome in outcomes {
        writeln!(
            writer,
            "{} ({}s);{};{};",
            outcome.case.datafile.display(),
            outcome.case.maxtime as u64,
            outcome.genetic.cell(),
            outcome.greedy.cell()
        )?;
    }
    writer.flush()?;
    Ok(())
}
