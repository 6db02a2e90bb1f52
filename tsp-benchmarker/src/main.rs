use clap::{value_parser, Arg, Command};
use std::{fs::File, io::BufWriter, path::PathBuf};
use tsp_benchmarker::{run_benchmark, write_csv, BenchmarkConfig};

fn cli() -> Command {
    Command::new("tsp-benchmarker")
        .about("Runs the travelling salesman solvers over a list of test cases")
        .arg(
            Arg::new("config")
                .long("config")
                .help("(Optional) Path to a json benchmark config")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .help("(Optional) Set path of the results file")
                .default_value("results.csv")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("tolerance")
                .long("tolerance")
                .help("(Optional) Override the allowed time overrun, as a fraction of maxtime")
                .value_parser(value_parser!(f64)),
        )
}

fn main() {
    env_logger::init();
    let matches = cli().get_matches();

    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => BenchmarkConfig::load(path).unwrap_or_else(|e| {
            eprintln!("{}", e);
            std::process::exit(1);
        }),
        None => BenchmarkConfig::default(),
    };
    if let Some(tolerance) = matches.get_one::<f64>("tolerance") {
        config.tolerance = *tolerance;
    }
    let output = matches.get_one::<PathBuf>("output").unwrap().clone();

    let outcomes = run_benchmark(&config);

    let file = File::create(&output).unwrap_or_else(|e| {
        eprintln!("Failed to create {}: {}", output.display(), e);
        std::process::exit(1);
    });
    if let Err(e) = write_csv(&outcomes, &mut BufWriter::new(file)) {
        eprintln!("Failed to write {}: {}", output.display(), e);
        std::process::exit(1);
    }
    println!("Results written to {}", output.display());
}
