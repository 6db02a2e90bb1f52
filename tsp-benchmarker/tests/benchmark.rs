use std::path::PathBuf;
use tsp_benchmarker::*;
use tsp_challenges::CityRegistry;

fn square() -> CityRegistry {
    CityRegistry::from_labelled(vec![
        ("a", 0.0, 0.0),
        ("b", 10.0, 0.0),
        ("c", 10.0, 10.0),
        ("d", 0.0, 10.0),
    ])
}

fn path(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|s| s.to_string()).collect()
}

fn data_file(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../data")
        .join(name)
}

#[test]
fn test_validate_accepts_correct_tour() {
    let registry = square();
    let errors = validate(&registry, 40.7, &path(&["c", "d", "a", "b"]), 1.0, 1.0, 0.05);
    assert!(errors.is_empty(), "{:?}", errors);
}

#[test]
fn test_validate_timeout() {
    let registry = square();
    let tour = path(&["a", "b", "c", "d"]);
    assert!(validate(&registry, 40.0, &tour, 1.04, 1.0, 0.05).is_empty());
    let errors = validate(&registry, 40.0, &tour, 1.2, 1.0, 0.05);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Timeout"));
}

#[test]
fn test_validate_wrong_distance() {
    let registry = square();
    let errors = validate(&registry, 39.0, &path(&["a", "b", "c", "d"]), 0.5, 1.0, 0.05);
    assert_eq!(errors, vec!["Wrong dist! (39 instead of 40)".to_string()]);
}

#[test]
fn test_validate_bad_cities() {
    let registry = square();

    let errors = validate(&registry, 40.0, &path(&["a", "b", "z", "d"]), 0.5, 1.0, 0.05);
    assert!(errors[0].contains("City z does not exist"));
    assert!(errors.iter().any(|e| e.starts_with("Not all cities visited")));

    let errors = validate(&registry, 40.0, &path(&["a", "b", "b", "d"]), 0.5, 1.0, 0.05);
    assert!(errors[0].contains("City b appears twice"));

    let errors = validate(&registry, 20.0, &path(&["a", "b"]), 0.5, 1.0, 0.05);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("\"c\"") && errors[0].contains("\"d\""));
}

#[test]
fn test_default_config() {
    let config = BenchmarkConfig::default();
    assert_eq!(config.tolerance, 0.05);
    assert_eq!(config.tests.len(), 7);
    assert_eq!(config.tests[0], TestCase::new("data/pb005.txt", 1.0));
    assert_eq!(config.tests[6], TestCase::new("data/pb100.txt", 90.0));
}

#[test]
fn test_config_from_json_keeps_defaults() {
    let config: BenchmarkConfig =
        serde_json::from_str(r#"{"tests": [{"datafile": "x.txt", "maxtime": 2}]}"#).unwrap();
    assert_eq!(config.tolerance, 0.05);
    assert_eq!(config.tests, vec![TestCase::new("x.txt", 2.0)]);
    assert!(config.hyperparameters.is_none());

    assert!(serde_json::from_str::<BenchmarkConfig>(r#"{"tolerence": 0.1}"#).is_err());
}

#[test]
fn test_write_csv() {
    let outcomes = vec![
        TestOutcome {
            case: TestCase::new("data/pb005.txt", 1.0),
            genetic: Outcome::Valid { length: 1234.56 },
            greedy: Outcome::Valid { length: 1300.2 },
        },
        TestOutcome {
            case: TestCase::new("data/pb010.txt", 5.0),
            genetic: Outcome::Invalid {
                errors: vec!["Timeout (0.40)".to_string()],
            },
            greedy: Outcome::Failed {
                error: "missing file".to_string(),
            },
        },
    ];
    let mut buffer = Vec::new();
    write_csv(&outcomes, &mut buffer).unwrap();
    assert_eq!(
        String::from_utf8(buffer).unwrap(),
        "Test;genetic;greedy;\n\
         data/pb005.txt (1s);1234;1300;\n\
         data/pb010.txt (5s);Timeout (0.40);missing file;\n"
    );
}

#[test]
fn test_run_test_on_small_instance() {
    let config = BenchmarkConfig {
        hyperparameters: serde_json::json!({"seed": 5}).as_object().cloned(),
        ..BenchmarkConfig::default()
    };
    let outcome = run_test(&TestCase::new(data_file("pb005.txt"), 0.5), &config);

    let genetic = match outcome.genetic {
        Outcome::Valid { length } => length,
        other => panic!("genetic failed: {:?}", other),
    };
    let greedy = match outcome.greedy {
        Outcome::Valid { length } => length,
        other => panic!("greedy failed: {:?}", other),
    };
    assert!(genetic <= greedy + 1e-9);
}

#[test]
fn test_missing_datafile_is_reported() {
    let config = BenchmarkConfig::default();
    let outcomes = run_benchmark(&BenchmarkConfig {
        tests: vec![TestCase::new(data_file("nope.txt"), 0.2)],
        ..config
    });
    assert_eq!(outcomes.len(), 1);
    assert!(matches!(outcomes[0].genetic, Outcome::Failed { .. }));
    assert!(matches!(outcomes[0].greedy, Outcome::Failed { .. }));
}
