use tsp_challenges::*;

fn square() -> CityRegistry {
    CityRegistry::from_labelled(vec![
        ("a", 0.0, 0.0),
        ("b", 10.0, 0.0),
        ("c", 10.0, 10.0),
        ("d", 0.0, 10.0),
    ])
}

#[test]
fn test_registry_ids_follow_insertion_order() {
    let registry = square();
    assert_eq!(registry.len(), 4);
    for (i, city) in registry.cities().iter().enumerate() {
        assert_eq!(city.id, i);
    }
    assert_eq!(registry.label(2), "c");
    assert_eq!(registry.positions_for(&[3, 1]), vec![(0.0, 10.0), (10.0, 0.0)]);
}

#[test]
fn test_unlabelled_city_uses_id() {
    let registry = CityRegistry::new(vec![(None, (0.0, 0.0)), (Some("x".to_string()), (3.0, 4.0))]);
    assert_eq!(registry.labels_for(&[0, 1]), vec!["0".to_string(), "x".to_string()]);
    assert_eq!(registry.distance(0, 1), 5.0);
}

#[test]
fn test_calc_tour_cost() {
    let registry = square();
    assert_eq!(calc_tour_cost(&registry, &[0, 1, 2, 3]).unwrap(), 40.0);
    let crossed = calc_tour_cost(&registry, &[0, 2, 1, 3]).unwrap();
    assert!((crossed - (20.0 + 2.0 * 200f64.sqrt())).abs() < 1e-9);
}

#[test]
fn test_tour_length_matches_checked_cost() {
    let registry = square();
    assert_eq!(tour_length(&registry, &[0, 1, 2, 3]), 40.0);
    assert_eq!(tour_length(&registry, &[]), 0.0);
    assert_eq!(
        tour_length(&registry, &[3, 0, 2, 1]),
        calc_tour_cost(&registry, &[3, 0, 2, 1]).unwrap()
    );
}

#[test]
fn test_calc_tour_cost_rejects_invalid_routes() {
    let registry = square();
    assert!(calc_tour_cost(&registry, &[0, 1, 2]).is_err());
    assert!(calc_tour_cost(&registry, &[0, 1, 2, 2]).is_err());
    assert!(calc_tour_cost(&registry, &[0, 1, 2, 4]).is_err());
}

#[test]
fn test_single_city_tour_costs_nothing() {
    let registry = CityRegistry::from_labelled(vec![("only", 5.0, 7.0)]);
    assert_eq!(calc_tour_cost(&registry, &[0]).unwrap(), 0.0);
}

#[test]
fn test_verify_solution() {
    let registry = square();
    let solution = Solution {
        cost: 40.0,
        path: vec!["c".into(), "d".into(), "a".into(), "b".into()],
    };
    assert_eq!(registry.verify_solution(&solution).unwrap(), 40.0);

    let wrong_cost = Solution {
        cost: 39.0,
        ..solution.clone()
    };
    assert!(registry.verify_solution(&wrong_cost).is_err());

    let unknown = Solution {
        cost: 40.0,
        path: vec!["c".into(), "d".into(), "a".into(), "z".into()],
    };
    assert!(registry.verify_solution(&unknown).is_err());

    let missing = Solution {
        cost: 20.0,
        path: vec!["a".into(), "b".into()],
    };
    assert!(registry.verify_solution(&missing).is_err());
}

#[test]
fn test_parse_cities() {
    let registry = parse_cities("v0 54 391\n\nv1 77 315\nv2 1.5 -2\n").unwrap();
    assert_eq!(registry.len(), 3);
    assert_eq!(registry.label(1), "v1");
    assert_eq!(registry.city(2).position, (1.5, -2.0));
}

#[test]
fn test_parse_cities_errors() {
    match parse_cities("v0 54\n") {
        Err(ParseError::MissingField { line }) => assert_eq!(line, 1),
        other => panic!("unexpected result: {:?}", other),
    }
    match parse_cities("v0 1 2\nv1 x 2\n") {
        Err(ParseError::InvalidCoordinate { line, value }) => {
            assert_eq!(line, 2);
            assert_eq!(value, "x");
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(matches!(
        parse_cities("v0 1 2 3\n"),
        Err(ParseError::TrailingField { line: 1 })
    ));
}

#[test]
fn test_parse_cities_rejects_duplicate_labels() {
    match parse_cities("a 0 0\nb 10 0\na 10 10\nd 0 10\n") {
        Err(ParseError::DuplicateLabel { line, label, first }) => {
            assert_eq!(line, 3);
            assert_eq!(label, "a");
            assert_eq!(first, 1);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_parsed_tour_verifies_by_label() {
    let registry = parse_cities("a 0 0\nb 10 0\nc 10 10\nd 0 10\n").unwrap();
    let solution = Solution {
        cost: 40.0,
        path: vec!["a".into(), "d".into(), "c".into(), "b".into()],
    };
    assert_eq!(registry.verify_solution(&solution).unwrap(), 40.0);
}

#[test]
fn test_write_cities_round_trips_through_loader() {
    let registry = square();
    let reparsed = parse_cities(&write_cities(&registry)).unwrap();
    assert_eq!(reparsed, registry);
}

#[test]
fn test_load_cities_missing_file() {
    assert!(matches!(
        load_cities("/nonexistent/cities.txt"),
        Err(ParseError::Io(_))
    ));
}

#[test]
fn test_generate_instance() {
    let seed = [7u8; 32];
    let a = CityRegistry::generate_instance(&seed, &Difficulty { num_cities: 50 }).unwrap();
    let b = CityRegistry::generate_instance(&seed, &Difficulty { num_cities: 50 }).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 50);
    assert_eq!(a.label(49), "v49");
    for city in a.cities() {
        assert!(city.position.0 >= 0.0 && city.position.0 <= 1000.0);
        assert!(city.position.1 >= 0.0 && city.position.1 <= 1000.0);
    }
    assert!(CityRegistry::generate_instance(&seed, &Difficulty { num_cities: 0 }).is_err());
}

#[test]
fn test_greedy_baseline_is_a_tour() {
    let registry =
        CityRegistry::generate_instance(&[3u8; 32], &Difficulty { num_cities: 30 }).unwrap();
    let route = registry.compute_greedy_baseline();
    assert_eq!(route[0], 0);
    assert!(calc_tour_cost(&registry, &route).is_ok());
}

#[test]
fn test_solution_json_shape() {
    let solution = Solution {
        cost: 40.0,
        path: vec!["a".to_string(), "b".to_string()],
    };
    let json = serde_json::to_value(&solution).unwrap();
    assert_eq!(json, serde_json::json!({"cost": 40.0, "path": ["a", "b"]}));
    let parsed: Solution = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, solution);
}
