mod baselines;
mod loader;
pub use loader::{load_cities, parse_cities, write_cities, ParseError};

use anyhow::{anyhow, Result};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Serialize, Deserialize, Debug, Copy, Clone)]
pub struct Difficulty {
    pub num_cities: usize,
}

/// A point to visit. `id` is the city's index inside its registry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct City {
    pub id: usize,
    pub label: Option<String>,
    pub position: (f64, f64),
}

/// Best tour found for a registry: its total length and the visiting order as labels.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Solution {
    pub cost: f64,
    pub path: Vec<String>,
}

/// The fixed, ordered set of cities a tour runs through. Built once per solve
/// and never modified; tours refer to cities by their index in it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CityRegistry {
    cities: Vec<City>,
}

impl CityRegistry {
    pub fn new<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (Option<String>, (f64, f64))>,
    {
        let cities = points
            .into_iter()
            .enumerate()
            .map(|(id, (label, position))| City {
                id,
                label,
                position,
            })
            .collect();
        Self { cities }
    }

    pub fn from_labelled<I, S>(cities: I) -> Self
    where
        I: IntoIterator<Item = (S, f64, f64)>,
        S: Into<String>,
    {
        Self::new(
            cities
                .into_iter()
                .map(|(label, x, y)| (Some(label.into()), (x, y))),
        )
    }

    pub fn generate_instance(seed: &[u8; 32], difficulty: &Difficulty) -> Result<Self> {
        if difficulty.num_cities == 0 {
            return Err(anyhow!("Number of cities must be at least 1"));
        }
        let mut rng = SmallRng::from_seed(seed.clone());
        let num_cities = difficulty.num_cities;

        let mut positions: Vec<(i32, i32)> = Vec::with_capacity(num_cities);
        let mut positions_set: HashSet<(i32, i32)> = HashSet::with_capacity(num_cities);
        while positions.len() < num_cities {
            let pos = (rng.gen_range(0..=1000), rng.gen_range(0..=1000));
            if positions_set.contains(&pos) {
                continue;
            }
            positions.push(pos);
            positions_set.insert(pos);
        }

        Ok(Self::new(positions.into_iter().enumerate().map(
            |(i, (x, y))| (Some(format!("v{}", i)), (x as f64, y as f64)),
        )))
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn city(&self, index: usize) -> &City {
        &self.cities[index]
    }

    #[inline]
    pub fn distance(&self, a: usize, b: usize) -> f64 {
        let (ax, ay) = self.cities[a].position;
        let (bx, by) = self.cities[b].position;
        (ax - bx).hypot(ay - by)
    }

    /// Label of a city, falling back to its id for unlabelled cities.
    pub fn label(&self, index: usize) -> String {
        let city = &self.cities[index];
        match &city.label {
            Some(label) => label.clone(),
            None => city.id.to_string(),
        }
    }

    pub fn labels_for(&self, route: &[usize]) -> Vec<String> {
        route.iter().map(|&i| self.label(i)).collect()
    }

    pub fn positions_for(&self, route: &[usize]) -> Vec<(f64, f64)> {
        route.iter().map(|&i| self.cities[i].position).collect()
    }

    pub fn index_of(&self) -> HashMap<String, usize> {
        (0..self.len()).map(|i| (self.label(i), i)).collect()
    }

    pub fn compute_greedy_baseline(&self) -> Vec<usize> {
        baselines::nearest_neighbour::solve(self)
    }

    /// Checks a reported solution against this registry and returns the recomputed cost.
    pub fn verify_solution(&self, solution: &Solution) -> Result<f64> {
        let index_of = self.index_of();
        let mut route = Vec::with_capacity(solution.path.len());
        for label in &solution.path {
            match index_of.get(label) {
                Some(&i) => route.push(i),
                None => return Err(anyhow!("City {} does not exist", label)),
            }
        }
        let total_distance = calc_tour_cost(self, &route)?;
        if total_distance.trunc() != solution.cost.trunc() {
            return Err(anyhow!(
                "Wrong distance ({} reported, {} recomputed)",
                solution.cost,
                total_distance
            ));
        }
        log::debug!(
            "Solution verified: {} cities, total distance {}",
            route.len(),
            total_distance
        );
        Ok(total_distance)
    }
}

/// Length of the closed tour `route` after checking that it visits every city exactly once.
pub fn calc_tour_cost(registry: &CityRegistry, route: &[usize]) -> Result<f64> {
    if route.len() != registry.len() {
        return Err(anyhow!(
            "Route length ({}) does not match number of cities ({})",
            route.len(),
            registry.len()
        ));
    }
    if route.iter().any(|&city| city >= registry.len()) {
        return Err(anyhow!("Route contains invalid cities"));
    }
    let visited = route.iter().cloned().collect::<HashSet<usize>>();
    if visited.len() != route.len() {
        return Err(anyhow!("Route contains duplicate cities"));
    }
    Ok(tour_length(registry, route))
}

/// Cyclic Euclidean length of `route` without validating it. An empty route
/// has length 0.
pub fn tour_length(registry: &CityRegistry, route: &[usize]) -> f64 {
    match route.len() {
        0 => 0.0,
        n => route
            .windows(2)
            .map(|w| registry.distance(w[0], w[1]))
            .sum::<f64>()
            + registry.distance(route[n - 1], route[0]),
    }
}
