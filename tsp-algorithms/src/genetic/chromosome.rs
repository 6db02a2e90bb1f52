use std::fmt;
use tsp_challenges::{tour_length, CityRegistry};

/// A candidate tour: a permutation of registry indices and its cyclic length.
#[derive(Clone, Debug, PartialEq)]
pub struct Chromosome {
    genes: Vec<usize>,
    cost: f64,
}

impl Chromosome {
    pub fn new(registry: &CityRegistry, genes: Vec<usize>) -> Self {
        debug_assert!(
            is_permutation(&genes, registry.len()),
            "genes are not a permutation of 0..{}: {:?}",
            registry.len(),
            genes
        );
        let cost = Self::calculate_cost(registry, &genes);
        Self { genes, cost }
    }

    pub fn genes(&self) -> &[usize] {
        &self.genes
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn calculate_cost(registry: &CityRegistry, genes: &[usize]) -> f64 {
        tour_length(registry, genes)
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} : Cost : {}", self.genes, self.cost)
    }
}

/// True when `genes` holds every index of `0..n` exactly once.
pub fn is_permutation(genes: &[usize], n: usize) -> bool {
    if genes.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &gene in genes {
        if gene >= n || seen[gene] {
            return false;
        }
        seen[gene] = true;
    }
    true
}
