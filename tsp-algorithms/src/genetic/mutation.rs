use super::chromosome::Chromosome;
use super::config::MutationPolicy;
use rand::{rngs::SmallRng, Rng};
use tsp_challenges::CityRegistry;

const NUM_REVERSALS: usize = 2;

fn reverse_segments(genes: &mut [usize], rng: &mut SmallRng) {
    let n = genes.len();
    if n == 0 {
        return;
    }
    for _ in 0..NUM_REVERSALS {
        let mut start = rng.gen_range(0..n);
        let mut end = rng.gen_range(0..n);
        if end < start {
            std::mem::swap(&mut start, &mut end);
        }
        genes[start..end].reverse();
    }
}

/// Always-accept mutation: two random segment reversals on a copy of the
/// genes. The input is left untouched and the mutant is never compared to it.
pub fn mutate(chromosome: &Chromosome, registry: &CityRegistry, rng: &mut SmallRng) -> Chromosome {
    let mut genes = chromosome.genes().to_vec();
    reverse_segments(&mut genes, rng);
    Chromosome::new(registry, genes)
}

/// Reject-on-worse mutation: like [`mutate`], but a mutant costlier than its
/// parent is discarded in favour of a copy of the parent.
pub fn mutate_or_reject(
    chromosome: &Chromosome,
    registry: &CityRegistry,
    rng: &mut SmallRng,
) -> Chromosome {
    let mutant = mutate(chromosome, registry, rng);
    if mutant.cost() > chromosome.cost() {
        chromosome.clone()
    } else {
        mutant
    }
}

/// Appends `mutation_rate` percent of the population's size in mutants, each
/// derived from a member picked at random. Existing members are kept.
pub fn mutating(
    population: &mut Vec<Chromosome>,
    mutation_rate: f64,
    policy: MutationPolicy,
    registry: &CityRegistry,
    rng: &mut SmallRng,
) {
    let count = (population.len() as f64 * mutation_rate / 100.0) as usize;
    for _ in 0..count {
        let parent = &population[rng.gen_range(0..population.len())];
        let mutant = match policy {
            MutationPolicy::AlwaysAccept => mutate(parent, registry, rng),
            MutationPolicy::RejectOnWorse => mutate_or_reject(parent, registry, rng),
        };
        population.push(mutant);
    }
}
