use super::chromosome::Chromosome;
use logging_timer::time;
use rand::{rngs::SmallRng, Rng};
use tsp_challenges::CityRegistry;

/// Builds `count` uniformly random tours.
#[time("debug")]
pub fn populate(count: usize, registry: &CityRegistry, rng: &mut SmallRng) -> Vec<Chromosome> {
    (0..count)
        .map(|_| {
            let mut available: Vec<usize> = (0..registry.len()).collect();
            let mut genes = Vec::with_capacity(registry.len());
            while !available.is_empty() {
                let index = rng.gen_range(0..available.len());
                genes.push(available.swap_remove(index));
            }
            Chromosome::new(registry, genes)
        })
        .collect()
}

/// Elitist truncation: sorts by cost (stable, so equal costs keep their order)
/// and keeps the best `selection_rate` percent. At least one survivor is kept.
pub fn select(population: &mut Vec<Chromosome>, selection_rate: f64) {
    population.sort_by(|a, b| a.cost().total_cmp(&b.cost()));
    let keep = (population.len() as f64 * selection_rate / 100.0) as usize;
    population.truncate(keep.max(1));
}
