use super::chromosome::Chromosome;
use super::config::SegmentPolicy;
use rand::{rngs::SmallRng, Rng};
use tsp_challenges::CityRegistry;

/// The middle half of a tour with `num_genes` cities, as inclusive indices.
pub fn segment_bounds(num_genes: usize) -> (usize, usize) {
    (num_genes / 4, 3 * num_genes / 4)
}

fn random_segment(num_genes: usize, rng: &mut SmallRng) -> (usize, usize) {
    let start = rng.gen_range(0..num_genes);
    let end = rng.gen_range(start..num_genes);
    (start, end)
}

/// Order crossover. Copies `y[start..=end]` into the same positions of the
/// child and fills the remaining positions with the other cities in the order
/// they appear in `x`.
///
/// The cities borrowed from `y` are removed from `x`, leaving holes. Closing
/// the holes shifts everything after the segment left by the number of holes
/// that were to its right; moving that many cities from the front to the back
/// puts the survivors back in line so the segment can be spliced in at `start`.
///
/// ```text
/// x        [8, 7, 2, 3, 0, 5, 1, 6, 4, 9]
/// y        [4, 9, 0, 3, 5, 6, 2, 7, 1, 8]   segment 3..=5 -> [3, 5, 6]
/// holes    [8, 7, 2, _, 0, _, 1, _, 4, 9]   one hole after index 5
/// compact  [8, 7, 2, 0, 1, 4, 9]
/// rotated  [7, 2, 0, 1, 4, 9, 8]
/// child    [7, 2, 0, 3, 5, 6, 1, 4, 9, 8]
/// ```
pub fn ox_cross(x: &[usize], y: &[usize], start: usize, end: usize) -> Vec<usize> {
    debug_assert_eq!(x.len(), y.len());
    debug_assert!(start <= end && end < y.len());

    let segment = &y[start..=end];
    let mut borrowed = vec![false; x.len()];
    for &gene in segment {
        borrowed[gene] = true;
    }

    let holes_right = x[end + 1..].iter().filter(|&&gene| borrowed[gene]).count();
    let mut genes: Vec<usize> = x.iter().copied().filter(|&gene| !borrowed[gene]).collect();
    genes.rotate_left(holes_right);
    genes.splice(start..start, segment.iter().copied());
    genes
}

/// Refills the population up to `size` with children of parents drawn, with
/// replacement, from the members present before this call.
pub fn crossing(
    population: &mut Vec<Chromosome>,
    size: usize,
    registry: &CityRegistry,
    segment: SegmentPolicy,
    rng: &mut SmallRng,
) {
    let num_parents = population.len();
    if num_parents == 0 || registry.is_empty() {
        return;
    }
    let num_genes = registry.len();
    let fixed = segment_bounds(num_genes);

    for _ in num_parents..size {
        let x = rng.gen_range(0..num_parents);
        let y = rng.gen_range(0..num_parents);
        let (start, end) = match segment {
            SegmentPolicy::Fixed => fixed,
            SegmentPolicy::Random => random_segment(num_genes, rng),
        };
        let genes = ox_cross(population[x].genes(), population[y].genes(), start, end);
        population.push(Chromosome::new(registry, genes));
    }
}
