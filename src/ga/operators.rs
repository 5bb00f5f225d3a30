//! Generation-wide genetic operators.
//!
//! - [`crossover_generation`]: fills the next generation with biased
//!   uniform crossover children of tournament-selected parents
//! - [`mutate_generation`]: re-randomizes the trailing slice of the next
//!   generation (random restart, not per-gene perturbation)
//!
//! Both operators draw one sub-stream seed per slot from the caller's
//! generator before touching any slot, so results are identical whether
//! the slots are processed sequentially or in parallel.

use rand::Rng;

use super::population::for_each_slot;
use super::selection::select_parents;
use super::types::{Chromosome, GeneLayout};
use crate::random::{create_rng, substream_seeds};

/// Biased uniform crossover of two gene vectors into `child`.
///
/// Each gene comes from `parent1` with probability `parent1_bias` and from
/// `parent2` otherwise. `child` is resized to the parents' length and its
/// fitness is reset.
pub fn uniform_crossover<R: Rng>(
    parent1: &Chromosome,
    parent2: &Chromosome,
    parent1_bias: f64,
    child: &mut Chromosome,
    rng: &mut R,
) {
    let genes = child.genes_mut();
    genes.clear();
    genes.extend(
        parent1
            .genes()
            .iter()
            .zip(parent2.genes())
            .map(|(&a, &b)| if rng.random::<f64>() < parent1_bias { a } else { b }),
    );
    child.set_fitness(Chromosome::WORST_FITNESS);
}

/// Builds every slot of `next` from parents selected in `current`.
///
/// `current` must be sorted by fitness, best first, and hold at least two
/// chromosomes. No chromosome is copied over unchanged on purpose; the
/// operator has no elitism.
pub fn crossover_generation<R: Rng>(
    current: &[Chromosome],
    next: &mut [Chromosome],
    elite_fraction: f64,
    parent1_bias: f64,
    rng: &mut R,
    parallel: bool,
) {
    let seeds = substream_seeds(rng, next.len());
    for_each_slot(next, parallel, |slot, child| {
        let mut rng = create_rng(seeds[slot]);
        let (p1, p2) = select_parents(current, elite_fraction, &mut rng);
        uniform_crossover(&current[p1], &current[p2], parent1_bias, child, &mut rng);
    });
}

/// Number of trailing slots replaced by [`mutate_generation`].
pub fn mutant_count(population_size: usize, mutant_fraction: f64) -> usize {
    ((population_size as f64 * mutant_fraction) as usize).min(population_size)
}

/// Re-randomizes every gene of the last `mutant_fraction` share of `next`.
pub fn mutate_generation<R: Rng>(
    next: &mut [Chromosome],
    mutant_fraction: f64,
    layout: &GeneLayout,
    rng: &mut R,
    parallel: bool,
) {
    let count = mutant_count(next.len(), mutant_fraction);
    let start = next.len() - count;
    let seeds = substream_seeds(rng, count);
    for_each_slot(&mut next[start..], parallel, |slot, chromosome| {
        let mut rng = create_rng(seeds[slot]);
        layout.randomize(chromosome.genes_mut(), &mut rng);
        chromosome.set_fitness(Chromosome::WORST_FITNESS);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::Population;

    fn constant(value: f64, len: usize, fitness: u32) -> Chromosome {
        let mut c = Chromosome::new(vec![value; len]);
        c.set_fitness(fitness);
        c
    }

    #[test]
    fn test_uniform_crossover_takes_genes_from_parents() {
        let p1 = constant(1.0, 1000, 3);
        let p2 = constant(2.0, 1000, 5);
        let mut child = Chromosome::new(vec![]);
        uniform_crossover(&p1, &p2, 0.3, &mut child, &mut create_rng(8));

        assert_eq!(child.genes().len(), 1000);
        assert_eq!(child.fitness(), Chromosome::WORST_FITNESS);
        let from_p1 = child.genes().iter().filter(|&&g| g == 1.0).count();
        let from_p2 = child.genes().iter().filter(|&&g| g == 2.0).count();
        assert_eq!(from_p1 + from_p2, 1000);
        // ~300 expected from parent 1
        assert!((200..400).contains(&from_p1), "got {from_p1} genes from parent 1");
    }

    #[test]
    fn test_uniform_crossover_extreme_bias() {
        let p1 = constant(1.0, 20, 3);
        let p2 = constant(2.0, 20, 5);
        let mut child = Chromosome::new(vec![]);
        uniform_crossover(&p1, &p2, 1.0, &mut child, &mut create_rng(1));
        assert!(child.genes().iter().all(|&g| g == 1.0));
        uniform_crossover(&p1, &p2, 0.0, &mut child, &mut create_rng(1));
        assert!(child.genes().iter().all(|&g| g == 2.0));
    }

    #[test]
    fn test_crossover_generation_fills_every_slot() {
        let layout = GeneLayout::new(5, 20, 1.5);
        let mut pop = Population::random(12, &layout, &mut create_rng(3));
        for (i, c) in pop.current_mut().iter_mut().enumerate() {
            c.set_fitness(i as u32);
        }
        let (current, next) = pop.buffers_mut();
        crossover_generation(current, next, 0.2, 0.3, &mut create_rng(4), false);

        for child in pop.next() {
            assert_eq!(child.genes().len(), layout.len());
            assert_eq!(child.fitness(), Chromosome::WORST_FITNESS);
            // every gene comes from some parent at the same position
            for (k, g) in child.genes().iter().enumerate() {
                assert!(pop.current().iter().any(|p| p.genes()[k] == *g));
            }
        }
    }

    #[test]
    fn test_crossover_parallel_matches_sequential() {
        let layout = GeneLayout::new(6, 30, 1.5);
        let mut a = Population::random(20, &layout, &mut create_rng(5));
        for (i, c) in a.current_mut().iter_mut().enumerate() {
            c.set_fitness(i as u32 * 2);
        }
        let mut b = a.clone();

        let (current, next) = a.buffers_mut();
        crossover_generation(current, next, 0.2, 0.3, &mut create_rng(6), false);
        let (current, next) = b.buffers_mut();
        crossover_generation(current, next, 0.2, 0.3, &mut create_rng(6), true);
        assert_eq!(a.next(), b.next());
    }

    #[test]
    fn test_mutant_count() {
        assert_eq!(mutant_count(10, 0.3), 3);
        assert_eq!(mutant_count(25, 0.3), 7);
        assert_eq!(mutant_count(4, 0.0), 0);
        assert_eq!(mutant_count(4, 1.0), 4);
    }

    #[test]
    fn test_mutation_replaces_only_the_tail() {
        let layout = GeneLayout::new(4, 10, 1.5);
        let mut next: Vec<Chromosome> = (0..10).map(|_| constant(-1.0, 8, 1)).collect();
        mutate_generation(&mut next, 0.3, &layout, &mut create_rng(9), false);

        for c in &next[..7] {
            assert!(c.genes().iter().all(|&g| g == -1.0));
            assert_eq!(c.fitness(), 1);
        }
        for c in &next[7..] {
            assert_eq!(c.genes().len(), 8);
            assert!(c.genes().iter().all(|&g| g >= 0.0));
            assert_eq!(c.fitness(), Chromosome::WORST_FITNESS);
        }
    }
}
