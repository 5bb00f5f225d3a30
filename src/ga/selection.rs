//! Elite-biased binary tournament selection.
//!
//! Each tournament pits a candidate drawn from the best slice of the
//! population against a candidate drawn from the whole population. The
//! population must be sorted by fitness, best first, so that the elite
//! slice is simply its prefix.
//!
//! # References
//!
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"
//! - Goncalves & Resende (2011), "Biased random-key genetic algorithms for
//!   combinatorial optimization"

use rand::Rng;

use super::types::Chromosome;

/// Redraws of the second parent before falling back to a uniform pick.
const MAX_REDRAWS: usize = 64;

/// Number of leading positions that form the elite slice.
///
/// At least one, at most the population size.
pub fn elite_count(population_size: usize, elite_fraction: f64) -> usize {
    ((population_size as f64 * elite_fraction) as usize).clamp(1, population_size.max(1))
}

/// Selects two distinct parent indices.
///
/// Both parents are winners of [`tournament`]. The second winner is redrawn
/// until it differs from the first; if the tournament keeps producing the
/// same index (e.g. a unique best individual in a tiny population), a
/// uniformly random other index is used instead.
///
/// # Panics
/// Panics if the population has fewer than two individuals.
pub fn select_parents<R: Rng>(
    population: &[Chromosome],
    elite_fraction: f64,
    rng: &mut R,
) -> (usize, usize) {
    let n = population.len();
    assert!(n >= 2, "selection needs at least two individuals");

    let elite = elite_count(n, elite_fraction);
    let first = tournament(population, elite, rng);
    for _ in 0..MAX_REDRAWS {
        let second = tournament(population, elite, rng);
        if second != first {
            return (first, second);
        }
    }
    let offset = rng.random_range(1..n);
    (first, (first + offset) % n)
}

/// One binary tournament: elite candidate vs. population-wide candidate.
///
/// The elite candidate wins only with strictly lower fitness; ties go to
/// the population-wide candidate.
pub fn tournament<R: Rng>(population: &[Chromosome], elite: usize, rng: &mut R) -> usize {
    let from_elite = rng.random_range(0..elite);
    let from_all = rng.random_range(0..population.len());
    if population[from_elite].fitness() < population[from_all].fitness() {
        from_elite
    } else {
        from_all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn sorted_population(fitnesses: &[u32]) -> Vec<Chromosome> {
        let mut pop: Vec<Chromosome> = fitnesses
            .iter()
            .map(|&f| {
                let mut c = Chromosome::new(vec![0.0, 0.0]);
                c.set_fitness(f);
                c
            })
            .collect();
        pop.sort_by_key(Chromosome::fitness);
        pop
    }

    #[test]
    fn test_elite_count() {
        assert_eq!(elite_count(100, 0.2), 20);
        assert_eq!(elite_count(10, 0.2), 2);
        assert_eq!(elite_count(4, 0.2), 1);
        assert_eq!(elite_count(2, 0.0), 1);
        assert_eq!(elite_count(5, 1.0), 5);
    }

    #[test]
    fn test_pair_of_two_is_always_both() {
        // Unique best: every tournament tends to return index 0.
        let pop = sorted_population(&[1, 9]);
        let mut rng = create_rng(42);
        for _ in 0..1000 {
            let (a, b) = select_parents(&pop, 0.2, &mut rng);
            let mut pair = [a, b];
            pair.sort_unstable();
            assert_eq!(pair, [0, 1]);
        }
    }

    #[test]
    fn test_equal_fitness_pair() {
        let pop = sorted_population(&[4, 4]);
        let mut rng = create_rng(7);
        for _ in 0..1000 {
            let (a, b) = select_parents(&pop, 0.2, &mut rng);
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_tournament_favors_elite() {
        let pop = sorted_population(&(1..=50).collect::<Vec<_>>());
        let mut rng = create_rng(42);
        let elite = elite_count(pop.len(), 0.2);
        let n = 10_000;
        let in_elite = (0..n)
            .filter(|_| tournament(&pop, elite, &mut rng) < elite)
            .count();
        // Uniform sampling would land in the elite slice 20% of the time.
        assert!(
            in_elite > n * 7 / 10,
            "expected elite-heavy selection, got {in_elite}/{n}"
        );
    }

    #[test]
    fn test_tie_goes_to_population_candidate() {
        let pop = sorted_population(&[5, 5, 5, 5, 5]);
        let mut rng = create_rng(11);
        let mut counts = [0u32; 5];
        for _ in 0..10_000 {
            counts[tournament(&pop, 1, &mut rng)] += 1;
        }
        // With all ties the winner is the uniform draw.
        for &c in &counts {
            assert!(c > 1500, "expected roughly uniform, got {counts:?}");
        }
    }

    #[test]
    #[should_panic(expected = "selection needs at least two individuals")]
    fn test_single_individual_panics() {
        let pop = sorted_population(&[1]);
        select_parents(&pop, 0.2, &mut create_rng(1));
    }

    proptest! {
        #[test]
        fn prop_parents_distinct(
            fitnesses in proptest::collection::vec(0u32..20, 2..40),
            seed in any::<u64>(),
        ) {
            let pop = sorted_population(&fitnesses);
            let mut rng = create_rng(seed);
            for _ in 0..20 {
                let (a, b) = select_parents(&pop, 0.2, &mut rng);
                prop_assert_ne!(a, b);
                prop_assert!(a < pop.len() && b < pop.len());
            }
        }
    }
}
