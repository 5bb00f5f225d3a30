//! Chromosome representation and the decoder contract.
//!
//! [`ChromosomeDecoder`] is the seam between the evolutionary engine and the
//! scheduling problem: the engine only knows how many jobs there are and
//! how long the horizon is, and asks the decoder for a makespan.

use rand::Rng;
use serde::Serialize;

use crate::project::Time;
use crate::schedule::ScheduleError;

/// Maps a gene vector to a makespan.
///
/// Implemented by [`Ssgs`](crate::schedule::Ssgs). Must be `Send + Sync`
/// because the runner may decode chromosomes in parallel, and must be
/// deterministic: the same genes always produce the same result.
pub trait ChromosomeDecoder: Send + Sync {
    /// Number of jobs `n`; chromosomes carry `2n` genes.
    fn job_count(&self) -> usize;

    /// Scheduling horizon; tolerance genes are scaled relative to it.
    fn horizon(&self) -> Time;

    /// Decodes `genes` and returns the makespan.
    fn decode(&self, genes: &[f64]) -> Result<Time, ScheduleError>;
}

/// A candidate solution: `n` priority genes followed by `n` tolerance genes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chromosome {
    genes: Vec<f64>,
    fitness: Time,
}

impl Chromosome {
    /// Fitness of chromosomes that are not evaluated yet or failed to decode.
    pub const WORST_FITNESS: Time = Time::MAX;

    /// Wraps a gene vector; fitness starts at [`WORST_FITNESS`](Self::WORST_FITNESS).
    pub fn new(genes: Vec<f64>) -> Self {
        Self {
            genes,
            fitness: Self::WORST_FITNESS,
        }
    }

    pub fn genes(&self) -> &[f64] {
        &self.genes
    }

    pub(crate) fn genes_mut(&mut self) -> &mut Vec<f64> {
        &mut self.genes
    }

    /// Decoded makespan, lower is better.
    pub fn fitness(&self) -> Time {
        self.fitness
    }

    pub fn set_fitness(&mut self, fitness: Time) {
        self.fitness = fitness;
    }

    /// Whether the chromosome decoded to a schedule.
    pub fn is_feasible(&self) -> bool {
        self.fitness != Self::WORST_FITNESS
    }
}

/// Gene count and sampling ranges for one project.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneLayout {
    jobs: usize,
    tolerance_bound: f64,
}

impl GeneLayout {
    /// Priorities are sampled from `[0, 1)`, tolerances from
    /// `[0, tolerance_scale * horizon)`.
    pub fn new(jobs: usize, horizon: Time, tolerance_scale: f64) -> Self {
        Self {
            jobs,
            tolerance_bound: tolerance_scale * f64::from(horizon),
        }
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Total gene count, `2 * jobs`.
    pub fn len(&self) -> usize {
        2 * self.jobs
    }

    pub fn is_empty(&self) -> bool {
        self.jobs == 0
    }

    pub fn tolerance_bound(&self) -> f64 {
        self.tolerance_bound
    }

    /// Overwrites `genes` with fresh random values, resizing it to [`len`](Self::len).
    pub fn randomize<R: Rng>(&self, genes: &mut Vec<f64>, rng: &mut R) {
        genes.clear();
        genes.extend((0..self.jobs).map(|_| rng.random::<f64>()));
        genes.extend((0..self.jobs).map(|_| rng.random::<f64>() * self.tolerance_bound));
    }

    /// Creates a random, unevaluated chromosome.
    pub fn random_chromosome<R: Rng>(&self, rng: &mut R) -> Chromosome {
        let mut genes = Vec::with_capacity(self.len());
        self.randomize(&mut genes, rng);
        Chromosome::new(genes)
    }
}
