//! Double-buffered population storage.

use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::types::{Chromosome, GeneLayout};
use crate::random::{create_rng, substream_seeds};

/// Current and next generation of fixed, equal size.
///
/// Operators read [`current`](Self::current) and write
/// [`next`](Self::next); [`swap`](Self::swap) exchanges the two buffers
/// without copying genes. Gene vectors are allocated once and reused.
#[derive(Debug, Clone)]
pub struct Population {
    current: Vec<Chromosome>,
    next: Vec<Chromosome>,
}

impl Population {
    /// Creates `size` random chromosomes in the current buffer and an
    /// equally sized next buffer.
    pub fn random<R: Rng>(size: usize, layout: &GeneLayout, rng: &mut R) -> Self {
        let current = substream_seeds(rng, size)
            .into_iter()
            .map(|seed| layout.random_chromosome(&mut create_rng(seed)))
            .collect();
        let next = (0..size)
            .map(|_| Chromosome::new(vec![0.0; layout.len()]))
            .collect();
        Self { current, next }
    }

    /// Wraps an existing generation.
    ///
    /// The next buffer is allocated with the same gene counts.
    pub fn from_generation(current: Vec<Chromosome>) -> Self {
        let next = current
            .iter()
            .map(|c| Chromosome::new(vec![0.0; c.genes().len()]))
            .collect();
        Self { current, next }
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn current(&self) -> &[Chromosome] {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut [Chromosome] {
        &mut self.current
    }

    pub fn next(&self) -> &[Chromosome] {
        &self.next
    }

    /// Current generation for reading, next generation for writing.
    pub fn buffers_mut(&mut self) -> (&[Chromosome], &mut [Chromosome]) {
        (&self.current, &mut self.next)
    }

    pub fn next_mut(&mut self) -> &mut [Chromosome] {
        &mut self.next
    }

    /// Sorts the current generation by fitness, best first.
    ///
    /// The sort is stable, so equal makespans keep their relative order.
    pub fn sort_current(&mut self) {
        self.current.sort_by_key(Chromosome::fitness);
    }

    /// Makes the next generation current.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }
}

/// Applies `f` to every slot with its index, in parallel when requested.
#[cfg(feature = "parallel")]
pub(crate) fn for_each_slot<F>(slots: &mut [Chromosome], parallel: bool, f: F)
where
    F: Fn(usize, &mut Chromosome) + Send + Sync,
{
    if parallel {
        slots
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, slot)| f(i, slot));
    } else {
        slots.iter_mut().enumerate().for_each(|(i, slot)| f(i, slot));
    }
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn for_each_slot<F>(slots: &mut [Chromosome], _parallel: bool, f: F)
where
    F: Fn(usize, &mut Chromosome) + Send + Sync,
{
    slots.iter_mut().enumerate().for_each(|(i, slot)| f(i, slot));
}
