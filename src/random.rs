//! Seedable random sources.
//!
//! All randomness in a run flows from one master [`StdRng`]. Operators that
//! touch many population slots draw one seed per slot from the master
//! stream first and then work on independent sub-streams, so the outcome of
//! a seeded run does not depend on how rayon splits the work.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates a deterministic generator from a 64-bit seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Draws `n` sub-stream seeds from `rng`.
pub fn substream_seeds<R: Rng>(rng: &mut R, n: usize) -> Vec<u64> {
    (0..n).map(|_| rng.random()).collect()
}
