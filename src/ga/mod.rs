//! Genetic algorithm over random-key chromosomes.
//!
//! A chromosome is a vector of real genes. A [`ChromosomeDecoder`] maps it
//! to a makespan; the GA only ever sees that number. Everything else
//! (selection, crossover, mutation, stopping) is handled here.
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population size, operator shares,
//!   stopping policy, presets)
//! - [`GaRunner`]: Executes the evolutionary loop
//! - [`Evolution`]: The loop as an explicit phase state machine
//! - [`GaResult`]: Final optimization result with per-generation statistics
//!
//! # Generation Structure
//!
//! 1. **Evaluate**: decode every chromosome of the current generation and
//!    sort it by makespan, best first
//! 2. **Reproduce**: fill the next generation with biased uniform crossover
//!    children of elite-biased tournament winners
//! 3. **Mutate**: re-randomize the trailing share of the next generation
//! 4. **Swap**: the next generation becomes the current one
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Bean (1994), "Genetic Algorithms and Random Keys for Sequencing and
//!   Optimization"
//! - Goncalves & Resende (2011), "Biased random-key genetic algorithms for
//!   combinatorial optimization"

mod config;
pub mod operators;
mod population;
mod runner;
mod selection;
mod types;

pub use config::{GaConfig, POPULATION_PER_JOB};
pub use population::Population;
pub use runner::{
    evaluate_population, Evolution, GaResult, GaRunner, GenerationStats, Phase, StopReason,
};
pub use selection::{elite_count, select_parents, tournament};
pub use types::{Chromosome, ChromosomeDecoder, GeneLayout};
