//! Resource-constrained project scheduling with a random-key genetic
//! algorithm.
//!
//! - **Project model** ([`project`]): jobs with durations, precedence
//!   relations and renewable resource demands; JSON instance loading and a
//!   seeded instance generator.
//! - **Schedule decoding** ([`schedule`]): a priority-based serial schedule
//!   generation scheme that turns a chromosome into a concrete schedule.
//! - **Genetic algorithm** ([`ga`]): double-buffered population, elite-biased
//!   tournament selection, biased uniform crossover and random-restart
//!   mutation, with parallel evaluation through rayon.
//!
//! # Quick Start
//!
//! ```
//! use rcpsp_ga::ga::{GaConfig, GaRunner};
//! use rcpsp_ga::project::generate;
//! use rcpsp_ga::schedule::{decode, Ssgs};
//!
//! let project = generate(20, 2, 1).unwrap();
//! let config = GaConfig::fast().with_max_generations(10).with_seed(3);
//! let result = GaRunner::run(&Ssgs::new(&project), &config).unwrap();
//!
//! let schedule = decode(&project, result.best.genes()).unwrap();
//! assert_eq!(schedule.makespan(), result.best_makespan);
//! assert!(schedule.violations(&project).is_empty());
//! ```

pub mod error;
pub mod ga;
pub mod project;
pub mod random;
pub mod schedule;

pub use error::{ConfigError, Error, InstanceError, Result};
