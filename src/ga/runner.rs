//! GA evolutionary loop execution.
//!
//! [`Evolution`] is the explicit state machine of one run:
//!
//! ```text
//! Init → Evaluate → Reproduce → Mutate → Swap → Evaluate → … → Done
//! ```
//!
//! [`GaRunner`] drives it to completion, reports per-generation statistics
//! to an observer and honours an external cancellation flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use serde::Serialize;

use super::config::GaConfig;
use super::operators::{crossover_generation, mutate_generation};
use super::population::{for_each_slot, Population};
use super::types::{Chromosome, ChromosomeDecoder, GeneLayout};
use crate::error::ConfigError;
use crate::project::Time;
use crate::random::create_rng;

const HISTORY_PREALLOC: usize = 1024;

/// Phase of an [`Evolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Current generation allocated and filled with random chromosomes.
    Init,
    /// Current generation is about to be decoded and ranked.
    Evaluate,
    /// Next generation is about to be bred by selection and crossover.
    Reproduce,
    /// Tail of the next generation is about to be re-randomized.
    Mutate,
    /// Buffers are about to be exchanged.
    Swap,
    /// Terminal.
    Done,
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopReason {
    GenerationLimit,
    TimeLimit,
    Stagnation,
    Cancelled,
}

/// Fitness statistics of one evaluated generation.
///
/// Infeasible chromosomes count with [`Chromosome::WORST_FITNESS`] in
/// `best`, `average` and `worst`, so `best <= average <= worst` always
/// holds. `feasible_average` leaves them out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationStats {
    /// 1-based generation number.
    pub generation: usize,
    pub best: Time,
    pub average: f64,
    pub worst: Time,
    /// Mean makespan over chromosomes that decoded, `None` if none did.
    pub feasible_average: Option<f64>,
    /// Chromosomes that failed to decode.
    pub infeasible: usize,
}

impl GenerationStats {
    /// Computes statistics over an evaluated generation.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn from_population(generation: usize, population: &[Chromosome]) -> Self {
        assert!(!population.is_empty(), "statistics of an empty population");
        let mut best = Time::MAX;
        let mut worst = Time::MIN;
        let mut sum = 0.0;
        let mut feasible_sum = 0.0;
        let mut infeasible = 0;
        for c in population {
            let f = c.fitness();
            best = best.min(f);
            worst = worst.max(f);
            sum += f64::from(f);
            if c.is_feasible() {
                feasible_sum += f64::from(f);
            } else {
                infeasible += 1;
            }
        }
        let feasible = population.len() - infeasible;
        Self {
            generation,
            best,
            average: sum / population.len() as f64,
            worst,
            feasible_average: (feasible > 0).then(|| feasible_sum / feasible as f64),
            infeasible,
        }
    }
}

/// Result of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// Best chromosome seen in any evaluated generation.
    ///
    /// Unevaluated (worst fitness) only if the run was cancelled before the
    /// first evaluation.
    pub best: Chromosome,

    /// Same as `best.fitness()`.
    pub best_makespan: Time,

    /// Number of evaluated generations.
    pub generations: usize,

    pub stop_reason: StopReason,

    /// Statistics of every evaluated generation, in order.
    pub history: Vec<GenerationStats>,

    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

/// State of one GA run.
///
/// Each call to [`step`](Self::step) performs the work of the current
/// [`Phase`] and moves to the next one. The current generation is never
/// written after it has been evaluated; crossover and mutation only touch
/// the next buffer and the swap is a single pointer exchange. Stopping in
/// any phase therefore leaves a consistent population.
pub struct Evolution<'d, D: ChromosomeDecoder> {
    decoder: &'d D,
    config: GaConfig,
    layout: GeneLayout,
    population: Population,
    rng: StdRng,
    phase: Phase,
    generation: usize,
    history: Vec<GenerationStats>,
    best: Option<Chromosome>,
    stagnation: usize,
    started: Instant,
    stop_reason: Option<StopReason>,
}

impl<'d, D: ChromosomeDecoder> Evolution<'d, D> {
    /// Validates `config` and creates the initial random population.
    ///
    /// # Errors
    /// Returns [`ConfigError`] for invalid parameters.
    pub fn new(decoder: &'d D, config: &GaConfig) -> Result<Self, ConfigError> {
        let jobs = decoder.job_count();
        let size = config.validate_for(jobs)?;
        let layout = GeneLayout::new(jobs, decoder.horizon(), config.tolerance_scale);

        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };
        let population = Population::random(size, &layout, &mut rng);

        log::info!(
            "GA start: {} jobs, population {}, up to {} generations",
            jobs,
            size,
            config.max_generations
        );

        Ok(Self {
            decoder,
            config: config.clone(),
            layout,
            population,
            rng,
            phase: Phase::Init,
            generation: 0,
            history: Vec::with_capacity(config.max_generations.min(HISTORY_PREALLOC)),
            best: None,
            stagnation: 0,
            started: Instant::now(),
            stop_reason: None,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of evaluated generations so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    /// Best chromosome seen so far.
    pub fn best(&self) -> Option<&Chromosome> {
        self.best.as_ref()
    }

    /// Performs the current phase and advances.
    ///
    /// Returns the statistics of the generation when an `Evaluate` phase
    /// was completed, `None` otherwise. Calling `step` in [`Phase::Done`]
    /// does nothing.
    pub fn step(&mut self) -> Option<GenerationStats> {
        match self.phase {
            Phase::Init => {
                self.phase = Phase::Evaluate;
                None
            }
            Phase::Evaluate => {
                let stats = self.evaluate();
                self.phase = match self.stop_condition() {
                    Some(reason) => {
                        self.stop_reason = Some(reason);
                        Phase::Done
                    }
                    None => Phase::Reproduce,
                };
                Some(stats)
            }
            Phase::Reproduce => {
                let (current, next) = self.population.buffers_mut();
                crossover_generation(
                    current,
                    next,
                    self.config.elite_fraction,
                    self.config.parent1_bias,
                    &mut self.rng,
                    self.config.parallel,
                );
                self.phase = Phase::Mutate;
                None
            }
            Phase::Mutate => {
                mutate_generation(
                    self.population.next_mut(),
                    self.config.mutant_fraction,
                    &self.layout,
                    &mut self.rng,
                    self.config.parallel,
                );
                self.phase = Phase::Swap;
                None
            }
            Phase::Swap => {
                self.population.swap();
                self.phase = Phase::Evaluate;
                None
            }
            Phase::Done => None,
        }
    }

    /// Ends the run in whatever phase it is in.
    pub fn stop(&mut self, reason: StopReason) {
        if self.phase != Phase::Done {
            log::debug!("stopping in phase {:?}: {:?}", self.phase, reason);
            self.phase = Phase::Done;
            self.stop_reason = Some(reason);
        }
    }

    /// Runs until [`Phase::Done`] and returns the result.
    pub fn run_to_end(mut self) -> GaResult {
        while self.phase != Phase::Done {
            self.step();
        }
        self.into_result()
    }

    /// Converts the state into a [`GaResult`].
    ///
    /// A run that has not reached [`Phase::Done`] is reported as cancelled.
    pub fn into_result(self) -> GaResult {
        let stop_reason = self.stop_reason.unwrap_or(StopReason::Cancelled);
        let best = match self.best {
            Some(best) => best,
            None => self.population.current()[0].clone(),
        };
        let elapsed = self.started.elapsed();
        log::info!(
            "GA finished after {} generations ({:?}, {:.3}s): best makespan {}",
            self.generation,
            stop_reason,
            elapsed.as_secs_f64(),
            best.fitness()
        );
        GaResult {
            best_makespan: best.fitness(),
            best,
            generations: self.generation,
            stop_reason,
            history: self.history,
            elapsed,
        }
    }

    fn evaluate(&mut self) -> GenerationStats {
        evaluate_population(self.decoder, self.population.current_mut(), self.config.parallel);
        self.population.sort_current();
        self.generation += 1;

        let stats = GenerationStats::from_population(self.generation, self.population.current());
        log::debug!(
            "generation {}: best {}, average {:.2}, worst {}, infeasible {}",
            stats.generation,
            stats.best,
            stats.average,
            stats.worst,
            stats.infeasible
        );
        self.history.push(stats);

        let generation_best = &self.population.current()[0];
        let improved = self
            .best
            .as_ref()
            .map_or(true, |best| generation_best.fitness() < best.fitness());
        if improved {
            self.best = Some(generation_best.clone());
            self.stagnation = 0;
        } else {
            self.stagnation += 1;
        }
        stats
    }

    fn stop_condition(&self) -> Option<StopReason> {
        if self.generation >= self.config.max_generations {
            return Some(StopReason::GenerationLimit);
        }
        if let Some(limit) = self.config.time_limit_ms {
            if self.started.elapsed() >= Duration::from_millis(limit) {
                return Some(StopReason::TimeLimit);
            }
        }
        if self.config.stagnation_limit > 0 && self.stagnation >= self.config.stagnation_limit {
            return Some(StopReason::Stagnation);
        }
        None
    }
}

/// Decodes every chromosome and stores its makespan.
///
/// Decoding failures are contained: the chromosome gets
/// [`Chromosome::WORST_FITNESS`] and the generation carries on.
pub fn evaluate_population<D: ChromosomeDecoder>(
    decoder: &D,
    population: &mut [Chromosome],
    parallel: bool,
) {
    for_each_slot(population, parallel, |slot, chromosome| {
        let fitness = match decoder.decode(chromosome.genes()) {
            Ok(makespan) => makespan,
            Err(err) => {
                log::debug!("chromosome {slot} penalized: {err}");
                Chromosome::WORST_FITNESS
            }
        };
        chromosome.set_fitness(fitness);
    });
}

/// Executes the GA evolutionary loop.
///
/// # Usage
///
/// ```
/// use rcpsp_ga::ga::{GaConfig, GaRunner};
/// use rcpsp_ga::project::generate;
/// use rcpsp_ga::schedule::Ssgs;
///
/// let project = generate(10, 2, 7).unwrap();
/// let config = GaConfig::default().with_max_generations(5).with_seed(42);
/// let result = GaRunner::run(&Ssgs::new(&project), &config).unwrap();
/// assert!(result.best_makespan >= project.critical_path_length());
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA optimization.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the configuration is invalid for this
    /// decoder.
    pub fn run<D: ChromosomeDecoder>(decoder: &D, config: &GaConfig) -> Result<GaResult, ConfigError> {
        Self::run_with_observer(decoder, config, None, |_| {})
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the GA stops at
    /// the next phase boundary and returns the best solution found so far.
    pub fn run_with_cancel<D: ChromosomeDecoder>(
        decoder: &D,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult, ConfigError> {
        Self::run_with_observer(decoder, config, cancel, |_| {})
    }

    /// Runs the GA, calling `observer` once per evaluated generation.
    pub fn run_with_observer<D, F>(
        decoder: &D,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
        mut observer: F,
    ) -> Result<GaResult, ConfigError>
    where
        D: ChromosomeDecoder,
        F: FnMut(&GenerationStats),
    {
        let mut evolution = Evolution::new(decoder, config)?;
        while evolution.phase() != Phase::Done {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    evolution.stop(StopReason::Cancelled);
                    break;
                }
            }
            if let Some(stats) = evolution.step() {
                observer(&stats);
            }
        }
        Ok(evolution.into_result())
    }
}

// ============================================================================
// Tests
// ============================================================================
