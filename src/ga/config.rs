//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use crate::error::ConfigError;

/// Population slots per job when no explicit size is configured.
pub const POPULATION_PER_JOB: usize = 5;

/// Configuration for the RCPSP genetic algorithm.
///
/// Controls population size, operator shares, stopping policy and
/// parallelism.
///
/// # Defaults
///
/// ```
/// use rcpsp_ga::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, None); // 5 × job count
/// assert_eq!(config.max_generations, 250);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use rcpsp_ga::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(200)
///     .with_max_generations(500)
///     .with_stagnation_limit(50)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GaConfig {
    /// Number of chromosomes per generation.
    ///
    /// `None` derives the size from the instance: `5 × job count`.
    pub population_size: Option<usize>,

    /// Maximum number of evaluated generations.
    pub max_generations: usize,

    /// Share of the sorted population that forms the elite slice used by
    /// selection (0.0–1.0). At least one individual is always elite.
    pub elite_fraction: f64,

    /// Probability that a child gene is taken from the first parent
    /// (0.0–1.0); the second parent supplies the rest.
    pub parent1_bias: f64,

    /// Share of the next generation, counted from its end, whose genes are
    /// re-randomized after crossover (0.0–1.0).
    pub mutant_fraction: f64,

    /// Tolerance genes are sampled from `[0, tolerance_scale × horizon)`.
    pub tolerance_scale: f64,

    /// Generations without a new best makespan before stopping.
    ///
    /// Set to 0 to disable plateau detection (the default).
    pub stagnation_limit: usize,

    /// Optional wall-clock budget in milliseconds.
    ///
    /// Checked after each generation is evaluated, so the run may exceed
    /// the budget by up to one generation's worth of work.
    pub time_limit_ms: Option<u64>,

    /// Whether to evaluate and breed chromosomes in parallel using rayon.
    ///
    /// Has no effect without the `parallel` feature. Results for a given
    /// seed are the same either way.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: None,
            max_generations: 250,
            elite_fraction: 0.2,
            parent1_bias: 0.3,
            mutant_fraction: 0.3,
            tolerance_scale: 1.5,
            stagnation_limit: 0,
            time_limit_ms: None,
            parallel: true,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets a fixed population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = Some(n);
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the elite fraction used by selection.
    pub fn with_elite_fraction(mut self, fraction: f64) -> Self {
        self.elite_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Sets the probability of inheriting a gene from the first parent.
    pub fn with_parent1_bias(mut self, bias: f64) -> Self {
        self.parent1_bias = bias.clamp(0.0, 1.0);
        self
    }

    /// Sets the share of re-randomized chromosomes.
    pub fn with_mutant_fraction(mut self, fraction: f64) -> Self {
        self.mutant_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Sets the tolerance scale relative to the horizon.
    pub fn with_tolerance_scale(mut self, scale: f64) -> Self {
        self.tolerance_scale = scale.max(0.0);
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Preset for quick runs: 100 generations, stops after 25 without
    /// improvement or 10 seconds.
    pub fn fast() -> Self {
        Self {
            max_generations: 100,
            stagnation_limit: 25,
            time_limit_ms: Some(10_000),
            ..Self::default()
        }
    }

    /// Preset for long runs: 1000 generations, stops after 150 without
    /// improvement or 2 minutes.
    pub fn thorough() -> Self {
        Self {
            max_generations: 1000,
            stagnation_limit: 150,
            time_limit_ms: Some(120_000),
            ..Self::default()
        }
    }

    /// Population size for a project with `jobs` jobs.
    pub fn population_for(&self, jobs: usize) -> usize {
        self.population_size.unwrap_or(POPULATION_PER_JOB * jobs)
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` describing the first invalid parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(n) = self.population_size {
            if n < 2 {
                return Err(ConfigError::PopulationTooSmall(n));
            }
        }
        if self.max_generations == 0 {
            return Err(ConfigError::NoGenerations);
        }
        check_unit("elite_fraction", self.elite_fraction)?;
        check_unit("parent1_bias", self.parent1_bias)?;
        check_unit("mutant_fraction", self.mutant_fraction)?;
        if !(self.tolerance_scale.is_finite() && self.tolerance_scale >= 0.0) {
            return Err(ConfigError::OutOfRange {
                name: "tolerance_scale",
                range: "[0, inf)",
                value: self.tolerance_scale,
            });
        }
        if self.time_limit_ms == Some(0) {
            return Err(ConfigError::ZeroTimeLimit);
        }
        Ok(())
    }

    /// Validates the configuration for a concrete project size and returns
    /// the population size to use.
    pub fn validate_for(&self, jobs: usize) -> Result<usize, ConfigError> {
        self.validate()?;
        if jobs == 0 {
            return Err(ConfigError::NoJobs);
        }
        let size = self.population_for(jobs);
        if size < 2 {
            return Err(ConfigError::PopulationTooSmall(size));
        }
        Ok(size)
    }
}

fn check_unit(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            range: "[0, 1]",
            value,
        })
    }
}
