//! Error types.
//!
//! Three layers of failure are distinguished:
//!
//! - [`InstanceError`]: the instance document could not be read or is
//!   inconsistent. Raised by the loader before any optimization starts.
//! - [`ConfigError`]: the project model or the run parameters are invalid.
//!   Raised when a [`Project`](crate::project::Project) is built or a run
//!   is started.
//! - [`ScheduleError`](crate::schedule::ScheduleError): a single chromosome
//!   could not be decoded. Contained by the GA runner, never fatal.

use std::path::PathBuf;

/// Failures while loading an instance document.
#[derive(Debug, thiserror::Error)]
pub enum InstanceError {
    #[error("failed to read instance file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed instance document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("numberOfJobs is {declared} but {found} job records are present")]
    JobCountMismatch { declared: usize, found: usize },
    #[error("resourceNumber is {declared} but {found} capacities are present")]
    ResourceCountMismatch { declared: usize, found: usize },
    #[error("job number {number} is outside 1..={jobs}")]
    JobNumberOutOfRange { number: usize, jobs: usize },
    #[error("job number {0} appears more than once")]
    DuplicateJob(usize),
    #[error("job {job} lists predecessor {number}, which is outside 1..={jobs}")]
    PredecessorOutOfRange { job: usize, number: usize, jobs: usize },
    #[error("invalid integer field {field}: {value:?}")]
    InvalidInteger { field: &'static str, value: String },
}

/// Invalid project model or run parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("project must contain at least one job")]
    NoJobs,
    #[error("scheduling horizon must be positive")]
    ZeroHorizon,
    #[error("per-job data has {found} entries for {jobs} jobs")]
    JobDataLength { jobs: usize, found: usize },
    #[error("scheduling horizon {horizon} with {resources} resources exceeds {max_cells} profile cells")]
    HorizonTooLarge {
        horizon: u32,
        resources: usize,
        max_cells: usize,
    },
    #[error("job 0 must be the project source (duration 0, no predecessors)")]
    InvalidSource,
    #[error("the last job must be the project sink, but job {0} lists it as a predecessor")]
    InvalidSink(usize),
    #[error("job {0} has no precedence path to the sink")]
    UnreachableSink(usize),
    #[error("job {job} references predecessor {predecessor}, which does not exist")]
    PredecessorOutOfRange { job: usize, predecessor: usize },
    #[error("job {0} lists itself as a predecessor")]
    SelfPrecedence(usize),
    #[error("precedence relation contains a cycle through job {0}")]
    CyclicPrecedence(usize),
    #[error("job {job} has {found} resource requirements, expected {expected}")]
    RequirementLength {
        job: usize,
        expected: usize,
        found: usize,
    },
    #[error("population size must be at least 2, got {0}")]
    PopulationTooSmall(usize),
    #[error("max_generations must be at least 1")]
    NoGenerations,
    #[error("{name} must lie in {range}, got {value}")]
    OutOfRange {
        name: &'static str,
        range: &'static str,
        value: f64,
    },
    #[error("time_limit_ms must be positive or None")]
    ZeroTimeLimit,
}

/// Crate-level error returned by fallible entry points.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Instance(#[from] InstanceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Convenience alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
