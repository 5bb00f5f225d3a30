//! Immutable RCPSP instance.

use serde::Serialize;

use crate::error::ConfigError;

/// Discrete time unit used for durations, start and finish times.
pub type Time = u32;

/// Upper bound on `horizon × resources`, the size of the resource profile
/// every decoding allocates.
pub const MAX_PROFILE_CELLS: usize = 1 << 22;

/// A resource-constrained project scheduling instance.
///
/// Jobs are indexed `0..job_count()`. Job 0 is the project source
/// (duration 0, no predecessors); the last job is the sink whose finish
/// time is the makespan. Every job requests a fixed amount of each
/// renewable resource for every time unit it runs.
///
/// A `Project` is validated on construction and never changes afterwards,
/// so it can be shared freely between threads evaluating chromosomes.
///
/// # Examples
///
/// ```
/// use rcpsp_ga::project::Project;
///
/// // source -> job 1 -> sink
/// let project = Project::new(
///     vec![0, 2, 0],
///     vec![vec![], vec![0], vec![1]],
///     vec![vec![0], vec![1], vec![0]],
///     vec![1],
///     10,
/// )
/// .unwrap();
/// assert_eq!(project.job_count(), 3);
/// assert_eq!(project.critical_path_length(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    durations: Vec<Time>,
    predecessors: Vec<Vec<usize>>,
    requirements: Vec<Vec<u32>>,
    capacities: Vec<u32>,
    horizon: Time,
    #[serde(skip)]
    topological_order: Vec<usize>,
}

impl Project {
    /// Builds and validates a project.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if there are no jobs, the horizon is zero
    /// or its profile would exceed [`MAX_PROFILE_CELLS`], per-job vectors
    /// disagree in length, job 0 is not a valid source, the last job is a
    /// predecessor of another job, a predecessor index is out of range or
    /// self-referencing, the precedence graph has a cycle, some job has no
    /// precedence path to the sink, or a requirement vector does not have
    /// one entry per resource.
    pub fn new(
        durations: Vec<Time>,
        predecessors: Vec<Vec<usize>>,
        requirements: Vec<Vec<u32>>,
        capacities: Vec<u32>,
        horizon: Time,
    ) -> Result<Self, ConfigError> {
        let n = durations.len();
        if n == 0 {
            return Err(ConfigError::NoJobs);
        }
        if horizon == 0 {
            return Err(ConfigError::ZeroHorizon);
        }
        let cells = (horizon as usize).saturating_mul(capacities.len().max(1));
        if cells > MAX_PROFILE_CELLS {
            return Err(ConfigError::HorizonTooLarge {
                horizon,
                resources: capacities.len(),
                max_cells: MAX_PROFILE_CELLS,
            });
        }
        for found in [predecessors.len(), requirements.len()] {
            if found != n {
                return Err(ConfigError::JobDataLength { jobs: n, found });
            }
        }
        if durations[0] != 0 || !predecessors[0].is_empty() {
            return Err(ConfigError::InvalidSource);
        }
        for (job, preds) in predecessors.iter().enumerate() {
            for &p in preds {
                if p >= n {
                    return Err(ConfigError::PredecessorOutOfRange {
                        job,
                        predecessor: p,
                    });
                }
                if p == job {
                    return Err(ConfigError::SelfPrecedence(job));
                }
                if p == n - 1 {
                    return Err(ConfigError::InvalidSink(job));
                }
            }
        }
        for (job, req) in requirements.iter().enumerate() {
            if req.len() != capacities.len() {
                return Err(ConfigError::RequirementLength {
                    job,
                    expected: capacities.len(),
                    found: req.len(),
                });
            }
        }

        let topological_order = topological_order(&predecessors)?;
        if let Some(job) = first_unreachable_from_sink(&predecessors) {
            return Err(ConfigError::UnreachableSink(job));
        }

        Ok(Self {
            durations,
            predecessors,
            requirements,
            capacities,
            horizon,
            topological_order,
        })
    }

    /// Number of jobs, including source and sink.
    pub fn job_count(&self) -> usize {
        self.durations.len()
    }

    /// Number of renewable resource types.
    pub fn resource_count(&self) -> usize {
        self.capacities.len()
    }

    /// Index of the sink job.
    pub fn sink(&self) -> usize {
        self.durations.len() - 1
    }

    pub fn duration(&self, job: usize) -> Time {
        self.durations[job]
    }

    pub fn predecessors(&self, job: usize) -> &[usize] {
        &self.predecessors[job]
    }

    /// Per-resource amount job `job` holds while it runs.
    pub fn requirement(&self, job: usize) -> &[u32] {
        &self.requirements[job]
    }

    /// Per-resource capacity available at every time unit.
    pub fn capacities(&self) -> &[u32] {
        &self.capacities
    }

    /// Number of time units covered by the resource profile.
    pub fn horizon(&self) -> Time {
        self.horizon
    }

    /// Length of the longest duration chain ending at the sink.
    ///
    /// No precedence-feasible schedule finishes the sink earlier, so this is
    /// a lower bound on every makespan the decoder can produce. Saturates at
    /// `Time::MAX`.
    pub fn critical_path_length(&self) -> Time {
        let mut earliest_finish = vec![0 as Time; self.job_count()];
        for &job in &self.topological_order {
            let ready = self.predecessors[job]
                .iter()
                .map(|&p| earliest_finish[p])
                .max()
                .unwrap_or(0);
            earliest_finish[job] = ready.saturating_add(self.durations[job]);
        }
        earliest_finish[self.sink()]
    }
}

/// First job from which the sink cannot be reached, walking predecessor
/// lists backwards from the sink.
fn first_unreachable_from_sink(predecessors: &[Vec<usize>]) -> Option<usize> {
    let sink = predecessors.len() - 1;
    let mut reaches_sink = vec![false; predecessors.len()];
    reaches_sink[sink] = true;
    let mut stack = vec![sink];
    while let Some(job) = stack.pop() {
        for &p in &predecessors[job] {
            if !reaches_sink[p] {
                reaches_sink[p] = true;
                stack.push(p);
            }
        }
    }
    reaches_sink.iter().position(|&reached| !reached)
}

/// Kahn's algorithm over the predecessor lists.
fn topological_order(predecessors: &[Vec<usize>]) -> Result<Vec<usize>, ConfigError> {
    let n = predecessors.len();
    let mut in_degree: Vec<usize> = predecessors.iter().map(Vec::len).collect();
    let mut successors = vec![Vec::new(); n];
    for (job, preds) in predecessors.iter().enumerate() {
        for &p in preds {
            successors[p].push(job);
        }
    }

    let mut order = Vec::with_capacity(n);
    let mut ready: Vec<usize> = (0..n).filter(|&j| in_degree[j] == 0).collect();
    while let Some(job) = ready.pop() {
        order.push(job);
        for &s in &successors[job] {
            in_degree[s] -= 1;
            if in_degree[s] == 0 {
                ready.push(s);
            }
        }
    }

    if order.len() < n {
        let stuck = (0..n).find(|&j| in_degree[j] > 0).unwrap_or(0);
        return Err(ConfigError::CyclicPrecedence(stuck));
    }
    Ok(order)
}
