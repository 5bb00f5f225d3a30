//! Decoded schedules and decoding failures.

use serde::Serialize;

use super::profile::ResourceProfile;
use crate::project::{Project, Time};

/// A single chromosome could not be turned into a schedule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("job {job} has no resource-feasible start between {earliest_start} and horizon {horizon}")]
    Infeasible {
        job: usize,
        earliest_start: Time,
        horizon: Time,
    },
    #[error("decoding stalled after scheduling {scheduled} of {jobs} jobs")]
    Stalled { scheduled: usize, jobs: usize },
    #[error("chromosome has {found} genes, expected {expected}")]
    GeneLength { expected: usize, found: usize },
}

/// A constraint broken by a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Violation {
    /// `job` starts before `predecessor` finishes.
    Precedence { job: usize, predecessor: usize },
    /// Total demand on `resource` at `time` exceeds its capacity.
    Capacity { time: Time, resource: usize },
    /// `job` finishes after the horizon.
    BeyondHorizon { job: usize },
}

/// Start and finish times for every job of a project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schedule {
    pub(crate) starts: Vec<Time>,
    pub(crate) finishes: Vec<Time>,
    pub(crate) order: Vec<usize>,
    pub(crate) profile: ResourceProfile,
}

impl Schedule {
    /// Finish time of the sink job.
    pub fn makespan(&self) -> Time {
        self.finishes.last().copied().unwrap_or(0)
    }

    pub fn start(&self, job: usize) -> Time {
        self.starts[job]
    }

    pub fn finish(&self, job: usize) -> Time {
        self.finishes[job]
    }

    pub fn starts(&self) -> &[Time] {
        &self.starts
    }

    /// Jobs in the order they were placed, source first.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Resource profile left after every job was placed.
    pub fn profile(&self) -> &ResourceProfile {
        &self.profile
    }

    /// Checks the schedule against `project` from scratch.
    ///
    /// Recomputes resource usage from the start times instead of trusting
    /// the stored profile. An empty result means the schedule is feasible.
    pub fn violations(&self, project: &Project) -> Vec<Violation> {
        let mut found = Vec::new();
        let horizon = project.horizon();

        for job in 0..project.job_count() {
            for &p in project.predecessors(job) {
                if self.starts[job] < self.finishes[p] {
                    found.push(Violation::Precedence { job, predecessor: p });
                }
            }
            if self.finishes[job] > horizon {
                found.push(Violation::BeyondHorizon { job });
            }
        }

        let resources = project.resource_count();
        let mut usage = vec![0u64; horizon as usize * resources];
        for job in 0..project.job_count() {
            let end = self.finishes[job].min(horizon);
            for t in self.starts[job]..end {
                let row = t as usize * resources;
                for (r, &req) in project.requirement(job).iter().enumerate() {
                    usage[row + r] += u64::from(req);
                }
            }
        }
        for t in 0..horizon {
            for (r, &cap) in project.capacities().iter().enumerate() {
                if usage[t as usize * resources + r] > u64::from(cap) {
                    found.push(Violation::Capacity { time: t, resource: r });
                }
            }
        }

        found
    }
}
