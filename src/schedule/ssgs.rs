//! Priority-based serial schedule generation scheme.
//!
//! A chromosome for an `n`-job project has `2n` genes:
//!
//! - `genes[j]` for `j < n` is the priority of job `j`. Among eligible jobs
//!   the one with the **smallest** priority value is placed first; ties go
//!   to the lowest job index.
//! - `genes[n + g]` is the precedence tolerance of decision stage `g`. At
//!   stage `g` a job is eligible when every predecessor is scheduled and
//!   finishes no later than `tg + genes[n + g]`, where `tg` is the current
//!   decision time. The tolerance belongs to the stage, not to a job.
//!
//! Each placed job starts at the earliest time, not before its
//! predecessors finish, where every resource has enough capacity for the
//! whole duration. Decoding draws no randomness: the same project and genes
//! always yield the same schedule.
//!
//! # References
//!
//! - Kolisch (1996), "Serial and parallel resource-constrained project
//!   scheduling methods revisited: Theory and computation"
//! - Hartmann (1998), "A competitive genetic algorithm for
//!   resource-constrained project scheduling"

use std::collections::BTreeSet;
use std::ops::Bound::{Excluded, Unbounded};

use super::profile::ResourceProfile;
use super::types::{Schedule, ScheduleError};
use crate::ga::ChromosomeDecoder;
use crate::project::{Project, Time};

/// Decodes `genes` into a schedule for `project`.
///
/// # Errors
///
/// - [`ScheduleError::GeneLength`] if `genes.len() != 2 * job_count`
/// - [`ScheduleError::Infeasible`] if some job has no resource-feasible
///   start before the horizon runs out
/// - [`ScheduleError::Stalled`] if no job can become eligible any more,
///   e.g. because tolerance genes are negative or NaN
pub fn decode(project: &Project, genes: &[f64]) -> Result<Schedule, ScheduleError> {
    let expected = 2 * project.job_count();
    if genes.len() != expected {
        return Err(ScheduleError::GeneLength {
            expected,
            found: genes.len(),
        });
    }

    let mut state = DecodeState::new(project, genes);
    state.run()?;
    Ok(state.into_schedule())
}

/// Scratch state of one decoding call.
///
/// Owned by the call and dropped when it returns; nothing here is ever
/// written back to the [`Project`].
struct DecodeState<'a> {
    project: &'a Project,
    priorities: &'a [f64],
    tolerances: &'a [f64],
    scheduled: Vec<bool>,
    scheduled_count: usize,
    starts: Vec<Time>,
    finishes: Vec<Option<Time>>,
    finish_times: BTreeSet<Time>,
    eligible: Vec<usize>,
    active: Vec<usize>,
    order: Vec<usize>,
    profile: ResourceProfile,
    decision_time: Time,
    stage: usize,
}

impl<'a> DecodeState<'a> {
    fn new(project: &'a Project, genes: &'a [f64]) -> Self {
        let n = project.job_count();
        let (priorities, tolerances) = genes.split_at(n);

        let mut scheduled = vec![false; n];
        let mut finishes = vec![None; n];
        scheduled[0] = true;
        finishes[0] = Some(0);

        Self {
            project,
            priorities,
            tolerances,
            scheduled,
            scheduled_count: 1,
            starts: vec![0; n],
            finishes,
            finish_times: BTreeSet::from([0]),
            eligible: Vec::with_capacity(n),
            active: Vec::with_capacity(n),
            order: vec![0],
            profile: ResourceProfile::new(project.capacities(), project.horizon()),
            decision_time: 0,
            stage: 0,
        }
    }

    fn run(&mut self) -> Result<(), ScheduleError> {
        let n = self.project.job_count();
        while self.scheduled_count < n {
            self.update_eligible();
            while let Some(job) = self.take_next_eligible() {
                self.place(job)?;
            }
            if self.scheduled_count == n {
                break;
            }

            let next = self
                .finish_times
                .range((Excluded(self.decision_time), Unbounded))
                .next()
                .copied();
            match next {
                Some(t) => self.decision_time = t,
                None => {
                    return Err(ScheduleError::Stalled {
                        scheduled: self.scheduled_count,
                        jobs: n,
                    })
                }
            }
        }
        Ok(())
    }

    /// Rebuilds the eligible set for the current stage and decision time.
    fn update_eligible(&mut self) {
        let threshold = f64::from(self.decision_time) + self.tolerances[self.stage];
        self.eligible.clear();
        for job in 0..self.project.job_count() {
            if self.scheduled[job] {
                continue;
            }
            let ready = self.project.predecessors(job).iter().all(|&p| {
                self.finishes[p].is_some_and(|finish| f64::from(finish) <= threshold)
            });
            if ready {
                self.eligible.push(job);
            }
        }
    }

    /// Removes and returns the eligible job with the smallest priority gene.
    fn take_next_eligible(&mut self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (pos, &job) in self.eligible.iter().enumerate() {
            let priority = self.priorities[job];
            if best.map_or(true, |(_, current)| priority < current) {
                best = Some((pos, priority));
            }
        }
        best.map(|(pos, _)| self.eligible.remove(pos))
    }

    fn place(&mut self, job: usize) -> Result<(), ScheduleError> {
        let project = self.project;
        let duration = project.duration(job);
        let requirement = project.requirement(job);

        // Eligibility guarantees every predecessor has a finish time.
        let ready = project
            .predecessors(job)
            .iter()
            .filter_map(|&p| self.finishes[p])
            .max()
            .unwrap_or(0);

        let start = self
            .profile
            .earliest_fit(ready, duration, requirement)
            .ok_or(ScheduleError::Infeasible {
                job,
                earliest_start: ready,
                horizon: project.horizon(),
            })?;
        let finish = start + duration;

        self.starts[job] = start;
        self.finishes[job] = Some(finish);
        self.scheduled[job] = true;
        self.scheduled_count += 1;
        self.finish_times.insert(finish);
        self.order.push(job);
        self.stage += 1;

        self.update_active();
        log::trace!(
            "stage {}: job {} at [{}, {}), t={}, active={:?}",
            self.stage,
            job,
            start,
            finish,
            self.decision_time,
            self.active
        );

        self.update_eligible();
        self.profile.reserve(start, duration, requirement);
        Ok(())
    }

    /// Jobs whose occupied interval contains the decision time.
    fn update_active(&mut self) {
        let t = self.decision_time;
        self.active.clear();
        for job in 0..self.project.job_count() {
            if let Some(finish) = self.finishes[job] {
                if self.starts[job] <= t && t < finish {
                    self.active.push(job);
                }
            }
        }
    }

    fn into_schedule(self) -> Schedule {
        Schedule {
            starts: self.starts,
            finishes: self.finishes.into_iter().map(|f| f.unwrap_or(0)).collect(),
            order: self.order,
            profile: self.profile,
        }
    }
}

/// SSGS decoder bound to one project.
///
/// Implements [`ChromosomeDecoder`] so the GA runner can evaluate
/// chromosomes against the project.
#[derive(Debug, Clone, Copy)]
pub struct Ssgs<'a> {
    project: &'a Project,
}

impl<'a> Ssgs<'a> {
    pub fn new(project: &'a Project) -> Self {
        Self { project }
    }

    pub fn project(&self) -> &'a Project {
        self.project
    }

    /// Decodes `genes` and returns only the makespan.
    pub fn makespan(&self, genes: &[f64]) -> Result<Time, ScheduleError> {
        decode(self.project, genes).map(|s| s.makespan())
    }
}

impl ChromosomeDecoder for Ssgs<'_> {
    fn job_count(&self) -> usize {
        self.project.job_count()
    }

    fn horizon(&self) -> Time {
        self.project.horizon()
    }

    fn decode(&self, genes: &[f64]) -> Result<Time, ScheduleError> {
        self.makespan(genes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::generate;
    use crate::random::create_rng;
    use proptest::prelude::*;
    use rand::Rng;

    /// source -> A (duration 2) -> sink, one resource of capacity 1.
    fn chain() -> Project {
        Project::new(
            vec![0, 2, 0],
            vec![vec![], vec![0], vec![1]],
            vec![vec![0], vec![1], vec![0]],
            vec![1],
            5,
        )
        .unwrap()
    }

    /// Two unrelated jobs (durations 3 and 4) sharing one unit of capacity.
    fn shared_unit() -> Project {
        Project::new(
            vec![0, 3, 4, 0],
            vec![vec![], vec![0], vec![0], vec![1, 2]],
            vec![vec![0], vec![1], vec![1], vec![0]],
            vec![1],
            10,
        )
        .unwrap()
    }

    fn random_genes(project: &Project, seed: u64) -> Vec<f64> {
        let mut rng = create_rng(seed);
        let n = project.job_count();
        let scale = 1.5 * f64::from(project.horizon());
        (0..2 * n)
            .map(|i| {
                let u: f64 = rng.random();
                if i < n {
                    u
                } else {
                    u * scale
                }
            })
            .collect()
    }

    #[test]
    fn test_chain_makespan() {
        let p = chain();
        let s = decode(&p, &[0.5, 0.1, 0.9, 3.0, 0.0, 7.0]).unwrap();
        assert_eq!(s.makespan(), 2);
        assert_eq!(s.start(1), 0);
        assert_eq!(s.order(), &[0, 1, 2]);
    }

    #[test]
    fn test_shared_unit_serializes() {
        let p = shared_unit();
        let s = decode(&p, &[0.0, 0.1, 0.2, 0.3, 9.0, 9.0, 9.0, 9.0]).unwrap();
        assert_eq!(s.makespan(), 7);
        assert_eq!((s.start(1), s.start(2)), (0, 3));
    }

    #[test]
    fn test_smallest_priority_goes_first() {
        let p = shared_unit();
        let s = decode(&p, &[0.0, 0.8, 0.2, 0.3, 9.0, 9.0, 9.0, 9.0]).unwrap();
        assert_eq!(s.makespan(), 7);
        assert_eq!((s.start(2), s.start(1)), (0, 4));
        assert_eq!(s.order(), &[0, 2, 1, 3]);
    }

    #[test]
    fn test_priority_tie_goes_to_lower_index() {
        let p = shared_unit();
        let s = decode(&p, &[0.0, 0.5, 0.5, 0.3, 9.0, 9.0, 9.0, 9.0]).unwrap();
        assert_eq!(s.order(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_tolerance_changes_decision_order() {
        // A (2, no resource) -> B (3, 1 unit); C (3, 1 unit) is independent.
        let p = Project::new(
            vec![0, 2, 3, 3, 0],
            vec![vec![], vec![0], vec![1], vec![0], vec![2, 3]],
            vec![vec![0], vec![0], vec![1], vec![1], vec![0]],
            vec![1],
            20,
        )
        .unwrap();
        let priorities = [0.0, 0.1, 0.2, 0.9, 0.95];

        // Large tolerance: B becomes eligible as soon as A is placed and
        // takes the resource first.
        let mut loose = priorities.to_vec();
        loose.extend([100.0; 5]);
        let s = decode(&p, &loose).unwrap();
        assert_eq!(s.order(), &[0, 1, 2, 3, 4]);
        assert_eq!(s.makespan(), 8);

        // Zero tolerance: B waits for decision time 2, C goes first.
        let mut strict = priorities.to_vec();
        strict.extend([0.0; 5]);
        let s = decode(&p, &strict).unwrap();
        assert_eq!(s.order(), &[0, 1, 3, 2, 4]);
        assert_eq!(s.start(2), 3);
        assert_eq!(s.makespan(), 6);
    }

    #[test]
    fn test_infeasible_when_horizon_too_short() {
        let p = Project::new(
            vec![0, 3, 4, 0],
            vec![vec![], vec![0], vec![0], vec![1, 2]],
            vec![vec![0], vec![1], vec![1], vec![0]],
            vec![1],
            5,
        )
        .unwrap();
        let err = decode(&p, &[0.0, 0.1, 0.2, 0.3, 9.0, 9.0, 9.0, 9.0]).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::Infeasible {
                job: 2,
                earliest_start: 0,
                horizon: 5
            }
        );
    }

    #[test]
    fn test_negative_tolerance_stalls() {
        let p = chain();
        let err = decode(&p, &[0.0, 0.1, 0.2, -1.0, -1.0, -1.0]).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::Stalled {
                scheduled: 1,
                jobs: 3
            }
        );
    }

    #[test]
    fn test_wrong_gene_length() {
        let p = chain();
        let err = decode(&p, &[0.0; 5]).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::GeneLength {
                expected: 6,
                found: 5
            }
        );
    }

    #[test]
    fn test_single_job_project() {
        let p = Project::new(vec![0], vec![vec![]], vec![vec![]], vec![], 1).unwrap();
        assert_eq!(decode(&p, &[0.3, 1.0]).unwrap().makespan(), 0);
    }

    #[test]
    fn test_decoder_trait() {
        let p = shared_unit();
        let ssgs = Ssgs::new(&p);
        assert_eq!(ssgs.job_count(), 4);
        assert_eq!(ChromosomeDecoder::horizon(&ssgs), 10);
        let genes = random_genes(&p, 3);
        assert_eq!(ChromosomeDecoder::decode(&ssgs, &genes), Ok(7));
    }

    #[test]
    fn test_generated_instances_decode_feasibly() {
        for seed in 0..20 {
            let p = generate(25, 3, seed).unwrap();
            let genes = random_genes(&p, seed + 100);
            let s = decode(&p, &genes).unwrap();
            assert!(s.violations(&p).is_empty(), "seed {seed}");
            assert!(s.makespan() >= p.critical_path_length());
        }
    }

    proptest! {
        #[test]
        fn prop_chain_makespan_independent_of_genes(
            genes in proptest::collection::vec(0.0f64..1.0, 3),
            tolerances in proptest::collection::vec(0.0f64..10.0, 3),
        ) {
            let mut all = genes;
            all.extend(tolerances);
            prop_assert_eq!(decode(&chain(), &all).unwrap().makespan(), 2);
        }

        #[test]
        fn prop_shared_unit_makespan_is_seven(
            genes in proptest::collection::vec(0.0f64..1.0, 4),
            tolerances in proptest::collection::vec(0.0f64..15.0, 4),
        ) {
            let mut all = genes;
            all.extend(tolerances);
            prop_assert_eq!(decode(&shared_unit(), &all).unwrap().makespan(), 7);
        }

        #[test]
        fn prop_decoding_is_deterministic_and_feasible(
            instance_seed in 0u64..1000,
            gene_seed in any::<u64>(),
        ) {
            let p = generate(15, 2, instance_seed).unwrap();
            let genes = random_genes(&p, gene_seed);
            let first = decode(&p, &genes).unwrap();
            let second = decode(&p, &genes).unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert!(first.makespan() >= p.critical_path_length());
            prop_assert!(first.profile().min_remaining().unwrap_or(0) >= 0);
            prop_assert!(first.violations(&p).is_empty());
        }
    }
}
