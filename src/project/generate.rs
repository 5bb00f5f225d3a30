//! Random synthetic instances.

use rand::Rng;

use super::model::{Project, Time};
use crate::error::ConfigError;
use crate::random::create_rng;

/// Generates a random feasible project.
///
/// `jobs` counts the real jobs; a source and a sink are added around them,
/// so the result has `jobs + 2` entries. Each real job depends on up to two
/// earlier jobs (or the source), runs for 1–10 time units and requests at
/// most the capacity of every resource. Jobs without successors feed the
/// sink. The horizon is the sum of all durations, which is always enough
/// for a serial schedule to fit.
///
/// # Errors
///
/// Only fails if the generated model is rejected, which the construction
/// rules out; the `Result` mirrors [`Project::new`].
pub fn generate(jobs: usize, resources: usize, seed: u64) -> Result<Project, ConfigError> {
    let mut rng = create_rng(seed);
    let n = jobs + 2;
    let sink = n - 1;

    let capacities: Vec<u32> = (0..resources).map(|_| rng.random_range(4..=10)).collect();

    let mut durations: Vec<Time> = vec![0; n];
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut requirements: Vec<Vec<u32>> = vec![vec![0; resources]; n];
    let mut has_successor = vec![false; n];

    for job in 1..sink {
        durations[job] = rng.random_range(1..=10);
        requirements[job] = capacities
            .iter()
            .map(|&cap| rng.random_range(0..=cap))
            .collect();

        let pred_count = if job == 1 { 0 } else { rng.random_range(0..=2) };
        for _ in 0..pred_count {
            let p = rng.random_range(1..job);
            if !predecessors[job].contains(&p) {
                predecessors[job].push(p);
                has_successor[p] = true;
            }
        }
        if predecessors[job].is_empty() {
            predecessors[job].push(0);
            has_successor[0] = true;
        }
    }

    predecessors[sink] = (0..sink).filter(|&j| !has_successor[j]).collect();

    let horizon: Time = durations.iter().sum::<Time>().max(1);

    Project::new(durations, predecessors, requirements, capacities, horizon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_shape() {
        let p = generate(30, 4, 1).unwrap();
        assert_eq!(p.job_count(), 32);
        assert_eq!(p.resource_count(), 4);
        assert_eq!(p.duration(0), 0);
        assert_eq!(p.duration(p.sink()), 0);
        assert!(p.critical_path_length() <= p.horizon());
        for job in 1..p.sink() {
            assert!(!p.predecessors(job).is_empty());
            for (r, &req) in p.requirement(job).iter().enumerate() {
                assert!(req <= p.capacities()[r]);
            }
        }
    }

    #[test]
    fn test_generate_deterministic() {
        assert_eq!(generate(20, 2, 9).unwrap(), generate(20, 2, 9).unwrap());
    }

    #[test]
    fn test_generate_empty() {
        let p = generate(0, 1, 3).unwrap();
        assert_eq!(p.job_count(), 2);
        assert_eq!(p.predecessors(1), &[0]);
    }
}
