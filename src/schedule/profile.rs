//! Time-indexed renewable resource profile.

use serde::Serialize;

use crate::project::Time;

/// Remaining capacity per resource type for every time unit of the horizon.
///
/// Stored row-major: one row per time unit, one column per resource.
/// A job starting at `s` with duration `d` occupies the units `s..s + d`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceProfile {
    resources: usize,
    horizon: Time,
    remaining: Vec<i64>,
}

impl ResourceProfile {
    /// Creates a profile with full capacity at every time unit.
    pub fn new(capacities: &[u32], horizon: Time) -> Self {
        let resources = capacities.len();
        let mut remaining = Vec::with_capacity(resources * horizon as usize);
        for _ in 0..horizon {
            remaining.extend(capacities.iter().map(|&c| i64::from(c)));
        }
        Self {
            resources,
            horizon,
            remaining,
        }
    }

    pub fn horizon(&self) -> Time {
        self.horizon
    }

    /// Remaining capacity of `resource` at time unit `time`.
    ///
    /// # Panics
    /// Panics if `time >= horizon` or `resource` is out of range.
    pub fn remaining(&self, time: Time, resource: usize) -> i64 {
        assert!(resource < self.resources, "resource index out of range");
        self.remaining[time as usize * self.resources + resource]
    }

    /// Whether a job with `requirement` fits in `start..start + duration`.
    pub fn fits(&self, start: Time, duration: Time, requirement: &[u32]) -> bool {
        let Some(end) = start.checked_add(duration) else {
            return false;
        };
        if end > self.horizon {
            return false;
        }
        (start..end).all(|t| {
            let row = t as usize * self.resources;
            requirement
                .iter()
                .zip(&self.remaining[row..row + self.resources])
                .all(|(&req, &left)| i64::from(req) <= left)
        })
    }

    /// Earliest start at or after `from` where the job fits.
    ///
    /// Scans forward one time unit at a time. Returns `None` once the
    /// occupied interval would run past the horizon.
    pub fn earliest_fit(&self, from: Time, duration: Time, requirement: &[u32]) -> Option<Time> {
        let last_start = self.horizon.checked_sub(duration)?;
        (from..=last_start).find(|&start| self.fits(start, duration, requirement))
    }

    /// Deducts `requirement` from every unit in `start..start + duration`.
    ///
    /// Callers check [`fits`](Self::fits) first; the profile itself does not
    /// refuse overbooking.
    pub fn reserve(&mut self, start: Time, duration: Time, requirement: &[u32]) {
        for t in start..start + duration {
            let row = t as usize * self.resources;
            for (left, &req) in self.remaining[row..row + self.resources]
                .iter_mut()
                .zip(requirement)
            {
                *left -= i64::from(req);
            }
        }
    }

    /// Smallest remaining capacity over all time units and resources.
    ///
    /// `None` when the profile is empty (no resources).
    pub fn min_remaining(&self) -> Option<i64> {
        self.remaining.iter().copied().min()
    }
}
