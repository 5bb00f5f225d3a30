//! Schedule generation.
//!
//! Turns a priority/tolerance chromosome into a concrete schedule with the
//! serial schedule generation scheme ([`decode`], [`Ssgs`]). The
//! [`ResourceProfile`] tracks remaining capacity per time unit and
//! [`Schedule::violations`] re-checks a finished schedule independently.

mod profile;
mod ssgs;
mod types;

pub use profile::ResourceProfile;
pub use ssgs::{decode, Ssgs};
pub use types::{Schedule, ScheduleError, Violation};
