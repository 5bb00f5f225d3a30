//! Project model: the immutable RCPSP instance.
//!
//! - [`Project`]: validated jobs, precedences, requirements and capacities
//! - [`load_instance`] / [`parse_instance`]: JSON instance documents
//! - [`generate`]: random synthetic instances for benchmarks and demos

mod generate;
mod instance;
mod model;

pub use generate::generate;
pub use instance::{load_instance, parse_instance};
pub use model::{Project, Time, MAX_PROFILE_CELLS};
