//! Semi-Markov process model.
//!
//! Provides:
//! - Sojourn-time distributions as a closed set of CDF variants
//! - Per-edge transitions (distribution + embedded-chain probability)
//! - The process model and its renewal-type transition-probability integral

pub mod distribution;
pub mod error;
pub mod process;
pub mod transition;

pub use distribution::{CdfPoint, MixtureComponent, SojournDistribution};
pub use error::{ModelError, ModelResult};
pub use process::{Evaluation, SemiMarkovProcess};
pub use transition::Transition;
