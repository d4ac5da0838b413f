//! smp-core: shared foundation for the semi-Markov engine.
//!
//! Contains:
//! - numeric (Real + argument checks)
//! - error (shared error types)

pub mod error;
pub mod numeric;

pub use error::{SmpError, SmpResult};
pub use numeric::*;
