//! Adaptive numerical integration for the semi-Markov engine.
//!
//! Provides:
//! - A 7-point Gauss / 15-point Kronrod rule pair evaluated on one interval
//! - Bounded adaptive bisection driven by the Kronrod-Gauss difference
//! - An `Integrator` trait so callers can stay generic over the rule

pub mod adaptive;
pub mod error;
pub mod rule;

pub use adaptive::{AdaptiveGaussKronrod, Integrator, MAX_DEPTH_LIMIT, QuadOptions, Quadrature};
pub use error::{QuadError, QuadResult};
pub use rule::{RuleEstimate, gauss_kronrod_15};
