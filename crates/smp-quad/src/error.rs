//! Error types for quadrature.

use smp_core::SmpError;
use thiserror::Error;

/// Errors raised before any integrand evaluation takes place.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuadError {
    #[error("Invalid tolerance: {0}")]
    Tolerance(SmpError),

    #[error("Invalid integration bound: {0}")]
    Bound(SmpError),

    #[error("Invalid quadrature options: {what}")]
    Options { what: &'static str },
}

pub type QuadResult<T> = Result<T, QuadError>;
