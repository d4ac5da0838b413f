//! Error types for model setup and queries.

use smp_core::SmpError;
use smp_quad::QuadError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error(transparent)]
    Core(#[from] SmpError),

    #[error("Quadrature error: {0}")]
    Quad(#[from] QuadError),

    #[error("Initial probability matrix is {rows}x{cols}, expected {states}x{states}")]
    InitialShape {
        rows: usize,
        cols: usize,
        states: usize,
    },

    #[error("Invalid sojourn distribution: {what}")]
    Distribution { what: String },
}

pub type ModelResult<T> = Result<T, ModelError>;
