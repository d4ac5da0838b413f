//! Error types for the smp-app service layer.

use std::path::PathBuf;

/// Application error wrapping the backend crates' errors for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Edge {from} -> {to}: {message}")]
    Edge {
        from: usize,
        to: usize,
        message: String,
    },

    #[error("Results error: {0}")]
    Results(String),

    #[error("Failed to write output {}: {message}", .path.display())]
    Output { path: PathBuf, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

/// Result type for smp-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<smp_project::ProjectError> for AppError {
    fn from(err: smp_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<smp_model::ModelError> for AppError {
    fn from(err: smp_model::ModelError) -> Self {
        AppError::Model(err.to_string())
    }
}

impl From<smp_quad::QuadError> for AppError {
    fn from(err: smp_quad::QuadError) -> Self {
        AppError::Model(err.to_string())
    }
}

impl From<smp_results::ResultsError> for AppError {
    fn from(err: smp_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}

impl From<rayon::ThreadPoolBuildError> for AppError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        AppError::ThreadPool(err.to_string())
    }
}
