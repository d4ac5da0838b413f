//! Shared application service layer for semiflow.
//!
//! Loads a run configuration, builds the process model, drives the
//! evaluation grid on a rayon pool and streams each time point to a sink.

pub mod error;
pub mod evaluate;
pub mod grid;
pub mod progress;
pub mod project_service;
pub mod run_service;

pub use error::{AppError, AppResult};
pub use evaluate::{GridOutcome, evaluate_grid, evaluate_time_point, state_pairs};
pub use grid::TimeGrid;
pub use progress::{GridProgress, RunProgressEvent, RunStage};
pub use project_service::{InputSummary, build_process, load_inputs, validate_inputs};
pub use run_service::{
    ENGINE_VERSION, RunOptions, RunRequest, RunSummary, RunTimingSummary, run, run_with_progress,
};
