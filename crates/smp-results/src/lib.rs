//! smp-results: transition-probability rows, output sinks and run manifests.

pub mod hash;
pub mod sink;
pub mod types;

pub use hash::compute_run_id;
pub use sink::{CSV_HEADER, CsvSink, MemorySink, ResultSink};
pub use types::*;

use std::path::PathBuf;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("Failed to create output file {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
