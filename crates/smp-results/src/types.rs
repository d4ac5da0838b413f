//! Result data types.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{ResultsError, ResultsResult};

/// One `(t, i, j, P_ij(t))` output row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub time: f64,
    pub from: usize,
    pub to: usize,
    pub probability: f64,
}

/// All retained rows for one time point, in no particular pair order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSlice {
    pub time: f64,
    pub rows: Vec<ResultRow>,
    /// Pairs whose probability was zero or negative and therefore not retained.
    pub dropped_non_positive: usize,
    /// Pairs whose integration stopped at a depth or width bound.
    pub unconverged: usize,
}

impl TimeSlice {
    pub fn empty(time: f64) -> Self {
        Self {
            time,
            ..Self::default()
        }
    }

    /// Combine two partial slices of the same time point.
    pub fn merge(mut self, other: Self) -> Self {
        self.rows.extend(other.rows);
        self.dropped_non_positive += other.dropped_non_positive;
        self.unconverged += other.unconverged;
        self
    }

    /// Pairs evaluated to build this slice.
    pub fn evaluated(&self) -> usize {
        self.rows.len() + self.dropped_non_positive
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: String,
    pub timestamp: String,
    pub engine_version: String,
    pub states: usize,
    pub t_max: f64,
    pub time_step: f64,
    pub tol: f64,
    pub time_points: usize,
    pub rows_written: usize,
    pub dropped_non_positive: usize,
    pub unconverged_evaluations: usize,
    pub output_file: String,
}

impl RunManifest {
    pub fn save(&self, path: &Path) -> ResultsResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ResultsError::Create {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> ResultsResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
