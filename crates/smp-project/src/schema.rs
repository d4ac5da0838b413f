//! Run configuration schema.

use serde::{Deserialize, Serialize};
use smp_model::SojournDistribution;
use smp_quad::QuadOptions;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_FILE: &str = "transition_probabilities.csv";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub states: usize,
    pub t_max: f64,
    pub time_step: f64,
    pub tol: f64,
    pub transition_file: PathBuf,
    pub initial_file: PathBuf,
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
    #[serde(default)]
    pub quadrature: QuadOptions,
    /// Distribution applied to every edge without an override. When absent,
    /// each edge gets an exponential whose rate is the edge's probability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sojourn: Option<SojournDistribution>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edge_distributions: Vec<EdgeDistributionDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EdgeDistributionDef {
    pub from: usize,
    pub to: usize,
    pub distribution: SojournDistribution,
}

fn default_output_file() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_FILE)
}

impl RunConfig {
    /// Distribution for edge `from -> to` with embedded probability `probability`.
    pub fn distribution_for(&self, from: usize, to: usize, probability: f64) -> SojournDistribution {
        if let Some(def) = self
            .edge_distributions
            .iter()
            .find(|d| d.from == from && d.to == to)
        {
            return def.distribution.clone();
        }
        match &self.sojourn {
            Some(distribution) => distribution.clone(),
            None => SojournDistribution::exponential(probability),
        }
    }
}

/// Resolve `path` against `base_dir` unless it is already absolute.
pub fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
