//! Content-based hashing for run IDs.

use sha2::{Digest, Sha256};
use smp_project::ProjectInputs;

/// SHA-256 over the configuration, both tables and the engine version.
pub fn compute_run_id(inputs: &ProjectInputs, engine_version: &str) -> String {
    let mut hasher = Sha256::new();

    let config_json = serde_json::to_string(&inputs.config).unwrap_or_default();
    hasher.update(config_json.as_bytes());

    let edges_json = serde_json::to_string(&inputs.edges).unwrap_or_default();
    hasher.update(edges_json.as_bytes());

    let initial_json = serde_json::to_string(&inputs.initial).unwrap_or_default();
    hasher.update(initial_json.as_bytes());

    hasher.update(engine_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
