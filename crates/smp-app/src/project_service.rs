//! Input loading, model construction and dry-run validation.

use std::path::{Path, PathBuf};

use smp_model::SemiMarkovProcess;
use smp_project::ProjectInputs;
use smp_quad::AdaptiveGaussKronrod;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::grid::TimeGrid;

/// What a configuration would run, without evaluating anything.
#[derive(Debug, Clone)]
pub struct InputSummary {
    pub states: usize,
    pub edges: usize,
    pub transitions: usize,
    pub time_points: usize,
    pub tol: f64,
    pub output_path: PathBuf,
    pub manifest_path: Option<PathBuf>,
}

/// Load the configuration at `path` and both tables it names.
pub fn load_inputs(path: &Path) -> AppResult<ProjectInputs> {
    Ok(smp_project::load_inputs(path)?)
}

/// Build the process model described by `inputs`.
///
/// Edge rows are applied in file order, so a repeated `(from, to)` pair keeps
/// its last row.
pub fn build_process(inputs: &ProjectInputs) -> AppResult<SemiMarkovProcess> {
    let config = &inputs.config;
    let integrator = AdaptiveGaussKronrod::new(config.quadrature)?;
    let mut smp = SemiMarkovProcess::with_integrator(config.states, integrator);

    for edge in &inputs.edges {
        if smp.transition(edge.from, edge.to).is_some() {
            warn!(
                from = edge.from,
                to = edge.to,
                "edge listed more than once; keeping the later row"
            );
        }
        let distribution = config.distribution_for(edge.from, edge.to, edge.probability);
        smp.add_transition(edge.from, edge.to, distribution, edge.probability)
            .map_err(|e| AppError::Edge {
                from: edge.from,
                to: edge.to,
                message: e.to_string(),
            })?;
    }
    smp.set_initial_rows(&inputs.initial)?;

    debug!(
        states = smp.states(),
        transitions = smp.transition_count(),
        "process model built"
    );
    Ok(smp)
}

/// Load and build everything a run needs, then report what it would do.
pub fn validate_inputs(path: &Path) -> AppResult<InputSummary> {
    let inputs = load_inputs(path)?;
    let smp = build_process(&inputs)?;
    let grid = TimeGrid::new(inputs.config.t_max, inputs.config.time_step)?;

    Ok(InputSummary {
        states: smp.states(),
        edges: inputs.edges.len(),
        transitions: smp.transition_count(),
        time_points: grid.point_count(),
        tol: inputs.config.tol,
        output_path: inputs.output_path(),
        manifest_path: inputs.manifest_path(),
    })
}
