//! Run execution service.

use std::path::{Path, PathBuf};
use std::time::Instant;

use smp_results::{CsvSink, RunManifest, compute_run_id};
use tracing::{info, info_span};

use crate::error::{AppError, AppResult};
use crate::evaluate::evaluate_grid;
use crate::grid::TimeGrid;
use crate::progress::{GridProgress, RunProgressEvent, RunStage};
use crate::project_service;

/// Version recorded in manifests and mixed into run ids.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Overrides applied on top of the configuration file.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub output: Option<PathBuf>,
    pub threads: Option<usize>,
}

/// Request to execute a run.
pub struct RunRequest<'a> {
    pub config_path: &'a Path,
    pub options: RunOptions,
}

#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub load_time_s: f64,
    pub build_time_s: f64,
    pub evaluate_time_s: f64,
    pub manifest_time_s: f64,
    pub total_time_s: f64,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: String,
    pub output_path: PathBuf,
    pub manifest_path: Option<PathBuf>,
    pub states: usize,
    pub threads: usize,
    pub time_points: usize,
    pub pair_evaluations: usize,
    pub rows_written: usize,
    pub dropped_non_positive: usize,
    pub unconverged_evaluations: usize,
    pub timing: RunTimingSummary,
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    stage: RunStage,
    started: Instant,
    message: Option<String>,
    grid: Option<GridProgress>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent {
            stage,
            elapsed_wall_s: started.elapsed().as_secs_f64(),
            message,
            grid,
        });
    }
}

/// Execute a run.
pub fn run(request: &RunRequest) -> AppResult<RunSummary> {
    run_with_progress(request, None)
}

/// Execute a run, reporting each stage and every finished time point to `progress_cb`.
pub fn run_with_progress(
    request: &RunRequest,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunSummary> {
    let started = Instant::now();
    let _span = info_span!("run", config = %request.config_path.display()).entered();
    let mut timing = RunTimingSummary::default();

    emit_progress(&mut progress_cb, RunStage::LoadingInputs, started, None, None);
    let load_started = Instant::now();
    let inputs = project_service::load_inputs(request.config_path)?;
    let grid = TimeGrid::new(inputs.config.t_max, inputs.config.time_step)?;
    timing.load_time_s = load_started.elapsed().as_secs_f64();

    emit_progress(&mut progress_cb, RunStage::BuildingModel, started, None, None);
    let build_started = Instant::now();
    let model = project_service::build_process(&inputs)?;
    let threads = request.options.threads.or(inputs.config.threads);
    let pool = match threads {
        Some(0) => {
            return Err(AppError::InvalidInput(
                "thread count must be at least 1".to_string(),
            ));
        }
        Some(n) => Some(rayon::ThreadPoolBuilder::new().num_threads(n).build()?),
        None => None,
    };
    let worker_count = pool
        .as_ref()
        .map_or_else(rayon::current_num_threads, |p| p.current_num_threads());
    timing.build_time_s = build_started.elapsed().as_secs_f64();

    let output_path = request
        .options
        .output
        .clone()
        .unwrap_or_else(|| inputs.output_path());
    emit_progress(
        &mut progress_cb,
        RunStage::OpeningOutput,
        started,
        Some(output_path.display().to_string()),
        None,
    );
    let mut sink = CsvSink::create(&output_path).map_err(|e| AppError::Output {
        path: output_path.clone(),
        message: e.to_string(),
    })?;

    info!(
        states = model.states(),
        transitions = model.transition_count(),
        time_points = grid.point_count(),
        threads = worker_count,
        tol = inputs.config.tol,
        "starting evaluation"
    );
    emit_progress(&mut progress_cb, RunStage::Evaluating, started, None, None);
    let evaluate_started = Instant::now();
    let tol = inputs.config.tol;
    let outcome = evaluate_grid(&model, &grid, tol, pool.as_ref(), &mut sink, |progress| {
        emit_progress(
            &mut progress_cb,
            RunStage::Evaluating,
            started,
            None,
            Some(progress),
        );
    })?;
    timing.evaluate_time_s = evaluate_started.elapsed().as_secs_f64();

    let run_id = compute_run_id(&inputs, ENGINE_VERSION);
    let manifest_path = inputs.manifest_path();
    if let Some(path) = &manifest_path {
        emit_progress(
            &mut progress_cb,
            RunStage::WritingManifest,
            started,
            Some(path.display().to_string()),
            None,
        );
        let manifest_started = Instant::now();
        let manifest = RunManifest {
            run_id: run_id.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            engine_version: ENGINE_VERSION.to_string(),
            states: inputs.config.states,
            t_max: inputs.config.t_max,
            time_step: inputs.config.time_step,
            tol,
            time_points: outcome.time_points,
            rows_written: outcome.rows_written,
            dropped_non_positive: outcome.dropped_non_positive,
            unconverged_evaluations: outcome.unconverged_evaluations,
            output_file: output_path.display().to_string(),
        };
        manifest.save(path)?;
        timing.manifest_time_s = manifest_started.elapsed().as_secs_f64();
    }

    timing.total_time_s = started.elapsed().as_secs_f64();
    emit_progress(&mut progress_cb, RunStage::Completed, started, None, None);
    info!(
        run_id = %run_id,
        rows = outcome.rows_written,
        dropped = outcome.dropped_non_positive,
        unconverged = outcome.unconverged_evaluations,
        elapsed_s = timing.total_time_s,
        "run complete"
    );

    Ok(RunSummary {
        run_id,
        output_path,
        manifest_path,
        states: inputs.config.states,
        threads: worker_count,
        time_points: outcome.time_points,
        pair_evaluations: outcome.pair_evaluations,
        rows_written: outcome.rows_written,
        dropped_non_positive: outcome.dropped_non_positive,
        unconverged_evaluations: outcome.unconverged_evaluations,
        timing,
    })
}
