//! Parallel evaluation of every off-diagonal `P_ij(t)` on the time grid.
//!
//! Pairs of one time point are spread over the current rayon pool. Each worker
//! folds into its own `TimeSlice` and the partial slices are combined with a
//! single reduce, so a time point is fully assembled before it reaches the sink.
//! Row order inside a slice is unspecified.

use rayon::ThreadPool;
use rayon::prelude::*;
use smp_model::{ModelResult, SemiMarkovProcess};
use smp_quad::Integrator;
use smp_results::{ResultRow, ResultSink, TimeSlice};
use tracing::{debug, warn};

use crate::error::AppResult;
use crate::grid::TimeGrid;
use crate::progress::GridProgress;

/// Ordered pairs `(i, j)` with `i != j`.
pub fn state_pairs(states: usize) -> Vec<(usize, usize)> {
    (0..states)
        .flat_map(|i| (0..states).filter(move |&j| j != i).map(move |j| (i, j)))
        .collect()
}

/// Evaluate all off-diagonal pairs at time `t`.
///
/// Only strictly positive probabilities become rows; the rest are counted.
pub fn evaluate_time_point<I>(
    model: &SemiMarkovProcess<I>,
    t: f64,
    tol: f64,
) -> ModelResult<TimeSlice>
where
    I: Integrator + Sync,
{
    state_pairs(model.states())
        .par_iter()
        .try_fold(
            || TimeSlice::empty(t),
            |mut slice, &(from, to)| -> ModelResult<TimeSlice> {
                let evaluation = model.evaluate(from, to, t, tol)?;
                if !evaluation.quadrature.converged() {
                    slice.unconverged += 1;
                }
                if evaluation.probability > 0.0 {
                    slice.rows.push(ResultRow {
                        time: t,
                        from,
                        to,
                        probability: evaluation.probability,
                    });
                } else {
                    slice.dropped_non_positive += 1;
                }
                Ok(slice)
            },
        )
        .try_reduce(|| TimeSlice::empty(t), |a, b| Ok(a.merge(b)))
}

/// Totals over a whole grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridOutcome {
    pub time_points: usize,
    pub pair_evaluations: usize,
    pub rows_written: usize,
    pub dropped_non_positive: usize,
    pub unconverged_evaluations: usize,
}

/// Evaluate the grid in ascending time order, handing each slice to `sink`
/// before the next time point starts.
///
/// Pairs run on `pool` when given, otherwise on the global rayon pool. The
/// sink and `on_progress` are only touched from the calling thread.
pub fn evaluate_grid<I>(
    model: &SemiMarkovProcess<I>,
    grid: &TimeGrid,
    tol: f64,
    pool: Option<&ThreadPool>,
    sink: &mut dyn ResultSink,
    mut on_progress: impl FnMut(GridProgress),
) -> AppResult<GridOutcome>
where
    I: Integrator + Sync,
{
    let mut outcome = GridOutcome::default();
    let time_points = grid.point_count();

    for (index, t) in grid.iter().enumerate() {
        let slice = match pool {
            Some(pool) => pool.install(|| evaluate_time_point(model, t, tol)),
            None => evaluate_time_point(model, t, tol),
        }?;
        if slice.unconverged > 0 {
            warn!(
                t,
                unconverged = slice.unconverged,
                "quadrature stopped at a depth or width bound"
            );
        }
        debug!(
            t,
            rows = slice.rows.len(),
            dropped = slice.dropped_non_positive,
            "time point evaluated"
        );
        sink.write_slice(&slice)?;

        outcome.time_points += 1;
        outcome.pair_evaluations += slice.evaluated();
        outcome.rows_written += slice.rows.len();
        outcome.dropped_non_positive += slice.dropped_non_positive;
        outcome.unconverged_evaluations += slice.unconverged;

        on_progress(GridProgress {
            time: t,
            t_max: grid.last(),
            index,
            time_points,
            fraction_complete: (index + 1) as f64 / time_points as f64,
            rows_written: outcome.rows_written,
        });
    }

    sink.finish()?;
    Ok(outcome)
}
