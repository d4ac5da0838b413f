//! Uniform evaluation grid `0, dt, 2·dt, …` up to `t_max`.

use crate::error::{AppError, AppResult};

/// Round-off, in multiples of machine epsilon relative to `max(t_max, dt)`,
/// within which `(n + 1)·dt` still counts as reaching `t_max`.
const ROUND_OFF_ULPS: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeGrid {
    time_step: f64,
    steps: usize,
}

impl TimeGrid {
    pub fn new(t_max: f64, time_step: f64) -> AppResult<Self> {
        if !t_max.is_finite() || t_max < 0.0 {
            return Err(AppError::InvalidInput(format!(
                "t_max must be finite and non-negative, got {t_max}"
            )));
        }
        if !time_step.is_finite() || time_step <= 0.0 {
            return Err(AppError::InvalidInput(format!(
                "time_step must be finite and positive, got {time_step}"
            )));
        }
        let ratio = t_max / time_step;
        let mut steps = ratio.floor();
        // 0.3 / 0.1 == 2.9999999999999996, yet 3 * 0.1 lands on 0.3 up to round-off.
        let next = (steps + 1.0) * time_step;
        if next - t_max <= ROUND_OFF_ULPS * f64::EPSILON * t_max.max(time_step) {
            steps += 1.0;
        }
        if steps >= usize::MAX as f64 {
            return Err(AppError::InvalidInput(format!(
                "t_max / time_step = {ratio} is too many time points"
            )));
        }
        Ok(Self {
            time_step,
            steps: steps as usize,
        })
    }

    /// Number of time points, including `t = 0`.
    pub fn point_count(&self) -> usize {
        self.steps + 1
    }

    /// `k · dt`, computed by multiplication so error does not accumulate.
    pub fn time(&self, k: usize) -> f64 {
        k as f64 * self.time_step
    }

    pub fn last(&self) -> f64 {
        self.time(self.steps)
    }

    /// Time points in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.point_count()).map(|k| self.time(k))
    }
}
