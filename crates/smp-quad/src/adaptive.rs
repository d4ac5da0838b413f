//! Adaptive bisection on top of the G7/K15 rule pair.
//!
//! Each interval is accepted when `|K15 - G7| < tol`; otherwise it is split at
//! the midpoint and both halves are integrated with `tol / 2`. Recursion is
//! bounded by `QuadOptions`: an interval that reaches `max_depth`, or whose
//! width drops to `min_width` (relative to the whole interval), accepts its
//! Kronrod estimate as best effort and is reported as unconverged.

use serde::{Deserialize, Serialize};
use smp_core::{Real, ensure_finite, ensure_positive};

use crate::error::{QuadError, QuadResult};
use crate::rule::gauss_kronrod_15;

/// Largest accepted `max_depth`; bounds the recursion stack whatever `min_width` is.
pub const MAX_DEPTH_LIMIT: usize = 64;

/// Termination bounds for adaptive integration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuadOptions {
    /// Maximum bisection depth below the whole interval.
    pub max_depth: usize,
    /// Smallest subinterval width, as a fraction of `|b - a|`.
    pub min_width: Real,
}

impl Default for QuadOptions {
    fn default() -> Self {
        Self {
            max_depth: 48,
            min_width: 1e-12,
        }
    }
}

impl QuadOptions {
    pub fn validate(&self) -> QuadResult<()> {
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(QuadError::Options {
                what: "max_depth must be at most 64",
            });
        }
        if !self.min_width.is_finite() || self.min_width < 0.0 {
            return Err(QuadError::Options {
                what: "min_width must be finite and non-negative",
            });
        }
        Ok(())
    }
}

/// Outcome of one adaptive integration.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Quadrature {
    /// Integral estimate.
    pub value: Real,
    /// Sum of the accepted intervals' `|K15 - G7|` indicators.
    pub error_estimate: Real,
    /// Number of integrand evaluations.
    pub evaluations: usize,
    /// Number of accepted (leaf) intervals.
    pub intervals: usize,
    /// Leaves accepted at a depth or width bound without meeting their tolerance.
    pub unconverged_intervals: usize,
    /// Deepest bisection level visited.
    pub max_depth_reached: usize,
}

impl Quadrature {
    /// True when every leaf met its local tolerance.
    pub fn converged(&self) -> bool {
        self.unconverged_intervals == 0
    }

    fn merge(self, other: Self) -> Self {
        Self {
            value: self.value + other.value,
            error_estimate: self.error_estimate + other.error_estimate,
            evaluations: self.evaluations + other.evaluations,
            intervals: self.intervals + other.intervals,
            unconverged_intervals: self.unconverged_intervals + other.unconverged_intervals,
            max_depth_reached: self.max_depth_reached.max(other.max_depth_reached),
        }
    }

    fn negated(self) -> Self {
        Self {
            value: -self.value,
            ..self
        }
    }
}

/// Trait for scalar integrators over a closed interval.
pub trait Integrator {
    /// Approximate the integral of `f` over `[a, b]` to absolute tolerance `tol`.
    fn integrate<F>(&self, f: F, a: Real, b: Real, tol: Real) -> QuadResult<Quadrature>
    where
        F: Fn(Real) -> Real;
}

/// Recursive adaptive Gauss-Kronrod integration with bounded depth and width.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AdaptiveGaussKronrod {
    pub options: QuadOptions,
}

impl AdaptiveGaussKronrod {
    pub fn new(options: QuadOptions) -> QuadResult<Self> {
        options.validate()?;
        Ok(Self { options })
    }
}

impl Integrator for AdaptiveGaussKronrod {
    fn integrate<F>(&self, f: F, a: Real, b: Real, tol: Real) -> QuadResult<Quadrature>
    where
        F: Fn(Real) -> Real,
    {
        ensure_positive(tol, "tolerance").map_err(QuadError::Tolerance)?;
        ensure_finite(a, "lower bound").map_err(QuadError::Bound)?;
        ensure_finite(b, "upper bound").map_err(QuadError::Bound)?;
        self.options.validate()?;

        if a == b {
            return Ok(Quadrature::default());
        }
        if a > b {
            return self.integrate(f, b, a, tol).map(Quadrature::negated);
        }

        let min_width = self.options.min_width * (b - a);
        Ok(refine(&f, a, b, tol, 0, min_width, self.options.max_depth))
    }
}

fn refine<F>(
    f: &F,
    a: Real,
    b: Real,
    tol: Real,
    depth: usize,
    min_width: Real,
    max_depth: usize,
) -> Quadrature
where
    F: Fn(Real) -> Real,
{
    let estimate = gauss_kronrod_15(f, a, b);
    let error = estimate.error();

    let leaf = Quadrature {
        value: estimate.kronrod,
        error_estimate: error,
        evaluations: 15,
        intervals: 1,
        unconverged_intervals: 0,
        max_depth_reached: depth,
    };

    if error < tol {
        return leaf;
    }
    // A non-finite indicator never shrinks under bisection.
    if !error.is_finite() || depth >= max_depth || (b - a) <= min_width {
        return Quadrature {
            unconverged_intervals: 1,
            ..leaf
        };
    }

    let mid = 0.5 * (a + b);
    let left = refine(f, a, mid, 0.5 * tol, depth + 1, min_width, max_depth);
    let right = refine(f, mid, b, 0.5 * tol, depth + 1, min_width, max_depth);

    let mut merged = left.merge(right);
    merged.evaluations += leaf.evaluations;
    merged
}
