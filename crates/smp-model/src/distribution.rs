//! Sojourn-time distributions.
//!
//! Every variant is a cumulative distribution function of elapsed time and
//! evaluates to 0 for negative elapsed time.

use serde::{Deserialize, Serialize};
use smp_core::{Real, SmpError, ensure_finite, ensure_positive};

use crate::error::{ModelError, ModelResult};

/// One tabulated point of an empirical CDF.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CdfPoint {
    /// Elapsed time.
    pub t: Real,
    /// Cumulative probability at `t`.
    pub p: Real,
}

/// Weighted member of a mixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MixtureComponent {
    pub weight: Real,
    pub distribution: SojournDistribution,
}

/// Sojourn-time distribution for leaving one state toward another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum SojournDistribution {
    /// `1 - exp(-rate * t)`
    Exponential { rate: Real },
    /// `1 - exp(-(t / scale)^shape)`
    Weibull { shape: Real, scale: Real },
    /// Piecewise-linear through `points`, ramping linearly from the origin to
    /// the first point and holding the last value afterwards.
    Empirical { points: Vec<CdfPoint> },
    /// Weighted sum of nested distributions.
    Mixture { components: Vec<MixtureComponent> },
}

impl SojournDistribution {
    pub fn exponential(rate: Real) -> Self {
        Self::Exponential { rate }
    }

    /// Evaluate the CDF at elapsed time `t`.
    pub fn evaluate(&self, t: Real) -> Real {
        if t < 0.0 {
            return 0.0;
        }
        match self {
            Self::Exponential { rate } => 1.0 - (-rate * t).exp(),
            Self::Weibull { shape, scale } => 1.0 - (-(t / scale).powf(*shape)).exp(),
            Self::Empirical { points } => interpolate(points, t),
            Self::Mixture { components } => components
                .iter()
                .map(|c| c.weight * c.distribution.evaluate(t))
                .sum(),
        }
    }

    /// Check parameters; evaluation assumes a validated distribution.
    pub fn validate(&self) -> ModelResult<()> {
        match self {
            Self::Exponential { rate } => {
                // rate 0 is the degenerate never-leaving edge
                let rate = ensure_finite(*rate, "exponential rate")?;
                if rate < 0.0 {
                    return Err(ModelError::Distribution {
                        what: format!("negative exponential rate {rate}"),
                    });
                }
            }
            Self::Weibull { shape, scale } => {
                ensure_positive(*shape, "weibull shape")?;
                ensure_positive(*scale, "weibull scale")?;
            }
            Self::Empirical { points } => validate_points(points)?,
            Self::Mixture { components } => {
                if components.is_empty() {
                    return Err(ModelError::Distribution {
                        what: "mixture has no components".to_string(),
                    });
                }
                for component in components {
                    let weight = ensure_finite(component.weight, "mixture weight")?;
                    if weight < 0.0 {
                        return Err(ModelError::Distribution {
                            what: format!("negative mixture weight {weight}"),
                        });
                    }
                    component.distribution.validate()?;
                }
            }
        }
        Ok(())
    }
}

fn interpolate(points: &[CdfPoint], t: Real) -> Real {
    let Some(first) = points.first() else {
        return 0.0;
    };
    let idx = points.partition_point(|p| p.t <= t);
    if idx == points.len() {
        return points[idx - 1].p;
    }
    if idx == 0 {
        // t < first.t, so first.t > 0
        return first.p * t / first.t;
    }
    let lo = points[idx - 1];
    let hi = points[idx];
    lo.p + (hi.p - lo.p) * (t - lo.t) / (hi.t - lo.t)
}

fn validate_points(points: &[CdfPoint]) -> ModelResult<()> {
    if points.is_empty() {
        return Err(ModelError::Distribution {
            what: "empirical table is empty".to_string(),
        });
    }
    let mut prev: Option<CdfPoint> = None;
    for point in points {
        ensure_finite(point.t, "empirical time")?;
        ensure_finite(point.p, "empirical probability")?;
        if point.t < 0.0 {
            return Err(SmpError::InvalidArg {
                what: "empirical times must be non-negative",
            }
            .into());
        }
        if !(0.0..=1.0).contains(&point.p) {
            return Err(ModelError::Distribution {
                what: format!("empirical probability {} outside [0, 1]", point.p),
            });
        }
        if let Some(prev) = prev {
            if point.t <= prev.t {
                return Err(ModelError::Distribution {
                    what: format!("empirical times not increasing at t={}", point.t),
                });
            }
            if point.p < prev.p {
                return Err(ModelError::Distribution {
                    what: format!("empirical CDF decreases at t={}", point.t),
                });
            }
        }
        prev = Some(*point);
    }
    Ok(())
}
