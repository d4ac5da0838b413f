//! One directed edge of the embedded chain.

use smp_core::Real;

use crate::distribution::SojournDistribution;

/// Sojourn distribution and embedded-chain probability for one ordered state pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    distribution: Option<SojournDistribution>,
    probability: Real,
}

impl Transition {
    pub fn new(distribution: SojournDistribution, probability: Real) -> Self {
        Self {
            distribution: Some(distribution),
            probability,
        }
    }

    /// An edge whose CDF is identically zero.
    pub fn without_distribution(probability: Real) -> Self {
        Self {
            distribution: None,
            probability,
        }
    }

    /// Embedded-chain probability, returned as stored.
    pub fn probability(&self) -> Real {
        self.probability
    }

    pub fn distribution(&self) -> Option<&SojournDistribution> {
        self.distribution.as_ref()
    }

    /// Sojourn CDF at elapsed time `t`; 0 when no distribution is attached.
    pub fn evaluate_cdf(&self, t: Real) -> Real {
        self.distribution
            .as_ref()
            .map_or(0.0, |distribution| distribution.evaluate(t))
    }
}
