//! Semi-Markov process model and the transition-probability integral.
//!
//! The model has two phases. During setup, transitions and the initial matrix
//! are written through `&mut self`. Afterwards it is only read through `&self`,
//! which is what lets the evaluation driver share one model across workers.

use nalgebra::DMatrix;
use smp_core::{Real, ensure_index};
use smp_quad::{AdaptiveGaussKronrod, Integrator, Quadrature};

use crate::distribution::SojournDistribution;
use crate::error::{ModelError, ModelResult};
use crate::transition::Transition;

/// Result of one `P_ij(t)` evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Raw integral clamped above at 1.
    pub probability: Real,
    /// Raw integral before clamping.
    pub raw: Real,
    pub quadrature: Quadrature,
}

/// Semi-Markov process over `states` integer-indexed states.
#[derive(Debug, Clone)]
pub struct SemiMarkovProcess<I = AdaptiveGaussKronrod> {
    transitions: DMatrix<Option<Transition>>,
    initial: DMatrix<Real>,
    integrator: I,
}

impl SemiMarkovProcess {
    /// Empty model with the default integrator and an all-zero initial matrix.
    pub fn new(states: usize) -> Self {
        Self::with_integrator(states, AdaptiveGaussKronrod::default())
    }
}

impl<I: Integrator> SemiMarkovProcess<I> {
    pub fn with_integrator(states: usize, integrator: I) -> Self {
        Self {
            transitions: DMatrix::from_element(states, states, None),
            initial: DMatrix::zeros(states, states),
            integrator,
        }
    }

    pub fn states(&self) -> usize {
        self.transitions.nrows()
    }

    pub fn integrator(&self) -> &I {
        &self.integrator
    }

    /// Register (or overwrite) the edge `from -> to`.
    pub fn add_transition(
        &mut self,
        from: usize,
        to: usize,
        distribution: SojournDistribution,
        probability: Real,
    ) -> ModelResult<()> {
        distribution.validate()?;
        self.insert_transition(from, to, Transition::new(distribution, probability))
    }

    /// Store a prepared transition at `from -> to`, replacing any previous one.
    pub fn insert_transition(
        &mut self,
        from: usize,
        to: usize,
        transition: Transition,
    ) -> ModelResult<()> {
        let n = self.states();
        ensure_index(from, n, "from state")?;
        ensure_index(to, n, "to state")?;
        self.transitions[(from, to)] = Some(transition);
        Ok(())
    }

    pub fn transition(&self, from: usize, to: usize) -> Option<&Transition> {
        if from >= self.states() || to >= self.states() {
            return None;
        }
        self.transitions[(from, to)].as_ref()
    }

    /// Registered edges entering `to`, as `(from, transition)`.
    pub fn transitions_into(&self, to: usize) -> impl Iterator<Item = (usize, &Transition)> + '_ {
        let n = self.states();
        let sources = if to < n { 0..n } else { 0..0 };
        sources.filter_map(move |from| self.transitions[(from, to)].as_ref().map(|tr| (from, tr)))
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.iter().filter(|cell| cell.is_some()).count()
    }

    /// Replace the initial-probability matrix.
    pub fn set_initial_probabilities(&mut self, matrix: DMatrix<Real>) -> ModelResult<()> {
        let states = self.states();
        if matrix.nrows() != states || matrix.ncols() != states {
            return Err(ModelError::InitialShape {
                rows: matrix.nrows(),
                cols: matrix.ncols(),
                states,
            });
        }
        self.initial = matrix;
        Ok(())
    }

    /// Replace the initial-probability matrix from row vectors.
    pub fn set_initial_rows(&mut self, rows: &[Vec<Real>]) -> ModelResult<()> {
        let states = self.states();
        if let Some(bad) = rows.iter().find(|row| row.len() != states) {
            return Err(ModelError::InitialShape {
                rows: rows.len(),
                cols: bad.len(),
                states,
            });
        }
        if rows.len() != states {
            return Err(ModelError::InitialShape {
                rows: rows.len(),
                cols: states,
                states,
            });
        }
        self.set_initial_probabilities(DMatrix::from_fn(states, states, |r, c| rows[r][c]))
    }

    pub fn initial_probabilities(&self) -> &DMatrix<Real> {
        &self.initial
    }

    /// `P_ij(t)`: probability of occupying `j` at time `t` having started in `i`.
    pub fn transition_probability(&self, i: usize, j: usize, t: Real, tol: Real) -> ModelResult<Real> {
        self.evaluate(i, j, t, tol).map(|e| e.probability)
    }

    /// Evaluate
    /// `∫₀ᵗ Σ_k initial[i][k] · probability(k,j) · cdf(k,j)(t − u) du`
    /// over every registered edge `k -> j`, clamped above at 1.
    ///
    /// The lower side is not clamped: a negative raw integral is returned as is.
    pub fn evaluate(&self, i: usize, j: usize, t: Real, tol: Real) -> ModelResult<Evaluation> {
        let n = self.states();
        ensure_index(i, n, "initial state")?;
        ensure_index(j, n, "target state")?;

        let kernel: Vec<(Real, &Transition)> = self
            .transitions_into(j)
            .map(|(k, tr)| (self.initial[(i, k)] * tr.probability(), tr))
            .collect();

        let integrand = |u: Real| -> Real {
            kernel
                .iter()
                .map(|(weight, tr)| weight * tr.evaluate_cdf(t - u))
                .sum()
        };

        let quadrature = self.integrator.integrate(integrand, 0.0, t, tol)?;
        let raw = quadrature.value;
        let probability = if raw > 1.0 { 1.0 } else { raw };

        Ok(Evaluation {
            probability,
            raw,
            quadrature,
        })
    }
}
