//! Fitted Markov state model artifacts.
//!
//! Purpose
//! -------
//! Bundle the outputs of the reversible estimator: the row-stochastic
//! [`TransitionMatrix`], the implied [`StationaryDistribution`], the
//! [`CountMatrix`] it was fitted from, and the optimizer diagnostics.
//!
//! Invariants & assumptions
//! ------------------------
//! - Transition rows of fitted states sum to one.
//! - `π` is non-negative, sums to one, and satisfies detailed balance
//!   `π_i T_ij = π_j T_ji` with the transition matrix.
//! - The lag is always one frame.
use crate::msm::counts::CountMatrix;
use crate::optimization::loglik_optimizer::OptimOutcome;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Row-stochastic transition matrix `T[i][j] = P(s_{t+1} = j | s_t = i)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    matrix: Array2<f64>,
}

impl TransitionMatrix {
    pub(crate) fn from_fitted(matrix: Array2<f64>) -> Self {
        Self { matrix }
    }

    pub fn num_states(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.matrix.view()
    }

    pub fn into_inner(self) -> Array2<f64> {
        self.matrix
    }

    /// Row sums; each is one up to rounding for fitted states.
    pub fn row_sums(&self) -> Array1<f64> {
        self.matrix.sum_axis(ndarray::Axis(1))
    }
}

/// Stationary distribution `π` implied by the reversible fit.
#[derive(Debug, Clone, PartialEq)]
pub struct StationaryDistribution {
    pi: Array1<f64>,
}

impl StationaryDistribution {
    pub(crate) fn from_fitted(pi: Array1<f64>) -> Self {
        Self { pi }
    }

    pub fn view(&self) -> ArrayView1<'_, f64> {
        self.pi.view()
    }
}

/// `MarkovStateModel` — reversible lag-1 MSM fitted by maximum likelihood.
///
/// Fields
/// ------
/// - `transition`: fitted [`TransitionMatrix`].
/// - `stationary`: implied [`StationaryDistribution`].
/// - `counts`: the [`CountMatrix`] the model was estimated from.
/// - `lag`: always `1`.
/// - `outcome`: L-BFGS diagnostics (log-likelihood of the normalized counts,
///   iterations, termination status).
#[derive(Debug, Clone, PartialEq)]
pub struct MarkovStateModel {
    pub transition: TransitionMatrix,
    pub stationary: StationaryDistribution,
    pub counts: CountMatrix,
    pub lag: usize,
    pub outcome: OptimOutcome,
}

impl MarkovStateModel {
    pub fn num_states(&self) -> usize {
        self.transition.num_states()
    }

    /// Largest violation `|π_i T_ij - π_j T_ji|` of detailed balance.
    pub fn detailed_balance_residual(&self) -> f64 {
        let t = self.transition.view();
        let pi = self.stationary.view();
        let n = t.nrows();
        let mut worst = 0.0f64;
        for i in 0..n {
            for j in (i + 1)..n {
                worst = worst.max((pi[i] * t[[i, j]] - pi[j] * t[[j, i]]).abs());
            }
        }
        worst
    }
}
