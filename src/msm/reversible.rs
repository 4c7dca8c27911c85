//! Reversible maximum-likelihood transition-matrix estimation.
//!
//! Purpose
//! -------
//! Estimate a lag-1 transition matrix that satisfies detailed balance with
//! an implied stationary distribution, by maximizing the count likelihood
//! under the reversibility constraint. No stationary distribution is fixed
//! in advance; it is inferred jointly with the transition probabilities.
//!
//! Key behaviors
//! -------------
//! - Reject any state without an observed outgoing transition
//!   (`MsmError::UnfitState`) before optimizing.
//! - Reject count graphs with more than one communicating class
//!   (`MsmError::Disconnected`). A state that is left but never re-entered
//!   has no reversible MLE with positive stationary mass; the likelihood
//!   supremum sits on the boundary `π_i = 0`.
//! - Parameterize reversible matrices by a symmetric non-negative weight
//!   matrix `x` with `T_ij = x_ij / x_i`, `x_i = Σ_j x_ij`, and
//!   `π_i = x_i / Σ_k x_k`. Any such `x` gives a reversible `T`, and every
//!   reversible `T` arises this way.
//! - Maximize
//!   `ℓ(x) = Σ_ij c_ij ln x_ij − Σ_i c_i ln x_i`
//!   over `θ_e = ln x_e`, one parameter per unordered pair `e = {i, j}`
//!   with `c_ij + c_ji > 0`, through the crate’s L-BFGS maximizer with an
//!   analytic gradient.
//!
//! Invariants & assumptions
//! ------------------------
//! - Pairs that were never observed in either direction keep `x_e = 0`,
//!   hence `T_ij = T_ji = 0`; this is the MLE for such pairs.
//! - Counts are divided by their total before optimization so gradient
//!   tolerances do not depend on trajectory length. The maximizer is
//!   unchanged by this scaling.
//! - `ℓ` is invariant under a common shift of all `θ_e` (only ratios of `x`
//!   matter); L-BFGS handles the flat direction because the gradient is
//!   orthogonal to it.
//!
//! Conventions
//! -----------
//! - Parameter order: pairs `(i, j)` with `i ≤ j`, row-major.
//! - The initial guess is the symmetrized count matrix
//!   `x_ij = (c_ij + c_ji) / 2`, which is already optimal for symmetric
//!   counts; in that case the solver is skipped.
//!
//! Testing notes
//! -------------
//! - Two-state chains (always reversible) must recover `c_ij / c_i`.
//! - Symmetric counts must recover `c_ij / c_i` without iterating.
//! - Asymmetric three-state counts must produce row-stochastic output that
//!   satisfies detailed balance and beats the naive estimator’s reversible
//!   likelihood.
//! - The analytic gradient is checked against finite differences.
//! - Unfit and transient states are rejected before the solver runs.
use crate::msm::{
    counts::CountMatrix,
    errors::{MsmError, MsmResult},
    model::{MarkovStateModel, StationaryDistribution, TransitionMatrix},
    options::MsmOptions,
};
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Cost, FnEvalMap, Grad, LogLikelihood, OptimOutcome, Theta, maximize,
        validation::validate_theta_input,
    },
    numerical_stability::log_sum_exp,
};
use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;
use ndarray::{Array1, Array2};

/// Sparsity structure of the reversible likelihood.
///
/// Fields
/// ------
/// - `pairs`: unordered state pairs `(i, j)`, `i ≤ j`, with at least one
///   observed transition in either direction; one free parameter each.
/// - `adjacent`: for each state, indices into `pairs` that contribute to
///   `x_i`.
/// - `num_states`: matrix dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct ReversibleLikelihood {
    pairs: Vec<(usize, usize)>,
    adjacent: Vec<Vec<usize>>,
    num_states: usize,
}

/// Normalized count data paired with a [`ReversibleLikelihood`].
///
/// - `weights[e]`: `c_ij + c_ji` for off-diagonal pairs, `c_ii` on the
///   diagonal.
/// - `row_totals[i]`: `c_i = Σ_j c_ij`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReversibleCounts {
    weights: Array1<f64>,
    row_totals: Array1<f64>,
}

impl ReversibleLikelihood {
    /// Build the parameter structure and normalized data for `counts`.
    ///
    /// # Errors
    /// - `MsmError::UnfitState` for the first state with zero outgoing counts.
    /// - `MsmError::Disconnected` when the states do not all communicate.
    pub fn from_counts(counts: &CountMatrix) -> MsmResult<(Self, ReversibleCounts)> {
        let num_states = counts.num_states();
        if let Some(state) = (0..num_states).find(|&i| counts.outgoing(i) == 0) {
            return Err(MsmError::UnfitState { state, num_states });
        }
        let classes = counts.communicating_classes();
        if classes.len() > 1 {
            return Err(MsmError::Disconnected { classes });
        }

        let c = counts.as_f64() / counts.total() as f64;
        let mut pairs = Vec::new();
        let mut weights = Vec::new();
        let mut adjacent = vec![Vec::new(); num_states];
        for i in 0..num_states {
            for j in i..num_states {
                let w = if i == j { c[[i, i]] } else { c[[i, j]] + c[[j, i]] };
                if w > 0.0 {
                    let e = pairs.len();
                    pairs.push((i, j));
                    weights.push(w);
                    adjacent[i].push(e);
                    if i != j {
                        adjacent[j].push(e);
                    }
                }
            }
        }
        let row_totals = c.sum_axis(ndarray::Axis(1));
        let data = ReversibleCounts { weights: Array1::from(weights), row_totals };
        Ok((Self { pairs, adjacent, num_states }, data))
    }

    pub fn num_params(&self) -> usize {
        self.pairs.len()
    }

    /// Symmetrized counts `ln((c_ij + c_ji) / 2)`, `ln c_ii` on the diagonal.
    pub fn initial_theta(&self, data: &ReversibleCounts) -> Theta {
        Array1::from_iter(
            self.pairs
                .iter()
                .zip(data.weights.iter())
                .map(|(&(i, j), &w)| if i == j { w.ln() } else { (0.5 * w).ln() }),
        )
    }

    /// `ln x_i` for every state.
    fn log_row_mass(&self, theta: &Theta) -> Array1<f64> {
        Array1::from_iter(self.adjacent.iter().map(|edges| {
            let logs = Array1::from_iter(edges.iter().map(|&e| theta[e]));
            log_sum_exp(logs.view())
        }))
    }

    /// Map fitted parameters to `(T, π)`.
    pub fn transition_and_stationary(&self, theta: &Theta) -> (Array2<f64>, Array1<f64>) {
        let n = self.num_states;
        let lx = self.log_row_mass(theta);
        let mut t = Array2::<f64>::zeros((n, n));
        for (e, &(i, j)) in self.pairs.iter().enumerate() {
            t[[i, j]] = (theta[e] - lx[i]).exp();
            if i != j {
                t[[j, i]] = (theta[e] - lx[j]).exp();
            }
        }
        let total = log_sum_exp(lx.view());
        let pi = lx.mapv(|l| (l - total).exp());
        (t, pi)
    }
}

impl LogLikelihood for ReversibleLikelihood {
    type Data = ReversibleCounts;

    /// `ℓ(θ) = Σ_e w_e θ_e − Σ_i c_i · logsumexp_{e ∋ i} θ_e`.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost> {
        let lx = self.log_row_mass(theta);
        Ok(data.weights.dot(theta) - data.row_totals.dot(&lx))
    }

    fn check(&self, theta: &Theta, _data: &Self::Data) -> OptResult<()> {
        validate_theta_input(theta, self.num_params())
    }

    /// `∂ℓ/∂θ_e = w_e − Σ_{i ∈ e} c_i · x_e / x_i`.
    fn grad(&self, theta: &Theta, data: &Self::Data) -> OptResult<Grad> {
        let lx = self.log_row_mass(theta);
        let mut g = data.weights.clone();
        for (e, &(i, j)) in self.pairs.iter().enumerate() {
            g[e] -= data.row_totals[i] * (theta[e] - lx[i]).exp();
            if i != j {
                g[e] -= data.row_totals[j] * (theta[e] - lx[j]).exp();
            }
        }
        Ok(g)
    }
}

/// Fit a reversible Markov state model to `counts`.
///
/// Parameters
/// ----------
/// - `counts`: lag-1 [`CountMatrix`]; every state needs at least one
///   outgoing transition and every pair of states must communicate.
/// - `opts`: optimizer settings; `opts.mle.tols.tol_grad` also gates the
///   skip-if-already-optimal check on the initial guess.
///
/// Returns
/// -------
/// A [`MarkovStateModel`] whose transition rows sum to one and satisfy
/// detailed balance with the returned stationary distribution.
///
/// Errors
/// ------
/// - `MsmError::UnfitState` when a state has no outgoing transition.
/// - `MsmError::Disconnected` when some state cannot be re-entered from the
///   others.
/// - `MsmError::Optimization` when L-BFGS fails or returns non-finite
///   parameters.
pub fn estimate_reversible(counts: &CountMatrix, opts: &MsmOptions) -> MsmResult<MarkovStateModel> {
    let (likelihood, data) = ReversibleLikelihood::from_counts(counts)?;
    let theta0 = likelihood.initial_theta(&data);

    let grad0 = likelihood.grad(&theta0, &data)?;
    let already_optimal =
        opts.mle.tols.tol_grad.is_some_and(|tol| grad0.l2_norm() < tol);
    let outcome = if already_optimal {
        log::debug!("Reversible MLE: symmetrized counts already optimal, skipping L-BFGS");
        let value = likelihood.value(&theta0, &data)?;
        OptimOutcome::new(
            Some(theta0),
            value,
            TerminationStatus::Terminated(TerminationReason::SolverConverged),
            0,
            FnEvalMap::new(),
            Some(grad0),
        )?
    } else {
        maximize(&likelihood, theta0, &data, &opts.mle)?
    };
    log::debug!(
        "Reversible MLE over {} parameters: ell={:.6}, status={}",
        likelihood.num_params(),
        outcome.value,
        outcome.status
    );

    let (t, pi) = likelihood.transition_and_stationary(&outcome.theta_hat);
    Ok(MarkovStateModel {
        transition: TransitionMatrix::from_fitted(t),
        stationary: StationaryDistribution::from_fitted(pi),
        counts: counts.clone(),
        lag: 1,
        outcome,
    })
}
