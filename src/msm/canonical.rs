//! Canonical state ordering for fitted transition matrices.
//!
//! Purpose
//! -------
//! Make transition matrices fitted from different seeds or runs comparable
//! by reordering states by descending self-transition probability, so the
//! most persistent state is always index 0.
//!
//! Key behaviors
//! -------------
//! - [`CanonicalOrder::from_transition_matrix`] sorts states by descending
//!   `T[i][i]`, ties broken by ascending original index (stable sort).
//! - [`CanonicalOrder::permute_matrix`] conjugates any square matrix by the
//!   permutation, `M'[i][j] = M[order[i]][order[j]]`; rows and columns move
//!   together.
//! - [`CanonicalOrder::relabel`] applies the same order to a discrete
//!   trajectory, so old state `order[i]` becomes label `i`.
//! - [`canonicalize_model`] bundles all of the above for a fitted
//!   [`MarkovStateModel`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Conjugation preserves the multiset of entries and the row sums.
//! - Canonicalizing an already canonical matrix is the identity.
//!
//! Testing notes
//! -------------
//! - The 4×4 reference scenario must yield `order = [3, 1, 0, 2]` and exact
//!   rows; idempotence, tie-breaking and entry preservation are checked
//!   separately.
use crate::msm::{
    errors::{MsmError, MsmResult},
    model::MarkovStateModel,
};
use crate::trajectory::DiscreteTrajectory;
use ndarray::{Array2, ArrayView2};

/// `CanonicalOrder` — permutation with `order[i]` = original state placed at
/// canonical index `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalOrder {
    order: Vec<usize>,
}

impl CanonicalOrder {
    /// Order states of a square matrix by descending diagonal.
    ///
    /// # Errors
    /// - `MsmError::NotSquare` when `t` is not square.
    pub fn from_transition_matrix(t: ArrayView2<'_, f64>) -> MsmResult<Self> {
        if t.nrows() != t.ncols() {
            return Err(MsmError::NotSquare { rows: t.nrows(), cols: t.ncols() });
        }
        let diag = t.diag();
        let mut order: Vec<usize> = (0..t.nrows()).collect();
        order.sort_by(|&a, &b| diag[b].total_cmp(&diag[a]));
        Ok(Self { order })
    }

    /// Wrap an explicit permutation of `[0, len)`.
    ///
    /// # Errors
    /// - `MsmError::InvalidPermutation` on out-of-range or repeated entries.
    pub fn from_permutation(order: Vec<usize>) -> MsmResult<Self> {
        let len = order.len();
        let mut seen = vec![false; len];
        for &s in &order {
            if s >= len {
                return Err(MsmError::InvalidPermutation { len, reason: "entry out of range" });
            }
            if std::mem::replace(&mut seen[s], true) {
                return Err(MsmError::InvalidPermutation { len, reason: "repeated entry" });
            }
        }
        Ok(Self { order })
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `inverse()[s]` = canonical index of original state `s`.
    pub fn inverse(&self) -> Vec<usize> {
        let mut inv = vec![0; self.order.len()];
        for (i, &s) in self.order.iter().enumerate() {
            inv[s] = i;
        }
        inv
    }

    /// `M'[i][j] = M[order[i]][order[j]]`.
    ///
    /// # Errors
    /// - `MsmError::NotSquare` when `m` is not `len × len`.
    pub fn permute_matrix<A: Clone>(&self, m: ArrayView2<'_, A>) -> MsmResult<Array2<A>> {
        let n = self.order.len();
        if m.nrows() != n || m.ncols() != n {
            return Err(MsmError::NotSquare { rows: m.nrows(), cols: m.ncols() });
        }
        Ok(Array2::from_shape_fn((n, n), |(i, j)| m[[self.order[i], self.order[j]]].clone()))
    }

    /// Relabel `traj` so old state `order[i]` becomes label `i`.
    ///
    /// # Errors
    /// - `MsmError::Trajectory` when the state counts differ.
    pub fn relabel(&self, traj: &DiscreteTrajectory) -> MsmResult<DiscreteTrajectory> {
        Ok(traj.relabel(self)?)
    }
}

/// Canonicalize a transition matrix, returning `(T', order)`.
///
/// # Errors
/// - `MsmError::NotSquare` when `t` is not square.
pub fn canonicalize(t: ArrayView2<'_, f64>) -> MsmResult<(Array2<f64>, CanonicalOrder)> {
    let order = CanonicalOrder::from_transition_matrix(t)?;
    let sorted = order.permute_matrix(t)?;
    Ok((sorted, order))
}

/// Canonicalized matrix only.
///
/// # Errors
/// - `MsmError::NotSquare` when `t` is not square.
pub fn sort_markov_matrix(t: ArrayView2<'_, f64>) -> MsmResult<Array2<f64>> {
    canonicalize(t).map(|(sorted, _)| sorted)
}

/// Canonical view of a fitted model and its discrete trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalModel {
    pub order: CanonicalOrder,
    pub transition_matrix: Array2<f64>,
    pub count_matrix: Array2<u64>,
    pub stationary: ndarray::Array1<f64>,
    pub discrete: DiscreteTrajectory,
}

/// Reorder every artifact of `model` and `discrete` consistently.
///
/// # Errors
/// - `MsmError::Trajectory` when `discrete` has a different state count.
pub fn canonicalize_model(
    model: &MarkovStateModel, discrete: &DiscreteTrajectory,
) -> MsmResult<CanonicalModel> {
    let (transition_matrix, order) = canonicalize(model.transition.view())?;
    let count_matrix = order.permute_matrix(model.counts.view())?;
    let pi = model.stationary.view();
    let stationary = order.order.iter().map(|&s| pi[s]).collect();
    let discrete = order.relabel(discrete)?;
    Ok(CanonicalModel { order, transition_matrix, count_matrix, stationary, discrete })
}
