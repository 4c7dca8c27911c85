//! Discrete state trajectory produced by hard clustering.
//!
//! Purpose
//! -------
//! Hold the per-frame state labels that feed the transition count, together
//! with the number of states the labels were drawn from.
//!
//! Invariants & assumptions
//! ------------------------
//! - `num_states ≥ 1` and every label is in `[0, num_states)`.
//! - Not every state has to be occupied; [`DiscreteTrajectory::occupied_states`]
//!   reports how many are.
//! - Label identity is arbitrary across runs; [`DiscreteTrajectory::relabel`]
//!   applies a canonical order computed from the fitted transition matrix.
use crate::msm::canonical::CanonicalOrder;
use crate::trajectory::errors::{TrajectoryError, TrajectoryResult};
use ndarray::{Array1, ArrayView1};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscreteTrajectory {
    labels: Array1<usize>,
    num_states: usize,
}

impl DiscreteTrajectory {
    /// # Errors
    /// - `TrajectoryError::ZeroStates` when `num_states == 0`.
    /// - `TrajectoryError::LabelOutOfRange` for the first label `>= num_states`.
    pub fn new(labels: Array1<usize>, num_states: usize) -> TrajectoryResult<Self> {
        if num_states == 0 {
            return Err(TrajectoryError::ZeroStates);
        }
        if let Some((index, &label)) = labels.iter().enumerate().find(|(_, l)| **l >= num_states)
        {
            return Err(TrajectoryError::LabelOutOfRange { index, label, num_states });
        }
        Ok(Self { labels, num_states })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn labels(&self) -> ArrayView1<'_, usize> {
        self.labels.view()
    }

    /// Number of distinct labels that actually occur.
    pub fn occupied_states(&self) -> usize {
        let mut seen = vec![false; self.num_states];
        for &l in &self.labels {
            seen[l] = true;
        }
        seen.into_iter().filter(|&s| s).count()
    }

    /// Return a copy in which old state `order[i]` carries label `i`.
    ///
    /// # Errors
    /// - `TrajectoryError::PermutationMismatch` when `order` does not cover
    ///   exactly `num_states` states.
    pub fn relabel(&self, order: &CanonicalOrder) -> TrajectoryResult<Self> {
        if order.len() != self.num_states {
            return Err(TrajectoryError::PermutationMismatch {
                expected: self.num_states,
                found: order.len(),
            });
        }
        let new_label_of = order.inverse();
        let labels = self.labels.mapv(|old| new_label_of[old]);
        Ok(Self { labels, num_states: self.num_states })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Label range validation and occupancy counting.
    // - Relabeling by a canonical order, including a size mismatch.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Labels outside `[0, num_states)` are rejected at the first offender.
    //
    // Given
    // -----
    // - labels [0, 2, 3, 1] with num_states = 3; num_states = 0.
    //
    // Expect
    // ------
    // - LabelOutOfRange { index: 2, label: 3, num_states: 3 }; ZeroStates.
    fn labels_must_be_in_range() {
        assert_eq!(
            DiscreteTrajectory::new(array![0, 2, 3, 1], 3),
            Err(TrajectoryError::LabelOutOfRange { index: 2, label: 3, num_states: 3 })
        );
        assert_eq!(DiscreteTrajectory::new(array![0], 0), Err(TrajectoryError::ZeroStates));
    }

    #[test]
    // Purpose
    // -------
    // Empty clusters are allowed and visible through `occupied_states`.
    //
    // Given
    // -----
    // - labels [0, 0, 2, 2] with num_states = 3.
    //
    // Expect
    // ------
    // - occupied_states = 2.
    fn occupied_states_counts_distinct_labels() {
        let traj = DiscreteTrajectory::new(array![0, 0, 2, 2], 3).expect("valid labels");

        assert_eq!(traj.occupied_states(), 2);
    }

    #[test]
    // Purpose
    // -------
    // Relabeling sends old state `order[i]` to label `i`.
    //
    // Given
    // -----
    // - order = [2, 0, 1]; labels [0, 1, 2, 2].
    //
    // Expect
    // ------
    // - 2 → 0, 0 → 1, 1 → 2, i.e. [1, 2, 0, 0].
    fn relabel_applies_inverse_permutation() {
        // Arrange
        let traj = DiscreteTrajectory::new(array![0, 1, 2, 2], 3).expect("valid labels");
        let order = CanonicalOrder::from_permutation(vec![2, 0, 1]).expect("valid permutation");

        // Act
        let relabeled = traj.relabel(&order).expect("sizes match");

        // Assert
        assert_eq!(relabeled.labels(), array![1, 2, 0, 0].view());
        assert_eq!(relabeled.num_states(), 3);
    }

    #[test]
    // Purpose
    // -------
    // A permutation of the wrong size is rejected.
    //
    // Given
    // -----
    // - A 2-state order applied to a 3-state trajectory.
    //
    // Expect
    // ------
    // - PermutationMismatch { expected: 3, found: 2 }.
    fn relabel_rejects_size_mismatch() {
        let traj = DiscreteTrajectory::new(array![0, 1, 2], 3).expect("valid labels");
        let order = CanonicalOrder::from_permutation(vec![1, 0]).expect("valid permutation");

        assert_eq!(
            traj.relabel(&order),
            Err(TrajectoryError::PermutationMismatch { expected: 3, found: 2 })
        );
    }
}
