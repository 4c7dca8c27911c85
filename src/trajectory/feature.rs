//! Feature trajectory container for dynophore interaction series.
//!
//! Purpose
//! -------
//! Provide the validated input container of the pipeline: an ordered
//! `[frames × features]` matrix of pharmacophore-interaction intensities, as
//! produced by an external trajectory loader.
//!
//! Key behaviors
//! -------------
//! - [`FeatureTrajectory::new`] validates an owned `Array2<f64>`.
//! - [`FeatureTrajectory::from_rows`] accepts loader output (row vectors plus
//!   a declared feature count) and rejects ragged rows.
//!
//! Invariants & assumptions
//! ------------------------
//! - `frame_count ≥ 2` (at least one lag-1 pair exists).
//! - `feature_count ≥ 1` and constant across frames.
//! - Every intensity is finite. No normalization is applied.
//!
//! Conventions
//! -----------
//! - Rows are frames (time), columns are features.
//! - The container is immutable after construction; downstream stages borrow
//!   views.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the happy path and each rejection rule of both
//!   constructors.
use crate::trajectory::errors::{TrajectoryError, TrajectoryResult};
use ndarray::{Array2, ArrayView1, ArrayView2};

/// `FeatureTrajectory` — validated `[frames × features]` intensity matrix.
///
/// Fields
/// ------
/// - `data`: `Array2<f64>`
///   Frame-major intensities; private so the invariants cannot be broken
///   after construction.
///
/// Invariants
/// ----------
/// - `data.nrows() ≥ 2`, `data.ncols() ≥ 1`, all entries finite.
///
/// Performance
/// -----------
/// - Validation is a single O(frames · features) scan.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTrajectory {
    data: Array2<f64>,
}

impl FeatureTrajectory {
    /// Construct a validated trajectory from an owned matrix.
    ///
    /// Errors
    /// ------
    /// - `TrajectoryError::TooFewFrames` when `data.nrows() < 2`.
    /// - `TrajectoryError::NoFeatures` when `data.ncols() == 0`.
    /// - `TrajectoryError::NonFiniteValue` for the first NaN/±inf entry.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::array;
    /// # use dyno_msm::trajectory::FeatureTrajectory;
    /// let traj = FeatureTrajectory::new(array![[0.0, 1.0], [1.0, 0.0]]).unwrap();
    /// assert_eq!(traj.frame_count(), 2);
    /// assert_eq!(traj.feature_count(), 2);
    /// ```
    pub fn new(data: Array2<f64>) -> TrajectoryResult<Self> {
        if data.nrows() < 2 {
            return Err(TrajectoryError::TooFewFrames { frames: data.nrows() });
        }
        if data.ncols() == 0 {
            return Err(TrajectoryError::NoFeatures);
        }
        if let Some(((frame, column), &value)) =
            data.indexed_iter().find(|(_, v)| !v.is_finite())
        {
            return Err(TrajectoryError::NonFiniteValue { frame, column, value });
        }
        Ok(Self { data })
    }

    /// Construct from loader output: one `Vec<f64>` per frame and the
    /// declared feature count.
    ///
    /// Errors
    /// ------
    /// - `TrajectoryError::NoFeatures` when `feature_count == 0`.
    /// - `TrajectoryError::RaggedRow` for the first row whose width differs
    ///   from `feature_count`.
    /// - Any error from [`FeatureTrajectory::new`].
    pub fn from_rows(rows: &[Vec<f64>], feature_count: usize) -> TrajectoryResult<Self> {
        if feature_count == 0 {
            return Err(TrajectoryError::NoFeatures);
        }
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != feature_count) {
            return Err(TrajectoryError::RaggedRow { row, expected: feature_count, found: r.len() });
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let data = Array2::from_shape_vec((rows.len(), feature_count), flat)
            .map_err(|_| TrajectoryError::TooFewFrames { frames: rows.len() })?;
        Self::new(data)
    }

    pub fn frame_count(&self) -> usize {
        self.data.nrows()
    }

    pub fn feature_count(&self) -> usize {
        self.data.ncols()
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Feature vector of frame `t`. Panics if `t >= frame_count()`.
    pub fn frame(&self, t: usize) -> ArrayView1<'_, f64> {
        self.data.row(t)
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
    // - Successful construction from matrices and row vectors.
    // - Rejection of short, featureless, ragged, and non-finite inputs.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Valid rows produce a trajectory with matching shape and frame access.
    //
    // Given
    // -----
    // - Three frames of two features.
    //
    // Expect
    // ------
    // - frame_count = 3, feature_count = 2, frame(1) = [0.5, 0.25].
    fn from_rows_builds_matching_shape() {
        // Arrange
        let rows = vec![vec![0.0, 1.0], vec![0.5, 0.25], vec![1.0, 0.0]];

        // Act
        let traj = FeatureTrajectory::from_rows(&rows, 2).expect("valid rows");

        // Assert
        assert_eq!(traj.frame_count(), 3);
        assert_eq!(traj.feature_count(), 2);
        assert_eq!(traj.frame(1), array![0.5, 0.25].view());
    }

    #[test]
    // Purpose
    // -------
    // Shape rules reject single-frame, featureless, and ragged inputs.
    //
    // Given
    // -----
    // - A 1×2 matrix, a 3×0 matrix, rows of widths [2, 3].
    //
    // Expect
    // ------
    // - TooFewFrames, NoFeatures, RaggedRow { row: 1, expected: 2, found: 3 }.
    fn shape_rules_are_enforced() {
        assert_eq!(
            FeatureTrajectory::new(array![[1.0, 2.0]]),
            Err(TrajectoryError::TooFewFrames { frames: 1 })
        );
        assert_eq!(
            FeatureTrajectory::new(Array2::zeros((3, 0))),
            Err(TrajectoryError::NoFeatures)
        );
        assert_eq!(
            FeatureTrajectory::from_rows(&[vec![1.0, 2.0], vec![1.0, 2.0, 3.0]], 2),
            Err(TrajectoryError::RaggedRow { row: 1, expected: 2, found: 3 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Non-finite intensities are located precisely.
    //
    // Given
    // -----
    // - A NaN at frame 1, column 0.
    //
    // Expect
    // ------
    // - NonFiniteValue { frame: 1, column: 0, .. }.
    fn non_finite_value_is_located() {
        let err = FeatureTrajectory::new(array![[0.0, 1.0], [f64::NAN, 1.0]])
            .expect_err("NaN must be rejected");

        assert!(matches!(err, TrajectoryError::NonFiniteValue { frame: 1, column: 0, .. }));
    }
}
