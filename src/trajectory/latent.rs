//! Latent trajectory produced by the autoencoder projection.
use crate::trajectory::errors::{TrajectoryError, TrajectoryResult};
use ndarray::{Array2, ArrayView1, ArrayView2};

/// `LatentTrajectory` — `[frames × latent_dim]` encoder outputs, index-aligned
/// with the feature trajectory they were computed from.
///
/// The pipeline always produces `latent_dim = 1`, values in `[0, 1]`; the
/// container itself only requires finite values so that clustering can run on
/// any low-dimensional embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct LatentTrajectory {
    records: Array2<f64>,
}

impl LatentTrajectory {
    /// # Errors
    /// - `TrajectoryError::EmptyLatent` when there are no rows.
    /// - `TrajectoryError::ZeroLatentDim` when there are no columns.
    /// - `TrajectoryError::NonFiniteValue` for the first NaN/±inf entry.
    pub fn new(records: Array2<f64>) -> TrajectoryResult<Self> {
        if records.nrows() == 0 {
            return Err(TrajectoryError::EmptyLatent);
        }
        if records.ncols() == 0 {
            return Err(TrajectoryError::ZeroLatentDim);
        }
        if let Some(((frame, column), &value)) =
            records.indexed_iter().find(|(_, v)| !v.is_finite())
        {
            return Err(TrajectoryError::NonFiniteValue { frame, column, value });
        }
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.records.nrows() == 0
    }

    pub fn latent_dim(&self) -> usize {
        self.records.ncols()
    }

    /// Clustering input: one record per frame.
    pub fn records(&self) -> ArrayView2<'_, f64> {
        self.records.view()
    }

    /// Latent coordinate `d` over time. Panics if `d >= latent_dim()`.
    pub fn column(&self, d: usize) -> ArrayView1<'_, f64> {
        self.records.column(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Construction checks emptiness and finiteness; accessors expose shape.
    //
    // Given
    // -----
    // - A 3×1 latent, a 0×1 latent, a latent containing +inf.
    //
    // Expect
    // ------
    // - Ok with len 3 / dim 1; EmptyLatent; NonFiniteValue at frame 2.
    fn latent_construction_rules() {
        let ok = LatentTrajectory::new(array![[0.1], [0.5], [0.9]]).expect("valid latent");
        assert_eq!(ok.len(), 3);
        assert_eq!(ok.latent_dim(), 1);
        assert_eq!(ok.column(0), array![0.1, 0.5, 0.9].view());

        assert_eq!(LatentTrajectory::new(Array2::zeros((0, 1))), Err(TrajectoryError::EmptyLatent));
        assert!(matches!(
            LatentTrajectory::new(array![[0.1], [0.2], [f64::INFINITY]]),
            Err(TrajectoryError::NonFiniteValue { frame: 2, column: 0, .. })
        ));
    }
}
