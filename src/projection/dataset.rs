//! Lag-1 training pairs and their train/validation split.
use crate::trajectory::FeatureTrajectory;
use ndarray::{Array2, ArrayView2, Axis, s};
use rand::Rng;
use rand::seq::SliceRandom;

/// Aligned `(x_t, x_{t+1})` rows: `inputs[i]` precedes `targets[i]` by one
/// frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LaggedPairs {
    inputs: Array2<f64>,
    targets: Array2<f64>,
}

impl LaggedPairs {
    /// Build all `frames − 1` consecutive pairs of `features`.
    pub fn from_features(features: &FeatureTrajectory) -> Self {
        let x = features.view();
        let n = x.nrows();
        Self {
            inputs: x.slice(s![..n - 1, ..]).to_owned(),
            targets: x.slice(s![1.., ..]).to_owned(),
        }
    }

    pub fn len(&self) -> usize {
        self.inputs.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn inputs(&self) -> ArrayView2<'_, f64> {
        self.inputs.view()
    }

    pub fn targets(&self) -> ArrayView2<'_, f64> {
        self.targets.view()
    }

    /// Pairs at the given positions, in that order.
    pub fn select(&self, idx: &[usize]) -> Self {
        Self {
            inputs: self.inputs.select(Axis(0), idx),
            targets: self.targets.select(Axis(0), idx),
        }
    }

    /// Randomly split into `(train, validation)`.
    ///
    /// The validation partition holds `floor(validation_fraction · len)`
    /// pairs; the rest train.
    pub fn split<R: Rng + ?Sized>(&self, validation_fraction: f64, rng: &mut R) -> (Self, Self) {
        let n = self.len();
        let n_val = ((validation_fraction * n as f64).floor() as usize).min(n);
        let mut idx: Vec<usize> = (0..n).collect();
        idx.shuffle(rng);
        let (val, train) = idx.split_at(n_val);
        (self.select(train), self.select(val))
    }

    /// Consecutive mini-batches of at most `batch_size` pairs.
    pub fn batches(
        &self, batch_size: usize,
    ) -> impl Iterator<Item = (ArrayView2<'_, f64>, ArrayView2<'_, f64>)> {
        let step = batch_size.max(1);
        self.inputs
            .axis_chunks_iter(Axis(0), step)
            .zip(self.targets.axis_chunks_iter(Axis(0), step))
    }
}
