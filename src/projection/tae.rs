//! projection::tae — time-lagged autoencoder and the latent projector.
//!
//! Purpose
//! -------
//! Learn a one-dimensional embedding of the feature trajectory that is
//! predictive of the next frame, then encode every frame with it.
//!
//! Key behaviors
//! -------------
//! - Encoder `[F, 2·size·F, 1]` (ReLU hidden, logistic output) and decoder
//!   `[1, 2·size·F, F]` (ReLU hidden, identity output).
//! - Training minimizes the mean squared error between
//!   `decoder(encoder(x_t))` and `x_{t+1}` with candle's Adam (`AdamW` with
//!   zero weight decay) on mini-batches of the training partition, taken in
//!   split order. Gradients come from candle's autograd.
//! - Validation runs once per epoch on the whole validation partition.
//! - Any non-finite loss aborts training with
//!   [`TaeError::TrainingDivergence`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are used as given; no normalization.
//! - One seeded `Xoshiro256Plus` drives weight initialization and the
//!   train/validation split, in that order. Candle's own RNG is never used.
//! - The latent trajectory has exactly one row per input frame.
//!
//! Testing notes
//! -------------
//! - Unit tests check the latent shape and range, seed determinism, loss
//!   decrease on a learnable two-state signal, the divergence guard, and
//!   the sweep-width passthrough of [`LatentProjector::project`].
use crate::clustering::effective_sweep_width;
use crate::projection::{
    dataset::LaggedPairs,
    errors::{TaeError, TaeResult, TrainingPhase},
    network::{DenseNetwork, to_array, to_tensor},
    options::TaeOptions,
};
use crate::trajectory::{FeatureTrajectory, LatentTrajectory};
use candle_core::{Device, Tensor, Var};
use candle_nn::{Activation, AdamW, Module, Optimizer, ParamsAdamW, loss};
use ndarray::{Array2, ArrayView2};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

/// Adam first-moment decay.
pub const ADAM_BETA1: f64 = 0.9;
/// Adam second-moment decay.
pub const ADAM_BETA2: f64 = 0.999;
/// Adam denominator guard.
pub const ADAM_EPSILON: f64 = 1e-8;

/// Loss curves recorded while training.
///
/// `train` holds one `(step, loss)` entry per mini-batch; `validation` one
/// per epoch, tagged with the global step reached at that point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingHistory {
    pub train: Vec<(usize, f64)>,
    pub validation: Vec<(usize, f64)>,
}

impl TrainingHistory {
    pub fn final_train_loss(&self) -> Option<f64> {
        self.train.last().map(|&(_, l)| l)
    }

    pub fn final_validation_loss(&self) -> Option<f64> {
        self.validation.last().map(|&(_, l)| l)
    }
}

#[derive(Debug, Clone)]
pub struct TimeLaggedAutoencoder {
    encoder: DenseNetwork,
    decoder: DenseNetwork,
    feature_count: usize,
    device: Device,
}

impl TimeLaggedAutoencoder {
    /// Fresh, untrained network for `feature_count` inputs.
    ///
    /// # Errors
    /// - `TaeError::Backend` when candle cannot allocate the parameters.
    pub fn new(
        feature_count: usize, opts: &TaeOptions, rng: &mut Xoshiro256Plus,
    ) -> TaeResult<Self> {
        let device = Device::Cpu;
        let hidden = opts.hidden_units(feature_count);
        let encoder = DenseNetwork::new(
            &[feature_count, hidden, 1],
            Activation::Relu,
            Some(Activation::Sigmoid),
            rng,
            &device,
        )?;
        let decoder =
            DenseNetwork::new(&[1, hidden, feature_count], Activation::Relu, None, rng, &device)?;
        Ok(Self { encoder, decoder, feature_count, device })
    }

    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    fn vars(&self) -> Vec<Var> {
        self.encoder.vars().iter().chain(self.decoder.vars()).cloned().collect()
    }

    fn reconstruct(&self, x: &Tensor) -> TaeResult<Tensor> {
        Ok(self.decoder.forward(&self.encoder.forward(x)?)?)
    }

    /// Mean squared reconstruction-of-the-future loss on `(x, y)`.
    ///
    /// # Errors
    /// - `TaeError::Backend` on a tensor failure.
    pub fn loss(&self, x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> TaeResult<f64> {
        let pred = self.reconstruct(&to_tensor(x, &self.device)?)?.detach();
        Ok(loss::mse(&pred, &to_tensor(y, &self.device)?)?.to_scalar::<f64>()?)
    }

    /// Encode a batch of frames to `[rows × 1]` latent values.
    ///
    /// # Errors
    /// - `TaeError::Backend` on a tensor failure.
    pub fn encode(&self, x: ArrayView2<'_, f64>) -> TaeResult<Array2<f64>> {
        to_array(&self.encoder.forward(&to_tensor(x, &self.device)?)?.detach())
    }

    /// Encode every frame of `features`.
    ///
    /// # Errors
    /// - `TaeError::DimensionMismatch` when the feature count differs from
    ///   the trained one.
    /// - `TaeError::Trajectory` when the encoding is not a valid latent
    ///   trajectory.
    pub fn transform(&self, features: &FeatureTrajectory) -> TaeResult<LatentTrajectory> {
        if features.feature_count() != self.feature_count {
            return Err(TaeError::DimensionMismatch {
                expected: self.feature_count,
                found: features.feature_count(),
            });
        }
        Ok(LatentTrajectory::new(self.encode(features.view())?)?)
    }

    /// Train on `train`, validating on `validation` after every epoch.
    ///
    /// # Errors
    /// - `TaeError::TrainingDivergence` at the first non-finite loss.
    /// - `TaeError::Backend` on a tensor or autograd failure.
    pub fn fit(
        &mut self, train: &LaggedPairs, validation: &LaggedPairs, opts: &TaeOptions,
    ) -> TaeResult<TrainingHistory> {
        let params = ParamsAdamW {
            lr: opts.learning_rate,
            beta1: ADAM_BETA1,
            beta2: ADAM_BETA2,
            eps: ADAM_EPSILON,
            weight_decay: 0.0,
        };
        let mut optimizer = AdamW::new(self.vars(), params)?;
        let mut history = TrainingHistory::default();
        let mut step = 0usize;

        for epoch in 0..opts.n_epochs {
            for (x, y) in train.batches(opts.batch_size) {
                let x = to_tensor(x, &self.device)?;
                let y = to_tensor(y, &self.device)?;
                let batch_loss = loss::mse(&self.reconstruct(&x)?, &y)?;
                let value = batch_loss.to_scalar::<f64>()?;
                if !value.is_finite() {
                    return Err(TaeError::TrainingDivergence {
                        phase: TrainingPhase::Training,
                        epoch,
                        step,
                        loss: value,
                    });
                }
                optimizer.backward_step(&batch_loss)?;
                history.train.push((step, value));
                step += 1;
            }

            if !validation.is_empty() {
                let value = self.loss(validation.inputs(), validation.targets())?;
                if !value.is_finite() {
                    return Err(TaeError::TrainingDivergence {
                        phase: TrainingPhase::Validation,
                        epoch,
                        step,
                        loss: value,
                    });
                }
                history.validation.push((step, value));
            }
            log::debug!(
                "TAE epoch {}/{}: train loss {:?}, validation loss {:?}",
                epoch + 1,
                opts.n_epochs,
                history.final_train_loss(),
                history.final_validation_loss()
            );
        }
        Ok(history)
    }
}

/// Output of [`LatentProjector::project`].
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub latent: LatentTrajectory,
    pub history: TrainingHistory,
    /// Diagnostic sweep bound after the `num_states` guard.
    pub sweep_width: usize,
    /// Seed that drove initialization and the split.
    pub seed: u64,
}

/// Trains a fresh autoencoder per call and encodes the trajectory with it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LatentProjector {
    pub opts: TaeOptions,
}

impl LatentProjector {
    pub fn new(opts: TaeOptions) -> Self {
        Self { opts }
    }

    /// Train on `features` and return the latent trajectory.
    ///
    /// `num_states` and `num_cluster` only set [`Projection::sweep_width`];
    /// they do not affect the trained network.
    ///
    /// # Errors
    /// - `TaeError::TrainingDivergence` on a non-finite loss.
    /// - `TaeError::Trajectory` when the encoding is invalid.
    pub fn project(
        &self, features: &FeatureTrajectory, num_states: usize, num_cluster: usize,
    ) -> TaeResult<Projection> {
        let seed = self.opts.resolve_seed();
        let mut rng = Xoshiro256Plus::seed_from_u64(seed);
        let mut tae = TimeLaggedAutoencoder::new(features.feature_count(), &self.opts, &mut rng)?;
        let pairs = LaggedPairs::from_features(features);
        let (train, validation) = pairs.split(self.opts.validation_fraction, &mut rng);
        log::info!(
            "Training TAE on {} frames x {} features: {} train / {} validation pairs, {} epochs",
            features.frame_count(),
            features.feature_count(),
            train.len(),
            validation.len(),
            self.opts.n_epochs
        );
        let history = tae.fit(&train, &validation, &self.opts)?;
        let latent = tae.transform(features)?;
        Ok(Projection {
            latent,
            history,
            sweep_width: effective_sweep_width(num_states, num_cluster),
            seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Latent shape and logistic range after training.
    // - Seed determinism of `project`.
    // - Loss decrease on a learnable two-level signal.
    // - Divergence detection and dimension checks.
    //
    // They intentionally DO NOT cover:
    // - Embedding quality on real dynophore data.
    // -------------------------------------------------------------------------

    fn two_level_features(frames: usize) -> FeatureTrajectory {
        let data = Array2::from_shape_fn((frames, 3), |(t, j)| {
            let high = (t / 10) % 2 == 1;
            match (j, high) {
                (0, true) => 1.0,
                (0, false) => 0.0,
                (1, true) => 0.2,
                (1, false) => 0.8,
                _ => 0.5,
            }
        });
        FeatureTrajectory::new(data).expect("valid features")
    }

    fn opts(n_epochs: usize, seed: u64) -> TaeOptions {
        TaeOptions::new(3, n_epochs, 16, 1e-2, 0.5, Some(seed)).expect("valid options")
    }

    #[test]
    // Purpose
    // -------
    // `project` yields one logistic latent value per frame.
    //
    // Given
    // -----
    // - 80 frames × 3 features, 5 epochs, num_states = 2, num_cluster = 15.
    //
    // Expect
    // ------
    // - Latent of shape 80 × 1 in [0, 1]; sweep width 15; 5 validation
    //   entries and 15 training steps (40 train pairs, batch 16 → 3 batches
    //   per epoch).
    fn project_shapes_and_range() {
        // Arrange
        let x = two_level_features(80);
        let projector = LatentProjector::new(opts(5, 1));

        // Act
        let p = projector.project(&x, 2, 15).expect("projection");

        // Assert
        assert_eq!(p.latent.len(), 80);
        assert_eq!(p.latent.latent_dim(), 1);
        assert!(p.latent.records().iter().all(|&z| (0.0..=1.0).contains(&z)));
        assert_eq!(p.sweep_width, 15);
        assert_eq!(p.seed, 1);
        assert_eq!(p.history.validation.len(), 5);
        assert_eq!(p.history.train.len(), 15);
    }

    #[test]
    // Purpose
    // -------
    // Equal seeds give identical latent trajectories.
    //
    // Given
    // -----
    // - Two projections with seed 42 and one with seed 43.
    //
    // Expect
    // ------
    // - First two equal; the third differs.
    fn same_seed_same_latent() {
        let x = two_level_features(60);

        let a = LatentProjector::new(opts(3, 42)).project(&x, 2, 15).expect("projection");
        let b = LatentProjector::new(opts(3, 42)).project(&x, 2, 15).expect("projection");
        let c = LatentProjector::new(opts(3, 43)).project(&x, 2, 15).expect("projection");

        assert_eq!(a.latent, b.latent);
        assert_eq!(a.history, b.history);
        assert_ne!(a.latent, c.latent);
    }

    #[test]
    // Purpose
    // -------
    // Training reduces the validation loss on a learnable signal.
    //
    // Given
    // -----
    // - 200 frames alternating between two levels every 10 frames, 40 epochs.
    //
    // Expect
    // ------
    // - Final validation loss below the first one.
    fn training_reduces_validation_loss() {
        let x = two_level_features(200);

        let p = LatentProjector::new(opts(40, 7)).project(&x, 2, 15).expect("projection");

        let first = p.history.validation[0].1;
        let last = p.history.final_validation_loss().expect("validation losses");
        assert!(last < first, "validation loss did not decrease: {first} -> {last}");
    }

    #[test]
    // Purpose
    // -------
    // A NaN-producing network aborts with TrainingDivergence in the training
    // phase of the first epoch.
    //
    // Given
    // -----
    // - Finite features whose squares overflow to +inf in the loss.
    //
    // Expect
    // ------
    // - TrainingDivergence { phase: Training, epoch: 0, step: 0, .. }.
    fn overflowing_loss_is_divergence() {
        let x = FeatureTrajectory::new(array![[1e300, 0.0], [-1e300, 0.0], [1e300, 0.0]])
            .expect("finite features");
        let projector = LatentProjector::new(opts(2, 0));

        let err = projector.project(&x, 2, 15).unwrap_err();

        assert!(matches!(
            err,
            TaeError::TrainingDivergence { phase: TrainingPhase::Training, epoch: 0, step: 0, .. }
        ));
    }

    #[test]
    // Purpose
    // -------
    // A trained model refuses inputs of a different width.
    //
    // Given
    // -----
    // - Model for 3 features, input with 2.
    //
    // Expect
    // ------
    // - DimensionMismatch { expected: 3, found: 2 }.
    fn transform_checks_feature_count() {
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let tae = TimeLaggedAutoencoder::new(3, &TaeOptions::default(), &mut rng).expect("network");
        let x = FeatureTrajectory::new(array![[0.0, 1.0], [1.0, 0.0]]).expect("valid features");

        assert_eq!(
            tae.transform(&x).unwrap_err(),
            TaeError::DimensionMismatch { expected: 3, found: 2 }
        );
        assert_eq!(tae.feature_count(), 3);
    }

    #[test]
    // Purpose
    // -------
    // One epoch of `fit` moves the encoder through the optimizer's
    // parameter updates and records one loss per mini-batch.
    //
    // Given
    // -----
    // - 41 frames → 40 pairs, all used for training, batch size 16.
    //
    // Expect
    // ------
    // - 3 training losses, no validation losses, and a changed encoding.
    fn fit_updates_network_parameters() {
        // Arrange
        let x = two_level_features(41);
        let o = TaeOptions::new(3, 1, 16, 1e-2, 0.0, Some(3)).expect("valid options");
        let mut rng = Xoshiro256Plus::seed_from_u64(3);
        let mut tae = TimeLaggedAutoencoder::new(3, &o, &mut rng).expect("network");
        let pairs = LaggedPairs::from_features(&x);
        let empty = pairs.select(&[]);
        let before = tae.encode(x.view()).expect("encode");

        // Act
        let history = tae.fit(&pairs, &empty, &o).expect("training");

        // Assert
        let after = tae.encode(x.view()).expect("encode");
        assert_eq!(history.train.len(), 3);
        assert!(history.validation.is_empty());
        assert_ne!(before, after);
    }
}
