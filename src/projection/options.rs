//! Configuration for the time-lagged autoencoder.
use crate::projection::errors::{TaeError, TaeResult};

/// Epoch budget of the quick training schedule.
pub const QUICK_EPOCHS: usize = 50;

/// Epoch budget of the thorough training schedule.
pub const THOROUGH_EPOCHS: usize = 150;

/// `TaeOptions` — architecture and training settings.
///
/// Fields
/// ------
/// - `size`: hidden-width multiplier; the hidden layer has `2 · size · F`
///   units for `F` input features (default 3).
/// - `n_epochs`: full passes over the training partition (default 50).
/// - `batch_size`: training mini-batch size (default 64).
/// - `learning_rate`: Adam step size (default 1e-3).
/// - `validation_fraction`: share of lagged pairs held out, rounded down
///   (default 0.5).
/// - `seed`: seed for weight initialization and the train/validation split;
///   `None` draws one per run.
///
/// Invariants
/// ----------
/// - `size ≥ 1`, `n_epochs ≥ 1`, `batch_size ≥ 1`.
/// - `learning_rate` finite and > 0; `validation_fraction` in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaeOptions {
    pub size: usize,
    pub n_epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub validation_fraction: f64,
    pub seed: Option<u64>,
}

impl TaeOptions {
    /// # Errors
    /// - `TaeError::InvalidOptions` naming the offending field.
    pub fn new(
        size: usize, n_epochs: usize, batch_size: usize, learning_rate: f64,
        validation_fraction: f64, seed: Option<u64>,
    ) -> TaeResult<Self> {
        if size == 0 {
            return Err(TaeError::InvalidOptions { field: "size", reason: "must be at least 1" });
        }
        if n_epochs == 0 {
            return Err(TaeError::InvalidOptions {
                field: "n_epochs",
                reason: "must be at least 1",
            });
        }
        if batch_size == 0 {
            return Err(TaeError::InvalidOptions {
                field: "batch_size",
                reason: "must be at least 1",
            });
        }
        if !learning_rate.is_finite() || learning_rate <= 0.0 {
            return Err(TaeError::InvalidOptions {
                field: "learning_rate",
                reason: "must be finite and positive",
            });
        }
        if !(0.0..1.0).contains(&validation_fraction) {
            return Err(TaeError::InvalidOptions {
                field: "validation_fraction",
                reason: "must lie in [0, 1)",
            });
        }
        Ok(Self { size, n_epochs, batch_size, learning_rate, validation_fraction, seed })
    }

    /// Default settings with the quick (50 epoch) schedule.
    pub fn quick() -> Self {
        Self { n_epochs: QUICK_EPOCHS, ..Self::default() }
    }

    /// Default settings with the thorough (150 epoch) schedule.
    pub fn thorough() -> Self {
        Self { n_epochs: THOROUGH_EPOCHS, ..Self::default() }
    }

    /// Hidden-layer width for `feature_count` inputs.
    pub fn hidden_units(&self, feature_count: usize) -> usize {
        2 * self.size * feature_count
    }

    /// Seed to use for this run: the configured one or a fresh random draw.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

impl Default for TaeOptions {
    fn default() -> Self {
        Self {
            size: 3,
            n_epochs: QUICK_EPOCHS,
            batch_size: 64,
            learning_rate: 1e-3,
            validation_fraction: 0.5,
            seed: None,
        }
    }
}
