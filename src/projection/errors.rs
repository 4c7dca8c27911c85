//! Errors for the time-lagged autoencoder.
//!
//! [`TaeError`] covers option validation, shape mismatches between a trained
//! model and new input, numerical divergence during training, and failures
//! reported by the candle tensor backend.
use crate::trajectory::errors::TrajectoryError;

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for autoencoder training and projection.
pub type TaeResult<T> = Result<T, TaeError>;

/// Training phase in which a loss was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingPhase {
    Training,
    Validation,
}

impl std::fmt::Display for TrainingPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrainingPhase::Training => write!(f, "training"),
            TrainingPhase::Validation => write!(f, "validation"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaeError {
    // ---- Options ----
    /// Option field failed validation.
    InvalidOptions { field: &'static str, reason: &'static str },

    // ---- Shape ----
    /// Input feature count differs from the one the model was built for.
    DimensionMismatch { expected: usize, found: usize },

    // ---- Numerics ----
    /// A training or validation loss became NaN/±inf.
    TrainingDivergence { phase: TrainingPhase, epoch: usize, step: usize, loss: f64 },

    /// Encoded output could not form a latent trajectory.
    Trajectory(TrajectoryError),

    // ---- Backend ----
    /// Tensor allocation, shape, or autograd failure inside candle.
    Backend { message: String },
}

impl std::error::Error for TaeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TaeError::Trajectory(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Options ----
            TaeError::InvalidOptions { field, reason } => {
                write!(f, "Invalid autoencoder option '{field}': {reason}")
            }

            // ---- Shape ----
            TaeError::DimensionMismatch { expected, found } => {
                write!(f, "Autoencoder expects {expected} feature(s) per frame, got {found}")
            }

            // ---- Numerics ----
            TaeError::TrainingDivergence { phase, epoch, step, loss } => {
                write!(f, "Non-finite {phase} loss {loss} at epoch {epoch}, step {step}")
            }
            TaeError::Trajectory(err) => {
                write!(f, "Invalid latent output: {err}")
            }

            // ---- Backend ----
            TaeError::Backend { message } => {
                write!(f, "Tensor backend error: {message}")
            }
        }
    }
}

impl From<TrajectoryError> for TaeError {
    fn from(err: TrajectoryError) -> Self {
        TaeError::Trajectory(err)
    }
}

impl From<candle_core::Error> for TaeError {
    fn from(err: candle_core::Error) -> Self {
        TaeError::Backend { message: err.to_string() }
    }
}

#[cfg(feature = "python-bindings")]
impl From<TaeError> for PyErr {
    fn from(err: TaeError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
