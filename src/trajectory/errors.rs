//! Errors for trajectory containers (feature, latent, and discrete series).
//!
//! [`TrajectoryError`] reports shape and value problems detected at the
//! boundary where raw arrays enter the pipeline. Indices are 0-based.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for trajectory construction and transformation.
pub type TrajectoryResult<T> = Result<T, TrajectoryError>;

#[derive(Debug, Clone, PartialEq)]
pub enum TrajectoryError {
    // ---- Shape ----
    /// Fewer than two frames; no lag-1 pair exists.
    TooFewFrames { frames: usize },

    /// Frames carry no features.
    NoFeatures,

    /// A row's width differs from the declared feature count.
    RaggedRow { row: usize, expected: usize, found: usize },

    /// Latent trajectory has no frames.
    EmptyLatent,

    /// Latent dimension must be at least one.
    ZeroLatentDim,

    // ---- Values ----
    /// A value is NaN/±inf.
    NonFiniteValue { frame: usize, column: usize, value: f64 },

    // ---- Labels ----
    /// Discrete trajectories need at least one state.
    ZeroStates,

    /// A label lies outside `[0, num_states)`.
    LabelOutOfRange { index: usize, label: usize, num_states: usize },

    /// A relabeling permutation does not cover exactly `num_states` states.
    PermutationMismatch { expected: usize, found: usize },
}

impl std::error::Error for TrajectoryError {}

impl std::fmt::Display for TrajectoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Shape ----
            TrajectoryError::TooFewFrames { frames } => {
                write!(f, "Trajectory has {frames} frame(s); at least 2 are required")
            }
            TrajectoryError::NoFeatures => {
                write!(f, "Trajectory frames must carry at least one feature")
            }
            TrajectoryError::RaggedRow { row, expected, found } => {
                write!(f, "Row {row} has {found} feature(s); expected {expected}")
            }
            TrajectoryError::EmptyLatent => {
                write!(f, "Latent trajectory is empty")
            }
            TrajectoryError::ZeroLatentDim => {
                write!(f, "Latent dimension must be at least 1")
            }

            // ---- Values ----
            TrajectoryError::NonFiniteValue { frame, column, value } => {
                write!(f, "Non-finite value {value} at frame {frame}, column {column}")
            }

            // ---- Labels ----
            TrajectoryError::ZeroStates => {
                write!(f, "Discrete trajectory needs at least one state")
            }
            TrajectoryError::LabelOutOfRange { index, label, num_states } => {
                write!(f, "Label {label} at index {index} is outside [0, {num_states})")
            }
            TrajectoryError::PermutationMismatch { expected, found } => {
                write!(f, "Permutation covers {found} state(s); expected {expected}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<TrajectoryError> for PyErr {
    fn from(err: TrajectoryError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
