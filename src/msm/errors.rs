//! Errors for transition counting, reversible estimation, and canonical
//! reordering.
//!
//! [`MsmError`] keeps an unfit state (a state with no observed outgoing
//! transition) and a disconnected count graph distinct from optimizer
//! failures, so callers can react by lowering `num_states` instead of tuning
//! tolerances.
use crate::optimization::errors::OptError;
use crate::trajectory::errors::TrajectoryError;

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for MSM operations.
pub type MsmResult<T> = Result<T, MsmError>;

#[derive(Debug, Clone, PartialEq)]
pub enum MsmError {
    // ---- Counting ----
    /// Fewer than two frames; no lag-1 transition can be counted.
    TooShort { frames: usize },

    // ---- Estimation ----
    /// State has no observed outgoing transition; reversibility cannot be satisfied.
    UnfitState { state: usize, num_states: usize },

    /// Observed transitions split the states into several communicating
    /// classes; the reversible MLE would put zero mass on all but one.
    Disconnected { classes: Vec<Vec<usize>> },

    /// The reversible likelihood could not be maximized.
    Optimization(OptError),

    // ---- Matrices / permutations ----
    /// Matrix is not square.
    NotSquare { rows: usize, cols: usize },

    /// Vector is not a permutation of `[0, len)`.
    InvalidPermutation { len: usize, reason: &'static str },

    /// Relabeling the discrete trajectory failed.
    Trajectory(TrajectoryError),

    // ---- Extension points ----
    /// Hook exists but has no implementation yet.
    NotImplemented { hook: &'static str },
}

impl std::error::Error for MsmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MsmError::Optimization(err) => Some(err),
            MsmError::Trajectory(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for MsmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Counting ----
            MsmError::TooShort { frames } => {
                write!(f, "Discrete trajectory has {frames} frame(s); at least 2 are required")
            }

            // ---- Estimation ----
            MsmError::UnfitState { state, num_states } => {
                write!(
                    f,
                    "State {state} of {num_states} has no observed outgoing transition; \
                     reversible estimation is impossible"
                )
            }
            MsmError::Disconnected { classes } => {
                write!(
                    f,
                    "Observed transitions split the states into {} communicating classes \
                     {classes:?}; reversible estimation needs a single class",
                    classes.len()
                )
            }
            MsmError::Optimization(err) => {
                write!(f, "Reversible likelihood maximization failed: {err}")
            }

            // ---- Matrices / permutations ----
            MsmError::NotSquare { rows, cols } => {
                write!(f, "Matrix must be square, got {rows}x{cols}")
            }
            MsmError::InvalidPermutation { len, reason } => {
                write!(f, "Invalid permutation of length {len}: {reason}")
            }
            MsmError::Trajectory(err) => {
                write!(f, "Relabeling failed: {err}")
            }

            // ---- Extension points ----
            MsmError::NotImplemented { hook } => {
                write!(f, "{hook} is not implemented")
            }
        }
    }
}

impl From<OptError> for MsmError {
    fn from(err: OptError) -> Self {
        MsmError::Optimization(err)
    }
}

impl From<TrajectoryError> for MsmError {
    fn from(err: TrajectoryError) -> Self {
        MsmError::Trajectory(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<MsmError> for PyErr {
    fn from(err: MsmError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
