//! Errors for k-means state assignment and diagnostic sweeps.
//!
//! [`ClusterError`] separates caller mistakes (cluster counts, options) from
//! degenerate fits (collapse) and backend failures reported by
//! `linfa-clustering`.
use crate::trajectory::errors::TrajectoryError;

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for clustering operations.
pub type ClusterResult<T> = Result<T, ClusterError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ClusterError {
    // ---- Requests ----
    /// Cluster count must be at least one.
    InvalidClusterCount { k: usize },

    /// More clusters requested than frames available.
    TooManyClusters { requested: usize, frames: usize },

    /// Option field failed validation.
    InvalidOptions { field: &'static str, reason: &'static str },

    // ---- Fit ----
    /// Partition has fewer non-empty clusters than requested.
    Collapsed { requested: usize, occupied: usize },

    /// Wrapper for linfa k-means errors.
    Backend { text: String },

    /// Labels could not form a discrete trajectory.
    Trajectory(TrajectoryError),
}

impl std::error::Error for ClusterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClusterError::Trajectory(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for ClusterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Requests ----
            ClusterError::InvalidClusterCount { k } => {
                write!(f, "Invalid cluster count {k}: must be at least 1")
            }
            ClusterError::TooManyClusters { requested, frames } => {
                write!(f, "Requested {requested} clusters for only {frames} frame(s)")
            }
            ClusterError::InvalidOptions { field, reason } => {
                write!(f, "Invalid k-means option '{field}': {reason}")
            }

            // ---- Fit ----
            ClusterError::Collapsed { requested, occupied } => {
                write!(
                    f,
                    "k-means collapsed: {occupied} non-empty cluster(s) for {requested} requested"
                )
            }
            ClusterError::Backend { text } => {
                write!(f, "k-means backend error: {text}")
            }
            ClusterError::Trajectory(err) => {
                write!(f, "Invalid cluster labels: {err}")
            }
        }
    }
}

impl From<TrajectoryError> for ClusterError {
    fn from(err: TrajectoryError) -> Self {
        ClusterError::Trajectory(err)
    }
}

impl From<linfa_clustering::KMeansError> for ClusterError {
    fn from(err: linfa_clustering::KMeansError) -> Self {
        ClusterError::Backend { text: err.to_string() }
    }
}

#[cfg(feature = "python-bindings")]
impl From<ClusterError> for PyErr {
    fn from(err: ClusterError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
