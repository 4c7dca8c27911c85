//! Pipeline-level errors and non-fatal diagnostic failures.
//!
//! Purpose
//! -------
//! Re-express stage errors in the caller-facing taxonomy: bad input shape,
//! training divergence, degenerate clustering, unreversible model, and
//! invalid options. Each fatal variant carries the stage context the caller
//! needs to react (frame and feature counts, requested states, epochs) and
//! keeps the originating error as its `source()`.
//!
//! Conventions
//! -----------
//! - Fatal errors abort the run and are returned as [`PipelineError`].
//! - Diagnostic and visualization problems are collected as
//!   [`DiagnosticFailure`] values in the run output and logged at `warn`.
use crate::clustering::ClusterError;
use crate::msm::MsmError;
use crate::pipeline::visualize::Artifact;
use crate::projection::TaeError;
use crate::trajectory::TrajectoryError;

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for pipeline runs.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Pipeline stage, used to tag failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Input,
    Projection,
    Diagnostics,
    Assignment,
    Estimation,
    Canonicalization,
    Visualization,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Input => "input",
            Stage::Projection => "projection",
            Stage::Diagnostics => "diagnostics",
            Stage::Assignment => "assignment",
            Stage::Estimation => "estimation",
            Stage::Canonicalization => "canonicalization",
            Stage::Visualization => "visualization",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Feature trajectory is unusable (too few frames, no or ragged features,
    /// non-finite values, or a width the model was not built for).
    InputShape { frames: usize, features: usize, source: InputShapeSource },

    /// Autoencoder training produced a non-finite loss or the tensor backend
    /// failed.
    TrainingDivergence { frames: usize, features: usize, n_epochs: usize, source: TaeError },

    /// State assignment could not produce `num_states` occupied states.
    DegenerateClustering { frames: usize, num_states: usize, source: ClusterError },

    /// Reversible estimation failed (e.g., a state without outgoing
    /// transitions, a transient state, or an optimizer failure).
    UnreversibleModel { num_states: usize, source: MsmError },

    /// Canonical reordering failed.
    Canonicalization { num_states: usize, source: MsmError },

    /// Pipeline option failed validation.
    InvalidOptions { field: &'static str, reason: String },
}

/// Underlying cause of a [`PipelineError::InputShape`].
#[derive(Debug, Clone, PartialEq)]
pub enum InputShapeSource {
    Trajectory(TrajectoryError),
    Projection(TaeError),
}

impl std::fmt::Display for InputShapeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputShapeSource::Trajectory(err) => write!(f, "{err}"),
            InputShapeSource::Projection(err) => write!(f, "{err}"),
        }
    }
}

impl PipelineError {
    /// Stage in which the error arose.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::InputShape { .. } | PipelineError::InvalidOptions { .. } => Stage::Input,
            PipelineError::TrainingDivergence { .. } => Stage::Projection,
            PipelineError::DegenerateClustering { .. } => Stage::Assignment,
            PipelineError::UnreversibleModel { .. } => Stage::Estimation,
            PipelineError::Canonicalization { .. } => Stage::Canonicalization,
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::InputShape { source: InputShapeSource::Trajectory(err), .. } => {
                Some(err)
            }
            PipelineError::InputShape { source: InputShapeSource::Projection(err), .. } => {
                Some(err)
            }
            PipelineError::TrainingDivergence { source, .. } => Some(source),
            PipelineError::DegenerateClustering { source, .. } => Some(source),
            PipelineError::UnreversibleModel { source, .. }
            | PipelineError::Canonicalization { source, .. } => Some(source),
            PipelineError::InvalidOptions { .. } => None,
        }
    }
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::InputShape { frames, features, source } => {
                write!(f, "Invalid input shape ({frames} frames x {features} features): {source}")
            }
            PipelineError::TrainingDivergence { frames, features, n_epochs, source } => {
                write!(
                    f,
                    "Autoencoder training diverged ({frames} frames x {features} features, \
                     {n_epochs} epochs): {source}"
                )
            }
            PipelineError::DegenerateClustering { frames, num_states, source } => {
                write!(
                    f,
                    "Degenerate clustering into {num_states} states over {frames} frames: {source}"
                )
            }
            PipelineError::UnreversibleModel { num_states, source } => {
                write!(f, "Cannot fit a reversible {num_states}-state model: {source}")
            }
            PipelineError::Canonicalization { num_states, source } => {
                write!(f, "Cannot reorder {num_states}-state model: {source}")
            }
            PipelineError::InvalidOptions { field, reason } => {
                write!(f, "Invalid pipeline option '{field}': {reason}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<PipelineError> for PyErr {
    fn from(err: PipelineError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Non-fatal failure recorded during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticFailure {
    pub stage: Stage,
    /// Plot involved, if the failure came from a renderer.
    pub artifact: Option<Artifact>,
    pub message: String,
}

impl DiagnosticFailure {
    pub fn from_cluster(k: usize, err: &ClusterError) -> Self {
        Self { stage: Stage::Diagnostics, artifact: None, message: format!("k={k}: {err}") }
    }

    pub fn from_render(artifact: Artifact, err: &dyn std::error::Error) -> Self {
        Self { stage: Stage::Visualization, artifact: Some(artifact), message: err.to_string() }
    }
}

impl std::fmt::Display for DiagnosticFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.artifact {
            Some(artifact) => write!(f, "[{}:{artifact}] {}", self.stage, self.message),
            None => write!(f, "[{}] {}", self.stage, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    // Purpose
    // -------
    // Fatal errors expose their stage, context, and source.
    //
    // Given
    // -----
    // - An UnreversibleModel wrapping UnfitState and a DegenerateClustering
    //   wrapping Collapsed.
    //
    // Expect
    // ------
    // - Stages Estimation / Assignment, messages mention the state count,
    //   source() is present.
    fn errors_carry_context() {
        let unrev = PipelineError::UnreversibleModel {
            num_states: 3,
            source: MsmError::UnfitState { state: 2, num_states: 3 },
        };
        let degen = PipelineError::DegenerateClustering {
            frames: 10,
            num_states: 4,
            source: ClusterError::Collapsed { requested: 4, occupied: 2 },
        };

        assert_eq!(unrev.stage(), Stage::Estimation);
        assert_eq!(degen.stage(), Stage::Assignment);
        assert!(unrev.to_string().contains("3-state"));
        assert!(degen.to_string().contains("10 frames"));
        assert!(unrev.source().is_some());
        assert!(degen.source().is_some());
    }

    #[test]
    // Purpose
    // -------
    // Diagnostic failures render with stage and artifact tags.
    //
    // Given
    // -----
    // - A sweep failure at k = 4 and a render failure for the elbow plot.
    //
    // Expect
    // ------
    // - "[diagnostics] k=4: …" and "[visualization:elbow] …".
    fn diagnostic_failure_display() {
        let sweep = DiagnosticFailure::from_cluster(
            4,
            &ClusterError::Collapsed { requested: 4, occupied: 3 },
        );
        let render = DiagnosticFailure::from_render(
            Artifact::Elbow,
            &crate::pipeline::visualize::VisualizationError::new("disk full"),
        );

        assert!(sweep.to_string().starts_with("[diagnostics] k=4: "));
        assert_eq!(render.to_string(), "[visualization:elbow] Visualization failed: disk full");
    }
}
