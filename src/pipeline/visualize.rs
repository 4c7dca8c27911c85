//! pipeline::visualize — pluggable, best-effort artifact rendering.
//!
//! Purpose
//! -------
//! Hand intermediate results to an external plotting collaborator without
//! tying the numeric pipeline to any drawing back-end.
//!
//! Key behaviors
//! -------------
//! - One [`Artifact`] variant per plot responsibility.
//! - Every render call receives its own [`PlotContext`], built for that call
//!   and dropped afterwards; no drawing state survives between calls.
//! - A failing render yields a [`VisualizationError`] that the pipeline
//!   records as a non-fatal diagnostic failure.
use crate::pipeline::options::ArtifactTarget;
use crate::projection::TrainingHistory;
use ndarray::{ArrayView1, ArrayView2};
use std::ops::Range;

/// Plot kinds produced during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    /// Training and validation loss curves of the autoencoder.
    TaeTraining,
    /// Latent value per frame.
    TaeTransform,
    /// Inertia over the diagnostic sweep.
    Elbow,
    /// Score over the diagnostic sweep.
    Scores,
    /// Heatmap of lag-1 transition counts.
    CountMatrix,
    /// Heatmap of the fitted transition matrix.
    TransitionMatrix,
    /// State label per frame.
    DiscretizedTrajectory,
}

impl Artifact {
    /// Every artifact in pipeline order.
    pub const ALL: [Artifact; 7] = [
        Artifact::TaeTraining,
        Artifact::TaeTransform,
        Artifact::Elbow,
        Artifact::Scores,
        Artifact::DiscretizedTrajectory,
        Artifact::CountMatrix,
        Artifact::TransitionMatrix,
    ];

    /// Stable short name, suitable for file stems.
    pub fn name(&self) -> &'static str {
        match self {
            Artifact::TaeTraining => "tae_training",
            Artifact::TaeTransform => "tae_transform",
            Artifact::Elbow => "elbow",
            Artifact::Scores => "scores",
            Artifact::CountMatrix => "msm_count_matrix",
            Artifact::TransitionMatrix => "msm_transition_matrix",
            Artifact::DiscretizedTrajectory => "discretized_trajectory",
        }
    }
}

impl std::fmt::Display for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Per-call rendering context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotContext<'a> {
    pub artifact: Artifact,
    pub target: &'a ArtifactTarget,
}

/// Data handed to the renderer, borrowed from the run's results.
#[derive(Debug, Clone)]
pub enum PlotData<'a> {
    Training(&'a TrainingHistory),
    Latent(ArrayView2<'a, f64>),
    /// Metric indexed by cluster count; only `k_range` is meaningful.
    Curve { k_range: Range<usize>, values: ArrayView1<'a, f64> },
    Heatmap(ArrayView2<'a, f64>),
    Counts(ArrayView2<'a, u64>),
    Labels(ArrayView1<'a, usize>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualizationError {
    pub message: String,
}

impl VisualizationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl std::error::Error for VisualizationError {}

impl std::fmt::Display for VisualizationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Visualization failed: {}", self.message)
    }
}

/// Outcome of a single render call.
pub type RenderResult = Result<(), VisualizationError>;

/// Rendering collaborator.
pub trait Visualizer {
    fn render(&mut self, ctx: PlotContext<'_>, data: PlotData<'_>) -> RenderResult;
}

/// Renders nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullVisualizer;

impl Visualizer for NullVisualizer {
    fn render(&mut self, _ctx: PlotContext<'_>, _data: PlotData<'_>) -> RenderResult {
        Ok(())
    }
}
