//! pipeline — orchestration of the dynophore-to-MSM workflow.
//!
//! Purpose
//! -------
//! Expose [`run_pipeline`], which turns a [`FeatureTrajectory`] into a latent
//! trajectory, a discrete state trajectory, lag-1 counts, a reversible
//! transition matrix, and its canonical reordering.
//!
//! Key behaviors
//! -------------
//! - [`PipelineOptions`] bundles per-stage settings plus an opaque
//!   [`ArtifactTarget`] for plots.
//! - Plot rendering goes through the [`Visualizer`] trait with one
//!   [`PlotContext`] per call; [`NullVisualizer`] renders nothing.
//! - Fatal errors map to [`PipelineError`]; non-fatal problems are collected
//!   as [`DiagnosticFailure`]s.
//!
//! [`FeatureTrajectory`]: crate::trajectory::FeatureTrajectory

pub mod errors;
pub mod options;
pub mod run;
pub mod visualize;

pub use self::errors::{DiagnosticFailure, InputShapeSource, PipelineError, PipelineResult, Stage};
pub use self::options::{ArtifactTarget, DEFAULT_NUM_CLUSTER, PipelineOptions};
pub use self::run::{PipelineOutput, RunSeeds, run_pipeline};
pub use self::visualize::{
    Artifact, NullVisualizer, PlotContext, PlotData, RenderResult, VisualizationError, Visualizer,
};

pub mod prelude {
    pub use super::errors::{DiagnosticFailure, PipelineError, PipelineResult};
    pub use super::options::{ArtifactTarget, PipelineOptions};
    pub use super::run::{PipelineOutput, run_pipeline};
    pub use super::visualize::{NullVisualizer, Visualizer};
}
