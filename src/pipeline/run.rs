//! pipeline::run — end-to-end dynophore → MSM run.
//!
//! Purpose
//! -------
//! Chain the stages in their fixed order:
//! projection → (advisory) diagnostics → state assignment → lag-1 counts →
//! reversible estimation → canonical ordering, rendering artifacts along the
//! way.
//!
//! Key behaviors
//! -------------
//! - Numeric failures abort the run with a [`PipelineError`] carrying the
//!   stage context.
//! - Diagnostic sweep failures and renderer errors are collected in
//!   [`PipelineOutput::failures`] and logged at `warn`; the run continues.
//! - The diagnostic sweep and the state assignment use the same resolved
//!   k-means seed but separate RNG instances, so the sweep (its width, or
//!   whether it runs at all) never changes the discrete trajectory.
//!
//! Invariants & assumptions
//! ------------------------
//! - `latent`, `discrete`, and the input share one frame count.
//! - The raw model keeps the assignment's label order; `canonical` holds
//!   the reordered view.
use crate::clustering::{ClusterError, DiagnosticCurve, assign_states, cluster_diagnostics};
use crate::msm::{
    CanonicalModel, CountMatrix, MarkovStateModel, TransitionMatrix, canonicalize_model,
    count_transitions, estimate_reversible,
};
use crate::pipeline::{
    errors::{DiagnosticFailure, InputShapeSource, PipelineError, PipelineResult},
    options::{ArtifactTarget, PipelineOptions},
    visualize::{Artifact, PlotContext, PlotData, Visualizer},
};
use crate::projection::{LatentProjector, TaeError, TrainingHistory};
use crate::trajectory::{DiscreteTrajectory, FeatureTrajectory, LatentTrajectory};

/// Seeds actually used, for reproducing a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSeeds {
    pub tae: u64,
    pub kmeans: u64,
}

/// Everything a run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub latent: LatentTrajectory,
    pub discrete: DiscreteTrajectory,
    pub model: MarkovStateModel,
    pub canonical: CanonicalModel,
    pub history: TrainingHistory,
    /// `None` when diagnostics were disabled.
    pub diagnostics: Option<DiagnosticCurve>,
    pub sweep_width: usize,
    pub seeds: RunSeeds,
    pub failures: Vec<DiagnosticFailure>,
}

impl PipelineOutput {
    pub fn transition_matrix(&self) -> &TransitionMatrix {
        &self.model.transition
    }

    pub fn count_matrix(&self) -> &CountMatrix {
        &self.model.counts
    }
}

/// Run the full pipeline on `features`.
///
/// # Errors
/// - `PipelineError::InvalidOptions` for zero states or invalid stage
///   options.
/// - `PipelineError::DegenerateClustering` when `num_states` exceeds the
///   frame count (checked before training) or the assignment collapses.
/// - `PipelineError::InputShape` when the encoder rejects the input width.
/// - `PipelineError::TrainingDivergence` on a non-finite training loss or a
///   tensor backend failure during training.
/// - `PipelineError::UnreversibleModel` when a state has no outgoing
///   transitions, a state is never re-entered, or the likelihood
///   maximization fails.
pub fn run_pipeline(
    features: &FeatureTrajectory, opts: &PipelineOptions, viz: &mut dyn Visualizer,
) -> PipelineResult<PipelineOutput> {
    let frames = features.frame_count();
    let n_features = features.feature_count();
    let num_states = opts.num_states;
    if num_states == 0 {
        return Err(PipelineError::InvalidOptions {
            field: "num_states",
            reason: "must be at least 1".to_string(),
        });
    }
    if num_states > frames {
        return Err(PipelineError::DegenerateClustering {
            frames,
            num_states,
            source: ClusterError::TooManyClusters { requested: num_states, frames },
        });
    }
    let mut failures = Vec::new();

    // ---- Projection ----
    let projection = LatentProjector::new(opts.tae)
        .project(features, num_states, opts.num_cluster)
        .map_err(|err| match err {
            TaeError::TrainingDivergence { .. } | TaeError::Backend { .. } => {
                PipelineError::TrainingDivergence {
                    frames,
                    features: n_features,
                    n_epochs: opts.tae.n_epochs,
                    source: err,
                }
            }
            TaeError::InvalidOptions { field, reason } => {
                PipelineError::InvalidOptions { field, reason: reason.to_string() }
            }
            other => PipelineError::InputShape {
                frames,
                features: n_features,
                source: InputShapeSource::Projection(other),
            },
        })?;
    log::info!(
        "Projected {frames} frames to latent dimension {} (final validation loss {:?})",
        projection.latent.latent_dim(),
        projection.history.final_validation_loss()
    );
    render(
        viz,
        &opts.target,
        Artifact::TaeTraining,
        PlotData::Training(&projection.history),
        &mut failures,
    );
    render(
        viz,
        &opts.target,
        Artifact::TaeTransform,
        PlotData::Latent(projection.latent.records()),
        &mut failures,
    );

    // ---- Diagnostics (advisory) ----
    let kmeans_seed = opts.kmeans.resolve_seed();
    let diagnostics = if opts.diagnostics {
        let sweep = cluster_diagnostics(
            &projection.latent,
            projection.sweep_width,
            &opts.kmeans,
            kmeans_seed,
        );
        for (k, err) in &sweep.failures {
            let failure = DiagnosticFailure::from_cluster(*k, err);
            log::warn!("{failure}");
            failures.push(failure);
        }
        let curve = sweep.curve;
        render(
            viz,
            &opts.target,
            Artifact::Elbow,
            PlotData::Curve { k_range: curve.k_range(), values: curve.inertia.view() },
            &mut failures,
        );
        render(
            viz,
            &opts.target,
            Artifact::Scores,
            PlotData::Curve { k_range: curve.k_range(), values: curve.scores.view() },
            &mut failures,
        );
        Some(curve)
    } else {
        None
    };

    // ---- Assignment ----
    let discrete = assign_states(&projection.latent, num_states, &opts.kmeans, kmeans_seed)
        .map_err(|source| PipelineError::DegenerateClustering { frames, num_states, source })?;
    log::info!(
        "Assigned {frames} frames to {num_states} states ({} occupied)",
        discrete.occupied_states()
    );
    render(
        viz,
        &opts.target,
        Artifact::DiscretizedTrajectory,
        PlotData::Labels(discrete.labels()),
        &mut failures,
    );

    // ---- Estimation ----
    let counts = count_transitions(&discrete)
        .map_err(|source| PipelineError::UnreversibleModel { num_states, source })?;
    render(
        viz,
        &opts.target,
        Artifact::CountMatrix,
        PlotData::Counts(counts.view()),
        &mut failures,
    );
    let model = estimate_reversible(&counts, &opts.msm)
        .map_err(|source| PipelineError::UnreversibleModel { num_states, source })?;
    log::info!(
        "Fitted reversible MSM: {} iterations, detailed-balance residual {:.3e}",
        model.outcome.iterations,
        model.detailed_balance_residual()
    );
    render(
        viz,
        &opts.target,
        Artifact::TransitionMatrix,
        PlotData::Heatmap(model.transition.view()),
        &mut failures,
    );

    // ---- Canonical ordering ----
    let canonical = canonicalize_model(&model, &discrete)
        .map_err(|source| PipelineError::Canonicalization { num_states, source })?;
    log::debug!("Canonical state order: {:?}", canonical.order.order());

    if !failures.is_empty() {
        log::warn!("Pipeline finished with {} diagnostic failure(s)", failures.len());
    }
    Ok(PipelineOutput {
        latent: projection.latent,
        discrete,
        model,
        canonical,
        history: projection.history,
        diagnostics,
        sweep_width: projection.sweep_width,
        seeds: RunSeeds { tae: projection.seed, kmeans: kmeans_seed },
        failures,
    })
}

/// Render one artifact in a fresh context, recording any failure.
fn render(
    viz: &mut dyn Visualizer, target: &ArtifactTarget, artifact: Artifact, data: PlotData<'_>,
    failures: &mut Vec<DiagnosticFailure>,
) {
    let ctx = PlotContext { artifact, target };
    if let Err(err) = viz.render(ctx, data) {
        let failure = DiagnosticFailure::from_render(artifact, &err);
        log::warn!("{failure}");
        failures.push(failure);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clustering::KMeansOptions;
    use crate::pipeline::errors::Stage;
    use crate::pipeline::visualize::{NullVisualizer, RenderResult, VisualizationError};
    use crate::projection::TaeOptions;
    use ndarray::Array2;
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256Plus;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Stage chaining and output consistency on a two-state signal.
    // - Isolation of renderer failures.
    // - Independence of the assignment from the diagnostic sweep.
    // - Early rejection of impossible state counts.
    //
    // They intentionally DO NOT cover:
    // - Stage internals (see the per-module tests).
    // -------------------------------------------------------------------------

    fn switching_features(frames: usize, seed: u64) -> FeatureTrajectory {
        let mut rng = Xoshiro256Plus::seed_from_u64(seed);
        let levels = [[0.9, 0.1, 0.8, 0.2], [0.1, 0.9, 0.2, 0.8]];
        let mut state = 0usize;
        let mut data = Array2::<f64>::zeros((frames, 4));
        for t in 0..frames {
            if rng.gen_bool(0.1) {
                state = 1 - state;
            }
            for j in 0..4 {
                data[[t, j]] = levels[state][j] + rng.gen_range(-0.05..0.05);
            }
        }
        FeatureTrajectory::new(data).expect("valid features")
    }

    fn fast_options(num_states: usize) -> PipelineOptions {
        let tae = TaeOptions::new(2, 10, 32, 1e-2, 0.5, Some(5)).expect("valid options");
        let kmeans = KMeansOptions { seed: Some(17), ..KMeansOptions::default() };
        PipelineOptions::new(num_states)
            .expect("valid options")
            .with_num_cluster(5)
            .with_tae(tae)
            .with_kmeans(kmeans)
    }

    #[derive(Default)]
    struct Recorder {
        seen: Vec<Artifact>,
    }

    impl Visualizer for Recorder {
        fn render(&mut self, ctx: PlotContext<'_>, _data: PlotData<'_>) -> RenderResult {
            self.seen.push(ctx.artifact);
            Ok(())
        }
    }

    struct Failing;

    impl Visualizer for Failing {
        fn render(&mut self, ctx: PlotContext<'_>, _data: PlotData<'_>) -> RenderResult {
            Err(VisualizationError::new(format!("cannot draw {}", ctx.artifact)))
        }
    }

    #[test]
    // Purpose
    // -------
    // A two-state run produces consistent artifacts and renders every plot
    // once, in pipeline order.
    //
    // Given
    // -----
    // - 150 frames switching between two noisy levels, num_states = 2.
    //
    // Expect
    // ------
    // - latent/discrete lengths 150, count total 149, fitted rows sum to 1.
    // - Diagnostics of length 5; sweep width 5; seeds echoed.
    // - Seven artifacts rendered in `Artifact::ALL` order; no failures.
    fn two_state_run_is_consistent() {
        // Arrange
        let x = switching_features(150, 1);
        let opts = fast_options(2);
        let mut viz = Recorder::default();

        // Act
        let out = run_pipeline(&x, &opts, &mut viz).expect("pipeline run");

        // Assert
        assert_eq!(out.latent.len(), 150);
        assert_eq!(out.discrete.len(), 150);
        assert_eq!(out.count_matrix().total(), 149);
        for s in out.transition_matrix().row_sums().iter() {
            assert!((s - 1.0).abs() < 1e-6);
        }
        assert_eq!(out.diagnostics.as_ref().map(DiagnosticCurve::num_cluster), Some(5));
        assert_eq!(out.sweep_width, 5);
        assert_eq!(out.seeds, RunSeeds { tae: 5, kmeans: 17 });
        assert_eq!(viz.seen, Artifact::ALL.to_vec());
        assert!(out.failures.is_empty());
    }

    #[test]
    // Purpose
    // -------
    // Renderer failures are recorded but do not change the numeric result.
    //
    // Given
    // -----
    // - The same run with a renderer that always fails.
    //
    // Expect
    // ------
    // - Seven Visualization failures, one per artifact.
    // - Discrete trajectory and transition matrix equal to the clean run.
    fn render_failures_are_non_fatal() {
        let x = switching_features(150, 1);
        let opts = fast_options(2);

        let clean = run_pipeline(&x, &opts, &mut NullVisualizer).expect("pipeline run");
        let noisy = run_pipeline(&x, &opts, &mut Failing).expect("pipeline run");

        assert_eq!(noisy.failures.len(), 7);
        assert!(noisy.failures.iter().all(|f| f.stage == Stage::Visualization));
        assert_eq!(noisy.discrete, clean.discrete);
        assert_eq!(noisy.model.transition, clean.model.transition);
    }

    #[test]
    // Purpose
    // -------
    // The diagnostic sweep never influences the assignment.
    //
    // Given
    // -----
    // - Runs with num_cluster = 3, num_cluster = 8, and diagnostics off.
    //
    // Expect
    // ------
    // - Identical discrete trajectories; diagnostics None when off.
    fn sweep_does_not_influence_assignment() {
        let x = switching_features(120, 2);
        let base = fast_options(2);

        let narrow = run_pipeline(&x, &base.clone().with_num_cluster(3), &mut NullVisualizer)
            .expect("pipeline run");
        let wide = run_pipeline(&x, &base.clone().with_num_cluster(8), &mut NullVisualizer)
            .expect("pipeline run");
        let off = run_pipeline(&x, &base.with_diagnostics(false), &mut NullVisualizer)
            .expect("pipeline run");

        assert_eq!(narrow.discrete, wide.discrete);
        assert_eq!(narrow.discrete, off.discrete);
        assert!(off.diagnostics.is_none());
        assert_eq!(narrow.sweep_width, 4);
    }

    #[test]
    // Purpose
    // -------
    // More states than frames fails before any training.
    //
    // Given
    // -----
    // - Three frames, num_states = 4.
    //
    // Expect
    // ------
    // - DegenerateClustering with TooManyClusters.
    fn too_many_states_fail_early() {
        let x = switching_features(3, 0);
        let opts = fast_options(4);

        let err = run_pipeline(&x, &opts, &mut NullVisualizer).unwrap_err();

        assert_eq!(
            err,
            PipelineError::DegenerateClustering {
                frames: 3,
                num_states: 4,
                source: ClusterError::TooManyClusters { requested: 4, frames: 3 },
            }
        );
    }
}
