//! Integration tests for the dynophore → MSM pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end run: feature trajectory → autoencoder latent
//!   trajectory → k-means states → lag-1 counts → reversible transition
//!   matrix → canonical order.
//! - Check the cross-stage properties that no single module can guarantee
//!   on its own (shared frame counts, count totals, row sums, canonical
//!   relabeling consistency, diagnostics non-influence).
//!
//! Coverage
//! --------
//! - `pipeline::run_pipeline` with `NullVisualizer` and a recording
//!   visualizer.
//! - `msm::{count_transitions, estimate_reversible, canonicalize}` on a
//!   hand-built discrete trajectory.
//! - Error mapping for unreversible models (unfit and transient states).
//!
//! Exclusions
//! ----------
//! - Stage internals (autoencoder network, k-means wrapper); see the unit
//!   tests of each module.
//! - Python bindings.
use dyno_msm::{
    clustering::KMeansOptions,
    msm::{MsmError, MsmOptions, canonicalize, count_transitions, estimate_reversible},
    pipeline::{
        NullVisualizer, PipelineError, PipelineOptions, PlotContext, PlotData, RenderResult,
        Visualizer, run_pipeline,
    },
    projection::TaeOptions,
    trajectory::{DiscreteTrajectory, FeatureTrajectory},
};
use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Three-level dynophore-like signal.
///
/// Each frame carries five interaction intensities. The hidden state moves
/// between three levels with dwell probability 0.92 and the features get
/// uniform noise of ±0.05.
fn three_level_features(frames: usize, seed: u64) -> FeatureTrajectory {
    let mut rng = Xoshiro256Plus::seed_from_u64(seed);
    let levels = [
        [0.9, 0.1, 0.1, 0.8, 0.0],
        [0.1, 0.9, 0.1, 0.2, 0.5],
        [0.1, 0.1, 0.9, 0.5, 1.0],
    ];
    let mut state = 0usize;
    let mut data = Array2::<f64>::zeros((frames, 5));
    for t in 0..frames {
        if rng.gen_bool(0.08) {
            state = (state + rng.gen_range(1..3)) % 3;
        }
        for j in 0..5 {
            data[[t, j]] = levels[state][j] + rng.gen_range(-0.05..0.05);
        }
    }
    FeatureTrajectory::new(data).expect("valid features")
}

fn options(num_states: usize, num_cluster: usize) -> PipelineOptions {
    let tae = TaeOptions::new(2, 15, 64, 5e-3, 0.5, Some(11)).expect("valid options");
    let kmeans = KMeansOptions { seed: Some(3), ..KMeansOptions::default() };
    PipelineOptions::new(num_states)
        .expect("valid options")
        .with_num_cluster(num_cluster)
        .with_tae(tae)
        .with_kmeans(kmeans)
}

struct CountingVisualizer {
    calls: usize,
}

impl Visualizer for CountingVisualizer {
    fn render(&mut self, _ctx: PlotContext<'_>, _data: PlotData<'_>) -> RenderResult {
        self.calls += 1;
        Ok(())
    }
}

#[test]
// Purpose
// -------
// Cross-stage invariants hold on a realistic three-state run.
//
// Given
// -----
// - 300 frames × 5 features, num_states = 3, num_cluster = 15.
//
// Expect
// ------
// - latent and discrete have 300 entries; labels < 3.
// - Count total = 299; every fitted row sums to 1 within 1e-6.
// - π sums to 1 and detailed balance holds within 1e-8.
// - The canonical matrix has a non-increasing diagonal, equals the raw
//   matrix conjugated by the order, and the relabeled trajectory matches
//   the inverse permutation.
// - Seven render calls.
fn three_state_pipeline_invariants() {
    // Arrange
    init_logging();
    let x = three_level_features(300, 42);
    let opts = options(3, 15);
    let mut viz = CountingVisualizer { calls: 0 };

    // Act
    let out = run_pipeline(&x, &opts, &mut viz).expect("pipeline run");

    // Assert
    assert_eq!(out.latent.len(), 300);
    assert_eq!(out.discrete.len(), 300);
    assert!(out.discrete.labels().iter().all(|&s| s < 3));
    assert_eq!(out.count_matrix().total(), 299);
    for (i, s) in out.transition_matrix().row_sums().iter().enumerate() {
        if out.count_matrix().outgoing(i) > 0 {
            assert!((s - 1.0).abs() < 1e-6, "row {i} sums to {s}");
        }
    }
    let pi_sum: f64 = out.model.stationary.view().sum();
    assert!((pi_sum - 1.0).abs() < 1e-9);
    assert!(out.model.detailed_balance_residual() < 1e-8);

    let order = out.canonical.order.order();
    let t = out.transition_matrix().view();
    let tc = &out.canonical.transition_matrix;
    for i in 0..3 {
        if i > 0 {
            assert!(tc[[i - 1, i - 1]] >= tc[[i, i]]);
        }
        for j in 0..3 {
            assert_eq!(tc[[i, j]], t[[order[i], order[j]]]);
        }
    }
    let inverse = out.canonical.order.inverse();
    for (raw, canon) in out.discrete.labels().iter().zip(out.canonical.discrete.labels().iter()) {
        assert_eq!(*canon, inverse[*raw]);
    }
    assert_eq!(viz.calls, 7);
}

#[test]
// Purpose
// -------
// Widening the diagnostic sweep never changes the assignment.
//
// Given
// -----
// - The same input and seeds with num_cluster = 4 (widened to 6) and 15.
//
// Expect
// ------
// - Identical discrete trajectories and transition matrices; sweep widths
//   6 and 15.
fn diagnostic_bound_does_not_change_states() {
    init_logging();
    let x = three_level_features(200, 7);

    let narrow = run_pipeline(&x, &options(3, 4), &mut NullVisualizer).expect("pipeline run");
    let wide = run_pipeline(&x, &options(3, 15), &mut NullVisualizer).expect("pipeline run");

    assert_eq!(narrow.sweep_width, 6);
    assert_eq!(wide.sweep_width, 15);
    assert_eq!(narrow.discrete, wide.discrete);
    assert_eq!(narrow.model.transition, wide.model.transition);
}

#[test]
// Purpose
// -------
// The MSM stages compose on a hand-built trajectory, and canonicalization is
// idempotent on their output.
//
// Given
// -----
// - Labels 0 0 0 1 1 2 2 2 2 0 1 2 0 over three states.
//
// Expect
// ------
// - Count total 12, rows summing to 1, canonicalize(canonicalize(T)) equal
//   to canonicalize(T) with the identity order on the second pass.
fn msm_stages_compose_and_canonicalization_is_idempotent() {
    let labels = Array1::from(vec![0, 0, 0, 1, 1, 2, 2, 2, 2, 0, 1, 2, 0]);
    let d = DiscreteTrajectory::new(labels, 3).expect("valid labels");

    let counts = count_transitions(&d).expect("counts");
    let model = estimate_reversible(&counts, &MsmOptions::default()).expect("reversible fit");
    let (once, _) = canonicalize(model.transition.view()).expect("square");
    let (twice, second) = canonicalize(once.view()).expect("square");

    assert_eq!(counts.total(), 12);
    for s in model.transition.row_sums().iter() {
        assert!((s - 1.0).abs() < 1e-6);
    }
    assert_eq!(once, twice);
    assert_eq!(second.order(), &[0, 1, 2]);
}

#[test]
// Purpose
// -------
// A state that is only ever left at the final frame is reported as an
// unreversible model, distinct from clustering failures.
//
// Given
// -----
// - Labels 0 1 0 1 2: state 2 has no outgoing transitions.
//
// Expect
// ------
// - MsmError::UnfitState { state: 2, num_states: 3 } from the estimator,
//   and PipelineError::UnreversibleModel reports the estimation stage.
fn state_without_exits_is_unreversible() {
    let d = DiscreteTrajectory::new(Array1::from(vec![0, 1, 0, 1, 2]), 3).expect("valid labels");
    let counts = count_transitions(&d).expect("counts");

    let err = estimate_reversible(&counts, &MsmOptions::default()).unwrap_err();

    assert_eq!(err, MsmError::UnfitState { state: 2, num_states: 3 });
    let wrapped = PipelineError::UnreversibleModel { num_states: 3, source: err };
    assert_eq!(wrapped.stage(), dyno_msm::pipeline::Stage::Estimation);
}

#[test]
// Purpose
// -------
// A trajectory that starts in a state it never revisits is reported as an
// unreversible model instead of a fit with vanishing stationary mass.
//
// Given
// -----
// - Labels 0 1 1 1 1 1 2 2 2 1 1: state 0 is left once and never re-entered.
//
// Expect
// ------
// - MsmError::Disconnected naming classes [0] and [1, 2]; the pipeline
//   wrapper names the estimation stage and keeps the source.
fn transient_start_is_unreversible() {
    let labels = Array1::from(vec![0, 1, 1, 1, 1, 1, 2, 2, 2, 1, 1]);
    let d = DiscreteTrajectory::new(labels, 3).expect("valid labels");
    let counts = count_transitions(&d).expect("counts");

    let err = estimate_reversible(&counts, &MsmOptions::default()).unwrap_err();

    assert_eq!(err, MsmError::Disconnected { classes: vec![vec![0], vec![1, 2]] });
    let wrapped = PipelineError::UnreversibleModel { num_states: 3, source: err.clone() };
    assert_eq!(wrapped.stage(), dyno_msm::pipeline::Stage::Estimation);
    assert!(wrapped.to_string().contains("communicating classes"));
    assert_eq!(std::error::Error::source(&wrapped).map(|e| e.to_string()), Some(err.to_string()));
}
