//! dyno_msm — time-lagged autoencoder discretization and reversible Markov
//! state models for dynophore interaction trajectories.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the pipeline to Python via the `dyno_msm` extension module.
//!
//! Key behaviors
//! -------------
//! - Re-export the core modules: `trajectory` (data model), `projection`
//!   (time-lagged autoencoder), `clustering` (k-means diagnostics and state
//!   assignment), `msm` (counts, reversible estimation, canonical order),
//!   `optimization` (L-BFGS log-likelihood maximizer), and `pipeline`
//!   (orchestration and visualization seam).
//! - With `python-bindings`, define the `#[pyclass]` result wrapper, the
//!   `run_pipeline` / `sort_markov_matrix` functions, and the `dyno_msm`
//!   module initializer with its `markov_models` submodule.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file performs only
//!   FFI glue, input conversion, and error mapping.
//! - Python callers receive plain nested lists; matrices are row-major.
//!
//! Conventions
//! -----------
//! - Errors from core code propagate as their typed enums internally and are
//!   converted to `PyErr` at the PyO3 boundary.
//! - State labels in the raw outputs follow the k-means assignment; the
//!   `canonical_*` accessors use the descending self-transition order.
//!
//! Downstream usage
//! ----------------
//! - Rust code depends on [`pipeline::run_pipeline`] or on the individual
//!   stages directly and can ignore the PyO3 items.
//! - Python imports `dyno_msm` directly; the functions are also available
//!   at the top level of the module.

pub mod clustering;
pub mod msm;
pub mod optimization;
pub mod pipeline;
pub mod projection;
pub mod trajectory;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    msm::MsmError,
    pipeline::{NullVisualizer, PipelineOutput},
    utils::{
        build_pipeline_options, extract_f64_rows, extract_feature_trajectory, extract_msm_opts,
    },
};

#[cfg(feature = "python-bindings")]
fn matrix_to_rows<A: Clone>(m: ndarray::ArrayView2<'_, A>) -> Vec<Vec<A>> {
    m.rows().into_iter().map(|r| r.to_vec()).collect()
}

/// MarkovModelRun — Python-facing view of a finished pipeline run.
///
/// Purpose
/// -------
/// Hold a [`PipelineOutput`] and expose its artifacts as Python properties.
///
/// Fields
/// ------
/// - `inner`: [`PipelineOutput`]
///   Complete Rust-side result; every accessor copies out of it.
///
/// Notes
/// -----
/// - Diagnostic curves are empty lists when diagnostics were disabled.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "dyno_msm.markov_models")]
pub struct MarkovModelRun {
    inner: PipelineOutput,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl MarkovModelRun {
    #[getter]
    pub fn transition_matrix(&self) -> Vec<Vec<f64>> {
        matrix_to_rows(self.inner.transition_matrix().view())
    }

    #[getter]
    pub fn count_matrix(&self) -> Vec<Vec<u64>> {
        matrix_to_rows(self.inner.count_matrix().view())
    }

    #[getter]
    pub fn discrete_trajectory(&self) -> Vec<usize> {
        self.inner.discrete.labels().to_vec()
    }

    #[getter]
    pub fn latent_trajectory(&self) -> Vec<f64> {
        self.inner.latent.column(0).to_vec()
    }

    #[getter]
    pub fn stationary_distribution(&self) -> Vec<f64> {
        self.inner.model.stationary.view().to_vec()
    }

    #[getter]
    pub fn canonical_order(&self) -> Vec<usize> {
        self.inner.canonical.order.order().to_vec()
    }

    #[getter]
    pub fn canonical_transition_matrix(&self) -> Vec<Vec<f64>> {
        matrix_to_rows(self.inner.canonical.transition_matrix.view())
    }

    #[getter]
    pub fn canonical_discrete_trajectory(&self) -> Vec<usize> {
        self.inner.canonical.discrete.labels().to_vec()
    }

    #[getter]
    pub fn training_loss(&self) -> Vec<(usize, f64)> {
        self.inner.history.train.clone()
    }

    #[getter]
    pub fn validation_loss(&self) -> Vec<(usize, f64)> {
        self.inner.history.validation.clone()
    }

    #[getter]
    pub fn elbow(&self) -> Vec<f64> {
        self.inner.diagnostics.as_ref().map(|c| c.inertia.to_vec()).unwrap_or_default()
    }

    #[getter]
    pub fn scores(&self) -> Vec<f64> {
        self.inner.diagnostics.as_ref().map(|c| c.scores.to_vec()).unwrap_or_default()
    }

    #[getter]
    pub fn sweep_width(&self) -> usize {
        self.inner.sweep_width
    }

    #[getter]
    pub fn seeds(&self) -> (u64, u64) {
        (self.inner.seeds.tae, self.inner.seeds.kmeans)
    }

    #[getter]
    pub fn failures(&self) -> Vec<String> {
        self.inner.failures.iter().map(ToString::to_string).collect()
    }

    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.model.outcome.converged
    }
}

/// Run the dynophore → MSM pipeline.
///
/// Parameters
/// ----------
/// - `features`: 2-D array-like `[frames × features]` of float64.
/// - `num_states`: number of discrete states (≥ 1).
/// - `size`: hidden-width multiplier of the autoencoder (default 3).
/// - `num_cluster`: exclusive bound of the diagnostic sweep (default 15).
/// - `n_epochs`: autoencoder epochs (default 50).
/// - `seed`: shared seed for training and k-means; `None` for random.
/// - `save_path`, `prefix`: opaque artifact destination.
/// - `diagnostics`: run the elbow/score sweep (default `True`).
/// - `tol_grad`, `max_iter`, `line_searcher`: reversible-MLE optimizer knobs.
///
/// Errors
/// ------
/// - `TypeError` for non-numeric input, `ValueError` for every pipeline
///   failure.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (
        features,
        num_states,
        size = 3,
        num_cluster = 15,
        n_epochs = 50,
        seed = None,
        save_path = None,
        prefix = None,
        diagnostics = true,
        tol_grad = None,
        max_iter = None,
        line_searcher = None,
    ),
    text_signature = "(features, num_states, /, size=3, num_cluster=15, n_epochs=50, seed=None, save_path=None, prefix=None, diagnostics=True, tol_grad=None, max_iter=None, line_searcher=None)"
)]
pub fn run_pipeline<'py>(
    features: &Bound<'py, PyAny>, num_states: usize, size: usize, num_cluster: usize,
    n_epochs: usize, seed: Option<u64>, save_path: Option<&str>, prefix: Option<&str>,
    diagnostics: bool, tol_grad: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>,
) -> PyResult<MarkovModelRun> {
    let trajectory = extract_feature_trajectory(features)?;
    let msm = extract_msm_opts(tol_grad, max_iter, line_searcher)?;
    let opts = build_pipeline_options(
        num_states,
        size,
        num_cluster,
        n_epochs,
        seed,
        save_path,
        prefix,
        diagnostics,
        msm,
    )?;
    let inner = pipeline::run_pipeline(&trajectory, &opts, &mut NullVisualizer)?;
    Ok(MarkovModelRun { inner })
}

/// Reorder a square transition matrix by descending self-transition
/// probability.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (matrix), text_signature = "(matrix, /)")]
pub fn sort_markov_matrix<'py>(matrix: &Bound<'py, PyAny>) -> PyResult<Vec<Vec<f64>>> {
    let rows = extract_f64_rows(matrix)?;
    let n = rows.len();
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    let cols = if n == 0 { 0 } else { flat.len() / n };
    if rows.iter().any(|r| r.len() != cols) {
        return Err(MsmError::NotSquare { rows: n, cols: rows.first().map_or(0, Vec::len) }.into());
    }
    let t = ndarray::Array2::from_shape_vec((n, cols), flat)
        .map_err(|_| MsmError::NotSquare { rows: n, cols })?;
    let sorted = msm::sort_markov_matrix(t.view())?;
    Ok(matrix_to_rows(sorted.view()))
}

/// Initialize the `dyno_msm` extension module.
///
/// Registers the `markov_models` submodule and places it in `sys.modules`
/// so `dyno_msm.markov_models` resolves with dot notation.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn dyno_msm<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(run_pipeline, m)?)?;
    m.add_function(wrap_pyfunction!(sort_markov_matrix, m)?)?;
    let markov_models_mod = PyModule::new(_py, "markov_models")?;
    markov_models(_py, m, &markov_models_mod)?;

    _py.import("sys")?.getattr("modules")?.set_item("dyno_msm.markov_models", markov_models_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn markov_models<'py>(
    _py: Python, root: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<MarkovModelRun>()?;
    m.add_function(wrap_pyfunction!(run_pipeline, m)?)?;
    m.add_function(wrap_pyfunction!(sort_markov_matrix, m)?)?;
    root.add_submodule(m)?;
    Ok(())
}
