//! Python-boundary helpers: array extraction and option assembly.
//!
//! Everything here is compiled only with `python-bindings`. Inputs arrive as
//! `numpy.ndarray`, `pandas.DataFrame`, or nested sequences and leave as
//! validated crate types; errors are raised as Python `TypeError` /
//! `ValueError`.
#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    clustering::KMeansOptions,
    msm::MsmOptions,
    optimization::loglik_optimizer::traits::LineSearcher,
    pipeline::{ArtifactTarget, PipelineOptions},
    projection::TaeOptions,
    trajectory::FeatureTrajectory,
};

#[cfg(feature = "python-bindings")]
use numpy::{PyArrayMethods, PyReadonlyArray2};

/// Extract a `[frames × features]` float64 matrix as row vectors.
///
/// Accepts a 2-D `numpy.ndarray`, any object with `to_numpy()` (e.g.
/// `pandas.DataFrame`), or a sequence of float sequences. Ragged sequences
/// are passed through so the trajectory constructor can report the row.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_rows<'py>(raw_data: &Bound<'py, PyAny>) -> PyResult<Vec<Vec<f64>>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray2<f64>>() {
        return Ok(rows_of(&arr_ro));
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (), None) {
        if let Ok(frame_ro) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(rows_of(&frame_ro));
        }
    }

    raw_data.extract::<Vec<Vec<f64>>>().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 2-D numpy.ndarray, pandas.DataFrame, or sequence of float64 sequences",
        )
    })
}

#[cfg(feature = "python-bindings")]
fn rows_of(arr: &PyReadonlyArray2<'_, f64>) -> Vec<Vec<f64>> {
    arr.as_array().rows().into_iter().map(|r| r.to_vec()).collect()
}

/// Build a validated [`FeatureTrajectory`] from a Python matrix.
#[cfg(feature = "python-bindings")]
pub fn extract_feature_trajectory<'py>(
    raw_data: &Bound<'py, PyAny>,
) -> PyResult<FeatureTrajectory> {
    let rows = extract_f64_rows(raw_data)?;
    let feature_count = rows.first().map_or(0, Vec::len);
    Ok(FeatureTrajectory::from_rows(&rows, feature_count)?)
}

/// Reversible-estimation options from optional Python knobs.
#[cfg(feature = "python-bindings")]
pub fn extract_msm_opts(
    tol_grad: Option<f64>, max_iter: Option<usize>, line_searcher: Option<&str>,
) -> PyResult<MsmOptions> {
    use std::str::FromStr;

    let defaults = MsmOptions::default();
    let ls = match line_searcher {
        Some(name) => LineSearcher::from_str(name)?,
        None => defaults.mle.line_searcher,
    };
    let tol_grad = tol_grad.or(defaults.mle.tols.tol_grad);
    let max_iter = max_iter.or(defaults.mle.tols.max_iter);
    Ok(MsmOptions::from_parts(tol_grad, max_iter, ls, false)?)
}

/// Assemble [`PipelineOptions`] from the Python entry point's keywords.
#[cfg(feature = "python-bindings")]
pub fn build_pipeline_options(
    num_states: usize, size: usize, num_cluster: usize, n_epochs: usize, seed: Option<u64>,
    save_path: Option<&str>, prefix: Option<&str>, diagnostics: bool, msm: MsmOptions,
) -> PyResult<PipelineOptions> {
    let base = TaeOptions::default();
    let tae = TaeOptions::new(
        size,
        n_epochs,
        base.batch_size,
        base.learning_rate,
        base.validation_fraction,
        seed,
    )?;
    let kmeans = KMeansOptions { seed, ..KMeansOptions::default() };
    Ok(PipelineOptions::new(num_states)?
        .with_num_cluster(num_cluster)
        .with_diagnostics(diagnostics)
        .with_tae(tae)
        .with_kmeans(kmeans)
        .with_msm(msm)
        .with_target(ArtifactTarget::new(save_path.unwrap_or(""), prefix.unwrap_or(""))))
}
