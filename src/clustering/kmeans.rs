//! Thin k-means wrapper over `linfa-clustering`.
//!
//! Purpose
//! -------
//! Fit one k-means partition of latent records and return labels, centroids,
//! and the fit metrics used by the diagnostics (within-cluster sum of
//! squares and its negative, the score).
//!
//! Conventions
//! -----------
//! - Every fit constructs its own `Xoshiro256Plus` from the given seed, so
//!   two fits with the same seed, `k`, and data are identical regardless of
//!   what ran before.
//! - Requests for more clusters than distinct records are rejected as a
//!   collapse before reaching the backend, whose k-means++ seeding cannot
//!   place more centroids than distinct points.
use crate::clustering::{
    errors::{ClusterError, ClusterResult},
    options::KMeansOptions,
};
use linfa::DatasetBase;
use linfa::traits::{Fit, Predict};
use linfa_clustering::KMeans;
use ndarray::{Array1, Array2, ArrayView2};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

/// Result of a single k-means fit.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    pub labels: Array1<usize>,
    pub centroids: Array2<f64>,
    /// Σ ‖x − c(x)‖² over all records.
    pub inertia: f64,
    /// `-inertia`; higher is better.
    pub score: f64,
}

/// Number of distinct rows in `records`.
pub fn distinct_records(records: ArrayView2<'_, f64>) -> usize {
    let mut rows: Vec<Vec<f64>> = records.rows().into_iter().map(|r| r.to_vec()).collect();
    rows.sort_by(|a, b| {
        a.iter().zip(b.iter()).map(|(x, y)| x.total_cmp(y)).find(|o| o.is_ne()).unwrap_or(
            std::cmp::Ordering::Equal,
        )
    });
    rows.dedup();
    rows.len()
}

/// Fit k-means with `k` clusters.
///
/// # Errors
/// - `ClusterError::InvalidClusterCount` when `k == 0`.
/// - `ClusterError::TooManyClusters` when `k` exceeds the record count.
/// - `ClusterError::Collapsed` when fewer than `k` distinct records exist.
/// - `ClusterError::Backend` for errors reported by linfa.
pub fn fit_kmeans(
    records: ArrayView2<'_, f64>, k: usize, opts: &KMeansOptions, seed: u64,
) -> ClusterResult<KMeansFit> {
    if k == 0 {
        return Err(ClusterError::InvalidClusterCount { k });
    }
    if k > records.nrows() {
        return Err(ClusterError::TooManyClusters { requested: k, frames: records.nrows() });
    }
    let distinct = distinct_records(records);
    if distinct < k {
        return Err(ClusterError::Collapsed { requested: k, occupied: distinct });
    }

    let owned = records.to_owned();
    let model = KMeans::params_with_rng(k, Xoshiro256Plus::seed_from_u64(seed))
        .max_n_iterations(opts.max_n_iterations)
        .n_runs(opts.n_runs)
        .tolerance(opts.tolerance)
        .fit(&DatasetBase::from(owned.clone()))?;
    let labels: Array1<usize> = model.predict(&owned);
    let centroids = model.centroids().to_owned();

    let inertia: f64 = owned
        .rows()
        .into_iter()
        .zip(labels.iter())
        .map(|(x, &l)| {
            let d = &x - &centroids.row(l);
            d.dot(&d)
        })
        .sum();
    Ok(KMeansFit { labels, centroids, inertia, score: -inertia })
}
