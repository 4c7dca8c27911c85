//! clustering::diagnostics — advisory k-means elbow/score sweep.
//!
//! Purpose
//! -------
//! Fit k-means for every candidate cluster count `k = 2 … num_cluster-1` on
//! the latent trajectory and record the within-cluster sum of squares
//! (inertia) and the score (its negative). The curves support visual elbow
//! analysis only.
//!
//! Key behaviors
//! -------------
//! - Index `k` of each curve holds the metric for `k` clusters; indices `0`
//!   and `1` stay zero.
//! - Each `k` starts from a fresh RNG seeded identically, so the sweep
//!   never shares RNG state with the state assignment.
//! - A failure for one `k` (e.g., too few distinct latent values) leaves that
//!   entry at zero and is reported in [`DiagnosticSweep::failures`]; the
//!   sweep continues.
//!
//! Invariants & assumptions
//! ------------------------
//! - Nothing in the pipeline reads these curves to choose `num_states`.
//!
//! Testing notes
//! -------------
//! - Unit tests check curve shape, placeholder zeros, monotone inertia on
//!   well-separated data, per-`k` failure isolation, and the sweep-width
//!   guard.
use crate::clustering::{errors::ClusterError, kmeans::fit_kmeans, options::KMeansOptions};
use crate::trajectory::LatentTrajectory;
use ndarray::Array1;
use std::ops::Range;

/// Elbow/score curves indexed by cluster count.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticCurve {
    pub scores: Array1<f64>,
    pub inertia: Array1<f64>,
}

impl DiagnosticCurve {
    /// Exclusive upper bound of the sweep.
    pub fn num_cluster(&self) -> usize {
        self.scores.len()
    }

    /// Cluster counts with defined entries.
    pub fn k_range(&self) -> Range<usize> {
        2..self.num_cluster().max(2)
    }
}

/// Curves plus the per-`k` failures encountered while computing them.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticSweep {
    pub curve: DiagnosticCurve,
    pub failures: Vec<(usize, ClusterError)>,
}

/// Sweep width actually used for the diagnostics.
///
/// Returns `2 · num_states` when `num_states > num_cluster / 2` (integer
/// division), otherwise `num_cluster`.
pub fn effective_sweep_width(num_states: usize, num_cluster: usize) -> usize {
    if num_states > num_cluster / 2 { 2 * num_states } else { num_cluster }
}

/// Run the elbow/score sweep for `k = 2 … num_cluster-1`.
pub fn cluster_diagnostics(
    latent: &LatentTrajectory, num_cluster: usize, opts: &KMeansOptions, seed: u64,
) -> DiagnosticSweep {
    let mut scores = Array1::<f64>::zeros(num_cluster);
    let mut inertia = Array1::<f64>::zeros(num_cluster);
    let mut failures = Vec::new();
    for k in 2..num_cluster {
        match fit_kmeans(latent.records(), k, opts, seed) {
            Ok(fit) => {
                scores[k] = fit.score;
                inertia[k] = fit.inertia;
            }
            Err(err) => {
                log::debug!("Diagnostic k-means with k={k} failed: {err}");
                failures.push((k, err));
            }
        }
    }
    DiagnosticSweep { curve: DiagnosticCurve { scores, inertia }, failures }
}
