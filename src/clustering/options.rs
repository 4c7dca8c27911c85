//! Configuration for k-means fits.
use crate::clustering::errors::{ClusterError, ClusterResult};

/// `KMeansOptions` — settings shared by the state assignment and the
/// diagnostic sweep.
///
/// Fields
/// ------
/// - `seed`: `Option<u64>`
///   Seed for the per-fit `Xoshiro256Plus`. `None` draws one seed per
///   pipeline run; pass `Some` for reproducible labels.
/// - `max_n_iterations`: Lloyd iteration cap per run (default 300).
/// - `n_runs`: independent k-means++ restarts; the lowest-inertia run wins
///   (default 10).
/// - `tolerance`: centroid-shift convergence threshold (default 1e-4).
///
/// Invariants
/// ----------
/// - `max_n_iterations ≥ 1`, `n_runs ≥ 1`, `tolerance` finite and > 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeansOptions {
    pub seed: Option<u64>,
    pub max_n_iterations: u64,
    pub n_runs: usize,
    pub tolerance: f64,
}

impl KMeansOptions {
    /// # Errors
    /// - `ClusterError::InvalidOptions` naming the offending field.
    pub fn new(
        seed: Option<u64>, max_n_iterations: u64, n_runs: usize, tolerance: f64,
    ) -> ClusterResult<Self> {
        if max_n_iterations == 0 {
            return Err(ClusterError::InvalidOptions {
                field: "max_n_iterations",
                reason: "must be at least 1",
            });
        }
        if n_runs == 0 {
            return Err(ClusterError::InvalidOptions {
                field: "n_runs",
                reason: "must be at least 1",
            });
        }
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(ClusterError::InvalidOptions {
                field: "tolerance",
                reason: "must be finite and positive",
            });
        }
        Ok(Self { seed, max_n_iterations, n_runs, tolerance })
    }

    /// Seed to use for this run: the configured one or a fresh random draw.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

impl Default for KMeansOptions {
    fn default() -> Self {
        Self { seed: None, max_n_iterations: 300, n_runs: 10, tolerance: 1e-4 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Each numeric field is validated; a fixed seed is returned unchanged.
    //
    // Given
    // -----
    // - Zero iterations, zero runs, NaN tolerance; a valid set with seed 7.
    //
    // Expect
    // ------
    // - InvalidOptions for the first three; resolve_seed() = 7.
    fn options_validate_fields() {
        assert!(matches!(
            KMeansOptions::new(None, 0, 10, 1e-4),
            Err(ClusterError::InvalidOptions { field: "max_n_iterations", .. })
        ));
        assert!(matches!(
            KMeansOptions::new(None, 300, 0, 1e-4),
            Err(ClusterError::InvalidOptions { field: "n_runs", .. })
        ));
        assert!(matches!(
            KMeansOptions::new(None, 300, 10, f64::NAN),
            Err(ClusterError::InvalidOptions { field: "tolerance", .. })
        ));
        let opts = KMeansOptions::new(Some(7), 300, 10, 1e-4).expect("valid options");
        assert_eq!(opts.resolve_seed(), 7);
    }
}
