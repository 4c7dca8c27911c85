//! Hard assignment of latent frames to exactly `num_states` states.
use crate::clustering::{
    errors::{ClusterError, ClusterResult},
    kmeans::fit_kmeans,
    options::KMeansOptions,
};
use crate::trajectory::{DiscreteTrajectory, LatentTrajectory};

/// Partition the latent trajectory into `num_states` k-means clusters and
/// return the per-frame labels.
///
/// The fit uses its own RNG seeded with `seed`; the diagnostic sweep has no
/// influence on the result.
///
/// # Errors
/// - `ClusterError::InvalidClusterCount` when `num_states == 0`.
/// - `ClusterError::TooManyClusters` when `num_states` exceeds the frame count.
/// - `ClusterError::Collapsed` when fewer than `num_states` clusters end up
///   non-empty.
/// - `ClusterError::Backend` for linfa failures.
pub fn assign_states(
    latent: &LatentTrajectory, num_states: usize, opts: &KMeansOptions, seed: u64,
) -> ClusterResult<DiscreteTrajectory> {
    let fit = fit_kmeans(latent.records(), num_states, opts, seed)?;
    let discrete = DiscreteTrajectory::new(fit.labels, num_states)?;
    let occupied = discrete.occupied_states();
    if occupied < num_states {
        return Err(ClusterError::Collapsed { requested: num_states, occupied });
    }
    log::debug!(
        "Assigned {} frames to {} states (inertia {:.6e})",
        discrete.len(),
        num_states,
        fit.inertia
    );
    Ok(discrete)
}
