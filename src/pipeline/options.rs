//! Configuration for a full pipeline run.
use crate::clustering::KMeansOptions;
use crate::msm::MsmOptions;
use crate::pipeline::errors::{PipelineError, PipelineResult};
use crate::projection::TaeOptions;

/// Default exclusive upper bound of the diagnostic sweep.
pub const DEFAULT_NUM_CLUSTER: usize = 15;

/// Where visualization collaborators persist artifacts.
///
/// Both fields are passed through to the [`Visualizer`] untouched; the
/// pipeline never parses or validates them.
///
/// [`Visualizer`]: crate::pipeline::visualize::Visualizer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactTarget {
    pub save_path: String,
    pub prefix: String,
}

impl ArtifactTarget {
    pub fn new(save_path: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self { save_path: save_path.into(), prefix: prefix.into() }
    }
}

/// `PipelineOptions` — everything a run needs besides the trajectory.
///
/// Fields
/// ------
/// - `num_states`: required number of discrete states (≥ 1).
/// - `num_cluster`: exclusive upper bound of the elbow/score sweep; widened
///   to `2 · num_states` when `num_states > num_cluster / 2`.
/// - `diagnostics`: run the elbow/score sweep (default `true`). Disabling it
///   never changes the numeric outputs.
/// - `tae`, `kmeans`, `msm`: per-stage settings.
/// - `target`: opaque artifact destination.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub num_states: usize,
    pub num_cluster: usize,
    pub diagnostics: bool,
    pub tae: TaeOptions,
    pub kmeans: KMeansOptions,
    pub msm: MsmOptions,
    pub target: ArtifactTarget,
}

impl PipelineOptions {
    /// Defaults for every stage with the given state count.
    ///
    /// # Errors
    /// - `PipelineError::InvalidOptions` when `num_states == 0`.
    pub fn new(num_states: usize) -> PipelineResult<Self> {
        if num_states == 0 {
            return Err(PipelineError::InvalidOptions {
                field: "num_states",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(Self {
            num_states,
            num_cluster: DEFAULT_NUM_CLUSTER,
            diagnostics: true,
            tae: TaeOptions::default(),
            kmeans: KMeansOptions::default(),
            msm: MsmOptions::default(),
            target: ArtifactTarget::default(),
        })
    }

    pub fn with_num_cluster(mut self, num_cluster: usize) -> Self {
        self.num_cluster = num_cluster;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: bool) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn with_tae(mut self, tae: TaeOptions) -> Self {
        self.tae = tae;
        self
    }

    pub fn with_kmeans(mut self, kmeans: KMeansOptions) -> Self {
        self.kmeans = kmeans;
        self
    }

    pub fn with_msm(mut self, msm: MsmOptions) -> Self {
        self.msm = msm;
        self
    }

    pub fn with_target(mut self, target: ArtifactTarget) -> Self {
        self.target = target;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Defaults match the documented pipeline configuration.
    //
    // Given
    // -----
    // - PipelineOptions::new(4) and new(0).
    //
    // Expect
    // ------
    // - num_cluster 15, size 3, 50 epochs, diagnostics on, empty target.
    // - InvalidOptions for zero states.
    fn defaults_and_zero_states() {
        let opts = PipelineOptions::new(4).expect("valid options");
        assert_eq!(opts.num_cluster, 15);
        assert_eq!(opts.tae.size, 3);
        assert_eq!(opts.tae.n_epochs, 50);
        assert!(opts.diagnostics);
        assert_eq!(opts.target, ArtifactTarget::default());

        let tuned = opts.with_num_cluster(6).with_target(ArtifactTarget::new("/tmp/out", "run1"));
        assert_eq!(tuned.num_cluster, 6);
        assert_eq!(tuned.target.prefix, "run1");

        assert!(matches!(
            PipelineOptions::new(0),
            Err(PipelineError::InvalidOptions { field: "num_states", .. })
        ));
    }
}
