//! clustering — k-means on the latent trajectory.
//!
//! Purpose
//! -------
//! Provide the two k-means consumers of the pipeline: the advisory
//! elbow/score sweep ([`cluster_diagnostics`]) and the hard state assignment
//! ([`assign_states`]). Both go through [`fit_kmeans`], a thin wrapper over
//! `linfa-clustering`.
//!
//! Key behaviors
//! -------------
//! - Every fit owns a fresh `Xoshiro256Plus` seeded from the run seed, so the
//!   sweep and the assignment never share RNG state.
//! - Per-`k` sweep failures are collected, never propagated.
//! - The assignment rejects partitions with empty clusters.
//!
//! Downstream usage
//! ----------------
//! - `pipeline::run` resolves one seed per run from [`KMeansOptions`] and
//!   passes it to both consumers.

pub mod assign;
pub mod diagnostics;
pub mod errors;
pub mod kmeans;
pub mod options;

pub use self::assign::assign_states;
pub use self::diagnostics::{
    DiagnosticCurve, DiagnosticSweep, cluster_diagnostics, effective_sweep_width,
};
pub use self::errors::{ClusterError, ClusterResult};
pub use self::kmeans::{KMeansFit, fit_kmeans};
pub use self::options::KMeansOptions;

pub mod prelude {
    pub use super::assign::assign_states;
    pub use super::diagnostics::{DiagnosticCurve, cluster_diagnostics};
    pub use super::errors::{ClusterError, ClusterResult};
    pub use super::options::KMeansOptions;
}
