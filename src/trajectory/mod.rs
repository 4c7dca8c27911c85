//! trajectory — validated time-series containers for the MSM pipeline.
//!
//! Purpose
//! -------
//! Define the three index-aligned series that flow through the pipeline:
//! the raw interaction intensities ([`FeatureTrajectory`]), their autoencoder
//! embedding ([`LatentTrajectory`]), and the hard state assignment
//! ([`DiscreteTrajectory`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - All three share the same frame count within one pipeline run.
//! - Containers validate on construction and are never mutated afterwards;
//!   transformations (e.g., relabeling) return new values.
//!
//! Downstream usage
//! ----------------
//! - `projection` consumes a `FeatureTrajectory` and produces a
//!   `LatentTrajectory`.
//! - `clustering` turns a `LatentTrajectory` into a `DiscreteTrajectory`.
//! - `msm` counts transitions on a `DiscreteTrajectory`.

pub mod discrete;
pub mod errors;
pub mod feature;
pub mod latent;

pub use self::discrete::DiscreteTrajectory;
pub use self::errors::{TrajectoryError, TrajectoryResult};
pub use self::feature::FeatureTrajectory;
pub use self::latent::LatentTrajectory;

pub mod prelude {
    pub use super::discrete::DiscreteTrajectory;
    pub use super::errors::{TrajectoryError, TrajectoryResult};
    pub use super::feature::FeatureTrajectory;
    pub use super::latent::LatentTrajectory;
}
