//! projection — time-lagged autoencoder embedding of feature trajectories.
//!
//! Purpose
//! -------
//! Reduce a `[frames × features]` interaction trajectory to a one-dimensional
//! latent trajectory that preserves slow, predictive structure.
//!
//! Key behaviors
//! -------------
//! - [`LatentProjector::project`] trains a fresh [`TimeLaggedAutoencoder`]
//!   on lag-1 pairs and encodes every frame.
//! - Encoder and decoder ([`network`]) are `candle-nn` linear stacks trained
//!   with candle's autograd and Adam; data stays in `ndarray` outside the
//!   training loop.
//!
//! Downstream usage
//! ----------------
//! - `pipeline::run` feeds the latent trajectory to `clustering`.

pub mod dataset;
pub mod errors;
pub mod network;
pub mod options;
pub mod tae;

pub use self::dataset::LaggedPairs;
pub use self::errors::{TaeError, TaeResult, TrainingPhase};
pub use self::network::DenseNetwork;
pub use self::options::TaeOptions;
pub use self::tae::{LatentProjector, Projection, TimeLaggedAutoencoder, TrainingHistory};

pub mod prelude {
    pub use super::errors::{TaeError, TaeResult};
    pub use super::options::TaeOptions;
    pub use super::tae::{LatentProjector, Projection, TrainingHistory};
}
