//! msm — transition counting, reversible estimation, and canonical ordering.
//!
//! Purpose
//! -------
//! Turn a discrete state trajectory into a reversible lag-1 Markov state
//! model and a canonical, run-independent view of it.
//!
//! Key behaviors
//! -------------
//! - [`count_transitions`]: sliding-window lag-1 [`CountMatrix`].
//! - [`estimate_reversible`]: maximum-likelihood [`MarkovStateModel`] under
//!   detailed balance, fitted with the crate’s L-BFGS optimizer.
//! - [`canonicalize`] / [`canonicalize_model`]: reorder states by descending
//!   self-transition probability.
//! - [`map_pharmacophore_states`]: explicit, not yet implemented annotation
//!   hook.
//!
//! Invariants & assumptions
//! ------------------------
//! - The lag is fixed at one frame.
//! - Estimation refuses states without outgoing transitions instead of
//!   smoothing them (`MsmError::UnfitState`).
//!
//! Downstream usage
//! ----------------
//! - `pipeline::run` calls counting, estimation, and canonicalization in
//!   sequence and reports `UnfitState` as an unreversible-model failure.

pub mod annotate;
pub mod canonical;
pub mod counts;
pub mod errors;
pub mod model;
pub mod options;
pub mod reversible;

pub use self::annotate::{StateAnnotation, StateMetadata, map_pharmacophore_states};
pub use self::canonical::{
    CanonicalModel, CanonicalOrder, canonicalize, canonicalize_model, sort_markov_matrix,
};
pub use self::counts::{CountMatrix, count_transitions};
pub use self::errors::{MsmError, MsmResult};
pub use self::model::{MarkovStateModel, StationaryDistribution, TransitionMatrix};
pub use self::options::MsmOptions;
pub use self::reversible::estimate_reversible;

pub mod prelude {
    pub use super::canonical::{CanonicalOrder, canonicalize, sort_markov_matrix};
    pub use super::counts::{CountMatrix, count_transitions};
    pub use super::errors::{MsmError, MsmResult};
    pub use super::model::MarkovStateModel;
    pub use super::options::MsmOptions;
    pub use super::reversible::estimate_reversible;
}
