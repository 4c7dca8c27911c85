//! loglik_optimizer — argmin-powered log-likelihood maximizer.
//!
//! Purpose
//! -------
//! Provide the optimization layer behind the reversible Markov-state
//! estimator. A model implements [`LogLikelihood`] and calls [`maximize`]
//! to run L-BFGS with a configurable line search, tolerances, and a
//! finite-difference gradient fallback.
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] turns `ℓ(θ)` into the Argmin cost
//!   `c(θ) = -ℓ(θ)` and flips analytic gradients.
//! - [`maximize`] validates the initial guess with [`LogLikelihood::check`],
//!   picks a solver through [`builders`], runs it via [`run::run_lbfgs`] and
//!   returns an [`OptimOutcome`].
//! - [`Tolerances`] and [`MLEOptions`] are validated on construction.
//!
//! Invariants & assumptions
//! ------------------------
//! - The optimizer **always maximizes**; models implement `ℓ(θ)` and
//!   `∇ℓ(θ)`, never the cost.
//! - Model failures are recoverable [`OptError`](crate::optimization::errors::OptError)
//!   values, not panics.
//!
//! Conventions
//! -----------
//! - Parameters live in an unconstrained space as [`Theta`]; any mapping to
//!   constrained model quantities happens in the model layer.
//! - [`OptimOutcome::value`] is the log-likelihood, not the cost.
//!
//! Testing notes
//! -------------
//! - Submodule tests cover sign conventions ([`adapter`]), solver
//!   construction ([`builders`]), validation rules ([`validation`]),
//!   configuration ([`traits`]) and end-to-end toy fits ([`api`]).
//! - The reversible estimator in `msm::reversible` exercises the full path
//!   on real count matrices.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
