//! optimization — MLE stack, numerical helpers, and unified error surface.
//!
//! Purpose
//! -------
//! Combine an Argmin-backed log-likelihood optimizer, a numerically stable
//! log-partition, and a single error/result surface. The reversible Markov-state
//! estimator implements a log-likelihood and obtains fitted parameters and
//! diagnostics without touching backend solver details.
//!
//! Key behaviors
//! -------------
//! - `loglik_optimizer`: maximize `ℓ(θ)` with L-BFGS (More–Thuente or
//!   Hager–Zhang line search).
//! - `numerical_stability`: guarded log-sum-exp for the reversible
//!   likelihood.
//! - `errors`: [`OptError`](errors::OptError) / [`OptResult`](errors::OptResult).
//!
//! Conventions
//! -----------
//! - Solvers minimize `c(θ) = -ℓ(θ)` internally; user-facing values are
//!   expressed in terms of `ℓ`.
//! - Entry points that can fail return `OptResult<T>`; callers never see raw
//!   Argmin errors.
//! - Only the runner logs, through the `log` facade at `debug`/`info`.
//!
//! Downstream usage
//! ----------------
//! - `msm::reversible` implements `LogLikelihood` for the reversible
//!   count-matrix likelihood, calls `maximize`, and normalizes with
//!   `log_sum_exp`.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
