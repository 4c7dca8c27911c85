//! numerical_stability — overflow-safe scalar and vector transforms.
//!
//! Purpose
//! -------
//! Hold the numerically guarded log-partition used by the reversible
//! Markov-state likelihood over the symmetric weight matrix.
//!
//! Key behaviors
//! -------------
//! - `log_sum_exp`: max-shifted log-partition over `ndarray` views; all
//!   `-∞` inputs give `-∞`.
//!
//! Conventions
//! -----------
//! - Pure functions with no logging, I/O, or global state; suitable for
//!   tight inner loops.
//! - Inputs are assumed finite except where `-∞` is documented as allowed.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] compare against the direct formula
//!   and check the overflow guard.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::log_sum_exp;

pub mod prelude {
    pub use super::transformations::log_sum_exp;
}
