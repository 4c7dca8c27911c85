//! Configuration for reversible transition-matrix estimation.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{LineSearcher, MLEOptions, Tolerances},
};

/// `MsmOptions` — optimizer settings for the reversible maximum-likelihood fit.
///
/// Fields
/// ------
/// - `mle`: [`MLEOptions`] forwarded to the L-BFGS maximizer. The gradient
///   tolerance also decides whether the symmetrized initial guess is already
///   optimal, in which case the solver is skipped.
///
/// Default
/// -------
/// - `tol_grad = 1e-7`, `tol_cost = None`, `max_iter = 1000`, More–Thuente,
///   quiet, default L-BFGS memory.
#[derive(Debug, Clone, PartialEq)]
pub struct MsmOptions {
    pub mle: MLEOptions,
}

impl MsmOptions {
    pub fn new(mle: MLEOptions) -> Self {
        Self { mle }
    }

    /// Build options from raw optimizer knobs.
    ///
    /// # Errors
    /// Propagates validation errors from [`Tolerances::new`] and
    /// [`MLEOptions::new`].
    pub fn from_parts(
        tol_grad: Option<f64>, max_iter: Option<usize>, line_searcher: LineSearcher, verbose: bool,
    ) -> OptResult<Self> {
        let tols = Tolerances::new(tol_grad, None, max_iter)?;
        Ok(Self { mle: MLEOptions::new(tols, line_searcher, verbose, None)? })
    }
}

impl Default for MsmOptions {
    fn default() -> Self {
        Self {
            mle: MLEOptions {
                tols: Tolerances { tol_grad: Some(1e-7), tol_cost: None, max_iter: Some(1000) },
                ..MLEOptions::default()
            },
        }
    }
}
