//! High-level entry point for maximizing a [`LogLikelihood`].
//!
//! Selects an L-BFGS solver with either Hager–Zhang or More–Thuente line
//! search, wraps the model in an [`ArgMinAdapter`] (which *minimizes*
//! `-ℓ(θ)`), and delegates the run to [`run_lbfgs`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
    },
};

/// Maximize a log-likelihood `ℓ(θ)` using L-BFGS with the chosen line search.
///
/// Parameters
/// ----------
/// - `f`: model implementing [`LogLikelihood`].
/// - `theta0`: initial parameter vector (consumed by the executor).
/// - `data`: model data passed through to `value`/`grad`.
/// - `opts`: tolerances, line search, verbosity and L-BFGS memory.
///
/// Returns
/// -------
/// An [`OptimOutcome`] with `theta_hat`, best value `ℓ(θ̂)`, termination
/// status, iteration and evaluation counts, and the last gradient norm.
///
/// Errors
/// ------
/// - Any error from `f.check`.
/// - Builder errors from `build_optimizer_*`.
/// - Runtime errors from [`run_lbfgs`] (line-search failures, non-finite
///   costs or gradients raised by the model).
///
/// Examples
/// --------
/// ```no_run
/// use dyno_msm::optimization::prelude::*;
/// use ndarray::array;
///
/// struct Bowl;
/// impl LogLikelihood for Bowl {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = maximize(&Bowl, array![0.1, -0.2, 0.3], &(), &MLEOptions::default())?;
/// println!("θ̂ = {:?}", out.theta_hat);
/// # Ok::<(), OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::OptError,
        loglik_optimizer::{Cost, Grad, Tolerances},
    };
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - End-to-end maximization of a concave toy likelihood with both line
    //   searches.
    // - Propagation of `check` failures before any solver work.
    // -------------------------------------------------------------------------

    /// Concave toy likelihood ℓ(θ) = -Σ (θ_k - μ_k)², maximized at μ.
    struct ShiftedBowl;

    impl LogLikelihood for ShiftedBowl {
        type Data = Theta;

        fn value(&self, theta: &Theta, mu: &Theta) -> OptResult<Cost> {
            let d = theta - mu;
            Ok(-d.dot(&d))
        }

        fn check(&self, theta: &Theta, mu: &Theta) -> OptResult<()> {
            if theta.len() != mu.len() {
                return Err(OptError::ThetaLengthMismatch {
                    expected: mu.len(),
                    actual: theta.len(),
                });
            }
            Ok(())
        }

        fn grad(&self, theta: &Theta, mu: &Theta) -> OptResult<Grad> {
            Ok((theta - mu) * -2.0)
        }
    }

    #[test]
    // Purpose
    // -------
    // Both line searches reach the maximizer of a concave quadratic.
    //
    // Given
    // -----
    // - μ = [1, -2, 0.5], θ₀ = 0, tol_grad = 1e-8.
    //
    // Expect
    // ------
    // - θ̂ ≈ μ and ℓ(θ̂) ≈ 0 for MoreThuente and HagerZhang.
    fn maximize_recovers_quadratic_optimum() {
        // Arrange
        let mu = array![1.0, -2.0, 0.5];
        let tols = Tolerances::new(Some(1e-8), None, Some(200)).expect("valid tolerances");

        for ls in [LineSearcher::MoreThuente, LineSearcher::HagerZhang] {
            let opts = MLEOptions::new(tols, ls, false, None).expect("valid options");

            // Act
            let out = maximize(&ShiftedBowl, Theta::zeros(3), &mu, &opts).expect("should fit");

            // Assert
            for k in 0..3 {
                assert_relative_eq!(out.theta_hat[k], mu[k], epsilon = 1e-6);
            }
            assert_relative_eq!(out.value, 0.0, epsilon = 1e-10);
            assert!(out.converged);
        }
    }

    #[test]
    // Purpose
    // -------
    // A failing `check` aborts before the solver runs.
    //
    // Given
    // -----
    // - μ of length 3, θ₀ of length 2.
    //
    // Expect
    // ------
    // - `ThetaLengthMismatch { expected: 3, actual: 2 }`.
    fn maximize_propagates_check_failure() {
        let mu = array![1.0, -2.0, 0.5];

        let err = maximize(&ShiftedBowl, Theta::zeros(2), &mu, &MLEOptions::default())
            .expect_err("check must fail");

        assert_eq!(err, OptError::ThetaLengthMismatch { expected: 3, actual: 2 });
    }
}
