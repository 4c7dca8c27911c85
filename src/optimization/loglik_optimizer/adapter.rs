//! Adapter that exposes a [`LogLikelihood`] as an `argmin` problem.
//!
//! Maximizing `ℓ(θ)` becomes minimizing `c(θ) = -ℓ(θ)`. Analytic gradients are
//! negated accordingly. Without an analytic gradient the **cost** closure is
//! finite-differenced, so that branch needs no sign flip.
//!
//! The finite-difference branch serves likelihoods that leave
//! [`LogLikelihood::grad`] at its `GradientNotImplemented` default. The
//! reversible MSM likelihood supplies an analytic gradient and never reaches
//! it; the branch is exercised by this module's tests.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges a [`LogLikelihood`] to `argmin`'s `CostFunction` and `Gradient`.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }

    /// Finite-difference gradient of the cost.
    ///
    /// Central differences first; falls back to forward differences when a
    /// cost evaluation failed or the central result is not finite. The FD
    /// closure must return `f64`, so the first failure is parked in a
    /// `RefCell` and surfaced afterwards.
    fn fd_gradient(&self, theta: &Theta) -> Result<Grad, Error> {
        let dim = theta.len();
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let cost_fn = |t: &Theta| -> f64 {
            self.cost(t).unwrap_or_else(|e| {
                closure_err.borrow_mut().get_or_insert(e);
                f64::NAN
            })
        };

        let central = theta.central_diff(&cost_fn);
        if closure_err.borrow().is_none() && validate_grad(&central, dim).is_ok() {
            return Ok(central);
        }

        closure_err.replace(None);
        let forward = theta.forward_diff(&cost_fn);
        if let Some(err) = closure_err.take() {
            return Err(err);
        }
        validate_grad(&forward, dim)?;
        Ok(forward)
    }
}

impl<F: LogLikelihood> CostFunction for ArgMinAdapter<'_, F> {
    type Param = Theta;
    type Output = Cost;

    /// `c(θ) = -ℓ(θ)`; non-finite likelihoods become `OptError::NonFiniteCost`.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err(OptError::NonFiniteCost { value: output }.into());
        }
        Ok(-output)
    }
}

impl<F: LogLikelihood> Gradient for ArgMinAdapter<'_, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// `∇c(θ) = -∇ℓ(θ)` when the model supplies a gradient, otherwise a
    /// finite-difference gradient of the cost.
    ///
    /// # Errors
    /// - Model errors other than `GradientNotImplemented`.
    /// - Dimension or finiteness failures from [`validate_grad`].
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, theta.len())?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => self.fd_gradient(theta),
            Err(e) => Err(e.into()),
        }
    }
}
