//! Adapter that exposes a user `LogLikelihood` as an `argmin` problem.
//!
//! We convert a *maximization* of a log-likelihood `ℓ(θ)` into a *minimization*
//! problem by defining the cost as `c(θ) = -ℓ(θ)`. Analytic gradients (if
//! provided by the user) are negated accordingly. If a gradient is not
//! provided, we central-difference the **cost** closure, so no sign flip is
//! needed in that branch. The mixed latent model relies entirely on this
//! finite-difference path, so the fallback logic here is load-bearing rather
//! than a convenience.
//!
//! Trial points whose latent covariance cannot be Cholesky-factored are a
//! normal occurrence during line searches: free off-diagonal coordinates are
//! unbounded in θ-space, so a long trial step can leave the positive definite
//! cone. Such points receive a large *finite* cost instead of an error, so
//! the line search backtracks toward the feasible region rather than
//! aborting the whole run. `MixedModel::fit_from` verifies the starting
//! point is feasible before any optimization begins, so the best iterate can
//! never sit on the barrier itself.
use std::cell::RefCell;

use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::traits::{Cost, Grad, LogLikelihood, Theta},
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Cost assigned to trial points whose covariance cannot be factored.
/// Finite, so line searches backtrack instead of terminating the solver.
pub(crate) const INFEASIBLE_COST: f64 = 1e12;

/// Bridges a user `LogLikelihood` to `argmin`'s `CostFunction` and `Gradient`.
///
/// - `CostFunction::cost` returns `-ℓ(θ)` (negative log-likelihood), or the
///   [`INFEASIBLE_COST`] barrier when θ maps outside the positive definite
///   cone.
/// - `Gradient::gradient` returns:
///   - `-∇ℓ(θ)` if the user provides an analytic gradient, or
///   - a central-difference gradient of the cost (no sign flip needed).
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the cost `c(θ) = -ℓ(θ)`.
    ///
    /// - Calls the user's `value(θ, data)` and checks the result is finite.
    /// - Maps `NotPositiveDefinite` to the finite [`INFEASIBLE_COST`] barrier
    ///   so the line search can recover from an infeasible trial step.
    /// - Returns `Error(NonFiniteCost)` if the value is not finite.
    ///
    /// # Errors
    /// Propagates any other `OptError` from the user's `value` via `?`.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        match self.f.value(theta, self.data) {
            Ok(output) => {
                if !output.is_finite() {
                    return Err((OptError::NonFiniteCost { value: output }).into());
                }
                Ok(-output)
            }
            Err(OptError::NotPositiveDefinite) => Ok(INFEASIBLE_COST),
            Err(e) => Err(e.into()),
        }
    }
}

impl<'a, F: LogLikelihood> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the gradient of the cost at `θ`.
    ///
    /// Behavior:
    /// - If the user implements `grad(θ, data)`, we validate it and return
    ///   `-grad` (because the cost is `-ℓ`).
    /// - Otherwise, we central-difference the **cost**. Stencil points that
    ///   land outside the positive definite cone evaluate to the finite
    ///   barrier through `cost`, so the difference stays well-defined near
    ///   the feasibility boundary. Any other cost failure inside the stencil
    ///   is captured and re-raised after the FD pass (the FD closure itself
    ///   cannot return `Result`).
    ///
    /// # Errors
    /// - Propagates user errors from `grad` (non-`GradientNotImplemented`).
    /// - Propagates the first error raised by cost evaluations during FD.
    /// - Returns validation errors if the gradient has wrong dimension or
    ///   non-finite entries.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => {
                let first_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost_fn = |t: &Theta| -> f64 {
                    match self.cost(t) {
                        Ok(val) => val,
                        Err(e) => {
                            let mut slot = first_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            f64::NAN
                        }
                    }
                };
                let fd_grad = theta.central_diff(&cost_fn);
                if let Some(err) = first_err.take() {
                    return Err(err);
                }
                validate_grad(&fd_grad, dim)?;
                Ok(fd_grad)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a user `LogLikelihood` and its data.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] with the index/value/reason of the first
///   offending element.
pub(crate) fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}
