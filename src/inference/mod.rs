//! inference — standard errors and marginal response moments for fitted models.
//!
//! Purpose
//! -------
//! Provide tools for post-estimation analysis on top of a fitted mixed
//! latent-variable model: classical (observed-information) standard errors
//! in the unconstrained optimizer parameter space `θ`, and marginal
//! mean/covariance prediction for the mixed response vector.
//!
//! Key behaviors
//! -------------
//! - Build the observed information matrix `J(θ̂)` from a finite-difference
//!   Hessian of the negative marginal log-likelihood and convert it into
//!   per-parameter standard errors via an eigen-based pseudoinverse
//!   ([`hessian::calc_standard_errors`]).
//! - Integrate per-family conditional means and variances over the latent
//!   Gaussian with the fitting quadrature rule to produce `E[Y]` and
//!   `Cov(Y)` at a new design point ([`moments::predict_moments`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Standard errors are expressed on the **unconstrained** θ scale
//!   (coefficients directly; free covariance coordinates through their
//!   softplus/identity transforms). Mapping them back to Σ-space is left
//!   to the caller.
//! - Eigenvalues of `J(θ̂)` at or below the shared truncation threshold are
//!   treated as zero, inflating SEs along weakly identified directions
//!   rather than producing astronomical variances.
//! - All numerical routines return errors rather than panicking; callers
//!   handle failures through the optimization error surface.
//!
//! Downstream usage
//! ----------------
//! - `MixedModel::standard_errors` and `MixedModel::predict_moments` wrap
//!   these routines with the fitted snapshot, so most callers never invoke
//!   this module directly.

pub mod hessian;
pub mod moments;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::hessian::calc_standard_errors;
pub use self::moments::predict_moments;

// ---- Optional convenience prelude for downstream crates ------------------
//
// Downstream crates can `use mixedlvm::inference::prelude::*;` to import
// the primary inference surface in a single line.

pub mod prelude {
    pub use super::hessian::calc_standard_errors;
    pub use super::moments::predict_moments;
}
