//! numerical_stability — numerically robust scalar transforms and tolerances.
//!
//! Purpose
//! -------
//! Collect numerically stable scalar transforms plus the small numeric
//! tolerances shared across the optimization, model, and inference layers.
//! This module centralizes transform logic so the rest of the crate can
//! assume well-conditioned `f64` arithmetic inside tight inner loops.
//!
//! Key behaviors
//! -------------
//! - Provide stable scalar transforms (`safe_softplus`, its inverse, and
//!   `safe_logistic`) for mapping unconstrained reals into strictly
//!   positive or (0, 1) parameters without overflow/underflow.
//! - Expose a max-shifted `log_sum_exp` for combining log-space quadrature
//!   terms without underflow.
//! - Centralize small numeric tolerances (`EIGEN_EPS`, `GENERAL_TOL`) so
//!   downstream modules share consistent guards and clamping behavior.
//!
//! Invariants & assumptions
//! ------------------------
//! - All public transforms assume finite `f64` inputs; domain and shape
//!   validation (e.g., positivity, length checks) is enforced in the model
//!   and optimizer layers, not here.
//! - `log_sum_exp` treats an empty or all-`-∞` input as the log of a zero
//!   sum and returns `-∞`; callers decide whether that is an error.
//!
//! Conventions
//! -----------
//! - This module never logs, performs I/O, or touches global state; it is
//!   pure numerical helpers suitable for use inside tight inner loops.
//! - Panics and `unsafe` are avoided under normal usage; invalid inputs
//!   should be caught by upstream validation and surfaced as
//!   domain-specific error types.
//!
//! Downstream usage
//! ----------------
//! - The covariance map uses `safe_softplus`/`safe_softplus_inv` to keep
//!   free diagonal entries strictly positive in optimizer space.
//! - Density and moment code uses `safe_logistic`/`safe_softplus` for
//!   Bernoulli means and log-masses.
//! - The marginal-likelihood approximator combines per-node joint
//!   log-densities through `log_sum_exp`.
//! - Standard-error computation reuses `EIGEN_EPS` for eigenvalue
//!   truncation when pseudo-inverting observed information.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] cover:
//!   - agreement of stable transforms with naïve formulas on safe grids,
//!   - tail behavior and symmetry properties of the logistic/softplus
//!     helpers,
//!   - round-trip consistency of softplus and its inverse,
//!   - log-sum-exp against direct summation and its degenerate inputs.
//! - Integration tests in the model and optimization modules exercise
//!   higher-level invariants rather than re-testing these low-level
//!   numeric primitives.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    EIGEN_EPS, GENERAL_TOL, log_sum_exp, safe_logistic, safe_softplus, safe_softplus_inv,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use mixedlvm::optimization::numerical_stability::prelude::*;
//
// to import the main numerical-stability surface in a single line.

pub mod prelude {
    pub use super::transformations::{
        EIGEN_EPS, GENERAL_TOL, log_sum_exp, safe_logistic, safe_softplus, safe_softplus_inv,
    };
}
