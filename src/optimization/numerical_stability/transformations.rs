//! Numerical stability utilities.
//!
//! Provides safe implementations of common nonlinear transforms
//! that are prone to overflow/underflow in naïve form.
//! The functions here follow guarded strategies similar to those
//! in major ML libraries (e.g. PyTorch, TensorFlow), using explicit
//! cutoffs (`x > 20.0`) to keep `f64` arithmetic in a well-conditioned regime.
//!
//! # Provided items
//! - [`EIGEN_EPS`]: eigenvalue truncation threshold used when building
//!   pseudoinverses of observed information matrices.
//! - [`GENERAL_TOL`]: generic absolute tolerance for near-equality checks.
//! - [`safe_softplus(x)`]: stable version of `ln(1 + exp(x))`,
//!   mapping ℝ → (0, ∞) without overflow.
//! - [`safe_softplus_inv(x)`]: inverse of softplus, mapping
//!   (0, ∞) → ℝ without catastrophic cancellation.
//! - [`safe_logistic(x)`]: stable `σ(x) = 1 / (1 + exp(-x))`.
//! - [`log_sum_exp(terms)`]: max-shifted `ln Σ exp(tᵢ)` for combining
//!   log-space quadrature terms.
//!
//! # Rationale
//! These transforms are building blocks in optimization and
//! probabilistic modeling whenever parameters must be kept
//! strictly positive or probabilities must be combined in log space.

/// Eigenvalue truncation threshold for pseudoinverse construction.
///
/// Eigenvalues with magnitude at most this value are treated as
/// numerically zero when inverting observed information matrices,
/// which inflates standard errors along weakly identified directions
/// instead of dividing by noise.
pub const EIGEN_EPS: f64 = 1e-10;

/// Generic absolute tolerance for near-equality comparisons.
pub const GENERAL_TOL: f64 = 1e-12;

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// Computes softplus without overflow for large positive `x` and
/// with good precision for large negative `x`. This implementation
/// uses a simple piecewise guard:
///
/// - For sufficiently large `x`, `softplus(x) ≈ x + ln1p(exp(-x)) ≈ x`.
/// - Otherwise, it falls back to `ln1p(exp(x))`.
///
/// The cutoff used here (`x > 20.0`) is a practical threshold that
/// keeps the calculation in a well-conditioned regime for `f64`
/// (similar to the strategy used in common ML libraries like PyTorch).
///
/// # Parameters
/// - `x`: real input
///
/// # Returns
/// - `softplus(x)` as `f64`.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp().ln_1p() }
}

/// Stable inverse of softplus on `(0, ∞)`: solves for `t` in
/// `softplus(t) = x`, returning `t = ln(exp(x) - 1)`.
///
/// Direct evaluation of `ln(exp(x) - 1)` can overflow or lose precision.
/// This implementation mirrors the guarded strategy of `safe_softplus`:
///
/// - For sufficiently large `x`, `exp(-x)` is tiny and
///   `ln(exp(x) - 1) ≈ x + ln(1 - exp(-x)) ≈ x`.
/// - Otherwise, it uses `ln(expm1(x))`.
///
/// # Parameters
/// - `x`: a positive real (the softplus output), must be finite and `> 0`.
///
/// # Returns
/// - `t` such that `softplus(t) = x`.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp_m1().ln() }
}

/// Numerically stable logistic function `σ(x) = 1 / (1 + exp(-x))`.
///
/// Branches on the sign of `x` so that the exponential is always taken
/// of a non-positive argument, avoiding overflow in either tail.
///
/// # Parameters
/// - `x`: real input
///
/// # Returns
/// - `σ(x)` in `(0, 1)`.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Max-shifted log-sum-exp: `ln Σᵢ exp(termsᵢ)`.
///
/// Subtracts the maximum term before exponentiating so the largest
/// exponential is exactly 1, which keeps the sum representable even
/// when the terms are far below the `f64` exponent range.
///
/// Edge cases:
/// - An empty slice, or a slice of all `-∞`, returns `-∞` (the log of
///   an empty/zero sum), which callers treat as a degenerate density.
///
/// # Parameters
/// - `terms`: log-space summands.
///
/// # Returns
/// - `ln Σᵢ exp(termsᵢ)` as `f64`.
pub fn log_sum_exp(terms: &[f64]) -> f64 {
    let max = terms.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return max;
    }
    max + terms.iter().map(|&t| (t - max).exp()).sum::<f64>().ln()
}
