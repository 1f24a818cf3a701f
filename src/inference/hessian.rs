//! inference::hessian — observed information and standard errors.
//!
//! Purpose
//! -------
//! Build the observed information matrix `J(θ̂)` by finite-differencing the
//! gradient of a negative log-likelihood, and convert it into numerically
//! stable classical standard errors. This module handles conversion between
//! `ndarray` and `nalgebra` types and owns the full path from a gradient map
//! to per-parameter SEs at the MLE.
//!
//! Key behaviors
//! -------------
//! - Approximate `J(θ̂)` with a central-difference Jacobian of the gradient
//!   map, falling back to forward differences when the central approximation
//!   fails validation ([`observed_information`]).
//! - Symmetrize the finite-difference matrix by averaging off-diagonal
//!   pairs, and validate shape and finiteness before it leaves this module.
//! - Copy the resulting `ndarray` matrix into a `nalgebra::DMatrix`
//!   (`fill_dmatrix`) for eigen-based linear algebra.
//! - Compute classical standard errors from the Moore–Penrose
//!   pseudoinverse of `J(θ̂)` ([`calc_standard_errors`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - [`observed_information`] returns a finite, symmetric `n×n` matrix with
//!   `n = θ̂.len()`; downstream helpers do **not** re-symmetrize.
//! - Eigenvalues with magnitude at most [`EIGEN_EPS`] are treated as
//!   numerically nonpositive and ignored when constructing pseudoinverse
//!   directions.
//!
//! Conventions
//! -----------
//! - The information matrix is taken from the **total negative
//!   log-likelihood**, so the resulting SEs are on the scale of the
//!   unconstrained parameter vector `θ̂` directly.
//! - Standard errors are returned as the square roots of diagonal
//!   variances; no full covariance matrix is currently exposed by this
//!   module.
//! - No explicit matrix inverse is formed; all computations use
//!   symmetric eigendecomposition with eigenvalue truncation.
//! - Errors are reported via [`OptResult<T>`].
//!
//! Downstream usage
//! ----------------
//! - `MixedModel::standard_errors` calls [`calc_standard_errors`] after
//!   fitting, passing a finite-difference gradient of the negative
//!   marginal log-likelihood.
//! - Helper routines [`fill_dmatrix`] and [`solve_for_se`] are internal
//!   utilities; library users should not need to invoke them directly.
//!
//! Testing notes
//! -------------
//! - Unit tests in this module cover:
//!   - The finite-difference observed information on quadratic gradients
//!     (symmetry, finiteness, failure on non-finite gradients).
//!   - Correct copying from `ndarray` into `DMatrix`.
//!   - Agreement between classical SEs and the diagonal of an analytic
//!     `J⁺` for simple quadratic objectives, and eigenvalue truncation.
//! - Integration tests at the model layer verify that weak identification
//!   (near-zero eigenvalues) produces inflated SEs along those directions.
use crate::optimization::{
    errors::{OptError, OptResult},
    numerical_stability::transformations::EIGEN_EPS,
};
use finitediff::FiniteDiff;
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// calc_standard_errors — standard errors from observed information.
///
/// Purpose
/// -------
/// Compute classical standard errors from the observed information matrix
/// `J(θ̂)`, using an eigen-based pseudoinverse. The observed information is
/// built via finite-difference Jacobians of a negative log-likelihood
/// gradient, then decomposed to produce per-parameter SEs.
///
/// Parameters
/// ----------
/// - `f`: `&F`
///   Gradient map of the **negative** log-likelihood, `f: θ ↦ ∇(-ℓ)(θ)`.
///   `f` must be C¹ in a neighborhood of `theta_hat` so that the
///   finite-difference Jacobian can succeed.
/// - `theta_hat`: `&Array1<f64>`
///   Parameter vector `θ̂` at which the observed information is
///   evaluated. Its length `n` determines the dimension of the matrix
///   and of the returned SE vector.
///
/// Returns
/// -------
/// `OptResult<Array1<f64>>`
///   On success, a length-`n` vector of standard errors corresponding to
///   the entries of `theta_hat`. On failure, propagates the error from
///   the observed-information computation (e.g., non-finite entries).
///
/// Errors
/// ------
/// - `OptError`
///   Any error that [`observed_information`] may return, such as
///   dimension mismatches or non-finite entries detected by validation.
///
/// Panics
/// ------
/// - Never panics under the documented invariants.
///
/// Notes
/// -----
/// - Eigenvalues with magnitude at most [`EIGEN_EPS`] are treated as
///   zero when forming pseudoinverse directions, inflating SEs along
///   weakly identified directions.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use mixedlvm::inference::hessian::calc_standard_errors;
/// # use mixedlvm::optimization::errors::OptResult;
/// #
/// // Simple quadratic: g(θ) = A θ, where A is PD.
/// let a = array![[4.0, 0.0],
///                [0.0, 1.0]];
/// let f = |theta: &ndarray::Array1<f64>| -> ndarray::Array1<f64> {
///     a.dot(theta)
/// };
/// let theta_hat = array![1.0, -1.0];
///
/// let se: OptResult<ndarray::Array1<f64>> =
///     calc_standard_errors(&f, &theta_hat);
/// assert!(se.is_ok());
/// let se = se.unwrap();
/// assert_eq!(se.len(), 2);
/// // For diagonal A, classical SEs are ~[1/sqrt(4), 1/sqrt(1)].
/// assert!((se[0] - 0.5).abs() < 1e-6);
/// assert!((se[1] - 1.0).abs() < 1e-6);
/// ```
pub fn calc_standard_errors<F: Fn(&Array1<f64>) -> Array1<f64>>(
    f: &F, theta_hat: &Array1<f64>,
) -> OptResult<Array1<f64>> {
    let n = theta_hat.len();
    let obs_info = observed_information(f, theta_hat)?;
    let mut obs_info_nalg = DMatrix::<f64>::zeros(obs_info.nrows(), obs_info.ncols());
    fill_dmatrix(&obs_info, &mut obs_info_nalg);
    Ok(solve_for_se(obs_info_nalg, n))
}

/// observed_information — finite-difference information matrix at `θ̂`.
///
/// Approximates `J(θ̂) = ∂/∂θ [∇(-ℓ)](θ̂)` with a central-difference Jacobian
/// of the gradient map, falling back to forward differences when the central
/// approximation fails validation (shape or finiteness). The matrix is
/// symmetrized by averaging off-diagonal pairs before being returned, so
/// downstream eigendecompositions can treat it as exactly symmetric.
///
/// # Errors
/// - [`OptError::HessianDimMismatch`] when the Jacobian dimensions do not
///   match `theta_hat.len()`.
/// - [`OptError::InvalidHessian`] when both difference schemes produce a
///   NaN or infinite entry.
pub fn observed_information<F: Fn(&Array1<f64>) -> Array1<f64>>(
    f: &F, theta_hat: &Array1<f64>,
) -> OptResult<Array2<f64>> {
    let dim = theta_hat.len();
    let mut central = theta_hat.central_hessian(f);
    match validate_information(&central, dim) {
        Ok(()) => {
            symmetrize(&mut central);
            Ok(central)
        }
        Err(_) => {
            let mut forward = theta_hat.forward_hessian(f);
            validate_information(&forward, dim)?;
            symmetrize(&mut forward);
            Ok(forward)
        }
    }
}

// ---- Helper methods ----

/// Validate the shape and finiteness of a candidate information matrix.
fn validate_information(info: &Array2<f64>, dim: usize) -> OptResult<()> {
    if info.nrows() != dim || info.ncols() != dim {
        return Err(OptError::HessianDimMismatch {
            expected: dim,
            found: (info.nrows(), info.ncols()),
        });
    }
    for ((i, j), &value) in info.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::InvalidHessian { row: i, col: j, value });
        }
    }
    Ok(())
}

/// Replace each off-diagonal pair with its average, leaving the diagonal
/// untouched.
fn symmetrize(info: &mut Array2<f64>) {
    for i in 0..info.nrows() {
        for j in 0..i {
            let avg = 0.5 * (info[[i, j]] + info[[j, i]]);
            info[[i, j]] = avg;
            info[[j, i]] = avg;
        }
    }
}

/// fill_dmatrix — copy an `ndarray` information matrix into a `nalgebra::DMatrix`.
///
/// Copies a square observed information matrix into a `DMatrix<f64>` using
/// column-major writes, matching `DMatrix`'s internal storage. This helper
/// does **not** modify symmetry; it assumes the input has already been
/// symmetrized upstream.
///
/// # Panics
/// - May panic if `obs_info` and `obs_info_nalg` have inconsistent shapes,
///   due to out-of-bounds indexing.
fn fill_dmatrix(obs_info: &Array2<f64>, obs_info_nalg: &mut DMatrix<f64>) {
    let n = obs_info.ncols();
    for j in 0..n {
        for i in j..n {
            if j == i {
                obs_info_nalg[(i, i)] = obs_info[[i, i]];
            } else {
                obs_info_nalg[(i, j)] = obs_info[[i, j]];
                obs_info_nalg[(j, i)] = obs_info[[j, i]];
            }
        }
    }
}

/// solve_for_se — classical standard errors from observed information.
///
/// Computes `SE(θ̂_i) = sqrt(Var(θ̂_i))` with
/// `Var(θ̂_i) = Σ_{k: λ_k > EIGEN_EPS} Q[i,k]² / λ_k`, where `J = Q Λ Qᵀ`
/// is the symmetric eigendecomposition of the observed information. This
/// is the diagonal of the Moore–Penrose pseudoinverse `J⁺`; eigenvalues
/// `λ_k ≤ EIGEN_EPS` are treated as zero, which inflates SEs along weakly
/// identified directions.
///
/// # Panics
/// - May panic if `obs_info_nalg` is not square or if its dimension does
///   not match `n`. Such mismatches are considered programmer errors.
fn solve_for_se(obs_info_nalg: DMatrix<f64>, n: usize) -> Array1<f64> {
    let eigen_decomp = obs_info_nalg.symmetric_eigen();
    let mut se = Array1::<f64>::zeros(n);
    let q = eigen_decomp.eigenvectors;
    let eigenvals = eigen_decomp.eigenvalues;
    for i in 0..n {
        se[i] = eigenvals
            .iter()
            .enumerate()
            .filter(|(_, lambda)| **lambda > EIGEN_EPS)
            .map(|(k, &lambda)| q[(i, k)] * q[(i, k)] / lambda)
            .sum();
        se[i] = se[i].sqrt();
    }
    se
}
