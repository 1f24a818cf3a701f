//! inference::moments — marginal response moments for a fitted model.
//!
//! Purpose
//! -------
//! Compute the marginal mean vector and covariance matrix of the mixed
//! response `Y` at a new design point, integrating the latent Gaussian
//! vector out with the same tensor Gauss–Hermite rule used for fitting.
//!
//! Key behaviors
//! -------------
//! - For each quadrature node `m` with weight `wₘ`, form the linear
//!   predictor `w(m) = Xβ + L·zₘ` and evaluate the per-family conditional
//!   mean `m(w)` and variance `V(w)`.
//! - Accumulate `E[Y] = Σₘ wₘ · m(w)` and
//!   `E[Y Yᵀ] = Σₘ wₘ · (m mᵀ + diag(V))`, then return
//!   `Cov(Y) = E[Y Yᵀ] − E[Y]E[Y]ᵀ` (law of total variance).
//!
//! Invariants & assumptions
//! ------------------------
//! - `sigma` is a valid restricted covariance (symmetric, positive
//!   definite); the Cholesky factorization failing surfaces as
//!   `NotPositiveDefinite`.
//! - Quadrature weights sum to 1, so the accumulated moments are proper
//!   expectations up to quadrature error.
//!
//! Downstream usage
//! ----------------
//! - `MixedModel::predict_moments` delegates here with the fitted
//!   `(β̂, Σ̂)` snapshot.
use crate::{
    model::{
        core::{
            covariance::cholesky_root,
            data::ResponseType,
            density::{conditional_mean, conditional_variance},
            quadrature::QuadratureGrid,
        },
        errors::{ModelError, ParamError},
    },
    optimization::errors::OptResult,
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Marginal mean and covariance of the response at a design point.
///
/// Parameters
/// ----------
/// - `x`: `r × p` design matrix for a single observation (one row per
///   response).
/// - `beta`: regression coefficients of length `p`.
/// - `sigma`: `r × r` latent covariance (typically `Σ̂` from a fit).
/// - `types`: response family per row of `x`.
/// - `psi`: dispersion per response (`1.0` for Bernoulli/Poisson).
/// - `nodes_per_dim`: Gauss–Hermite nodes per latent dimension.
///
/// Returns
/// -------
/// `OptResult<(Array1<f64>, Array2<f64>)>` — the marginal mean `E[Y]`
/// (length `r`) and covariance `Cov(Y)` (`r × r`).
///
/// Errors
/// ------
/// - Dimension mismatches between `x`, `beta`, `sigma`, `types`, and `psi`.
/// - `NotPositiveDefinite` when `sigma` cannot be factored.
/// - Quadrature construction errors (zero dimension or node count).
pub fn predict_moments(
    x: ArrayView2<f64>, beta: ArrayView1<f64>, sigma: &Array2<f64>, types: &[ResponseType],
    psi: ArrayView1<f64>, nodes_per_dim: usize,
) -> OptResult<(Array1<f64>, Array2<f64>)> {
    let r = types.len();
    if x.nrows() != r {
        return Err(ModelError::ResponseColumnMismatch { expected: r, actual: x.nrows() }.into());
    }
    if x.ncols() != beta.len() {
        return Err(ModelError::CoefficientCountMismatch {
            expected: x.ncols(),
            actual: beta.len(),
        }
        .into());
    }
    if psi.len() != r {
        return Err(
            ModelError::DispersionLengthMismatch { expected: r, actual: psi.len() }.into()
        );
    }
    if sigma.nrows() != r || sigma.ncols() != r {
        return Err(ParamError::SigmaDimMismatch { expected: r, actual: sigma.nrows() }.into());
    }

    let root = cholesky_root(sigma)?;
    let grid = QuadratureGrid::new(r, nodes_per_dim)?;
    let mu = x.dot(&beta);

    let mut mean = Array1::<f64>::zeros(r);
    let mut second = Array2::<f64>::zeros((r, r));
    let mut cond_mean = Array1::<f64>::zeros(r);
    for m in 0..grid.len() {
        let weight = grid.log_weights[m].exp();
        for j in 0..r {
            let mut w = mu[j];
            for l in 0..=j {
                w += root[(j, l)] * grid.nodes[(m, l)];
            }
            cond_mean[j] = conditional_mean(types[j], w);
            second[(j, j)] += weight * conditional_variance(types[j], w, psi[j]);
        }
        for j in 0..r {
            mean[j] += weight * cond_mean[j];
            for k in 0..r {
                second[(j, k)] += weight * cond_mean[j] * cond_mean[k];
            }
        }
    }
    let mut cov = second;
    for j in 0..r {
        for k in 0..r {
            cov[(j, k)] -= mean[j] * mean[k];
        }
    }
    Ok((mean, cov))
}
