//! Mixed-response latent Gaussian regression model.
//!
//! This module wires the mixed latent-variable specification to the
//! `LogLikelihood` trait. Each observation carries `r` responses of possibly
//! different families (Normal, Bernoulli, Poisson) that are conditionally
//! independent given a shared latent Gaussian vector `Z ~ N(0, Σ)`. The
//! marginal log-likelihood integrates the latent vector out with a tensor
//! Gauss–Hermite rule:
//!
//! `ℓᵢ(θ) = log Σₘ wₘ · exp( Σⱼ log f(yᵢⱼ | wⱼ(m)) )`,
//! `w(m) = Xᵢ β + L·zₘ`, `L Lᵀ = Σ`.
//!
//! Key ideas:
//! - Parameters live in unconstrained space: `θ = [β | free Σ coordinates]`,
//!   with free diagonal entries mapped through softplus by [`CovarianceMap`].
//! - Per-observation quadrature terms are accumulated in the log domain via
//!   `log_sum_exp`, and observations are summed in parallel with `rayon`.
//! - No analytic gradient is provided; the optimizer's finite-difference
//!   fallback differentiates the marginal likelihood directly.
use crate::{
    model::{
        core::{
            covariance::{CovarianceMap, RestrictionMatrix, cholesky_root},
            data::{MixedData, ResponseType},
            density::log_conditional_density,
            quadrature::QuadratureGrid,
            validation::{validate_model_data, validate_theta},
        },
        errors::{ModelError, ModelResult},
    },
    inference::hessian::calc_standard_errors,
    optimization::{
        errors::OptResult,
        loglik_optimizer::{LogLikelihood, MLEOptions, OptimOutcome, Theta, maximize},
        numerical_stability::transformations::log_sum_exp,
    },
};
use finitediff::FiniteDiff;
use ndarray::{Array1, Array2, ArrayView1, s};
use rayon::prelude::*;

/// Default number of Gauss–Hermite nodes per latent dimension.
pub const DEFAULT_NODES_PER_DIM: usize = 9;

/// Run-time options for fitting a [`MixedModel`].
///
/// Fields:
/// - `mle_opts`: optimizer configuration (tolerances, line search, L-BFGS
///   memory) passed through to `maximize`.
/// - `nodes_per_dim`: Gauss–Hermite nodes per latent dimension; the tensor
///   grid has `nodes_per_dim^r` points.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    pub mle_opts: MLEOptions,
    pub nodes_per_dim: usize,
}

impl FitOptions {
    /// Construct validated fit options.
    ///
    /// # Errors
    /// - [`ModelError::InvalidNodeCount`] if `nodes_per_dim == 0`.
    pub fn new(mle_opts: MLEOptions, nodes_per_dim: usize) -> ModelResult<Self> {
        if nodes_per_dim == 0 {
            return Err(ModelError::InvalidNodeCount { nodes: nodes_per_dim });
        }
        Ok(Self { mle_opts, nodes_per_dim })
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        Self { mle_opts: MLEOptions::default(), nodes_per_dim: DEFAULT_NODES_PER_DIM }
    }
}

/// Self-contained snapshot of a fitted mixed model.
///
/// Produced by [`MixedModel::fit`]; carries everything the inference and
/// testing layers need without holding a reference to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct MixedFit {
    /// Estimated regression coefficients β̂ (length p).
    pub beta: Array1<f64>,
    /// Estimated latent covariance Σ̂ with restrictions applied (r × r).
    pub sigma: Array2<f64>,
    /// Maximized marginal log-likelihood ℓ(θ̂).
    pub loglik: f64,
    /// Whether the optimizer reached a tolerance-based termination.
    pub converged: bool,
    /// Number of optimizer iterations performed.
    pub iterations: usize,
    /// Upper-triangular coordinates of Σ that were estimated freely,
    /// in row-major order. Used by the likelihood-ratio test to verify
    /// nesting.
    pub free_entries: Vec<(usize, usize)>,
}

/// Mixed-response latent Gaussian regression model.
///
/// Encapsulates the response layout (`types`), the covariance restriction
/// pattern (`cov_map`), a precomputed quadrature grid (`grid`), and run-time
/// options. After fitting, [`results`] stores the raw optimization outcome
/// and [`fitted`] a materialized [`MixedFit`].
#[derive(Debug, Clone, PartialEq)]
pub struct MixedModel {
    /// Number of regression coefficients p (shared across responses).
    pub n_coeffs: usize,
    /// Response family per column of Y.
    pub types: Vec<ResponseType>,
    /// Tensor Gauss–Hermite grid over the latent space.
    pub grid: QuadratureGrid,
    /// Mapping between free covariance coordinates and Σ.
    pub cov_map: CovarianceMap,
    /// Model options.
    pub options: FitOptions,
    /// Raw optimizer outcome (populated after `fit`).
    pub results: Option<OptimOutcome>,
    /// Fitted snapshot (populated after `fit`).
    pub fitted: Option<MixedFit>,
}

impl MixedModel {
    /// Construct a new [`MixedModel`].
    ///
    /// # Arguments
    /// - `n_coeffs`: number of regression coefficients p (must be ≥ 1).
    /// - `types`: response family per column of Y (must be non-empty).
    /// - `restriction`: Fixed/Free pattern for the latent covariance; its
    ///   dimension must equal `types.len()`.
    /// - `options`: fit options (optimizer configuration and node count).
    ///
    /// # Errors
    /// - [`ModelError::InvalidCoefficientCount`] if `n_coeffs == 0`.
    /// - [`ModelError::RestrictionDimMismatch`] if the restriction dimension
    ///   does not match the number of responses.
    /// - Propagates quadrature construction errors (empty `types`, zero
    ///   nodes).
    pub fn new(
        n_coeffs: usize, types: Vec<ResponseType>, restriction: RestrictionMatrix,
        options: FitOptions,
    ) -> ModelResult<MixedModel> {
        if n_coeffs == 0 {
            return Err(ModelError::InvalidCoefficientCount { n_coeffs });
        }
        if restriction.dim() != types.len() {
            return Err(ModelError::RestrictionDimMismatch {
                expected: types.len(),
                actual: restriction.dim(),
            });
        }
        let grid = QuadratureGrid::new(types.len(), options.nodes_per_dim)?;
        let cov_map = CovarianceMap::new(restriction);
        Ok(MixedModel { n_coeffs, types, grid, cov_map, options, results: None, fitted: None })
    }

    /// Length of the unconstrained parameter vector: `p + free_len`.
    pub fn theta_dim(&self) -> usize {
        self.n_coeffs + self.cov_map.free_len()
    }

    /// Default starting point: zero coefficients and a covariance start whose
    /// free diagonal maps to 1.0 with zero free off-diagonals.
    pub fn default_theta0(&self) -> Theta {
        let mut theta0 = Array1::<f64>::zeros(self.theta_dim());
        theta0.slice_mut(s![self.n_coeffs..]).assign(&self.cov_map.initial_theta());
        theta0
    }

    /// Fit the model by maximum marginal likelihood from the default start.
    ///
    /// Equivalent to `fit_from(self.default_theta0(), data)`.
    pub fn fit(&mut self, data: &MixedData) -> OptResult<()> {
        self.fit_from(self.default_theta0(), data)
    }

    /// Fit the model by maximum marginal likelihood (consumes `theta0`).
    ///
    /// ## Steps
    /// 1. Cross-check `data` against the model layout and verify that the
    ///    restriction pattern admits a positive definite covariance.
    /// 2. Run L-BFGS per `options.mle_opts`, **moving** `theta0` into the
    ///    executor; gradients come from the finite-difference fallback.
    /// 3. Store the optimizer outcome in `self.results`.
    /// 4. Materialize `(β̂, Σ̂)` from `theta_hat` and store a [`MixedFit`]
    ///    snapshot in `self.fitted`.
    ///
    /// ## Errors
    /// - Layout mismatches and infeasible restrictions surface before any
    ///   optimization work is done.
    /// - Propagates optimizer errors from `maximize`.
    pub fn fit_from(&mut self, theta0: Theta, data: &MixedData) -> OptResult<()> {
        validate_model_data(data, self.n_coeffs, &self.types)?;
        self.cov_map.check_feasible()?;
        self.results = Some(maximize(self, theta0, data, &self.options.mle_opts)?);
        let outcome = self.results.as_ref().unwrap();
        let beta = outcome.theta_hat.slice(s![..self.n_coeffs]).to_owned();
        let sigma = self.cov_map.sigma_from_theta(outcome.theta_hat.slice(s![self.n_coeffs..]))?;
        self.fitted = Some(MixedFit {
            beta,
            sigma,
            loglik: outcome.value,
            converged: outcome.converged,
            iterations: outcome.iterations,
            free_entries: self.cov_map.free_entries().to_vec(),
        });
        Ok(())
    }

    /// Borrow the fitted snapshot.
    ///
    /// # Errors
    /// - [`ModelError::ModelNotFitted`] if called before a successful `fit`.
    pub fn fitted(&self) -> ModelResult<&MixedFit> {
        self.fitted.as_ref().ok_or(ModelError::ModelNotFitted)
    }

    /// Classical standard errors on the unconstrained θ scale.
    ///
    /// Differentiates the negative marginal log-likelihood twice by finite
    /// differences around `θ̂` and converts the observed information into
    /// per-parameter SEs via an eigen-based pseudoinverse. A likelihood
    /// evaluation failure inside the difference stencil surfaces as an
    /// invalid-Hessian error rather than a panic.
    ///
    /// # Errors
    /// - [`ModelError::ModelNotFitted`] if called before `fit`.
    /// - Propagates Hessian validation errors from the inference layer.
    pub fn standard_errors(&self, data: &MixedData) -> OptResult<Array1<f64>> {
        let outcome = self.results.as_ref().ok_or(ModelError::ModelNotFitted)?;
        let neg_loglik = |t: &Theta| -> f64 {
            match self.value(t, data) {
                Ok(v) => -v,
                Err(_) => f64::NAN,
            }
        };
        let grad_neg_loglik = |theta: &Theta| -> Theta { theta.central_diff(&neg_loglik) };
        calc_standard_errors(&grad_neg_loglik, &outcome.theta_hat)
    }

    /// Marginal mean and covariance of the response at a new design point.
    ///
    /// Delegates to [`predict_moments`](crate::inference::moments::predict_moments)
    /// with the fitted `(β̂, Σ̂)` snapshot and the model's quadrature
    /// resolution.
    ///
    /// # Errors
    /// - [`ModelError::ModelNotFitted`] if called before `fit`.
    /// - Dimension mismatches between `x`, `psi`, and the model layout.
    pub fn predict_moments(
        &self, x: ndarray::ArrayView2<f64>, psi: ArrayView1<f64>,
    ) -> OptResult<(Array1<f64>, Array2<f64>)> {
        let fit = self.fitted()?;
        crate::inference::moments::predict_moments(
            x,
            fit.beta.view(),
            &fit.sigma,
            &self.types,
            psi,
            self.options.nodes_per_dim,
        )
    }

    /// Marginal log-likelihood contribution of a single observation.
    ///
    /// Accumulates the tensor quadrature terms in the log domain and reduces
    /// them with `log_sum_exp`. `root` is the lower Cholesky factor of Σ.
    fn obs_loglik(
        &self, data: &MixedData, index: usize, beta: ArrayView1<f64>, root: &Array2<f64>,
    ) -> ModelResult<f64> {
        let r = self.types.len();
        let mu = data.design_row(index).dot(&beta);
        let mut terms = Vec::with_capacity(self.grid.len());
        for m in 0..self.grid.len() {
            let mut joint = self.grid.log_weights[m];
            for j in 0..r {
                let mut w = mu[j];
                for l in 0..=j {
                    w += root[(j, l)] * self.grid.nodes[(m, l)];
                }
                joint += log_conditional_density(
                    data.y[(index, j)],
                    self.types[j],
                    w,
                    data.psi[j],
                )?;
            }
            terms.push(joint);
        }
        Ok(log_sum_exp(&terms))
    }
}

impl LogLikelihood for MixedModel {
    type Data = MixedData;

    /// Marginal log-likelihood evaluation at parameter vector `θ`.
    ///
    /// # Steps
    /// 1. Split `θ` into `β` and free covariance coordinates.
    /// 2. Reconstruct Σ via [`CovarianceMap::sigma_from_theta`] and factor it
    ///    once (`L Lᵀ = Σ`).
    /// 3. Sum per-observation quadrature contributions in parallel.
    ///
    /// # Errors
    /// - [`OptError::NotPositiveDefinite`](crate::optimization::errors::OptError::NotPositiveDefinite)
    ///   when the candidate Σ cannot be factored; the optimizer treats this
    ///   as a failed step.
    /// - Density-domain errors for responses outside the family support.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        let beta = theta.slice(s![..self.n_coeffs]);
        let sigma = self.cov_map.sigma_from_theta(theta.slice(s![self.n_coeffs..]))?;
        let root = cholesky_root(&sigma)?;
        let total = (0..data.n_obs())
            .into_par_iter()
            .map(|i| self.obs_loglik(data, i, beta, &root))
            .try_reduce(|| 0.0, |a, b| Ok(a + b))?;
        Ok(total)
    }

    /// Validate an unconstrained parameter vector `θ` and the data layout.
    ///
    /// # Behavior
    /// - Checks `θ.len() == p + free_len` and that all entries are finite.
    /// - Cross-checks the data's shape and response families against the
    ///   model's configuration.
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        validate_theta(theta.view(), self.n_coeffs, self.cov_map.free_len())?;
        validate_model_data(data, self.n_coeffs, &self.types)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::core::covariance::SigmaEntry;
    use crate::optimization::loglik_optimizer::{LineSearcher, Tolerances};
    use approx::assert_abs_diff_eq;
    use ndarray::{Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Model construction and layout validation.
    // - Agreement of the quadrature likelihood with the closed-form Normal
    //   marginal N(μ, σ² + ψ) in one latent dimension.
    // - The `check` hook rejecting malformed θ.
    // - An end-to-end smoke fit on a tiny Normal dataset.
    //
    // They intentionally DO NOT cover:
    // - Large-sample parameter recovery (integration tests).
    // - Standard errors and moment prediction (inference layer tests).
    // -------------------------------------------------------------------------

    fn normal_model(nodes: usize) -> MixedModel {
        let types = vec![ResponseType::Normal];
        let restriction = RestrictionMatrix::default_for(&types);
        let options = FitOptions::new(MLEOptions::default(), nodes)
            .expect("Node count should be valid");
        MixedModel::new(1, types, restriction, options).expect("Model should be valid")
    }

    fn normal_data(y_vals: &[f64], psi: f64) -> MixedData {
        let n = y_vals.len();
        let y = Array2::from_shape_vec((n, 1), y_vals.to_vec()).unwrap();
        let x = Array2::<f64>::ones((n, 1));
        MixedData::new(y, x, vec![ResponseType::Normal], array![psi]).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify that `MixedModel::new` rejects zero coefficients and a
    // restriction pattern whose dimension disagrees with the response count.
    //
    // Given
    // -----
    // - A valid single-Normal layout, then p = 0, then a 2×2 restriction
    //   paired with a single response.
    //
    // Expect
    // ------
    // - Ok for the valid layout; `InvalidCoefficientCount` and
    //   `RestrictionDimMismatch` for the invalid ones.
    fn new_validates_layout() {
        // Arrange
        let types = vec![ResponseType::Normal];
        let both = vec![ResponseType::Normal, ResponseType::Normal];

        // Act & Assert
        assert!(
            MixedModel::new(
                1,
                types.clone(),
                RestrictionMatrix::default_for(&types),
                FitOptions::default(),
            )
            .is_ok()
        );
        assert_eq!(
            MixedModel::new(
                0,
                types.clone(),
                RestrictionMatrix::default_for(&types),
                FitOptions::default(),
            )
            .unwrap_err(),
            ModelError::InvalidCoefficientCount { n_coeffs: 0 }
        );
        assert_eq!(
            MixedModel::new(
                1,
                types,
                RestrictionMatrix::default_for(&both),
                FitOptions::default(),
            )
            .unwrap_err(),
            ModelError::RestrictionDimMismatch { expected: 1, actual: 2 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Check the quadrature likelihood against the closed-form Normal
    // marginal: with one Normal response and a latent N(0, σ²), the marginal
    // of y is N(x'β, σ² + ψ).
    //
    // Given
    // -----
    // - p = 1, x ≡ 1, β = 0.4, σ² = 1.44 (θ_Σ = softplus⁻¹(1.44)), ψ = 0.5,
    //   15 quadrature nodes, and a handful of y values.
    //
    // Expect
    // ------
    // - `value` matches the analytic log-likelihood to ~1e-3 (the 15-node
    //   rule carries a quadrature error of a few 1e-4 at this σ²/ψ ratio).
    fn value_matches_closed_form_normal_marginal() {
        // Arrange
        let model = normal_model(15);
        let y_vals = [0.3_f64, -1.1, 2.4, 0.0, 0.9];
        let psi = 0.5;
        let data = normal_data(&y_vals, psi);
        let beta = 0.4;
        let sigma2 = 1.44_f64;
        let theta_sigma = (sigma2.exp_m1()).ln();
        let theta = array![beta, theta_sigma];

        let var = sigma2 + psi;
        let expected: f64 = y_vals
            .iter()
            .map(|y| {
                let resid = y - beta;
                -0.5 * (resid * resid / var
                    + var.ln()
                    + (2.0 * std::f64::consts::PI).ln())
            })
            .sum();

        // Act
        let got = model.value(&theta, &data).expect("Likelihood should evaluate");

        // Assert
        assert_abs_diff_eq!(got, expected, epsilon = 1e-3);
    }

    #[test]
    // Purpose
    // -------
    // Ensure that `check` rejects a θ of the wrong length and a dataset whose
    // layout disagrees with the model.
    //
    // Given
    // -----
    // - A single-Normal model (θ length 2) and a length-3 θ.
    //
    // Expect
    // ------
    // - `check` returns an error for the malformed θ and Ok for a valid one.
    fn check_rejects_malformed_theta() {
        // Arrange
        let model = normal_model(5);
        let data = normal_data(&[0.1, 0.2], 1.0);

        // Act & Assert
        assert!(model.check(&array![0.0, 0.0], &data).is_ok());
        assert!(model.check(&array![0.0, 0.0, 0.0], &data).is_err());
    }

    #[test]
    // Purpose
    // -------
    // End-to-end smoke test: fitting a small Normal dataset succeeds,
    // populates the snapshot, and produces finite estimates.
    //
    // Given
    // -----
    // - 30 Normal observations centered near 1.5 with ψ = 1, 5 quadrature
    //   nodes, and a loose iteration cap.
    //
    // Expect
    // ------
    // - `fit` returns Ok; β̂ is finite and within [0, 3]; Σ̂ is 1×1 with a
    //   positive entry; `fitted()` succeeds.
    fn fit_smoke_test_on_normal_data() {
        // Arrange
        let mut model = normal_model(5);
        let tols = Tolerances::new(Some(1e-5), None, Some(200)).unwrap();
        model.options.mle_opts =
            MLEOptions::new(tols, LineSearcher::MoreThuente, None).unwrap();
        let y_vals: Vec<f64> =
            (0..30).map(|i| 1.5 + 0.9 * ((i as f64) * 0.7).sin()).collect();
        let data = normal_data(&y_vals, 1.0);

        // Act
        model.fit(&data).expect("Fit should succeed on well-behaved data");

        // Assert
        let fit = model.fitted().expect("Snapshot should be populated");
        assert!(fit.beta[0].is_finite());
        assert!(fit.beta[0] > 0.0 && fit.beta[0] < 3.0);
        assert_eq!(fit.sigma.shape(), &[1, 1]);
        assert!(fit.sigma[(0, 0)] > 0.0);
        assert_eq!(fit.free_entries, vec![(0, 0)]);
    }

    #[test]
    // Purpose
    // -------
    // Verify that `fit_from` refuses to run when the restriction pattern has
    // no positive definite completion.
    //
    // Given
    // -----
    // - Two Normal responses with unit diagonals fixed and the off-diagonal
    //   fixed at 5.0 (|ρ| > 1).
    //
    // Expect
    // ------
    // - `fit` fails with `InfeasibleRestriction` before optimizing.
    fn fit_rejects_infeasible_restriction() {
        // Arrange
        let types = vec![ResponseType::Normal, ResponseType::Normal];
        let mut entries = Array2::from_elem((2, 2), SigmaEntry::Fixed(1.0));
        entries[(0, 1)] = SigmaEntry::Fixed(5.0);
        entries[(1, 0)] = SigmaEntry::Fixed(5.0);
        let restriction = RestrictionMatrix::new(entries, &types).unwrap();
        let mut model =
            MixedModel::new(1, types.clone(), restriction, FitOptions::default()).unwrap();
        let y = Array2::<f64>::zeros((4, 2));
        let x = Array2::<f64>::ones((8, 1));
        let data = MixedData::new(y, x, types, array![1.0, 1.0]).unwrap();

        // Act
        let result = model.fit(&data);

        // Assert
        assert!(matches!(
            result,
            Err(crate::optimization::errors::OptError::InfeasibleRestriction)
        ));
    }
}
