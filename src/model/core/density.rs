//! Conditional log densities and moments for the supported response families.
//!
//! Purpose
//! -------
//! Evaluate, for a single response coordinate, the conditional log density of
//! the observation given the linear predictor `w` on the latent scale, and
//! the matching conditional mean/variance used in moment prediction. This is
//! the innermost kernel of the quadrature likelihood.
//!
//! Key behaviors
//! -------------
//! - Normal: `N(w, ψ)` log density (identity link, ψ = variance).
//! - Poisson: log-mass `y·w − exp(w) − ln Γ(y+1)` (log link); ψ is validated
//!   (> 0) but does not enter the mass — for ψ ≠ 1 the marginal likelihood is
//!   a quasi-likelihood approximation, and ψ scales the conditional variance
//!   only.
//! - Bernoulli: `y·w − softplus(w)` (logit link); ψ must be exactly 1.
//!
//! Invariants & assumptions
//! ------------------------
//! - `w` may be any real, including extreme values: the softplus guard and
//!   the natural decay of `−exp(w)` keep the log density well-defined (it may
//!   reach −∞, which the log-sum-exp combination absorbs as long as some node
//!   stays finite).
//! - Response-support checks mirror the `MixedData` constructor so the
//!   density is safe to call on unvalidated scalars (e.g. in moment code).
//!
//! Conventions
//! -----------
//! - Pure scalar functions, no allocation, no I/O; suitable for the hot loop.
//!
//! Downstream usage
//! ----------------
//! - `model::models::latent` sums these over coordinates per quadrature node.
//! - `inference::moments` uses [`conditional_mean`] / [`conditional_variance`]
//!   for marginal moment assembly.
//!
//! Testing notes
//! -------------
//! - Unit tests check each family against closed-form values, the domain
//!   error paths, and stability at |w| = 800.
use crate::model::core::data::ResponseType;
use crate::model::errors::{ModelError, ModelResult};
use crate::optimization::numerical_stability::{safe_logistic, safe_softplus};
use statrs::function::gamma::ln_gamma;

const LN_2PI: f64 = 1.837877066409345483560659472811;

/// Conditional log density of one response coordinate given its linear
/// predictor on the latent scale.
///
/// Parameters
/// ----------
/// - `y`: observed response value.
/// - `response`: family label of the coordinate.
/// - `w`: linear predictor `x'β + (L z)_j` on the latent scale.
/// - `psi`: dispersion of the coordinate; must be finite and > 0, and
///   exactly 1 for Bernoulli.
///
/// Returns
/// -------
/// `ModelResult<f64>`
///   - `Ok(log density)`; may be `-∞` when `exp(w)` overflows for Poisson,
///     which downstream log-sum-exp handles.
///   - `Err(ModelError)` for domain violations.
///
/// Errors
/// ------
/// - `ModelError::InvalidPsi` — ψ non-finite or ≤ 0, or Bernoulli ψ ≠ 1.
/// - `ModelError::InvalidDensityInput` — `y` outside the family's support
///   ({0, 1} for Bernoulli; finite nonnegative integers for Poisson; finite
///   for Normal).
///
/// Panics
/// ------
/// - Never panics.
pub fn log_conditional_density(
    y: f64, response: ResponseType, w: f64, psi: f64,
) -> ModelResult<f64> {
    if !psi.is_finite() || psi <= 0.0 {
        return Err(ModelError::InvalidPsi { value: psi });
    }
    match response {
        ResponseType::Normal => {
            if !y.is_finite() {
                return Err(ModelError::InvalidDensityInput {
                    value: y,
                    reason: "Normal responses must be finite.",
                });
            }
            let resid = y - w;
            Ok(-0.5 * (resid * resid / psi + psi.ln() + LN_2PI))
        }
        ResponseType::Bernoulli => {
            if psi != 1.0 {
                return Err(ModelError::InvalidPsi { value: psi });
            }
            if y != 0.0 && y != 1.0 {
                return Err(ModelError::InvalidDensityInput {
                    value: y,
                    reason: "Bernoulli responses must be 0 or 1.",
                });
            }
            Ok(y * w - safe_softplus(w))
        }
        ResponseType::Poisson => {
            if !y.is_finite() || y < 0.0 || y.fract() != 0.0 {
                return Err(ModelError::InvalidDensityInput {
                    value: y,
                    reason: "Poisson responses must be finite nonnegative integers.",
                });
            }
            Ok(y * w - w.exp() - ln_gamma(y + 1.0))
        }
    }
}

/// Conditional mean of one response coordinate given its linear predictor.
///
/// Normal: `w`; Bernoulli: `σ(w)`; Poisson: `exp(w)`.
pub fn conditional_mean(response: ResponseType, w: f64) -> f64 {
    match response {
        ResponseType::Normal => w,
        ResponseType::Bernoulli => safe_logistic(w),
        ResponseType::Poisson => w.exp(),
    }
}

/// Conditional variance of one response coordinate given its linear
/// predictor and dispersion.
///
/// Normal: `ψ`; Bernoulli: `σ(w)(1 − σ(w))`; Poisson: `ψ·exp(w)` (the ψ
/// factor carries quasi-likelihood overdispersion into the marginal
/// variance).
pub fn conditional_variance(response: ResponseType, w: f64, psi: f64) -> f64 {
    match response {
        ResponseType::Normal => psi,
        ResponseType::Bernoulli => {
            let p = safe_logistic(w);
            p * (1.0 - p)
        }
        ResponseType::Poisson => psi * w.exp(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Closed-form agreement for each family's log density.
    // - Domain error paths (bad ψ, unsupported responses).
    // - Stability of the log densities for extreme linear predictors.
    // - Conditional mean/variance dispatch.
    //
    // They intentionally DO NOT cover:
    // - Quadrature combination of densities (model-layer tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the Normal log density against the explicit formula.
    //
    // Given
    // -----
    // - y = 1.3, w = 0.5, ψ = 2.0.
    //
    // Expect
    // ------
    // - log density = -0.5·((y-w)²/ψ + ln ψ + ln 2π).
    fn normal_log_density_matches_closed_form() {
        // Arrange
        let (y, w, psi) = (1.3_f64, 0.5_f64, 2.0_f64);
        let expected = -0.5 * ((y - w).powi(2) / psi + psi.ln() + LN_2PI);

        // Act
        let value = log_conditional_density(y, ResponseType::Normal, w, psi).unwrap();

        // Assert
        assert_abs_diff_eq!(value, expected, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify the Bernoulli log density against ln σ(w) / ln(1 − σ(w)).
    //
    // Given
    // -----
    // - w = 0.7, y in {0, 1}, ψ = 1.
    //
    // Expect
    // ------
    // - y = 1 gives ln σ(w); y = 0 gives ln(1 − σ(w)).
    fn bernoulli_log_density_matches_logit_form() {
        // Arrange
        let w = 0.7_f64;
        let p = 1.0 / (1.0 + (-w).exp());

        // Act
        let one = log_conditional_density(1.0, ResponseType::Bernoulli, w, 1.0).unwrap();
        let zero = log_conditional_density(0.0, ResponseType::Bernoulli, w, 1.0).unwrap();

        // Assert
        assert_abs_diff_eq!(one, p.ln(), epsilon = 1e-12);
        assert_abs_diff_eq!(zero, (1.0 - p).ln(), epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify the Poisson log-mass against the explicit formula and that ψ
    // does not enter the mass.
    //
    // Given
    // -----
    // - y = 4, w = 1.1, ψ = 1 and ψ = 2.5.
    //
    // Expect
    // ------
    // - log mass = y·w − exp(w) − ln 4! for both ψ values.
    fn poisson_log_mass_matches_closed_form_and_ignores_psi() {
        // Arrange
        let (y, w) = (4.0_f64, 1.1_f64);
        let expected = y * w - w.exp() - 24.0_f64.ln();

        // Act
        let unit = log_conditional_density(y, ResponseType::Poisson, w, 1.0).unwrap();
        let over = log_conditional_density(y, ResponseType::Poisson, w, 2.5).unwrap();

        // Assert
        assert_abs_diff_eq!(unit, expected, epsilon = 1e-10);
        assert_abs_diff_eq!(over, expected, epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Ensure domain violations are rejected: bad ψ, Bernoulli ψ ≠ 1,
    // unsupported responses.
    //
    // Given
    // -----
    // - ψ = 0, Bernoulli ψ = 2, Bernoulli y = 0.5, Poisson y = -1 and 2.5.
    //
    // Expect
    // ------
    // - `InvalidPsi` and `InvalidDensityInput` as appropriate.
    fn density_rejects_domain_violations() {
        // Act & Assert
        assert_eq!(
            log_conditional_density(1.0, ResponseType::Normal, 0.0, 0.0).unwrap_err(),
            ModelError::InvalidPsi { value: 0.0 }
        );
        assert_eq!(
            log_conditional_density(1.0, ResponseType::Bernoulli, 0.0, 2.0).unwrap_err(),
            ModelError::InvalidPsi { value: 2.0 }
        );
        assert!(matches!(
            log_conditional_density(0.5, ResponseType::Bernoulli, 0.0, 1.0),
            Err(ModelError::InvalidDensityInput { .. })
        ));
        assert!(matches!(
            log_conditional_density(-1.0, ResponseType::Poisson, 0.0, 1.0),
            Err(ModelError::InvalidDensityInput { .. })
        ));
        assert!(matches!(
            log_conditional_density(2.5, ResponseType::Poisson, 0.0, 1.0),
            Err(ModelError::InvalidDensityInput { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Check stability for extreme linear predictors: no NaN, and the
    // Poisson overflow decays to -inf rather than poisoning arithmetic.
    //
    // Given
    // -----
    // - w = ±800 for each family.
    //
    // Expect
    // ------
    // - Bernoulli/Normal values are finite; Poisson at w = 800 is -inf;
    //   none are NaN.
    fn density_is_stable_for_extreme_predictors() {
        // Act
        let bern_hi = log_conditional_density(0.0, ResponseType::Bernoulli, 800.0, 1.0).unwrap();
        let bern_lo = log_conditional_density(1.0, ResponseType::Bernoulli, -800.0, 1.0).unwrap();
        let norm = log_conditional_density(0.0, ResponseType::Normal, 800.0, 1.0).unwrap();
        let pois_hi = log_conditional_density(2.0, ResponseType::Poisson, 800.0, 1.0).unwrap();
        let pois_lo = log_conditional_density(2.0, ResponseType::Poisson, -800.0, 1.0).unwrap();

        // Assert
        assert!(bern_hi.is_finite() && bern_lo.is_finite());
        assert!(norm.is_finite());
        assert_eq!(pois_hi, f64::NEG_INFINITY);
        assert!(pois_lo.is_finite());
    }

    #[test]
    // Purpose
    // -------
    // Verify the conditional mean/variance dispatch per family.
    //
    // Given
    // -----
    // - w = 0.4, ψ = 1.5.
    //
    // Expect
    // ------
    // - Normal: (w, ψ); Bernoulli: (σ, σ(1−σ)); Poisson: (e^w, ψ·e^w).
    fn conditional_moments_follow_the_family_links() {
        // Arrange
        let (w, psi) = (0.4_f64, 1.5_f64);
        let sigma = 1.0 / (1.0 + (-w).exp());

        // Act & Assert
        assert_abs_diff_eq!(conditional_mean(ResponseType::Normal, w), w, epsilon = 1e-12);
        assert_abs_diff_eq!(
            conditional_variance(ResponseType::Normal, w, psi),
            psi,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            conditional_mean(ResponseType::Bernoulli, w),
            sigma,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            conditional_variance(ResponseType::Bernoulli, w, 1.0),
            sigma * (1.0 - sigma),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(conditional_mean(ResponseType::Poisson, w), w.exp(), epsilon = 1e-12);
        assert_abs_diff_eq!(
            conditional_variance(ResponseType::Poisson, w, psi),
            psi * w.exp(),
            epsilon = 1e-12
        );
    }
}
