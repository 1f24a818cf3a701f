//! statistical_tests::likelihood_ratio — approximate LRT for nested fits.
//!
//! Purpose
//! -------
//! Compare two fitted mixed latent-variable models where the null model's
//! covariance restriction is strictly nested in the full model's, using the
//! classical likelihood-ratio statistic with a χ² reference distribution.
//!
//! Key behaviors
//! -------------
//! - Validate nesting through
//!   [`validate_nested`](crate::statistical_tests::validation::validate_nested)
//!   and derive the degrees of freedom as the number of additionally freed
//!   covariance coordinates.
//! - Compute `stat = 2·(ℓ_full − ℓ_null)` and the upper-tail p-value
//!   `P(χ²_df > stat)`.
//! - Clamp statistics that are negative within numerical noise to zero;
//!   reject materially negative statistics as evidence of a poor optimum.
//!
//! Invariants & assumptions
//! ------------------------
//! - Both fits must come from the same dataset and the same response
//!   layout; this cannot be checked from the snapshots and is the caller's
//!   responsibility.
//! - The χ² reference is approximate: free covariance diagonals sit at an
//!   interior point of their softplus parameterization, but restricted
//!   alternatives on the boundary of the positive-definite cone would call
//!   for mixture references that this test does not implement.
//!
//! Downstream usage
//! ----------------
//! - Fit a restricted and an unrestricted
//!   [`MixedModel`](crate::model::models::MixedModel), extract their
//!   [`MixedFit`] snapshots via `fitted()`, and call
//!   [`LrtOutcome::likelihood_ratio_test`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover the statistic and p-value on hand-built snapshots,
//!   the clamping of tiny negative statistics, the rejection of materially
//!   negative statistics, and the propagation of nesting failures.

use crate::model::models::MixedFit;
use crate::statistical_tests::errors::{LrtError, LrtResult};
use crate::statistical_tests::validation::validate_nested;
use statrs::distribution::{ChiSquared, ContinuousCDF};

// Relative slack for log-likelihood comparisons between two optimizer runs.
const NEGATIVE_STAT_TOL: f64 = 1e-6;

/// LrtOutcome — result of a nested-model likelihood-ratio test.
///
/// Fields
/// ------
/// - `stat`: the statistic `2·(ℓ_full − ℓ_null)`, clamped at zero.
/// - `df`: degrees of freedom (covariance coordinates freed by the full
///   model beyond the null).
/// - `p_value`: upper-tail probability under `χ²_df`.
#[derive(Debug, Copy, Clone)]
pub struct LrtOutcome {
    stat: f64,
    df: usize,
    p_value: f64,
}

impl LrtOutcome {
    /// Run the likelihood-ratio test for a nested pair of fits.
    ///
    /// Parameters
    /// ----------
    /// - `null`: fitted restricted model snapshot.
    /// - `full`: fitted unrestricted model snapshot.
    ///
    /// Returns
    /// -------
    /// `LrtResult<LrtOutcome>` — the statistic, degrees of freedom, and
    /// p-value.
    ///
    /// Errors
    /// ------
    /// - Any nesting failure from
    ///   [`validate_nested`](crate::statistical_tests::validation::validate_nested).
    /// - `LrtError::NegativeStatistic` when `ℓ_full` falls below `ℓ_null`
    ///   beyond numerical tolerance.
    /// - `LrtError::InvalidDegreesOfFreedom` when the χ² reference cannot
    ///   be constructed.
    ///
    /// Notes
    /// -----
    /// - The tolerance for negative statistics scales with `|ℓ_full|`, so
    ///   rounding noise on large-sample log-likelihoods does not trigger
    ///   spurious rejections.
    pub fn likelihood_ratio_test(null: &MixedFit, full: &MixedFit) -> LrtResult<Self> {
        let df = validate_nested(null, full)?;
        let raw = 2.0 * (full.loglik - null.loglik);
        let tol = NEGATIVE_STAT_TOL * (1.0 + full.loglik.abs());
        if raw < -tol {
            return Err(LrtError::NegativeStatistic { statistic: raw });
        }
        let stat = raw.max(0.0);
        let chi = ChiSquared::new(df as f64)
            .map_err(|_| LrtError::InvalidDegreesOfFreedom { df })?;
        let p_value = 1.0 - chi.cdf(stat);
        Ok(LrtOutcome { stat, df, p_value })
    }

    // ---- Accessors ----

    /// The likelihood-ratio statistic.
    pub fn stat(&self) -> f64 {
        self.stat
    }

    /// Degrees of freedom of the χ² reference.
    pub fn df(&self) -> usize {
        self.df
    }

    /// Upper-tail p-value.
    pub fn p_value(&self) -> f64 {
        self.p_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array1, Array2};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Statistic, df, and p-value for a hand-built nested pair.
    // - Clamping of statistics that are negative within noise.
    // - Rejection of materially negative statistics.
    // - Propagation of nesting failures from validation.
    // -------------------------------------------------------------------------

    fn make_fit(free: Vec<(usize, usize)>, loglik: f64) -> MixedFit {
        MixedFit {
            beta: Array1::zeros(1),
            sigma: Array2::eye(2),
            loglik,
            converged: true,
            iterations: 10,
            free_entries: free,
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify the statistic and p-value against the χ²₁ distribution for a
    // known log-likelihood gap.
    //
    // Given
    // -----
    // - ℓ_null = -105.0, ℓ_full = -103.0, one additional free coordinate.
    //
    // Expect
    // ------
    // - stat = 4.0, df = 1, p-value = P(χ²₁ > 4) ≈ 0.04550.
    fn statistic_and_p_value_match_chi_squared_reference() {
        // Arrange
        let null = make_fit(vec![(0, 0), (1, 1)], -105.0);
        let full = make_fit(vec![(0, 0), (0, 1), (1, 1)], -103.0);

        // Act
        let outcome = LrtOutcome::likelihood_ratio_test(&null, &full)
            .expect("Test should run on a valid nested pair");

        // Assert
        assert_abs_diff_eq!(outcome.stat(), 4.0, epsilon = 1e-12);
        assert_eq!(outcome.df(), 1);
        assert_abs_diff_eq!(outcome.p_value(), 0.045_500_263_896_358, epsilon = 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // A full model whose log-likelihood falls a hair below the null's, within
    // the relative tolerance, yields a zero statistic and p-value 1.
    //
    // Given
    // -----
    // - ℓ_full = ℓ_null − 1e-9 at |ℓ| ≈ 100.
    //
    // Expect
    // ------
    // - stat = 0.0, p-value = 1.0.
    fn tiny_negative_statistic_is_clamped_to_zero() {
        // Arrange
        let null = make_fit(vec![(0, 0), (1, 1)], -100.0);
        let full = make_fit(vec![(0, 0), (0, 1), (1, 1)], -100.0 - 1e-9);

        // Act
        let outcome = LrtOutcome::likelihood_ratio_test(&null, &full)
            .expect("Noise-level deficits should be clamped");

        // Assert
        assert_eq!(outcome.stat(), 0.0);
        assert_abs_diff_eq!(outcome.p_value(), 1.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // A full model materially worse than the null signals a failed
    // optimization and is rejected rather than reported as a p-value.
    //
    // Given
    // -----
    // - ℓ_full = ℓ_null − 1.0.
    //
    // Expect
    // ------
    // - `LrtError::NegativeStatistic` with the raw statistic.
    fn materially_negative_statistic_is_rejected() {
        // Arrange
        let null = make_fit(vec![(0, 0), (1, 1)], -100.0);
        let full = make_fit(vec![(0, 0), (0, 1), (1, 1)], -101.0);

        // Act
        let result = LrtOutcome::likelihood_ratio_test(&null, &full);

        // Assert
        assert_eq!(result.unwrap_err(), LrtError::NegativeStatistic { statistic: -2.0 });
    }

    #[test]
    // Purpose
    // -------
    // Nesting failures surface unchanged from validation.
    //
    // Given
    // -----
    // - A "null" freeing a coordinate the full model fixes.
    //
    // Expect
    // ------
    // - `LrtError::NotNested` with the offending coordinate.
    fn nesting_failure_propagates() {
        // Arrange
        let null = make_fit(vec![(0, 0), (0, 1)], -100.0);
        let full = make_fit(vec![(0, 0), (1, 1)], -99.0);

        // Act
        let result = LrtOutcome::likelihood_ratio_test(&null, &full);

        // Assert
        assert_eq!(result.unwrap_err(), LrtError::NotNested { row: 0, col: 1 });
    }
}
