//! Latent covariance parameterization and Fixed/Free restriction handling.
//!
//! Purpose
//! -------
//! Describe which entries of the latent covariance Σ are estimated and which
//! are pinned, and map bijectively between the unconstrained free-parameter
//! slice the optimizer sees and the symmetric matrix Σ the likelihood needs.
//!
//! Key behaviors
//! -------------
//! - [`SigmaEntry`] tags each entry `Fixed(v)` or `Free`; [`RestrictionMatrix`]
//!   wraps the r×r tag grid and validates it (symmetry of values and of the
//!   pattern, positive fixed variances, `Fixed(1.0)` on Bernoulli diagonals).
//! - [`CovarianceMap`] enumerates the free upper-triangular coordinates in
//!   row-major order and implements the forward map (softplus on free
//!   diagonals, identity on free off-diagonals, fixed entries verbatim), its
//!   inverse for warm starts, the identity-pattern default start, and an
//!   explicit feasibility pre-check.
//! - [`cholesky_root`] factorizes a candidate Σ; failure is an error, never a
//!   silent retry.
//!
//! Invariants & assumptions
//! ------------------------
//! - Free-entry enumeration order is part of the public contract: row-major
//!   over the upper triangle (including the diagonal). Nested-model tests
//!   compare these coordinate sets directly.
//! - The forward map produces a symmetric matrix for any finite input slice;
//!   positive definiteness is enforced at factorization time.
//!
//! Conventions
//! -----------
//! - Indices are 0-based; only `i ≤ j` coordinates are enumerated and the
//!   mirror entry is filled automatically.
//!
//! Downstream usage
//! ----------------
//! - `model::models::latent` rebuilds Σ from θ on every likelihood
//!   evaluation and takes its Cholesky root once per call.
//! - `statistical_tests::validation` compares free-entry sets to establish
//!   nestedness.
//!
//! Testing notes
//! -------------
//! - Unit tests cover pattern validation, forward/inverse round trips,
//!   fixed-entry verbatim placement, the identity default start, and the
//!   feasibility pre-check on an infeasible fixed pattern.
use crate::model::core::data::ResponseType;
use crate::model::errors::{ParamError, ParamResult};
use crate::optimization::numerical_stability::{safe_softplus, safe_softplus_inv};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Restriction tag for one entry of the latent covariance Σ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SigmaEntry {
    /// Entry is pinned to this value and never estimated.
    Fixed(f64),
    /// Entry is estimated as a free parameter.
    Free,
}

/// Validated r×r grid of [`SigmaEntry`] tags describing the Σ pattern.
///
/// Construction enforces:
/// - a square grid matching the response-type labels in length,
/// - symmetric values (`Fixed` pairs must agree) and a symmetric pattern
///   (no `Fixed`/`Free` mixed mirror pairs),
/// - finite fixed entries, strictly positive fixed variances,
/// - `Fixed(1.0)` diagonals on Bernoulli coordinates (the latent scale of a
///   binary response is not identified, so its variance is pinned).
#[derive(Debug, Clone, PartialEq)]
pub struct RestrictionMatrix {
    entries: Array2<SigmaEntry>,
}

impl RestrictionMatrix {
    /// Construct a validated restriction matrix for the given response
    /// types.
    ///
    /// Parameters
    /// ----------
    /// - `entries`: r×r grid of tags.
    /// - `types`: length-r response family labels; Bernoulli coordinates
    ///   must carry `Fixed(1.0)` diagonals.
    ///
    /// Returns
    /// -------
    /// `ParamResult<RestrictionMatrix>` — `Ok` on a consistent pattern,
    /// otherwise the first violation found.
    ///
    /// Errors
    /// ------
    /// - `ParamError::NotSquare` — grid is not square.
    /// - `ParamError::TypeLengthMismatch` — grid dimension ≠ `types.len()`.
    /// - `ParamError::AsymmetricFixedEntry` / `AsymmetricPattern` — mirror
    ///   pairs disagree in value or in kind.
    /// - `ParamError::NonFiniteFixedEntry` — NaN/±∞ fixed value.
    /// - `ParamError::NonPositiveFixedVariance` — fixed diagonal ≤ 0.
    /// - `ParamError::BernoulliVarianceNotFixed` — Bernoulli diagonal not
    ///   `Fixed(1.0)`.
    pub fn new(entries: Array2<SigmaEntry>, types: &[ResponseType]) -> ParamResult<Self> {
        let rows = entries.nrows();
        let cols = entries.ncols();
        if rows != cols {
            return Err(ParamError::NotSquare { rows, cols });
        }
        if types.len() != rows {
            return Err(ParamError::TypeLengthMismatch { expected: types.len(), actual: rows });
        }

        for i in 0..rows {
            match entries[(i, i)] {
                SigmaEntry::Fixed(value) => {
                    if !value.is_finite() {
                        return Err(ParamError::NonFiniteFixedEntry { row: i, col: i, value });
                    }
                    if value <= 0.0 {
                        return Err(ParamError::NonPositiveFixedVariance { index: i, value });
                    }
                    if types[i] == ResponseType::Bernoulli && value != 1.0 {
                        return Err(ParamError::BernoulliVarianceNotFixed { index: i });
                    }
                }
                SigmaEntry::Free => {
                    if types[i] == ResponseType::Bernoulli {
                        return Err(ParamError::BernoulliVarianceNotFixed { index: i });
                    }
                }
            }
        }

        for i in 0..rows {
            for j in (i + 1)..cols {
                match (entries[(i, j)], entries[(j, i)]) {
                    (SigmaEntry::Fixed(a), SigmaEntry::Fixed(b)) => {
                        if !a.is_finite() {
                            return Err(ParamError::NonFiniteFixedEntry {
                                row: i,
                                col: j,
                                value: a,
                            });
                        }
                        if a != b {
                            return Err(ParamError::AsymmetricFixedEntry { row: i, col: j });
                        }
                    }
                    (SigmaEntry::Free, SigmaEntry::Free) => {}
                    _ => {
                        return Err(ParamError::AsymmetricPattern { row: i, col: j });
                    }
                }
            }
        }

        Ok(RestrictionMatrix { entries })
    }

    /// Default pattern for the given response types: every entry free except
    /// Bernoulli diagonals, which are pinned to 1.
    pub fn default_for(types: &[ResponseType]) -> Self {
        let r = types.len();
        let mut entries = Array2::from_elem((r, r), SigmaEntry::Free);
        for (i, &ty) in types.iter().enumerate() {
            if ty == ResponseType::Bernoulli {
                entries[(i, i)] = SigmaEntry::Fixed(1.0);
            }
        }
        RestrictionMatrix { entries }
    }

    /// Matrix dimension r.
    pub fn dim(&self) -> usize {
        self.entries.nrows()
    }

    /// Tag at position (i, j).
    pub fn entry(&self, i: usize, j: usize) -> SigmaEntry {
        self.entries[(i, j)]
    }
}

/// Bijection between the free covariance slice and the symmetric matrix Σ.
///
/// Free upper-triangular coordinates are enumerated in row-major order at
/// construction; the slice the optimizer sees has one entry per coordinate,
/// with free diagonals passing through `safe_softplus` to stay strictly
/// positive.
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceMap {
    restriction: RestrictionMatrix,
    free_entries: Vec<(usize, usize)>,
}

impl CovarianceMap {
    /// Build the map from a validated restriction pattern.
    pub fn new(restriction: RestrictionMatrix) -> Self {
        let r = restriction.dim();
        let mut free_entries = Vec::new();
        for i in 0..r {
            for j in i..r {
                if restriction.entry(i, j) == SigmaEntry::Free {
                    free_entries.push((i, j));
                }
            }
        }
        CovarianceMap { restriction, free_entries }
    }

    /// Matrix dimension r.
    pub fn dim(&self) -> usize {
        self.restriction.dim()
    }

    /// Number of free parameters.
    pub fn free_len(&self) -> usize {
        self.free_entries.len()
    }

    /// Free upper-triangular coordinates in enumeration (row-major) order.
    pub fn free_entries(&self) -> &[(usize, usize)] {
        &self.free_entries
    }

    /// Underlying restriction pattern.
    pub fn restriction(&self) -> &RestrictionMatrix {
        &self.restriction
    }

    /// Forward map: unconstrained slice → symmetric Σ.
    ///
    /// Free diagonals pass through `safe_softplus`; free off-diagonals map
    /// directly; fixed entries are placed verbatim.
    ///
    /// Errors
    /// ------
    /// - `ParamError::ThetaLengthMismatch` — slice length ≠ `free_len()`.
    /// - `ParamError::InvalidThetaInput` — NaN/±∞ entry.
    pub fn sigma_from_theta(&self, theta: ArrayView1<f64>) -> ParamResult<Array2<f64>> {
        if theta.len() != self.free_entries.len() {
            return Err(ParamError::ThetaLengthMismatch {
                expected: self.free_entries.len(),
                actual: theta.len(),
            });
        }
        for (index, &value) in theta.iter().enumerate() {
            if !value.is_finite() {
                return Err(ParamError::InvalidThetaInput { index, value });
            }
        }

        let r = self.restriction.dim();
        let mut sigma = Array2::<f64>::zeros((r, r));
        for i in 0..r {
            for j in i..r {
                if let SigmaEntry::Fixed(value) = self.restriction.entry(i, j) {
                    sigma[(i, j)] = value;
                    sigma[(j, i)] = value;
                }
            }
        }
        for (t, &(i, j)) in self.free_entries.iter().enumerate() {
            let value = if i == j { safe_softplus(theta[t]) } else { theta[t] };
            sigma[(i, j)] = value;
            sigma[(j, i)] = value;
        }
        Ok(sigma)
    }

    /// Inverse map for warm starts: Σ → unconstrained slice.
    ///
    /// Only the free coordinates of `sigma` are read; fixed coordinates are
    /// ignored, so a warm start need not reproduce the pinned values exactly.
    ///
    /// Errors
    /// ------
    /// - `ParamError::SigmaDimMismatch` — `sigma` is not r×r.
    /// - `ParamError::NonPositiveDiagonal` — free diagonal ≤ 0 or non-finite.
    /// - `ParamError::InvalidThetaInput` — non-finite free off-diagonal
    ///   (reported at its enumeration index).
    pub fn theta_from_sigma(&self, sigma: ArrayView2<f64>) -> ParamResult<Array1<f64>> {
        let r = self.restriction.dim();
        if sigma.nrows() != r || sigma.ncols() != r {
            return Err(ParamError::SigmaDimMismatch { expected: r, actual: sigma.nrows() });
        }
        let mut theta = Array1::<f64>::zeros(self.free_entries.len());
        for (t, &(i, j)) in self.free_entries.iter().enumerate() {
            let value = sigma[(i, j)];
            if i == j {
                if !value.is_finite() || value <= 0.0 {
                    return Err(ParamError::NonPositiveDiagonal { index: i, value });
                }
                theta[t] = safe_softplus_inv(value);
            } else {
                if !value.is_finite() {
                    return Err(ParamError::InvalidThetaInput { index: t, value });
                }
                theta[t] = value;
            }
        }
        Ok(theta)
    }

    /// Default start: the slice mapping to the identity-completed pattern
    /// (free diagonals 1, free off-diagonals 0, fixed entries as pinned).
    pub fn initial_theta(&self) -> Array1<f64> {
        let unit = safe_softplus_inv(1.0);
        Array1::from_iter(
            self.free_entries.iter().map(|&(i, j)| if i == j { unit } else { 0.0 }),
        )
    }

    /// Feasibility pre-check: factorize the identity-completed Σ.
    ///
    /// A fixed pattern that admits no positive definite completion at the
    /// default start is reported as a configuration error before any
    /// optimization runs.
    ///
    /// Errors
    /// ------
    /// - `ParamError::InfeasibleRestriction` — the identity-completed Σ is
    ///   not positive definite.
    pub fn check_feasible(&self) -> ParamResult<()> {
        let sigma = self.sigma_from_theta(self.initial_theta().view())?;
        cholesky_root(&sigma).map_err(|_| ParamError::InfeasibleRestriction)?;
        Ok(())
    }
}

/// Lower-triangular Cholesky root L of a symmetric matrix, Σ = L Lᵀ.
///
/// Copies into an `nalgebra::DMatrix`, factorizes, and copies back.
///
/// Errors
/// ------
/// - `ParamError::NotPositiveDefinite` — factorization failed.
pub fn cholesky_root(sigma: &Array2<f64>) -> ParamResult<Array2<f64>> {
    let r = sigma.nrows();
    let dm = DMatrix::from_fn(r, r, |i, j| sigma[(i, j)]);
    let chol = dm.cholesky().ok_or(ParamError::NotPositiveDefinite)?;
    let l = chol.l();
    Ok(Array2::from_shape_fn((r, r), |(i, j)| l[(i, j)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Restriction-pattern validation (asymmetry, Bernoulli diagonals,
    //   non-positive fixed variances).
    // - Forward/inverse map round trips and fixed-entry placement.
    // - The identity default start and the feasibility pre-check.
    // - Cholesky root agreement with a hand-computed factor.
    //
    // They intentionally DO NOT cover:
    // - Likelihood evaluation through the map (model-layer tests).
    // -------------------------------------------------------------------------

    fn all_normal(r: usize) -> Vec<ResponseType> {
        vec![ResponseType::Normal; r]
    }

    #[test]
    // Purpose
    // -------
    // Verify the default pattern frees everything except Bernoulli
    // diagonals and that the free-entry enumeration is row-major.
    //
    // Given
    // -----
    // - types = [Normal, Bernoulli].
    //
    // Expect
    // ------
    // - Entry (1,1) is Fixed(1.0); free entries are [(0,0), (0,1)].
    fn default_pattern_pins_bernoulli_diagonals() {
        // Arrange
        let types = vec![ResponseType::Normal, ResponseType::Bernoulli];

        // Act
        let restriction = RestrictionMatrix::default_for(&types);
        let map = CovarianceMap::new(restriction.clone());

        // Assert
        assert_eq!(restriction.entry(1, 1), SigmaEntry::Fixed(1.0));
        assert_eq!(map.free_entries(), &[(0, 0), (0, 1)]);
    }

    #[test]
    // Purpose
    // -------
    // Ensure pattern validation rejects asymmetric values, asymmetric
    // kinds, non-positive fixed variances, and a free Bernoulli diagonal.
    //
    // Given
    // -----
    // - Four invalid 2×2 patterns.
    //
    // Expect
    // ------
    // - The matching `ParamError` variant for each.
    fn restriction_matrix_rejects_invalid_patterns() {
        use SigmaEntry::{Fixed, Free};

        // Arrange
        let types = all_normal(2);
        let value_mismatch =
            array![[Free, Fixed(0.3)], [Fixed(0.4), Free]];
        let kind_mismatch = array![[Free, Fixed(0.3)], [Free, Free]];
        let bad_variance = array![[Fixed(0.0), Free], [Free, Free]];
        let bern_free = array![[Free, Free], [Free, Free]];

        // Act & Assert
        assert_eq!(
            RestrictionMatrix::new(value_mismatch, &types).unwrap_err(),
            ParamError::AsymmetricFixedEntry { row: 0, col: 1 }
        );
        assert_eq!(
            RestrictionMatrix::new(kind_mismatch, &types).unwrap_err(),
            ParamError::AsymmetricPattern { row: 0, col: 1 }
        );
        assert_eq!(
            RestrictionMatrix::new(bad_variance, &types).unwrap_err(),
            ParamError::NonPositiveFixedVariance { index: 0, value: 0.0 }
        );
        assert_eq!(
            RestrictionMatrix::new(
                bern_free,
                &[ResponseType::Normal, ResponseType::Bernoulli]
            )
            .unwrap_err(),
            ParamError::BernoulliVarianceNotFixed { index: 1 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify the forward map honors fixed entries verbatim and applies
    // softplus only on free diagonals, and that the inverse map round-trips.
    //
    // Given
    // -----
    // - 2×2 pattern with Σ₀₁ fixed to 0 and both diagonals free.
    // - A slice θ = [0.3, -0.7] for the two free diagonals.
    //
    // Expect
    // ------
    // - Σ diag = softplus(θ); Σ₀₁ = Σ₁₀ = 0; theta_from_sigma(Σ) ≈ θ.
    fn sigma_round_trips_and_honors_fixed_entries() {
        use SigmaEntry::{Fixed, Free};

        // Arrange
        let types = all_normal(2);
        let pattern = array![[Free, Fixed(0.0)], [Fixed(0.0), Free]];
        let map = CovarianceMap::new(RestrictionMatrix::new(pattern, &types).unwrap());
        let theta = array![0.3, -0.7];

        // Act
        let sigma = map.sigma_from_theta(theta.view()).unwrap();
        let back = map.theta_from_sigma(sigma.view()).unwrap();

        // Assert
        assert_abs_diff_eq!(sigma[(0, 0)], safe_softplus(0.3), epsilon = 1e-12);
        assert_abs_diff_eq!(sigma[(1, 1)], safe_softplus(-0.7), epsilon = 1e-12);
        assert_eq!(sigma[(0, 1)], 0.0);
        assert_eq!(sigma[(1, 0)], 0.0);
        for t in 0..2 {
            assert_abs_diff_eq!(back[t], theta[t], epsilon = 1e-9);
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure the forward map rejects wrong-length and non-finite slices.
    //
    // Given
    // -----
    // - A fully free 2×2 pattern (3 free entries); slices of length 2 and
    //   with a NaN at index 1.
    //
    // Expect
    // ------
    // - `ThetaLengthMismatch { expected: 3, actual: 2 }` and
    //   `InvalidThetaInput { index: 1, .. }`.
    fn sigma_from_theta_rejects_bad_slices() {
        // Arrange
        let map = CovarianceMap::new(RestrictionMatrix::default_for(&all_normal(2)));

        // Act
        let short = map.sigma_from_theta(array![0.1, 0.2].view());
        let nan = map.sigma_from_theta(array![0.1, f64::NAN, 0.2].view());

        // Assert
        assert_eq!(
            short.unwrap_err(),
            ParamError::ThetaLengthMismatch { expected: 3, actual: 2 }
        );
        match nan.unwrap_err() {
            ParamError::InvalidThetaInput { index, value } => {
                assert_eq!(index, 1);
                assert!(value.is_nan());
            }
            other => panic!("expected InvalidThetaInput, got: {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify the identity default start maps to the identity-completed Σ
    // and passes the feasibility pre-check, while an infeasible fixed
    // pattern is rejected.
    //
    // Given
    // -----
    // - A fully free 2×2 pattern; a 2×2 pattern with off-diagonal fixed to
    //   5.0 (forcing Σ = [[1, 5], [5, 1]] at the start, not PD).
    //
    // Expect
    // ------
    // - Default start yields Σ = I and `check_feasible` passes; the fixed
    //   pattern yields `InfeasibleRestriction`.
    fn feasibility_pre_check_detects_infeasible_patterns() {
        use SigmaEntry::{Fixed, Free};

        // Arrange
        let feasible = CovarianceMap::new(RestrictionMatrix::default_for(&all_normal(2)));
        let pattern = array![[Free, Fixed(5.0)], [Fixed(5.0), Free]];
        let infeasible =
            CovarianceMap::new(RestrictionMatrix::new(pattern, &all_normal(2)).unwrap());

        // Act
        let sigma = feasible.sigma_from_theta(feasible.initial_theta().view()).unwrap();

        // Assert
        assert_abs_diff_eq!(sigma[(0, 0)], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sigma[(1, 1)], 1.0, epsilon = 1e-9);
        assert_eq!(sigma[(0, 1)], 0.0);
        assert!(feasible.check_feasible().is_ok());
        assert_eq!(infeasible.check_feasible().unwrap_err(), ParamError::InfeasibleRestriction);
    }

    #[test]
    // Purpose
    // -------
    // Check the Cholesky root against a hand-computed factor and the
    // failure path on an indefinite matrix.
    //
    // Given
    // -----
    // - Σ = [[4, 2], [2, 5]] with L = [[2, 0], [1, 2]]; and an indefinite
    //   Σ = [[1, 2], [2, 1]].
    //
    // Expect
    // ------
    // - Root matches L entry-wise; indefinite input yields
    //   `NotPositiveDefinite`.
    fn cholesky_root_matches_hand_computation() {
        // Arrange
        let sigma = array![[4.0, 2.0], [2.0, 5.0]];
        let indefinite = array![[1.0, 2.0], [2.0, 1.0]];

        // Act
        let root = cholesky_root(&sigma).unwrap();

        // Assert
        assert_abs_diff_eq!(root[(0, 0)], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(root[(1, 0)], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(root[(1, 1)], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(root[(0, 1)], 0.0, epsilon = 1e-12);
        assert_eq!(cholesky_root(&indefinite).unwrap_err(), ParamError::NotPositiveDefinite);
    }
}
