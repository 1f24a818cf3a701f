//! Mixed-response data containers for latent Gaussian regression models.
//!
//! Purpose
//! -------
//! Provide a small, validated container for mixed-type response matrices and
//! their stacked design matrices. This module centralizes input validation for
//! raw observations and standardizes how response families and dispersions are
//! represented.
//!
//! Key behaviors
//! -------------
//! - [`ResponseType`] labels each response coordinate as Normal, Bernoulli, or
//!   Poisson.
//! - [`MixedData`] enforces basic data invariants (non-empty, finite entries,
//!   dimension consistency, positive dispersions, family-specific response
//!   support).
//!
//! Invariants & assumptions
//! ------------------------
//! - `y` is n×r with n ≥ 1 and r ≥ 1; all entries finite.
//! - `x` is (n·r)×p with p ≥ 1; rows `[i·r, (i+1)·r)` form the design matrix
//!   `X_i` of observation i; all entries finite.
//! - `psi` has length r with strictly positive finite entries; Bernoulli
//!   coordinates carry `psi_j == 1` exactly.
//! - Bernoulli responses lie in {0, 1}; Poisson responses are finite
//!   nonnegative integers.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based; response coordinate j of observation i lives at
//!   `y[(i, j)]` and its design row at `x.row(i * r + j)`.
//! - This module does **not** standardize or transform data; it only
//!   validates and stores it.
//!
//! Downstream usage
//! ----------------
//! - Construct [`MixedData`] at the API boundary where raw observations enter
//!   the modeling stack.
//! - The marginal-likelihood evaluator and inference routines rely on these
//!   invariants and skip re-validation in hot loops.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the happy path and each rejection branch of
//!   `MixedData::new` (empty data, dimension mismatches, non-finite entries,
//!   invalid dispersions, family-support violations).
use crate::model::errors::{ModelError, ModelResult};
use ndarray::{Array1, Array2, ArrayView2};

/// Response family label for one coordinate of the response vector.
///
/// Determines the conditional density used in likelihood evaluation and the
/// conditional mean/variance used in moment prediction:
/// - `Normal`: identity link, `N(w, ψ)`.
/// - `Bernoulli`: logit link, mean `σ(w)`; dispersion pinned to 1.
/// - `Poisson`: log link, mean `exp(w)`; `ψ ≠ 1` is treated as
///   quasi-likelihood overdispersion downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    /// Gaussian response with identity link and dispersion ψ (variance).
    Normal,
    /// Binary response with logit link; dispersion must be 1.
    Bernoulli,
    /// Count response with log link; ψ scales the conditional variance only.
    Poisson,
}

/// `MixedData` — validated mixed-type responses plus stacked designs.
///
/// Purpose
/// -------
/// Represent one dataset for a mixed-response latent Gaussian regression:
/// an n×r response matrix, the (n·r)×p stacked design matrix, per-coordinate
/// response families, and per-coordinate dispersions. Centralizes the input
/// checks so downstream likelihood code can assume clean data.
///
/// Fields
/// ------
/// - `y`: `Array2<f64>` — responses, n rows (observations) × r columns
///   (coordinates).
/// - `x`: `Array2<f64>` — stacked designs; rows `[i·r, (i+1)·r)` form `X_i`.
/// - `types`: `Vec<ResponseType>` — length r family labels.
/// - `psi`: `Array1<f64>` — length r dispersions; strictly positive, and
///   exactly 1 on Bernoulli coordinates.
///
/// Invariants
/// ----------
/// - `y.nrows() ≥ 1`, `y.ncols() == types.len() == psi.len()`.
/// - `x.nrows() == y.nrows() * y.ncols()`, `x.ncols() ≥ 1`.
/// - All entries of `y` and `x` are finite; family supports hold entry-wise.
///
/// Performance
/// -----------
/// - Validation is a single O(n·r + n·r·p) scan at construction; afterwards
///   this type is a plain container with no hidden allocations.
#[derive(Debug, Clone, PartialEq)]
pub struct MixedData {
    /// Response matrix, n × r.
    pub y: Array2<f64>,
    /// Stacked design matrix, (n·r) × p.
    pub x: Array2<f64>,
    /// Response family per coordinate, length r.
    pub types: Vec<ResponseType>,
    /// Dispersion per coordinate, length r (strictly positive; 1 for
    /// Bernoulli coordinates).
    pub psi: Array1<f64>,
}

impl MixedData {
    /// Construct a validated [`MixedData`] instance.
    ///
    /// Parameters
    /// ----------
    /// - `y`: n×r response matrix.
    /// - `x`: (n·r)×p stacked design matrix.
    /// - `types`: length-r response family labels.
    /// - `psi`: length-r dispersion vector.
    ///
    /// Returns
    /// -------
    /// `ModelResult<MixedData>`
    ///   - `Ok(MixedData)` if all invariants hold.
    ///   - `Err(ModelError)` describing the first violation found.
    ///
    /// Errors
    /// ------
    /// - `ModelError::EmptyData` — `y` has zero rows or columns.
    /// - `ModelError::ResponseColumnMismatch` — `y.ncols() != types.len()`.
    /// - `ModelError::DesignRowMismatch` — `x.nrows() != n·r`.
    /// - `ModelError::DispersionLengthMismatch` — `psi.len() != r`.
    /// - `ModelError::NonFiniteResponse` / `NonFiniteDesign` — NaN/±∞ entry.
    /// - `ModelError::InvalidDispersion` — non-finite or ≤ 0 dispersion.
    /// - `ModelError::BernoulliDispersion` — Bernoulli ψ ≠ 1.
    /// - `ModelError::InvalidBernoulliResponse` — entry outside {0, 1}.
    /// - `ModelError::InvalidPoissonResponse` — negative/non-integer entry.
    ///
    /// Panics
    /// ------
    /// - Never panics; all invalid inputs are reported via `ModelError`.
    ///
    /// Notes
    /// -----
    /// - Validation stops at the first offending element and reports its
    ///   position.
    /// - `x.ncols()` is recorded implicitly; models check it against their
    ///   own coefficient count at fit time.
    pub fn new(
        y: Array2<f64>, x: Array2<f64>, types: Vec<ResponseType>, psi: Array1<f64>,
    ) -> ModelResult<Self> {
        let n = y.nrows();
        let r = y.ncols();
        if n == 0 || r == 0 {
            return Err(ModelError::EmptyData);
        }
        if types.len() != r {
            return Err(ModelError::ResponseColumnMismatch { expected: types.len(), actual: r });
        }
        if x.nrows() != n * r {
            return Err(ModelError::DesignRowMismatch { expected: n * r, actual: x.nrows() });
        }
        if x.ncols() == 0 {
            return Err(ModelError::InvalidCoefficientCount { n_coeffs: 0 });
        }
        if psi.len() != r {
            return Err(ModelError::DispersionLengthMismatch { expected: r, actual: psi.len() });
        }

        for (index, &value) in psi.iter().enumerate() {
            if !value.is_finite() || value <= 0.0 {
                return Err(ModelError::InvalidDispersion { index, value });
            }
            if types[index] == ResponseType::Bernoulli && value != 1.0 {
                return Err(ModelError::BernoulliDispersion { index, value });
            }
        }

        for ((row, col), &value) in y.indexed_iter() {
            if !value.is_finite() {
                return Err(ModelError::NonFiniteResponse { row, col, value });
            }
            match types[col] {
                ResponseType::Normal => {}
                ResponseType::Bernoulli => {
                    if value != 0.0 && value != 1.0 {
                        return Err(ModelError::InvalidBernoulliResponse { row, col, value });
                    }
                }
                ResponseType::Poisson => {
                    if value < 0.0 || value.fract() != 0.0 {
                        return Err(ModelError::InvalidPoissonResponse { row, col, value });
                    }
                }
            }
        }

        for ((row, col), &value) in x.indexed_iter() {
            if !value.is_finite() {
                return Err(ModelError::NonFiniteDesign { row, col, value });
            }
        }

        Ok(MixedData { y, x, types, psi })
    }

    /// Number of observations n.
    pub fn n_obs(&self) -> usize {
        self.y.nrows()
    }

    /// Number of response coordinates r.
    pub fn n_responses(&self) -> usize {
        self.y.ncols()
    }

    /// Number of regression coefficients p.
    pub fn n_coeffs(&self) -> usize {
        self.x.ncols()
    }

    /// Design matrix `X_i` of observation `i` as an r×p view.
    ///
    /// Callers must keep `i < n_obs()`; the slice bounds otherwise panic,
    /// which indicates a programming error rather than bad data.
    pub fn design_row(&self, i: usize) -> ArrayView2<'_, f64> {
        let r = self.n_responses();
        self.x.slice(ndarray::s![i * r..(i + 1) * r, ..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1, Array2};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Construction behavior of `MixedData::new`.
    // - Enforcement of invariants:
    //   * non-empty response matrix,
    //   * dimension consistency between y, x, types, psi,
    //   * finite entries,
    //   * positive dispersions and the Bernoulli ψ = 1 rule,
    //   * family supports ({0,1} for Bernoulli, nonnegative integers for
    //     Poisson).
    //
    // They intentionally DO NOT cover:
    // - Likelihood evaluation or fitting behavior using the data.
    // -------------------------------------------------------------------------

    // Purpose
    // -------
    // Build a minimal valid dataset with n = 2 observations, r = 3 mixed
    // coordinates (Normal, Bernoulli, Poisson), and p = 2 coefficients.
    //
    // Expect
    // ------
    // - Reusable across tests; `MixedData::new` accepts it unchanged.
    fn make_valid_parts() -> (Array2<f64>, Array2<f64>, Vec<ResponseType>, Array1<f64>) {
        let y = array![[0.5, 1.0, 3.0], [-0.2, 0.0, 0.0]];
        let x = array![
            [1.0, 0.1],
            [1.0, 0.2],
            [1.0, 0.3],
            [1.0, 0.4],
            [1.0, 0.5],
            [1.0, 0.6],
        ];
        let types = vec![ResponseType::Normal, ResponseType::Bernoulli, ResponseType::Poisson];
        let psi = array![0.8, 1.0, 1.0];
        (y, x, types, psi)
    }

    #[test]
    // Purpose
    // -------
    // Verify that `MixedData::new` succeeds on a consistent mixed dataset
    // and preserves its contents and accessors.
    //
    // Given
    // -----
    // - The valid parts from `make_valid_parts()`.
    //
    // Expect
    // ------
    // - `Ok(..)` with n_obs = 2, n_responses = 3, n_coeffs = 2, and
    //   `design_row(1)` equal to rows 3..6 of x.
    fn mixed_data_new_returns_ok_for_valid_input() {
        // Arrange
        let (y, x, types, psi) = make_valid_parts();

        // Act
        let data = MixedData::new(y.clone(), x.clone(), types, psi).unwrap();

        // Assert
        assert_eq!(data.n_obs(), 2);
        assert_eq!(data.n_responses(), 3);
        assert_eq!(data.n_coeffs(), 2);
        assert_eq!(data.design_row(1), x.slice(ndarray::s![3..6, ..]));
        assert_eq!(data.y, y);
    }

    #[test]
    // Purpose
    // -------
    // Ensure `MixedData::new` rejects an empty response matrix.
    //
    // Given
    // -----
    // - `y` with zero rows; conforming empty companions.
    //
    // Expect
    // ------
    // - `Err(ModelError::EmptyData)`.
    fn mixed_data_new_returns_error_for_empty_responses() {
        // Arrange
        let y = Array2::<f64>::zeros((0, 2));
        let x = Array2::<f64>::zeros((0, 1));
        let types = vec![ResponseType::Normal, ResponseType::Normal];
        let psi = array![1.0, 1.0];

        // Act
        let result = MixedData::new(y, x, types, psi);

        // Assert
        assert_eq!(result.unwrap_err(), ModelError::EmptyData);
    }

    #[test]
    // Purpose
    // -------
    // Ensure `MixedData::new` rejects a design matrix whose row count is not
    // n·r.
    //
    // Given
    // -----
    // - Valid y (2×3) but x with 5 rows instead of 6.
    //
    // Expect
    // ------
    // - `Err(ModelError::DesignRowMismatch { expected: 6, actual: 5 })`.
    fn mixed_data_new_returns_error_for_design_row_mismatch() {
        // Arrange
        let (y, x, types, psi) = make_valid_parts();
        let x_short = x.slice(ndarray::s![..5, ..]).to_owned();

        // Act
        let result = MixedData::new(y, x_short, types, psi);

        // Assert
        assert_eq!(result.unwrap_err(), ModelError::DesignRowMismatch { expected: 6, actual: 5 });
    }

    #[test]
    // Purpose
    // -------
    // Ensure `MixedData::new` rejects a non-finite response entry and
    // reports its position.
    //
    // Given
    // -----
    // - Valid parts with y[(1, 0)] set to NaN.
    //
    // Expect
    // ------
    // - `Err(ModelError::NonFiniteResponse { row: 1, col: 0, .. })`.
    fn mixed_data_new_returns_error_for_non_finite_response() {
        // Arrange
        let (mut y, x, types, psi) = make_valid_parts();
        y[(1, 0)] = f64::NAN;

        // Act
        let result = MixedData::new(y, x, types, psi);

        // Assert
        match result {
            Err(ModelError::NonFiniteResponse { row, col, value }) => {
                assert_eq!((row, col), (1, 0));
                assert!(value.is_nan());
            }
            other => panic!("expected NonFiniteResponse, got: {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure `MixedData::new` rejects non-positive dispersions and a
    // Bernoulli dispersion different from 1.
    //
    // Given
    // -----
    // - Valid parts with psi[0] = 0.0 in one case and psi[1] = 2.0 (on the
    //   Bernoulli coordinate) in another.
    //
    // Expect
    // ------
    // - `InvalidDispersion { index: 0, .. }` and
    //   `BernoulliDispersion { index: 1, value: 2.0 }` respectively.
    fn mixed_data_new_returns_error_for_bad_dispersions() {
        // Arrange
        let (y, x, types, psi) = make_valid_parts();
        let mut psi_zero = psi.clone();
        psi_zero[0] = 0.0;
        let mut psi_bern = psi;
        psi_bern[1] = 2.0;

        // Act
        let zero_result = MixedData::new(y.clone(), x.clone(), types.clone(), psi_zero);
        let bern_result = MixedData::new(y, x, types, psi_bern);

        // Assert
        assert_eq!(
            zero_result.unwrap_err(),
            ModelError::InvalidDispersion { index: 0, value: 0.0 }
        );
        assert_eq!(
            bern_result.unwrap_err(),
            ModelError::BernoulliDispersion { index: 1, value: 2.0 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Ensure `MixedData::new` rejects a Bernoulli response outside {0, 1}
    // and a non-integer Poisson response.
    //
    // Given
    // -----
    // - Valid parts with y[(0, 1)] = 0.5 (Bernoulli column) in one case and
    //   y[(0, 2)] = 2.5 (Poisson column) in another.
    //
    // Expect
    // ------
    // - `InvalidBernoulliResponse` and `InvalidPoissonResponse` with the
    //   offending positions.
    fn mixed_data_new_returns_error_for_family_support_violations() {
        // Arrange
        let (y, x, types, psi) = make_valid_parts();
        let mut y_bern = y.clone();
        y_bern[(0, 1)] = 0.5;
        let mut y_pois = y;
        y_pois[(0, 2)] = 2.5;

        // Act
        let bern_result = MixedData::new(y_bern, x.clone(), types.clone(), psi.clone());
        let pois_result = MixedData::new(y_pois, x, types, psi);

        // Assert
        assert_eq!(
            bern_result.unwrap_err(),
            ModelError::InvalidBernoulliResponse { row: 0, col: 1, value: 0.5 }
        );
        assert_eq!(
            pois_result.unwrap_err(),
            ModelError::InvalidPoissonResponse { row: 0, col: 2, value: 2.5 }
        );
    }
}
