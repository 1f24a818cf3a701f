//! Model validation helpers — reusable checks for θ and model/data layouts.
//!
//! Purpose
//! -------
//! Centralize the small validation routines used across the mixed-model
//! stack: checking unconstrained optimizer inputs θ before splitting them,
//! and checking a dataset against the layout a model was configured for, so
//! higher-level entry points can fail fast with structured errors.
//!
//! Conventions
//! -----------
//! - Validation functions return [`ModelResult`]/[`ParamResult`] and never
//!   panic on invalid inputs.
//! - This module contains no I/O and no logging; it only inspects numeric
//!   values and array lengths.
//!
//! Downstream usage
//! ----------------
//! - `MixedModel` calls [`validate_theta`] inside `LogLikelihood::check` and
//!   [`validate_model_data`] at the top of `fit`.
//!
//! Testing notes
//! -------------
//! - Unit tests exercise each helper on representative valid and invalid
//!   inputs (length off-by-one, NaN entries, type-label disagreement).
use crate::model::core::data::{MixedData, ResponseType};
use crate::model::errors::{ModelError, ModelResult, ParamError, ParamResult};
use ndarray::ArrayView1;

/// Validate an unconstrained parameter vector θ for a mixed model.
///
/// Parameters
/// ----------
/// - `theta`: candidate vector, expected length `n_coeffs + free_len`
///   (regression coefficients followed by free covariance parameters).
/// - `n_coeffs`: number of regression coefficients p.
/// - `free_len`: number of free covariance parameters.
///
/// Returns
/// -------
/// `ParamResult<()>` — `Ok(())` when the length matches and every entry is
/// finite.
///
/// Errors
/// ------
/// - `ParamError::ThetaLengthMismatch` — wrong length.
/// - `ParamError::InvalidThetaInput` — NaN/±∞ entry, with its index.
pub fn validate_theta(
    theta: ArrayView1<f64>, n_coeffs: usize, free_len: usize,
) -> ParamResult<()> {
    let expected = n_coeffs + free_len;
    if theta.len() != expected {
        return Err(ParamError::ThetaLengthMismatch { expected, actual: theta.len() });
    }
    for (index, &value) in theta.iter().enumerate() {
        if !value.is_finite() {
            return Err(ParamError::InvalidThetaInput { index, value });
        }
    }
    Ok(())
}

/// Validate a dataset against the layout a model was configured for.
///
/// Parameters
/// ----------
/// - `data`: a validated [`MixedData`] instance.
/// - `n_coeffs`: the model's coefficient count p.
/// - `types`: the model's response family labels.
///
/// Returns
/// -------
/// `ModelResult<()>` — `Ok(())` when the data's shape and type labels agree
/// with the model's.
///
/// Errors
/// ------
/// - `ModelError::ResponseColumnMismatch` — differing response counts.
/// - `ModelError::ResponseTypeMismatch` — differing family label, with the
///   first disagreeing index.
/// - `ModelError::CoefficientCountMismatch` — differing coefficient counts.
pub fn validate_model_data(
    data: &MixedData, n_coeffs: usize, types: &[ResponseType],
) -> ModelResult<()> {
    if data.n_responses() != types.len() {
        return Err(ModelError::ResponseColumnMismatch {
            expected: types.len(),
            actual: data.n_responses(),
        });
    }
    for (index, (model_ty, data_ty)) in types.iter().zip(data.types.iter()).enumerate() {
        if model_ty != data_ty {
            return Err(ModelError::ResponseTypeMismatch { index });
        }
    }
    if data.n_coeffs() != n_coeffs {
        return Err(ModelError::CoefficientCountMismatch {
            expected: n_coeffs,
            actual: data.n_coeffs(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1, Array2};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - θ length/finiteness validation.
    // - Model/data layout cross-checks (response count, type labels,
    //   coefficient count).
    // -------------------------------------------------------------------------

    fn make_data(types: Vec<ResponseType>, p: usize) -> MixedData {
        let r = types.len();
        let y = Array2::<f64>::zeros((2, r));
        let x = Array2::<f64>::ones((2 * r, p));
        let psi = Array1::<f64>::ones(r);
        MixedData::new(y, x, types, psi).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // `validate_theta` accepts the correct length with finite entries and
    // rejects length mismatches and NaN coordinates.
    //
    // Given
    // -----
    // - p = 2, free_len = 3, so expected length 5.
    //
    // Expect
    // ------
    // - Ok for a finite length-5 vector; `ThetaLengthMismatch` for length 4;
    //   `InvalidThetaInput { index: 2, .. }` for a NaN at index 2.
    fn validate_theta_checks_length_and_finiteness() {
        // Arrange
        let good = array![0.0, 1.0, -0.5, 0.2, 0.3];
        let short = array![0.0, 1.0, -0.5, 0.2];
        let nan = array![0.0, 1.0, f64::NAN, 0.2, 0.3];

        // Act & Assert
        assert!(validate_theta(good.view(), 2, 3).is_ok());
        assert_eq!(
            validate_theta(short.view(), 2, 3).unwrap_err(),
            ParamError::ThetaLengthMismatch { expected: 5, actual: 4 }
        );
        match validate_theta(nan.view(), 2, 3).unwrap_err() {
            ParamError::InvalidThetaInput { index, value } => {
                assert_eq!(index, 2);
                assert!(value.is_nan());
            }
            other => panic!("expected InvalidThetaInput, got: {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // `validate_model_data` accepts matching layouts and rejects each kind
    // of disagreement.
    //
    // Given
    // -----
    // - A model expecting [Normal, Normal] with p = 2, and datasets that
    //   match, differ in a type label, and differ in coefficient count.
    //
    // Expect
    // ------
    // - Ok, `ResponseTypeMismatch { index: 1 }`, and
    //   `CoefficientCountMismatch` respectively.
    fn validate_model_data_checks_layout_agreement() {
        // Arrange
        let types = vec![ResponseType::Normal, ResponseType::Normal];
        let matching = make_data(types.clone(), 2);
        let wrong_type = make_data(vec![ResponseType::Normal, ResponseType::Poisson], 2);
        let wrong_p = make_data(types.clone(), 3);

        // Act & Assert
        assert!(validate_model_data(&matching, 2, &types).is_ok());
        assert_eq!(
            validate_model_data(&wrong_type, 2, &types).unwrap_err(),
            ModelError::ResponseTypeMismatch { index: 1 }
        );
        assert_eq!(
            validate_model_data(&wrong_p, 2, &types).unwrap_err(),
            ModelError::CoefficientCountMismatch { expected: 2, actual: 3 }
        );
    }
}
