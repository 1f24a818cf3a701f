//! statistical_tests::errors — shared error types for model comparison tests.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias for the likelihood-ratio test and
//! its validation helpers. This keeps test-specific failures localized while
//! exposing a clean error surface to callers.
//!
//! Key behaviors
//! -------------
//! - Define [`LrtResult`] and [`LrtError`] as the canonical result and error
//!   types for nested-model comparison.
//! - Attach human-readable `Display` messages to each error variant so that
//!   diagnostics and logs are meaningful without additional context.
//!
//! Conventions
//! -----------
//! - This module is focused on test errors; model-specific error types live
//!   in their own `errors` modules under the relevant subtrees.
//! - Error messages are phrased in terms of domain constraints such as
//!   "both fits must converge" or "the null must be nested in the full
//!   model" rather than low-level details.
//!
//! Testing notes
//! -------------
//! - Unit tests verify `Display` messages and payload embedding for the
//!   variants that carry data.

pub type LrtResult<T> = Result<T, LrtError>;

/// LrtError — error conditions for the likelihood-ratio test.
///
/// Variants
/// --------
/// - `NotConverged { which }`
///   One of the two fits did not reach a tolerance-based termination;
///   `which` names the offending fit (`"null"` or `"full"`).
/// - `DimensionMismatch { null, full }`
///   The two fits describe covariance matrices of different dimension.
/// - `NotNested { row, col }`
///   The null model estimates a covariance coordinate freely that the full
///   model does not; the payload is the offending upper-triangular
///   coordinate.
/// - `NoAdditionalFreeParameters`
///   The two fits free exactly the same coordinates, so the test has zero
///   degrees of freedom.
/// - `NegativeStatistic { statistic }`
///   The full model's log-likelihood is materially below the null's,
///   beyond numerical noise; one of the fits is at a poor optimum.
/// - `InvalidDegreesOfFreedom { df }`
///   The reference χ² distribution could not be constructed.
#[derive(Debug, Clone, PartialEq)]
pub enum LrtError {
    //------ Nesting validation errors ------
    NotConverged { which: &'static str },
    DimensionMismatch { null: usize, full: usize },
    NotNested { row: usize, col: usize },
    NoAdditionalFreeParameters,
    //------ Statistic errors ------
    NegativeStatistic { statistic: f64 },
    InvalidDegreesOfFreedom { df: usize },
}

impl std::error::Error for LrtError {}

impl std::fmt::Display for LrtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LrtError::NotConverged { which } => {
                write!(f, "The {which} fit did not converge; refit before testing.")
            }
            LrtError::DimensionMismatch { null, full } => {
                write!(
                    f,
                    "Covariance dimension mismatch: null has {null} responses, full has {full}."
                )
            }
            LrtError::NotNested { row, col } => {
                write!(
                    f,
                    "Null model frees covariance entry ({row}, {col}) that the full model \
                     does not; the null must be nested in the full model."
                )
            }
            LrtError::NoAdditionalFreeParameters => {
                write!(f, "The full model frees no additional parameters; zero degrees of freedom.")
            }
            LrtError::NegativeStatistic { statistic } => {
                write!(
                    f,
                    "Likelihood-ratio statistic {statistic} is negative beyond numerical \
                     tolerance; one of the fits is at a poor optimum."
                )
            }
            LrtError::InvalidDegreesOfFreedom { df } => {
                write!(f, "Invalid degrees of freedom for the χ² reference: {df}.")
            }
        }
    }
}
