//! statistical_tests::validation — nesting guards for model comparison.
//!
//! Purpose
//! -------
//! Centralize the structural checks the likelihood-ratio test needs before
//! any arithmetic happens: both fits converged, the covariance dimensions
//! agree, and the null model's free coordinates form a strict subset of the
//! full model's.
//!
//! Conventions
//! -----------
//! - This module is purely about *validation*; it performs no I/O and does
//!   not allocate beyond what is required for error construction.
//! - Errors are reported via the crate-local `LrtError` enum.
//! - Callers are responsible for ensuring that both fits were produced on
//!   the same dataset; that cannot be verified from the snapshots alone.
//!
//! Downstream usage
//! ----------------
//! - Call [`validate_nested`] at the top of
//!   [`LrtOutcome::likelihood_ratio_test`](crate::statistical_tests::likelihood_ratio::LrtOutcome::likelihood_ratio_test)
//!   before computing the statistic.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the success path and every error branch.

use crate::model::models::MixedFit;
use crate::statistical_tests::errors::{LrtError, LrtResult};

/// Validate that `null` is strictly nested in `full` and return the test's
/// degrees of freedom.
///
/// Parameters
/// ----------
/// - `null`: fitted restricted model.
/// - `full`: fitted unrestricted model.
///
/// Returns
/// -------
/// `LrtResult<usize>` — the degrees of freedom (number of coordinates the
/// full model frees beyond the null).
///
/// Errors
/// ------
/// - `LrtError::NotConverged` — either fit did not converge.
/// - `LrtError::DimensionMismatch` — the covariance dimensions differ.
/// - `LrtError::NotNested` — the null frees a coordinate the full model
///   does not, with the offending coordinate.
/// - `LrtError::NoAdditionalFreeParameters` — the free sets are identical.
pub fn validate_nested(null: &MixedFit, full: &MixedFit) -> LrtResult<usize> {
    if !null.converged {
        return Err(LrtError::NotConverged { which: "null" });
    }
    if !full.converged {
        return Err(LrtError::NotConverged { which: "full" });
    }
    if null.sigma.nrows() != full.sigma.nrows() {
        return Err(LrtError::DimensionMismatch {
            null: null.sigma.nrows(),
            full: full.sigma.nrows(),
        });
    }
    for &(row, col) in &null.free_entries {
        if !full.free_entries.contains(&(row, col)) {
            return Err(LrtError::NotNested { row, col });
        }
    }
    let df = full.free_entries.len() - null.free_entries.len();
    if df == 0 {
        return Err(LrtError::NoAdditionalFreeParameters);
    }
    Ok(df)
}
