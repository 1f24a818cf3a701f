//! statistical_tests — nested-model comparison for mixed latent fits.
//!
//! Purpose
//! -------
//! Collect statistical-test routines and their shared infrastructure for
//! comparing fitted mixed latent-variable models. This subtree currently
//! implements the approximate likelihood-ratio test for nested covariance
//! restrictions together with common nesting validation and error handling.
//!
//! Key behaviors
//! -------------
//! - Expose the likelihood-ratio test via [`LrtOutcome`] and its
//!   constructor
//!   [`LrtOutcome::likelihood_ratio_test`](likelihood_ratio::LrtOutcome::likelihood_ratio_test).
//! - Centralize nesting guards in [`validate_nested`], ensuring
//!   convergence, dimension agreement, and strict nesting are checked once
//!   in a consistent way across test modules.
//! - Provide a dedicated error type [`LrtError`] and result alias
//!   [`LrtResult`] for statistical tests.
//!
//! Invariants & assumptions
//! ------------------------
//! - Both fits handed to a test are expected to come from the same dataset
//!   and response layout; [`validate_nested`] checks everything that the
//!   fitted snapshots can express, but dataset identity is on the caller.
//! - Statistical tests in this subtree report failures via [`LrtResult`]
//!   and never panic on user-facing invalid inputs; panics indicate
//!   programming errors (e.g., out-of-range indexing not caught by
//!   validation).
//! - [`LrtError`] variants are small and cloneable so they can be used
//!   comfortably in both unit tests and higher-level orchestration code.
//!
//! Conventions
//! -----------
//! - This subtree is focused on *statistical tests*; model-specific error
//!   types (e.g., model or optimization errors) live in their own
//!   `errors` modules under the relevant subtrees.
//! - Error messages are phrased in terms of domain constraints such as
//!   "both fits must converge" or "the null must be nested in the full
//!   model" rather than low-level details.
//! - Public entry points for tests (e.g.,
//!   [`LrtOutcome::likelihood_ratio_test`](likelihood_ratio::LrtOutcome::likelihood_ratio_test))
//!   are thin wrappers that delegate structural checks to
//!   [`validate_nested`] and propagate [`LrtError`] via [`LrtResult`].
//!
//! Downstream usage
//! ----------------
//! - Typical code imports the main surface as:
//!
//!   ```rust,ignore
//!   use mixedlvm::statistical_tests::{LrtOutcome, LrtResult};
//!
//!   let outcome: LrtOutcome =
//!       LrtOutcome::likelihood_ratio_test(null_model.fitted()?, full_model.fitted()?)?;
//!   ```
//!
//!   and only refers to `statistical_tests::errors` or
//!   `statistical_tests::validation` directly when matching on
//!   [`LrtError`] or reusing [`validate_nested`].
//!
//! Testing notes
//! -------------
//! - Unit tests in [`errors`] verify `Display` messages and payload
//!   embedding for [`LrtError`] variants.
//! - Unit tests in [`validation`] exercise all branches of
//!   [`validate_nested`], including non-convergence, dimension mismatch,
//!   broken nesting, and identical free sets.
//! - Unit tests in [`likelihood_ratio`] cover the statistic and p-value
//!   against the χ² reference, clamping of noise-level negative
//!   statistics, and error propagation.

pub mod errors;
pub mod likelihood_ratio;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{LrtError, LrtResult};
pub use self::likelihood_ratio::LrtOutcome;
pub use self::validation::validate_nested;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use mixedlvm::statistical_tests::prelude::*;
//
// to import the main statistical-testing surface in a single line.

pub mod prelude {
    pub use super::errors::{LrtError, LrtResult};
    pub use super::likelihood_ratio::LrtOutcome;
}
