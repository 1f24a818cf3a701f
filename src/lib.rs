//! mixedlvm — latent-Gaussian regression for mixed response vectors.
//!
//! Purpose
//! -------
//! Serve as the crate root for a marginal-maximum-likelihood engine for
//! mixed-response regression: each observation carries a vector of Normal,
//! Bernoulli, and Poisson outcomes that are conditionally independent given
//! a shared latent Gaussian vector `Z ~ N(0, Σ)`. The latent vector is
//! integrated out with a tensor Gauss–Hermite rule, and `(β, Σ)` is
//! estimated by constrained L-BFGS under user-supplied covariance
//! restrictions.
//!
//! Key behaviors
//! -------------
//! - Re-export the core subtrees (`model`, `optimization`, `inference`,
//!   and `statistical_tests`) as the public crate surface.
//! - `model` owns data containers, response families, quadrature grids,
//!   covariance restrictions, and the [`MixedModel`](model::MixedModel)
//!   fitting entry point.
//! - `optimization` owns the generic L-BFGS marginal-likelihood maximizer
//!   and numerical-stability helpers (softplus reparameterization,
//!   log-sum-exp reduction).
//! - `inference` owns observed-information standard errors and marginal
//!   response-moment prediction.
//! - `statistical_tests` owns the approximate likelihood-ratio test for
//!   nested covariance restrictions.
//!
//! Invariants & assumptions
//! ------------------------
//! - All heavy numerical work is implemented in the inner modules; this
//!   file only declares the module tree and convenience re-exports.
//! - Errors from core code propagate as rich error types (`ModelError`,
//!   `ParamError`, `OptError`, `LrtError`) and never panic on user-facing
//!   invalid inputs.
//!
//! Conventions
//! -----------
//! - Indexing, parameter layout, and statistical conventions follow the
//!   documentation of the underlying modules (`model::core`,
//!   `optimization::loglik_optimizer`, etc.). In particular the optimizer
//!   parameter vector is laid out as `[β | free Σ coordinates]`, with free
//!   diagonal entries carried through a softplus transform.
//!
//! Downstream usage
//! ----------------
//! - Typical callers construct a [`MixedModel`](model::MixedModel) with a
//!   [`RestrictionMatrix`](model::RestrictionMatrix), call `fit` on a
//!   [`MixedData`](model::MixedData), and then use `standard_errors`,
//!   `predict_moments`, or
//!   [`LrtOutcome::likelihood_ratio_test`](statistical_tests::LrtOutcome::likelihood_ratio_test)
//!   for post-estimation analysis.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules
//!   and by end-to-end fitting tests in `tests/`.

pub mod inference;
pub mod model;
pub mod optimization;
pub mod statistical_tests;
