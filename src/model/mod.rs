//! model — mixed-response latent Gaussian regression.
//!
//! Purpose
//! -------
//! Provide the statistical model layer of the crate: validated data
//! containers, Gauss–Hermite quadrature, per-family conditional densities,
//! restricted covariance parameterization, and the [`MixedModel`] type that
//! ties them together behind the optimizer's `LogLikelihood` trait.
//!
//! Key behaviors
//! -------------
//! - Observations carry `r` mixed-family responses (Normal, Bernoulli,
//!   Poisson) that are conditionally independent given a shared latent
//!   Gaussian vector `Z ~ N(0, Σ)`.
//! - The marginal likelihood integrates `Z` out with a tensor Gauss–Hermite
//!   rule; all accumulation happens in the log domain.
//! - Entries of Σ may be fixed a priori or estimated freely; the
//!   [`CovarianceMap`](core::CovarianceMap) handles the unconstrained
//!   reparameterization.
//!
//! Conventions
//! -----------
//! - Errors are structured enums ([`errors::ModelError`],
//!   [`errors::ParamError`]) that flatten into the optimizer's `OptError`
//!   at the fitting boundary.
//! - Constructors validate; accessors assume invariants hold.
//!
//! Downstream usage
//! ----------------
//! - The `inference` module consumes fitted snapshots ([`MixedFit`]) for
//!   standard errors and response-moment prediction.
//! - The `statistical_tests` module compares nested fits via the
//!   likelihood-ratio test.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    CovarianceMap, MixedData, QuadratureGrid, ResponseType, RestrictionMatrix, SigmaEntry,
};
pub use self::models::{DEFAULT_NODES_PER_DIM, FitOptions, MixedFit, MixedModel};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use mixedlvm::model::prelude::*;
//
// to import the main model surface in a single line.

pub mod prelude {
    pub use super::core::{MixedData, ResponseType, RestrictionMatrix, SigmaEntry};
    pub use super::errors::{ModelError, ModelResult, ParamError, ParamResult};
    pub use super::models::{FitOptions, MixedFit, MixedModel};
}
