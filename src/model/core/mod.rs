//! model::core — shared building blocks for mixed latent-variable models.
//!
//! Purpose
//! -------
//! Collect the data containers, quadrature machinery, density evaluators,
//! and covariance parameterization that the model layer composes into a
//! fittable likelihood. Each submodule owns one concern:
//!
//! - [`data`]: validated response/design containers ([`MixedData`],
//!   [`ResponseType`]).
//! - [`quadrature`]: tensor Gauss–Hermite grids ([`QuadratureGrid`]).
//! - [`density`]: per-family conditional log-densities and moments.
//! - [`covariance`]: Fixed/Free restriction patterns and the unconstrained
//!   covariance parameterization ([`RestrictionMatrix`], [`CovarianceMap`]).
//! - [`validation`]: θ and model/data layout cross-checks.
//!
//! Conventions
//! -----------
//! - Construction validates; once a value of these types exists, downstream
//!   code may assume its invariants hold.
//! - All fallible functions return
//!   [`ModelResult`](crate::model::errors::ModelResult) /
//!   [`ParamResult`](crate::model::errors::ParamResult) from the model error
//!   layer; nothing here panics on user input.

pub mod covariance;
pub mod data;
pub mod density;
pub mod quadrature;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::covariance::{CovarianceMap, RestrictionMatrix, SigmaEntry, cholesky_root};
pub use self::data::{MixedData, ResponseType};
pub use self::density::{conditional_mean, conditional_variance, log_conditional_density};
pub use self::quadrature::QuadratureGrid;
