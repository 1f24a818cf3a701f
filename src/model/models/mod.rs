//! model::models — fittable model types built on the core layer.
//!
//! Currently a single model lives here: the mixed-response latent Gaussian
//! regression in [`latent`]. The split mirrors the core/models layering so
//! additional latent structures (e.g., multi-factor loadings) have an obvious
//! home.

pub mod latent;

pub use self::latent::{DEFAULT_NODES_PER_DIM, FitOptions, MixedFit, MixedModel};
