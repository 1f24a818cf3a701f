//! loglik_optimizer — MLE-friendly, argmin-powered log-likelihood optimizer.
//!
//! Purpose
//! -------
//! Provide a high-level, Argmin-backed optimization layer for **maximizing
//! log-likelihoods** `ℓ(θ)`. Callers implement a single trait,
//! [`LogLikelihood`], and invoke [`maximize`] to run L-BFGS with a
//! configurable line search, tolerances, and finite-difference fallbacks.
//!
//! Key behaviors
//! -------------
//! - Convert user-supplied log-likelihoods `ℓ(θ)` into Argmin-compatible
//!   cost functions `c(θ) = -ℓ(θ)` via [`adapter::ArgMinAdapter`], with a
//!   finite barrier cost on trial points whose latent covariance cannot be
//!   factored, so line searches backtrack instead of aborting.
//! - Expose a single, user-facing entrypoint [`maximize`] that:
//!   - validates the initial guess with [`LogLikelihood::check`],
//!   - constructs an L-BFGS solver per [`LineSearcher`] with the configured
//!     tolerances and memory,
//!   - executes the solver, and
//!   - normalizes results into an [`OptimOutcome`].
//! - Centralize optimizer configuration ([`Tolerances`], [`MLEOptions`]) and
//!   the numeric aliases ([`Theta`], [`Grad`], [`Cost`]) in [`traits`].
//!
//! Invariants & assumptions
//! ------------------------
//! - The optimizer **always maximizes** a log-likelihood `ℓ(θ)` by minimizing
//!   a cost `c(θ) = -ℓ(θ)`; user code must implement `ℓ(θ)` and `∇ℓ(θ)`
//!   (when available), **never** the cost directly.
//! - [`LogLikelihood::value`] and [`LogLikelihood::grad`] must treat invalid
//!   inputs as recoverable [`OptError`](crate::optimization::errors::OptError)
//!   values, not panics.
//! - Configuration types ([`Tolerances`], [`MLEOptions`]) are validated on
//!   construction and are treated as internally consistent by the solver
//!   layer.
//!
//! Conventions
//! -----------
//! - Parameters live in an unconstrained optimizer space as [`Theta`]
//!   (`Array1<f64>`). Any mapping from constrained → unconstrained space
//!   (e.g., softplus diagonals of a latent covariance) happens in the model
//!   layer.
//! - Cost is always `c(θ) = -ℓ(θ)` internally; all user-facing APIs and
//!   diagnostics (including [`OptimOutcome::value`]) are expressed in terms
//!   of the log-likelihood `ℓ`.
//! - Gradients exposed by [`LogLikelihood::grad`] are for the log-likelihood
//!   (`∇ℓ(θ)`); the adapter is responsible for flipping signs to obtain the
//!   cost gradient (`∇c(θ) = -∇ℓ(θ)`).
//! - Errors bubble up as [`OptResult<T>`](crate::optimization::errors::OptResult);
//!   this module and its children never intentionally panic or use `unsafe`.
//!
//! Downstream usage
//! ----------------
//! - Model types implement [`LogLikelihood`], then call [`maximize`] with:
//!   - a model instance `&M`,
//!   - an initial parameter vector [`Theta`],
//!   - a data payload `&M::Data`, and
//!   - an [`MLEOptions`] configuration (tolerances, line search, L-BFGS
//!     memory).
//! - Downstream code is expected to interact only with the re-exported
//!   surface: [`maximize`], [`LogLikelihood`], [`MLEOptions`],
//!   [`Tolerances`], [`OptimOutcome`], plus the numeric aliases.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover:
//!   - sign conventions, the infeasibility barrier, and finite-difference
//!     gradient handling in [`adapter`],
//!   - end-to-end `maximize` behavior (line searches, memory, strict
//!     convergence reporting, barrier backtracking) in [`api`],
//!   - configuration and outcome invariants in [`traits`].
//! - Integration tests exercise [`maximize`] implicitly by fitting mixed
//!   latent-variable models end to end.

pub mod adapter;
pub mod api;
pub mod traits;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{
    Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, LineSearcher, LogLikelihood, MLEOptions,
    OptimOutcome, Theta, Tolerances,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use mixedlvm::optimization::loglik_optimizer::prelude::*;
//
// to import the main optimizer surface in a single line.

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{
        Cost, Grad, LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Theta, Tolerances,
    };
}
