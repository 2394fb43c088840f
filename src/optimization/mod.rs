//! optimization — L-BFGS MLE stack, parameter transforms, and error surface.
//!
//! Purpose
//! -------
//! Provide the generic optimization layer used by the profile fitter: an
//! Argmin-backed log-likelihood maximizer, numerically stable bound
//! transforms, and a single error/result surface. Callers implement
//! [`LogLikelihood`](likelihood::LogLikelihood), choose tolerances, and
//! obtain fitted parameters and diagnostics without touching backend solver
//! details.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **maximizing log-likelihoods** `ℓ(θ)` via
//!   [`solver::maximize`], including line-search choice and stopping
//!   criteria.
//! - Supply shifted-softplus transforms (`transforms`) for mapping the
//!   unconstrained optimizer space onto strictly positive model parameters.
//! - Normalize configuration issues, numerical failures, and backend solver
//!   errors into a single enum ([`errors::OptError`]) with a common result
//!   alias (`OptResult<T>`).
//!
//! Conventions
//! -----------
//! - All solvers conceptually maximize `ℓ(θ)` by minimizing an internal cost
//!   `c(θ) = -ℓ(θ)`; user-facing APIs and outcomes are expressed in terms of
//!   `ℓ`.
//! - Parameters and gradients use the `ndarray`-based aliases `Theta` and
//!   `Grad` from [`solver`].
//! - Public entrypoints that can fail return `OptResult<T>`; callers never
//!   see raw Argmin errors.
//! - This module avoids I/O; the only output is the optional `obs_slog`
//!   observer attached when `verbose` is requested.
//!
//! Downstream usage
//! ----------------
//! - The profile fitter implements `LogLikelihood` for the halo model and
//!   calls `maximize` with a parameter guess, the binned data payload, and
//!   `MLEOptions`.
//! - Front-ends import the curated surface via `optimization::prelude::*`.

pub mod adapter;
pub mod errors;
pub mod likelihood;
pub mod solver;
pub mod transforms;
pub mod validation;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use cluster_profile::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::likelihood::{
        LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances,
    };
    pub use super::solver::{maximize, Cost, FnEvalMap, Grad, Theta, DEFAULT_LBFGS_MEM};
    pub use super::transforms::{bounded_below, bounded_below_inv};
}
