//! halo — projected halo density profiles and their likelihood surface.
//!
//! Purpose
//! -------
//! Provide the physics layer of the fitter: closed-form projected surface
//! densities and cylindrical masses for the supported halo profiles (NFW and
//! the beta model), the data-driven profile normalization, and the weighted
//! negative log-likelihood the optimizer minimizes.
//!
//! Conventions
//! -----------
//! - All profile functions work in the dimensionless radius `t = R / r_s`.
//! - The variant is fixed once per fit via [`model::HaloModel`]; per-call
//!   string dispatch never happens inside the likelihood loop.
//! - Fallible operations return `HaloResult<T>`.

pub mod beta;
pub mod errors;
pub mod model;
pub mod nfw;

pub mod prelude {
    pub use super::errors::{HaloError, HaloResult};
    pub use super::model::HaloModel;
}
