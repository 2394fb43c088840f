//! gof — goodness-of-fit statistics for the fitted profile.
//!
//! Purpose
//! -------
//! Quantify how well the fitted model curve tracks the binned density
//! profile: chi-squared against the per-bin error bars, plus two-sample
//! Kolmogorov-Smirnov and Anderson-Darling tests between the model values
//! at the bin centers and the observed densities.
//!
//! Conventions
//! -----------
//! - Samples are plain `&[f64]` slices.
//! - The chi-squared probability is the CDF at the statistic (large values
//!   reject); the KS and AD p-values follow the usual survival convention
//!   (small values reject).
//! - Fallible operations return `GofResult<T>`.

pub mod anderson_darling;
pub mod chi_squared;
pub mod errors;
pub mod kolmogorov_smirnov;
pub mod validation;

pub mod prelude {
    pub use super::anderson_darling::anderson_two_sample;
    pub use super::chi_squared::{chi2_gof, Chi2Gof};
    pub use super::errors::{GofError, GofResult};
    pub use super::kolmogorov_smirnov::{ks_two_sample, TwoSampleTest};
}
