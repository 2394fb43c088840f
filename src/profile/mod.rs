//! profile — binning, fitting, confidence, and reporting.
//!
//! Purpose
//! -------
//! The user-facing layer of the crate. [`fitter::ProfileFitter::fit`] is the
//! single entry point: it bins the sample for diagnostics, maximizes the
//! unbinned likelihood over the halo parameters, attaches goodness-of-fit
//! statistics, and optionally scans the likelihood surface for a confidence
//! interval on the scale radius. [`report`] serializes the result in the
//! traditional log layout.
//!
//! Conventions
//! -----------
//! - All operations return `FitterResult<T>`; subtree failures arrive
//!   wrapped in [`errors::FitError`].
//! - A fit is all-or-nothing: no partial result is ever returned.

pub mod binning;
pub mod confidence;
pub mod errors;
pub mod fitter;
pub mod report;

pub mod prelude {
    pub use super::binning::{bin_profile, BinnedProfile};
    pub use super::confidence::confidence_interval;
    pub use super::errors::{FitError, FitterResult};
    pub use super::fitter::{FitOptions, FitResult, GofSummary, ProfileFitter, PARAM_FLOOR};
    pub use super::report::{parse_best_fit, render_report};
}
