//! robust — outlier-resistant location and scale estimation.
//!
//! Purpose
//! -------
//! House the Tukey biweight estimator used throughout the crate: bin centers
//! in the profile binner, and the standalone estimate exposed through the
//! Python bindings.
//!
//! Conventions
//! -----------
//! - Samples are plain `&[f64]` slices; order is irrelevant.
//! - Fallible operations return `RobustResult<T>`; panics are reserved for
//!   test code.

pub mod biweight;
pub mod errors;
pub mod validation;

pub mod prelude {
    pub use super::biweight::BiweightEstimate;
    pub use super::errors::{RobustError, RobustResult};
    pub use super::validation::MIN_SAMPLES;
}
