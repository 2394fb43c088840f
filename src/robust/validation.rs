//! Input validation for the robust estimator.
use crate::robust::errors::{RobustError, RobustResult};

/// Minimum sample size for a biweight estimate.
///
/// The Student-t reference distribution uses `floor(0.7 (n - 1))` degrees of
/// freedom, which first becomes positive at `n = 3`.
pub const MIN_SAMPLES: usize = 3;

/// Validate a sample slice before estimation.
///
/// Checks:
/// - at least [`MIN_SAMPLES`] values,
/// - every value finite.
///
/// # Errors
/// - [`RobustError::InsufficientData`] for short samples.
/// - [`RobustError::InvalidData`] with the first offending index/value.
pub fn validate_sample(data: &[f64]) -> RobustResult<()> {
    if data.len() < MIN_SAMPLES {
        return Err(RobustError::InsufficientData { needed: MIN_SAMPLES, found: data.len() });
    }
    for (index, &value) in data.iter().enumerate() {
        if !value.is_finite() {
            return Err(RobustError::InvalidData { index, value });
        }
    }
    Ok(())
}
