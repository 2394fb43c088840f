//! Shared input guards for the goodness-of-fit statistics.
use crate::gof::errors::{GofError, GofResult};

/// Validate one sample: minimum length and all values finite.
///
/// # Errors
/// - [`GofError::InsufficientData`] for short samples.
/// - [`GofError::InvalidValue`] with the first offending index/value.
pub fn validate_sample(data: &[f64], min_len: usize) -> GofResult<()> {
    if data.len() < min_len {
        return Err(GofError::InsufficientData { needed: min_len, found: data.len() });
    }
    for (index, &value) in data.iter().enumerate() {
        if !value.is_finite() {
            return Err(GofError::InvalidValue { index, value });
        }
    }
    Ok(())
}

/// Validate that two paired inputs have equal lengths.
///
/// # Errors
/// Returns [`GofError::LengthMismatch`] otherwise.
pub fn validate_paired(left: usize, right: usize) -> GofResult<()> {
    if left != right {
        return Err(GofError::LengthMismatch { left, right });
    }
    Ok(())
}
