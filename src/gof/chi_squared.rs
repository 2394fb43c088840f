//! gof::chi_squared — chi-squared goodness of fit against a binned profile.
//!
//! Convention: the reported probability is the chi-squared **CDF** at the
//! statistic, so values close to 1 indicate a poor fit ("rejected if
//! > 0.99"), matching the fitter's reporting.
use crate::gof::{
    errors::{GofError, GofResult},
    validation::{validate_paired, validate_sample},
};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Chi-squared test outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chi2Gof {
    pub statistic: f64,
    /// CDF of the statistic at `dof` degrees of freedom; large values reject.
    pub probability: f64,
    pub dof: usize,
}

/// Chi-squared statistic of `observed` against `expected` with per-bin error
/// bars `sigma`, at `bins - n_free` degrees of freedom.
///
/// # Errors
/// - [`GofError::LengthMismatch`] unless all three slices agree in length.
/// - [`GofError::InvalidValue`] / [`GofError::InvalidSigma`] for non-finite
///   values or non-positive error bars.
/// - [`GofError::InvalidDof`] when `bins <= n_free`.
pub fn chi2_gof(
    observed: &[f64], expected: &[f64], sigma: &[f64], n_free: usize,
) -> GofResult<Chi2Gof> {
    validate_paired(observed.len(), expected.len())?;
    validate_paired(observed.len(), sigma.len())?;
    validate_sample(observed, 1)?;
    validate_sample(expected, 1)?;
    for (index, &value) in sigma.iter().enumerate() {
        if !value.is_finite() || value <= 0.0 {
            return Err(GofError::InvalidSigma { index, value });
        }
    }
    if observed.len() <= n_free {
        return Err(GofError::InvalidDof { bins: observed.len(), n_free });
    }
    let dof = observed.len() - n_free;

    let statistic: f64 = observed
        .iter()
        .zip(expected)
        .zip(sigma)
        .map(|((&o, &e), &s)| ((o - e) / s).powi(2))
        .sum();
    let chi = ChiSquared::new(dof as f64)
        .map_err(|e| GofError::DistributionFailure { text: e.to_string() })?;
    Ok(Chi2Gof { statistic, probability: chi.cdf(statistic), dof })
}
