//! profile::confidence — grid-search confidence interval on the scale radius.
//!
//! Purpose
//! -------
//! Scan the negative log-likelihood over a log-spaced 2-D grid around the
//! best-fit `(scale_radius, background_density)` and report the radial
//! extent of the region where the likelihood stays within the 68%
//! chi-squared threshold of the grid minimum.
//!
//! Key behaviors
//! -------------
//! - Each axis spans ±0.7 decades around its best-fit value with
//!   `grid_count` log-spaced points.
//! - Grid points where the likelihood is undefined (optimizer excursions
//!   into invalid territory) are skipped rather than failing the scan.
//! - Acceptance: `2 (nll - nll_min) <= chi2_quantile(0.68, n_free)`; the
//!   interval is the min/max accepted scale radius.
//!
//! The scan is a pure map over grid points followed by a min/max reduction,
//! so it parallelizes trivially if that ever becomes worthwhile.
use crate::{
    gof::errors::GofError,
    halo::model::HaloModel,
    profile::errors::{FitError, FitterResult},
};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Half-width of the scan window, in decades.
const WINDOW_DECADES: f64 = 0.7;

/// 68% confidence interval on the scale radius from a brute grid scan.
///
/// # Errors
/// - [`FitError::DegenerateConfidenceRegion`] when every grid evaluation
///   failed or nothing passed the threshold.
/// - [`FitError::Gof`] if the chi-squared threshold distribution cannot be
///   built.
pub fn confidence_interval(
    model: &HaloModel, radii: &[f64], weights: Option<&[f64]>, best_scale_radius: f64,
    best_background: f64, grid_count: usize, n_free: usize,
) -> FitterResult<(f64, f64)> {
    let rs_grid = log_grid(best_scale_radius, grid_count);
    let bg_grid = log_grid(best_background, grid_count);

    // Pure map: likelihood at every grid point that evaluates cleanly.
    let mut evaluations: Vec<(f64, f64)> = Vec::with_capacity(grid_count * grid_count);
    for &rs in &rs_grid {
        for &bg in &bg_grid {
            if let Ok(nll) = model.negative_log_likelihood(radii, weights, rs, bg) {
                evaluations.push((rs, nll));
            }
        }
    }
    let nll_min = evaluations
        .iter()
        .map(|&(_, nll)| nll)
        .fold(f64::INFINITY, f64::min);
    if !nll_min.is_finite() {
        return Err(FitError::DegenerateConfidenceRegion);
    }

    let chi = ChiSquared::new(n_free as f64)
        .map_err(|e| GofError::DistributionFailure { text: e.to_string() })?;
    let threshold = chi.inverse_cdf(0.68);

    // Reduction: radial extent of the accepted region.
    let mut low = f64::INFINITY;
    let mut high = f64::NEG_INFINITY;
    for &(rs, nll) in &evaluations {
        if 2.0 * (nll - nll_min) <= threshold {
            low = low.min(rs);
            high = high.max(rs);
        }
    }
    if low > high {
        return Err(FitError::DegenerateConfidenceRegion);
    }
    Ok((low, high))
}

/// Log-spaced grid of `count` points spanning ±[`WINDOW_DECADES`] around
/// `center`.
fn log_grid(center: f64, count: usize) -> Vec<f64> {
    let log_center = center.log10();
    if count <= 1 {
        return vec![center];
    }
    (0..count)
        .map(|i| {
            let frac = i as f64 / (count - 1) as f64;
            10.0_f64.powf(log_center - WINDOW_DECADES + 2.0 * WINDOW_DECADES * frac)
        })
        .collect()
}
