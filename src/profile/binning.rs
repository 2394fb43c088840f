//! profile::binning — binned radial density profile.
//!
//! Purpose
//! -------
//! Convert sorted member radii (plus per-point weights) into a diagnostic
//! density profile: contiguous groups of `points_per_bin` members become
//! annuli whose density is the summed weight over the annulus area, with a
//! biweight-estimated radial center and a Poisson-like error bar.
//!
//! Key behaviors
//! -------------
//! - The trailing partial group is dropped, and so is the last complete
//!   group: its outer boundary would be the first radius of a group that
//!   does not exist. `n` members at `m` per bin give `n / m - 1` bins.
//! - The inner boundary of the first annulus is 0; every other inner
//!   boundary is the previous outer boundary, so the annuli tile
//!   `[0, r_outer_last]` without gaps.
//! - The error bar is `density / sqrt(m)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Radii are sorted ascending and non-negative; weights match in length.
//! - Bin centers are strictly increasing because the groups are contiguous
//!   in the sorted order.
use crate::{
    profile::errors::{FitError, FitterResult},
    robust::biweight::BiweightEstimate,
};

/// Binned radial density profile.
///
/// All three vectors have equal length (one entry per annulus), radii
/// ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct BinnedProfile {
    /// Biweight center of each group's radii.
    pub radii: Vec<f64>,
    /// Summed weight over annulus area.
    pub density: Vec<f64>,
    /// Poisson-like error bar, `density / sqrt(points_per_bin)`.
    pub density_error: Vec<f64>,
}

impl BinnedProfile {
    /// Number of bins.
    pub fn len(&self) -> usize {
        self.radii.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }
}

/// Bin a sorted radius sample into a density profile.
///
/// # Errors
/// - [`FitError::InvalidPointsPerBin`] when `points_per_bin` is zero.
/// - [`FitError::LengthMismatch`] when weights disagree in length.
/// - [`FitError::InsufficientData`] when fewer than `2 * points_per_bin`
///   members are available (no complete bin with a defined outer boundary).
/// - [`FitError::DegenerateBinBoundary`] when consecutive boundary radii
///   coincide.
/// - Biweight failures on a group propagate as [`FitError::Robust`].
pub fn bin_profile(
    radii: &[f64], weights: &[f64], points_per_bin: usize,
) -> FitterResult<BinnedProfile> {
    if points_per_bin == 0 {
        return Err(FitError::InvalidPointsPerBin { factor: 0, members: radii.len() });
    }
    if weights.len() != radii.len() {
        return Err(FitError::LengthMismatch { radii: radii.len(), weights: weights.len() });
    }
    let m = points_per_bin;
    let bins = (radii.len() / m).saturating_sub(1);
    if bins == 0 {
        return Err(FitError::InsufficientData { needed: 2 * m, found: radii.len() });
    }

    let mut centers = Vec::with_capacity(bins);
    let mut density = Vec::with_capacity(bins);
    let mut density_error = Vec::with_capacity(bins);
    let mut inner = 0.0;
    for i in 0..bins {
        let group = &radii[m * i..m * (i + 1)];
        let outer = radii[m * (i + 1)];
        if outer <= inner {
            return Err(FitError::DegenerateBinBoundary { bin: i, inner, outer });
        }
        let center = BiweightEstimate::estimate(group)?.center;
        let weight: f64 = weights[m * i..m * (i + 1)].iter().sum();
        let area = std::f64::consts::PI * (outer * outer - inner * inner);
        let dens = weight / area;
        centers.push(center);
        density.push(dens);
        density_error.push(dens / (m as f64).sqrt());
        inner = outer;
    }
    Ok(BinnedProfile { radii: centers, density, density_error })
}
