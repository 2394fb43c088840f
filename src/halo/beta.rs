//! halo::beta — projected beta-model surface density and cylindrical mass.
//!
//! The beta model is the power law `sd(t) = (1 + t^2)^(-alpha)` in the
//! dimensionless radius `t = R / r_s`. The cylindrical mass integral has a
//! logarithmic special case at `alpha = 1` (to 8 decimals), handled
//! explicitly.
use crate::halo::nfw::round8;

/// Projected beta-model surface density at `t = R / r_s`.
pub fn surface_density(t: f64, alpha: f64) -> f64 {
    (1.0 + t * t).powf(-alpha)
}

/// Projected beta-model mass inside a cylinder of radius `t = R / r_s`
/// (up to the common factor `pi r_s^2`, which cancels in normalization
/// ratios).
pub fn enclosed_mass(t: f64, alpha: f64) -> f64 {
    if round8(alpha) == 1.0 {
        (1.0 + t * t).ln()
    } else {
        (1.0 + t * t).powf(1.0 - alpha) / (1.0 - alpha)
    }
}
