//! halo::nfw — projected NFW surface density and cylindrical mass.
//!
//! Purpose
//! -------
//! Evaluate the Navarro-Frenk-White profile projected along the line of
//! sight, in the dimensionless radius `t = R / r_s`. Both functions are
//! expressed in units of the 3-D mass inside the scale radius, so the
//! normalization constants `2 ln 2 - 1` and `ln 2 - 1/2` divide the raw
//! closed forms.
//!
//! Key behaviors
//! -------------
//! - The closed forms change branch at `t = 1` (inverse hyperbolic vs.
//!   circular cosine); the exact-`t = 1` limits are substituted explicitly.
//! - Branch selection rounds `t` to 8 decimals first, so values within
//!   5e-9 of 0 or 1 take the limit branch instead of dividing by a
//!   vanishing `t^2 - 1`.
//!
//! Testing notes
//! -------------
//! - Tests pin the analytic limits at `t -> 0` and `t = 1`, continuity
//!   across the branch point, and monotonicity of the mass profile.

/// Round to 8 decimal places, matching the branch tolerance of the closed
/// forms.
pub(crate) fn round8(x: f64) -> f64 {
    (x * 1e8).round() / 1e8
}

/// Projected NFW surface density at `t = R / r_s`, in units of the 3-D mass
/// inside the scale radius.
///
/// Limits: `t -> 0` gives 0 by convention (the profile diverges there and
/// carries no measure), `t = 1` gives `1/3` before normalization.
pub fn surface_density(t: f64) -> f64 {
    let sd = if round8(t) == 0.0 {
        0.0
    } else if round8(t) == 1.0 {
        1.0 / 3.0
    } else {
        let cm1 = if t < 1.0 { (1.0 / t).acosh() } else { (1.0 / t).acos() };
        (1.0 - cm1 / (t * t - 1.0).abs().sqrt()) / (t * t - 1.0)
    };
    sd / (2.0 * std::f64::consts::LN_2 - 1.0)
}

/// Projected NFW mass inside a cylinder of radius `t = R / r_s`, in units of
/// the 3-D mass inside the scale radius.
pub fn enclosed_mass(t: f64) -> f64 {
    let mp = if round8(t) == 0.0 {
        0.0
    } else if round8(t) == 1.0 {
        1.0 - std::f64::consts::LN_2
    } else {
        let capc = if t < 1.0 { (1.0 / t).acosh() } else { (1.0 / t).acos() };
        capc / (t * t - 1.0).abs().sqrt() + (t / 2.0).ln()
    };
    mp / (std::f64::consts::LN_2 - 0.5)
}
