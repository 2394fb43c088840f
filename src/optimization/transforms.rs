//! Numerically stable parameter transforms.
//!
//! The profile likelihood is defined only for a strictly positive scale
//! radius and background density, while the L-BFGS solver works in an
//! unconstrained space. The bridge is a shifted softplus: a bounded
//! parameter `p ∈ (floor, ∞)` is represented by `θ ∈ ℝ` through
//! `p = floor + softplus(θ)`.
//!
//! The softplus implementations use guarded strategies with an explicit
//! cutoff (`x > 20.0`) to keep `f64` arithmetic in a well-conditioned
//! regime, following the approach common in major ML libraries.

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// - For sufficiently large `x`, `softplus(x) ≈ x + ln1p(exp(-x)) ≈ x`.
/// - Otherwise, it falls back to `ln1p(exp(x))`.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp().ln_1p() }
}

/// Stable inverse of softplus on `(0, ∞)`: solves for `t` in
/// `softplus(t) = x`, returning `t = ln(exp(x) - 1)`.
///
/// - For sufficiently large `x`, `ln(exp(x) - 1) ≈ x + ln(1 - exp(-x)) ≈ x`.
/// - Otherwise, it uses `ln(expm1(x))`.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp_m1().ln() }
}

/// Map an unconstrained optimizer coordinate to a parameter bounded below.
///
/// `bounded_below(theta, floor) = floor + softplus(theta)`, so the result is
/// never less than `floor`. For strongly negative `theta` the softplus term
/// underflows below the floor's ULP and the sum rounds to `floor` exactly;
/// the likelihood only needs the result to stay positive, which a positive
/// floor guarantees.
pub fn bounded_below(theta: f64, floor: f64) -> f64 {
    floor + safe_softplus(theta)
}

/// Inverse of [`bounded_below`]: map a parameter `value > floor` into the
/// unconstrained optimizer space.
///
/// The caller must ensure `value > floor`; the result is `-∞`/NaN otherwise
/// and will be rejected by downstream validation.
pub fn bounded_below_inv(value: f64, floor: f64) -> f64 {
    safe_softplus_inv(value - floor)
}
