//! halo::model — the closed halo-model enum and its likelihood surface.
//!
//! Purpose
//! -------
//! Bundle the supported projected halo profiles behind one enum so the
//! fitter dispatches on a variant chosen once at configuration time, never
//! on a string per evaluation. The enum owns the physics-facing operations:
//! surface density, cylindrical mass, profile normalization against an
//! observed radius sample, and the weighted negative log-likelihood.
//!
//! Key behaviors
//! -------------
//! - [`HaloModel::normalization`] matches the member count inside the
//!   observed radial range after subtracting the expected background
//!   contribution; a non-positive member excess is clamped to 0.1 so the
//!   likelihood stays defined during optimizer excursions.
//! - [`HaloModel::negative_log_likelihood`] sums `-ln(prob) * w` per point
//!   with `prob = norm * sd(R / r_s) + bg`, rejecting any non-positive
//!   probability.
//!
//! Invariants & assumptions
//! ------------------------
//! - Parameters are validated once per call: scale radius finite positive,
//!   background finite non-negative, beta shape finite positive.
//! - Radii are assumed sorted ascending by the caller (the fitter sorts);
//!   only the first and last entries are used for the radial range.
//!
//! Downstream usage
//! ----------------
//! - The fitter's `LogLikelihood` implementation delegates here; the model
//!   curve rendered for goodness-of-fit uses `surface_density` plus the
//!   fitted normalization.
use std::str::FromStr;

use crate::halo::{
    beta, nfw,
    errors::{HaloError, HaloResult},
};

/// Minimum member excess retained when the background would over-subtract
/// the sample.
const NORMALIZATION_FLOOR: f64 = 0.1;

/// Supported projected halo profiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HaloModel {
    /// Navarro-Frenk-White profile; no shape parameter.
    Nfw,
    /// Beta model `(1 + t^2)^(-alpha)` with shape exponent `alpha`.
    Beta { alpha: f64 },
}

impl HaloModel {
    /// Construct a beta model with a validated shape exponent.
    ///
    /// # Errors
    /// Returns [`HaloError::InvalidShape`] unless `alpha` is finite and
    /// strictly positive.
    pub fn beta(alpha: f64) -> HaloResult<Self> {
        if !alpha.is_finite() || alpha <= 0.0 {
            return Err(HaloError::InvalidShape { value: alpha });
        }
        Ok(HaloModel::Beta { alpha })
    }

    /// Construct a model from an external selector string plus an optional
    /// shape exponent.
    ///
    /// `"nfw"` ignores `shape`; `"beta"` requires the exponent. Matching is
    /// case-insensitive.
    ///
    /// # Errors
    /// - [`HaloError::UnknownModel`] for unrecognized names.
    /// - [`HaloError::InvalidShape`] when a beta fit lacks a valid exponent.
    pub fn from_selector(name: &str, shape: Option<f64>) -> HaloResult<Self> {
        match name.to_lowercase().as_str() {
            "nfw" => Ok(HaloModel::Nfw),
            "beta" => {
                let alpha = shape.ok_or(HaloError::InvalidShape { value: f64::NAN })?;
                HaloModel::beta(alpha)
            }
            _ => Err(HaloError::UnknownModel { name: name.to_string() }),
        }
    }

    /// Projected surface density at dimensionless radius `t = R / r_s`.
    pub fn surface_density(&self, t: f64) -> f64 {
        match self {
            HaloModel::Nfw => nfw::surface_density(t),
            HaloModel::Beta { alpha } => beta::surface_density(t, *alpha),
        }
    }

    /// Projected mass inside a cylinder of dimensionless radius `t`.
    pub fn enclosed_mass(&self, t: f64) -> f64 {
        match self {
            HaloModel::Nfw => nfw::enclosed_mass(t),
            HaloModel::Beta { alpha } => beta::enclosed_mass(t, *alpha),
        }
    }

    /// Profile normalization matching the observed member count.
    ///
    /// With `t_low = min(R)/r_s` and `t_up = max(R)/r_s`, the expected
    /// background count inside the annulus is
    /// `pi r_s^2 (t_up^2 - t_low^2) bg`; the member excess over that count,
    /// floored at [`NORMALIZATION_FLOOR`], is divided by the model mass in
    /// the same annulus.
    ///
    /// # Errors
    /// - [`HaloError::InvalidScaleRadius`] / [`HaloError::InvalidBackground`]
    ///   on bad parameters.
    /// - [`HaloError::EmptyRadii`] for an empty sample.
    /// - [`HaloError::DegenerateRadialRange`] when all radii coincide and the
    ///   annulus mass vanishes.
    pub fn normalization(&self, radii: &[f64], scale_radius: f64, background: f64) -> HaloResult<f64> {
        validate_params(scale_radius, background)?;
        let (first, last) = match (radii.first(), radii.last()) {
            (Some(&f), Some(&l)) => (f, l),
            _ => return Err(HaloError::EmptyRadii),
        };
        let t_low = first / scale_radius;
        let t_up = last / scale_radius;
        let area = std::f64::consts::PI * scale_radius * scale_radius;

        let mut excess = radii.len() as f64 - area * (t_up * t_up - t_low * t_low) * background;
        if excess <= 0.0 {
            excess = NORMALIZATION_FLOOR;
        }
        let annulus_mass = area * (self.enclosed_mass(t_up) - self.enclosed_mass(t_low));
        if annulus_mass <= 0.0 {
            return Err(HaloError::DegenerateRadialRange { radius: last });
        }
        Ok(excess / annulus_mass)
    }

    /// Weighted negative log-likelihood of the sample under this model.
    ///
    /// Per point, `prob = norm * sd(R / r_s) + bg`; the result is
    /// `sum(-ln(prob) * w)`. Pass `None` for unit weights.
    ///
    /// # Errors
    /// - Everything [`HaloModel::normalization`] raises.
    /// - [`HaloError::LengthMismatch`] when weights are present with a
    ///   different length.
    /// - [`HaloError::NonPositiveProbability`] if any per-point probability
    ///   is not strictly positive.
    pub fn negative_log_likelihood(
        &self, radii: &[f64], weights: Option<&[f64]>, scale_radius: f64, background: f64,
    ) -> HaloResult<f64> {
        if let Some(w) = weights {
            if w.len() != radii.len() {
                return Err(HaloError::LengthMismatch { radii: radii.len(), weights: w.len() });
            }
        }
        let norm = self.normalization(radii, scale_radius, background)?;
        let mut nll = 0.0;
        for (i, &r) in radii.iter().enumerate() {
            let prob = norm * self.surface_density(r / scale_radius) + background;
            if prob <= 0.0 || !prob.is_finite() {
                return Err(HaloError::NonPositiveProbability { probability: prob, radius: r });
            }
            let w = weights.map_or(1.0, |w| w[i]);
            nll -= prob.ln() * w;
        }
        Ok(nll)
    }
}

impl FromStr for HaloModel {
    type Err = HaloError;

    /// Parse a shape-free selector. Beta fits must go through
    /// [`HaloModel::from_selector`] to supply the exponent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HaloModel::from_selector(s, None)
    }
}

fn validate_params(scale_radius: f64, background: f64) -> HaloResult<()> {
    if !scale_radius.is_finite() || scale_radius <= 0.0 {
        return Err(HaloError::InvalidScaleRadius { value: scale_radius });
    }
    if !background.is_finite() || background < 0.0 {
        return Err(HaloError::InvalidBackground { value: background });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Selector parsing and shape validation.
    // - Normalization floor behavior and parameter guards.
    // - Likelihood sign conventions and the non-positive-probability guard.
    //
    // They intentionally DO NOT cover:
    // - Recovery of true parameters from data, which the integration test
    //   exercises end to end.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify selector parsing for both models and rejection of unknown
    // names and missing beta shapes.
    //
    // Given
    // -----
    // - Selectors "NFW", "beta" (with and without shape), and "plummer".
    //
    // Expect
    // ------
    // - "NFW" parses; "beta" with shape 0.8 parses; "beta" without shape
    //   and "plummer" error.
    fn from_selector_parses_and_rejects() {
        // Act & Assert
        assert_eq!(HaloModel::from_selector("NFW", None), Ok(HaloModel::Nfw));
        assert_eq!(
            HaloModel::from_selector("beta", Some(0.8)),
            Ok(HaloModel::Beta { alpha: 0.8 })
        );
        assert!(matches!(
            HaloModel::from_selector("beta", None),
            Err(HaloError::InvalidShape { .. })
        ));
        assert!(matches!(
            HaloModel::from_selector("plummer", None),
            Err(HaloError::UnknownModel { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Verify that the normalization stays positive when the background
    // over-subtracts the sample, via the floor on the member excess.
    //
    // Given
    // -----
    // - Three radii spanning [0.1, 2.0] with an absurdly large background.
    //
    // Expect
    // ------
    // - A strictly positive, finite normalization.
    fn normalization_floors_over_subtracted_excess() {
        // Arrange
        let radii = [0.1, 1.0, 2.0];

        // Act
        let norm = HaloModel::Nfw
            .normalization(&radii, 0.3, 1e6)
            .expect("normalization should evaluate");

        // Assert
        assert!(norm > 0.0 && norm.is_finite());
    }

    #[test]
    // Purpose
    // -------
    // Verify the parameter and degenerate-range guards of normalization.
    //
    // Given
    // -----
    // - A negative scale radius, a negative background, an empty sample,
    //   and a sample where all radii coincide.
    //
    // Expect
    // ------
    // - The matching error for each case.
    fn normalization_guards_reject_bad_inputs() {
        // Arrange
        let radii = [0.1, 1.0, 2.0];
        let model = HaloModel::Nfw;

        // Act & Assert
        assert!(matches!(
            model.normalization(&radii, -0.3, 5.0),
            Err(HaloError::InvalidScaleRadius { .. })
        ));
        assert!(matches!(
            model.normalization(&radii, 0.3, -1.0),
            Err(HaloError::InvalidBackground { .. })
        ));
        assert_eq!(model.normalization(&[], 0.3, 5.0), Err(HaloError::EmptyRadii));
        assert!(matches!(
            model.normalization(&[1.0, 1.0, 1.0], 0.3, 5.0),
            Err(HaloError::DegenerateRadialRange { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Verify that the weighted likelihood reduces to the unweighted one
    // for unit weights and doubles when all weights double.
    //
    // Given
    // -----
    // - A five-point sample under the NFW model.
    //
    // Expect
    // ------
    // - NLL(None) = NLL(ones) and NLL(2 * ones) = 2 * NLL(ones).
    fn likelihood_weights_scale_linearly() {
        // Arrange
        let radii = [0.1, 0.4, 0.8, 1.3, 2.0];
        let ones = [1.0; 5];
        let twos = [2.0; 5];
        let model = HaloModel::Nfw;

        // Act
        let plain = model
            .negative_log_likelihood(&radii, None, 0.3, 5.0)
            .expect("nll should evaluate");
        let unit = model
            .negative_log_likelihood(&radii, Some(&ones), 0.3, 5.0)
            .expect("nll should evaluate");
        let double = model
            .negative_log_likelihood(&radii, Some(&twos), 0.3, 5.0)
            .expect("nll should evaluate");

        // Assert
        assert_relative_eq!(plain, unit, max_relative = 1e-12);
        assert_relative_eq!(double, 2.0 * unit, max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify the length-mismatch guard between radii and weights.
    //
    // Given
    // -----
    // - Five radii with three weights.
    //
    // Expect
    // ------
    // - `HaloError::LengthMismatch { radii: 5, weights: 3 }`.
    fn likelihood_rejects_mismatched_weights() {
        // Arrange
        let radii = [0.1, 0.4, 0.8, 1.3, 2.0];
        let weights = [1.0, 1.0, 1.0];

        // Act
        let result = HaloModel::Nfw.negative_log_likelihood(&radii, Some(&weights), 0.3, 5.0);

        // Assert
        assert_eq!(result, Err(HaloError::LengthMismatch { radii: 5, weights: 3 }));
    }
}
