//! profile::fitter — maximum-likelihood profile fit.
//!
//! Purpose
//! -------
//! The top-level operation of the crate: given member radii and a halo
//! model, estimate the scale radius and background density by maximizing
//! the unbinned likelihood, then cross-check the fit against the binned
//! diagnostic profile with chi-squared, KS, and Anderson-Darling
//! statistics, optionally attaching a grid-search confidence interval on
//! the scale radius.
//!
//! Key behaviors
//! -------------
//! - The likelihood always uses the raw (unbinned) radii; the binned
//!   profile exists only for goodness of fit and display.
//! - Bound constraints (both parameters > 0.001) are realized by
//!   optimizing in an unconstrained space through a shifted softplus; a
//!   fixed background collapses the parameter vector to one element.
//! - `points_per_bin = factor * floor(sqrt(n))`; fewer than 5 points per
//!   bin only warns (under `verbose`), it does not fail.
//! - The model curve is rendered on the fixed grid 0.001..5.0 step 0.005
//!   with the density-weighted background offset `bg * sum(w) / n`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Radii are sorted ascending (with weights in lockstep) before anything
//!   else happens; all downstream layers rely on that order.
//! - On any failure no partial result escapes; the fit is all-or-nothing.
//!
//! Downstream usage
//! ----------------
//! - [`crate::profile::report`] serializes the returned [`FitResult`];
//!   the Python bindings wrap [`ProfileFitter::fit`] directly.
//!
//! Testing notes
//! -------------
//! - Unit tests cover option defaults, the likelihood bridge, the
//!   interpolation helper, and input guards. Parameter recovery on
//!   synthetic data lives in the integration test.
use ndarray::Array1;

use crate::{
    gof::{
        anderson_darling::anderson_two_sample,
        chi_squared::chi2_gof,
        kolmogorov_smirnov::ks_two_sample,
    },
    halo::model::HaloModel,
    optimization::{
        errors::{OptError, OptResult},
        likelihood::{LogLikelihood, MLEOptions},
        solver::{maximize, Cost, Theta},
        transforms::{bounded_below, bounded_below_inv},
        validation::validate_grad,
    },
    profile::{
        binning::{bin_profile, BinnedProfile},
        confidence::confidence_interval,
        errors::{FitError, FitterResult},
    },
};

/// Lower bound shared by the scale radius and the fitted background.
pub const PARAM_FLOOR: f64 = 0.001;

/// Model-curve grid: start, exclusive end, and step.
const CURVE_START: f64 = 0.001;
const CURVE_END: f64 = 5.0;
const CURVE_STEP: f64 = 0.005;

/// Configuration of one fit invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    /// Halo profile variant, fixed for the whole fit.
    pub model: HaloModel,
    /// Fit the background density alongside the scale radius, or hold it
    /// at the initial value.
    pub fit_background: bool,
    /// Multiplier on `floor(sqrt(n))` when choosing the points per bin.
    pub points_per_bin_factor: usize,
    /// Grid resolution per axis for the confidence scan.
    pub grid_count: usize,
    /// Compute the confidence interval on the scale radius.
    pub want_confidence: bool,
    /// Print fit progress and results to stderr.
    pub verbose: bool,
    /// Optimizer configuration.
    pub mle: MLEOptions,
}

impl FitOptions {
    /// Defaults matching the interactive workflow: background fitted, one
    /// times `floor(sqrt(n))` points per bin, 100 grid points, no
    /// confidence scan, quiet.
    pub fn new(model: HaloModel) -> Self {
        Self {
            model,
            fit_background: true,
            points_per_bin_factor: 1,
            grid_count: 100,
            want_confidence: false,
            verbose: false,
            mle: MLEOptions::default(),
        }
    }
}

/// Goodness-of-fit summary of a completed fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GofSummary {
    pub chi2: f64,
    /// Chi-squared CDF at the statistic; rejected if > 0.99.
    pub chi2_probability: f64,
    pub chi2_dof: usize,
    pub ks_statistic: f64,
    pub ks_p: f64,
    pub ad_statistic: f64,
    pub ad_p: f64,
}

/// Immutable result of a completed fit.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    pub scale_radius: f64,
    pub background_density: f64,
    /// Binned diagnostic profile.
    pub profile: BinnedProfile,
    /// Fixed-grid model curve (radii, densities).
    pub model_radii: Vec<f64>,
    pub model_density: Vec<f64>,
    pub gof: GofSummary,
    /// 68% interval on the scale radius, when requested.
    pub confidence_interval: Option<(f64, f64)>,
    /// Optimizer iterations, for diagnostics.
    pub iterations: usize,
}

/// The unbinned profile likelihood in the unconstrained optimizer space.
///
/// `theta[0]` maps to the scale radius through the shifted softplus;
/// `theta[1]` maps to the background when it is fitted, otherwise the
/// fixed value is substituted and the vector has one element.
struct ProfileLikelihood {
    model: HaloModel,
    fit_background: bool,
    fixed_background: f64,
}

/// Data payload carried through the optimizer.
struct FitData {
    radii: Vec<f64>,
    weights: Vec<f64>,
}

impl ProfileLikelihood {
    fn dim(&self) -> usize {
        if self.fit_background { 2 } else { 1 }
    }

    fn params_from(&self, theta: &Theta) -> (f64, f64) {
        let scale_radius = bounded_below(theta[0], PARAM_FLOOR);
        let background = if self.fit_background {
            bounded_below(theta[1], PARAM_FLOOR)
        } else {
            self.fixed_background
        };
        (scale_radius, background)
    }
}

impl LogLikelihood for ProfileLikelihood {
    type Data = FitData;

    fn value(&self, theta: &Theta, data: &FitData) -> OptResult<Cost> {
        let (scale_radius, background) = self.params_from(theta);
        let nll = self
            .model
            .negative_log_likelihood(&data.radii, Some(&data.weights), scale_radius, background)
            .map_err(|e| OptError::LikelihoodFailure { text: e.to_string() })?;
        Ok(-nll)
    }

    fn check(&self, theta: &Theta, data: &FitData) -> OptResult<()> {
        validate_grad(theta, self.dim())?;
        if data.radii.is_empty() {
            return Err(OptError::LikelihoodFailure { text: "empty radius sample".to_string() });
        }
        Ok(())
    }
}

/// The maximum-likelihood fitter. Stateless; all inputs arrive per call.
pub struct ProfileFitter;

impl ProfileFitter {
    /// Fit the halo profile to a member radius sample.
    ///
    /// `weights` defaults to all ones. `initial_background` is the starting
    /// point when the background is fitted and the held value otherwise.
    /// Initial values at or below the 0.001 floor are nudged just above it,
    /// mirroring how a box-constrained minimizer clips its starting point.
    ///
    /// # Errors
    /// - Input guards: [`FitError::InsufficientData`],
    ///   [`FitError::LengthMismatch`], [`FitError::InvalidRadius`],
    ///   [`FitError::InvalidPointsPerBin`].
    /// - [`FitError::OptimizationFailure`] when the solver stops without a
    ///   terminating status.
    /// - Subtree failures wrapped as `Robust` / `Halo` / `Opt` / `Gof`.
    /// - [`FitError::DegenerateConfidenceRegion`] from the optional scan.
    pub fn fit(
        radii: &[f64], weights: Option<&[f64]>, initial_scale_radius: f64,
        initial_background: f64, opts: &FitOptions,
    ) -> FitterResult<FitResult> {
        let (sorted_radii, sorted_weights) = validate_and_sort(radii, weights)?;
        let n = sorted_radii.len();

        let points_per_bin = opts.points_per_bin_factor * (n as f64).sqrt().floor() as usize;
        if points_per_bin == 0 {
            return Err(FitError::InvalidPointsPerBin {
                factor: opts.points_per_bin_factor,
                members: n,
            });
        }
        if opts.verbose {
            if opts.fit_background {
                eprintln!("Fitting the scale radius and the background for {n} members.");
            } else {
                eprintln!("Fitting the scale radius only for {n} members.");
            }
            if points_per_bin < 5 {
                eprintln!("Only {n} members - not enough for a well-sampled profile.");
            }
        }
        let profile = bin_profile(&sorted_radii, &sorted_weights, points_per_bin)?;

        let likelihood = ProfileLikelihood {
            model: opts.model,
            fit_background: opts.fit_background,
            fixed_background: initial_background,
        };
        let rs0 = initial_scale_radius.max(PARAM_FLOOR * 1.001);
        let theta0: Theta = if opts.fit_background {
            let bg0 = initial_background.max(PARAM_FLOOR * 1.001);
            Array1::from(vec![
                bounded_below_inv(rs0, PARAM_FLOOR),
                bounded_below_inv(bg0, PARAM_FLOOR),
            ])
        } else {
            Array1::from(vec![bounded_below_inv(rs0, PARAM_FLOOR)])
        };
        let data =
            FitData { radii: sorted_radii.clone(), weights: sorted_weights.clone() };

        let outcome = maximize(&likelihood, theta0, &data, &opts.mle)?;
        if !outcome.converged {
            return Err(FitError::OptimizationFailure { status: outcome.status });
        }
        let (scale_radius, background_density) = likelihood.params_from(&outcome.theta_hat);

        let normalization =
            opts.model.normalization(&sorted_radii, scale_radius, background_density)?;
        let weight_sum: f64 = sorted_weights.iter().sum();
        let background_offset = background_density * weight_sum / n as f64;
        let model_radii = curve_grid();
        let model_density: Vec<f64> = model_radii
            .iter()
            .map(|&x| {
                normalization * opts.model.surface_density(x / scale_radius) + background_offset
            })
            .collect();

        let model_at_bins = interp(&profile.radii, &model_radii, &model_density);
        let n_free = if opts.fit_background { 2 } else { 1 };
        let chi2 = chi2_gof(&model_at_bins, &profile.density, &profile.density_error, n_free)?;
        let ks = ks_two_sample(&model_at_bins, &profile.density)?;
        let ad = anderson_two_sample(&model_at_bins, &profile.density)?;

        let ci = if opts.want_confidence {
            Some(confidence_interval(
                &opts.model,
                &sorted_radii,
                Some(&sorted_weights),
                scale_radius,
                background_density,
                opts.grid_count,
                n_free,
            )?)
        } else {
            None
        };

        if opts.verbose {
            eprintln!("Best-fit scale radius: {scale_radius}");
            if let Some((low, high)) = ci {
                eprintln!("1-sigma interval: {low} {high}");
            }
            eprintln!("Best-fit background density: {background_density} gals/Mpc^2");
            eprintln!(
                "Chi^2 of the fit is {} for {} d.o.f. (probability {}, rejected if > 0.99)",
                chi2.statistic, chi2.dof, chi2.probability
            );
        }

        Ok(FitResult {
            scale_radius,
            background_density,
            profile,
            model_radii,
            model_density,
            gof: GofSummary {
                chi2: chi2.statistic,
                chi2_probability: chi2.probability,
                chi2_dof: chi2.dof,
                ks_statistic: ks.statistic,
                ks_p: ks.p_value,
                ad_statistic: ad.statistic,
                ad_p: ad.p_value,
            },
            confidence_interval: ci,
            iterations: outcome.iterations,
        })
    }
}

/// Validate radii/weights and sort them in lockstep by radius.
fn validate_and_sort(
    radii: &[f64], weights: Option<&[f64]>,
) -> FitterResult<(Vec<f64>, Vec<f64>)> {
    if radii.is_empty() {
        return Err(FitError::InsufficientData { needed: 1, found: 0 });
    }
    for (index, &value) in radii.iter().enumerate() {
        if !value.is_finite() || value < 0.0 {
            return Err(FitError::InvalidRadius { index, value });
        }
    }
    if let Some(w) = weights {
        if w.len() != radii.len() {
            return Err(FitError::LengthMismatch { radii: radii.len(), weights: w.len() });
        }
    }
    let mut paired: Vec<(f64, f64)> = radii
        .iter()
        .enumerate()
        .map(|(i, &r)| (r, weights.map_or(1.0, |w| w[i])))
        .collect();
    paired.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    Ok(paired.into_iter().unzip())
}

/// The fixed model-curve radius grid.
fn curve_grid() -> Vec<f64> {
    let mut grid = Vec::new();
    let mut x = CURVE_START;
    while x < CURVE_END {
        grid.push(x);
        x += CURVE_STEP;
    }
    grid
}

/// Piecewise-linear interpolation of `(xp, fp)` at the points `x`, with
/// clamping outside the grid. `xp` must be ascending.
fn interp(x: &[f64], xp: &[f64], fp: &[f64]) -> Vec<f64> {
    x.iter()
        .map(|&xi| {
            if xi <= xp[0] {
                return fp[0];
            }
            if xi >= xp[xp.len() - 1] {
                return fp[fp.len() - 1];
            }
            let j = match xp
                .binary_search_by(|v| v.partial_cmp(&xi).unwrap_or(std::cmp::Ordering::Equal))
            {
                Ok(j) => return fp[j],
                Err(j) => j,
            };
            let frac = (xi - xp[j - 1]) / (xp[j] - xp[j - 1]);
            fp[j - 1] + frac * (fp[j] - fp[j - 1])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Option defaults and the curve grid geometry.
    // - The likelihood bridge (sign, parameter mapping, fixed background).
    // - The interpolation helper against hand-computed values.
    // - Input guards of the fit entry point.
    //
    // They intentionally DO NOT cover:
    // - Parameter recovery on synthetic profiles, which lives in the
    //   integration test.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Pin the defaults of `FitOptions::new`.
    //
    // Given
    // -----
    // - A fresh options struct for the NFW model.
    //
    // Expect
    // ------
    // - Background fitted, factor 1, 100 grid points, no confidence, quiet.
    fn fit_options_defaults_match_the_workflow() {
        // Act
        let opts = FitOptions::new(HaloModel::Nfw);

        // Assert
        assert!(opts.fit_background);
        assert_eq!(opts.points_per_bin_factor, 1);
        assert_eq!(opts.grid_count, 100);
        assert!(!opts.want_confidence);
        assert!(!opts.verbose);
    }

    #[test]
    // Purpose
    // -------
    // Verify the curve grid spans [0.001, 5.0) in steps of 0.005.
    //
    // Given
    // -----
    // - The fixed grid.
    //
    // Expect
    // ------
    // - 1000 points, first 0.001, last just below 5.0.
    fn curve_grid_has_the_fixed_geometry() {
        // Act
        let grid = curve_grid();

        // Assert
        assert_eq!(grid.len(), 1000);
        assert_relative_eq!(grid[0], 0.001);
        assert!(grid[999] < 5.0 && grid[999] > 4.99);
    }

    #[test]
    // Purpose
    // -------
    // Verify the likelihood bridge returns the negated model NLL and that
    // a fixed background ignores theta beyond the first element.
    //
    // Given
    // -----
    // - A five-point sample; theta mapping to (rs = 0.3, bg = 5.0).
    //
    // Expect
    // ------
    // - `value` = -NLL(model) for the same parameters; the one-element
    //   fixed-background vector passes `check`.
    fn likelihood_bridge_negates_and_respects_fixed_background() {
        // Arrange
        let data = FitData {
            radii: vec![0.1, 0.4, 0.8, 1.3, 2.0],
            weights: vec![1.0; 5],
        };
        let free = ProfileLikelihood {
            model: HaloModel::Nfw,
            fit_background: true,
            fixed_background: 0.0,
        };
        let fixed = ProfileLikelihood {
            model: HaloModel::Nfw,
            fit_background: false,
            fixed_background: 5.0,
        };
        let theta = array![
            bounded_below_inv(0.3, PARAM_FLOOR),
            bounded_below_inv(5.0, PARAM_FLOOR)
        ];
        let expected = -HaloModel::Nfw
            .negative_log_likelihood(&data.radii, Some(&data.weights), 0.3, 5.0)
            .expect("nll should evaluate");

        // Act
        let free_value = free.value(&theta, &data).expect("value should evaluate");
        let fixed_theta = array![bounded_below_inv(0.3, PARAM_FLOOR)];
        let fixed_value = fixed.value(&fixed_theta, &data).expect("value should evaluate");

        // Assert
        assert_relative_eq!(free_value, expected, max_relative = 1e-10);
        assert_relative_eq!(fixed_value, expected, max_relative = 1e-10);
        assert!(fixed.check(&fixed_theta, &data).is_ok());
        assert!(free.check(&fixed_theta, &data).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Verify the interpolation helper against hand-computed values,
    // including clamping.
    //
    // Given
    // -----
    // - Grid xp = [1, 2, 3] with fp = [10, 20, 40].
    //
    // Expect
    // ------
    // - interp at [0.5, 1.5, 2.5, 9] = [10, 15, 30, 40].
    fn interp_matches_hand_computation() {
        // Arrange
        let xp = [1.0, 2.0, 3.0];
        let fp = [10.0, 20.0, 40.0];

        // Act
        let out = interp(&[0.5, 1.5, 2.5, 9.0], &xp, &fp);

        // Assert
        assert_eq!(out, vec![10.0, 15.0, 30.0, 40.0]);
    }

    #[test]
    // Purpose
    // -------
    // Verify the input guards of the fit entry point.
    //
    // Given
    // -----
    // - An empty sample, a negative radius, and mismatched weights.
    //
    // Expect
    // ------
    // - The matching error for each case.
    fn fit_guards_reject_bad_inputs() {
        // Arrange
        let opts = FitOptions::new(HaloModel::Nfw);

        // Act & Assert
        assert_eq!(
            ProfileFitter::fit(&[], None, 0.3, 5.0, &opts),
            Err(FitError::InsufficientData { needed: 1, found: 0 })
        );
        assert!(matches!(
            ProfileFitter::fit(&[0.1, -0.2, 0.3], None, 0.3, 5.0, &opts),
            Err(FitError::InvalidRadius { index: 1, .. })
        ));
        assert_eq!(
            ProfileFitter::fit(&[0.1, 0.2, 0.3], Some(&[1.0]), 0.3, 5.0, &opts),
            Err(FitError::LengthMismatch { radii: 3, weights: 1 })
        );
    }
}
