//! Integration tests for the cluster profile fitting pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end fit: from raw (unsorted) member radii, through
//!   binning and maximum-likelihood estimation, to goodness-of-fit
//!   statistics, the optional confidence scan, and the text report.
//! - Exercise realistic parameter regimes (both halo models, fitted and
//!   held backgrounds, tuned optimizer settings) rather than toy edge
//!   cases only.
//!
//! Coverage
//! --------
//! - `halo::model::HaloModel`:
//!   - NFW and beta variants driving both the synthetic samples and the
//!     fits.
//! - `profile::fitter::ProfileFitter`:
//!   - Parameter recovery, the fixed-background path, and option handling.
//! - `profile::confidence`:
//!   - The grid scan bracketing the best-fit scale radius.
//! - `profile::report`:
//!   - Exact render/parse round trip on a real fit.
//! - `optimization`:
//!   - Use of L-BFGS + line search via `MLEOptions` and `Tolerances`.
//!
//! Exclusions
//! ----------
//! - Fine-grained validation of low-level building blocks (biweight
//!   iteration, interpolation, grid geometry) — these are covered by unit
//!   tests.
//! - Python bindings — those are expected to be tested at a higher
//!   integration or system level.
//! - Statistical coverage of the confidence interval over ensembles —
//!   that belongs in targeted property tests.
use cluster_profile::{
    halo::model::HaloModel,
    optimization::likelihood::{LineSearcher, MLEOptions, Tolerances},
    profile::{
        fitter::{FitOptions, ProfileFitter},
        report::{parse_best_fit, render_report},
    },
};

/// Purpose
/// -------
/// Construct a deterministic radius sample whose empirical distribution
/// matches a halo surface-density profile plus a uniform background, by
/// inverting the cumulative count function at mid-point quantiles.
///
/// Parameters
/// ----------
/// - `n`: Sample size; must be large enough that the requested background
///   leaves a positive halo component (`bg * pi * rmax^2 < n`).
/// - `model`: Halo profile variant generating the sample.
/// - `scale_radius`: True scale radius in Mpc; strictly positive.
/// - `background`: True uniform background surface density in gals/Mpc².
/// - `rmax`: Outer radius of the observed field in Mpc.
///
/// Returns
/// -------
/// - `n` strictly increasing radii in `(0, rmax)` such that the fraction
///   of points inside any radius `R` equals the model's cumulative count
///   fraction at `R` up to quantile discretization.
///
/// Invariants
/// ----------
/// - The cumulative count `N(R) = A * pi * rs^2 * (M(R/rs) - M(0))
///   + bg * pi * R^2` is strictly increasing in `R`, so the bisection
///   below always converges.
///
/// Usage
/// -----
/// - Used by every integration test needing a sample with a known true
///   `(scale_radius, background)` pair; being quantile-exact, it removes
///   sampling noise from the recovery assertions.
fn synthetic_radii(
    n: usize, model: &HaloModel, scale_radius: f64, background: f64, rmax: f64,
) -> Vec<f64> {
    let mass_zero = model.enclosed_mass(0.0);
    let halo_mass = |r: f64| model.enclosed_mass(r / scale_radius) - mass_zero;

    let background_counts = background * std::f64::consts::PI * rmax * rmax;
    let halo_counts = n as f64 - background_counts;
    assert!(halo_counts > 0.0, "background would swallow the whole sample");
    let amplitude =
        halo_counts / (std::f64::consts::PI * scale_radius * scale_radius * halo_mass(rmax));

    let cumulative = |r: f64| {
        amplitude * std::f64::consts::PI * scale_radius * scale_radius * halo_mass(r)
            + background * std::f64::consts::PI * r * r
    };
    let total = cumulative(rmax);

    (1..=n)
        .map(|i| {
            let target = (i as f64 - 0.5) / n as f64 * total;
            let mut low = 0.0;
            let mut high = rmax;
            for _ in 0..200 {
                let mid = 0.5 * (low + high);
                if cumulative(mid) < target {
                    low = mid;
                } else {
                    high = mid;
                }
            }
            0.5 * (low + high)
        })
        .collect()
}

/// Purpose
/// -------
/// Provide a stable baseline `FitOptions` configuration for integration
/// tests that should reflect typical user settings.
///
/// Configuration
/// -------------
/// - Background fitted, points-per-bin factor 1, quiet.
/// - Optimizer tolerances: `tol_grad = Some(1e-6)`, `max_iter = Some(300)`.
/// - Line search: `LineSearcher::MoreThuente`, default L-BFGS memory.
///
/// Returns
/// -------
/// - A `FitOptions` instance suitable for most integration tests.
fn default_fit_options(model: HaloModel) -> FitOptions {
    FitOptions::new(model)
}

/// Purpose
/// -------
/// Provide an alternate, more aggressive `FitOptions` configuration to
/// exercise additional optimizer code paths.
///
/// Configuration
/// -------------
/// - Optimizer tolerances: `tol_grad = Some(1e-8)`, `tol_cost = Some(1e-10)`,
///   `max_iter = Some(500)`.
/// - Line search: `LineSearcher::HagerZhang`, explicit L-BFGS memory 5.
///
/// Returns
/// -------
/// - A `FitOptions` instance that stresses the optimizer more than the
///   default configuration.
///
/// Invariants
/// ----------
/// - Panics if any of the underlying constructors reject the supplied
///   parameters; this is treated as a test-time configuration error, not
///   a runtime error path to be exercised.
fn tuned_fit_options(model: HaloModel) -> FitOptions {
    let tols = Tolerances::new(Some(1e-8), Some(1e-10), Some(500))
        .expect("Tolerances::new should accept positive tolerances");
    let mle = MLEOptions::new(tols, LineSearcher::HagerZhang, false, Some(5))
        .expect("MLEOptions::new should succeed with explicit L-BFGS memory");
    let mut opts = FitOptions::new(model);
    opts.mle = mle;
    opts
}

#[test]
// Purpose
// -------
// Ensure the full pipeline recovers the true parameters of an NFW-plus-
// background sample and reports a fit that is not rejected.
//
// Given
// -----
// - 1000 quantile-exact radii from an NFW profile with scale radius
//   0.3 Mpc on a uniform background of 5 gals/Mpc² inside rmax = 2 Mpc,
//   deliberately shuffled out of radial order.
// - Default fit options and an off-truth initial guess (0.5, 3.0).
//
// Expect
// ------
// - The fit converges with at least one optimizer iteration.
// - Best-fit scale radius in [0.25, 0.35]; background within 20% of 5.
// - Chi-squared probability below the 0.99 rejection threshold.
// - A 1000-point model curve and GOF p-values inside [0, 1].
fn nfw_fit_recovers_scale_radius_and_background() {
    let radii = synthetic_radii(1000, &HaloModel::Nfw, 0.3, 5.0, 2.0);
    // Interleave halves so the fitter has to sort.
    let half = radii.len() / 2;
    let shuffled: Vec<f64> = radii[half..]
        .iter()
        .zip(&radii[..half])
        .flat_map(|(&a, &b)| [a, b])
        .collect();
    let opts = default_fit_options(HaloModel::Nfw);

    let fit = ProfileFitter::fit(&shuffled, None, 0.5, 3.0, &opts)
        .expect("fit should converge on a clean synthetic sample");

    assert!(fit.iterations >= 1);
    assert!(
        fit.scale_radius > 0.25 && fit.scale_radius < 0.35,
        "scale radius = {}",
        fit.scale_radius
    );
    assert!(
        fit.background_density > 4.0 && fit.background_density < 6.0,
        "background = {}",
        fit.background_density
    );
    assert!(fit.gof.chi2_probability < 0.99, "fit should not be rejected");
    assert_eq!(fit.model_radii.len(), 1000);
    assert_eq!(fit.model_radii.len(), fit.model_density.len());
    assert!((0.0..=1.0).contains(&fit.gof.ks_p));
    assert!((0.0..=1.0).contains(&fit.gof.ad_p));
    assert!(fit.gof.chi2.is_finite() && fit.gof.chi2 >= 0.0);
    assert!(!fit.profile.is_empty());
}

#[test]
// Purpose
// -------
// Verify the fixed-background path: the background is held at the
// supplied value bit for bit while the scale radius is still recovered.
//
// Given
// -----
// - The same NFW sample with the background held at its true value 5.0
//   and an off-truth initial scale radius of 0.6 Mpc.
//
// Expect
// ------
// - `background_density == 5.0` exactly.
// - Best-fit scale radius in [0.25, 0.35].
fn fixed_background_fit_holds_the_background() {
    let radii = synthetic_radii(1000, &HaloModel::Nfw, 0.3, 5.0, 2.0);
    let mut opts = default_fit_options(HaloModel::Nfw);
    opts.fit_background = false;

    let fit = ProfileFitter::fit(&radii, None, 0.6, 5.0, &opts)
        .expect("fixed-background fit should converge");

    assert_eq!(fit.background_density, 5.0);
    assert!(
        fit.scale_radius > 0.25 && fit.scale_radius < 0.35,
        "scale radius = {}",
        fit.scale_radius
    );
}

#[test]
// Purpose
// -------
// Verify that the optional confidence scan brackets the best-fit scale
// radius and stays inside its scan window.
//
// Given
// -----
// - The NFW sample fitted with `want_confidence = true` and a 41-point
//   grid per axis under the tuned (Hager-Zhang) optimizer options.
//
// Expect
// ------
// - An interval `(low, high)` with `low <= scale_radius <= high` up to
//   grid discretization slack.
// - Both ends inside the ±0.7-decade window around the best fit.
fn confidence_scan_brackets_the_best_fit() {
    let radii = synthetic_radii(1000, &HaloModel::Nfw, 0.3, 5.0, 2.0);
    let mut opts = tuned_fit_options(HaloModel::Nfw);
    opts.want_confidence = true;
    opts.grid_count = 41;

    let fit = ProfileFitter::fit(&radii, None, 0.3, 5.0, &opts)
        .expect("fit with confidence scan should converge");

    let (low, high) = fit.confidence_interval.expect("interval should be present");
    let rs = fit.scale_radius;
    assert!(
        low <= rs * (1.0 + 1e-9) && high >= rs * (1.0 - 1e-9),
        "interval ({low}, {high}) should bracket {rs}"
    );
    assert!(low >= rs * 10.0_f64.powf(-0.7) * (1.0 - 1e-9));
    assert!(high <= rs * 10.0_f64.powf(0.7) * (1.0 + 1e-9));
}

#[test]
// Purpose
// -------
// Verify the report round trip on a real fit: rendering and re-parsing
// reproduces the best-fit parameters exactly.
//
// Given
// -----
// - A completed NFW fit and its rendered report.
//
// Expect
// ------
// - `parse_best_fit(render_report(fit))` equals the fitted values bit
//   for bit.
// - The report carries the chi-squared line and one table row per bin.
fn report_round_trips_a_real_fit() {
    let radii = synthetic_radii(600, &HaloModel::Nfw, 0.3, 5.0, 2.0);
    let opts = default_fit_options(HaloModel::Nfw);
    let fit =
        ProfileFitter::fit(&radii, None, 0.3, 5.0, &opts).expect("fit should converge");

    let report = render_report(&fit);
    let (rs, bg) = parse_best_fit(&report).expect("report should parse");

    assert_eq!(rs, fit.scale_radius);
    assert_eq!(bg, fit.background_density);
    assert!(report.contains("d.o.f."));
    let rows = report
        .lines()
        .skip_while(|l| !l.starts_with("# radius"))
        .skip(1)
        .count();
    assert_eq!(rows, fit.profile.len());
}

#[test]
// Purpose
// -------
// Ensure the beta model flows through the same pipeline: a sample drawn
// from a beta profile is recovered by a beta fit.
//
// Given
// -----
// - 800 quantile-exact radii from a beta profile with exponent 1.0 and
//   scale radius 0.4 Mpc on a background of 5 gals/Mpc².
// - Per-member weights of 1.0 passed explicitly.
//
// Expect
// ------
// - The fit converges with the best-fit scale radius in [0.3, 0.5] and
//   the background within 30% of 5.
fn beta_fit_recovers_its_own_sample() {
    let model = HaloModel::beta(1.0).expect("valid beta exponent");
    let radii = synthetic_radii(800, &model, 0.4, 5.0, 2.0);
    let weights = vec![1.0; radii.len()];
    let opts = default_fit_options(model);

    let fit = ProfileFitter::fit(&radii, Some(&weights), 0.3, 4.0, &opts)
        .expect("beta fit should converge");

    assert!(
        fit.scale_radius > 0.3 && fit.scale_radius < 0.5,
        "scale radius = {}",
        fit.scale_radius
    );
    assert!(
        fit.background_density > 3.5 && fit.background_density < 6.5,
        "background = {}",
        fit.background_density
    );
}
