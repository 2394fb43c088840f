//! cluster_profile — galaxy-cluster radial profile fitting with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the profile-fitting routines to Python via the `_cluster_profile` extension
//! module. When the `python-bindings` feature is enabled, this module defines
//! the Python-facing classes and submodules used by the `cluster_profile`
//! package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`robust`, `halo`, `gof`, `profile`, and
//!   `optimization`) as the public crate surface.
//! - Define `#[pyclass]` wrappers and the `#[pymodule]` initializer for the
//!   `_cluster_profile` Python extension.
//! - Create and register Python submodules (`robust`, `fitting`) under
//!   `cluster_profile` so that dot-notation imports work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - All heavy numerical work is implemented in the inner Rust modules; this
//!   file performs only FFI glue, input validation, and error mapping.
//! - When `python-bindings` is enabled, the Python-visible types mirror the
//!   invariants and signatures of their Rust counterparts (e.g.
//!   [`BiweightEstimate`], [`FitResult`]).
//! - On successful conversion from Python objects to Rust types, the
//!   invariants documented in the core modules are assumed to hold.
//!
//! Conventions
//! -----------
//! - Python-exposed classes live under `_cluster_profile.<submodule>` and are
//!   typically wrapped by thin pure-Python facades in the top-level
//!   `cluster_profile` package.
//! - Radii are projected clustrocentric distances in Mpc; densities are
//!   surface densities in galaxies per Mpc², matching the documentation of
//!   the underlying Rust modules.
//! - Errors from core Rust code are propagated as rich error types internally
//!   and converted to `PyErr` values at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should usually depend directly on the inner modules and
//!   can ignore the PyO3 items guarded by the `python-bindings` feature.
//! - The Python packaging layer imports the `_cluster_profile` module defined
//!   here and wraps its classes in user-facing Python APIs.
//! - External users are expected to interact with either the safe Rust APIs or
//!   the pure-Python wrappers; the PyO3 plumbing is considered internal.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules and
//!   by the Rust integration test; Python-side smoke tests verify that the
//!   classes can be constructed and queried from Python.

pub mod gof;
pub mod halo;
pub mod optimization;
pub mod profile;
pub mod robust;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    profile::{
        fitter::{FitResult, ProfileFitter},
        report::{parse_best_fit, render_report},
    },
    robust::biweight::BiweightEstimate,
    utils::{build_fit_options, extract_f64_array},
};

/// Biweight — Python-facing wrapper for the biweight location/scale estimator.
///
/// Purpose
/// -------
/// Estimate a robust center and spread of a one-dimensional sample from
/// Python, forwarding all computation to [`BiweightEstimate::estimate`].
///
/// Key behaviors
/// -------------
/// - Validate and convert Python inputs into a contiguous `f64` slice.
/// - Run the iterative biweight estimator and store the result internally.
/// - Expose the center and scale with their 68% bounds as Python properties.
///
/// Parameters
/// ----------
/// Constructed from Python via `Biweight(data)`:
/// - `data`: `&PyAny`
///   One-dimensional array-like of `f64` values with at least 3 entries.
///
/// Fields
/// ------
/// - `inner`: [`BiweightEstimate`]
///   Rust-side container holding the converged estimate used by the
///   accessors.
///
/// Invariants
/// ----------
/// - `center_low <= center <= center_high` and
///   `scale_low <= scale <= scale_high` at all times.
///
/// Performance
/// -----------
/// - At most one allocation is performed to copy Python data into a Rust
///   buffer when needed; property access is O(1).
///
/// Notes
/// -----
/// - This type is primarily intended to be used from Python; native Rust code
///   should prefer calling [`BiweightEstimate::estimate`] directly.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "cluster_profile.robust")]
pub struct Biweight {
    /// The converged biweight estimate.
    inner: BiweightEstimate,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl Biweight {
    /// Robust center and spread of a 1-D sample with 68% bounds.
    ///
    /// The center iterates Tukey's biweight location to convergence; the
    /// scale is the biweight scale at the converged center.
    #[new]
    #[pyo3(text_signature = "(data, /)")]
    pub fn new<'py>(py: Python<'py>, data: &Bound<'py, PyAny>) -> PyResult<Biweight> {
        let arr = extract_f64_array(py, data)?;
        let slice: &[f64] = arr
            .as_slice()
            .expect("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64");
        let inner = BiweightEstimate::estimate(slice)?;
        Ok(Biweight { inner })
    }

    /// The converged biweight center.
    #[getter]
    pub fn center(&self) -> f64 {
        self.inner.center
    }

    /// Lower 68% bound on the center.
    #[getter]
    pub fn center_low(&self) -> f64 {
        self.inner.center_low
    }

    /// Upper 68% bound on the center.
    #[getter]
    pub fn center_high(&self) -> f64 {
        self.inner.center_high
    }

    /// The biweight scale at the converged center.
    #[getter]
    pub fn scale(&self) -> f64 {
        self.inner.scale
    }

    /// Lower 68% bound on the scale.
    #[getter]
    pub fn scale_low(&self) -> f64 {
        self.inner.scale_low
    }

    /// Upper 68% bound on the scale.
    #[getter]
    pub fn scale_high(&self) -> f64 {
        self.inner.scale_high
    }
}

/// ClusterFit — Python-facing wrapper for the maximum-likelihood profile fit.
///
/// Purpose
/// -------
/// Expose [`ProfileFitter::fit`] to Python callers while preserving the core
/// Rust invariants and error handling.
///
/// Key behaviors
/// -------------
/// - Build a [`FitOptions`](crate::profile::fitter::FitOptions) from
///   Python-friendly arguments (model selector string, optional optimizer
///   tolerances) via [`build_fit_options`].
/// - Run the full pipeline — sorting, binning, likelihood maximization,
///   goodness of fit, optional confidence scan — in a single call and cache
///   the [`FitResult`] for inspection from Python via property getters.
/// - Render and re-parse the traditional text report.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `ClusterFit(radii, weights=None, r_scale=0.3, background=5.0, ...)`:
/// - `radii`: `&PyAny`
///   One-dimensional array-like of projected radii in Mpc; need not be
///   sorted.
/// - `weights`: `Option<&PyAny>`
///   Optional per-member weights matching `radii` in length; defaults to
///   all ones.
/// - `r_scale`, `background`: `f64`
///   Initial guesses for the scale radius (Mpc) and the background surface
///   density (gals/Mpc²). The background is held fixed when
///   `fit_background=False`.
/// - `model`: `Option<&str>`
///   Halo profile selector, `"nfw"` (default) or `"beta"`.
/// - `shape`: `Option<f64>`
///   Beta-model exponent; required meaningfully only when `model="beta"`.
/// - `fit_background`, `points_per_bin_factor`, `grid_count`, `confidence`,
///   `verbose`
///   Fit-level switches matching [`FitOptions`](crate::profile::fitter::FitOptions)
///   semantics.
/// - `tol_grad`, `tol_cost`, `max_iter`, `line_searcher`, `lbfgs_mem`
///   Optimizer tolerances and configuration used to build
///   [`MLEOptions`](crate::optimization::likelihood::MLEOptions).
///
/// Fields
/// ------
/// - `inner`: [`FitResult`]
///   Completed fit holding the best-fit parameters, the binned profile, the
///   model curve, and the goodness-of-fit summary.
///
/// Invariants
/// ----------
/// - `inner` only exists for a fit whose optimizer reported convergence; a
///   failed fit raises before construction completes.
///
/// Performance
/// -----------
/// - All heavy numerical work occurs inside the core modules; this wrapper
///   performs only input conversion, dispatch, and error mapping. Getter
///   methods allocate only when copying vectors out for Python consumption.
///
/// Notes
/// -----
/// - This type is part of the Python FFI surface; Rust code should prefer
///   calling [`ProfileFitter::fit`] directly.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "cluster_profile.fitting")]
pub struct ClusterFit {
    /// The completed fit.
    pub inner: FitResult,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl ClusterFit {
    /// Fit a halo surface-density profile to a member radius sample.
    #[new]
    #[pyo3(
        text_signature = "(radii, /, weights=None, r_scale=0.3, background=5.0, model='nfw', \
                          shape=None, fit_background=True, points_per_bin_factor=None, \
                          grid_count=None, confidence=False, verbose=False, tol_grad=None, \
                          tol_cost=None, max_iter=None, line_searcher=None, lbfgs_mem=None)",
        signature = (radii, weights = None, r_scale = 0.3, background = 5.0, model = None,
                     shape = None, fit_background = None, points_per_bin_factor = None,
                     grid_count = None, confidence = None, verbose = None, tol_grad = None,
                     tol_cost = None, max_iter = None, line_searcher = None, lbfgs_mem = None)
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn new<'py>(
        py: Python<'py>, radii: &Bound<'py, PyAny>, weights: Option<&Bound<'py, PyAny>>,
        r_scale: f64, background: f64, model: Option<&str>, shape: Option<f64>,
        fit_background: Option<bool>, points_per_bin_factor: Option<usize>,
        grid_count: Option<usize>, confidence: Option<bool>, verbose: Option<bool>,
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
        line_searcher: Option<&str>, lbfgs_mem: Option<usize>,
    ) -> PyResult<ClusterFit> {
        let radii_arr = extract_f64_array(py, radii)?;
        let radii_slice: &[f64] = radii_arr
            .as_slice()
            .expect("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64");

        let weights_arr = match weights {
            Some(raw) => Some(extract_f64_array(py, raw)?),
            None => None,
        };
        let weights_slice: Option<&[f64]> = weights_arr.as_ref().map(|arr| {
            arr.as_slice()
                .expect("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
        });

        let opts = build_fit_options(
            model,
            shape,
            fit_background,
            points_per_bin_factor,
            grid_count,
            confidence,
            verbose,
            tol_grad,
            tol_cost,
            max_iter,
            line_searcher,
            lbfgs_mem,
        )?;
        let inner = ProfileFitter::fit(radii_slice, weights_slice, r_scale, background, &opts)?;
        Ok(ClusterFit { inner })
    }

    /// Re-parse the best-fit parameter lines of a rendered report.
    ///
    /// Returns `(scale_radius, background_density)`.
    #[staticmethod]
    #[pyo3(text_signature = "(report, /)")]
    pub fn parse_report(report: &str) -> PyResult<(f64, f64)> {
        Ok(parse_best_fit(report)?)
    }

    /// Render the fit in the traditional text layout.
    #[pyo3(text_signature = "($self)")]
    pub fn report(&self) -> String {
        render_report(&self.inner)
    }

    /// Best-fit scale radius in Mpc.
    #[getter]
    pub fn scale_radius(&self) -> f64 {
        self.inner.scale_radius
    }

    /// Best-fit (or held) background surface density in gals/Mpc².
    #[getter]
    pub fn background_density(&self) -> f64 {
        self.inner.background_density
    }

    /// Biweight centers of the diagnostic bins, in Mpc.
    #[getter]
    pub fn bin_radii(&self) -> Vec<f64> {
        self.inner.profile.radii.clone()
    }

    /// Binned surface densities, in gals/Mpc².
    #[getter]
    pub fn bin_density(&self) -> Vec<f64> {
        self.inner.profile.density.clone()
    }

    /// Poisson-like error bars on the binned densities.
    #[getter]
    pub fn bin_density_error(&self) -> Vec<f64> {
        self.inner.profile.density_error.clone()
    }

    /// Fixed-grid radii of the rendered model curve.
    #[getter]
    pub fn model_radii(&self) -> Vec<f64> {
        self.inner.model_radii.clone()
    }

    /// Model surface densities on the fixed grid.
    #[getter]
    pub fn model_density(&self) -> Vec<f64> {
        self.inner.model_density.clone()
    }

    /// Chi-squared statistic of the binned comparison.
    #[getter]
    pub fn chi2(&self) -> f64 {
        self.inner.gof.chi2
    }

    /// Chi-squared CDF at the statistic; rejected if > 0.99.
    #[getter]
    pub fn chi2_probability(&self) -> f64 {
        self.inner.gof.chi2_probability
    }

    /// Degrees of freedom of the chi-squared comparison.
    #[getter]
    pub fn chi2_dof(&self) -> usize {
        self.inner.gof.chi2_dof
    }

    /// Two-sample Kolmogorov-Smirnov statistic.
    #[getter]
    pub fn ks_statistic(&self) -> f64 {
        self.inner.gof.ks_statistic
    }

    /// P-value of the KS comparison.
    #[getter]
    pub fn ks_p(&self) -> f64 {
        self.inner.gof.ks_p
    }

    /// Two-sample Anderson-Darling statistic (normalized).
    #[getter]
    pub fn ad_statistic(&self) -> f64 {
        self.inner.gof.ad_statistic
    }

    /// P-value of the AD comparison.
    #[getter]
    pub fn ad_p(&self) -> f64 {
        self.inner.gof.ad_p
    }

    /// 68% confidence interval on the scale radius, when requested.
    #[getter]
    pub fn confidence_interval(&self) -> Option<(f64, f64)> {
        self.inner.confidence_interval
    }

    /// Optimizer iterations, for diagnostics.
    #[getter]
    pub fn iterations(&self) -> usize {
        self.inner.iterations
    }
}

/// _cluster_profile — PyO3 module initializer for the Python extension.
///
/// Purpose
/// -------
/// Define the `_cluster_profile` Python module and register its submodules
/// used by the public `cluster_profile` package.
///
/// Key behaviors
/// -------------
/// - Create `robust` and `fitting` submodules.
/// - Attach those submodules to the parent `_cluster_profile` module.
/// - Register the submodules in `sys.modules` so they are importable via
///   dotted paths from Python.
///
/// Parameters
/// ----------
/// - `_py`: [`Python`]
///   GIL token provided by PyO3 during module initialization.
/// - `m`: `&Bound<PyModule>`
///   Module object representing `_cluster_profile`.
///
/// Returns
/// -------
/// `PyResult<()>`
///   `Ok(())` on success, or a Python exception if registration fails.
///
/// Errors
/// ------
/// - `PyErr`
///   If creating submodules or manipulating `sys.modules` fails.
///
/// Panics
/// ------
/// - Never panics under normal operation; all failures are mapped into
///   `PyErr`.
///
/// Notes
/// -----
/// - This function is invoked automatically by Python when importing the
///   compiled extension; it is not called directly by user code.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _cluster_profile<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let robust_mod = PyModule::new(_py, "robust")?;
    let fitting_mod = PyModule::new(_py, "fitting")?;
    robust_bindings(_py, m, &robust_mod)?;
    fitting_bindings(_py, m, &fitting_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?
        .getattr("modules")?
        .set_item("cluster_profile.robust", robust_mod)?;

    _py.import("sys")?
        .getattr("modules")?
        .set_item("cluster_profile.fitting", fitting_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn robust_bindings<'py>(
    _py: Python, cluster_profile: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<Biweight>()?;
    cluster_profile.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn fitting_bindings<'py>(
    _py: Python, cluster_profile: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<ClusterFit>()?;
    cluster_profile.add_submodule(m)?;
    Ok(())
}
