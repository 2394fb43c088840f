#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    halo::model::HaloModel,
    optimization::likelihood::{LineSearcher, MLEOptions, Tolerances},
    profile::fitter::FitOptions,
};

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArrayMethods, PyReadonlyArray1};

/// Coerce an arbitrary Python object into a contiguous read-only `f64`
/// array.
///
/// Accepts, in order of preference: a contiguous float64 ndarray as-is, any
/// object with a `to_numpy(copy)` method (pandas `Series`) whose conversion
/// yields one, and finally any sequence of floats, which is copied into a
/// fresh array. Non-contiguous ndarrays fall through to the copying path.
///
/// # Errors
/// `PyTypeError` when none of the three coercions applies.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Some(arr) = contiguous_f64(raw) {
        return Ok(arr);
    }
    if let Ok(converted) = raw.call_method1("to_numpy", (false,)) {
        if let Some(arr) = contiguous_f64(&converted) {
            return Ok(arr);
        }
    }
    let values: Vec<f64> = raw.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "radii, weights, and samples must be 1-D float64 arrays, Series, or sequences",
        )
    })?;
    Ok(values.into_pyarray(py).readonly())
}

/// Extract a read-only float64 ndarray view, rejecting non-contiguous
/// layouts so callers can rely on `as_slice`.
#[cfg(feature = "python-bindings")]
fn contiguous_f64<'py>(obj: &Bound<'py, PyAny>) -> Option<PyReadonlyArray1<'py, f64>> {
    let arr = obj.extract::<PyReadonlyArray1<f64>>().ok()?;
    if arr.as_slice().is_err() {
        return None;
    }
    Some(arr)
}

#[cfg(feature = "python-bindings")]
#[allow(clippy::too_many_arguments)]
pub fn build_fit_options(
    model: Option<&str>, shape: Option<f64>, fit_background: Option<bool>,
    points_per_bin_factor: Option<usize>, grid_count: Option<usize>,
    want_confidence: Option<bool>, verbose: Option<bool>, tol_grad: Option<f64>,
    tol_cost: Option<f64>, max_iter: Option<usize>, line_searcher: Option<&str>,
    lbfgs_mem: Option<usize>,
) -> PyResult<FitOptions> {
    // Halo model selector with default "nfw".
    let halo = HaloModel::from_selector(model.unwrap_or("nfw"), shape)?;

    // Optimizer options.
    let mle_opts = extract_mle_opts(tol_grad, tol_cost, max_iter, line_searcher, lbfgs_mem)?;

    let mut opts = FitOptions::new(halo);
    opts.mle = mle_opts;
    if let Some(flag) = fit_background {
        opts.fit_background = flag;
    }
    if let Some(factor) = points_per_bin_factor {
        if factor == 0 {
            return Err(PyValueError::new_err("points_per_bin_factor must be positive"));
        }
        opts.points_per_bin_factor = factor;
    }
    if let Some(count) = grid_count {
        if count < 2 {
            return Err(PyValueError::new_err("grid_count must be at least 2"));
        }
        opts.grid_count = count;
    }
    if let Some(flag) = want_confidence {
        opts.want_confidence = flag;
    }
    if let Some(flag) = verbose {
        opts.verbose = flag;
    }
    Ok(opts)
}

#[cfg(feature = "python-bindings")]
fn extract_mle_opts(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>,
) -> PyResult<MLEOptions> {
    let tols = if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
        MLEOptions::default().tols
    } else {
        Tolerances::new(tol_grad, tol_cost, max_iter)?
    };

    let searcher = match line_searcher {
        Some(name) => name.parse::<LineSearcher>()?,
        None => LineSearcher::MoreThuente,
    };

    Ok(MLEOptions::new(tols, searcher, false, lbfgs_mem)?)
}
