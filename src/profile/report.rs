//! profile::report — text serialization of a fit result.
//!
//! Purpose
//! -------
//! Render a [`FitResult`] in the traditional log layout (best-fit parameter
//! lines, goodness-of-fit lines, tabulated radius/density/error triples)
//! and re-parse the best-fit parameter lines. Values are written with 17
//! fractional digits in scientific notation, so a render/parse round trip
//! reproduces the binary `f64` values exactly.
//!
//! File I/O stays with the caller; this module only builds and reads
//! strings.
use crate::profile::{
    errors::{FitError, FitterResult},
    fitter::FitResult,
};

const SCALE_RADIUS_PREFIX: &str = "Best-fit scale radius:";
const BACKGROUND_PREFIX: &str = "Best-fit background density:";
const BACKGROUND_UNIT: &str = "gals/Mpc^2";

/// Render a fit result in the log layout.
pub fn render_report(fit: &FitResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("{SCALE_RADIUS_PREFIX} {:.17e}\n", fit.scale_radius));
    if let Some((low, high)) = fit.confidence_interval {
        out.push_str(&format!("1-sigma interval: {low:.17e} {high:.17e}\n"));
    }
    out.push_str(&format!(
        "{BACKGROUND_PREFIX} {:.17e} {BACKGROUND_UNIT}\n",
        fit.background_density
    ));
    out.push('\n');
    out.push_str(&format!(
        "Chi^2 of the fit is {:.17e} for {} d.o.f.\n",
        fit.gof.chi2, fit.gof.chi2_dof
    ));
    out.push_str(&format!(
        "Probability of the fit is {:.17e} [rejected if > 0.99]\n",
        fit.gof.chi2_probability
    ));
    out.push('\n');
    out.push_str(&format!(
        "KS test results: {:.17e} {:.17e}\n",
        fit.gof.ks_statistic, fit.gof.ks_p
    ));
    out.push_str(&format!(
        "AD test results: {:.17e} {:.17e}\n",
        fit.gof.ad_statistic, fit.gof.ad_p
    ));
    out.push('\n');
    out.push_str("# radius density error\n");
    for i in 0..fit.profile.len() {
        out.push_str(&format!(
            "{:.17e} {:.17e} {:.17e}\n",
            fit.profile.radii[i], fit.profile.density[i], fit.profile.density_error[i]
        ));
    }
    out
}

/// Re-parse the best-fit parameter lines of a rendered report.
///
/// Returns `(scale_radius, background_density)`.
///
/// # Errors
/// Returns [`FitError::ReportParse`] naming the missing or malformed line.
pub fn parse_best_fit(report: &str) -> FitterResult<(f64, f64)> {
    let scale_radius = parse_prefixed(report, SCALE_RADIUS_PREFIX)?;
    let background = parse_prefixed(report, BACKGROUND_PREFIX)?;
    Ok((scale_radius, background))
}

fn parse_prefixed(report: &str, prefix: &str) -> FitterResult<f64> {
    let line = report
        .lines()
        .find(|l| l.starts_with(prefix))
        .ok_or_else(|| FitError::ReportParse { line: prefix.to_string() })?;
    let value = line[prefix.len()..]
        .trim()
        .trim_end_matches(BACKGROUND_UNIT)
        .trim();
    value
        .parse::<f64>()
        .map_err(|_| FitError::ReportParse { line: line.to_string() })
}
