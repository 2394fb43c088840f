use crate::{
    gof::errors::GofError, halo::errors::HaloError, optimization::errors::OptError,
    robust::errors::RobustError,
};

/// Result alias for fitter-level operations.
pub type FitterResult<T> = Result<T, FitError>;

/// Top-level error surface of the profile fitter.
///
/// Subtree errors are wrapped rather than flattened so callers can match on
/// the failing layer.
#[derive(Debug, Clone, PartialEq)]
pub enum FitError {
    /// Too few members for the requested binning.
    InsufficientData { needed: usize, found: usize },

    /// Radii and weights have different lengths.
    LengthMismatch { radii: usize, weights: usize },

    /// Radii must be finite and non-negative.
    InvalidRadius { index: usize, value: f64 },

    /// points_per_bin came out zero.
    InvalidPointsPerBin { factor: usize, members: usize },

    /// A bin's outer boundary did not exceed its inner boundary.
    DegenerateBinBoundary { bin: usize, inner: f64, outer: f64 },

    /// The optimizer stopped without reporting a terminating status.
    OptimizationFailure { status: String },

    /// No grid point fell inside the confidence threshold.
    DegenerateConfidenceRegion,

    /// A report line expected by the parser was missing or malformed.
    ReportParse { line: String },

    /// Robust-statistics failure (bin centers).
    Robust(RobustError),

    /// Halo-model failure (normalization, likelihood).
    Halo(HaloError),

    /// Optimizer failure.
    Opt(OptError),

    /// Goodness-of-fit failure.
    Gof(GofError),
}

impl std::error::Error for FitError {}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitError::InsufficientData { needed, found } => {
                write!(f, "Need at least {needed} members for the requested binning, found {found}.")
            }
            FitError::LengthMismatch { radii, weights } => {
                write!(f, "Radii ({radii}) and weights ({weights}) have different lengths.")
            }
            FitError::InvalidRadius { index, value } => {
                write!(f, "Invalid radius at index {index}: {value}. Must be finite and non-negative.")
            }
            FitError::InvalidPointsPerBin { factor, members } => {
                write!(
                    f,
                    "points_per_bin is zero for factor {factor} and {members} members."
                )
            }
            FitError::DegenerateBinBoundary { bin, inner, outer } => {
                write!(f, "Bin {bin} has a degenerate annulus: inner {inner}, outer {outer}.")
            }
            FitError::OptimizationFailure { status } => {
                write!(f, "Optimizer did not converge: {status}.")
            }
            FitError::DegenerateConfidenceRegion => {
                write!(f, "No grid point fell inside the 68% confidence threshold.")
            }
            FitError::ReportParse { line } => {
                write!(f, "Could not parse report line: '{line}'.")
            }
            FitError::Robust(e) => write!(f, "Robust estimation failed: {e}"),
            FitError::Halo(e) => write!(f, "Halo model failed: {e}"),
            FitError::Opt(e) => write!(f, "Optimization failed: {e}"),
            FitError::Gof(e) => write!(f, "Goodness of fit failed: {e}"),
        }
    }
}

impl From<RobustError> for FitError {
    fn from(err: RobustError) -> Self {
        FitError::Robust(err)
    }
}

impl From<HaloError> for FitError {
    fn from(err: HaloError) -> Self {
        FitError::Halo(err)
    }
}

impl From<OptError> for FitError {
    fn from(err: OptError) -> Self {
        FitError::Opt(err)
    }
}

impl From<GofError> for FitError {
    fn from(err: GofError) -> Self {
        FitError::Gof(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<FitError> for pyo3::PyErr {
    fn from(err: FitError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
