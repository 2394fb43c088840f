/// Result alias for goodness-of-fit operations.
pub type GofResult<T> = Result<T, GofError>;

/// Errors raised by the goodness-of-fit statistics.
#[derive(Debug, Clone, PartialEq)]
pub enum GofError {
    /// A sample is too short for the requested statistic.
    InsufficientData { needed: usize, found: usize },

    /// Paired inputs have different lengths.
    LengthMismatch { left: usize, right: usize },

    /// A sample contained a non-finite value.
    InvalidValue { index: usize, value: f64 },

    /// A per-bin error bar is zero or negative, so the chi-squared term is
    /// undefined.
    InvalidSigma { index: usize, value: f64 },

    /// Degrees of freedom came out non-positive.
    InvalidDof { bins: usize, n_free: usize },

    /// The pooled sample has no spread, so rank statistics are undefined.
    DegenerateSample,

    /// A statrs distribution could not be constructed.
    DistributionFailure { text: String },
}

impl std::error::Error for GofError {}

impl std::fmt::Display for GofError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GofError::InsufficientData { needed, found } => {
                write!(f, "Need at least {needed} samples, found {found}.")
            }
            GofError::LengthMismatch { left, right } => {
                write!(f, "Paired samples have different lengths: {left} vs {right}.")
            }
            GofError::InvalidValue { index, value } => {
                write!(f, "Non-finite value at index {index}: {value}.")
            }
            GofError::InvalidSigma { index, value } => {
                write!(f, "Non-positive error bar at index {index}: {value}.")
            }
            GofError::InvalidDof { bins, n_free } => {
                write!(f, "Non-positive degrees of freedom: {bins} bins with {n_free} free parameters.")
            }
            GofError::DegenerateSample => {
                write!(f, "Pooled sample has no spread; rank statistic is undefined.")
            }
            GofError::DistributionFailure { text } => {
                write!(f, "Failed to build reference distribution: {text}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<GofError> for pyo3::PyErr {
    fn from(err: GofError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
