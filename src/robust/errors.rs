/// Result alias for robust-statistics operations.
pub type RobustResult<T> = Result<T, RobustError>;

/// Errors raised by the robust location/scale estimator.
#[derive(Debug, Clone, PartialEq)]
pub enum RobustError {
    /// Too few samples to estimate location and scale with confidence bands.
    InsufficientData { needed: usize, found: usize },

    /// A sample contained a non-finite value.
    InvalidData { index: usize, value: f64 },

    /// The median absolute deviation is zero, so the biweight weights are
    /// undefined.
    ZeroSpread,

    /// The center iteration failed to settle within the iteration cap.
    NonConvergence { iterations: usize },

    /// A statrs distribution could not be constructed from the sample size.
    DistributionFailure { text: String },
}

impl std::error::Error for RobustError {}

impl std::fmt::Display for RobustError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RobustError::InsufficientData { needed, found } => {
                write!(f, "Need at least {needed} samples for a biweight estimate, found {found}.")
            }
            RobustError::InvalidData { index, value } => {
                write!(f, "Non-finite sample at index {index}: {value}.")
            }
            RobustError::ZeroSpread => {
                write!(f, "Median absolute deviation is zero; sample has no spread.")
            }
            RobustError::NonConvergence { iterations } => {
                write!(f, "Biweight center did not converge within {iterations} iterations.")
            }
            RobustError::DistributionFailure { text } => {
                write!(f, "Failed to build reference distribution: {text}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<RobustError> for pyo3::PyErr {
    fn from(err: RobustError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
