/// Result alias for halo-model operations.
pub type HaloResult<T> = Result<T, HaloError>;

/// Errors raised while evaluating halo profiles and their likelihood.
#[derive(Debug, Clone, PartialEq)]
pub enum HaloError {
    /// Scale radius must be finite and strictly positive.
    InvalidScaleRadius { value: f64 },

    /// Background density must be finite and non-negative.
    InvalidBackground { value: f64 },

    /// Beta-model shape exponent must be finite and strictly positive.
    InvalidShape { value: f64 },

    /// Unknown model selector string.
    UnknownModel { name: String },

    /// A radius sample was empty where at least one value is required.
    EmptyRadii,

    /// Radii and weights have different lengths.
    LengthMismatch { radii: usize, weights: usize },

    /// The radial extent collapses (max radius equals min radius), so the
    /// normalization integral vanishes.
    DegenerateRadialRange { radius: f64 },

    /// The model evaluated to a non-positive probability density at some
    /// radius, so the log-likelihood is undefined.
    NonPositiveProbability { probability: f64, radius: f64 },
}

impl std::error::Error for HaloError {}

impl std::fmt::Display for HaloError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HaloError::InvalidScaleRadius { value } => {
                write!(f, "Invalid scale radius: {value}. Must be finite and positive.")
            }
            HaloError::InvalidBackground { value } => {
                write!(f, "Invalid background density: {value}. Must be finite and non-negative.")
            }
            HaloError::InvalidShape { value } => {
                write!(f, "Invalid shape exponent: {value}. Must be finite and positive.")
            }
            HaloError::UnknownModel { name } => {
                write!(f, "Unknown halo model '{name}'. Valid options are 'nfw' and 'beta'.")
            }
            HaloError::EmptyRadii => write!(f, "Radius sample is empty."),
            HaloError::LengthMismatch { radii, weights } => {
                write!(f, "Radii ({radii}) and weights ({weights}) have different lengths.")
            }
            HaloError::DegenerateRadialRange { radius } => {
                write!(f, "Degenerate radial range: all radii equal {radius}.")
            }
            HaloError::NonPositiveProbability { probability, radius } => {
                write!(
                    f,
                    "Non-positive model probability {probability} at radius {radius}; \
                     log-likelihood is undefined."
                )
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<HaloError> for pyo3::PyErr {
    fn from(err: HaloError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
