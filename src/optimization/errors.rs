use argmin::core::{ArgminError, Error};

/// Result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// Implies that finite differences should be used.
    GradientNotImplemented,

    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Gradient elements need to be finite.
    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    // ---- MLEOptions ----
    /// Gradient tolerance needs to be positive and finite.
    InvalidTolGrad {
        tol: f64,
        reason: &'static str,
    },
    /// Cost change tolerance needs to be positive and finite.
    InvalidTolCost {
        tol: f64,
        reason: &'static str,
    },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    /// At least one tolerance must be provided.
    NoTolerancesProvided,

    /// Invalid line searcher name.
    InvalidLineSearch {
        name: String,
        reason: &'static str,
    },

    /// lbfgs_mem needs to be at least 1.
    InvalidLbfgsMem {
        mem: usize,
        reason: &'static str,
    },

    // ---- Cost function ----
    /// Cost function returned a non-finite value.
    NonFiniteCost {
        value: f64,
    },

    /// A model likelihood evaluation failed inside the optimizer.
    LikelihoodFailure {
        text: String,
    },

    // ---- Optimizer outcome ----
    /// Estimated parameters must be finite.
    InvalidThetaHat {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// No best parameter vector was produced by the solver.
    MissingThetaHat,

    // ---- Argmin ----
    /// Wrapper for argmin::InvalidParameter.
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented.
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized.
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated.
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::CheckpointNotFound.
    CheckpointNotFound {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug.
    PotentialBug {
        text: String,
    },
    /// Wrapper for argmin::ImpossibleError.
    ImpossibleError {
        text: String,
    },
    /// Wrapper for other argmin::Error values.
    BackendError {
        text: String,
    },
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptError::GradientNotImplemented => {
                write!(f, "No analytic gradient implemented; finite differences required.")
            }
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient has dimension {found}, expected {expected}.")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient element at index {index}: {value}. {reason}")
            }
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance: {tol}. {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost tolerance: {tol}. {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations: {max_iter}. {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "At least one of tol_grad, tol_cost or max_iter must be provided.")
            }
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Invalid line search '{name}'. {reason}")
            }
            OptError::InvalidLbfgsMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory: {mem}. {reason}")
            }
            OptError::NonFiniteCost { value } => {
                write!(f, "Cost function returned a non-finite value: {value}.")
            }
            OptError::LikelihoodFailure { text } => {
                write!(f, "Likelihood evaluation failed: {text}")
            }
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid parameter estimate at index {index}: {value}. {reason}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Solver finished without producing a best parameter vector.")
            }
            OptError::InvalidParameter { text }
            | OptError::NotImplemented { text }
            | OptError::NotInitialized { text }
            | OptError::ConditionViolated { text }
            | OptError::CheckpointNotFound { text }
            | OptError::PotentialBug { text }
            | OptError::ImpossibleError { text }
            | OptError::BackendError { text } => write!(f, "Solver backend error: {text}"),
        }
    }
}

impl From<Error> for OptError {
    /// Map an argmin runtime error into the crate's error surface.
    ///
    /// Known [`ArgminError`] variants are preserved as dedicated wrappers so
    /// callers can match on them; anything else collapses into
    /// [`OptError::BackendError`] with the original message.
    fn from(err: Error) -> Self {
        match err.downcast_ref::<ArgminError>() {
            Some(ArgminError::InvalidParameter { text }) => {
                OptError::InvalidParameter { text: text.clone() }
            }
            Some(ArgminError::NotImplemented { text }) => {
                OptError::NotImplemented { text: text.clone() }
            }
            Some(ArgminError::NotInitialized { text }) => {
                OptError::NotInitialized { text: text.clone() }
            }
            Some(ArgminError::ConditionViolated { text }) => {
                OptError::ConditionViolated { text: text.clone() }
            }
            Some(ArgminError::CheckpointNotFound { text }) => {
                OptError::CheckpointNotFound { text: text.clone() }
            }
            Some(ArgminError::PotentialBug { text }) => {
                OptError::PotentialBug { text: text.clone() }
            }
            Some(ArgminError::ImpossibleError { text }) => {
                OptError::ImpossibleError { text: text.clone() }
            }
            // ArgminError is non_exhaustive; unknown variants and non-argmin
            // errors both collapse into the generic wrapper.
            _ => OptError::BackendError { text: err.to_string() },
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<OptError> for pyo3::PyErr {
    fn from(err: OptError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
