//! Types shared between the profile fitter and the L-BFGS machinery.
//!
//! - [`LogLikelihood`]: the seam the halo-profile likelihood implements to
//!   become optimizable.
//! - [`Tolerances`] / [`MLEOptions`]: validated solver configuration.
//! - [`LineSearcher`]: which line search L-BFGS runs with.
//! - [`OptimOutcome`]: what
//!   [`maximize`](crate::optimization::solver::maximize) hands back.
//!
//! Sign convention: callers think in log-likelihoods `ℓ(θ)`; the solver
//! minimizes `c(θ) = -ℓ(θ)`. An analytic gradient, when supplied, is `∇ℓ`
//! and gets negated at the adapter, never here.
use crate::optimization::{
    errors::{OptError, OptResult},
    solver::{Cost, FnEvalMap, Grad, Theta},
    validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
};
use argmin::core::TerminationStatus;
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// A model the optimizer can maximize.
///
/// `Data` is whatever the model evaluates against; for the profile fit it
/// is the sorted member radii paired with their weights. The three methods
/// see the same `(theta, data)` pair:
///
/// - `value` returns `ℓ(θ)`. The solver negates it internally, so models
///   never deal in costs.
/// - `check` runs once before any solver work and should reject `θ`/`data`
///   pairs the likelihood cannot handle.
/// - `grad`, if overridden, returns `∇ℓ(θ)`. The default declines with
///   [`OptError::GradientNotImplemented`], which routes the adapter to
///   finite differences.
pub trait LogLikelihood {
    type Data: 'static;

    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;

    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Line search driving the L-BFGS step length.
///
/// Selectable by name through `FromStr` (case-insensitive `"MoreThuente"` /
/// `"HagerZhang"`); anything else is `OptError::InvalidLineSearch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("morethuente") {
            Ok(LineSearcher::MoreThuente)
        } else if s.eq_ignore_ascii_case("hagerzhang") {
            Ok(LineSearcher::HagerZhang)
        } else {
            Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            })
        }
    }
}

/// How the maximizer runs: stopping rules, line search, history size.
///
/// `verbose` turns on the solver's per-iteration observer (requires the
/// `obs_slog` feature to have any effect). `lbfgs_mem` is the L-BFGS
/// history size; `None` means the crate default of 7.
#[derive(Debug, Clone, PartialEq)]
pub struct MLEOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl MLEOptions {
    /// Assemble optimizer options.
    ///
    /// The numeric stopping rules arrive pre-validated inside a
    /// [`Tolerances`]; only the history size is checked here.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, verbose: bool, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if lbfgs_mem == Some(0) {
            return Err(OptError::InvalidLbfgsMem {
                mem: 0,
                reason: "L-BFGS memory must be greater than zero.",
            });
        }
        Ok(Self { tols, line_searcher, verbose, lbfgs_mem })
    }
}

impl Default for MLEOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances::new(Some(1e-6), None, Some(300)).unwrap(),
            line_searcher: LineSearcher::MoreThuente,
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Stopping rules for the solver.
///
/// The gradient-norm threshold, the cost-change threshold, and the
/// iteration cap are each optional on their own, but a run with no stopping
/// rule at all would never terminate, so [`Tolerances::new`] insists on at
/// least one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Validate and assemble stopping rules.
    ///
    /// Provided tolerances must be finite and strictly positive; a provided
    /// iteration cap must be nonzero; and at least one of the three must be
    /// present.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] when all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for a
    ///   non-finite or non-positive tolerance.
    /// - [`OptError::InvalidMaxIter`] for `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if let (None, None, None) = (tol_grad, tol_cost, max_iter) {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_grad(tol_grad)?;
        verify_tol_cost(tol_cost)?;
        if max_iter == Some(0) {
            return Err(OptError::InvalidMaxIter {
                max_iter: 0,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// What a finished maximization hands back.
///
/// `theta_hat` lives in the same unconstrained space the caller optimized
/// over; `value` is the log-likelihood `ℓ(θ̂)`, not the minimized cost.
/// `converged` is `false` only when the solver stopped in the
/// `NotTerminated` state (a hit iteration cap still counts as terminated,
/// and `status` spells out which rule fired). `grad_norm` is the L2 norm of
/// the last gradient the solver held, when one was available.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Validate raw solver output into an outcome.
    ///
    /// The parameter vector must exist and be all-finite
    /// (`validate_theta_hat`) and the value finite (`validate_value`);
    /// either failing is an error, never a partial outcome.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let (converged, status) = describe_termination(&termination);
        Ok(Self {
            theta_hat,
            value,
            converged,
            status,
            iterations: iterations as usize,
            fn_evals,
            grad_norm: grad.map(|g| g.l2_norm()),
        })
    }
}

/// Map argmin's termination status onto `(converged, human-readable text)`.
fn describe_termination(termination: &TerminationStatus) -> (bool, String) {
    match termination {
        TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
        terminated => (true, format!("{terminated:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::collections::HashMap;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `Tolerances::new` validation rules (all-None, non-positive values).
    // - `MLEOptions::new` L-BFGS memory guard.
    // - `LineSearcher::from_str` parsing including case insensitivity.
    // - `OptimOutcome::new` termination-status mapping.
    //
    // They intentionally DO NOT cover:
    // - Running an actual solver; that is exercised by solver- and
    //   fitter-level tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that `Tolerances::new` rejects a configuration with no
    // stopping rule at all.
    //
    // Given
    // -----
    // - tol_grad = None, tol_cost = None, max_iter = None.
    //
    // Expect
    // ------
    // - `Err(OptError::NoTolerancesProvided)`.
    fn tolerances_new_rejects_all_none() {
        // Act
        let result = Tolerances::new(None, None, None);

        // Assert
        assert_eq!(result, Err(OptError::NoTolerancesProvided));
    }

    #[test]
    // Purpose
    // -------
    // Verify that `Tolerances::new` rejects a non-positive gradient
    // tolerance and a zero iteration cap.
    //
    // Given
    // -----
    // - tol_grad = Some(-1.0) in one call; max_iter = Some(0) in another.
    //
    // Expect
    // ------
    // - Both calls return `Err(_)`.
    fn tolerances_new_rejects_invalid_values() {
        // Act & Assert
        assert!(Tolerances::new(Some(-1.0), None, None).is_err());
        assert!(Tolerances::new(Some(1e-6), None, Some(0)).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Verify that `MLEOptions::new` rejects a zero L-BFGS memory but
    // accepts `None` and positive values.
    //
    // Given
    // -----
    // - Valid tolerances; lbfgs_mem in {Some(0), None, Some(5)}.
    //
    // Expect
    // ------
    // - Some(0) errors; the other two succeed.
    fn mle_options_new_guards_lbfgs_memory() {
        // Arrange
        let tols = Tolerances::new(Some(1e-6), None, Some(100)).expect("valid tolerances");

        // Act & Assert
        assert!(MLEOptions::new(tols, LineSearcher::MoreThuente, false, Some(0)).is_err());
        assert!(MLEOptions::new(tols, LineSearcher::MoreThuente, false, None).is_ok());
        assert!(MLEOptions::new(tols, LineSearcher::HagerZhang, false, Some(5)).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Verify `LineSearcher::from_str` parsing for valid (case-insensitive)
    // and invalid names.
    //
    // Given
    // -----
    // - "morethuente", "HAGERZHANG", and "newton".
    //
    // Expect
    // ------
    // - The first two parse to their variants; "newton" errors.
    fn line_searcher_from_str_parses_case_insensitively() {
        // Act & Assert
        assert_eq!("morethuente".parse::<LineSearcher>(), Ok(LineSearcher::MoreThuente));
        assert_eq!("HAGERZHANG".parse::<LineSearcher>(), Ok(LineSearcher::HagerZhang));
        assert!("newton".parse::<LineSearcher>().is_err());
    }

    #[test]
    // Purpose
    // -------
    // Verify that `OptimOutcome::new` maps `NotTerminated` to
    // `converged = false` and rejects a missing parameter vector.
    //
    // Given
    // -----
    // - A finite theta and value with `TerminationStatus::NotTerminated`.
    // - A second call with `theta_hat_opt = None`.
    //
    // Expect
    // ------
    // - First call: `converged == false`, status mentions "Not terminated".
    // - Second call: `Err(OptError::MissingThetaHat)`.
    fn optim_outcome_new_maps_termination_and_guards_theta() {
        // Arrange
        let theta = array![0.5, 1.0];
        let evals: FnEvalMap = HashMap::new();

        // Act
        let outcome = OptimOutcome::new(
            Some(theta),
            -12.5,
            TerminationStatus::NotTerminated,
            7,
            evals.clone(),
            None,
        )
        .expect("outcome should validate");
        let missing = OptimOutcome::new(None, -12.5, TerminationStatus::NotTerminated, 7, evals, None);

        // Assert
        assert!(!outcome.converged);
        assert!(outcome.status.contains("Not terminated"));
        assert_eq!(outcome.iterations, 7);
        assert_eq!(missing, Err(OptError::MissingThetaHat));
    }
}
