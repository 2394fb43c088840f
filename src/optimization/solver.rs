//! optimization::solver — L-BFGS construction and execution.
//!
//! Purpose
//! -------
//! Own the numeric type aliases shared across the optimizer layer, build
//! configured L-BFGS solvers for either line search, and run them through
//! `argmin`'s `Executor`, converting raw solver state into the crate's
//! [`OptimOutcome`]. The single high-level entry point is [`maximize`].
//!
//! Key behaviors
//! -------------
//! - [`build_optimizer_hager_zhang`] / [`build_optimizer_more_thuente`]
//!   construct L-BFGS solvers with the crate's canonical `(Theta, Grad,
//!   Cost)` triple, applying optional tolerances via [`configure_lbfgs`].
//! - [`run_solver`] seeds the executor state with the starting point and
//!   iteration cap in one pass, attaches a terminal observer when `verbose`
//!   and the `obs_slog` feature are both on, and normalizes the final state
//!   through [`OptimOutcome`].
//! - [`maximize`] validates the model/data pair via `check`, dispatches on
//!   the configured [`LineSearcher`], and returns a validated outcome.
//!
//! Invariants & assumptions
//! ------------------------
//! - The solver minimizes the cost `c(θ) = -ℓ(θ)`; the reported best value
//!   is flipped back to a log-likelihood before it reaches callers.
//! - The L-BFGS memory is `opts.lbfgs_mem` or [`DEFAULT_LBFGS_MEM`].
//! - Builders never set `theta0` or `max_iters`; those are runtime concerns
//!   applied by the runner.
//!
//! Conventions
//! -----------
//! - `argmin::core::Error` values never leak across module boundaries; the
//!   crate's `From<Error> for OptError` conversion intercepts them.
//!
//! Downstream usage
//! ----------------
//! - The profile fitter calls [`maximize`] with its likelihood model and
//!   binned data; nothing outside this module touches `Executor` directly.
//!
//! Testing notes
//! -------------
//! - Unit tests run full solves on analytic toy likelihoods with known
//!   maxima, for both line searches.
use std::collections::HashMap;

use crate::optimization::{
    adapter::CostAdapter,
    errors::OptResult,
    likelihood::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome},
};
use argmin::core::{Executor, State};
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::Array1;

/// Parameter vector in the unconstrained optimizer space.
pub type Theta = Array1<f64>;
/// Gradient vector, same shape as [`Theta`].
pub type Grad = Array1<f64>;
/// Scalar objective value.
pub type Cost = f64;
/// Function-evaluation counters as reported by `argmin`.
pub type FnEvalMap = HashMap<String, u64>;

/// Default L-BFGS history size when `opts.lbfgs_mem` is `None`.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Hager–Zhang line search over the crate's numeric types.
pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;
/// More–Thuente line search over the crate's numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;
/// L-BFGS paired with Hager–Zhang.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;
/// L-BFGS paired with More–Thuente.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
/// Iteration state threaded through the executor for the crate's solvers.
pub type LbfgsState = argmin::core::IterState<Theta, Grad, (), (), (), f64>;

/// Construct an L-BFGS solver with Hager–Zhang line search.
///
/// Consults `opts.lbfgs_mem` (falling back to [`DEFAULT_LBFGS_MEM`]) and the
/// optional tolerances in `opts.tols`. Initial parameters and iteration
/// limits are left to [`run_solver`].
///
/// # Errors
/// Returns an `OptError` if `argmin` rejects a tolerance setting.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let hager_zhang = HagerZhangLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsHagerZhang::new(hager_zhang, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Construct an L-BFGS solver with More–Thuente line search.
///
/// Same contract as [`build_optimizer_hager_zhang`], with the More–Thuente
/// strategy underneath.
///
/// # Errors
/// Returns an `OptError` if `argmin` rejects a tolerance setting.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let more_thuente = MoreThuenteLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(more_thuente, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Apply optional gradient/cost tolerances to an L-BFGS solver.
///
/// When a tolerance is `None` the corresponding `with_tolerance_*` call is
/// skipped and `argmin`'s defaults remain in effect. Generic over the
/// line-search type so both builders share the wiring.
///
/// # Errors
/// Returns an `OptError` if `argmin` rejects a tolerance value.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

/// Execute a built solver on the two-parameter profile problem.
///
/// Shared runner for both line-search variants. The executor state is
/// seeded in a single pass: the starting point `theta0` (consumed) and, if
/// `opts.tols.max_iter` is set, the iteration cap. When `opts.verbose` is
/// on and the crate is built with `obs_slog`, a non-blocking terminal
/// observer reports per-iteration progress, initial evaluation included, so
/// the runner itself emits nothing.
///
/// The final iteration state is handed to [`outcome_from_state`], which
/// flips the best cost back into a log-likelihood.
///
/// # Errors
/// - Propagates `argmin` runtime errors (solver or line-search failures)
///   through the crate's `From<argmin::core::Error>` conversion.
/// - Propagates validation errors raised while building [`OptimOutcome`].
pub fn run_solver<'a, F, S>(
    problem: CostAdapter<'a, F>, solver: S, theta0: Theta, opts: &MLEOptions,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: argmin::core::Solver<CostAdapter<'a, F>, LbfgsState> + Send + 'static,
{
    let iter_cap = opts.tols.max_iter;
    let executor = Executor::new(problem, solver).configure(move |state| {
        let state = state.param(theta0);
        match iter_cap {
            Some(cap) => state.max_iters(cap as u64),
            None => state,
        }
    });
    #[cfg(feature = "obs_slog")]
    let executor = if opts.verbose {
        executor.add_observer(
            argmin_observer_slog::SlogLogger::term_noblock(),
            argmin::core::observers::ObserverMode::Always,
        )
    } else {
        executor
    };
    outcome_from_state(executor.run()?.state().clone())
}

/// Normalize a finished iteration state into an [`OptimOutcome`].
///
/// Takes ownership of the state so the best parameter vector and the last
/// gradient can be moved out rather than cloned. The stored best cost is
/// `-ℓ(θ̂)` and is negated here.
fn outcome_from_state(mut state: LbfgsState) -> OptResult<OptimOutcome> {
    let iterations = state.get_iter();
    let fn_evals = state.get_func_counts().clone();
    let termination = state.get_termination_status().clone();
    let grad = state.take_gradient();
    let best = state.take_best_param();
    let value = -state.get_best_cost();
    OptimOutcome::new(best, value, termination, iterations, fn_evals, grad)
}

/// Maximize a log-likelihood with L-BFGS.
///
/// High-level entry point: validates the model/data pair via
/// [`LogLikelihood::check`], builds the solver dictated by
/// `opts.line_searcher`, and runs it from `theta0`.
///
/// # Errors
/// - Propagates errors from `check`.
/// - Propagates builder and runner errors (see [`run_solver`]).
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = CostAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_solver(problem, solver, theta0, opts)
        }
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_solver(problem, solver, theta0, opts)
        }
    }
}
