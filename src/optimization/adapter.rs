//! Adapter that exposes a [`LogLikelihood`] as an `argmin` problem.
//!
//! A *maximization* of a log-likelihood `ℓ(θ)` is converted into a
//! *minimization* problem by defining the cost as `c(θ) = -ℓ(θ)`. Analytic
//! gradients (if provided by the model) are negated accordingly. If a
//! gradient is not provided, the **cost** closure is finite-differenced, so
//! no sign flip is needed in that branch.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    likelihood::LogLikelihood,
    solver::{Cost, Grad, Theta},
    validation::validate_grad,
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges a [`LogLikelihood`] to `argmin`'s `CostFunction` and `Gradient`.
///
/// - `CostFunction::cost` returns `-ℓ(θ)` (negative log-likelihood).
/// - `Gradient::gradient` returns:
///   - `-∇ℓ(θ)` if the model provides an analytic gradient, or
///   - a finite-difference gradient of the cost (no sign flip needed).
pub struct CostAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> CostAdapter<'a, F> {
    /// Construct a new adapter over a model and its data.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

impl<'a, F: LogLikelihood> CostFunction for CostAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the cost `c(θ) = -ℓ(θ)`.
    ///
    /// # Errors
    /// Propagates any `OptError` from the model's `value`, and returns
    /// `NonFiniteCost` if the log-likelihood is not finite.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(-output)
    }
}

impl<'a, F: LogLikelihood> Gradient for CostAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the gradient of the cost at `θ`.
    ///
    /// Behavior:
    /// - If the model implements `grad(θ, data)`, it is validated and
    ///   returned negated (the cost is `-ℓ`).
    /// - Otherwise, a finite-difference gradient of the **cost** is
    ///   computed: *central* differences first, retrying once with
    ///   *forward* differences if any cost evaluation failed or the result
    ///   did not validate.
    ///
    /// The FD closure must return `f64`, so `?` cannot be used inside it;
    /// the first error is captured in `closure_err` and the closure returns
    /// `NaN`, which is turned back into a real error after the FD pass.
    ///
    /// # Errors
    /// - Propagates model errors from `grad` (other than
    ///   `GradientNotImplemented`).
    /// - Propagates any error raised by cost evaluations performed during FD.
    /// - Returns validation errors if the gradient has the wrong dimension
    ///   or non-finite entries.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost_func = |theta: &Theta| -> f64 {
                    match self.cost(theta) {
                        Ok(val) => val,
                        Err(e) => {
                            let mut slot = closure_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            f64::NAN
                        }
                    }
                };
                let fd_grad = theta.central_diff(&cost_func);
                if closure_err.borrow().is_none() && validate_grad(&fd_grad, dim).is_ok() {
                    return Ok(fd_grad);
                }
                run_forward_diff(theta, &cost_func, &closure_err)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Compute a forward-difference gradient of `func` at `theta`, with error
/// capture.
///
/// Any error raised by `func` inside the FD routine is stored into
/// `closure_err` (the closure itself returns `NaN`). This helper clears the
/// slot, performs `forward_diff`, surfaces a captured error if one occurred,
/// and otherwise validates and returns the gradient.
fn run_forward_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> Result<Grad, Error> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}
