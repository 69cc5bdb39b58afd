use argmin::core::{CostFunction, Executor, State, TerminationReason};
use argmin::solver::brent::BrentRoot;

use crate::error::{ComputationError, Result};

/// Scalar root finding over a bracketing interval.
pub trait RootSolver {
    /// Finds `x` in `[lo, hi]` with `f(x) ≈ 0`.
    ///
    /// # Errors
    ///
    /// Returns an error if `f(lo)` and `f(hi)` have the same sign or the
    /// solver runs out of iterations.
    fn solve<F>(&self, f: F, lo: f64, hi: f64) -> Result<f64>
    where
        F: Fn(f64) -> f64;
}

/// Brent's method, backed by `argmin`'s `BrentRoot`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brent {
    /// Absolute tolerance on the root.
    pub tolerance: f64,
    /// Iteration budget.
    pub max_iterations: u64,
}

impl Default for Brent {
    fn default() -> Self {
        Self {
            tolerance: 1e-12,
            max_iterations: 100,
        }
    }
}

/// Adapts a closure to `argmin`'s cost-function interface.
struct Objective<F>(F);

impl<F: Fn(f64) -> f64> CostFunction for Objective<F> {
    type Param = f64;
    type Output = f64;

    fn cost(&self, param: &f64) -> std::result::Result<f64, argmin::core::Error> {
        Ok((self.0)(*param))
    }
}

impl RootSolver for Brent {
    fn solve<F>(&self, f: F, lo: f64, hi: f64) -> Result<f64>
    where
        F: Fn(f64) -> f64,
    {
        let f_lo = f(lo);
        let f_hi = f(hi);
        if !f_lo.is_finite() || !f_hi.is_finite() {
            return Err(ComputationError::NonFinite("root solver bracket").into());
        }
        if f_lo == 0.0 {
            return Ok(lo);
        }
        if f_hi == 0.0 {
            return Ok(hi);
        }
        if f_lo.signum() == f_hi.signum() {
            return Err(ComputationError::RootNotBracketed { lo, hi, f_lo, f_hi }.into());
        }

        let solver = BrentRoot::new(lo, hi, self.tolerance);
        let result = Executor::new(Objective(f), solver)
            .configure(|state| state.max_iters(self.max_iterations))
            .run()
            .map_err(|e| ComputationError::Solver(e.to_string()))?;

        let state = result.state();
        if matches!(
            state.get_termination_reason(),
            Some(TerminationReason::MaxItersReached)
        ) {
            return Err(ComputationError::RootNotConverged {
                iterations: self.max_iterations,
            }
            .into());
        }
        let root = state
            .get_param()
            .or_else(|| state.get_best_param())
            .copied()
            .ok_or_else(|| ComputationError::Solver("no root estimate".into()))?;
        Ok(root)
    }
}
