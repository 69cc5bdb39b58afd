use crate::error::{ComputationError, Result};
use crate::geometry::curve::Curve;

/// Budget and stopping rule for [`ParameterAtLength`].
#[derive(Debug, Clone, Copy)]
pub struct InversionParams {
    /// Maximum number of Newton/bisection steps.
    pub iterations: usize,
    /// Accepted absolute error on the arc length.
    pub tolerance: f64,
}

impl Default for InversionParams {
    fn default() -> Self {
        Self {
            iterations: 32,
            tolerance: 1e-6,
        }
    }
}

/// Outcome of a length inversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inversion {
    /// The parameter found (the last iterate when not converged).
    pub parameter: f64,
    /// `length(t_min, parameter)` minus the clamped target length.
    pub residual: f64,
    /// Number of steps taken.
    pub iterations: usize,
    /// Whether `|residual|` fell below the tolerance.
    pub converged: bool,
}

/// Finds the parameter at which the arc length from `t_min` reaches a target.
///
/// Newton steps on `length(t_min, t) - target` with the speed as derivative,
/// guarded by a shrinking bracket: whenever a step leaves the bracket (or the
/// speed vanishes) the next iterate is the bracket midpoint. Targets outside
/// `[0, total_length]` resolve to the domain ends.
///
/// Running out of iterations is not an error; the last iterate is returned
/// with `converged == false` and its residual.
#[derive(Debug, Clone, Copy)]
pub struct ParameterAtLength {
    length: f64,
    params: InversionParams,
}

impl ParameterAtLength {
    /// Creates a new query with the default budget.
    #[must_use]
    pub fn new(length: f64) -> Self {
        Self {
            length,
            params: InversionParams::default(),
        }
    }

    /// Replaces the iteration budget and tolerance.
    #[must_use]
    pub fn with_params(mut self, params: InversionParams) -> Self {
        self.params = params;
        self
    }

    /// Sets the maximum number of Newton/bisection steps.
    #[must_use]
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.params.iterations = iterations;
        self
    }

    /// Sets the accepted absolute error on the arc length.
    #[must_use]
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.params.tolerance = tolerance;
        self
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the target is not finite, or propagates evaluation
    /// and integration errors from the curve.
    pub fn execute<C: Curve + ?Sized>(&self, curve: &C) -> Result<Inversion> {
        if !self.length.is_finite() {
            return Err(ComputationError::NonFinite("target arc length").into());
        }
        let domain = curve.domain();
        let total = curve.total_length()?;

        let boundary = |parameter| Inversion {
            parameter,
            residual: 0.0,
            iterations: 0,
            converged: true,
        };
        if self.length <= 0.0 || total <= 0.0 {
            return Ok(boundary(domain.t_min));
        }
        if self.length >= total {
            return Ok(boundary(domain.t_max));
        }

        let target = self.length;
        let (mut lower, mut upper) = (domain.t_min, domain.t_max);
        let mut t = domain.lerp(target / total);
        let mut difference = curve.length(domain.t_min, t)? - target;
        let mut iterations = 0;

        while iterations < self.params.iterations && difference.abs() >= self.params.tolerance {
            iterations += 1;
            let candidate = t - difference / curve.speed(t)?;
            // A NaN candidate fails both comparisons and falls back to bisection.
            if difference > 0.0 {
                upper = t;
                t = if candidate > lower {
                    candidate
                } else {
                    0.5 * (lower + upper)
                };
            } else {
                lower = t;
                t = if candidate < upper {
                    candidate
                } else {
                    0.5 * (lower + upper)
                };
            }
            difference = curve.length(domain.t_min, t)? - target;
        }

        let converged = difference.abs() < self.params.tolerance;
        if !converged {
            tracing::warn!(
                target_length = target,
                parameter = t,
                residual = difference,
                iterations,
                "arc length inversion did not converge"
            );
        }
        Ok(Inversion {
            parameter: t,
            residual: difference,
            iterations,
            converged,
        })
    }
}
