use crate::error::{ComputationError, Result};

/// Definite integration of a scalar function.
pub trait Integrator {
    /// Integrates `f` over `[a, b]`.
    ///
    /// # Errors
    ///
    /// Returns an error if `f` fails or the integral does not converge.
    fn integrate<F>(&self, f: F, a: f64, b: f64) -> Result<f64>
    where
        F: FnMut(f64) -> Result<f64>;
}

/// Levels computed before the convergence test is trusted. Coarse levels can
/// agree by accident on periodic integrands.
const MIN_LEVELS: usize = 4;

/// Romberg quadrature: repeated trapezoid halving with Richardson extrapolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Romberg {
    /// Maximum number of integrand evaluations.
    pub max_evaluations: usize,
    /// Convergence tolerance relative to the estimate.
    pub relative_tolerance: f64,
    /// Convergence tolerance floor for integrals close to zero.
    pub absolute_tolerance: f64,
}

impl Default for Romberg {
    fn default() -> Self {
        Self {
            max_evaluations: 1025,
            relative_tolerance: 1e-10,
            absolute_tolerance: 1e-12,
        }
    }
}

impl Romberg {
    /// Settings for integrands built from finite-difference derivatives,
    /// whose noise floor sits above the default relative tolerance.
    #[must_use]
    pub fn for_finite_differences() -> Self {
        Self {
            relative_tolerance: 1e-8,
            ..Self::default()
        }
    }
}

impl Integrator for Romberg {
    fn integrate<F>(&self, mut f: F, a: f64, b: f64) -> Result<f64>
    where
        F: FnMut(f64) -> Result<f64>,
    {
        #[allow(clippy::float_cmp)]
        if a == b {
            return Ok(0.0);
        }

        let mut h = b - a;
        let mut previous = vec![0.5 * h * (f(a)? + f(b)?)];
        let mut evaluations = 2;
        let mut new_points = 1_usize;

        for level in 1.. {
            if evaluations + new_points > self.max_evaluations {
                break;
            }
            h *= 0.5;
            let mut sum = 0.0;
            for i in 0..new_points {
                #[allow(clippy::cast_precision_loss)]
                let x = a + (2 * i + 1) as f64 * h;
                sum += f(x)?;
            }
            evaluations += new_points;
            new_points *= 2;

            let mut current = Vec::with_capacity(level + 1);
            current.push(0.5 * previous[0] + h * sum);
            let mut factor = 1.0;
            for j in 1..=level {
                factor *= 4.0;
                let refined = current[j - 1] + (current[j - 1] - previous[j - 1]) / (factor - 1.0);
                current.push(refined);
            }

            let estimate = current[level];
            if !estimate.is_finite() {
                return Err(ComputationError::NonFinite("romberg integration").into());
            }
            let change = (estimate - previous[level - 1]).abs();
            if level >= MIN_LEVELS
                && change <= self.absolute_tolerance.max(self.relative_tolerance * estimate.abs())
            {
                tracing::trace!(level, evaluations, estimate, "romberg converged");
                return Ok(estimate);
            }
            previous = current;
        }

        Err(ComputationError::IntegrationDidNotConverge {
            a,
            b,
            evaluations,
        }
        .into())
    }
}
