use crate::error::{GeometryError, Result};
use crate::math::{FiniteDifference, Point2, Romberg};

use super::{Curve, CurveDomain};

/// A curve offset sideways from a base curve: `base(t) + distance · leftNormal(t)`.
///
/// Positive distances move to the left of the direction of travel. There is no
/// closed form for the derivatives, so they come from finite differences of
/// the position.
#[derive(Debug)]
pub struct DisplacedCurve {
    base: Box<dyn Curve>,
    distance: f64,
    finite_difference: FiniteDifference,
    integrator: Romberg,
}

impl DisplacedCurve {
    /// Creates a curve displaced from `base` by `distance`.
    ///
    /// # Errors
    ///
    /// Returns an error if `distance` is not finite.
    pub fn new(base: Box<dyn Curve>, distance: f64) -> Result<Self> {
        if !distance.is_finite() {
            return Err(GeometryError::Degenerate(format!(
                "displacement must be finite, got {distance}"
            ))
            .into());
        }
        Ok(Self {
            base,
            distance,
            finite_difference: FiniteDifference::default(),
            integrator: Romberg::for_finite_differences(),
        })
    }

    /// Replaces the finite-difference settings.
    #[must_use]
    pub fn with_finite_difference(mut self, finite_difference: FiniteDifference) -> Self {
        self.finite_difference = finite_difference;
        self
    }

    /// Replaces the quadrature used for lengths.
    #[must_use]
    pub fn with_integrator(mut self, integrator: Romberg) -> Self {
        self.integrator = integrator;
        self
    }

    /// The curve being displaced.
    #[must_use]
    pub fn base(&self) -> &dyn Curve {
        self.base.as_ref()
    }

    /// Signed displacement; positive is to the left of the base.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }
}

impl Curve for DisplacedCurve {
    fn domain(&self) -> CurveDomain {
        self.base.domain()
    }

    fn set_domain(&mut self, t_min: f64, t_max: f64) -> Result<()> {
        self.base.set_domain(t_min, t_max)
    }

    fn position(&self, t: f64) -> Result<Point2> {
        let p = self.base.position(t)?;
        if self.distance == 0.0 {
            return Ok(p);
        }
        Ok(p + self.base.left_normal(t)? * self.distance)
    }

    fn finite_difference(&self) -> FiniteDifference {
        self.finite_difference
    }

    fn integrator(&self) -> Romberg {
        self.integrator
    }
}
