mod circle_arc;
mod clothoid;
mod displaced;
mod line;
mod multi_curve;
mod parameter_map;
mod polynomial_curve;

pub use circle_arc::CircleArc;
pub use clothoid::{ClothoidArc, MAX_NORMALIZED_LENGTH};
pub use displaced::DisplacedCurve;
pub use line::Line;
pub use multi_curve::MultiCurve;
pub use parameter_map::ParameterMap;
pub use polynomial_curve::PolynomialCurve;

use crate::error::{ComputationError, Result};
use crate::math::integrate::Integrator;
use crate::math::{cross, perp, BoundingBox2, FiniteDifference, Point2, Romberg, Vector2, TOLERANCE};
use crate::operations::query::ParameterAtLength;

/// Number of interior samples used by the default bounding box.
const BOUNDING_BOX_SAMPLES: u32 = 64;

/// Parameter domain for a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDomain {
    /// Start of the parameter range.
    pub t_min: f64,
    /// End of the parameter range.
    pub t_max: f64,
}

impl CurveDomain {
    /// Creates a new curve domain.
    #[must_use]
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }

    /// Width of the domain.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.t_max - self.t_min
    }

    /// Clamps `t` into the domain.
    #[must_use]
    pub fn clamp(&self, t: f64) -> f64 {
        t.clamp(self.t_min, self.t_max)
    }

    /// Clamps both ends into the domain and orders them.
    #[must_use]
    pub fn clamp_span(&self, t0: f64, t1: f64) -> (f64, f64) {
        let (a, b) = (self.clamp(t0), self.clamp(t1));
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Linear interpolation between `t_min` (at 0) and `t_max` (at 1).
    #[must_use]
    pub fn lerp(&self, ratio: f64) -> f64 {
        (1.0 - ratio) * self.t_min + ratio * self.t_max
    }
}

/// Trait for parametric curves in the plane.
///
/// Only [`domain`](Curve::domain), [`set_domain`](Curve::set_domain) and
/// [`position`](Curve::position) are required. Derivatives fall back to
/// central finite differences of the position and lengths to Romberg
/// integration of the speed; curve types with closed forms override them.
pub trait Curve: std::fmt::Debug + Send + Sync {
    /// Returns the parameter domain of the curve.
    fn domain(&self) -> CurveDomain;

    /// Re-parameterizes the curve onto `[t_min, t_max]` without changing its shape.
    ///
    /// # Errors
    ///
    /// Returns an error if `t_min > t_max`, or if `t_min == t_max` on a curve
    /// that is not a single point.
    fn set_domain(&mut self, t_min: f64, t_max: f64) -> Result<()>;

    /// Evaluates the curve at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve cannot be evaluated at `t`.
    fn position(&self, t: f64) -> Result<Point2>;

    /// Finite-difference settings used by the default derivative bodies.
    fn finite_difference(&self) -> FiniteDifference {
        FiniteDifference::default()
    }

    /// Quadrature used by the default [`length`](Curve::length).
    ///
    /// Tuned for speeds taken from the finite-difference defaults; curves
    /// with exact derivatives may tighten it.
    fn integrator(&self) -> Romberg {
        Romberg::for_finite_differences()
    }

    /// First derivative `dP/dt`.
    ///
    /// # Errors
    ///
    /// Propagates evaluation errors.
    fn first_derivative(&self, t: f64) -> Result<Vector2> {
        let d = self.domain();
        self.finite_difference()
            .derivative(|s| self.position(s), t, d.t_min, d.t_max, 1)
    }

    /// Second derivative `d²P/dt²`.
    ///
    /// # Errors
    ///
    /// Propagates evaluation errors.
    fn second_derivative(&self, t: f64) -> Result<Vector2> {
        let d = self.domain();
        self.finite_difference()
            .derivative(|s| self.position(s), t, d.t_min, d.t_max, 2)
    }

    /// Third derivative `d³P/dt³`.
    ///
    /// # Errors
    ///
    /// Propagates evaluation errors.
    fn third_derivative(&self, t: f64) -> Result<Vector2> {
        let d = self.domain();
        self.finite_difference()
            .derivative(|s| self.position(s), t, d.t_min, d.t_max, 3)
    }

    /// Speed `|dP/dt|`.
    ///
    /// # Errors
    ///
    /// Propagates evaluation errors.
    fn speed(&self, t: f64) -> Result<f64> {
        Ok(self.first_derivative(t)?.norm())
    }

    /// Signed curvature; positive when the curve turns left.
    ///
    /// Zero where the speed vanishes.
    ///
    /// # Errors
    ///
    /// Propagates evaluation errors.
    fn curvature(&self, t: f64) -> Result<f64> {
        let d1 = self.first_derivative(t)?;
        let speed = d1.norm();
        if speed < TOLERANCE {
            return Ok(0.0);
        }
        let d2 = self.second_derivative(t)?;
        Ok(cross(&d1, &d2) / speed.powi(3))
    }

    /// Unit tangent in the direction of increasing `t`.
    ///
    /// # Errors
    ///
    /// Returns [`ComputationError::ZeroVector`] where the speed vanishes.
    fn tangent(&self, t: f64) -> Result<Vector2> {
        let d1 = self.first_derivative(t)?;
        let speed = d1.norm();
        if speed < TOLERANCE {
            return Err(ComputationError::ZeroVector.into());
        }
        Ok(d1 / speed)
    }

    /// Unit tangent rotated by +90 degrees.
    ///
    /// # Errors
    ///
    /// Same as [`tangent`](Curve::tangent).
    fn left_normal(&self, t: f64) -> Result<Vector2> {
        Ok(perp(&self.tangent(t)?))
    }

    /// Arc length between `t0` and `t1`, both clamped into the domain.
    ///
    /// # Errors
    ///
    /// Propagates evaluation and integration errors.
    fn length(&self, t0: f64, t1: f64) -> Result<f64> {
        let (a, b) = self.domain().clamp_span(t0, t1);
        self.integrator().integrate(|t| self.speed(t), a, b)
    }

    /// Arc length over the whole domain.
    ///
    /// # Errors
    ///
    /// Propagates evaluation and integration errors.
    fn total_length(&self) -> Result<f64> {
        let d = self.domain();
        self.length(d.t_min, d.t_max)
    }

    /// Axis-aligned bounding box.
    ///
    /// The default samples the curve uniformly in `t`.
    ///
    /// # Errors
    ///
    /// Propagates evaluation errors.
    fn bounding_box(&self) -> Result<BoundingBox2> {
        let d = self.domain();
        let mut bbox = BoundingBox2::from_point(self.position(d.t_min)?);
        for i in 1..=BOUNDING_BOX_SAMPLES {
            let t = d.lerp(f64::from(i) / f64::from(BOUNDING_BOX_SAMPLES));
            bbox.include(&self.position(t)?);
        }
        Ok(bbox)
    }

    /// Parameter at which the arc length measured from `t_min` equals `length`.
    ///
    /// Best effort: see [`ParameterAtLength`] for the residual-reporting form.
    ///
    /// # Errors
    ///
    /// Propagates evaluation and integration errors.
    fn parameter_at_length(&self, length: f64) -> Result<f64> {
        Ok(ParameterAtLength::new(length).execute(self)?.parameter)
    }

    /// Position at the start of the domain.
    ///
    /// # Errors
    ///
    /// Propagates evaluation errors.
    fn start_point(&self) -> Result<Point2> {
        self.position(self.domain().t_min)
    }

    /// Position at the end of the domain.
    ///
    /// # Errors
    ///
    /// Propagates evaluation errors.
    fn end_point(&self) -> Result<Point2> {
        self.position(self.domain().t_max)
    }
}

impl<C: Curve + ?Sized> Curve for Box<C> {
    fn domain(&self) -> CurveDomain {
        (**self).domain()
    }

    fn set_domain(&mut self, t_min: f64, t_max: f64) -> Result<()> {
        (**self).set_domain(t_min, t_max)
    }

    fn position(&self, t: f64) -> Result<Point2> {
        (**self).position(t)
    }

    fn finite_difference(&self) -> FiniteDifference {
        (**self).finite_difference()
    }

    fn integrator(&self) -> Romberg {
        (**self).integrator()
    }

    fn first_derivative(&self, t: f64) -> Result<Vector2> {
        (**self).first_derivative(t)
    }

    fn second_derivative(&self, t: f64) -> Result<Vector2> {
        (**self).second_derivative(t)
    }

    fn third_derivative(&self, t: f64) -> Result<Vector2> {
        (**self).third_derivative(t)
    }

    fn speed(&self, t: f64) -> Result<f64> {
        (**self).speed(t)
    }

    fn curvature(&self, t: f64) -> Result<f64> {
        (**self).curvature(t)
    }

    fn tangent(&self, t: f64) -> Result<Vector2> {
        (**self).tangent(t)
    }

    fn left_normal(&self, t: f64) -> Result<Vector2> {
        (**self).left_normal(t)
    }

    fn length(&self, t0: f64, t1: f64) -> Result<f64> {
        (**self).length(t0, t1)
    }

    fn total_length(&self) -> Result<f64> {
        (**self).total_length()
    }

    fn bounding_box(&self) -> Result<BoundingBox2> {
        (**self).bounding_box()
    }

    fn parameter_at_length(&self, length: f64) -> Result<f64> {
        (**self).parameter_at_length(length)
    }
}
