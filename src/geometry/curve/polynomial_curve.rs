use crate::error::{GeometryError, Result};
use crate::math::{Point2, Polynomial, Romberg, Vector2};

use super::{Curve, CurveDomain, ParameterMap};

/// A polynomial curve `(x(u), y(u))` for `u` in `[t0, t1]`.
///
/// The graph form `(u, p(u))` is built by [`PolynomialCurve::new`].
/// Derivatives are exact; lengths are integrated numerically.
#[derive(Debug, Clone)]
pub struct PolynomialCurve {
    x: [Polynomial; 4],
    y: [Polynomial; 4],
    map: ParameterMap,
    integrator: Romberg,
}

impl PolynomialCurve {
    /// Creates the graph `y = poly(x)` for `x` in `[t0, t1]`.
    ///
    /// # Errors
    ///
    /// Returns an error if `t0 > t1` or a bound is not finite.
    pub fn new(poly: Polynomial, t0: f64, t1: f64) -> Result<Self> {
        Self::parametric(Polynomial::identity(), poly, t0, t1)
    }

    /// Creates the parametric curve `(px(u), py(u))` for `u` in `[t0, t1]`.
    ///
    /// # Errors
    ///
    /// Returns an error if `t0 > t1` or a bound is not finite.
    pub fn parametric(px: Polynomial, py: Polynomial, t0: f64, t1: f64) -> Result<Self> {
        if px.coefficients().iter().chain(py.coefficients()).any(|c| !c.is_finite()) {
            return Err(
                GeometryError::Degenerate("polynomial coefficients must be finite".into()).into(),
            );
        }
        let map = ParameterMap::new(CurveDomain::new(t0, t1), t0, t1)?;
        Ok(Self {
            x: derivative_chain(px),
            y: derivative_chain(py),
            map,
            integrator: Romberg::default(),
        })
    }

    /// Replaces the quadrature used for lengths.
    #[must_use]
    pub fn with_integrator(mut self, integrator: Romberg) -> Self {
        self.integrator = integrator;
        self
    }

    /// The X polynomial.
    #[must_use]
    pub fn x(&self) -> &Polynomial {
        &self.x[0]
    }

    /// The Y polynomial.
    #[must_use]
    pub fn y(&self) -> &Polynomial {
        &self.y[0]
    }

    fn evaluate(&self, order: usize, t: f64) -> Vector2 {
        let u = self.map.to_internal(t);
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let factor = self.map.scale().powi(order as i32);
        Vector2::new(self.x[order].evaluate(u), self.y[order].evaluate(u)) * factor
    }
}

/// The polynomial followed by its first three derivatives.
fn derivative_chain(p: Polynomial) -> [Polynomial; 4] {
    let d1 = p.derivative();
    let d2 = d1.derivative();
    let d3 = d2.derivative();
    [p, d1, d2, d3]
}

impl Curve for PolynomialCurve {
    fn domain(&self) -> CurveDomain {
        self.map.domain()
    }

    fn set_domain(&mut self, t_min: f64, t_max: f64) -> Result<()> {
        self.map.set_domain(t_min, t_max)
    }

    fn position(&self, t: f64) -> Result<Point2> {
        Ok(Point2::from(self.evaluate(0, t)))
    }

    fn integrator(&self) -> Romberg {
        self.integrator
    }

    fn first_derivative(&self, t: f64) -> Result<Vector2> {
        Ok(self.evaluate(1, t))
    }

    fn second_derivative(&self, t: f64) -> Result<Vector2> {
        Ok(self.evaluate(2, t))
    }

    fn third_derivative(&self, t: f64) -> Result<Vector2> {
        Ok(self.evaluate(3, t))
    }
}
