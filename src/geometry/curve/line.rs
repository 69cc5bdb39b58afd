use crate::error::Result;
use crate::math::{BoundingBox2, Point2, Vector2};

use super::{Curve, CurveDomain, ParameterMap};

/// A straight segment from `start` to `end`.
///
/// Internally parameterized by the distance from `start`, so the default
/// domain is `[0, |end - start|]` and the speed is 1. Coincident endpoints
/// give a single-point curve with domain `[0, 0]`.
#[derive(Debug, Clone)]
pub struct Line {
    start: Point2,
    end: Point2,
    direction: Vector2,
    map: ParameterMap,
}

impl Line {
    /// Creates a new segment.
    ///
    /// # Errors
    ///
    /// Returns an error if an endpoint is not finite.
    pub fn new(start: Point2, end: Point2) -> Result<Self> {
        let chord = end - start;
        let len = chord.norm();
        let direction = if len > 0.0 { chord / len } else { Vector2::zeros() };
        let map = ParameterMap::new(CurveDomain::new(0.0, len), 0.0, len)?;
        Ok(Self {
            start,
            end,
            direction,
            map,
        })
    }

    /// Returns the start point.
    #[must_use]
    pub fn start(&self) -> &Point2 {
        &self.start
    }

    /// Returns the end point.
    #[must_use]
    pub fn end(&self) -> &Point2 {
        &self.end
    }

    /// Returns the unit direction, or zero for a single-point segment.
    #[must_use]
    pub fn direction(&self) -> &Vector2 {
        &self.direction
    }
}

impl Curve for Line {
    fn domain(&self) -> CurveDomain {
        self.map.domain()
    }

    fn set_domain(&mut self, t_min: f64, t_max: f64) -> Result<()> {
        self.map.set_domain(t_min, t_max)
    }

    fn position(&self, t: f64) -> Result<Point2> {
        Ok(self.start + self.direction * self.map.to_internal(t))
    }

    fn first_derivative(&self, _t: f64) -> Result<Vector2> {
        Ok(self.direction * self.map.scale())
    }

    fn second_derivative(&self, _t: f64) -> Result<Vector2> {
        Ok(Vector2::zeros())
    }

    fn third_derivative(&self, _t: f64) -> Result<Vector2> {
        Ok(Vector2::zeros())
    }

    fn curvature(&self, _t: f64) -> Result<f64> {
        Ok(0.0)
    }

    fn length(&self, t0: f64, t1: f64) -> Result<f64> {
        let (a, b) = self.domain().clamp_span(t0, t1);
        Ok((b - a) * self.map.scale().abs())
    }

    fn bounding_box(&self) -> Result<BoundingBox2> {
        let mut bbox = BoundingBox2::from_point(self.start);
        bbox.include(&self.end);
        Ok(bbox)
    }
}
