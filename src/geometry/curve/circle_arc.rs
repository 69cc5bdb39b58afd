use std::f64::consts::{FRAC_PI_2, TAU};

use crate::error::{GeometryError, Result};
use crate::math::{cross, BoundingBox2, Point2, Vector2, TOLERANCE};

use super::{Curve, CurveDomain, ParameterMap};

/// A circular arc sweeping from `start_angle` to `end_angle` (radians).
///
/// `end_angle < start_angle` gives a clockwise arc. Internally parameterized
/// by the angle; the default domain is `[0, radius * |sweep|]`, i.e. by arc length.
#[derive(Debug, Clone)]
pub struct CircleArc {
    center: Point2,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
    map: ParameterMap,
}

impl CircleArc {
    /// Creates a new arc.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not positive or an input is not finite.
    pub fn new(center: Point2, radius: f64, start_angle: f64, end_angle: f64) -> Result<Self> {
        if !(radius.is_finite() && radius > TOLERANCE) {
            return Err(GeometryError::Degenerate(format!(
                "arc radius must be positive, got {radius}"
            ))
            .into());
        }
        if !center.coords.iter().all(|c| c.is_finite()) {
            return Err(GeometryError::Degenerate("arc center must be finite".into()).into());
        }
        let len = radius * (end_angle - start_angle).abs();
        let map = ParameterMap::new(CurveDomain::new(0.0, len), start_angle, end_angle)?;
        Ok(Self {
            center,
            radius,
            start_angle,
            end_angle,
            map,
        })
    }

    /// Creates the arc starting at `p0`, passing through `p1` and ending at `p2`.
    ///
    /// # Errors
    ///
    /// Returns an error if two points coincide or all three are collinear.
    pub fn through_points(p0: Point2, p1: Point2, p2: Point2) -> Result<Self> {
        let a = p1 - p0;
        let b = p2 - p0;
        let scale = a.norm().max(b.norm());
        if a.norm() < TOLERANCE || b.norm() < TOLERANCE || (p2 - p1).norm() < TOLERANCE {
            return Err(GeometryError::Degenerate("arc points coincide".into()).into());
        }
        let det = 2.0 * cross(&a, &b);
        if det.abs() < TOLERANCE * scale * scale {
            return Err(GeometryError::Degenerate("arc points are collinear".into()).into());
        }

        // Circumcenter relative to p0.
        let a2 = a.norm_squared();
        let b2 = b.norm_squared();
        let offset = Vector2::new(b.y * a2 - a.y * b2, a.x * b2 - b.x * a2) / det;
        let center = p0 + offset;
        let radius = offset.norm();

        let start_angle = (p0.y - center.y).atan2(p0.x - center.x);
        let end_raw = (p2.y - center.y).atan2(p2.x - center.x);
        let sweep = if det > 0.0 {
            (end_raw - start_angle).rem_euclid(TAU)
        } else {
            -(start_angle - end_raw).rem_euclid(TAU)
        };
        Self::new(center, radius, start_angle, start_angle + sweep)
    }

    /// Returns the center of the arc.
    #[must_use]
    pub fn center(&self) -> &Point2 {
        &self.center
    }

    /// Returns the radius of the arc.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Angle at the start of the arc.
    #[must_use]
    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    /// Angle at the end of the arc.
    #[must_use]
    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    /// Signed sweep angle; negative for clockwise arcs.
    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Whether the arc sweeps a full turn or more.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sweep().abs() >= TAU - TOLERANCE
    }
}

impl Curve for CircleArc {
    fn domain(&self) -> CurveDomain {
        self.map.domain()
    }

    fn set_domain(&mut self, t_min: f64, t_max: f64) -> Result<()> {
        self.map.set_domain(t_min, t_max)
    }

    fn position(&self, t: f64) -> Result<Point2> {
        let u = self.map.to_internal(t);
        Ok(self.center + Vector2::new(u.cos(), u.sin()) * self.radius)
    }

    fn first_derivative(&self, t: f64) -> Result<Vector2> {
        let u = self.map.to_internal(t);
        let k = self.map.scale() * self.radius;
        Ok(Vector2::new(-u.sin(), u.cos()) * k)
    }

    fn second_derivative(&self, t: f64) -> Result<Vector2> {
        let u = self.map.to_internal(t);
        let k = self.map.scale().powi(2) * self.radius;
        Ok(Vector2::new(-u.cos(), -u.sin()) * k)
    }

    fn third_derivative(&self, t: f64) -> Result<Vector2> {
        let u = self.map.to_internal(t);
        let k = self.map.scale().powi(3) * self.radius;
        Ok(Vector2::new(u.sin(), -u.cos()) * k)
    }

    fn curvature(&self, _t: f64) -> Result<f64> {
        let scale = self.map.scale();
        if scale == 0.0 {
            return Ok(0.0);
        }
        Ok(scale.signum() / self.radius)
    }

    fn length(&self, t0: f64, t1: f64) -> Result<f64> {
        let (a, b) = self.domain().clamp_span(t0, t1);
        Ok((b - a) * self.map.scale().abs() * self.radius)
    }

    fn bounding_box(&self) -> Result<BoundingBox2> {
        let d = self.domain();
        let mut bbox = BoundingBox2::from_point(self.position(d.t_min)?);
        bbox.include(&self.position(d.t_max)?);

        // Axis extremes at multiples of π/2 inside the swept range.
        let lo = self.start_angle.min(self.end_angle);
        let hi = self.start_angle.max(self.end_angle);
        // Five consecutive quarter turns cover every extreme of a full circle.
        let first = (lo / FRAC_PI_2).ceil();
        for quarter in 0..5_u8 {
            let angle = (first + f64::from(quarter)) * FRAC_PI_2;
            if angle > hi {
                break;
            }
            bbox.include(&(self.center + Vector2::new(angle.cos(), angle.sin()) * self.radius));
        }
        Ok(bbox)
    }
}
