use std::f64::consts::PI;

use nalgebra::UnitComplex;

use crate::error::{ComputationError, GeometryError, Result};
use crate::math::fresnel::fresnel;
use crate::math::{Brent, Isometry2, Point2, RootSolver, Vector2, TOLERANCE};

use super::{Curve, CurveDomain, ParameterMap};

/// Largest normalized arc length `l / A` accepted on the canonical clothoid:
/// `√(2π)`, a tangent turn of π away from the inflection point.
pub const MAX_NORMALIZED_LENGTH: f64 = 2.506_628_274_631_000_2;

/// Relative slack on the arc-length bound, absorbing rounding at the endpoints.
const OVERFLOW_SLACK: f64 = 1e-9;

/// Allowed end point mismatch of a fit, relative to the chord length.
const FIT_TOLERANCE: f64 = 1e-6;

/// A clothoid (Euler spiral) arc: curvature varies linearly with arc length.
///
/// The shape is a piece of the canonical clothoid
/// `P(l) = A√π · (C(l / A√π), S(l / A√π))`, optionally mirrored in Y, placed in
/// the world by a rigid transform. Internally parameterized by the canonical
/// arc length `l`; the default domain is `[0, |l1 - l0|]`.
///
/// # Algorithm
///
/// Fitting between two points with prescribed radii:
///
/// 1. Repair radius signs: an infinite radius takes the sign of the finite one.
/// 2. Canonical coordinates are `l = A² / |r|`. The arc is walked backwards
///    along `l` when curvature shrinks from `point0` to `point1`, and mirrored
///    in Y when that direction and the turn sign disagree.
/// 3. Solve `A²π·|ΔF|² - d² = 0` for `A` with a bracketing root solver.
/// 4. Align the canonical chord with the world chord.
#[derive(Debug, Clone)]
pub struct ClothoidArc {
    scale_parameter: f64,
    inverted: bool,
    transform: Isometry2,
    map: ParameterMap,
}

impl ClothoidArc {
    /// Fits a clothoid from `point0` to `point1` with signed radii `radius0`
    /// and `radius1` (positive turns left, infinite means zero curvature).
    ///
    /// # Errors
    ///
    /// - `GeometryError::Degenerate` for coincident points, a zero or NaN
    ///   radius, two infinite radii or two equal radii
    /// - `GeometryError::MismatchedRadii` for finite radii of opposite sign
    /// - `ComputationError::RootNotBracketed` when no clothoid within the
    ///   validated range joins the points
    pub fn new(point0: Point2, point1: Point2, radius0: f64, radius1: f64) -> Result<Self> {
        Self::fit_with(point0, point1, radius0, radius1, &Brent::default())
    }

    /// Same as [`ClothoidArc::new`] with an explicit root solver.
    ///
    /// # Errors
    ///
    /// See [`ClothoidArc::new`]; solver failures are propagated.
    pub fn fit_with<S: RootSolver>(
        point0: Point2,
        point1: Point2,
        radius0: f64,
        radius1: f64,
        solver: &S,
    ) -> Result<Self> {
        for r in [radius0, radius1] {
            if r.is_nan() || r == 0.0 {
                return Err(GeometryError::Degenerate(format!(
                    "clothoid radius must be non-zero, got {r}"
                ))
                .into());
            }
        }
        if !point0.coords.iter().chain(point1.coords.iter()).all(|c| c.is_finite()) {
            return Err(GeometryError::Degenerate("clothoid endpoints must be finite".into()).into());
        }
        let chord = point1 - point0;
        let distance = chord.norm();
        if distance < TOLERANCE {
            return Err(GeometryError::Degenerate("clothoid endpoints coincide".into()).into());
        }

        let (radius0, radius1) = repair_signs(radius0, radius1)?;
        if radius0.is_infinite() && radius1.is_infinite() {
            return Err(GeometryError::Degenerate(
                "both radii are infinite; the shape is a line".into(),
            )
            .into());
        }
        let k0 = 1.0 / radius0.abs();
        let k1 = 1.0 / radius1.abs();
        if (k0 - k1).abs() < TOLERANCE {
            return Err(GeometryError::Degenerate(
                "equal radii; the shape is a circular arc".into(),
            )
            .into());
        }

        let dominant = if radius0.abs() >= radius1.abs() {
            radius0
        } else {
            radius1
        };
        let backward = k0 > k1;
        let inverted = (dominant < 0.0) != backward;

        let sqrt_pi = PI.sqrt();
        let objective = |a: f64| {
            let (c0, s0) = fresnel(a * k0 / sqrt_pi);
            let (c1, s1) = fresnel(a * k1 / sqrt_pi);
            a * a * PI * ((c1 - c0).powi(2) + (s1 - s0).powi(2)) - distance * distance
        };
        let a_max = radius0.abs().min(radius1.abs()) * MAX_NORMALIZED_LENGTH;
        let a = solver.solve(objective, 0.0, a_max)?;

        let l0 = a * a * k0;
        let l1 = a * a * k1;
        let q0 = canonical_point(a, l0, inverted);
        let q1 = canonical_point(a, l1, inverted);
        let canonical_chord = q1 - q0;
        let angle = chord.y.atan2(chord.x) - canonical_chord.y.atan2(canonical_chord.x);
        let rotation = UnitComplex::new(angle);
        let translation = point0.coords - rotation * q0.coords;
        let transform = Isometry2::new(translation, angle);

        let miss = (transform * q1 - point1).norm();
        if miss > FIT_TOLERANCE * distance.max(1.0) {
            return Err(ComputationError::Solver(format!(
                "clothoid fit misses the end point by {miss}"
            ))
            .into());
        }

        let map = ParameterMap::new(CurveDomain::new(0.0, (l1 - l0).abs()), l0, l1)?;
        tracing::debug!(scale = a, l0, l1, inverted, "clothoid fitted");
        Ok(Self {
            scale_parameter: a,
            inverted,
            transform,
            map,
        })
    }

    /// Splits the arc at the interior parameter `t`.
    ///
    /// The halves share the clothoid and cover `[t_min, t]` and `[t, t_max]`.
    ///
    /// # Errors
    ///
    /// Returns an error if `t` is not strictly inside the domain.
    pub fn split(&self, t: f64) -> Result<(Self, Self)> {
        let d = self.domain();
        if !(t > d.t_min && t < d.t_max) {
            return Err(GeometryError::Degenerate(format!(
                "split parameter {t} is not inside [{}, {}]",
                d.t_min, d.t_max
            ))
            .into());
        }
        let l_mid = self.map.to_internal(t);
        let first = ParameterMap::new(CurveDomain::new(d.t_min, t), self.map.u_start(), l_mid)?;
        let second = ParameterMap::new(CurveDomain::new(t, d.t_max), l_mid, self.map.u_end())?;
        Ok((
            Self {
                map: first,
                ..self.clone()
            },
            Self {
                map: second,
                ..self.clone()
            },
        ))
    }

    /// The clothoid scale parameter `A` (curvature is `l / A²`).
    #[must_use]
    pub fn scale_parameter(&self) -> f64 {
        self.scale_parameter
    }

    /// Whether the canonical clothoid is mirrored in Y.
    #[must_use]
    pub fn inverted(&self) -> bool {
        self.inverted
    }

    /// Canonical arc-length coordinates of the start and end.
    #[must_use]
    pub fn canonical_range(&self) -> (f64, f64) {
        (self.map.u_start(), self.map.u_end())
    }

    /// Transform from the canonical frame to world coordinates.
    #[must_use]
    pub fn transform(&self) -> &Isometry2 {
        &self.transform
    }

    /// Largest canonical `|l|` that may be evaluated.
    #[must_use]
    pub fn max_length(&self) -> f64 {
        self.scale_parameter * MAX_NORMALIZED_LENGTH
    }

    /// Signed radius at `t`; infinite where the curvature is zero.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ArcLengthOverflow` outside the validated range.
    pub fn radius(&self, t: f64) -> Result<f64> {
        let curvature = self.curvature(t)?;
        if curvature == 0.0 {
            return Ok(f64::INFINITY);
        }
        Ok(1.0 / curvature)
    }

    /// Signed radius at the start.
    ///
    /// # Errors
    ///
    /// See [`ClothoidArc::radius`].
    pub fn start_radius(&self) -> Result<f64> {
        self.radius(self.domain().t_min)
    }

    /// Signed radius at the end.
    ///
    /// # Errors
    ///
    /// See [`ClothoidArc::radius`].
    pub fn end_radius(&self) -> Result<f64> {
        self.radius(self.domain().t_max)
    }

    /// Canonical coordinate at `t`, checked against the validated range.
    fn canonical_length(&self, t: f64) -> Result<f64> {
        let l = self.map.to_internal(t);
        let max = self.max_length();
        if !l.is_finite() || l.abs() > max * (1.0 + OVERFLOW_SLACK) {
            return Err(GeometryError::ArcLengthOverflow { length: l, max }.into());
        }
        Ok(l)
    }

    /// Maps a canonical-frame derivative into the world, applying the chain rule.
    fn world_derivative(&self, canonical: Vector2, order: i32) -> Vector2 {
        let mirrored = if self.inverted {
            Vector2::new(canonical.x, -canonical.y)
        } else {
            canonical
        };
        self.transform.rotation * (mirrored * self.map.scale().powi(order))
    }
}

/// Point on the canonical clothoid at arc length `l`.
fn canonical_point(a: f64, l: f64, inverted: bool) -> Point2 {
    let k = a * PI.sqrt();
    let (c, s) = fresnel(l / k);
    let y = if inverted { -k * s } else { k * s };
    Point2::new(k * c, y)
}

/// Gives an infinite radius the sign of the finite one.
fn repair_signs(radius0: f64, radius1: f64) -> Result<(f64, f64)> {
    if radius0.signum() == radius1.signum() {
        return Ok((radius0, radius1));
    }
    match (radius0.is_infinite(), radius1.is_infinite()) {
        (true, false) => Ok((radius0.abs() * radius1.signum(), radius1)),
        (false, true) => Ok((radius0, radius1.abs() * radius0.signum())),
        (true, true) => Ok((radius0.abs(), radius1.abs())),
        (false, false) => Err(GeometryError::MismatchedRadii { radius0, radius1 }.into()),
    }
}

impl Curve for ClothoidArc {
    fn domain(&self) -> CurveDomain {
        self.map.domain()
    }

    fn set_domain(&mut self, t_min: f64, t_max: f64) -> Result<()> {
        self.map.set_domain(t_min, t_max)
    }

    fn position(&self, t: f64) -> Result<Point2> {
        let l = self.canonical_length(t)?;
        Ok(self.transform * canonical_point(self.scale_parameter, l, self.inverted))
    }

    fn first_derivative(&self, t: f64) -> Result<Vector2> {
        let l = self.canonical_length(t)?;
        let theta = l * l / (2.0 * self.scale_parameter.powi(2));
        Ok(self.world_derivative(Vector2::new(theta.cos(), theta.sin()), 1))
    }

    fn second_derivative(&self, t: f64) -> Result<Vector2> {
        let l = self.canonical_length(t)?;
        let a2 = self.scale_parameter.powi(2);
        let theta = l * l / (2.0 * a2);
        let k = l / a2;
        Ok(self.world_derivative(Vector2::new(-theta.sin(), theta.cos()) * k, 2))
    }

    fn third_derivative(&self, t: f64) -> Result<Vector2> {
        let l = self.canonical_length(t)?;
        let a2 = self.scale_parameter.powi(2);
        let theta = l * l / (2.0 * a2);
        let k = l / a2;
        let (sin, cos) = theta.sin_cos();
        let d3 = Vector2::new(-sin, cos) / a2 - Vector2::new(cos, sin) * (k * k);
        Ok(self.world_derivative(d3, 3))
    }

    fn curvature(&self, t: f64) -> Result<f64> {
        let l = self.canonical_length(t)?;
        let scale = self.map.scale();
        if scale == 0.0 {
            return Ok(0.0);
        }
        let mirror = if self.inverted { -1.0 } else { 1.0 };
        Ok(scale.signum() * mirror * l / self.scale_parameter.powi(2))
    }

    fn length(&self, t0: f64, t1: f64) -> Result<f64> {
        let (a, b) = self.domain().clamp_span(t0, t1);
        Ok((b - a) * self.map.scale().abs())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::GeocurveError;
    use approx::assert_abs_diff_eq;

    fn assert_endpoints(arc: &ClothoidArc, p0: Point2, p1: Point2) {
        let start = arc.start_point().unwrap();
        let end = arc.end_point().unwrap();
        assert_abs_diff_eq!(start.x, p0.x, epsilon = 1e-6);
        assert_abs_diff_eq!(start.y, p0.y, epsilon = 1e-6);
        assert_abs_diff_eq!(end.x, p1.x, epsilon = 1e-6);
        assert_abs_diff_eq!(end.y, p1.y, epsilon = 1e-6);
    }

    #[test]
    fn fit_from_straight_to_left_turn() {
        let p0 = Point2::new(0.0, 0.0);
        let p1 = Point2::new(10.0, 2.0);
        let arc = ClothoidArc::new(p0, p1, f64::INFINITY, 20.0).unwrap();
        assert_endpoints(&arc, p0, p1);
        assert!(!arc.inverted());
        let d = arc.domain();
        assert_abs_diff_eq!(arc.curvature(d.t_min).unwrap(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(arc.curvature(d.t_max).unwrap(), 1.0 / 20.0, epsilon = 1e-9);
        assert!(arc.start_radius().unwrap().is_infinite());
        assert_abs_diff_eq!(arc.end_radius().unwrap(), 20.0, epsilon = 1e-6);
        // Arc-length parameterized by default.
        assert_abs_diff_eq!(arc.speed(0.5 * d.t_max).unwrap(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(arc.total_length().unwrap(), d.t_max, epsilon = 1e-12);
    }

    #[test]
    fn fit_with_shrinking_right_turn() {
        let p0 = Point2::new(5.0, 5.0);
        let p1 = Point2::new(-3.0, 9.0);
        let arc = ClothoidArc::new(p0, p1, -8.0, -30.0).unwrap();
        assert_endpoints(&arc, p0, p1);
        let d = arc.domain();
        assert_abs_diff_eq!(arc.curvature(d.t_min).unwrap(), -1.0 / 8.0, epsilon = 1e-9);
        assert_abs_diff_eq!(arc.curvature(d.t_max).unwrap(), -1.0 / 30.0, epsilon = 1e-9);
    }

    #[test]
    fn fit_with_growing_right_turn_and_decreasing_left_turn() {
        let p0 = Point2::new(0.0, 0.0);
        let p1 = Point2::new(6.0, 0.0);
        for (r0, r1) in [(-40.0, -10.0), (10.0, f64::INFINITY), (12.0, 50.0)] {
            let arc = ClothoidArc::new(p0, p1, r0, r1).unwrap();
            assert_endpoints(&arc, p0, p1);
            let d = arc.domain();
            assert_abs_diff_eq!(arc.curvature(d.t_min).unwrap(), 1.0 / r0, epsilon = 1e-9);
            assert_abs_diff_eq!(arc.curvature(d.t_max).unwrap(), 1.0 / r1, epsilon = 1e-9);
        }
    }

    #[test]
    fn infinite_radius_takes_sign_of_finite_one() {
        let p0 = Point2::new(0.0, 0.0);
        let p1 = Point2::new(4.0, -1.0);
        let arc = ClothoidArc::new(p0, p1, f64::NEG_INFINITY, 15.0).unwrap();
        assert_endpoints(&arc, p0, p1);
        assert_abs_diff_eq!(
            arc.curvature(arc.domain().t_max).unwrap(),
            1.0 / 15.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn derivatives_match_finite_differences() {
        let arc = ClothoidArc::new(Point2::new(1.0, 2.0), Point2::new(7.0, 5.0), 30.0, 6.0).unwrap();
        let d = arc.domain();
        let t = d.lerp(0.4);
        let fd = arc.finite_difference();
        for order in 1..=3_u8 {
            let approx = fd
                .derivative(|s| arc.position(s), t, d.t_min, d.t_max, order)
                .unwrap();
            let exact = match order {
                1 => arc.first_derivative(t).unwrap(),
                2 => arc.second_derivative(t).unwrap(),
                _ => arc.third_derivative(t).unwrap(),
            };
            assert_abs_diff_eq!(approx.x, exact.x, epsilon = 1e-4);
            assert_abs_diff_eq!(approx.y, exact.y, epsilon = 1e-4);
        }
        // Closed-form curvature agrees with the generic formula.
        let d1 = arc.first_derivative(t).unwrap();
        let d2 = arc.second_derivative(t).unwrap();
        let generic = crate::math::cross(&d1, &d2) / d1.norm().powi(3);
        assert_abs_diff_eq!(arc.curvature(t).unwrap(), generic, epsilon = 1e-12);
    }

    #[test]
    fn split_preserves_shape() {
        let arc = ClothoidArc::new(Point2::new(0.0, 0.0), Point2::new(8.0, 3.0), 40.0, 9.0).unwrap();
        let d = arc.domain();
        let t = d.lerp(0.3);
        let (first, second) = arc.split(t).unwrap();
        assert_abs_diff_eq!(first.domain().t_max, t);
        assert_abs_diff_eq!(second.domain().t_min, t);
        let joint = arc.position(t).unwrap();
        assert_abs_diff_eq!((first.end_point().unwrap() - joint).norm(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!((second.start_point().unwrap() - joint).norm(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            first.total_length().unwrap() + second.total_length().unwrap(),
            arc.total_length().unwrap(),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            second.end_radius().unwrap(),
            arc.end_radius().unwrap(),
            epsilon = 1e-9
        );
        assert!(arc.split(d.t_min).is_err());
        assert!(arc.split(d.t_max + 1.0).is_err());
    }

    #[test]
    fn invalid_inputs_fail_fast() {
        let p0 = Point2::new(0.0, 0.0);
        let p1 = Point2::new(5.0, 0.0);
        let is_degenerate =
            |e: GeocurveError| matches!(e, GeocurveError::Geometry(GeometryError::Degenerate(_)));
        assert!(is_degenerate(ClothoidArc::new(p0, p1, 0.0, 10.0).unwrap_err()));
        assert!(is_degenerate(ClothoidArc::new(p0, p0, 5.0, 10.0).unwrap_err()));
        assert!(is_degenerate(
            ClothoidArc::new(p0, p1, f64::INFINITY, f64::NEG_INFINITY).unwrap_err()
        ));
        assert!(is_degenerate(ClothoidArc::new(p0, p1, 7.0, 7.0).unwrap_err()));
        assert!(matches!(
            ClothoidArc::new(p0, p1, 5.0, -6.0).unwrap_err(),
            GeocurveError::Geometry(GeometryError::MismatchedRadii { .. })
        ));
    }

    #[test]
    fn unreachable_endpoint_is_not_bracketed() {
        let err = ClothoidArc::new(Point2::new(0.0, 0.0), Point2::new(100.0, 0.0), 1.0, 2.0)
            .unwrap_err();
        assert!(matches!(
            err,
            GeocurveError::Computation(ComputationError::RootNotBracketed { .. })
        ));
    }

    #[test]
    fn evaluation_beyond_validated_range_overflows() {
        let arc = ClothoidArc::new(Point2::new(0.0, 0.0), Point2::new(5.0, 1.0), 50.0, 10.0).unwrap();
        let far = arc.domain().t_max + 10.0 * arc.max_length();
        let err = arc.position(far).unwrap_err();
        assert!(matches!(
            err,
            GeocurveError::Geometry(GeometryError::ArcLengthOverflow { .. })
        ));
        assert!(arc.first_derivative(far).is_err());
    }
}
