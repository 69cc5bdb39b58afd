#![allow(clippy::unwrap_used)]

use std::f64::consts::{FRAC_PI_2, PI};

use approx::assert_abs_diff_eq;
use geocurve::math::{Point2, Polynomial};
use geocurve::operations::query::ParameterAtLength;
use geocurve::{CircleArc, ClothoidArc, Curve, DisplacedCurve, Line, MultiCurve, PolynomialCurve};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let env_filter = EnvFilter::from_default_env().add_directive(LevelFilter::WARN.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .try_init();
}

fn sample_curves() -> Vec<(&'static str, Box<dyn Curve>)> {
    let line = Line::new(Point2::new(-1.0, 2.0), Point2::new(4.0, -3.0)).unwrap();
    let arc = CircleArc::new(Point2::new(1.0, 1.0), 2.5, 0.3, 2.4).unwrap();
    let clothoid =
        ClothoidArc::new(Point2::new(0.0, 0.0), Point2::new(10.0, 2.0), f64::INFINITY, 20.0)
            .unwrap();
    let cubic = PolynomialCurve::new(Polynomial::new(vec![1.0, -0.5, 0.0, 0.25]), -1.0, 2.0)
        .unwrap();
    let displaced = DisplacedCurve::new(
        Box::new(CircleArc::new(Point2::origin(), 3.0, 0.0, PI).unwrap()),
        -0.5,
    )
    .unwrap();
    // Offsets of curves whose speed varies, so lengths come from integrated
    // finite differences of a non-constant integrand.
    let displaced_cubic = DisplacedCurve::new(
        Box::new(
            PolynomialCurve::new(Polynomial::new(vec![1.0, -0.5, 0.0, 0.25]), -1.0, 2.0).unwrap(),
        ),
        0.3,
    )
    .unwrap();
    let mut stretched = ClothoidArc::new(
        Point2::new(0.0, 0.0),
        Point2::new(10.0, 2.0),
        f64::INFINITY,
        20.0,
    )
    .unwrap();
    stretched.set_domain(0.0, 1.0).unwrap();
    let displaced_clothoid = DisplacedCurve::new(Box::new(stretched), 0.5).unwrap();
    let joint = Point2::new(10.0, 2.0);
    let composed = MultiCurve::new(vec![
        Box::new(Line::new(Point2::new(-5.0, 0.0), Point2::new(0.0, 0.0)).unwrap()),
        Box::new(
            ClothoidArc::new(Point2::new(0.0, 0.0), joint, f64::INFINITY, 20.0).unwrap(),
        ),
        Box::new(
            CircleArc::through_points(joint, Point2::new(14.0, 5.0), Point2::new(16.0, 9.0))
                .unwrap(),
        ),
    ])
    .unwrap();

    vec![
        ("line", Box::new(line) as Box<dyn Curve>),
        ("arc", Box::new(arc) as Box<dyn Curve>),
        ("clothoid", Box::new(clothoid) as Box<dyn Curve>),
        ("cubic", Box::new(cubic) as Box<dyn Curve>),
        ("displaced", Box::new(displaced) as Box<dyn Curve>),
        ("displaced cubic", Box::new(displaced_cubic) as Box<dyn Curve>),
        ("displaced clothoid", Box::new(displaced_clothoid) as Box<dyn Curve>),
        ("composed", Box::new(composed) as Box<dyn Curve>),
    ]
}

#[test]
fn length_is_monotone_in_t() {
    init_tracing();
    for (name, curve) in sample_curves() {
        let d = curve.domain();
        let mut previous = 0.0;
        for i in 0..=20 {
            let t = d.lerp(f64::from(i) / 20.0);
            let length = curve.length(d.t_min, t).unwrap();
            assert!(length >= previous - 1e-9, "{name}: length decreased at t = {t}");
            previous = length;
        }
        assert_abs_diff_eq!(previous, curve.total_length().unwrap(), epsilon = 1e-9);
    }
}

#[test]
fn inversion_round_trips() {
    init_tracing();
    for (name, curve) in sample_curves() {
        let d = curve.domain();
        let total = curve.total_length().unwrap();
        for i in 0..=10 {
            let target = total * f64::from(i) / 10.0;
            let t = curve.parameter_at_length(target).unwrap();
            assert!(t >= d.t_min && t <= d.t_max, "{name}: {t} outside domain");
            let achieved = curve.length(d.t_min, t).unwrap();
            assert!(
                (achieved - target).abs() < 1e-6,
                "{name}: wanted {target}, got {achieved}"
            );
        }
    }
}

#[test]
fn lengths_are_additive() {
    init_tracing();
    for (name, curve) in sample_curves() {
        let d = curve.domain();
        let (a, b, c) = (d.lerp(0.1), d.lerp(0.55), d.lerp(0.9));
        let split = curve.length(a, b).unwrap() + curve.length(b, c).unwrap();
        let whole = curve.length(a, c).unwrap();
        assert!((split - whole).abs() < 1e-7, "{name}: {split} != {whole}");
    }
}

#[test]
fn reparameterization_preserves_shape_and_length() {
    init_tracing();
    let originals = sample_curves();
    for ((name, original), (_, mut moved)) in originals.into_iter().zip(sample_curves()) {
        moved.set_domain(3.0, 5.0).unwrap();
        let d = moved.domain();
        assert_abs_diff_eq!(d.t_min, 3.0);
        assert_abs_diff_eq!(d.t_max, 5.0);
        assert!(
            (moved.total_length().unwrap() - original.total_length().unwrap()).abs() < 1e-7,
            "{name}: length changed"
        );
        let start = moved.start_point().unwrap() - original.start_point().unwrap();
        let end = moved.end_point().unwrap() - original.end_point().unwrap();
        assert!(start.norm() < 1e-9 && end.norm() < 1e-9, "{name}: shape changed");
    }
}

#[test]
fn bounding_boxes_contain_samples() {
    for (name, curve) in sample_curves() {
        let bbox = curve.bounding_box().unwrap();
        let d = curve.domain();
        for i in 0..=16 {
            let p = curve.position(d.lerp(f64::from(i) / 16.0)).unwrap();
            // Sampled boxes may undershoot between their own samples.
            assert!(bbox.contains(&p, 1e-3), "{name}: {p} outside bounding box");
        }
    }
}

#[test]
fn multi_curve_lookup_picks_owning_segment() {
    let curve = MultiCurve::new(vec![
        Box::new(Line::new(Point2::new(0.0, 0.0), Point2::new(3.0, 0.0)).unwrap()),
        Box::new(CircleArc::new(Point2::new(3.0, 1.0), 1.0, -FRAC_PI_2, 0.0).unwrap()),
        Box::new(Line::new(Point2::new(4.0, 1.0), Point2::new(4.0, 5.0)).unwrap()),
    ])
    .unwrap();
    for i in 0..curve.segment_count() {
        let d = curve.segment_domain(i).unwrap();
        assert_eq!(curve.find_index(d.lerp(0.5)).0, i);
        assert_eq!(curve.find_index(d.t_min).0, i);
        let mid = d.lerp(0.5);
        let segment = curve.segment(i).unwrap();
        assert_eq!(curve.position(mid).unwrap(), segment.position(mid).unwrap());
    }
    // Boundaries belong to the later segment, positions agree either way.
    let joint = curve.segment_domain(1).unwrap().t_min;
    let before = curve.segment(0).unwrap().position(joint).unwrap();
    assert_abs_diff_eq!((curve.position(joint).unwrap() - before).norm(), 0.0, epsilon = 1e-12);

    let expected = 3.0 + FRAC_PI_2 + 4.0;
    assert_abs_diff_eq!(curve.total_length().unwrap(), expected, epsilon = 1e-12);
    let lengths: f64 = (0..3).map(|i| curve.segment_length(i).unwrap().unwrap()).sum();
    assert_abs_diff_eq!(lengths, expected, epsilon = 1e-12);
}

#[test]
fn multi_curve_rescaling_keeps_segments_contiguous() {
    let p = Point2::new(1.0, 0.0);
    let mut curve = MultiCurve::new(vec![
        Box::new(Line::new(Point2::new(0.0, 0.0), Point2::new(0.1, 0.0)).unwrap()),
        Box::new(Line::new(Point2::new(0.1, 0.0), p).unwrap()),
        Box::new(Line::new(p, p).unwrap()),
    ])
    .unwrap();
    for i in 1..=40 {
        let t_max = 0.1 + 0.0137 * f64::from(i);
        curve.set_domain(0.1, t_max).unwrap();
        assert_abs_diff_eq!(curve.domain().t_max, t_max);
        let mut expected_start = 0.1;
        for index in 0..curve.segment_count() {
            let d = curve.segment_domain(index).unwrap();
            assert_eq!(d.t_min, expected_start);
            assert!(d.t_min <= d.t_max);
            expected_start = d.t_max;
        }
        assert_eq!(expected_start, t_max);
        assert_abs_diff_eq!(curve.total_length().unwrap(), 1.0, epsilon = 1e-12);
    }
}

#[test]
fn clothoid_meets_its_end_conditions() {
    let p0 = Point2::new(2.0, -1.0);
    let p1 = Point2::new(9.0, 4.0);
    for (r0, r1) in [(f64::INFINITY, 15.0), (-25.0, -9.0), (10.0, 35.0)] {
        let arc = ClothoidArc::new(p0, p1, r0, r1).unwrap();
        assert_abs_diff_eq!((arc.start_point().unwrap() - p0).norm(), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!((arc.end_point().unwrap() - p1).norm(), 0.0, epsilon = 1e-6);
        let d = arc.domain();
        assert_abs_diff_eq!(arc.curvature(d.t_min).unwrap(), 1.0 / r0, epsilon = 1e-9);
        assert_abs_diff_eq!(arc.curvature(d.t_max).unwrap(), 1.0 / r1, epsilon = 1e-9);
        // Curvature is linear in arc length.
        let mid = arc.curvature(d.lerp(0.5)).unwrap();
        assert_abs_diff_eq!(mid, 0.5 * (1.0 / r0 + 1.0 / r1), epsilon = 1e-9);
    }
}

#[test]
fn line_scenario() {
    let line = Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)).unwrap();
    assert_abs_diff_eq!(line.total_length().unwrap(), 10.0);
    let d = line.domain();
    let t = line.parameter_at_length(5.0).unwrap();
    assert_abs_diff_eq!(t, d.t_min + 0.5 * (d.t_max - d.t_min), epsilon = 1e-9);
    let p = line.position(t).unwrap();
    assert_abs_diff_eq!(p.x, 5.0, epsilon = 1e-9);
    assert_abs_diff_eq!(p.y, 0.0, epsilon = 1e-9);
}

#[test]
fn quarter_arc_scenario() {
    let arc = CircleArc::new(Point2::origin(), 1.0, 0.0, FRAC_PI_2).unwrap();
    assert_abs_diff_eq!(arc.total_length().unwrap(), FRAC_PI_2, epsilon = 1e-12);
    let end = arc.position(arc.domain().t_max).unwrap();
    assert_abs_diff_eq!(end.x, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(end.y, 1.0, epsilon = 1e-12);
}

#[test]
fn two_line_composition_scenario() {
    init_tracing();
    let curve = MultiCurve::new(vec![
        Box::new(Line::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)).unwrap()),
        Box::new(Line::new(Point2::new(1.0, 0.0), Point2::new(1.0, 1.0)).unwrap()),
    ])
    .unwrap();
    assert_abs_diff_eq!(curve.total_length().unwrap(), 2.0, epsilon = 1e-12);
    let inv = ParameterAtLength::new(1.5).execute(&curve).unwrap();
    assert!(inv.converged);
    let (index, _) = curve.find_index(inv.parameter);
    assert_eq!(index, 1);
    let p = curve.position(inv.parameter).unwrap();
    assert_abs_diff_eq!(p.x, 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(p.y, 0.5, epsilon = 1e-9);
}
