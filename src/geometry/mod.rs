pub mod curve;

pub use curve::{
    CircleArc, ClothoidArc, Curve, CurveDomain, DisplacedCurve, Line, MultiCurve, PolynomialCurve,
};
