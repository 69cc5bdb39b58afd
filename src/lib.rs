pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;

pub use error::{ComputationError, GeocurveError, GeometryError, Result};
pub use geometry::{
    CircleArc, ClothoidArc, Curve, CurveDomain, DisplacedCurve, Line, MultiCurve, PolynomialCurve,
};
