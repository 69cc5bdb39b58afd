pub mod bounding_box;
pub mod finite_difference;
pub mod fresnel;
pub mod integrate;
pub mod polynomial;
pub mod root;

pub use bounding_box::BoundingBox2;
pub use finite_difference::{FiniteDifference, StencilOrder};
pub use integrate::{Integrator, Romberg};
pub use polynomial::Polynomial;
pub use root::{Brent, RootSolver};

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 2D rigid transform (rotation followed by translation).
pub type Isometry2 = nalgebra::Isometry2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Rotates a vector by +90 degrees.
#[must_use]
pub fn perp(v: &Vector2) -> Vector2 {
    Vector2::new(-v.y, v.x)
}

/// 2D cross product (z-component of the 3D cross product).
#[must_use]
pub fn cross(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}
