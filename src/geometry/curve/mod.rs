mod line;

pub use line::Line;

use crate::error::Result;
use crate::geometry::surface::FaceSurface;
use crate::math::{Point3, Vector3};

/// Trait for curves in 3D space.
pub trait Curve {
    /// Evaluates the curve at parameter `t`.
    fn at(&self, t: f64) -> Point3;

    /// Unit tangent at parameter `t`, in the direction of increasing `t`.
    fn tangent_at(&self, t: f64) -> Vector3;

    /// Inverts [`Curve::at`] for a point on the curve.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NotOnCurve`](crate::error::GeometryError::NotOnCurve)
    /// if the point is farther than the tolerance from the curve.
    fn point_parameter(&self, point: &Point3) -> Result<f64>;

    /// Parameters at which the curve crosses `surface`.
    ///
    /// Empty when the curve misses the surface or lies in it.
    fn ts_with_surface(&self, surface: &FaceSurface) -> Vec<f64>;
}
