use crate::error::{GeometryError, Result};
use crate::geometry::surface::FaceSurface;
use crate::math::intersect_3d::{line_plane_intersect, LinePlaneRelation};
use crate::math::{is_parallel, transform_direction, transform_point, Matrix4, Point3, Vector3, TOLERANCE};

use super::Curve;

/// An infinite line defined by an origin point and a unit direction.
///
/// The parametric form is `P(t) = origin + t * direction`, so `t` is arc length.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    origin: Point3,
    direction: Vector3,
}

impl Line {
    /// Creates a new line from an origin and direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vector is zero-length.
    pub fn new(origin: Point3, direction: Vector3) -> Result<Self> {
        let len = direction.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            origin,
            direction: direction / len,
        })
    }

    /// Creates a line through two distinct points, directed from `a` to `b`.
    ///
    /// # Errors
    ///
    /// Returns an error if the points coincide.
    pub fn through(a: &Point3, b: &Point3) -> Result<Self> {
        Self::new(*a, b - a)
    }

    /// Builds a line from an already normalized direction.
    pub(crate) fn from_unit(origin: Point3, direction: Vector3) -> Self {
        Self { origin, direction }
    }

    /// Returns the origin point of the line.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the unit direction vector of the line.
    #[must_use]
    pub fn direction(&self) -> &Vector3 {
        &self.direction
    }

    /// Parameter of the orthogonal projection of `point` onto the line.
    #[must_use]
    pub fn project(&self, point: &Point3) -> f64 {
        (point - self.origin).dot(&self.direction)
    }

    /// Distance from `point` to the line.
    #[must_use]
    pub fn distance_to(&self, point: &Point3) -> f64 {
        (point - self.at(self.project(point))).norm()
    }

    /// Returns `true` if both lines describe the same point set.
    #[must_use]
    pub fn colinear_to(&self, other: &Line) -> bool {
        is_parallel(&self.direction, &other.direction) && self.distance_to(&other.origin) < TOLERANCE
    }

    /// Same point set, opposite parametrization.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::from_unit(self.origin, -self.direction)
    }

    /// Applies an affine transform.
    ///
    /// # Errors
    ///
    /// Returns an error if the matrix collapses the direction.
    pub fn transform(&self, matrix: &Matrix4) -> Result<Self> {
        Self::new(
            transform_point(matrix, &self.origin),
            transform_direction(matrix, &self.direction),
        )
    }
}

impl Curve for Line {
    fn at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }

    fn tangent_at(&self, _t: f64) -> Vector3 {
        self.direction
    }

    fn point_parameter(&self, point: &Point3) -> Result<f64> {
        let t = self.project(point);
        if (point - self.at(t)).norm() > TOLERANCE {
            return Err(GeometryError::NotOnCurve {
                x: point.x,
                y: point.y,
                z: point.z,
            }
            .into());
        }
        Ok(t)
    }

    fn ts_with_surface(&self, surface: &FaceSurface) -> Vec<f64> {
        match surface {
            FaceSurface::Plane(plane) => {
                match line_plane_intersect(&self.origin, &self.direction, plane) {
                    LinePlaneRelation::Point { t, .. } => vec![t],
                    LinePlaneRelation::Parallel | LinePlaneRelation::OnPlane => Vec::new(),
                }
            }
            FaceSurface::Cylinder(cylinder) => cylinder.line_parameters(self),
        }
    }
}
