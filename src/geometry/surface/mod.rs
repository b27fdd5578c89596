mod cylinder;
mod plane;

pub use cylinder::Cylinder;
pub use plane::Plane;

pub use crate::math::polygon_3d::Containment;

use crate::error::{BooleanError, Result};
use crate::geometry::curve::Line;
use crate::math::intersect_3d::{plane_plane_intersect, PlanePairRelation};
use crate::math::{Matrix4, Point3, Vector3};

/// Capability shared by every surface a face can lie on.
///
/// Loops are passed as the ordered start points of their (straight) edges.
pub trait Surface: Sized {
    /// Short name used in diagnostics and capability errors.
    fn kind_name(&self) -> &'static str;

    /// Oriented unit normal at a point on the surface.
    fn normal_at(&self, point: &Point3) -> Vector3;

    /// Returns `true` if the point lies on the surface.
    fn contains_point(&self, point: &Point3) -> bool;

    /// Same point set, either orientation.
    fn is_coplanar_to(&self, other: &FaceSurface) -> bool;

    /// Same point set with the normal reversed.
    #[must_use]
    fn flipped(&self) -> Self;

    /// Applies an affine transform.
    ///
    /// # Errors
    ///
    /// Returns an error if the transform degenerates the surface.
    fn transform(&self, matrix: &Matrix4) -> Result<Self>;

    /// Classifies `point` (on the surface) against a closed loop on the surface.
    fn loop_contains_point(&self, loop_points: &[Point3], point: &Point3) -> Containment;

    /// Returns `true` if the loop winds counterclockwise around the normal.
    fn edge_loop_ccw(&self, loop_points: &[Point3]) -> bool;
}

/// The surface of a face.
///
/// Intersection curves are dispatched on the pair of kinds here, so
/// the Boolean engine never inspects the concrete kind itself.
#[derive(Debug, Clone, PartialEq)]
pub enum FaceSurface {
    Plane(Plane),
    Cylinder(Cylinder),
}

impl FaceSurface {
    /// The plane, if this is a planar surface.
    #[must_use]
    pub fn as_plane(&self) -> Option<&Plane> {
        match self {
            Self::Plane(plane) => Some(plane),
            Self::Cylinder(_) => None,
        }
    }

    /// Curves along which this surface meets `other`.
    ///
    /// Empty when the surfaces are disjoint or coincident.
    ///
    /// # Errors
    ///
    /// Returns [`BooleanError::UnsupportedSurfacePair`] when no routine
    /// exists for the two kinds.
    pub fn intersection_curves(&self, other: &FaceSurface) -> Result<Vec<Line>> {
        match (self, other) {
            (Self::Plane(a), Self::Plane(b)) => Ok(match plane_plane_intersect(a, b) {
                PlanePairRelation::Crossing(line) => vec![line],
                PlanePairRelation::Parallel { .. } | PlanePairRelation::Coincident => Vec::new(),
            }),
            _ => Err(BooleanError::UnsupportedSurfacePair {
                first: self.kind_name(),
                second: other.kind_name(),
            }
            .into()),
        }
    }
}

impl Surface for FaceSurface {
    fn kind_name(&self) -> &'static str {
        match self {
            Self::Plane(s) => s.kind_name(),
            Self::Cylinder(s) => s.kind_name(),
        }
    }

    fn normal_at(&self, point: &Point3) -> Vector3 {
        match self {
            Self::Plane(s) => s.normal_at(point),
            Self::Cylinder(s) => s.normal_at(point),
        }
    }

    fn contains_point(&self, point: &Point3) -> bool {
        match self {
            Self::Plane(s) => s.contains_point(point),
            Self::Cylinder(s) => s.contains_point(point),
        }
    }

    fn is_coplanar_to(&self, other: &FaceSurface) -> bool {
        match self {
            Self::Plane(s) => s.is_coplanar_to(other),
            Self::Cylinder(s) => s.is_coplanar_to(other),
        }
    }

    fn flipped(&self) -> Self {
        match self {
            Self::Plane(s) => Self::Plane(s.flipped()),
            Self::Cylinder(s) => Self::Cylinder(s.flipped()),
        }
    }

    fn transform(&self, matrix: &Matrix4) -> Result<Self> {
        Ok(match self {
            Self::Plane(s) => Self::Plane(s.transform(matrix)?),
            Self::Cylinder(s) => Self::Cylinder(s.transform(matrix)?),
        })
    }

    fn loop_contains_point(&self, loop_points: &[Point3], point: &Point3) -> Containment {
        match self {
            Self::Plane(s) => s.loop_contains_point(loop_points, point),
            Self::Cylinder(s) => s.loop_contains_point(loop_points, point),
        }
    }

    fn edge_loop_ccw(&self, loop_points: &[Point3]) -> bool {
        match self {
            Self::Plane(s) => s.edge_loop_ccw(loop_points),
            Self::Cylinder(s) => s.edge_loop_ccw(loop_points),
        }
    }
}
