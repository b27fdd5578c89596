use crate::geometry::curve::Line;
use crate::geometry::surface::Plane;

use super::{is_zero, Point3, Vector3, TOLERANCE};

/// Relationship between two planes.
#[derive(Debug)]
pub enum PlanePairRelation {
    /// Planes cross along a line whose direction is `n_a × n_b`.
    Crossing(Line),
    /// Planes are parallel but not coincident.
    Parallel { distance: f64 },
    /// Planes lie on top of each other (either orientation).
    Coincident,
}

/// Computes the intersection of two planes.
///
/// The direction of the returned line is `normalize(n_a × n_b)`, so swapping
/// the arguments reverses it.
#[must_use]
pub fn plane_plane_intersect(a: &Plane, b: &Plane) -> PlanePairRelation {
    let na = a.plane_normal();
    let nb = b.plane_normal();

    let dir = na.cross(nb);
    let dir_len = dir.norm();

    if dir_len < TOLERANCE {
        let dist = (b.origin() - a.origin()).dot(na).abs();
        if dist < TOLERANCE {
            PlanePairRelation::Coincident
        } else {
            PlanePairRelation::Parallel { distance: dist }
        }
    } else {
        // p = oa + s*na + t*nb satisfies both plane equations when
        // s + t*(na.nb) = 0 and s*(na.nb) + t = nb.(ob - oa).
        let d2 = nb.dot(&(b.origin() - a.origin()));
        let dot_nn = na.dot(nb);
        let denom = 1.0 - dot_nn * dot_nn;
        let s = -dot_nn * d2 / denom;
        let t = d2 / denom;
        let origin = a.origin() + na * s + nb * t;

        PlanePairRelation::Crossing(Line::from_unit(origin, dir / dir_len))
    }
}

/// Relationship of a line with a plane.
#[derive(Debug)]
pub enum LinePlaneRelation {
    /// Line crosses the plane at `point`, which sits at parameter `t` on the line.
    Point { point: Point3, t: f64 },
    /// Line is parallel to the plane and off it.
    Parallel,
    /// Line lies entirely on the plane.
    OnPlane,
}

/// Computes the intersection of `origin + t * dir` with a plane.
///
/// `t` is expressed in units of `dir`, so a unit `dir` yields arc length.
#[must_use]
pub fn line_plane_intersect(origin: &Point3, dir: &Vector3, plane: &Plane) -> LinePlaneRelation {
    let normal = plane.plane_normal();
    let denom = normal.dot(dir);
    let numer = normal.dot(&(plane.origin() - origin));

    if is_zero(denom) {
        if is_zero(numer) {
            LinePlaneRelation::OnPlane
        } else {
            LinePlaneRelation::Parallel
        }
    } else {
        let t = numer / denom;
        LinePlaneRelation::Point {
            point: origin + dir * t,
            t,
        }
    }
}

/// Signed distance from a point to a plane.
/// Positive = on the normal side, negative = opposite.
#[must_use]
pub fn signed_distance_to_plane(point: &Point3, plane: &Plane) -> f64 {
    plane.plane_normal().dot(&(point - plane.origin()))
}
