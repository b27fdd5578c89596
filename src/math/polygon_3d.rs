use crate::geometry::surface::Plane;

use super::{Point2, Point3, Vector3, TOLERANCE};

/// Where a point lies relative to a closed loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    /// Strictly inside.
    Inside,
    /// Strictly outside.
    Outside,
    /// On the loop itself, within tolerance.
    OnEdge,
}

/// Projects a 3D point onto the UV coordinate system of a plane.
#[must_use]
pub fn project_to_uv(point: &Point3, plane: &Plane) -> Point2 {
    let diff = point - plane.origin();
    Point2::new(diff.dot(plane.u_dir()), diff.dot(plane.v_dir()))
}

/// Classifies a point against a closed polygon given in 2D.
///
/// Boundary hits are detected first; otherwise the winding number decides.
#[must_use]
pub fn polygon_containment_2d(point: &Point2, polygon: &[Point2]) -> Containment {
    if polygon.len() < 3 {
        return Containment::Outside;
    }
    let n = polygon.len();
    if (0..n).any(|i| segment_distance_2d(point, &polygon[i], &polygon[(i + 1) % n]) < TOLERANCE) {
        return Containment::OnEdge;
    }
    if winding_number_2d(point, polygon) == 0 {
        Containment::Outside
    } else {
        Containment::Inside
    }
}

/// Classifies a point coplanar with a polygon lying on `plane`.
#[must_use]
pub fn polygon_containment_3d(point: &Point3, polygon: &[Point3], plane: &Plane) -> Containment {
    let uv: Vec<Point2> = polygon.iter().map(|q| project_to_uv(q, plane)).collect();
    polygon_containment_2d(&project_to_uv(point, plane), &uv)
}

/// Winding number of `point` with respect to polygon `verts`.
///
/// Non-zero => inside, zero => outside.
fn winding_number_2d(point: &Point2, verts: &[Point2]) -> i32 {
    let n = verts.len();
    let mut winding = 0i32;
    for i in 0..n {
        let a = verts[i];
        let b = verts[(i + 1) % n];
        let side = cross_2d(b.x - a.x, b.y - a.y, point.x - a.x, point.y - a.y);

        if a.y <= point.y {
            if b.y > point.y && side > 0.0 {
                winding += 1;
            }
        } else if b.y <= point.y && side < 0.0 {
            winding -= 1;
        }
    }
    winding
}

fn segment_distance_2d(point: &Point2, a: &Point2, b: &Point2) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return (point - a).norm();
    }
    let t = ((point - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (point - (a + ab * t)).norm()
}

/// 2D cross product: `(ax * by - ay * bx)`.
#[inline]
fn cross_2d(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    ax * by - ay * bx
}

/// Newell's area vector of a closed 3D polygon.
///
/// Its direction is the polygon normal (right-hand rule over the vertex
/// order) and its length is twice the enclosed area.
#[must_use]
pub fn newell_vector(points: &[Point3]) -> Vector3 {
    let n = points.len();
    let mut acc = Vector3::zeros();
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        acc.x += (a.y - b.y) * (a.z + b.z);
        acc.y += (a.z - b.z) * (a.x + b.x);
        acc.z += (a.x - b.x) * (a.y + b.y);
    }
    acc
}

/// Signed area of a closed 3D polygon measured against `normal`.
///
/// Positive when the polygon winds counterclockwise seen from the tip of `normal`.
#[must_use]
pub fn signed_area_3d(points: &[Point3], normal: &Vector3) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    0.5 * newell_vector(points).dot(normal)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn xy_plane() -> Plane {
        Plane::from_normal(p(0.0, 0.0, 0.0), Vector3::z()).unwrap()
    }

    fn unit_square() -> Vec<Point3> {
        vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn square_containment() {
        let plane = xy_plane();
        let sq = unit_square();
        assert_eq!(polygon_containment_3d(&p(0.5, 0.5, 0.0), &sq, &plane), Containment::Inside);
        assert_eq!(polygon_containment_3d(&p(2.0, 0.5, 0.0), &sq, &plane), Containment::Outside);
        assert_eq!(polygon_containment_3d(&p(1.0, 0.3, 0.0), &sq, &plane), Containment::OnEdge);
        assert_eq!(polygon_containment_3d(&p(0.0, 0.0, 0.0), &sq, &plane), Containment::OnEdge);
    }

    #[test]
    fn containment_ignores_orientation() {
        let plane = xy_plane();
        let mut sq = unit_square();
        sq.reverse();
        assert_eq!(polygon_containment_3d(&p(0.25, 0.75, 0.0), &sq, &plane), Containment::Inside);
    }

    #[test]
    fn concave_polygon_notch_is_outside() {
        let plane = xy_plane();
        // U shape opening upward
        let u = vec![
            p(0.0, 0.0, 0.0),
            p(3.0, 0.0, 0.0),
            p(3.0, 3.0, 0.0),
            p(2.0, 3.0, 0.0),
            p(2.0, 1.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(1.0, 3.0, 0.0),
            p(0.0, 3.0, 0.0),
        ];
        assert_eq!(polygon_containment_3d(&p(1.5, 2.0, 0.0), &u, &plane), Containment::Outside);
        assert_eq!(polygon_containment_3d(&p(0.5, 2.0, 0.0), &u, &plane), Containment::Inside);
    }

    #[test]
    fn signed_area_follows_winding() {
        let sq = unit_square();
        assert!((signed_area_3d(&sq, &Vector3::z()) - 1.0).abs() < TOLERANCE);
        let mut rev = sq;
        rev.reverse();
        assert!((signed_area_3d(&rev, &Vector3::z()) + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn triangle_area() {
        let tri = vec![p(0.0, 0.0, 0.0), p(4.0, 0.0, 0.0), p(0.0, 3.0, 0.0)];
        assert!((signed_area_3d(&tri, &Vector3::z()) - 6.0).abs() < TOLERANCE);
    }
}
