use crate::error::{GeometryError, Result};
use crate::math::polygon_3d::{polygon_containment_3d, signed_area_3d};
use crate::math::{is_parallel, transform_direction, transform_point, Matrix4, Point3, Vector3, TOLERANCE};

use super::{Containment, FaceSurface, Surface};

/// An infinite oriented plane in 3D space.
///
/// Defined by an origin point and an orthonormal in-plane frame
/// (`u_dir`, `v_dir`). The normal is `u_dir × v_dir`.
///
/// Parametric form: `P(u, v) = origin + u * u_dir + v * v_dir`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    origin: Point3,
    u_dir: Vector3,
    v_dir: Vector3,
    normal: Vector3,
}

impl Plane {
    /// Creates a new plane from an origin and two direction vectors.
    ///
    /// `v_dir` only fixes the orientation; it is re-orthogonalized against `u_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vectors are zero-length
    /// or parallel (degenerate plane).
    pub fn new(origin: Point3, u_dir: Vector3, v_dir: Vector3) -> Result<Self> {
        let u_len = u_dir.norm();
        if u_len < TOLERANCE || v_dir.norm() < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let u_dir = u_dir / u_len;

        let normal = u_dir.cross(&v_dir);
        let normal_len = normal.norm();
        if normal_len < TOLERANCE {
            return Err(
                GeometryError::Degenerate("plane directions are parallel".into()).into(),
            );
        }
        let normal = normal / normal_len;

        Ok(Self {
            origin,
            u_dir,
            v_dir: normal.cross(&u_dir),
            normal,
        })
    }

    /// Creates a plane from an origin and a normal vector.
    ///
    /// The U and V directions are computed automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal vector is zero-length.
    pub fn from_normal(origin: Point3, normal: Vector3) -> Result<Self> {
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let normal = normal / len;

        // Choose a reference vector not parallel to the normal
        let reference = if normal.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };

        let v_dir = normal.cross(&reference).normalize();
        let u_dir = v_dir.cross(&normal);

        Ok(Self {
            origin,
            u_dir,
            v_dir,
            normal,
        })
    }

    /// Returns the origin point of the plane.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the U direction vector.
    #[must_use]
    pub fn u_dir(&self) -> &Vector3 {
        &self.u_dir
    }

    /// Returns the V direction vector.
    #[must_use]
    pub fn v_dir(&self) -> &Vector3 {
        &self.v_dir
    }

    /// Returns the normal vector of the plane.
    #[must_use]
    pub fn plane_normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Signed offset of the plane along its normal (`n · origin`).
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.normal.dot(&self.origin.coords)
    }
}

impl Surface for Plane {
    fn kind_name(&self) -> &'static str {
        "plane"
    }

    fn normal_at(&self, _point: &Point3) -> Vector3 {
        self.normal
    }

    fn contains_point(&self, point: &Point3) -> bool {
        self.normal.dot(&(point - self.origin)).abs() < TOLERANCE
    }

    fn is_coplanar_to(&self, other: &FaceSurface) -> bool {
        match other {
            FaceSurface::Plane(other) => {
                is_parallel(&self.normal, &other.normal) && self.contains_point(&other.origin)
            }
            FaceSurface::Cylinder(_) => false,
        }
    }

    fn flipped(&self) -> Self {
        Self {
            origin: self.origin,
            u_dir: self.v_dir,
            v_dir: self.u_dir,
            normal: -self.normal,
        }
    }

    fn transform(&self, matrix: &Matrix4) -> Result<Self> {
        Self::new(
            transform_point(matrix, &self.origin),
            transform_direction(matrix, &self.u_dir),
            transform_direction(matrix, &self.v_dir),
        )
    }

    fn loop_contains_point(&self, loop_points: &[Point3], point: &Point3) -> Containment {
        polygon_containment_3d(point, loop_points, self)
    }

    fn edge_loop_ccw(&self, loop_points: &[Point3]) -> bool {
        signed_area_3d(loop_points, &self.normal) > 0.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn frame_is_right_handed() {
        let plane = Plane::from_normal(p(0.0, 0.0, 0.0), Vector3::new(1.0, 2.0, 3.0)).unwrap();
        let n = plane.u_dir().cross(plane.v_dir());
        assert!((n - plane.plane_normal()).norm() < TOLERANCE);
    }

    #[test]
    fn new_reorthogonalizes() {
        let plane = Plane::new(p(0.0, 0.0, 0.0), Vector3::x(), Vector3::new(1.0, 1.0, 0.0)).unwrap();
        assert!(plane.u_dir().dot(plane.v_dir()).abs() < TOLERANCE);
        assert!((plane.plane_normal() - Vector3::z()).norm() < TOLERANCE);
    }

    #[test]
    fn flipped_negates_normal_and_winding() {
        let plane = Plane::from_normal(p(0.0, 0.0, 0.0), Vector3::z()).unwrap();
        let square = vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(0.0, 1.0, 0.0)];
        assert!(plane.edge_loop_ccw(&square));

        let flipped = plane.flipped();
        assert!((flipped.plane_normal() + Vector3::z()).norm() < TOLERANCE);
        assert!(!flipped.edge_loop_ccw(&square));
        assert!(plane.is_coplanar_to(&FaceSurface::Plane(flipped)));
    }

    #[test]
    fn offset_planes_are_not_coplanar() {
        let a = Plane::from_normal(p(0.0, 0.0, 0.0), Vector3::z()).unwrap();
        let b = Plane::from_normal(p(0.0, 0.0, 0.5), Vector3::z()).unwrap();
        assert!(!a.is_coplanar_to(&FaceSurface::Plane(b)));
        assert!((a.offset()).abs() < TOLERANCE);
    }

    #[test]
    fn transform_moves_origin() {
        let plane = Plane::from_normal(p(0.0, 0.0, 0.0), Vector3::z()).unwrap();
        let m = Matrix4::new_translation(&Vector3::new(0.0, 0.0, 2.0));
        let moved = plane.transform(&m).unwrap();
        assert!(moved.contains_point(&p(5.0, -3.0, 2.0)));
        assert!((moved.plane_normal() - Vector3::z()).norm() < TOLERANCE);
    }
}
