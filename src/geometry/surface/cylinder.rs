use std::f64::consts::{PI, TAU};

use crate::error::{GeometryError, Result};
use crate::geometry::curve::Line;
use crate::math::polygon_3d::polygon_containment_2d;
use crate::math::{
    approx_eq, is_parallel, rejected_from, transform_direction, transform_point, Matrix4, Point2,
    Point3, Vector3, TOLERANCE,
};

use super::{Containment, FaceSurface, Surface};

/// A cylindrical surface in 3D space.
///
/// Defined by a center point on the axis, radius, axis direction, and
/// a reference direction for angle zero. The normal points away from the
/// axis when `outward` is set and toward it otherwise.
///
/// Loop queries work in unrolled coordinates: arc length around the axis
/// (counterclockwise seen from the tip of `axis`) and height along it.
#[derive(Debug, Clone, PartialEq)]
pub struct Cylinder {
    center: Point3,
    radius: f64,
    axis: Vector3,
    ref_dir: Vector3,
    outward: bool,
}

impl Cylinder {
    /// Creates a new cylinder with an outward-facing normal.
    ///
    /// # Arguments
    ///
    /// * `center` - A point on the cylinder axis
    /// * `radius` - Radius (must be positive)
    /// * `axis` - Axis direction (will be normalized)
    /// * `ref_dir` - Reference direction for angle zero (must be perpendicular to axis)
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive, axis is zero-length,
    /// or the reference direction is not perpendicular to the axis.
    pub fn new(center: Point3, radius: f64, axis: Vector3, ref_dir: Vector3) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(
                GeometryError::Degenerate("cylinder radius must be positive".into()).into(),
            );
        }

        let axis_len = axis.norm();
        if axis_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let axis = axis / axis_len;

        let ref_len = ref_dir.norm();
        if ref_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let ref_dir = ref_dir / ref_len;

        if axis.dot(&ref_dir).abs() > TOLERANCE {
            return Err(GeometryError::Degenerate(
                "reference direction must be perpendicular to axis".into(),
            )
            .into());
        }

        Ok(Self {
            center,
            radius,
            axis,
            ref_dir,
            outward: true,
        })
    }

    /// Returns the center point on the axis.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// Returns the radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the axis direction (unit vector).
    #[must_use]
    pub fn axis(&self) -> &Vector3 {
        &self.axis
    }

    /// Returns `true` if the normal points away from the axis.
    #[must_use]
    pub fn is_outward(&self) -> bool {
        self.outward
    }

    fn binormal(&self) -> Vector3 {
        self.axis.cross(&self.ref_dir)
    }

    /// Angle around the axis in `(-π, π]` and height along it.
    fn angle_height(&self, point: &Point3) -> (f64, f64) {
        let dp = point - self.center;
        let angle = dp.dot(&self.binormal()).atan2(dp.dot(&self.ref_dir));
        (angle, dp.dot(&self.axis))
    }

    /// Unrolls a loop so consecutive angles never jump across the seam.
    fn unroll_loop(&self, loop_points: &[Point3]) -> Vec<(f64, f64)> {
        let mut out: Vec<(f64, f64)> = Vec::with_capacity(loop_points.len());
        for point in loop_points {
            let (angle, h) = self.angle_height(point);
            let angle = match out.last() {
                Some(&(prev, _)) => prev + wrap_angle(angle - prev),
                None => angle,
            };
            out.push((angle, h));
        }
        out
    }

    /// Parameters at which `line` pierces the cylinder.
    #[must_use]
    pub fn line_parameters(&self, line: &Line) -> Vec<f64> {
        let w = rejected_from(&(line.origin() - self.center), &self.axis);
        let e = rejected_from(line.direction(), &self.axis);
        let a = e.dot(&e);
        if a < TOLERANCE {
            return Vec::new();
        }
        let b = 2.0 * w.dot(&e);
        let c = w.dot(&w) - self.radius * self.radius;
        let disc = b * b - 4.0 * a * c;
        if disc < -TOLERANCE {
            Vec::new()
        } else if disc.abs() <= TOLERANCE {
            vec![-b / (2.0 * a)]
        } else {
            let root = disc.sqrt();
            vec![(-b - root) / (2.0 * a), (-b + root) / (2.0 * a)]
        }
    }
}

/// Maps an angle difference into `(-π, π]`.
fn wrap_angle(delta: f64) -> f64 {
    let d = delta.rem_euclid(TAU);
    if d > PI {
        d - TAU
    } else {
        d
    }
}

impl Surface for Cylinder {
    fn kind_name(&self) -> &'static str {
        "cylinder"
    }

    fn normal_at(&self, point: &Point3) -> Vector3 {
        let radial = rejected_from(&(point - self.center), &self.axis).normalize();
        if self.outward {
            radial
        } else {
            -radial
        }
    }

    fn contains_point(&self, point: &Point3) -> bool {
        approx_eq(rejected_from(&(point - self.center), &self.axis).norm(), self.radius)
    }

    fn is_coplanar_to(&self, other: &FaceSurface) -> bool {
        match other {
            FaceSurface::Cylinder(other) => {
                is_parallel(&self.axis, &other.axis)
                    && approx_eq(self.radius, other.radius)
                    && rejected_from(&(other.center - self.center), &self.axis).norm() < TOLERANCE
            }
            FaceSurface::Plane(_) => false,
        }
    }

    fn flipped(&self) -> Self {
        Self {
            outward: !self.outward,
            ..self.clone()
        }
    }

    fn transform(&self, matrix: &Matrix4) -> Result<Self> {
        let axis = transform_direction(matrix, &self.axis);
        let ref_dir = transform_direction(matrix, &self.ref_dir);
        let radius = self.radius * ref_dir.norm();
        let mut cylinder = Self::new(
            transform_point(matrix, &self.center),
            radius,
            axis,
            rejected_from(&ref_dir, &axis),
        )?;
        cylinder.outward = self.outward;
        Ok(cylinder)
    }

    fn loop_contains_point(&self, loop_points: &[Point3], point: &Point3) -> Containment {
        let unrolled = self.unroll_loop(loop_points);
        if unrolled.is_empty() {
            return Containment::Outside;
        }
        let mean = unrolled.iter().map(|(a, _)| a).sum::<f64>() / unrolled.len() as f64;
        let (angle, h) = self.angle_height(point);
        let angle = mean + wrap_angle(angle - mean);

        let polygon: Vec<Point2> = unrolled
            .iter()
            .map(|&(a, h)| Point2::new(a * self.radius, h))
            .collect();
        polygon_containment_2d(&Point2::new(angle * self.radius, h), &polygon)
    }

    fn edge_loop_ccw(&self, loop_points: &[Point3]) -> bool {
        let unrolled = self.unroll_loop(loop_points);
        let n = unrolled.len();
        let twice_area: f64 = (0..n)
            .map(|i| {
                let (a0, h0) = unrolled[i];
                let (a1, h1) = unrolled[(i + 1) % n];
                a0 * h1 - a1 * h0
            })
            .sum();
        (twice_area > 0.0) == self.outward
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn z_cylinder(radius: f64) -> Cylinder {
        Cylinder::new(Point3::origin(), radius, Vector3::z(), Vector3::x()).unwrap()
    }

    fn around(c: &Cylinder, angle: f64, h: f64) -> Point3 {
        p(c.radius() * angle.cos(), c.radius() * angle.sin(), h)
    }

    #[test]
    fn rejects_bad_construction() {
        assert!(Cylinder::new(Point3::origin(), 0.0, Vector3::z(), Vector3::x()).is_err());
        assert!(Cylinder::new(Point3::origin(), 1.0, Vector3::z(), Vector3::z()).is_err());
    }

    #[test]
    fn normal_flips_with_orientation() {
        let c = z_cylinder(2.0);
        let q = p(0.0, 2.0, 3.0);
        assert!(c.contains_point(&q));
        assert!((c.normal_at(&q) - Vector3::y()).norm() < TOLERANCE);
        assert!((c.flipped().normal_at(&q) + Vector3::y()).norm() < TOLERANCE);
    }

    #[test]
    fn patch_across_seam_contains_point() {
        let c = z_cylinder(1.0);
        // patch from -45° to +45°, straddling the angle wrap at π is tested below
        let patch = vec![
            around(&c, -0.25 * PI, 0.0),
            around(&c, 0.25 * PI, 0.0),
            around(&c, 0.25 * PI, 1.0),
            around(&c, -0.25 * PI, 1.0),
        ];
        assert!(c.edge_loop_ccw(&patch));
        assert_eq!(c.loop_contains_point(&patch, &around(&c, 0.0, 0.5)), Containment::Inside);
        assert_eq!(c.loop_contains_point(&patch, &around(&c, FRAC_PI_2, 0.5)), Containment::Outside);

        let back = vec![
            around(&c, 0.75 * PI, 0.0),
            around(&c, 1.25 * PI, 0.0),
            around(&c, 1.25 * PI, 1.0),
            around(&c, 0.75 * PI, 1.0),
        ];
        assert_eq!(c.loop_contains_point(&back, &around(&c, PI, 0.5)), Containment::Inside);
        assert!(!c.flipped().edge_loop_ccw(&back));
    }

    #[test]
    fn coaxial_cylinders_are_coplanar() {
        let a = z_cylinder(1.0);
        let b = Cylinder::new(p(0.0, 0.0, 4.0), 1.0, -Vector3::z(), Vector3::y()).unwrap();
        assert!(a.is_coplanar_to(&FaceSurface::Cylinder(b)));
        assert!(!a.is_coplanar_to(&FaceSurface::Cylinder(z_cylinder(2.0))));
    }

    #[test]
    fn transform_scales_radius() {
        let c = z_cylinder(1.0);
        let moved = c.transform(&Matrix4::new_scaling(2.0)).unwrap();
        assert!((moved.radius() - 2.0).abs() < TOLERANCE);
        assert!(moved.is_outward());
    }
}
