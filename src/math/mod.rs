pub mod intersect_3d;
pub mod polygon_3d;

use std::f64::consts::TAU;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 4x4 transformation matrix.
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Global geometric tolerance for floating-point comparisons.
///
/// Every equality decision in the kernel goes through the helpers below.
pub const TOLERANCE: f64 = 1e-9;

/// Distance by which classification probes are pushed off a boundary.
pub const PROBE_OFFSET: f64 = TOLERANCE * 1e3;

/// Returns `true` if `a` and `b` differ by less than [`TOLERANCE`].
#[must_use]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < TOLERANCE
}

/// Returns `true` if `x` is within [`TOLERANCE`] of zero.
#[must_use]
pub fn is_zero(x: f64) -> bool {
    x.abs() < TOLERANCE
}

/// Returns `true` if two points coincide within [`TOLERANCE`].
#[must_use]
pub fn points_coincide(a: &Point3, b: &Point3) -> bool {
    (a - b).norm() < TOLERANCE
}

/// Returns `true` if two vectors are parallel (or anti-parallel).
#[must_use]
pub fn is_parallel(a: &Vector3, b: &Vector3) -> bool {
    a.cross(b).norm() < TOLERANCE * a.norm().max(1.0) * b.norm().max(1.0)
}

/// Signed angle from `a` to `b`, measured counterclockwise around `normal`.
///
/// Both vectors are projected onto the plane perpendicular to `normal`
/// first. The result lies in `(-π, π]`.
#[must_use]
pub fn angle_relative_normal(a: &Vector3, b: &Vector3, normal: &Vector3) -> f64 {
    let n = normal.normalize();
    let a = a - n * a.dot(&n);
    let b = b - n * b.dot(&n);
    a.cross(&b).dot(&n).atan2(a.dot(&b))
}

/// Maps an angle into `[0, 2π)`, snapping values just below `2π` to zero.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    if TAU - a < TOLERANCE {
        0.0
    } else {
        a
    }
}

/// Component of `v` perpendicular to `axis`.
#[must_use]
pub fn rejected_from(v: &Vector3, axis: &Vector3) -> Vector3 {
    let n = axis.normalize();
    v - n * v.dot(&n)
}

/// Transforms a point by a 4x4 matrix (homogeneous coordinates).
#[must_use]
pub fn transform_point(matrix: &Matrix4, point: &Point3) -> Point3 {
    matrix.transform_point(point)
}

/// Transforms a direction vector by a 4x4 matrix (ignoring translation).
#[must_use]
pub fn transform_direction(matrix: &Matrix4, dir: &Vector3) -> Vector3 {
    matrix.transform_vector(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn angle_is_counterclockwise_around_normal() {
        let angle = angle_relative_normal(&Vector3::x(), &Vector3::y(), &Vector3::z());
        assert_relative_eq!(angle, FRAC_PI_2);
        let angle = angle_relative_normal(&Vector3::y(), &Vector3::x(), &Vector3::z());
        assert_relative_eq!(angle, -FRAC_PI_2);
    }

    #[test]
    fn angle_ignores_normal_component() {
        let a = Vector3::new(1.0, 0.0, 5.0);
        let b = Vector3::new(-1.0, 0.0, -3.0);
        assert_relative_eq!(angle_relative_normal(&a, &b, &Vector3::z()).abs(), PI);
    }

    #[test]
    fn normalize_snaps_near_full_turn() {
        assert!(is_zero(normalize_angle(-TOLERANCE / 4.0)));
        assert_relative_eq!(normalize_angle(-FRAC_PI_2), 3.0 * FRAC_PI_2);
    }

    #[test]
    fn parallel_detects_antiparallel() {
        assert!(is_parallel(&Vector3::z(), &(-Vector3::z() * 2.0)));
        assert!(!is_parallel(&Vector3::z(), &Vector3::x()));
    }
}
