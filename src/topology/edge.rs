use crate::error::{GeometryError, Result};
use crate::geometry::curve::{Curve, Line};
use crate::geometry::surface::FaceSurface;
use crate::math::{points_coincide, transform_point, Matrix4, Point3, Vector3, TOLERANCE};

slotmap::new_key_type! {
    /// Unique identifier for an edge in the topology store.
    pub struct EdgeId;
}

/// Data associated with a topological edge.
///
/// A straight segment of `line` traversed from `a` to `b`. `a_t` and `b_t`
/// are the line parameters of the endpoints; the edge is `reversed` when it
/// runs against the line's own direction. Each face owns its edges, so the
/// two sides of a shared boundary are distinct co-edges.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// Underlying line.
    pub line: Line,
    /// Start point.
    pub a: Point3,
    /// End point.
    pub b: Point3,
    /// Line parameter of `a`.
    pub a_t: f64,
    /// Line parameter of `b`.
    pub b_t: f64,
    /// Unit traversal tangent at `a`.
    pub a_dir: Vector3,
    /// Unit traversal tangent at `b`.
    pub b_dir: Vector3,
    /// `true` if traversal runs against the line direction.
    pub reversed: bool,
}

impl EdgeData {
    /// Creates a straight edge from `a` to `b`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoints coincide.
    pub fn new(a: Point3, b: Point3) -> Result<Self> {
        let line = Line::through(&a, &b)?;
        let b_t = line.project(&b);
        Self::on_line(line, 0.0, b_t)
    }

    /// Creates the edge of `line` between two parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter range is empty.
    pub fn on_line(line: Line, a_t: f64, b_t: f64) -> Result<Self> {
        if (a_t - b_t).abs() < TOLERANCE {
            return Err(GeometryError::Degenerate(format!("zero-length edge at t = {a_t}")).into());
        }
        let reversed = a_t > b_t;
        let dir = if reversed {
            -line.direction()
        } else {
            *line.direction()
        };
        Ok(Self {
            a: line.at(a_t),
            b: line.at(b_t),
            a_t,
            b_t,
            a_dir: dir,
            b_dir: dir,
            reversed,
            line,
        })
    }

    /// Unit traversal direction.
    #[must_use]
    pub fn direction(&self) -> Vector3 {
        self.a_dir
    }

    /// Euclidean length.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.b_t - self.a_t).abs()
    }

    /// Midpoint of the segment.
    #[must_use]
    pub fn midpoint(&self) -> Point3 {
        self.line.at(0.5 * (self.a_t + self.b_t))
    }

    /// Line parameter of a point on the edge's line (no distance check).
    #[must_use]
    pub fn param_of(&self, point: &Point3) -> f64 {
        self.line.project(point)
    }

    /// Traversal fraction of a line parameter: 0 at `a`, 1 at `b`.
    #[must_use]
    pub fn fraction(&self, t: f64) -> f64 {
        (t - self.a_t) / (self.b_t - self.a_t)
    }

    /// Same segment traversed the other way.
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            line: self.line.clone(),
            a: self.b,
            b: self.a,
            a_t: self.b_t,
            b_t: self.a_t,
            a_dir: -self.b_dir,
            b_dir: -self.a_dir,
            reversed: !self.reversed,
        }
    }

    /// Applies an affine transform.
    ///
    /// # Errors
    ///
    /// Returns an error if the transform collapses the edge.
    pub fn transform(&self, matrix: &Matrix4) -> Result<Self> {
        let line = self.line.transform(matrix)?;
        let a_t = line.project(&transform_point(matrix, &self.a));
        let b_t = line.project(&transform_point(matrix, &self.b));
        Self::on_line(line, a_t, b_t)
    }

    /// Sub-segment between two parameters on the same line, in the given order.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is empty.
    pub fn sub_edge(&self, a_t: f64, b_t: f64) -> Result<Self> {
        Self::on_line(self.line.clone(), a_t, b_t)
    }

    /// Returns `true` if both edges join the same pair of points, in either order.
    #[must_use]
    pub fn is_co_edge(&self, other: &EdgeData) -> bool {
        (points_coincide(&self.a, &other.a) && points_coincide(&self.b, &other.b))
            || (points_coincide(&self.a, &other.b) && points_coincide(&self.b, &other.a))
    }

    /// Returns `true` if the edge runs along `curve` over its whole length.
    #[must_use]
    pub fn colinear_to(&self, curve: &Line) -> bool {
        self.line.colinear_to(curve)
    }

    /// Line parameters within the edge's closed range where it meets `surface`.
    #[must_use]
    pub fn intersection_parameters_with_surface(&self, surface: &FaceSurface) -> Vec<f64> {
        let lo = self.a_t.min(self.b_t) - TOLERANCE;
        let hi = self.a_t.max(self.b_t) + TOLERANCE;
        self.line
            .ts_with_surface(surface)
            .into_iter()
            .filter(|t| (lo..=hi).contains(t))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::surface::Plane;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn new_edge_has_forward_parameters() {
        let e = EdgeData::new(p(1.0, 0.0, 0.0), p(1.0, 3.0, 0.0)).unwrap();
        assert!(!e.reversed);
        assert!((e.length() - 3.0).abs() < TOLERANCE);
        assert!((e.direction() - Vector3::y()).norm() < TOLERANCE);
        assert!((e.midpoint() - p(1.0, 1.5, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn flipped_swaps_ends_and_tangents() {
        let e = EdgeData::new(p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0)).unwrap();
        let f = e.flipped();
        assert!(f.reversed);
        assert!(points_coincide(&f.a, &e.b) && points_coincide(&f.b, &e.a));
        assert!((f.a_dir + e.b_dir).norm() < TOLERANCE);
        assert!(e.is_co_edge(&f));
        assert!((f.fraction(2.0)).abs() < TOLERANCE);
    }

    #[test]
    fn degenerate_edge_is_rejected() {
        let e = EdgeData::new(p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0)).unwrap();
        assert!(e.sub_edge(1.0, 1.0).is_err());
        assert!(EdgeData::new(p(1.0, 1.0, 1.0), p(1.0, 1.0, 1.0)).is_err());
    }

    #[test]
    fn surface_parameters_are_clipped_to_edge() {
        let e = EdgeData::new(p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0)).unwrap();
        let inside = FaceSurface::Plane(Plane::from_normal(p(0.5, 0.0, 0.0), Vector3::x()).unwrap());
        let outside = FaceSurface::Plane(Plane::from_normal(p(3.0, 0.0, 0.0), Vector3::x()).unwrap());
        let at_end = FaceSurface::Plane(Plane::from_normal(p(2.0, 0.0, 0.0), Vector3::x()).unwrap());
        assert_eq!(e.intersection_parameters_with_surface(&inside).len(), 1);
        assert!(e.intersection_parameters_with_surface(&outside).is_empty());
        assert_eq!(e.intersection_parameters_with_surface(&at_end).len(), 1);
    }

    #[test]
    fn transform_translates_endpoints() {
        let e = EdgeData::new(p(0.0, 0.0, 0.0), p(0.0, 0.0, 1.0)).unwrap();
        let m = Matrix4::new_translation(&Vector3::new(1.0, 2.0, 3.0));
        let t = e.transform(&m).unwrap();
        assert!(points_coincide(&t.a, &p(1.0, 2.0, 3.0)));
        assert!(points_coincide(&t.b, &p(1.0, 2.0, 4.0)));
    }
}
