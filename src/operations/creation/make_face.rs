use crate::error::{GeometryError, Result};
use crate::geometry::surface::{FaceSurface, Plane};
use crate::math::polygon_3d::newell_vector;
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::topology::{EdgeData, EdgeId, FaceData, FaceId, TopologyStore};

/// Creates a planar face from a closed polygon and optional hole polygons.
///
/// The face normal follows the contour's winding (right-hand rule). Holes
/// may be given in either winding; they are stored clockwise.
pub struct MakeFace {
    contour: Vec<Point3>,
    holes: Vec<Vec<Point3>>,
}

impl MakeFace {
    /// Creates a new `MakeFace` operation.
    #[must_use]
    pub fn new(contour: Vec<Point3>, holes: Vec<Vec<Point3>>) -> Self {
        Self { contour, holes }
    }

    /// Executes the operation, creating the face in the topology store.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if a polygon has fewer than three
    /// points or no area, or a topology error if a loop does not close.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<FaceId> {
        let normal = polygon_normal(&self.contour)?;
        let surface = FaceSurface::Plane(Plane::from_normal(self.contour[0], normal)?);

        let contour = add_loop(store, &self.contour)?;
        let mut holes = Vec::with_capacity(self.holes.len());
        for hole in &self.holes {
            let hole_normal = polygon_normal(hole)?;
            let hole_loop = if hole_normal.dot(&normal) > 0.0 {
                hole.iter().rev().copied().collect::<Vec<_>>()
            } else {
                hole.clone()
            };
            holes.push(add_loop(store, &hole_loop)?);
        }

        let face = FaceData {
            surface,
            contour,
            holes,
        };
        face.validate(store)?;
        Ok(store.add_face(face))
    }
}

/// Unit normal of a polygon by Newell's method.
pub(crate) fn polygon_normal(points: &[Point3]) -> Result<Vector3> {
    if points.len() < 3 {
        return Err(GeometryError::Degenerate(format!(
            "polygon needs at least 3 points, got {}",
            points.len()
        ))
        .into());
    }
    let newell = newell_vector(points);
    let len = newell.norm();
    if len < TOLERANCE {
        return Err(GeometryError::Degenerate("polygon has no area".into()).into());
    }
    Ok(newell / len)
}

/// Adds one edge per polygon side, in order.
fn add_loop(store: &mut TopologyStore, points: &[Point3]) -> Result<Vec<EdgeId>> {
    let n = points.len();
    (0..n)
        .map(|i| Ok(store.add_edge(EdgeData::new(points[i], points[(i + 1) % n])?)))
        .collect()
}
