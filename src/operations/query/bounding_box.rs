use crate::error::{BooleanError, Result};
use crate::math::{Point3, TOLERANCE};
use crate::topology::{SolidId, TopologyStore};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Smallest box containing every point; `None` for no points.
    #[must_use]
    pub fn from_points(points: &[Point3]) -> Option<Self> {
        let first = points.first()?;
        Some(points.iter().skip(1).fold(
            Self {
                min: *first,
                max: *first,
            },
            |b, p| Self {
                min: b.min.inf(p),
                max: b.max.sup(p),
            },
        ))
    }

    /// Returns `true` if the boxes touch or overlap, within [`TOLERANCE`].
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        (0..3).all(|i| {
            self.min[i] <= other.max[i] + TOLERANCE && self.max[i] >= other.min[i] - TOLERANCE
        })
    }

    /// Smallest box containing both.
    #[must_use]
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }
}

/// Computes the axis-aligned bounding box of a solid's boundary.
pub struct BoundingBox {
    solid: SolidId,
}

impl BoundingBox {
    /// Creates a new `BoundingBox` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the query, returning the AABB of every boundary vertex.
    ///
    /// # Errors
    ///
    /// Returns [`BooleanError::Precondition`] if the solid has no faces.
    pub fn execute(&self, store: &TopologyStore) -> Result<Aabb> {
        let mut bounds: Option<Aabb> = None;
        for &face_id in &store.solid(self.solid)?.faces {
            let face = store.face(face_id)?;
            let points = store.loop_points(&face.contour)?;
            if let Some(b) = Aabb::from_points(&points) {
                bounds = Some(bounds.map_or(b, |acc| acc.union(&b)));
            }
        }
        bounds.ok_or_else(|| BooleanError::Precondition("solid has no boundary".into()).into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::creation::MakeBox;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn box_bounds() {
        let mut store = TopologyStore::new();
        let solid = MakeBox::new(p(1.0, 2.0, 3.0), p(3.0, 5.0, 7.0)).execute(&mut store).unwrap();
        let b = BoundingBox::new(solid).execute(&store).unwrap();
        assert!((b.min - p(1.0, 2.0, 3.0)).norm() < TOLERANCE);
        assert!((b.max - p(3.0, 5.0, 7.0)).norm() < TOLERANCE);
    }

    #[test]
    fn touching_boxes_overlap() {
        let a = Aabb::from_points(&[p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0)]).unwrap();
        let b = Aabb::from_points(&[p(1.0, 0.0, 0.0), p(2.0, 1.0, 1.0)]).unwrap();
        let c = Aabb::from_points(&[p(1.5, 0.0, 0.0), p(2.0, 1.0, 1.0)]).unwrap();
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(Aabb::from_points(&[]).is_none());
    }
}
