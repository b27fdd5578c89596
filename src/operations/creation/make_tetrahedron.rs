use crate::error::{GeometryError, Result};
use crate::math::{Point3, TOLERANCE};
use crate::topology::{SolidData, SolidId, TopologyStore};

use super::MakeFace;

/// Creates a tetrahedron from four corner points in any order.
pub struct MakeTetrahedron {
    corners: [Point3; 4],
}

impl MakeTetrahedron {
    /// Creates a new `MakeTetrahedron` operation.
    #[must_use]
    pub fn new(corners: [Point3; 4]) -> Self {
        Self { corners }
    }

    /// Executes the operation, creating the solid in the topology store.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if the corners are coplanar.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        let [a, b, c, d] = self.corners;
        let volume6 = (b - a).cross(&(c - a)).dot(&(d - a));
        if volume6.abs() < TOLERANCE {
            return Err(GeometryError::Degenerate("tetrahedron corners are coplanar".into()).into());
        }
        // with positive orientation, (a, c, b) faces away from d
        let (b, c) = if volume6 > 0.0 { (b, c) } else { (c, b) };
        let triangles = [[a, c, b], [a, b, d], [b, c, d], [c, a, d]];

        let faces = triangles
            .iter()
            .map(|tri| MakeFace::new(tri.to_vec(), vec![]).execute(store))
            .collect::<Result<Vec<_>>>()?;
        Ok(store.add_solid(SolidData::new(faces)))
    }
}
