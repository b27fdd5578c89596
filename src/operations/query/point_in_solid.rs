use crate::error::Result;
use crate::math::Point3;
use crate::operations::boolean::{classify_point_in_solid, PointClassification};
use crate::topology::{SolidId, TopologyStore};

/// Tells whether a point lies inside, outside or on the boundary of a solid.
///
/// Complemented solids answer for the unbounded region they enclose.
pub struct PointInSolid {
    solid: SolidId,
    point: Point3,
}

impl PointInSolid {
    /// Creates a new `PointInSolid` query.
    #[must_use]
    pub fn new(solid: SolidId, point: Point3) -> Self {
        Self { solid, point }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid is missing or every probe ray grazes
    /// an edge or vertex.
    pub fn execute(&self, store: &TopologyStore) -> Result<PointClassification> {
        classify_point_in_solid(&self.point, self.solid, store)
    }
}
