use crate::error::{GeometryError, Result};
use crate::math::{Point3, TOLERANCE};
use crate::topology::{SolidData, SolidId, TopologyStore};

use super::MakeFace;

/// Creates an axis-aligned box solid from two corner points.
pub struct MakeBox {
    min_corner: Point3,
    max_corner: Point3,
}

impl MakeBox {
    /// Creates a new `MakeBox` operation.
    #[must_use]
    pub fn new(min_corner: Point3, max_corner: Point3) -> Self {
        Self {
            min_corner,
            max_corner,
        }
    }

    /// Executes the operation, creating the box in the topology store.
    ///
    /// Every face is wound counterclockwise seen from outside.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if the box is flat along any axis.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        let (lo, hi) = (self.min_corner, self.max_corner);
        if (hi - lo).iter().any(|d| *d < TOLERANCE) {
            return Err(GeometryError::Degenerate(format!(
                "box corners {lo:?} and {hi:?} do not span a volume"
            ))
            .into());
        }

        let c = |x: bool, y: bool, z: bool| {
            Point3::new(
                if x { hi.x } else { lo.x },
                if y { hi.y } else { lo.y },
                if z { hi.z } else { lo.z },
            )
        };
        let quads = [
            // bottom (-z), top (+z)
            [c(false, false, false), c(false, true, false), c(true, true, false), c(true, false, false)],
            [c(false, false, true), c(true, false, true), c(true, true, true), c(false, true, true)],
            // front (-y), back (+y)
            [c(false, false, false), c(true, false, false), c(true, false, true), c(false, false, true)],
            [c(false, true, false), c(false, true, true), c(true, true, true), c(true, true, false)],
            // left (-x), right (+x)
            [c(false, false, false), c(false, false, true), c(false, true, true), c(false, true, false)],
            [c(true, false, false), c(true, true, false), c(true, true, true), c(true, false, true)],
        ];

        let faces = quads
            .iter()
            .map(|quad| MakeFace::new(quad.to_vec(), vec![]).execute(store))
            .collect::<Result<Vec<_>>>()?;
        Ok(store.add_solid(SolidData::new(faces)))
    }
}
