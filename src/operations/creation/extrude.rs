use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::topology::{FaceId, SolidData, SolidId, TopologyStore};

use super::make_face::polygon_normal;
use super::MakeFace;

/// Extrudes a planar face along a direction vector to create a prism.
///
/// Holes in the face become through-holes of the prism.
pub struct Extrude {
    face: FaceId,
    direction: Vector3,
}

impl Extrude {
    /// Creates a new `Extrude` operation.
    #[must_use]
    pub fn new(face: FaceId, direction: Vector3) -> Self {
        Self { face, direction }
    }

    /// Executes the extrusion, creating the solid in the topology store.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if the direction is zero-length
    /// or parallel to the face.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        if self.direction.norm() < TOLERANCE {
            return Err(GeometryError::Degenerate("extrude direction must be non-zero".into()).into());
        }

        let face = store.face(self.face)?;
        let mut contour = store.loop_points(&face.contour)?;
        let mut holes = face
            .holes
            .iter()
            .map(|h| store.loop_points(h))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let normal = polygon_normal(&contour)?;
        let along = normal.dot(&self.direction);
        if along.abs() < TOLERANCE {
            return Err(GeometryError::Degenerate("extrude direction lies in the face".into()).into());
        }
        // base loops wind counterclockwise around the direction (holes clockwise),
        // so the bottom is the reversed base and side quads face outward
        if along < 0.0 {
            contour.reverse();
            holes.iter_mut().for_each(|h| h.reverse());
        }

        let shift = |pts: &[Point3]| pts.iter().map(|q| q + self.direction).collect::<Vec<_>>();
        let reversed = |pts: &[Point3]| pts.iter().rev().copied().collect::<Vec<_>>();

        let mut faces = Vec::with_capacity(contour.len() + 2);
        faces.push(MakeFace::new(reversed(&contour), holes.clone()).execute(store)?);
        faces.push(
            MakeFace::new(shift(&contour), holes.iter().map(|h| shift(h)).collect()).execute(store)?,
        );

        for base in std::iter::once(&contour).chain(holes.iter()) {
            let top = shift(base);
            let n = base.len();
            for i in 0..n {
                let j = (i + 1) % n;
                let quad = vec![base[i], base[j], top[j], top[i]];
                faces.push(MakeFace::new(quad, vec![]).execute(store)?);
            }
        }

        Ok(store.add_solid(SolidData::new(faces)))
    }
}
