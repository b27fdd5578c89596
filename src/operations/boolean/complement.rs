use crate::error::Result;
use crate::geometry::surface::Surface;
use crate::topology::{FaceData, FaceId, SolidData, SolidId, TopologyStore};

/// Computes the complement of a solid: every face reversed and the
/// infinite-volume flag toggled.
pub struct Complement {
    solid: SolidId,
}

impl Complement {
    /// Creates a new `Complement` operation.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the operation, creating the complemented solid in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid or one of its entities is missing.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        let data = store.solid(self.solid)?.clone();
        let faces = data
            .faces
            .iter()
            .map(|&id| flip_face(store, id))
            .collect::<Result<Vec<_>>>()?;
        Ok(store.add_solid(SolidData {
            faces,
            infinite_volume: !data.infinite_volume,
        }))
    }
}

/// Adds a reversed copy of a face: flipped surface, loops traversed backwards.
fn flip_face(store: &mut TopologyStore, id: FaceId) -> Result<FaceId> {
    let face = store.face(id)?.clone();
    let mut flip_loop = |edges: &[crate::topology::EdgeId]| -> Result<Vec<_>> {
        let flipped = edges
            .iter()
            .rev()
            .map(|&e| Ok(store.edge(e)?.flipped()))
            .collect::<Result<Vec<_>>>()?;
        Ok(flipped.into_iter().map(|e| store.add_edge(e)).collect())
    };
    let contour = flip_loop(&face.contour)?;
    let holes = face
        .holes
        .iter()
        .map(|h| flip_loop(h))
        .collect::<Result<Vec<_>>>()?;
    Ok(store.add_face(FaceData {
        surface: face.surface.flipped(),
        contour,
        holes,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::boolean::{classify_point_in_solid, Intersect, PointClassification};
    use crate::operations::creation::MakeBox;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn complement_inverts_membership() {
        let mut store = TopologyStore::new();
        let a = MakeBox::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0)).execute(&mut store).unwrap();
        let c = Complement::new(a).execute(&mut store).unwrap();
        assert!(store.solid(c).unwrap().infinite_volume);
        assert_eq!(
            classify_point_in_solid(&p(0.5, 0.5, 0.5), c, &store).unwrap(),
            PointClassification::Outside
        );
        assert_eq!(
            classify_point_in_solid(&p(3.0, 0.5, 0.5), c, &store).unwrap(),
            PointClassification::Inside
        );
        let back = Complement::new(c).execute(&mut store).unwrap();
        assert!(!store.solid(back).unwrap().infinite_volume);
    }

    #[test]
    fn solid_and_its_complement_do_not_intersect() {
        let mut store = TopologyStore::new();
        let a = MakeBox::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0)).execute(&mut store).unwrap();
        let c = Complement::new(a).execute(&mut store).unwrap();
        assert!(Intersect::new(a, c).execute(&mut store).unwrap().is_none());
    }
}
