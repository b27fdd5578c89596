use tracing::debug;

use crate::error::{GeometryError, Result};
use crate::geometry::surface::Surface;
use crate::math::{Matrix4, TOLERANCE};
use crate::topology::{EdgeData, EdgeId, FaceData, SolidData, SolidId, TopologyStore};

/// Applies an arbitrary affine 4x4 matrix to a solid.
///
/// The input is left untouched; a transformed copy is added to the store.
/// Mirroring matrices (negative determinant) keep normals pointing away
/// from the material by reversing every face.
pub struct Transform {
    solid: SolidId,
    matrix: Matrix4,
}

impl Transform {
    /// Creates a new `Transform` operation.
    #[must_use]
    pub fn new(solid: SolidId, matrix: Matrix4) -> Self {
        Self { solid, matrix }
    }

    /// Executes the transformation, creating the new solid in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if the matrix is singular, if any entity is missing,
    /// or if an edge or surface degenerates under the transform.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        let det = self.matrix.fixed_view::<3, 3>(0, 0).determinant();
        if det.abs() < TOLERANCE {
            return Err(GeometryError::Degenerate(
                "transform matrix is singular".to_owned(),
            )
            .into());
        }
        let mirrored = det < 0.0;

        let data = store.solid(self.solid)?.clone();
        let mut faces = Vec::with_capacity(data.faces.len());
        for &id in &data.faces {
            let face = store.face(id)?.clone();
            let mut surface = face.surface.transform(&self.matrix)?;
            if mirrored {
                surface = surface.flipped();
            }
            let contour = self.transform_loop(store, &face.contour, mirrored)?;
            let holes = face
                .holes
                .iter()
                .map(|h| self.transform_loop(store, h, mirrored))
                .collect::<Result<Vec<_>>>()?;
            faces.push(store.add_face(FaceData {
                surface,
                contour,
                holes,
            }));
        }
        debug!(faces = faces.len(), mirrored, "solid transformed");

        Ok(store.add_solid(SolidData {
            faces,
            infinite_volume: data.infinite_volume,
        }))
    }

    fn transform_loop(
        &self,
        store: &mut TopologyStore,
        edges: &[EdgeId],
        mirrored: bool,
    ) -> Result<Vec<EdgeId>> {
        let mut moved = edges
            .iter()
            .map(|&e| store.edge(e)?.transform(&self.matrix))
            .collect::<Result<Vec<EdgeData>>>()?;
        if mirrored {
            moved = moved.into_iter().rev().map(|e| e.flipped()).collect();
        }
        Ok(moved.into_iter().map(|e| store.add_edge(e)).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::{Point3, Vector3};
    use crate::operations::creation::MakeBox;
    use crate::operations::query::{IsValid, Volume};

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn scaling_scales_volume() {
        let mut store = TopologyStore::new();
        let a = MakeBox::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0)).execute(&mut store).unwrap();
        let m = Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 3.0, 1.0));
        let b = Transform::new(a, m).execute(&mut store).unwrap();
        assert_ne!(a, b);
        assert_relative_eq!(Volume::new(b).execute(&store).unwrap(), 6.0, epsilon = 1e-9);
        assert_relative_eq!(Volume::new(a).execute(&store).unwrap(), 1.0, epsilon = 1e-9);
        assert!(IsValid::new(b).execute(&store).unwrap());
    }

    #[test]
    fn mirroring_keeps_faces_outward() {
        let mut store = TopologyStore::new();
        let a = MakeBox::new(p(0.0, 0.0, 0.0), p(1.0, 2.0, 3.0)).execute(&mut store).unwrap();
        let m = Matrix4::new_nonuniform_scaling(&Vector3::new(-1.0, 1.0, 1.0));
        let b = Transform::new(a, m).execute(&mut store).unwrap();
        assert_relative_eq!(Volume::new(b).execute(&store).unwrap(), 6.0, epsilon = 1e-9);
        assert!(IsValid::new(b).execute(&store).unwrap());
    }

    #[test]
    fn singular_matrix_is_rejected() {
        let mut store = TopologyStore::new();
        let a = MakeBox::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0)).execute(&mut store).unwrap();
        let m = Matrix4::new_nonuniform_scaling(&Vector3::new(1.0, 0.0, 1.0));
        assert!(Transform::new(a, m).execute(&mut store).is_err());
    }
}
