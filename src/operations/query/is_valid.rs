use crate::error::Result;
use crate::geometry::surface::{Containment, Surface};
use crate::math::TOLERANCE;
use crate::topology::{EdgeData, SolidId, TopologyStore};

/// Validates the topological and geometric consistency of a solid.
///
/// Every loop must close, contours must wind counterclockwise and holes
/// clockwise around the face normal, each hole must lie inside its contour,
/// and every edge must be matched by opposite edges of other faces (the
/// boundary is watertight).
pub struct IsValid {
    solid: SolidId,
}

impl IsValid {
    /// Creates a new `IsValid` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the validation, returning `true` if the solid is valid.
    ///
    /// # Errors
    ///
    /// Returns an error if an entity referenced by the solid is missing.
    pub fn execute(&self, store: &TopologyStore) -> Result<bool> {
        let solid = store.solid(self.solid)?;
        let edges = store.solid_edges(self.solid)?;

        for &face_id in &solid.faces {
            let face = store.face(face_id)?;
            if face.validate(store).is_err() {
                return Ok(false);
            }
            let contour = store.loop_points(&face.contour)?;
            if !face.surface.edge_loop_ccw(&contour) {
                return Ok(false);
            }
            for hole in &face.holes {
                let points = store.loop_points(hole)?;
                let inside = points
                    .iter()
                    .all(|q| face.surface.loop_contains_point(&contour, q) != Containment::Outside);
                if face.surface.edge_loop_ccw(&points) || !inside {
                    return Ok(false);
                }
            }
        }

        for &(owner, id) in &edges {
            let edge = store.edge(id)?;
            let mut covered = 0.0;
            for &(other, other_id) in &edges {
                if other != owner {
                    covered += opposite_overlap(store.edge(other_id)?, edge);
                }
            }
            if covered < edge.length() - TOLERANCE {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Length of `edge` that `cover` runs along in the opposite direction.
///
/// Faces rebuilt independently may split a shared boundary at different
/// points, so co-edges need not match one-to-one.
fn opposite_overlap(cover: &EdgeData, edge: &EdgeData) -> f64 {
    if !cover.colinear_to(&edge.line) || cover.direction().dot(&edge.direction()) >= 0.0 {
        return 0.0;
    }
    let (lo, hi) = (edge.a_t.min(edge.b_t), edge.a_t.max(edge.b_t));
    let (ca, cb) = (edge.param_of(&cover.a), edge.param_of(&cover.b));
    (hi.min(ca.max(cb)) - lo.max(ca.min(cb))).max(0.0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::creation::{MakeBox, MakeFace};
    use crate::topology::SolidData;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn box_is_valid() {
        let mut store = TopologyStore::new();
        let solid = MakeBox::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0)).execute(&mut store).unwrap();
        assert!(IsValid::new(solid).execute(&store).unwrap());
    }

    #[test]
    fn open_shell_is_invalid() {
        let mut store = TopologyStore::new();
        let solid = MakeBox::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0)).execute(&mut store).unwrap();
        let mut faces = store.solid(solid).unwrap().faces.clone();
        faces.pop();
        let open = store.add_solid(SolidData::new(faces));
        assert!(!IsValid::new(open).execute(&store).unwrap());
    }

    #[test]
    fn hole_outside_contour_is_invalid() {
        let mut store = TopologyStore::new();
        let face = MakeFace::new(
            vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(0.0, 1.0, 0.0)],
            vec![vec![p(2.0, 2.0, 0.0), p(3.0, 2.0, 0.0), p(3.0, 3.0, 0.0), p(2.0, 3.0, 0.0)]],
        )
        .execute(&mut store)
        .unwrap();
        let solid = store.add_solid(SolidData::new(vec![face]));
        assert!(!IsValid::new(solid).execute(&store).unwrap());
    }
}
