use crate::error::{BooleanError, Result};
use crate::geometry::surface::Surface;
use crate::math::polygon_3d::signed_area_3d;
use crate::topology::{SolidId, TopologyStore};

/// Computes the enclosed volume of a bounded solid with planar faces.
///
/// Divergence theorem over the boundary: each face contributes
/// `(n · p) * area / 3` for its unit outward normal `n`, any point `p` on
/// it, and its signed area (holes subtract). Inner shells bounding voids
/// face inward and reduce the total.
pub struct Volume {
    solid: SolidId,
}

impl Volume {
    /// Creates a new `Volume` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the query, returning the volume.
    ///
    /// # Errors
    ///
    /// Returns [`BooleanError::Precondition`] for complemented solids and
    /// [`BooleanError::UnsupportedSurfacePair`] for curved faces.
    pub fn execute(&self, store: &TopologyStore) -> Result<f64> {
        let solid = store.solid(self.solid)?;
        if solid.infinite_volume {
            return Err(BooleanError::Precondition("volume of an unbounded solid".into()).into());
        }

        let mut volume = 0.0;
        for &face_id in &solid.faces {
            let face = store.face(face_id)?;
            let Some(plane) = face.surface.as_plane() else {
                return Err(BooleanError::UnsupportedSurfacePair {
                    first: "plane",
                    second: face.surface.kind_name(),
                }
                .into());
            };
            let normal = plane.plane_normal();
            let mut area = 0.0;
            for edges in face.loops() {
                area += signed_area_3d(&store.loop_points(edges)?, normal);
            }
            volume += normal.dot(&plane.origin().coords) * area;
        }
        Ok(volume / 3.0)
    }
}
