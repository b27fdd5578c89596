pub mod edge;
pub mod face;
pub mod solid;

pub use edge::{EdgeData, EdgeId};
pub use face::{FaceData, FaceId};
pub use solid::{SolidData, SolidId};

use crate::error::TopologyError;
use crate::math::Point3;
use slotmap::SlotMap;

/// Central arena that owns all topological entities.
///
/// Entities reference each other via typed IDs (generational indices).
/// Nothing in the arena is mutated by a Boolean operation: results are
/// inserted as new entities and inputs stay valid for further use.
#[derive(Debug, Default)]
pub struct TopologyStore {
    edges: SlotMap<EdgeId, EdgeData>,
    faces: SlotMap<FaceId, FaceData>,
    solids: SlotMap<SolidId, SolidData>,
}

impl TopologyStore {
    /// Creates a new, empty topology store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Edge operations ---

    /// Inserts an edge and returns its ID.
    pub fn add_edge(&mut self, data: EdgeData) -> EdgeId {
        self.edges.insert(data)
    }

    /// Returns a reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData, TopologyError> {
        self.edges
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()))
    }

    /// Start points of a loop's edges, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if any edge is missing from the store.
    pub fn loop_points(&self, edges: &[EdgeId]) -> Result<Vec<Point3>, TopologyError> {
        edges.iter().map(|&e| Ok(self.edge(e)?.a)).collect()
    }

    // --- Face operations ---

    /// Inserts a face and returns its ID.
    pub fn add_face(&mut self, data: FaceData) -> FaceId {
        self.faces.insert(data)
    }

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn face(&self, id: FaceId) -> Result<&FaceData, TopologyError> {
        self.faces
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()))
    }

    // --- Solid operations ---

    /// Inserts a solid and returns its ID.
    pub fn add_solid(&mut self, data: SolidData) -> SolidId {
        self.solids.insert(data)
    }

    /// Returns a reference to the solid data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn solid(&self, id: SolidId) -> Result<&SolidData, TopologyError> {
        self.solids
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("solid".into()))
    }

    /// Every edge of every face of a solid, paired with its owning face.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid or one of its faces is missing.
    pub fn solid_edges(&self, id: SolidId) -> Result<Vec<(FaceId, EdgeId)>, TopologyError> {
        let mut out = Vec::new();
        for &face_id in &self.solid(id)?.faces {
            let face = self.face(face_id)?;
            out.extend(face.all_edges().map(|e| (face_id, e)));
        }
        Ok(out)
    }
}
