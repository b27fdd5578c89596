use super::face::FaceId;

slotmap::new_key_type! {
    /// Unique identifier for a solid in the topology store.
    pub struct SolidId;
}

/// Data associated with a topological solid.
///
/// The region bounded by `faces`. When `infinite_volume` is set the solid
/// is the complement of that bounded region ("everything outside").
#[derive(Debug, Clone, Default)]
pub struct SolidData {
    /// Boundary faces, each oriented with its normal pointing out of the material.
    pub faces: Vec<FaceId>,
    /// `true` if the solid extends to infinity.
    pub infinite_volume: bool,
}

impl SolidData {
    /// Creates a bounded solid from its faces.
    #[must_use]
    pub fn new(faces: Vec<FaceId>) -> Self {
        Self {
            faces,
            infinite_volume: false,
        }
    }

    /// Returns `true` if the solid has no boundary.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}
