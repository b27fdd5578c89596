use crate::error::Result;
use crate::topology::{SolidId, TopologyStore};

/// Geometric equality of two solids: same complement flag and a one-to-one
/// match between their faces under [`crate::topology::FaceData::like_face`].
pub struct Equals {
    first: SolidId,
    second: SolidId,
}

impl Equals {
    /// Creates a new `Equals` query.
    #[must_use]
    pub fn new(first: SolidId, second: SolidId) -> Self {
        Self { first, second }
    }

    /// Executes the comparison.
    ///
    /// # Errors
    ///
    /// Returns an error if either solid or one of its entities is missing.
    pub fn execute(&self, store: &TopologyStore) -> Result<bool> {
        let a = store.solid(self.first)?;
        let b = store.solid(self.second)?;
        if a.infinite_volume != b.infinite_volume || a.faces.len() != b.faces.len() {
            return Ok(false);
        }

        let mut matched = vec![false; b.faces.len()];
        for &fa in &a.faces {
            let face = store.face(fa)?;
            let mut found = false;
            for (k, &fb) in b.faces.iter().enumerate() {
                if !matched[k] && face.like_face(store.face(fb)?, store)? {
                    matched[k] = true;
                    found = true;
                    break;
                }
            }
            if !found {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
