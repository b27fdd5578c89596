use crate::error::Result;
use crate::topology::{SolidId, TopologyStore};

use super::complement::Complement;
use super::engine::boolean_intersect;

/// Computes the Boolean union of two solids, as
/// complement(complement(A) ∩ complement(B)).
pub struct Union {
    solid_a: SolidId,
    solid_b: SolidId,
}

impl Union {
    /// Creates a new `Union` operation.
    #[must_use]
    pub fn new(solid_a: SolidId, solid_b: SolidId) -> Self {
        Self { solid_a, solid_b }
    }

    /// Executes the union, creating the result solid in the topology store.
    ///
    /// Coplanar neighbouring faces of the result are not merged.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::BooleanError`] if the operation cannot be resolved.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<Option<SolidId>> {
        let not_a = Complement::new(self.solid_a).execute(store)?;
        let not_b = Complement::new(self.solid_b).execute(store)?;
        match boolean_intersect(store, not_a, not_b, [true, true])? {
            Some(outside) => Ok(Some(Complement::new(outside).execute(store)?)),
            None => Ok(None),
        }
    }
}
