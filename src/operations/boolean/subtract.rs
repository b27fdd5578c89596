use crate::error::Result;
use crate::topology::{SolidId, TopologyStore};

use super::complement::Complement;
use super::engine::boolean_intersect;

/// Computes the Boolean difference A − B, as A ∩ complement(B).
pub struct Subtract {
    solid_a: SolidId,
    solid_b: SolidId,
}

impl Subtract {
    /// Creates a new `Subtract` operation (A - B).
    #[must_use]
    pub fn new(solid_a: SolidId, solid_b: SolidId) -> Self {
        Self { solid_a, solid_b }
    }

    /// Executes the subtraction, creating the result solid in the topology store.
    ///
    /// Returns `None` if B covers A entirely.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::BooleanError`] if the operation cannot be resolved.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<Option<SolidId>> {
        let not_b = Complement::new(self.solid_b).execute(store)?;
        boolean_intersect(store, self.solid_a, not_b, [true, true])
    }
}
