use crate::error::Result;
use crate::topology::{SolidId, TopologyStore};

use super::engine::boolean_intersect;

/// Computes the Boolean intersection of two solids.
pub struct Intersect {
    solid_a: SolidId,
    solid_b: SolidId,
    keep: [bool; 2],
}

impl Intersect {
    /// Creates a new `Intersect` operation keeping faces from both solids.
    #[must_use]
    pub fn new(solid_a: SolidId, solid_b: SolidId) -> Self {
        Self {
            solid_a,
            solid_b,
            keep: [true, true],
        }
    }

    /// Restricts which operands contribute faces to the result.
    #[must_use]
    pub fn keep(mut self, keep_a: bool, keep_b: bool) -> Self {
        self.keep = [keep_a, keep_b];
        self
    }

    /// Executes the intersection, creating the result solid in the topology store.
    ///
    /// Returns `None` if the solids do not overlap.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::BooleanError`] if the operation cannot be
    /// resolved; the store is left unchanged in that case.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<Option<SolidId>> {
        boolean_intersect(store, self.solid_a, self.solid_b, self.keep)
    }
}
