use crate::error::Result;
use crate::math::{Matrix4, Vector3};
use crate::topology::{SolidId, TopologyStore};

use super::Transform;

/// Translates a solid by a displacement vector.
pub struct Translate {
    solid: SolidId,
    displacement: Vector3,
}

impl Translate {
    /// Creates a new `Translate` operation.
    #[must_use]
    pub fn new(solid: SolidId, displacement: Vector3) -> Self {
        Self {
            solid,
            displacement,
        }
    }

    /// Executes the translation, creating the moved copy in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid or one of its entities is missing.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        Transform::new(self.solid, Matrix4::new_translation(&self.displacement)).execute(store)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::boolean::{classify_point_in_solid, PointClassification};
    use crate::operations::creation::MakeBox;
    use crate::operations::query::Equals;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn translated_box_equals_box_built_there() {
        let mut store = TopologyStore::new();
        let a = MakeBox::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0)).execute(&mut store).unwrap();
        let moved = Translate::new(a, Vector3::new(2.0, 0.0, -1.0)).execute(&mut store).unwrap();
        let there = MakeBox::new(p(2.0, 0.0, -1.0), p(3.0, 1.0, 0.0)).execute(&mut store).unwrap();
        assert!(Equals::new(moved, there).execute(&store).unwrap());
        assert_eq!(
            classify_point_in_solid(&p(0.5, 0.5, 0.5), moved, &store).unwrap(),
            PointClassification::Outside
        );
    }
}
