mod bounding_box;
mod equals;
mod is_valid;
mod point_in_solid;
mod volume;

pub use bounding_box::{Aabb, BoundingBox};
pub use equals::Equals;
pub use is_valid::IsValid;
pub use point_in_solid::PointInSolid;
pub use volume::Volume;
