//! Boolean operations on boundary representations.
//!
//! Intersection is the primitive: every pair of faces is cut along the
//! curve where their surfaces meet, the stretches of that curve lying in
//! both faces become new boundary edges, surviving pieces are walked into
//! loops, and untouched faces are decided by flood fill. Difference and
//! union are expressed through complements.

mod assemble;
mod classify;
mod complement;
mod engine;
mod intersect_op;
mod registry;
mod scan;
mod subtract;
mod sweep;
mod union;

pub use assemble::{FaceRebuild, FaceStatus, LoopAssembler, RebuiltFace};
pub use classify::{
    classify_point_in_solid, ConeClass, Operand, PointClassification, SideClass, SideClassifier,
};
pub use complement::Complement;
pub use engine::boolean_intersect;
pub use intersect_op::Intersect;
pub use registry::{CrossingRegistry, SubEdge};
pub use scan::{crossing_order, scan, sort_crossings, CrossingPoint};
pub use subtract::Subtract;
pub use sweep::{merge, SweepSpan};
pub use union::Union;
