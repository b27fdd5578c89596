pub mod curve;
pub mod surface;

pub use curve::{Curve, Line};
pub use surface::{Containment, Cylinder, FaceSurface, Plane, Surface};
