mod extrude;
mod make_box;
mod make_face;
mod make_tetrahedron;

pub use extrude::Extrude;
pub use make_box::MakeBox;
pub use make_face::MakeFace;
pub use make_tetrahedron::MakeTetrahedron;
