mod general;
mod translate;

pub use general::Transform;
pub use translate::Translate;
