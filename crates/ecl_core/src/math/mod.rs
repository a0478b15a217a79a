//! Math types used for object placement

mod quat;
mod vec3;

pub use quat::Quat;
pub use vec3::Vec3;
