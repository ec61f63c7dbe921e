//! Vector math shared by the model, camera, and renderers.
//!
//! Linear algebra comes from `glam`; [`Position`] is the engine's point type.

mod position;

pub use glam::{Mat4, Vec3, Vec4};
pub use position::Position;
