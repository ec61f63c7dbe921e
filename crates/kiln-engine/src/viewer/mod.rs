//! Interactive model viewer: the [`App`](crate::core::App) that ties the model
//! registry, camera and renderers together.

mod controls;
mod app;

pub use controls::{ViewerCommand, key_command, orbit_direction};
pub use app::Viewer;
