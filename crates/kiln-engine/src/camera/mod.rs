//! Orbit camera looking at a fixed target.

mod config;
mod orbit;

pub use config::CameraConfig;
pub use orbit::Camera;
