//! GPU rendering subsystem.
//!
//! Two ways to show the registry's bodies:
//! - [`MeshPasses`]: rasterized faces and wireframe edges from each body's vertex buffers
//! - [`RayTracer`]: a compute pass casting one ray per pixel against the shared triangle buffer
//!
//! Shaders are WGSL under `shaders/`, validated with naga before pipeline creation.

mod color;
mod ctx;
mod mesh;
mod program;
mod raytrace;
mod settings;

pub use color::Color;
pub use ctx::{RenderCtx, RenderTarget};
pub use mesh::MeshPasses;
pub use program::{
    Program, ProgramError, UniformBlock, UniformKind, UniformLayout, UniformValue, validate_wgsl,
};
pub use raytrace::{RayTracer, TraceBindings, fit_trace_size};
pub use settings::RenderSettings;
