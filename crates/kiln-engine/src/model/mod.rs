//! Polygon model: faces, bodies, and the registry that mirrors them to the GPU.
//!
//! Data flow:
//! - callers build [`Face`]s (any convex N-gon) and [`triangulate_all`] them
//! - [`ModelRegistry::create_body`] stores the triangles in a [`Body`]
//! - [`Body::to_gpu`] uploads raster vertex streams (triangles + wireframe edges)
//! - [`ModelRegistry::to_compute`] packs every body into one shared storage buffer
//!   of [`FaceRecord`]s for the ray-tracing pass

mod body;
mod error;
mod face;
mod node;
mod record;
mod registry;
mod triangulate;

pub use body::{Body, DrawPasses};
pub use error::{GeometryError, RegistryError};
pub use face::Face;
pub use node::Node;
pub use record::{FaceRecord, NORMAL_TOLERANCE, misaligned_normals};
pub use registry::{BodyId, ModelRegistry, TriangleBinding};
pub use triangulate::triangulate_all;
