//! GPU device + surface management.
//!
//! Creates the wgpu Instance/Adapter/Device/Queue for one window, keeps the
//! surface configured across resizes, and hands out per-frame encoders.
//! [`GpuHandle`] is the owning slot every renderer and body stores its
//! buffers in.

mod context;
mod frame;
mod handle;
mod init;
mod surface;

pub use context::Gpu;
pub use frame::{GpuFrame, SurfaceErrorAction};
pub use handle::{GpuHandle, release_buffer};
pub use init::GpuInit;
