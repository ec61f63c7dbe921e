//! Handle-based object storage.
//!
//! A [`HandleContainer`] owns every object it creates and hands out small
//! integer [`Handle`]s in exchange. Handles are stable until the object they
//! reference is destroyed; freed handles are reissued lowest-first.

mod error;
mod handle;
mod slots;

pub use error::ContainerError;
pub use handle::Handle;
pub use slots::{HandleContainer, MAX_CONTAINER_OBJECTS};
