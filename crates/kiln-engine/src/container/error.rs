use std::fmt;

use super::Handle;

/// Errors raised by [`HandleContainer`](super::HandleContainer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerError {
    /// The handle does not reference a live object (never issued, already
    /// destroyed, or beyond the container capacity).
    OutOfRange { id: Handle },
}

impl fmt::Display for ContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { id } => write!(f, "invalid object id: {}", id.raw()),
        }
    }
}

impl std::error::Error for ContainerError {}
