use std::fmt;

use super::BodyId;

/// Errors raised while building or triangulating faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// A face needs at least three nodes.
    TooFewNodes { count: usize },
    /// The first three nodes are collinear (or coincident); no normal exists.
    Degenerate,
    /// Every candidate ear in the remaining ring was wound against the reference normal.
    NoValidEar { remaining: usize, attempts: usize },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewNodes { count } => {
                write!(f, "face must have at least 3 nodes (got {count})")
            }
            Self::Degenerate => write!(f, "face normal is undefined: first three nodes are collinear"),
            Self::NoValidEar { remaining, attempts } => write!(
                f,
                "no ear matches the face normal after {attempts} attempts ({remaining} nodes left)"
            ),
        }
    }
}

impl std::error::Error for GeometryError {}

/// Errors raised by [`ModelRegistry`](super::ModelRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// Every body slot is occupied.
    Full { capacity: usize },
    /// The id does not reference a live body.
    UnknownBody { id: BodyId },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full { capacity } => write!(f, "model registry is full ({capacity} bodies)"),
            Self::UnknownBody { id } => write!(f, "unknown body {id}"),
        }
    }
}

impl std::error::Error for RegistryError {}
