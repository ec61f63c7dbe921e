use core::ops::Sub;

use crate::math::Position;

/// A vertex of a [`Face`](super::Face).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Node {
    pub position: Position,
}

impl Node {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { position: Position::new(x, y, z) }
    }
}

impl From<Position> for Node {
    #[inline]
    fn from(position: Position) -> Self {
        Self { position }
    }
}

impl Sub for Node {
    type Output = Position;
    #[inline]
    fn sub(self, rhs: Node) -> Position {
        self.position - rhs.position
    }
}
