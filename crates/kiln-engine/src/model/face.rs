use crate::math::Position;

use super::triangulate;
use super::{GeometryError, Node};

/// A planar polygon: an ordered ring of at least three nodes plus a unit normal.
///
/// The normal is the winding authority for triangulation. When derived, it is
/// `normalize((n0 - n1) x (n1 - n2))`, i.e. counter-clockwise rings face the viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    normal: Position,
    nodes: Vec<Node>,
}

impl Face {
    /// Builds a face and derives its normal from the first three nodes.
    pub fn new(nodes: Vec<Node>) -> Result<Self, GeometryError> {
        ensure_ring(&nodes)?;
        let normal = ring_normal(&nodes).ok_or(GeometryError::Degenerate)?;
        Ok(Self { normal, nodes })
    }

    /// Builds a face with a caller-supplied normal.
    ///
    /// The normal is stored as given; callers are expected to pass a unit vector.
    pub fn with_normal(nodes: Vec<Node>, normal: Position) -> Result<Self, GeometryError> {
        ensure_ring(&nodes)?;
        Ok(Self { normal, nodes })
    }

    pub fn triangle(a: Node, b: Node, c: Node) -> Result<Self, GeometryError> {
        Self::new(vec![a, b, c])
    }

    /// Convenience constructor from raw XYZ triples.
    pub fn from_points(points: &[[f32; 3]]) -> Result<Self, GeometryError> {
        Self::new(points.iter().map(|&p| Node::from(Position::from(p))).collect())
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn normal(&self) -> Position {
        self.normal
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn is_triangle(&self) -> bool {
        self.nodes.len() == 3
    }

    /// Splits this face into triangles wound consistently with its normal.
    pub fn triangulate(&self) -> Result<Vec<Face>, GeometryError> {
        triangulate::triangulate(self)
    }
}

fn ensure_ring(nodes: &[Node]) -> Result<(), GeometryError> {
    if nodes.len() < 3 {
        return Err(GeometryError::TooFewNodes { count: nodes.len() });
    }
    Ok(())
}

fn ring_normal(nodes: &[Node]) -> Option<Position> {
    let uv1 = nodes[0] - nodes[1];
    let uv2 = nodes[1] - nodes[2];
    uv1.cross(uv2).normalized()
}
