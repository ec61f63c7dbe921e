use bytemuck::{Pod, Zeroable};

use crate::math::Position;

use super::Face;

/// Maximum `|normal . edge|` (against unit edges) accepted by the sanity pass.
pub const NORMAL_TOLERANCE: f32 = 1e-3;

/// One triangle as consumed by the ray-tracing compute shader.
///
/// Mirrors the WGSL declaration
/// `struct Triangle { normal: vec4<f32>, nodes: array<vec4<f32>, 3> }`
/// byte for byte: four tightly packed `vec4<f32>`, `w = 0`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct FaceRecord {
    pub normal: [f32; 4],
    pub nodes: [[f32; 4]; 3],
}

const _: () = assert!(std::mem::size_of::<FaceRecord>() == 64);

impl FaceRecord {
    /// Packs the normal and first three nodes of `face`.
    pub fn from_face(face: &Face) -> Self {
        let nodes = face.nodes();
        Self {
            normal: pad(face.normal()),
            nodes: [
                pad(nodes[0].position),
                pad(nodes[1].position),
                pad(nodes[2].position),
            ],
        }
    }

    #[inline]
    pub fn normal(&self) -> Position {
        unpad(self.normal)
    }

    #[inline]
    pub fn node(&self, i: usize) -> Position {
        unpad(self.nodes[i])
    }

    /// Largest deviation of the normal from the triangle plane, measured as
    /// `|n . e|` over the three unit edge directions. Zero-length edges are ignored.
    pub fn plane_deviation(&self) -> f32 {
        let n = self.normal();
        (0..3)
            .filter_map(|i| (self.node((i + 1) % 3) - self.node(i)).normalized())
            .map(|edge| n.dot(edge).abs())
            .fold(0.0, |worst, d| if d.is_nan() || d > worst { d } else { worst })
    }
}

/// Returns indices of records whose normal is not orthogonal to their own edges.
pub fn misaligned_normals(records: &[FaceRecord], tolerance: f32) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| {
            let deviation = r.plane_deviation();
            deviation.is_nan() || deviation > tolerance
        })
        .map(|(i, _)| i)
        .collect()
}

#[inline]
fn pad(p: Position) -> [f32; 4] {
    [p.x(), p.y(), p.z(), 0.0]
}

#[inline]
fn unpad(v: [f32; 4]) -> Position {
    Position::new(v[0], v[1], v[2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Node;

    fn tri() -> Face {
        Face::from_points(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]).unwrap()
    }

    #[test]
    fn layout_is_four_packed_vec4() {
        assert_eq!(std::mem::size_of::<FaceRecord>(), 64);
        assert_eq!(std::mem::align_of::<FaceRecord>(), 4);

        let record = FaceRecord::from_face(&tri());
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&record));
        assert_eq!(
            floats,
            &[
                0.0, 0.0, 1.0, 0.0, // normal
                0.0, 0.0, 0.0, 0.0, // node 0
                1.0, 0.0, 0.0, 0.0, // node 1
                0.0, 1.0, 0.0, 0.0, // node 2
            ]
        );
    }

    #[test]
    fn well_formed_triangle_passes_sanity() {
        let record = FaceRecord::from_face(&tri());
        assert_eq!(record.plane_deviation(), 0.0);
        assert!(misaligned_normals(&[record], NORMAL_TOLERANCE).is_empty());
    }

    #[test]
    fn tilted_normal_is_reported() {
        let good = FaceRecord::from_face(&tri());
        let nodes = tri().nodes().to_vec();
        let bad_face = Face::with_normal(nodes, Position::new(0.0, 0.6, 0.8)).unwrap();
        let bad = FaceRecord::from_face(&bad_face);

        assert_eq!(misaligned_normals(&[good, bad, good], NORMAL_TOLERANCE), vec![1]);
    }

    #[test]
    fn nan_normal_is_reported() {
        let nodes = vec![
            Node::new(0.0, 0.0, 0.0),
            Node::new(1.0, 0.0, 0.0),
            Node::new(0.0, 1.0, 0.0),
        ];
        let face = Face::with_normal(nodes, Position::new(f32::NAN, 0.0, 0.0)).unwrap();
        assert_eq!(misaligned_normals(&[FaceRecord::from_face(&face)], NORMAL_TOLERANCE), vec![0]);
    }
}
