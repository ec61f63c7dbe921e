use crate::math::Position;

use super::{Face, GeometryError, Node};

/// Splits `face` into triangles by advancing along its ring and clipping ears.
///
/// A candidate ear `(n[s], n[s+1], n[s+2])` is accepted when its winding agrees
/// with the face normal; its middle node is then removed. Rejected candidates
/// rotate the start index instead. After `len` consecutive rejections on a ring
/// of `len` nodes the input cannot be triangulated and an error is returned.
///
/// Intended for convex or near-convex faces. Every emitted triangle derives its
/// normal from its own nodes; collinear ears keep the parent normal.
pub(super) fn triangulate(face: &Face) -> Result<Vec<Face>, GeometryError> {
    let mut ring = face.nodes().to_vec();
    if ring.len() < 3 {
        return Err(GeometryError::TooFewNodes { count: ring.len() });
    }

    let normal = face.normal();
    let mut triangles = Vec::with_capacity(ring.len() - 2);
    let mut start = 0usize;
    let mut rejected = 0usize;

    while ring.len() > 3 {
        let len = ring.len();
        let (i0, i1, i2) = (start % len, (start + 1) % len, (start + 2) % len);
        let (first, second, third) = (ring[i0], ring[i1], ring[i2]);

        let winding = (second - first).cross(third - second).dot(normal);
        if winding < 0.0 {
            rejected += 1;
            if rejected >= len {
                return Err(GeometryError::NoValidEar { remaining: len, attempts: rejected });
            }
            start = (start + 1) % len;
            continue;
        }

        rejected = 0;
        triangles.push(ear(vec![first, second, third], normal)?);
        ring.remove(i1);
        start = (start + 1) % ring.len();
    }

    triangles.push(ear(ring, normal)?);
    Ok(triangles)
}

/// Triangle with a normal derived from its own nodes; a collinear ear keeps
/// `parent_normal`.
fn ear(nodes: Vec<Node>, parent_normal: Position) -> Result<Face, GeometryError> {
    match Face::new(nodes.clone()) {
        Err(GeometryError::Degenerate) => Face::with_normal(nodes, parent_normal),
        other => other,
    }
}

/// Triangulates every face, preserving face order.
pub fn triangulate_all(faces: &[Face]) -> Result<Vec<Face>, GeometryError> {
    let mut out = Vec::with_capacity(faces.len() * 2);
    for face in faces {
        out.extend(triangulate(face)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::Position;
    use crate::model::{FaceRecord, NORMAL_TOLERANCE, Node, misaligned_normals};

    fn signed_area(tri: &Face) -> f32 {
        let n = tri.nodes();
        (n[1] - n[0]).cross(n[2] - n[1]).dot(tri.normal()) * 0.5
    }

    fn points(face: &Face) -> Vec<[f32; 3]> {
        face.nodes().iter().map(|n| n.position.to_array()).collect()
    }

    fn regular_polygon(sides: usize, radius: f32) -> Face {
        let pts: Vec<[f32; 3]> = (0..sides)
            .map(|i| {
                let a = i as f32 / sides as f32 * std::f32::consts::TAU;
                [radius * a.cos(), radius * a.sin(), 0.0]
            })
            .collect();
        Face::from_points(&pts).unwrap()
    }

    // ── pass-through ──────────────────────────────────────────────────────

    #[test]
    fn triangle_is_returned_unchanged() {
        let tri = Face::from_points(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]).unwrap();
        let out = tri.triangulate().unwrap();
        assert_eq!(out, vec![tri]);
    }

    // ── convex input ──────────────────────────────────────────────────────

    #[test]
    fn square_becomes_a_fan_from_node_zero() {
        let quad = Face::from_points(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ])
        .unwrap();

        let out = quad.triangulate().unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(points(&out[0]), vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]);
        assert_eq!(points(&out[1]), vec![[0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]);
        for tri in &out {
            assert_eq!(tri.normal(), Position::new(0.0, 0.0, 1.0));
        }
    }

    #[test]
    fn hexagon_covers_the_same_area() {
        let hex = regular_polygon(6, 2.0);
        let out = hex.triangulate().unwrap();

        assert_eq!(out.len(), 4);
        let total: f32 = out.iter().map(signed_area).sum();
        // Regular hexagon area: (3 * sqrt(3) / 2) * r^2.
        assert_relative_eq!(total, 1.5 * 3f32.sqrt() * 4.0, epsilon = 1e-4);
        for tri in &out {
            assert!(tri.is_triangle());
            assert!(signed_area(tri) > 0.0);
        }
    }

    #[test]
    fn n_gon_yields_n_minus_two_triangles() {
        for sides in 3..12 {
            let out = regular_polygon(sides, 1.0).triangulate().unwrap();
            assert_eq!(out.len(), sides - 2, "sides = {sides}");
        }
    }

    // ── orientation handling ──────────────────────────────────────────────

    #[test]
    fn reflex_candidate_is_skipped() {
        // Concave dart; the ring starts on the ear whose middle node is reflex.
        let p0 = Node::new(0.0, 0.0, 0.0);
        let p1 = Node::new(4.0, 0.0, 0.0);
        let p2 = Node::new(1.0, 1.0, 0.0);
        let p3 = Node::new(0.0, 4.0, 0.0);
        let face = Face::with_normal(vec![p1, p2, p3, p0], Position::new(0.0, 0.0, 1.0)).unwrap();

        let out = face.triangulate().unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].nodes(), &[p2, p3, p0]);
        assert_eq!(out[1].nodes(), &[p1, p2, p0]);

        let total: f32 = out.iter().map(signed_area).sum();
        assert_relative_eq!(total, 4.0, epsilon = 1e-5);
    }

    #[test]
    fn misoriented_ring_fails_instead_of_looping() {
        // Clockwise ring paired with a normal that claims counter-clockwise.
        let nodes = vec![
            Node::new(0.0, 0.0, 0.0),
            Node::new(0.0, 1.0, 0.0),
            Node::new(1.0, 1.0, 0.0),
            Node::new(1.0, 0.0, 0.0),
        ];
        let face = Face::with_normal(nodes, Position::new(0.0, 0.0, 1.0)).unwrap();

        let err = face.triangulate().unwrap_err();
        assert_eq!(err, GeometryError::NoValidEar { remaining: 4, attempts: 4 });
    }

    // ── per-triangle normals ──────────────────────────────────────────────

    #[test]
    fn near_planar_quad_gets_normals_from_each_triangle() {
        // Third corner lifted slightly off the plane of the others.
        let quad = Face::from_points(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.05],
            [0.0, 1.0, 0.0],
        ])
        .unwrap();

        let out = quad.triangulate().unwrap();
        assert_eq!(out.len(), 2);
        assert_ne!(out[0].normal(), out[1].normal());

        let records: Vec<FaceRecord> = out.iter().map(FaceRecord::from_face).collect();
        assert!(misaligned_normals(&records, NORMAL_TOLERANCE).is_empty());
        for tri in &out {
            assert_relative_eq!(tri.normal().length(), 1.0, epsilon = 1e-6);
            assert!(tri.normal().dot(quad.normal()) > 0.9);
        }
    }

    #[test]
    fn collinear_ear_keeps_parent_normal() {
        let up = Position::new(0.0, 0.0, 1.0);
        let face = Face::with_normal(
            vec![
                Node::new(0.0, 0.0, 0.0),
                Node::new(1.0, 0.0, 0.0),
                Node::new(2.0, 0.0, 0.0),
                Node::new(2.0, 2.0, 0.0),
                Node::new(0.0, 2.0, 0.0),
            ],
            up,
        )
        .unwrap();

        let out = face.triangulate().unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(points(&out[0]), vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        for tri in &out {
            assert_eq!(tri.normal(), up);
        }
    }

    // ── batches ───────────────────────────────────────────────────────────

    #[test]
    fn triangulate_all_keeps_face_order() {
        let quad = Face::from_points(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ])
        .unwrap();
        let tri = Face::from_points(&[[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]]).unwrap();

        let out = triangulate_all(&[quad, tri.clone()]).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[2], tri);
    }
}
