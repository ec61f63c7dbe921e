//! Demo bodies. Every face is wound counter-clockwise seen from outside.

use std::f32::consts::TAU;

use kiln_engine::model::{Face, GeometryError, triangulate_all};

/// A named shape, still in polygon form.
pub struct Shape {
    pub name: &'static str,
    pub faces: Vec<Face>,
}

impl Shape {
    /// Splits every face into triangles, ready for `ModelRegistry::create_body`.
    pub fn triangles(&self) -> Result<Vec<Face>, GeometryError> {
        triangulate_all(&self.faces)
    }
}

/// Cube, pyramid and hexagonal prism side by side along X.
pub fn demo_scene() -> Result<Vec<Shape>, GeometryError> {
    Ok(vec![
        Shape { name: "cube", faces: cube([-1.5, 0.0, 0.0], 1.0)? },
        Shape { name: "pyramid", faces: pyramid([0.0, 0.0, 0.0], 1.0)? },
        Shape { name: "hex prism", faces: hex_prism([1.5, 0.0, 0.0], 0.5, 1.0)? },
    ])
}

fn at(center: [f32; 3], x: f32, y: f32, z: f32) -> [f32; 3] {
    [center[0] + x, center[1] + y, center[2] + z]
}

/// Axis-aligned cube of edge `size` built from six quads.
pub fn cube(center: [f32; 3], size: f32) -> Result<Vec<Face>, GeometryError> {
    let h = size / 2.0;
    let p = |x: f32, y: f32, z: f32| at(center, x * h, y * h, z * h);

    [
        // +Z, -Z
        [p(-1., -1., 1.), p(1., -1., 1.), p(1., 1., 1.), p(-1., 1., 1.)],
        [p(1., -1., -1.), p(-1., -1., -1.), p(-1., 1., -1.), p(1., 1., -1.)],
        // +X, -X
        [p(1., -1., 1.), p(1., -1., -1.), p(1., 1., -1.), p(1., 1., 1.)],
        [p(-1., -1., -1.), p(-1., -1., 1.), p(-1., 1., 1.), p(-1., 1., -1.)],
        // +Y, -Y
        [p(-1., 1., 1.), p(1., 1., 1.), p(1., 1., -1.), p(-1., 1., -1.)],
        [p(-1., -1., -1.), p(1., -1., -1.), p(1., -1., 1.), p(-1., -1., 1.)],
    ]
    .iter()
    .map(|quad| Face::from_points(quad))
    .collect()
}

/// Square-based pyramid of base edge and height `size`.
pub fn pyramid(center: [f32; 3], size: f32) -> Result<Vec<Face>, GeometryError> {
    let h = size / 2.0;
    let p = |x: f32, z: f32| at(center, x * h, -h, z * h);
    let apex = at(center, 0.0, h, 0.0);

    let corners = [p(-1., 1.), p(1., 1.), p(1., -1.), p(-1., -1.)];

    let mut faces = vec![Face::from_points(&[corners[3], corners[2], corners[1], corners[0]])?];
    for i in 0..corners.len() {
        let next = corners[(i + 1) % corners.len()];
        faces.push(Face::from_points(&[corners[i], next, apex])?);
    }
    Ok(faces)
}

/// Upright prism with regular hexagon caps of circumradius `radius`.
pub fn hex_prism(center: [f32; 3], radius: f32, height: f32) -> Result<Vec<Face>, GeometryError> {
    const SIDES: usize = 6;
    let h = height / 2.0;

    // Increasing angle runs counter-clockwise seen from +Y.
    let ring = |y: f32| -> Vec<[f32; 3]> {
        (0..SIDES)
            .map(|k| {
                let a = TAU * k as f32 / SIDES as f32;
                at(center, radius * a.cos(), y, -radius * a.sin())
            })
            .collect()
    };
    let top = ring(h);
    let bottom = ring(-h);

    let mut faces = Vec::with_capacity(SIDES + 2);
    faces.push(Face::from_points(&top)?);

    let reversed: Vec<_> = bottom.iter().rev().copied().collect();
    faces.push(Face::from_points(&reversed)?);

    for k in 0..SIDES {
        let n = (k + 1) % SIDES;
        faces.push(Face::from_points(&[bottom[k], bottom[n], top[n], top[k]])?);
    }
    Ok(faces)
}
