use std::fmt::Write as _;

use wgpu::util::DeviceExt;

use crate::device::{GpuHandle, release_buffer};

use super::{Face, FaceRecord};

/// Pass selection used by [`Body::draw`].
///
/// Implementors own the pipelines; a body only binds its own vertex buffers and
/// issues the draw calls.
pub trait DrawPasses {
    fn should_draw_faces(&self) -> bool;
    fn should_draw_edges(&self) -> bool;

    /// Binds the triangle-list pipeline and its uniforms.
    fn begin_faces(&self, pass: &mut wgpu::RenderPass<'_>);

    /// Binds the line-list pipeline and its uniforms.
    fn begin_edges(&self, pass: &mut wgpu::RenderPass<'_>);
}

/// One GPU vertex buffer plus the number of vertices it holds.
#[derive(Debug, Default)]
struct VertexStream {
    buffer: GpuHandle<wgpu::Buffer>,
    vertex_count: u32,
}

impl VertexStream {
    fn upload(&mut self, device: &wgpu::Device, label: &str, vertices: &[f32]) {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        self.buffer.replace(buffer);
        self.vertex_count = (vertices.len() / 3) as u32;
    }

    fn release(&mut self) {
        release_buffer(&mut self.buffer);
        self.vertex_count = 0;
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.vertex_count == 0 {
            return;
        }
        let Some(buffer) = self.buffer.get() else { return };
        pass.set_vertex_buffer(0, buffer.slice(..));
        pass.draw(0..self.vertex_count, 0..1);
    }
}

/// A renderable polygonal object: CPU faces plus their GPU vertex buffers.
///
/// Faces are expected to be triangles already (see [`triangulate_all`](super::triangulate_all));
/// the wireframe emits one segment per node to its cyclic successor, which is only a
/// clean outline for triangles.
///
/// GPU state is all-or-nothing: after [`to_gpu`](Self::to_gpu) both streams hold a
/// buffer, after [`release`](Self::release) (or before any upload) neither does.
#[derive(Debug)]
pub struct Body {
    faces: Vec<Face>,
    triangles: VertexStream,
    edges: VertexStream,
}

impl Body {
    pub fn new(faces: Vec<Face>) -> Self {
        Self {
            faces,
            triangles: VertexStream::default(),
            edges: VertexStream::default(),
        }
    }

    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    #[inline]
    pub fn is_uploaded(&self) -> bool {
        self.triangles.buffer.is_valid()
    }

    /// Vertices in the triangle stream (0 until uploaded).
    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.triangles.vertex_count
    }

    /// Vertices in the edge stream (0 until uploaded).
    #[inline]
    pub fn line_vertex_count(&self) -> u32 {
        self.edges.vertex_count
    }

    /// Flat XYZ positions, face-major then node-major.
    pub fn triangle_vertices(&self) -> Vec<f32> {
        let count: usize = self.faces.iter().map(Face::len).sum();
        let mut data = Vec::with_capacity(count * 3);
        for face in &self.faces {
            for node in face.nodes() {
                data.extend_from_slice(&node.position.to_array());
            }
        }
        data
    }

    /// Flat XYZ line segments: every node paired with its successor in the same face.
    pub fn edge_vertices(&self) -> Vec<f32> {
        let count: usize = self.faces.iter().map(Face::len).sum();
        let mut data = Vec::with_capacity(count * 2 * 3);
        for face in &self.faces {
            let nodes = face.nodes();
            for (i, node) in nodes.iter().enumerate() {
                let next = nodes[(i + 1) % nodes.len()];
                data.extend_from_slice(&node.position.to_array());
                data.extend_from_slice(&next.position.to_array());
            }
        }
        data
    }

    /// Uploads the triangle and edge streams.
    ///
    /// Buffers from a previous upload are released first.
    pub fn to_gpu(&mut self, device: &wgpu::Device) {
        if self.is_uploaded() {
            log::debug!("body re-uploaded without release; dropping previous buffers");
            self.release();
        }

        self.triangles.upload(device, "kiln body triangles vbo", &self.triangle_vertices());
        self.edges.upload(device, "kiln body edges vbo", &self.edge_vertices());
    }

    /// Destroys every owned GPU buffer. Safe to call repeatedly or before any upload.
    pub fn release(&mut self) {
        self.triangles.release();
        self.edges.release();
    }

    /// Records the face and edge draws selected by `passes`.
    ///
    /// Does nothing for a body that has not been uploaded.
    pub fn draw<P: DrawPasses + ?Sized>(&self, pass: &mut wgpu::RenderPass<'_>, passes: &P) {
        if passes.should_draw_faces() && self.triangles.vertex_count > 0 {
            passes.begin_faces(pass);
            self.triangles.draw(pass);
        }

        if passes.should_draw_edges() && self.edges.vertex_count > 0 {
            passes.begin_edges(pass);
            self.edges.draw(pass);
        }
    }

    /// Appends one [`FaceRecord`] per face to `out`.
    pub fn to_compute(&self, out: &mut Vec<FaceRecord>) {
        out.reserve(self.faces.len());
        out.extend(self.faces.iter().map(FaceRecord::from_face));
    }

    /// Human-readable dump of every face, normal, and node.
    pub fn describe(&self) -> String {
        let mut s = String::from("Body:\n");
        for (i, face) in self.faces.iter().enumerate() {
            let _ = writeln!(s, "\tFace: {i}\n\t - Normal vector: {}", face.normal());
            for node in face.nodes() {
                let _ = writeln!(s, "\t\tNode: {}", node.position);
            }
            s.push_str("\tEnd Face\n");
        }
        s.push_str("End Body");
        s
    }
}
