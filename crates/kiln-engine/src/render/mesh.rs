use glam::Mat4;

use crate::model::{DrawPasses, ModelRegistry};

use super::program::{Program, ProgramError, UniformKind, UniformLayout, UniformValue};
use super::{RenderSettings, RenderTarget};

pub(crate) const MESH_WGSL: &str = include_str!("shaders/mesh.wgsl");

/// Raster passes for bodies: filled triangles, then wireframe lines.
///
/// Faces and edges read separate uniform buffers so each pass keeps its own color.
pub struct MeshPasses {
    faces: Program,
    edges: Program,
    face_pipeline: wgpu::RenderPipeline,
    edge_pipeline: wgpu::RenderPipeline,
    draw_faces: bool,
    draw_edges: bool,
}

impl MeshPasses {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Result<Self, ProgramError> {
        let faces = Program::new(
            device,
            "kiln mesh faces",
            MESH_WGSL,
            mesh_uniforms(),
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        )?;
        let edges = Program::new(
            device,
            "kiln mesh edges",
            MESH_WGSL,
            mesh_uniforms(),
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        )?;

        let face_pipeline = create_pipeline(
            device,
            &faces,
            format,
            wgpu::PrimitiveTopology::TriangleList,
            Some(wgpu::BlendState::ALPHA_BLENDING),
        );
        let edge_pipeline = create_pipeline(
            device,
            &edges,
            format,
            wgpu::PrimitiveTopology::LineList,
            None,
        );

        Ok(Self {
            faces,
            edges,
            face_pipeline,
            edge_pipeline,
            draw_faces: true,
            draw_edges: true,
        })
    }

    /// Stages this frame's camera and colors and copies the pass toggles.
    pub fn prepare(
        &mut self,
        queue: &wgpu::Queue,
        view_proj: Mat4,
        settings: &RenderSettings,
    ) -> Result<(), ProgramError> {
        self.draw_faces = settings.draw_faces;
        self.draw_edges = settings.draw_edges;

        for (program, color) in [
            (&mut self.faces, settings.face_color),
            (&mut self.edges, settings.edge_color),
        ] {
            program.set_uniform("view_proj", UniformValue::Mat4(view_proj))?;
            program.set_uniform("color", UniformValue::Vec4(color.to_vec4()))?;
            program.flush(queue);
        }
        Ok(())
    }

    /// Draws every body of `registry` over the current frame contents.
    pub fn encode(&self, target: &mut RenderTarget<'_>, registry: &ModelRegistry) {
        if !self.draw_faces && !self.draw_edges {
            return;
        }
        let mut pass = target.begin_load_pass("kiln mesh pass");
        registry.draw_all(&mut pass, self);
    }
}

impl DrawPasses for MeshPasses {
    fn should_draw_faces(&self) -> bool {
        self.draw_faces
    }

    fn should_draw_edges(&self) -> bool {
        self.draw_edges
    }

    fn begin_faces(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.face_pipeline);
        self.faces.bind(pass);
    }

    fn begin_edges(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.edge_pipeline);
        self.edges.bind(pass);
    }
}

fn mesh_uniforms() -> UniformLayout {
    UniformLayout::new()
        .with("view_proj", UniformKind::Mat4)
        .with("color", UniformKind::Vec4)
}

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

/// Tightly packed XYZ positions, as produced by `Body::triangle_vertices`.
fn position_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: (3 * std::mem::size_of::<f32>()) as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &POSITION_ATTRS,
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    program: &Program,
    format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
    blend: Option<wgpu::BlendState>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(program.label()),
        layout: Some(program.pipeline_layout()),

        vertex: wgpu::VertexState {
            module: program.module(),
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[position_layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: program.module(),
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Faces are visible from both sides.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::validate_wgsl;

    #[test]
    fn mesh_shader_validates() {
        validate_wgsl("mesh.wgsl", MESH_WGSL).unwrap();
    }

    #[test]
    fn uniform_layout_matches_shader_struct() {
        let layout = mesh_uniforms();
        assert_eq!(layout.offset_of("view_proj"), Some(0));
        assert_eq!(layout.offset_of("color"), Some(64));
        assert_eq!(layout.size(), 80);
    }

    #[test]
    fn vertex_stride_matches_flattened_positions() {
        assert_eq!(position_layout().array_stride, 12);
    }
}
