use super::Color;

/// Viewer render state, toggled at runtime by the keyboard.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub draw_faces: bool,
    pub draw_edges: bool,
    /// Replace the raster passes with the compute ray tracer.
    pub ray_tracing: bool,

    pub clear_color: Color,
    pub face_color: Color,
    pub edge_color: Color,

    /// Storage binding index the triangle buffer is uploaded to and the ray
    /// tracer reads from.
    pub triangle_binding: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            draw_faces: true,
            draw_edges: true,
            ray_tracing: false,
            clear_color: Color::BLACK,
            face_color: Color::rgba(0.5, 0.5, 0.5, 0.5),
            edge_color: Color::rgb(0.0, 0.0, 1.0),
            triangle_binding: 1,
        }
    }
}

impl RenderSettings {
    pub fn toggle_faces(&mut self) -> bool {
        self.draw_faces = !self.draw_faces;
        self.draw_faces
    }

    pub fn toggle_edges(&mut self) -> bool {
        self.draw_edges = !self.draw_edges;
        self.draw_edges
    }

    pub fn toggle_ray_tracing(&mut self) -> bool {
        self.ray_tracing = !self.ray_tracing;
        self.ray_tracing
    }
}
