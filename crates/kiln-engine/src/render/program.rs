use std::fmt;

use glam::{Mat4, Vec3, Vec4};
use wgpu::naga;

// ── errors ────────────────────────────────────────────────────────────────

/// Errors raised while building a [`Program`] or writing its uniforms.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgramError {
    /// The WGSL source did not parse. `log` is the formatted compiler diagnostic.
    Parse { label: String, log: String },
    /// The module parsed but failed validation.
    Validation { label: String, log: String },
    UnknownUniform { name: String },
    UniformType {
        name: String,
        expected: UniformKind,
        found: UniformKind,
    },
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { label, log } => write!(f, "shader `{label}` failed to parse:\n{log}"),
            Self::Validation { label, log } => {
                write!(f, "shader `{label}` failed validation:\n{log}")
            }
            Self::UnknownUniform { name } => write!(f, "no uniform named `{name}`"),
            Self::UniformType {
                name,
                expected,
                found,
            } => write!(f, "uniform `{name}` is {expected:?}, got {found:?}"),
        }
    }
}

impl std::error::Error for ProgramError {}

/// Parses and validates WGSL on the CPU, returning the compiler log on failure.
pub fn validate_wgsl(label: &str, source: &str) -> Result<(), ProgramError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ProgramError::Parse {
        label: label.to_string(),
        log: e.emit_to_string(source),
    })?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| ProgramError::Validation {
        label: label.to_string(),
        log: e.emit_to_string(source),
    })?;

    Ok(())
}

// ── uniform layout ────────────────────────────────────────────────────────

/// WGSL types a uniform field may have.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UniformKind {
    Mat4,
    Vec4,
    Vec3,
    F32,
    U32,
}

impl UniformKind {
    /// `(align, size)` in the uniform address space.
    const fn align_size(self) -> (usize, usize) {
        match self {
            Self::Mat4 => (16, 64),
            Self::Vec4 => (16, 16),
            Self::Vec3 => (16, 12),
            Self::F32 | Self::U32 => (4, 4),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Mat4(Mat4),
    Vec4(Vec4),
    Vec3(Vec3),
    F32(f32),
    U32(u32),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            Self::Mat4(_) => UniformKind::Mat4,
            Self::Vec4(_) => UniformKind::Vec4,
            Self::Vec3(_) => UniformKind::Vec3,
            Self::F32(_) => UniformKind::F32,
            Self::U32(_) => UniformKind::U32,
        }
    }

    fn write(&self, out: &mut [u8]) {
        match self {
            // Column-major, matching WGSL `mat4x4<f32>`.
            Self::Mat4(m) => out.copy_from_slice(bytemuck::cast_slice(&m.to_cols_array())),
            Self::Vec4(v) => out.copy_from_slice(bytemuck::cast_slice(&v.to_array())),
            Self::Vec3(v) => out.copy_from_slice(bytemuck::cast_slice(&v.to_array())),
            Self::F32(v) => out.copy_from_slice(&v.to_ne_bytes()),
            Self::U32(v) => out.copy_from_slice(&v.to_ne_bytes()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct UniformField {
    name: String,
    kind: UniformKind,
    offset: usize,
}

/// Field list of one WGSL uniform struct, laid out with WGSL alignment rules.
///
/// Fields must be added in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformLayout {
    fields: Vec<UniformField>,
    end: usize,
}

impl UniformLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, kind: UniformKind) -> Self {
        debug_assert!(self.offset_of(name).is_none(), "duplicate uniform `{name}`");
        let (align, size) = kind.align_size();
        let offset = self.end.next_multiple_of(align);
        self.fields.push(UniformField {
            name: name.to_string(),
            kind,
            offset,
        });
        self.end = offset + size;
        self
    }

    pub fn offset_of(&self, name: &str) -> Option<usize> {
        self.field(name).map(|f| f.offset)
    }

    /// Struct size rounded up to 16 bytes; never zero.
    pub fn size(&self) -> usize {
        self.end.next_multiple_of(16).max(16)
    }

    fn field(&self, name: &str) -> Option<&UniformField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// CPU staging copy of one uniform struct.
#[derive(Debug, Clone)]
pub struct UniformBlock {
    layout: UniformLayout,
    bytes: Vec<u8>,
    dirty: bool,
}

impl UniformBlock {
    /// Zero-filled and dirty, so the first flush uploads it.
    pub fn new(layout: UniformLayout) -> Self {
        let bytes = vec![0; layout.size()];
        Self {
            layout,
            bytes,
            dirty: true,
        }
    }

    pub fn layout(&self) -> &UniformLayout {
        &self.layout
    }

    pub fn set(&mut self, name: &str, value: UniformValue) -> Result<(), ProgramError> {
        let field = self
            .layout
            .field(name)
            .ok_or_else(|| ProgramError::UnknownUniform {
                name: name.to_string(),
            })?;

        if field.kind != value.kind() {
            return Err(ProgramError::UniformType {
                name: name.to_string(),
                expected: field.kind,
                found: value.kind(),
            });
        }

        let (_, size) = field.kind.align_size();
        let mut encoded = [0u8; 64];
        value.write(&mut encoded[..size]);

        let slot = &mut self.bytes[field.offset..field.offset + size];
        if *slot != encoded[..size] {
            slot.copy_from_slice(&encoded[..size]);
            self.dirty = true;
        }
        Ok(())
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the bytes if they changed since the last call.
    pub fn take_dirty(&mut self) -> Option<&[u8]> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(&self.bytes)
    }
}

// ── program ───────────────────────────────────────────────────────────────

/// A validated shader module plus the uniform buffer it reads at
/// `@group(0) @binding(0)`.
pub struct Program {
    label: String,
    module: wgpu::ShaderModule,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    uniforms: UniformBlock,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl Program {
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        source: &str,
        layout: UniformLayout,
        visibility: wgpu::ShaderStages,
    ) -> Result<Self, ProgramError> {
        validate_wgsl(label, source)?;

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let uniforms = UniformBlock::new(layout);
        let size = uniforms.as_bytes().len() as u64;

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{label} bgl")),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(size),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{label} pipeline layout")),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label} ubo")),
            size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} bind group")),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        log::debug!("program `{label}` ready ({size} uniform bytes)");

        Ok(Self {
            label: label.to_string(),
            module,
            bind_group_layout,
            pipeline_layout,
            uniforms,
            buffer,
            bind_group,
        })
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn module(&self) -> &wgpu::ShaderModule {
        &self.module
    }

    #[inline]
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    #[inline]
    pub fn pipeline_layout(&self) -> &wgpu::PipelineLayout {
        &self.pipeline_layout
    }

    pub fn set_uniform(&mut self, name: &str, value: UniformValue) -> Result<(), ProgramError> {
        self.uniforms.set(name, value)
    }

    /// Uploads staged uniforms if any changed.
    pub fn flush(&mut self, queue: &wgpu::Queue) {
        if let Some(bytes) = self.uniforms.take_dirty() {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
    }

    /// Binds the uniform buffer at group 0.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(0, &self.bind_group, &[]);
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        self.buffer.destroy();
    }
}
