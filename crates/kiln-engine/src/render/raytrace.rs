use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::device::{GpuHandle, release_buffer};
use crate::math::Position;
use crate::model::TriangleBinding;

use super::program::{ProgramError, validate_wgsl};
use super::{Color, RenderCtx, RenderSettings, RenderTarget};

pub(crate) const RAYTRACE_WGSL: &str = include_str!("shaders/raytrace.wgsl");
pub(crate) const PRESENT_WGSL: &str = include_str!("shaders/present.wgsl");

const WORKGROUP_SIZE: u32 = 8;
const PIXEL_SIZE: u64 = 16;
/// Barycentric weight under which a hit is drawn as an edge.
const EDGE_BAND: f32 = 0.02;

/// Binding indices of the ray-tracing compute shader. The triangle buffer sits
/// wherever the caller asks; the other two take the lowest free indices.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TraceBindings {
    pub params: u32,
    pub triangles: u32,
    pub pixels: u32,
}

impl TraceBindings {
    pub fn new(triangles: u32) -> Self {
        let mut free = (0..).filter(|&i| i != triangles);
        let params = free.next().unwrap_or(0);
        let pixels = free.next().unwrap_or(1);
        Self {
            params,
            triangles,
            pixels,
        }
    }

    /// Full compute shader source with the resource declarations at these indices.
    pub fn shader_source(&self) -> String {
        format!(
            "@group(0) @binding({}) var<uniform> params: TraceParams;\n\
             @group(0) @binding({}) var<storage, read> triangles: array<Triangle>;\n\
             @group(0) @binding({}) var<storage, read_write> pixels: array<vec4<f32>>;\n\n{}",
            self.params, self.triangles, self.pixels, RAYTRACE_WGSL
        )
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct TraceParams {
    inv_view_proj: [[f32; 4]; 4],
    origin: [f32; 4],
    background: [f32; 4],
    surface: [f32; 4],
    edge: [f32; 4],
    resolution: [u32; 2],
    triangle_count: u32,
    edge_band: f32,
}

const _: () = assert!(std::mem::size_of::<TraceParams>() == 144);

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct PresentParams {
    surface: [f32; 2],
    trace: [u32; 2],
}

/// Largest trace resolution with the surface's aspect whose pixel buffer fits
/// in `max_bytes`. Never zero in either axis.
pub fn fit_trace_size(surface: (u32, u32), max_bytes: u64) -> (u32, u32) {
    let (w, h) = (surface.0.max(1), surface.1.max(1));
    let max_pixels = (max_bytes / PIXEL_SIZE).max(1);
    let pixels = w as u64 * h as u64;
    if pixels <= max_pixels {
        return (w, h);
    }

    let scale = (max_pixels as f64 / pixels as f64).sqrt();
    let fw = ((w as f64 * scale).floor() as u32).max(1);
    let fh = ((h as f64 * scale).floor() as u32).max(1);
    (fw, fh)
}

/// Compute-shader ray caster over the registry's triangle buffer.
///
/// Each frame: trace into a pixel storage buffer, then draw that buffer over the
/// surface with a full-screen triangle. Bind groups are rebuilt when the
/// triangle buffer is recreated or the surface is resized.
pub struct RayTracer {
    bindings: TraceBindings,

    compute_layout: wgpu::BindGroupLayout,
    compute_pipeline: wgpu::ComputePipeline,
    present_layout: wgpu::BindGroupLayout,
    present_pipeline: wgpu::RenderPipeline,

    params: GpuHandle<wgpu::Buffer>,
    present_params: GpuHandle<wgpu::Buffer>,
    pixels: GpuHandle<wgpu::Buffer>,
    trace_size: (u32, u32),

    compute_group: Option<wgpu::BindGroup>,
    present_group: Option<wgpu::BindGroup>,
    bound_generation: Option<u64>,
    warned_binding: bool,
}

impl RayTracer {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        triangle_binding: u32,
    ) -> Result<Self, ProgramError> {
        let bindings = TraceBindings::new(triangle_binding);

        let compute_src = bindings.shader_source();
        validate_wgsl("raytrace.wgsl", &compute_src)?;
        validate_wgsl("present.wgsl", PRESENT_WGSL)?;

        let compute_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("kiln raytrace shader"),
            source: wgpu::ShaderSource::Wgsl(compute_src.into()),
        });
        let present_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("kiln present shader"),
            source: wgpu::ShaderSource::Wgsl(PRESENT_WGSL.into()),
        });

        let compute_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("kiln raytrace bgl"),
            entries: &[
                uniform_entry(bindings.params, wgpu::ShaderStages::COMPUTE),
                storage_entry(bindings.triangles, wgpu::ShaderStages::COMPUTE, true),
                storage_entry(bindings.pixels, wgpu::ShaderStages::COMPUTE, false),
            ],
        });

        let compute_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("kiln raytrace pipeline layout"),
            bind_group_layouts: &[&compute_layout],
            immediate_size: 0,
        });

        let compute_pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("kiln raytrace pipeline"),
            layout: Some(&compute_pipeline_layout),
            module: &compute_module,
            entry_point: Some("cs_main"),
            compilation_options: Default::default(),
            cache: None,
        });

        let present_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("kiln present bgl"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::FRAGMENT),
                storage_entry(1, wgpu::ShaderStages::FRAGMENT, true),
            ],
        });

        let present_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("kiln present pipeline layout"),
            bind_group_layouts: &[&present_layout],
            immediate_size: 0,
        });

        let present_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("kiln present pipeline"),
            layout: Some(&present_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &present_module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &present_module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let params = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("kiln raytrace params"),
            size: std::mem::size_of::<TraceParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let present_params = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("kiln present params"),
            size: std::mem::size_of::<PresentParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        log::debug!("ray tracer ready with {bindings:?}");

        Ok(Self {
            bindings,
            compute_layout,
            compute_pipeline,
            present_layout,
            present_pipeline,
            params: GpuHandle::new(params),
            present_params: GpuHandle::new(present_params),
            pixels: GpuHandle::empty(),
            trace_size: (0, 0),
            compute_group: None,
            present_group: None,
            bound_generation: None,
            warned_binding: false,
        })
    }

    #[inline]
    pub fn bindings(&self) -> TraceBindings {
        self.bindings
    }

    /// Traces the scene seen through `view_proj` from `eye` and draws the result
    /// over the whole target.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        triangles: TriangleBinding<'_>,
        view_proj: Mat4,
        eye: Position,
        settings: &RenderSettings,
    ) {
        if triangles.binding != self.bindings.triangles {
            if !self.warned_binding {
                log::warn!(
                    "triangles uploaded at binding {} but the ray tracer reads binding {}",
                    triangles.binding,
                    self.bindings.triangles
                );
                self.warned_binding = true;
            }
            return;
        }

        let max_bytes = ctx.device.limits().max_storage_buffer_binding_size as u64;
        self.ensure_pixels(ctx.device, fit_trace_size(ctx.size, max_bytes));
        self.ensure_bind_groups(ctx.device, &triangles);

        let (Some(params), Some(present_params)) = (self.params.get(), self.present_params.get())
        else {
            return;
        };

        let (tw, th) = self.trace_size;
        let trace = TraceParams {
            inv_view_proj: view_proj.inverse().to_cols_array_2d(),
            origin: [eye.x(), eye.y(), eye.z(), 1.0],
            background: opaque(settings.clear_color),
            surface: opaque(settings.face_color),
            edge: opaque(settings.edge_color),
            resolution: [tw, th],
            triangle_count: triangles.triangle_count,
            edge_band: if settings.draw_edges { EDGE_BAND } else { -1.0 },
        };
        ctx.queue.write_buffer(params, 0, bytemuck::bytes_of(&trace));

        let present = PresentParams {
            surface: [ctx.size.0.max(1) as f32, ctx.size.1.max(1) as f32],
            trace: [tw, th],
        };
        ctx.queue.write_buffer(present_params, 0, bytemuck::bytes_of(&present));

        let (Some(compute_group), Some(present_group)) =
            (self.compute_group.as_ref(), self.present_group.as_ref())
        else {
            return;
        };

        {
            let mut cpass = target.encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("kiln raytrace pass"),
                timestamp_writes: None,
            });
            cpass.set_pipeline(&self.compute_pipeline);
            cpass.set_bind_group(0, compute_group, &[]);
            cpass.dispatch_workgroups(tw.div_ceil(WORKGROUP_SIZE), th.div_ceil(WORKGROUP_SIZE), 1);
        }

        let mut rpass = target.begin_load_pass("kiln present pass");
        rpass.set_pipeline(&self.present_pipeline);
        rpass.set_bind_group(0, present_group, &[]);
        rpass.draw(0..3, 0..1);
    }

    /// Destroys the pixel and parameter buffers. The tracer is unusable afterwards.
    pub fn release(&mut self) {
        self.compute_group = None;
        self.present_group = None;
        self.bound_generation = None;
        release_buffer(&mut self.pixels);
        release_buffer(&mut self.params);
        release_buffer(&mut self.present_params);
    }

    fn ensure_pixels(&mut self, device: &wgpu::Device, size: (u32, u32)) {
        if self.pixels.is_valid() && self.trace_size == size {
            return;
        }

        release_buffer(&mut self.pixels);
        self.pixels.replace(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("kiln raytrace pixels"),
            size: size.0 as u64 * size.1 as u64 * PIXEL_SIZE,
            usage: wgpu::BufferUsages::STORAGE,
            mapped_at_creation: false,
        }));
        self.trace_size = size;
        self.compute_group = None;
        self.present_group = None;
        log::debug!("ray tracer output resized to {}x{}", size.0, size.1);
    }

    fn ensure_bind_groups(&mut self, device: &wgpu::Device, triangles: &TriangleBinding<'_>) {
        if self.bound_generation != Some(triangles.generation) {
            self.compute_group = None;
        }
        if self.compute_group.is_some() && self.present_group.is_some() {
            return;
        }

        let (Some(params), Some(present_params), Some(pixels)) = (
            self.params.get(),
            self.present_params.get(),
            self.pixels.get(),
        ) else {
            return;
        };

        self.compute_group = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("kiln raytrace bind group"),
            layout: &self.compute_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: self.bindings.params,
                    resource: params.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: self.bindings.triangles,
                    resource: triangles.buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: self.bindings.pixels,
                    resource: pixels.as_entire_binding(),
                },
            ],
        }));

        self.present_group = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("kiln present bind group"),
            layout: &self.present_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: present_params.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: pixels.as_entire_binding(),
                },
            ],
        }));

        self.bound_generation = Some(triangles.generation);
    }
}

impl Drop for RayTracer {
    fn drop(&mut self) {
        self.release();
    }
}

fn opaque(c: Color) -> [f32; 4] {
    [c.r, c.g, c.b, 1.0]
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn storage_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
    read_only: bool,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}
