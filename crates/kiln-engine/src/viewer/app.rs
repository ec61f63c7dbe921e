use anyhow::{Context, Result};
use glam::Vec3;

use crate::camera::{Camera, CameraConfig};
use crate::core::{App, AppControl, FrameCtx};
use crate::device::Gpu;
use crate::input::{InputFrame, InputState, MouseButton};
use crate::model::ModelRegistry;
use crate::render::{MeshPasses, RayTracer, RenderSettings};

use super::controls::{ViewerCommand, key_command, orbit_direction};

/// GPU-side state, created on the first frame once a device exists.
struct Renderers {
    mesh: MeshPasses,
    tracer: RayTracer,
}

/// Orbit viewer over the bodies of a [`ModelRegistry`].
///
/// Keys: `F` faces, `E` edges, `R` ray tracing, `Escape` quits. Left drag and
/// the arrow keys orbit, the wheel zooms.
pub struct Viewer {
    registry: ModelRegistry,
    camera: Camera,
    settings: RenderSettings,
    renderers: Option<Renderers>,
}

impl Viewer {
    pub fn new(registry: ModelRegistry) -> Self {
        Self::with_config(registry, CameraConfig::default(), RenderSettings::default())
    }

    pub fn with_config(
        registry: ModelRegistry,
        camera: CameraConfig,
        settings: RenderSettings,
    ) -> Self {
        Self {
            registry,
            camera: Camera::new(camera),
            settings,
            renderers: None,
        }
    }

    #[inline]
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Applies this frame's key presses. Returns `Exit` once `Escape` was pressed.
    pub fn apply_keys(&mut self, frame: &InputFrame) -> AppControl {
        let mut control = AppControl::Continue;
        for command in frame.keys_pressed.iter().copied().filter_map(key_command) {
            match command {
                ViewerCommand::ToggleFaces => {
                    let on = self.settings.toggle_faces();
                    log::info!("faces {}", on_off(on));
                }
                ViewerCommand::ToggleEdges => {
                    let on = self.settings.toggle_edges();
                    log::info!("edges {}", on_off(on));
                }
                ViewerCommand::ToggleRayTracing => {
                    let on = self.settings.toggle_ray_tracing();
                    log::info!("ray tracing {}", on_off(on));
                }
                ViewerCommand::Exit => control = AppControl::Exit,
            }
        }
        control
    }

    /// Moves the camera from held arrows, left-button drag and wheel motion.
    pub fn steer(&mut self, input: &InputState, frame: &InputFrame, dt: f32) {
        let config = self.camera.config().clone();

        let direction = orbit_direction(input);
        if direction != Vec3::ZERO {
            let speed = config.key_speed * self.camera.distance();
            self.camera.move_by(direction * speed, dt);
        }

        if let Some((dx, dy)) = input.drag_delta(frame, MouseButton::Left) {
            // Grab semantics: the scene follows the pointer.
            let scale = config.drag_sensitivity * self.camera.distance();
            self.camera.move_by(Vec3::new(-dx, dy, 0.0) * scale, 1.0);
        }

        if frame.wheel_lines != 0.0 {
            self.camera.zoom(frame.wheel_lines);
        }
    }

    /// Builds the pipelines, uploads every body and packs the triangle buffer.
    fn setup(&mut self, gpu: &Gpu<'_>) -> Result<Renderers> {
        let device = gpu.device();
        let format = gpu.surface_format();

        let mesh = MeshPasses::new(device, format).context("failed to build mesh passes")?;
        let tracer = RayTracer::new(device, format, self.settings.triangle_binding)
            .context("failed to build ray tracer")?;

        self.registry.upload_all(device);
        let triangles = self
            .registry
            .to_compute(device, gpu.queue(), self.settings.triangle_binding)
            .context("failed to upload triangle storage")?;

        log::info!(
            "viewer ready: {} bodies, {triangles} triangles",
            self.registry.len()
        );
        Ok(Renderers { mesh, tracer })
    }
}

impl App for Viewer {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.apply_keys(ctx.input_frame) == AppControl::Exit {
            return AppControl::Exit;
        }
        self.steer(ctx.input, ctx.input_frame, ctx.time.dt);

        if self.renderers.is_none() {
            match self.setup(ctx.gpu) {
                Ok(renderers) => self.renderers = Some(renderers),
                Err(e) => {
                    log::error!("{e:#}");
                    return AppControl::Exit;
                }
            }
        }
        let Some(renderers) = self.renderers.as_mut() else {
            return AppControl::Exit;
        };

        let view_proj = self.camera.view_projection(ctx.gpu.aspect_ratio());
        if let Err(e) = renderers.mesh.prepare(ctx.gpu.queue(), view_proj, &self.settings) {
            log::error!("failed to stage mesh uniforms: {e}");
            return AppControl::Exit;
        }

        let eye = self.camera.origin();
        let settings = &self.settings;
        let registry = &self.registry;
        ctx.render(settings.clear_color, |rctx, target| {
            match registry.triangle_binding() {
                Some(triangles) if settings.ray_tracing => {
                    renderers
                        .tracer
                        .render(rctx, target, triangles, view_proj, eye, settings);
                }
                _ => renderers.mesh.encode(target, registry),
            }
        })
    }

    fn on_exit(&mut self, gpu: &Gpu<'_>) {
        if let Some(mut renderers) = self.renderers.take() {
            renderers.tracer.release();
        }
        // Shared triangle buffer first, then each body's streams.
        drop(std::mem::take(&mut self.registry));
        log::info!("viewer released GPU resources on {}", gpu.adapter_info().name);
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}
