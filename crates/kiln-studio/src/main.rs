mod scene;

use anyhow::{Context, Result};

use kiln_engine::camera::CameraConfig;
use kiln_engine::device::GpuInit;
use kiln_engine::logging::{LoggingConfig, init_logging};
use kiln_engine::math::Position;
use kiln_engine::model::ModelRegistry;
use kiln_engine::render::RenderSettings;
use kiln_engine::viewer::Viewer;
use kiln_engine::window::{Runtime, RuntimeConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    println!();
    println!("  ╔════════════════════════════════════════╗");
    println!("  ║             KILN STUDIO v0.1           ║");
    println!("  ║   wgpu raster  ·  compute ray tracer   ║");
    println!("  ╠════════════════════════════════════════╣");
    println!("  ║  F faces   E edges   R ray tracing     ║");
    println!("  ║  drag / arrows orbit   wheel zooms     ║");
    println!("  ║  Esc quits                             ║");
    println!("  ╚════════════════════════════════════════╝");
    println!();

    let mut registry = ModelRegistry::default();
    for shape in scene::demo_scene().context("failed to build demo scene")? {
        let triangles = shape
            .triangles()
            .with_context(|| format!("failed to triangulate {}", shape.name))?;
        let id = registry
            .create_body(&triangles)
            .with_context(|| format!("failed to register {}", shape.name))?;
        log::info!("{} -> body {id} ({} triangles)", shape.name, triangles.len());
    }

    let camera = CameraConfig {
        origin: Position::new(2.0, 2.5, 5.0),
        ..CameraConfig::default()
    };
    let viewer = Viewer::with_config(registry, camera, RenderSettings::default());

    Runtime::run(
        RuntimeConfig {
            title: "Kiln Studio".to_string(),
            ..RuntimeConfig::default()
        },
        GpuInit::default(),
        viewer,
    )
}
