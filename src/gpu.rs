//! GPU capability probe.
//!
//! The surface simulation stores height, velocity and normal in an RGBA float
//! texture, so a real renderer must be able to render into `Rgba32Float`.

use crate::error::{SimError, SimResult};
use crate::render::RenderCapabilities;

/// Texture format the surface samples are uploaded as
pub const SURFACE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;

/// Ask the first available adapter whether it can render into float textures.
pub fn probe_capabilities() -> SimResult<RenderCapabilities> {
    pollster::block_on(probe_async())
}

async fn probe_async() -> SimResult<RenderCapabilities> {
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .ok_or_else(|| SimError::GpuProbe("no suitable GPU adapter found".to_string()))?;

    let info = adapter.get_info();
    let features = adapter.get_texture_format_features(SURFACE_FORMAT);
    let float_render_targets = features
        .allowed_usages
        .contains(wgpu::TextureUsages::RENDER_ATTACHMENT);

    log::info!(
        "GPU adapter: {} ({:?}), {:?} render target: {}",
        info.name,
        info.backend,
        SURFACE_FORMAT,
        if float_render_targets { "yes" } else { "no" }
    );

    Ok(RenderCapabilities {
        float_render_targets,
    })
}
