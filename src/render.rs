//! Renderer contract, per-frame snapshot, and a headless CPU renderer.
//!
//! The simulation never hands out its live buffers. Every frame it builds a
//! `FrameSnapshot` (an owned copy of the surface samples plus body, tint and
//! camera state) and passes it by shared reference.

use std::path::Path;
use std::sync::Arc;

use glam::Vec3;

use crate::camera::{CameraAngles, CameraTransform, OrbitCamera};
use crate::error::SimResult;
use crate::params::{CameraParams, RecordingConfig, RenderConfig};
use crate::water::SurfaceSample;

/// What the rendering backend can do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderCapabilities {
    /// Floating-point textures can be used as render targets
    pub float_render_targets: bool,
}

/// Read-only state for one rendered frame
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub grid_size: usize,
    pub surface: Arc<[SurfaceSample]>,
    /// False if heights changed after the last normal recomputation
    pub normals_valid: bool,
    pub body_center: Vec3,
    pub body_radius: f32,
    pub tint: [f32; 3],
    pub angles: CameraAngles,
    pub light_dir: Vec3,
}

impl FrameSnapshot {
    /// Surface samples as raw bytes, ready for a float texture upload
    pub fn surface_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.surface[..])
    }
}

/// Rendering backend driven by the simulation.
///
/// `camera_transform` is the only state flowing back into the core (for
/// picking). Caustics are refreshed after every wave update and whenever the
/// body or light moves while paused; `draw` presents a frame.
pub trait RenderBackend {
    fn capabilities(&self) -> RenderCapabilities;

    fn camera_transform(&self) -> CameraTransform;

    fn update_caustics(&mut self, frame: &FrameSnapshot);

    fn draw(&mut self, frame: &FrameSnapshot) -> SimResult<()>;
}

/// Write the height field as an 8-bit grayscale PNG.
///
/// Heights in `[-range, range]` map to `0..=255`, rest level is mid-gray.
pub fn write_heightmap_png(
    surface: &[SurfaceSample],
    grid_size: usize,
    range: f32,
    path: &Path,
) -> SimResult<()> {
    let range = if range > 0.0 { range } else { 1.0 };
    let pixels: Vec<u8> = surface
        .iter()
        .map(|s| (((s.height / range).clamp(-1.0, 1.0) * 0.5 + 0.5) * 255.0).round() as u8)
        .collect();

    image::save_buffer(
        path,
        &pixels,
        grid_size as u32,
        grid_size as u32,
        image::ColorType::L8,
    )?;
    Ok(())
}

/// CPU stand-in for a GPU renderer.
///
/// Keeps the last frame, counts refreshes, and can capture height fields to
/// disk. Its camera follows the angles of the last drawn frame.
pub struct HeadlessRenderer {
    config: RenderConfig,
    camera_params: CameraParams,
    capabilities: RenderCapabilities,
    recording: Option<RecordingConfig>,
    /// Height mapped to full white in captures
    pub capture_range: f32,
    last_frame: Option<FrameSnapshot>,
    draws: u64,
    caustics_updates: u64,
}

impl HeadlessRenderer {
    pub fn new(config: RenderConfig, camera_params: CameraParams) -> Self {
        Self {
            config,
            camera_params,
            capabilities: RenderCapabilities {
                float_render_targets: true,
            },
            recording: None,
            capture_range: 0.05,
            last_frame: None,
            draws: 0,
            caustics_updates: 0,
        }
    }

    /// Report externally probed capabilities instead of the CPU defaults
    pub fn with_capabilities(mut self, capabilities: RenderCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Capture drawn frames into the recording directory
    pub fn with_recording(mut self, recording: RecordingConfig) -> SimResult<Self> {
        std::fs::create_dir_all(&recording.output_dir)?;
        self.recording = Some(recording);
        Ok(self)
    }

    pub fn last_frame(&self) -> Option<&FrameSnapshot> {
        self.last_frame.as_ref()
    }

    pub fn draw_count(&self) -> u64 {
        self.draws
    }

    pub fn caustics_count(&self) -> u64 {
        self.caustics_updates
    }

    /// Save the last drawn height field
    pub fn save_snapshot(&self, path: &Path) -> SimResult<bool> {
        let Some(frame) = &self.last_frame else {
            return Ok(false);
        };
        write_heightmap_png(&frame.surface, frame.grid_size, self.capture_range, path)?;
        Ok(true)
    }
}

impl RenderBackend for HeadlessRenderer {
    fn capabilities(&self) -> RenderCapabilities {
        self.capabilities
    }

    fn camera_transform(&self) -> CameraTransform {
        let camera = match &self.last_frame {
            Some(frame) => OrbitCamera::with_angles(self.camera_params.clone(), frame.angles),
            None => OrbitCamera::new(self.camera_params.clone()),
        };
        camera.transform(&self.config)
    }

    fn update_caustics(&mut self, _frame: &FrameSnapshot) {
        self.caustics_updates += 1;
    }

    fn draw(&mut self, frame: &FrameSnapshot) -> SimResult<()> {
        self.draws += 1;
        self.last_frame = Some(frame.clone());

        if let Some(recording) = &self.recording {
            if recording.should_capture(frame.frame) {
                let path = recording.frame_path(frame.frame);
                write_heightmap_png(&frame.surface, frame.grid_size, self.capture_range, &path)?;
                log::debug!("Captured {}", path.display());
            }
        }

        Ok(())
    }
}
