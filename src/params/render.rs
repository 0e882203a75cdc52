//! Viewport and recording configuration.

use std::path::PathBuf;

/// Viewport configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Viewport width (pixels)
    pub width: u32,

    /// Viewport height (pixels)
    pub height: u32,

    /// Device pixel ratio: pointer coordinates are multiplied by this
    /// before picking
    pub pixel_ratio: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            pixel_ratio: 1.0,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Height-field capture configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Output directory for captured frames
    pub output_dir: PathBuf,

    /// Capture every n-th drawn frame
    pub every_n_frames: usize,
}

impl RecordingConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            every_n_frames: 1,
        }
    }

    /// Path of the PNG for a given frame
    pub fn frame_path(&self, frame_num: u64) -> PathBuf {
        self.output_dir.join(format!("frame_{:05}.png", frame_num))
    }

    pub fn should_capture(&self, frame_num: u64) -> bool {
        frame_num % self.every_n_frames.max(1) as u64 == 0
    }
}
