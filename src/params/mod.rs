//! Parameter definitions with physical units and documented semantics.
//!
//! All tunable constants live here with:
//! - Units (world units, seconds, degrees, pixels)
//! - Documented ranges and meanings
//! - Type safety where possible

mod body;
mod camera;
mod liquid;
mod render;
mod water;

// Re-export all types
pub use body::BodyParams;
pub use camera::CameraParams;
pub use liquid::{DragCurve, LiquidParams, LiquidProfile};
pub use render::{RecordingConfig, RenderConfig};
pub use water::WaterParams;

/// Complete configuration for one simulation session
#[derive(Debug, Clone, Default)]
pub struct SimulationParams {
    pub water: WaterParams,
    pub body: BodyParams,
    pub camera: CameraParams,
    pub render: RenderConfig,
    pub profile: LiquidProfile,
    pub start_paused: bool,
}
