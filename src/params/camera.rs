//! Orbit camera configuration.

/// Orbit camera rig parameters
///
/// The view is built as `translate(0, 0, -distance) * rotX(-pitch) *
/// rotY(-yaw) * translate(0, target_lift, 0)`.
#[derive(Debug, Clone)]
pub struct CameraParams {
    /// Initial pitch (degrees, negative looks down onto the pool)
    pub initial_pitch_deg: f32,

    /// Initial yaw (degrees)
    pub initial_yaw_deg: f32,

    /// Pitch limit (degrees); pitch is clamped to ±limit inclusive
    pub pitch_limit_deg: f32,

    /// Orbit distance from the target (world units)
    pub distance: f32,

    /// The orbit target sits this far below the origin
    /// (world is translated up by this amount)
    pub target_lift: f32,

    /// Degrees of rotation per pixel of drag
    pub degrees_per_pixel: f32,

    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (world units)
    pub near_plane: f32,

    /// Far clipping plane (world units)
    pub far_plane: f32,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            initial_pitch_deg: -25.0,
            initial_yaw_deg: -200.5,
            pitch_limit_deg: 89.999,
            distance: 4.0,
            target_lift: 0.5,
            degrees_per_pixel: 1.0,
            fov_degrees: 45.0,
            near_plane: 0.01,
            far_plane: 100.0,
        }
    }
}
