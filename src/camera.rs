//! Orbit camera: yaw/pitch state and the view-projection it implies.

use glam::{Mat4, Vec2, Vec3};

use crate::math::Vec3Ext;
use crate::params::{CameraParams, RenderConfig};

/// Camera orientation in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraAngles {
    pub yaw_deg: f32,
    pub pitch_deg: f32,
}

/// Camera matrices for one viewport, as handed to the picking code
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransform {
    pub view: Mat4,
    pub projection: Mat4,
    /// Viewport size in device pixels
    pub viewport: (u32, u32),
}

impl CameraTransform {
    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Eye position in world space
    pub fn eye(&self) -> Vec3 {
        self.view.inverse().transform_point3(Vec3::ZERO)
    }

    /// Viewport pixel under a world point, `None` if it lies behind the eye
    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_proj() * world.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.0 as f32,
            (1.0 - ndc.y) * 0.5 * self.viewport.1 as f32,
        ))
    }
}

/// Orbit camera rig around the pool
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    angles: CameraAngles,
    params: CameraParams,
}

impl OrbitCamera {
    /// Create new orbit camera at the configured start angles
    pub fn new(params: CameraParams) -> Self {
        let angles = CameraAngles {
            yaw_deg: params.initial_yaw_deg,
            pitch_deg: params.initial_pitch_deg,
        };
        Self::with_angles(params, angles)
    }

    pub fn with_angles(params: CameraParams, angles: CameraAngles) -> Self {
        let mut camera = Self { angles, params };
        camera.angles.pitch_deg = camera.clamp_pitch(angles.pitch_deg);
        camera
    }

    pub fn angles(&self) -> CameraAngles {
        self.angles
    }

    /// Rotate by a pointer drag of `(dx, dy)` pixels.
    ///
    /// Dragging right turns the pool left (yaw decreases), dragging down tilts
    /// the view up. Pitch is clamped to the configured limit.
    pub fn orbit(&mut self, dx_px: f32, dy_px: f32) {
        if !dx_px.is_finite() || !dy_px.is_finite() {
            return;
        }
        let scale = self.params.degrees_per_pixel;
        self.angles.yaw_deg -= dx_px * scale;
        self.angles.pitch_deg = self.clamp_pitch(self.angles.pitch_deg - dy_px * scale);
    }

    fn clamp_pitch(&self, pitch_deg: f32) -> f32 {
        let limit = self.params.pitch_limit_deg;
        pitch_deg.max(-limit).min(limit)
    }

    /// Direction the camera looks along, from the orbit angles
    pub fn look_direction(&self) -> Vec3 {
        Vec3::from_angles(
            (90.0 - self.angles.yaw_deg).to_radians(),
            (-self.angles.pitch_deg).to_radians(),
        )
    }

    /// World-to-view matrix
    pub fn view_matrix(&self) -> Mat4 {
        let p = &self.params;
        Mat4::from_translation(Vec3::new(0.0, 0.0, -p.distance))
            * Mat4::from_rotation_x((-self.angles.pitch_deg).to_radians())
            * Mat4::from_rotation_y((-self.angles.yaw_deg).to_radians())
            * Mat4::from_translation(Vec3::new(0.0, p.target_lift, 0.0))
    }

    /// Create view and projection for the given viewport
    pub fn transform(&self, render_config: &RenderConfig) -> CameraTransform {
        let projection = Mat4::perspective_rh_gl(
            self.params.fov_degrees.to_radians(),
            render_config.aspect_ratio(),
            self.params.near_plane,
            self.params.far_plane,
        );

        CameraTransform {
            view: self.view_matrix(),
            projection,
            viewport: (render_config.width, render_config.height),
        }
    }
}
