//! Vector helpers on top of `glam::Vec3`.
//!
//! glam already provides add/sub/scale/dot/length_squared as operators and
//! methods. This module fills in the two pieces the simulation needs that glam
//! does not spell the same way: a zero-safe `unit` and camera-angle directions.

use glam::Vec3;

/// Extra operations used by the picking and body code.
pub trait Vec3Ext {
    /// Unit vector in the same direction, or `Vec3::ZERO` for zero-length input.
    fn unit(self) -> Vec3;

    /// Direction from spherical angles (radians), matching the light/camera
    /// convention: `(cos(theta) * cos(phi), sin(phi), sin(theta) * cos(phi))`.
    fn from_angles(theta: f32, phi: f32) -> Vec3;
}

impl Vec3Ext for Vec3 {
    fn unit(self) -> Vec3 {
        let len_sq = self.length_squared();
        if len_sq > 0.0 && len_sq.is_finite() {
            self / len_sq.sqrt()
        } else {
            Vec3::ZERO
        }
    }

    fn from_angles(theta: f32, phi: f32) -> Vec3 {
        Vec3::new(theta.cos() * phi.cos(), phi.sin(), theta.sin() * phi.cos())
    }
}

/// Component-wise clamp into an axis-aligned box.
pub fn clamp_box(v: Vec3, min: Vec3, max: Vec3) -> Vec3 {
    Vec3::new(
        v.x.max(min.x).min(max.x),
        v.y.max(min.y).min(max.y),
        v.z.max(min.z).min(max.z),
    )
}
