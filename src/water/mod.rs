//! Height-field liquid surface: storage, wave stepping, disturbances.

mod disturb;
mod field;

use bytemuck::{Pod, Zeroable};

// Re-export public types
pub use field::WaveField;

/// One height-field sample, laid out like an RGBA float texel
/// (height, vertical velocity, normal x, normal z).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SurfaceSample {
    pub height: f32,
    pub velocity: f32,
    pub normal_x: f32,
    pub normal_z: f32,
}

impl SurfaceSample {
    /// Flat, resting sample with an upward normal
    pub const FLAT: SurfaceSample = SurfaceSample {
        height: 0.0,
        velocity: 0.0,
        normal_x: 0.0,
        normal_z: 0.0,
    };

    /// Full normal vector (y reconstructed from the stored x/z)
    pub fn normal(&self) -> glam::Vec3 {
        let y = (1.0 - self.normal_x * self.normal_x - self.normal_z * self.normal_z)
            .max(0.0)
            .sqrt();
        glam::Vec3::new(self.normal_x, y, self.normal_z)
    }
}
