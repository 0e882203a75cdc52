//! Disturbances: drops, sphere displacement and the start-up scatter.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::field::WaveField;

/// Beyond this many radii the sphere column profile underflows to zero in f32
const DISPLACEMENT_REACH: f32 = 2.0;

/// Length of the submerged part of the sphere column above sample `(x, z)`,
/// times `scale`.
///
/// The sphere is smoothed into a column of half-height
/// `dy = radius * exp(-(1.5 t)^6)` with `t` the horizontal distance to the
/// sphere axis in radii; only the part below the rest level (`y = 0`) counts.
fn column_volume(x: f32, z: f32, center: Vec3, radius: f32, scale: f32) -> f32 {
    let t = Vec2::new(x - center.x, z - center.z).length() / radius;
    let dy = radius * (-(t * 1.5).powi(6)).exp();
    let bottom = center.y - dy;
    let top = (center.y + dy).min(0.0);
    (top - bottom).max(0.0) * scale
}

impl WaveField {
    /// Inclusive index range covering world interval `[lo, hi]` along one axis
    fn index_span(&self, lo: f32, hi: f32) -> Option<(usize, usize)> {
        let extent = self.params.pool_half_extent;
        let n = self.size as f32;
        let to_cell = |w: f32| ((w / extent) * 0.5 + 0.5) * n - 0.5;
        let first = to_cell(lo).floor().max(0.0);
        let last = to_cell(hi).ceil().min(n - 1.0);
        (first <= last).then(|| (first as usize, last as usize))
    }

    /// Add a smooth radial impulse to the velocity field around world `(x, z)`.
    ///
    /// `radius` is measured in texture space (the pool spans 0..1), matching
    /// how drop sizes are quoted elsewhere. Centers outside the pool, or
    /// non-finite arguments, are ignored; returns whether the drop was applied.
    pub fn add_drop(&mut self, x: f32, z: f32, radius: f32, strength: f32) -> bool {
        let extent = self.params.pool_half_extent;
        if !(x.abs() <= extent && z.abs() <= extent)
            || !(radius > 0.0 && radius.is_finite())
            || !strength.is_finite()
        {
            log::debug!("Ignoring drop at ({}, {}) r={} s={}", x, z, radius, strength);
            return false;
        }

        let center_u = (x / extent) * 0.5 + 0.5;
        let center_v = (z / extent) * 0.5 + 0.5;
        let reach = radius * 2.0 * extent;
        let (Some((i0, i1)), Some((j0, j1))) = (
            self.index_span(x - reach, x + reach),
            self.index_span(z - reach, z + reach),
        ) else {
            return false;
        };

        let bound = self.params.max_magnitude;
        for j in j0..=j1 {
            let dv = center_v - self.sample_uv(j);
            for i in i0..=i1 {
                let du = center_u - self.sample_uv(i);
                let falloff = 1.0 - (du * du + dv * dv).sqrt() / radius;
                if falloff <= 0.0 {
                    continue;
                }
                let drop = 0.5 - (falloff * PI).cos() * 0.5;
                let idx = self.index(i, j);
                let velocity = &mut self.samples[idx].velocity;
                *velocity += drop * strength;
                Self::sanitize(velocity, bound);
            }
        }

        self.invalidate_normals();
        true
    }

    /// Couple a moving sphere into the surface.
    ///
    /// Liquid the sphere occupied at `old_center` flows back, liquid it
    /// occupies at `new_center` is pushed out. Equal centers leave the field
    /// untouched.
    pub fn apply_body_displacement(&mut self, old_center: Vec3, new_center: Vec3, radius: f32) {
        if old_center == new_center
            || !(radius > 0.0 && radius.is_finite())
            || !old_center.is_finite()
            || !new_center.is_finite()
        {
            return;
        }

        let reach = radius * DISPLACEMENT_REACH;
        let lo = old_center.min(new_center) - Vec3::splat(reach);
        let hi = old_center.max(new_center) + Vec3::splat(reach);
        let (Some((i0, i1)), Some((j0, j1))) =
            (self.index_span(lo.x, hi.x), self.index_span(lo.z, hi.z))
        else {
            return;
        };

        let scale = self.params.displacement_scale;
        let bound = self.params.max_magnitude;
        for j in j0..=j1 {
            let z = self.sample_world(j);
            for i in i0..=i1 {
                let x = self.sample_world(i);
                let delta = column_volume(x, z, old_center, radius, scale)
                    - column_volume(x, z, new_center, radius, scale);
                if delta == 0.0 {
                    continue;
                }
                let idx = self.index(i, j);
                let height = &mut self.samples[idx].height;
                *height += delta;
                Self::sanitize(height, bound);
            }
        }

        self.invalidate_normals();
    }

    /// Scatter the configured number of start-up drops with alternating sign
    pub fn scatter_initial_drops(&mut self) {
        let mut rng = StdRng::seed_from_u64(self.params.seed);
        let extent = self.params.pool_half_extent;
        let radius = self.params.drop_radius;
        let strength = self.params.drop_strength;

        for i in 0..self.params.initial_drops {
            let x = rng.gen_range(-extent..extent);
            let z = rng.gen_range(-extent..extent);
            let sign = if i & 1 == 1 { 1.0 } else { -1.0 };
            self.add_drop(x, z, radius, sign * strength);
        }
    }
}
