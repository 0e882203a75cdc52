//! Wave-field storage, explicit wave stepping and normal recomputation.

use std::sync::Arc;

use glam::Vec3;

use super::SurfaceSample;
use crate::params::WaterParams;

/// Discretized liquid surface over `x, z ∈ [-extent, extent]`.
///
/// Boundary condition: neighbour lookups clamp to the edge sample, so the
/// edge slope is zero (a reflective wall). Waves bounce back off the pool
/// sides instead of leaving the domain.
pub struct WaveField {
    pub(super) params: WaterParams,
    pub(super) size: usize,
    pub(super) samples: Vec<SurfaceSample>,
    /// Write target for the double-buffered step, swapped after each step
    scratch: Vec<SurfaceSample>,
    normals_valid: bool,
}

impl WaveField {
    /// Create a flat, resting field
    pub fn new(params: WaterParams) -> Self {
        let size = params.grid_size.max(2);
        let count = size * size;
        Self {
            params,
            size,
            samples: vec![SurfaceSample::FLAT; count],
            scratch: vec![SurfaceSample::FLAT; count],
            normals_valid: true,
        }
    }

    pub fn params(&self) -> &WaterParams {
        &self.params
    }

    /// Samples per side
    pub fn grid_size(&self) -> usize {
        self.size
    }

    /// Row-major samples (`index = j * grid_size + i`, i along x, j along z)
    pub fn samples(&self) -> &[SurfaceSample] {
        &self.samples
    }

    /// Frozen copy of the current samples for the renderer
    pub fn snapshot(&self) -> Arc<[SurfaceSample]> {
        Arc::from(self.samples.as_slice())
    }

    /// False between a height mutation and the next `recompute_normals`
    pub fn normals_valid(&self) -> bool {
        self.normals_valid
    }

    #[inline]
    pub(super) fn index(&self, i: usize, j: usize) -> usize {
        j * self.size + i
    }

    pub fn sample(&self, i: usize, j: usize) -> SurfaceSample {
        self.samples[self.index(i, j)]
    }

    /// Texture-space coordinate (0..1) of sample `i` along one axis
    #[inline]
    pub(super) fn sample_uv(&self, i: usize) -> f32 {
        (i as f32 + 0.5) / self.size as f32
    }

    /// World coordinate of sample `i` along one axis
    #[inline]
    pub fn sample_world(&self, i: usize) -> f32 {
        (self.sample_uv(i) * 2.0 - 1.0) * self.params.pool_half_extent
    }

    /// Grid indices of the sample nearest to world `(x, z)`, `None` outside the pool
    pub fn index_of(&self, x: f32, z: f32) -> Option<(usize, usize)> {
        let extent = self.params.pool_half_extent;
        if !(x.abs() <= extent && z.abs() <= extent) {
            return None;
        }
        let to_index = |w: f32| {
            let uv = (w / extent) * 0.5 + 0.5;
            ((uv * self.size as f32) as usize).min(self.size - 1)
        };
        Some((to_index(x), to_index(z)))
    }

    /// Height of the sample nearest to world `(x, z)`
    pub fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        self.index_of(x, z).map(|(i, j)| self.sample(i, j).height)
    }

    /// Largest |height| and |velocity| over the field
    pub fn max_magnitudes(&self) -> (f32, f32) {
        self.samples.iter().fold((0.0f32, 0.0f32), |(h, v), s| {
            (h.max(s.height.abs()), v.max(s.velocity.abs()))
        })
    }

    /// Sum of all heights (approximate liquid volume above rest level)
    pub fn total_height(&self) -> f32 {
        self.samples.iter().map(|s| s.height).sum()
    }

    pub(super) fn invalidate_normals(&mut self) {
        self.normals_valid = false;
    }

    /// Clamp to the configured bound; non-finite values reset to rest.
    /// Returns true when a non-finite value was replaced.
    #[inline]
    pub(super) fn sanitize(value: &mut f32, bound: f32) -> bool {
        if value.is_finite() {
            *value = value.clamp(-bound, bound);
            false
        } else {
            *value = 0.0;
            true
        }
    }

    /// Advance one explicit sub-step of the wave equation.
    ///
    /// Per sample: `v += (avg4 - h) * spring_gain * wave_scale`, then
    /// `v *= 1 - damping_base / flow_speed` (floored at `min_retention`), then
    /// `h += v`. This is a symplectic Euler step of the discrete wave equation
    /// and is stable while `spring_gain * wave_scale <= 2`; `wave_scale` is
    /// clamped to that bound.
    ///
    /// Callers advance a visible tick with two calls.
    pub fn step_wave(&mut self, flow_speed: f32, wave_scale: f32) {
        let p = &self.params;
        let max_scale = 2.0 / p.spring_gain.max(f32::EPSILON);
        let gain = p.spring_gain
            * if wave_scale.is_finite() {
                wave_scale.clamp(0.0, max_scale)
            } else {
                0.0
            };
        let retention = if flow_speed.is_finite() && flow_speed > 0.0 {
            (1.0 - p.damping_base / flow_speed).clamp(p.min_retention, 1.0)
        } else {
            p.min_retention
        };
        let bound = p.max_magnitude;
        let n = self.size;
        let last = n - 1;
        let mut reset = 0usize;

        for j in 0..n {
            let up = (j + 1).min(last);
            let down = j.saturating_sub(1);
            for i in 0..n {
                let right = (i + 1).min(last);
                let left = i.saturating_sub(1);

                let here = self.samples[j * n + i];
                let average = (self.samples[j * n + left].height
                    + self.samples[j * n + right].height
                    + self.samples[down * n + i].height
                    + self.samples[up * n + i].height)
                    * 0.25;

                let mut velocity = (here.velocity + (average - here.height) * gain) * retention;
                if Self::sanitize(&mut velocity, bound) {
                    reset += 1;
                }
                let mut height = here.height + velocity;
                if Self::sanitize(&mut height, bound) {
                    reset += 1;
                }

                self.scratch[j * n + i] = SurfaceSample {
                    height,
                    velocity,
                    ..here
                };
            }
        }

        std::mem::swap(&mut self.samples, &mut self.scratch);
        self.invalidate_normals();

        if reset > 0 {
            log::warn!("Wave step reset {} non-finite values to rest", reset);
        }
    }

    /// Derive per-sample normals from forward height differences.
    ///
    /// Must run after each round of `step_wave` calls and before the field is
    /// handed to the renderer.
    pub fn recompute_normals(&mut self) {
        let n = self.size;
        let last = n - 1;
        let delta = 1.0 / n as f32;

        for j in 0..n {
            let up = (j + 1).min(last);
            for i in 0..n {
                let right = (i + 1).min(last);
                let h = self.samples[j * n + i].height;
                let along_x = Vec3::new(delta, self.samples[j * n + right].height - h, 0.0);
                let along_z = Vec3::new(0.0, self.samples[up * n + i].height - h, delta);
                let normal = along_z.cross(along_x).try_normalize().unwrap_or(Vec3::Y);

                let sample = &mut self.samples[j * n + i];
                sample.normal_x = normal.x;
                sample.normal_z = normal.z;
            }
        }

        self.normals_valid = true;
    }
}
