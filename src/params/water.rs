//! Wave-field resolution, stepping constants and disturbance defaults.

/// Height-field simulation parameters
#[derive(Debug, Clone)]
pub struct WaterParams {
    /// Samples per side (the field is `grid_size × grid_size`)
    pub grid_size: usize,

    /// Half-extent of the pool in world units; the field covers
    /// `x, z ∈ [-pool_half_extent, pool_half_extent]`
    pub pool_half_extent: f32,

    /// Restoring-force gain of the wave update before `wave_scale` is applied.
    /// Stability bound of the explicit stepper: `spring_gain * wave_scale <= 2`
    pub spring_gain: f32,

    /// Damping numerator: each sub-step multiplies velocity by
    /// `1 - damping_base / flow_speed` (water at flow 0.5 → 0.995)
    pub damping_base: f32,

    /// Lower bound on the per-step velocity retention factor
    pub min_retention: f32,

    /// Hard bound on |height| and |velocity| (world units)
    pub max_magnitude: f32,

    /// Height displaced per world unit of submerged sphere column
    pub displacement_scale: f32,

    /// Default drop radius (fraction of the unit texture domain)
    pub drop_radius: f32,

    /// Default drop strength (velocity impulse)
    pub drop_strength: f32,

    /// Drops scattered over the pool at start-up (alternating sign)
    pub initial_drops: usize,

    /// Seed for the start-up drop placement
    pub seed: u64,
}

impl Default for WaterParams {
    fn default() -> Self {
        Self {
            grid_size: 256,
            pool_half_extent: 1.0,
            spring_gain: 2.0,
            damping_base: 0.0025,
            min_retention: 0.9,
            max_magnitude: 1.0,
            displacement_scale: 0.4,
            drop_radius: 0.03,
            drop_strength: 0.01,
            initial_drops: 20,
            seed: 42,
        }
    }
}
