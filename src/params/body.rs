//! Rigid sphere physics parameters.

/// Sphere dynamics parameters
#[derive(Debug, Clone)]
pub struct BodyParams {
    /// Start position of the sphere center (world units)
    pub initial_center: [f32; 3],

    /// Sphere radius (world units)
    pub radius: f32,

    /// Gravity acceleration (world units per second²)
    pub gravity: [f32; 3],

    /// Buoyancy factor `k` in `gravity * (dt - k * dt * submerged)`.
    /// Above 1.0 a fully submerged sphere floats up.
    pub buoyancy: f32,

    /// Fraction of vertical speed kept when bouncing off the pool floor
    pub restitution: f32,

    /// Frame times above this (seconds) skip the whole tick
    pub max_dt_s: f32,

    /// Highest allowed center height (world units)
    pub ceiling_y: f32,

    /// Simulate gravity and drag at start-up
    pub use_physics: bool,
}

impl Default for BodyParams {
    fn default() -> Self {
        Self {
            initial_center: [-0.4, -0.75, 0.2],
            radius: 0.25,
            gravity: [0.0, -4.0, 0.0],
            buoyancy: 1.1,
            restitution: 0.7,
            max_dt_s: 1.0,
            ceiling_y: 10.0,
            use_physics: false,
        }
    }
}
