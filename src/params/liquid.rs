//! Liquid profiles: wave parameters, tint and the body drag curve per liquid.

use std::fmt;

use clap::ValueEnum;

/// The three selectable liquids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum LiquidProfile {
    #[default]
    Water,
    Honey,
    Jello,
}

/// Wave-field parameters and render tint for one liquid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiquidParams {
    /// Flow speed (dimensionless). Lower = more viscous, waves die out faster.
    /// Water: 0.5
    pub flow_speed: f32,

    /// Wave scale (dimensionless, 0..=1). Scales the restoring force of the
    /// surface; values above 1 are unstable with the explicit stepper.
    /// Water: 1.0
    pub wave_scale: f32,

    /// RGB tint handed to the renderer (may exceed 1.0 for a glow effect)
    pub color: [f32; 3],
}

/// Profile-specific shape of the body drag law.
///
/// Gravity is scaled by `dt - buoyancy * dt * submerged * submersion_gain`, then
/// the quadratic drag is applied, the position integrated, and finally the
/// optional post-adjustments run on the new state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragCurve {
    /// Multiplier on the submerged fraction in the buoyancy term
    pub submersion_gain: f32,

    /// Velocity multiplier applied when the body is moving upward
    pub rising_factor: Option<f32>,

    /// `(depth, factor)`: velocity multiplier applied when `center.y < depth`
    pub shallow_damping: Option<(f32, f32)>,
}

impl LiquidProfile {
    pub const ALL: [LiquidProfile; 3] = [Self::Water, Self::Honey, Self::Jello];

    pub fn params(self) -> LiquidParams {
        match self {
            Self::Water => LiquidParams {
                flow_speed: 0.5,
                wave_scale: 1.0,
                color: [0.25, 1.0, 1.25],
            },
            Self::Honey => LiquidParams {
                flow_speed: 0.1,
                wave_scale: 0.8,
                color: [0.7, 0.4, 0.0],
            },
            Self::Jello => LiquidParams {
                flow_speed: 1.0,
                wave_scale: 0.7,
                color: [1.0, 0.0, 0.0],
            },
        }
    }

    pub fn drag_curve(self) -> DragCurve {
        match self {
            Self::Water => DragCurve {
                submersion_gain: 1.0,
                rising_factor: None,
                shallow_damping: None,
            },
            // Sticky: rising motion is strongly damped
            Self::Honey => DragCurve {
                submersion_gain: 4.0,
                rising_factor: Some(0.45),
                shallow_damping: Some((0.2, 0.65)),
            },
            // Springy: rising motion is amplified
            Self::Jello => DragCurve {
                submersion_gain: 8.0,
                rising_factor: Some(1.2),
                shallow_damping: Some((0.2, 0.65)),
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Honey => "honey",
            Self::Jello => "jello",
        }
    }
}

impl fmt::Display for LiquidProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
