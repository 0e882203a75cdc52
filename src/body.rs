//! Rigid sphere dynamics: gravity, buoyancy, liquid-specific drag, floor bounce.

use glam::Vec3;

use crate::math::{clamp_box, Vec3Ext};
use crate::params::{BodyParams, DragCurve};

/// The sphere floating in the pool
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    pub center: Vec3,
    /// Center passed to the most recent displacement coupling
    pub previous_center: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
}

/// What `integrate` did this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationOutcome {
    /// Oversized or invalid dt, nothing changed
    Skipped,
    /// Held by the pointer: velocity zeroed, no physics
    Held,
    /// Physics disabled: only the floor check ran
    Resting,
    /// Gravity and drag were integrated
    Simulated,
}

/// Owns the sphere and advances it under the active drag curve
#[derive(Debug, Clone)]
pub struct BodyDynamics {
    body: RigidBody,
    params: BodyParams,
    gravity: Vec3,
}

impl BodyDynamics {
    pub fn new(params: BodyParams) -> Self {
        let center = Vec3::from_array(params.initial_center);
        Self {
            body: RigidBody {
                center,
                previous_center: center,
                velocity: Vec3::ZERO,
                radius: params.radius,
            },
            gravity: Vec3::from_array(params.gravity),
            params,
        }
    }

    pub fn body(&self) -> &RigidBody {
        &self.body
    }

    pub fn params(&self) -> &BodyParams {
        &self.params
    }

    /// Fraction of the sphere's vertical extent below the rest level, 0..=1
    pub fn submerged_fraction(&self) -> f32 {
        let r = self.body.radius;
        ((r - self.body.center.y) / (2.0 * r)).clamp(0.0, 1.0)
    }

    /// Lower and upper corners of the box the center may occupy
    pub fn play_area(&self) -> (Vec3, Vec3) {
        let r = self.body.radius;
        (
            Vec3::new(r - 1.0, r - 1.0, r - 1.0),
            Vec3::new(1.0 - r, self.params.ceiling_y, 1.0 - r),
        )
    }

    /// Move the center by `delta` (pointer drag), clamped to the play area
    pub fn translate(&mut self, delta: Vec3) {
        if !delta.is_finite() {
            return;
        }
        let (min, max) = self.play_area();
        self.body.center = clamp_box(self.body.center + delta, min, max);
    }

    /// Record the center used for displacement coupling and return the
    /// `(old, new)` pair to couple
    pub fn take_displacement(&mut self) -> (Vec3, Vec3) {
        let old = self.body.previous_center;
        self.body.previous_center = self.body.center;
        (old, self.body.center)
    }

    /// Advance the sphere by `dt` seconds.
    ///
    /// While `held` the velocity is zeroed and the pointer owns the position.
    /// Otherwise gravity (reduced by buoyancy), quadratic drag and the curve's
    /// post-adjustments run when `use_physics` is set. The floor bounce and the
    /// play-area clamp always run. Frame times above the configured threshold
    /// skip the tick entirely.
    pub fn integrate(
        &mut self,
        dt: f32,
        held: bool,
        use_physics: bool,
        curve: &DragCurve,
    ) -> IntegrationOutcome {
        if !(dt.is_finite() && dt >= 0.0 && dt <= self.params.max_dt_s) {
            log::warn!("Skipping body integration for dt={}", dt);
            return IntegrationOutcome::Skipped;
        }

        let outcome = if held {
            self.body.velocity = Vec3::ZERO;
            IntegrationOutcome::Held
        } else if use_physics {
            self.apply_drag_curve(dt, curve);
            IntegrationOutcome::Simulated
        } else {
            IntegrationOutcome::Resting
        };

        self.bounce_off_floor();
        let (min, max) = self.play_area();
        self.body.center = clamp_box(self.body.center, min, max);
        if self.body.center.y >= max.y && self.body.velocity.y > 0.0 {
            self.body.velocity.y = 0.0;
        }

        outcome
    }

    fn apply_drag_curve(&mut self, dt: f32, curve: &DragCurve) {
        let submerged = self.submerged_fraction();
        let body = &mut self.body;

        // Buoyancy cancels gravity in proportion to submersion
        let gravity_dt = dt - self.params.buoyancy * dt * submerged * curve.submersion_gain;
        body.velocity += self.gravity * gravity_dt;

        // Quadratic drag, only in the liquid
        let speed_sq = body.velocity.length_squared();
        body.velocity -= body.velocity.unit() * (submerged * dt * speed_sq);

        body.center += body.velocity * dt;

        if let Some(factor) = curve.rising_factor {
            if body.velocity.y > 0.0 {
                body.velocity *= factor;
            }
        }
        if let Some((depth, factor)) = curve.shallow_damping {
            if body.center.y < depth {
                body.velocity *= factor;
            }
        }

        if !body.velocity.is_finite() || !body.center.is_finite() {
            log::warn!("Body state became non-finite, resetting velocity");
            body.velocity = Vec3::ZERO;
            body.center = body.previous_center;
        }
    }

    /// Bounce off the pool floor at `y = radius - 1`
    fn bounce_off_floor(&mut self) {
        let floor = self.body.radius - 1.0;
        if self.body.center.y < floor {
            self.body.center.y = floor;
            self.body.velocity.y = self.body.velocity.y.abs() * self.params.restitution;
        }
    }
}
