//! Pointer gesture classification and dispatch.
//!
//! A gesture is classified once when it starts:
//!
//! ```text
//! None ──down──> MoveBody            (ray hits the sphere)
//!      ──down──> InjectDisturbance   (ray meets y = 0 inside the pool)
//!      ──down──> OrbitCamera         (anything else)
//! any  ──up────> None
//! ```
//!
//! Pointer positions arrive in CSS pixels. Picking multiplies them by the
//! device pixel ratio; orbiting uses the raw deltas.

use glam::{Vec2, Vec3};

use crate::body::BodyDynamics;
use crate::camera::{CameraTransform, OrbitCamera};
use crate::raytracer::{intersect_plane, intersect_plane_through, intersect_sphere, Ray, Raytracer};
use crate::water::WaveField;

/// What the current drag gesture does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    None,
    InjectDisturbance,
    MoveBody,
    OrbitCamera,
}

/// State changed by one pointer event, so the caller knows what to refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionEffect {
    Nothing,
    DropAdded,
    BodyMoved,
    CameraOrbited,
}

/// Everything a gesture may mutate
pub struct InteractionTargets<'a> {
    pub camera: &'a mut OrbitCamera,
    pub water: &'a mut WaveField,
    pub body: &'a mut BodyDynamics,
}

/// Drag plane for moving the sphere
#[derive(Debug, Clone, Copy)]
struct BodyGrab {
    prev_hit: Vec3,
    plane_normal: Vec3,
}

#[derive(Debug)]
pub struct InteractionController {
    mode: InteractionMode,
    grab: Option<BodyGrab>,
    last_pointer: Vec2,
    pixel_ratio: f32,
    drop_radius: f32,
    drop_strength: f32,
}

impl InteractionController {
    pub fn new(pixel_ratio: f32, drop_radius: f32, drop_strength: f32) -> Self {
        Self {
            mode: InteractionMode::None,
            grab: None,
            last_pointer: Vec2::ZERO,
            pixel_ratio,
            drop_radius,
            drop_strength,
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// The pointer currently owns the sphere
    pub fn holds_body(&self) -> bool {
        self.mode == InteractionMode::MoveBody
    }

    fn pick_ray(&self, tracer: &Raytracer, pointer: Vec2) -> Ray {
        tracer.ray_for_pixel(pointer.x * self.pixel_ratio, pointer.y * self.pixel_ratio)
    }

    /// Classify a new gesture. Sphere hits take priority over the water.
    pub fn pointer_down(
        &mut self,
        pointer: Vec2,
        transform: &CameraTransform,
        targets: InteractionTargets<'_>,
    ) -> InteractionEffect {
        self.last_pointer = pointer;
        self.grab = None;

        let tracer = Raytracer::new(transform);
        let ray = self.pick_ray(&tracer, pointer);
        let body = targets.body.body();

        if let Some(hit) = intersect_sphere(&ray, body.center, body.radius) {
            self.mode = InteractionMode::MoveBody;
            self.grab = Some(BodyGrab {
                prev_hit: hit.hit,
                plane_normal: -tracer.center_ray().direction,
            });
            log::debug!("Gesture grabbed body at {}", hit.hit);
            return InteractionEffect::Nothing;
        }

        let extent = targets.water.params().pool_half_extent;
        match intersect_plane(&ray, 0.0) {
            Some(point) if point.x.abs() < extent && point.z.abs() < extent => {
                self.mode = InteractionMode::InjectDisturbance;
                log::debug!("Gesture injecting at ({}, {})", point.x, point.z);
                self.inject(&ray, targets.water)
            }
            _ => {
                self.mode = InteractionMode::OrbitCamera;
                InteractionEffect::Nothing
            }
        }
    }

    /// Continue the active gesture
    pub fn pointer_move(
        &mut self,
        pointer: Vec2,
        transform: &CameraTransform,
        targets: InteractionTargets<'_>,
    ) -> InteractionEffect {
        let delta = pointer - self.last_pointer;
        self.last_pointer = pointer;

        match self.mode {
            InteractionMode::None => InteractionEffect::Nothing,
            InteractionMode::InjectDisturbance => {
                let tracer = Raytracer::new(transform);
                let ray = self.pick_ray(&tracer, pointer);
                self.inject(&ray, targets.water)
            }
            InteractionMode::MoveBody => {
                let tracer = Raytracer::new(transform);
                let ray = self.pick_ray(&tracer, pointer);
                let Some(grab) = self.grab.as_mut() else {
                    return InteractionEffect::Nothing;
                };
                let Some(t) = intersect_plane_through(&ray, grab.prev_hit, grab.plane_normal)
                else {
                    return InteractionEffect::Nothing;
                };
                let next_hit = ray.at(t);
                targets.body.translate(next_hit - grab.prev_hit);
                grab.prev_hit = next_hit;
                InteractionEffect::BodyMoved
            }
            InteractionMode::OrbitCamera => {
                targets.camera.orbit(delta.x, delta.y);
                InteractionEffect::CameraOrbited
            }
        }
    }

    pub fn pointer_up(&mut self) {
        self.mode = InteractionMode::None;
        self.grab = None;
    }

    fn inject(&self, ray: &Ray, water: &mut WaveField) -> InteractionEffect {
        match intersect_plane(ray, 0.0) {
            Some(point) if water.add_drop(point.x, point.z, self.drop_radius, self.drop_strength) => {
                InteractionEffect::DropAdded
            }
            _ => InteractionEffect::Nothing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraAngles;
    use crate::params::{BodyParams, CameraParams, RenderConfig, WaterParams};
    use glam::Mat4;

    struct Scene {
        camera: OrbitCamera,
        water: WaveField,
        body: BodyDynamics,
        config: RenderConfig,
    }

    impl Scene {
        /// Camera looking straight down, so screen positions map simply onto the pool
        fn top_down() -> Self {
            let camera = OrbitCamera::with_angles(
                CameraParams::default(),
                CameraAngles {
                    yaw_deg: 0.0,
                    pitch_deg: -89.0,
                },
            );
            let mut body = BodyParams::default();
            body.initial_center = [0.5, -0.1, 0.0];
            Self {
                camera,
                water: WaveField::new(WaterParams {
                    grid_size: 64,
                    ..WaterParams::default()
                }),
                body: BodyDynamics::new(body),
                config: RenderConfig {
                    width: 800,
                    height: 800,
                    pixel_ratio: 1.0,
                },
            }
        }

        fn transform(&self) -> CameraTransform {
            self.camera.transform(&self.config)
        }

        fn targets(&mut self) -> InteractionTargets<'_> {
            InteractionTargets {
                camera: &mut self.camera,
                water: &mut self.water,
                body: &mut self.body,
            }
        }

        /// Screen position of a world point
        fn project(&self, world: Vec3) -> Vec2 {
            let view_proj: Mat4 = self.transform().view_proj();
            let ndc = view_proj.project_point3(world);
            Vec2::new(
                (ndc.x + 1.0) * 0.5 * self.config.width as f32,
                (1.0 - ndc.y) * 0.5 * self.config.height as f32,
            )
        }
    }

    fn controller() -> InteractionController {
        InteractionController::new(1.0, 0.03, 0.01)
    }

    fn touched_samples(water: &WaveField) -> usize {
        water.samples().iter().filter(|s| s.velocity != 0.0).count()
    }

    #[test]
    fn test_gesture_on_sphere_moves_body() {
        let mut scene = Scene::top_down();
        let mut controller = controller();
        let pointer = scene.project(scene.body.body().center);
        let transform = scene.transform();

        let effect = controller.pointer_down(pointer, &transform, scene.targets());
        assert_eq!(controller.mode(), InteractionMode::MoveBody);
        assert_eq!(effect, InteractionEffect::Nothing);
        assert!(controller.holds_body());
        assert_eq!(touched_samples(&scene.water), 0, "grabbing must not add drops");
    }

    #[test]
    fn test_gesture_on_water_adds_exactly_one_drop() {
        let mut scene = Scene::top_down();
        let mut controller = controller();
        let pointer = scene.project(Vec3::new(-0.5, 0.0, -0.3));
        let transform = scene.transform();

        let effect = controller.pointer_down(pointer, &transform, scene.targets());
        assert_eq!(controller.mode(), InteractionMode::InjectDisturbance);
        assert_eq!(effect, InteractionEffect::DropAdded);

        // One drop of strength 0.01 puts at most 0.01 into any sample
        let peak = scene.water.max_magnitudes().1;
        assert!(peak > 0.0 && peak <= 0.01 + 1e-6, "peak velocity {}", peak);
        let mut reference = WaveField::new(scene.water.params().clone());
        let hit = {
            let tracer = Raytracer::new(&transform);
            intersect_plane(&tracer.ray_for_pixel(pointer.x, pointer.y), 0.0).unwrap()
        };
        reference.add_drop(hit.x, hit.z, 0.03, 0.01);
        assert_eq!(scene.water.samples(), reference.samples());
    }

    #[test]
    fn test_gesture_outside_pool_orbits() {
        let mut scene = Scene::top_down();
        let mut controller = controller();
        let pointer = scene.project(Vec3::new(1.2, 0.0, 1.2));
        let transform = scene.transform();

        controller.pointer_down(pointer, &transform, scene.targets());
        assert_eq!(controller.mode(), InteractionMode::OrbitCamera);

        let before = scene.camera.angles();
        let effect =
            controller.pointer_move(pointer + Vec2::new(12.0, -4.0), &transform, scene.targets());
        assert_eq!(effect, InteractionEffect::CameraOrbited);
        let after = scene.camera.angles();
        assert_eq!(after.yaw_deg, before.yaw_deg - 12.0);
        assert_eq!(after.pitch_deg, before.pitch_deg + 4.0);
        assert_eq!(touched_samples(&scene.water), 0);
    }

    #[test]
    fn test_drag_body_follows_pointer() {
        let mut scene = Scene::top_down();
        let mut controller = controller();
        let start = scene.body.body().center;
        let pointer = scene.project(start);
        let transform = scene.transform();

        controller.pointer_down(pointer, &transform, scene.targets());
        let effect =
            controller.pointer_move(pointer + Vec2::new(-40.0, 0.0), &transform, scene.targets());
        assert_eq!(effect, InteractionEffect::BodyMoved);

        let moved = scene.body.body().center;
        assert!(moved.x < start.x, "body should follow the pointer left");
        assert!((moved.z - start.z).abs() < 0.05);
    }

    #[test]
    fn test_drag_body_respects_play_area() {
        let mut scene = Scene::top_down();
        let mut controller = controller();
        let pointer = scene.project(scene.body.body().center);
        let transform = scene.transform();

        controller.pointer_down(pointer, &transform, scene.targets());
        controller.pointer_move(pointer + Vec2::new(4000.0, 0.0), &transform, scene.targets());
        let radius = scene.body.body().radius;
        assert!(scene.body.body().center.x <= 1.0 - radius);
    }

    #[test]
    fn test_move_while_injecting_adds_more_drops() {
        let mut scene = Scene::top_down();
        let mut controller = controller();
        let pointer = scene.project(Vec3::new(-0.5, 0.0, -0.3));
        let transform = scene.transform();

        controller.pointer_down(pointer, &transform, scene.targets());
        let after_first = touched_samples(&scene.water);
        let effect =
            controller.pointer_move(pointer + Vec2::new(0.0, 60.0), &transform, scene.targets());
        assert_eq!(effect, InteractionEffect::DropAdded);
        assert!(touched_samples(&scene.water) > after_first);
    }

    #[test]
    fn test_release_resets_mode() {
        let mut scene = Scene::top_down();
        let mut controller = controller();
        let pointer = scene.project(Vec3::new(-0.5, 0.0, -0.3));
        let transform = scene.transform();

        controller.pointer_down(pointer, &transform, scene.targets());
        controller.pointer_up();
        assert_eq!(controller.mode(), InteractionMode::None);

        let before = scene.water.samples().to_vec();
        let effect = controller.pointer_move(pointer, &transform, scene.targets());
        assert_eq!(effect, InteractionEffect::Nothing);
        assert_eq!(scene.water.samples(), before.as_slice());
    }

    #[test]
    fn test_pixel_ratio_scales_picking() {
        let mut scene = Scene::top_down();
        scene.config.width = 1600;
        scene.config.height = 1600;
        let mut controller = InteractionController::new(2.0, 0.03, 0.01);
        let device = scene.project(scene.body.body().center);
        let transform = scene.transform();

        controller.pointer_down(device / 2.0, &transform, scene.targets());
        assert_eq!(controller.mode(), InteractionMode::MoveBody);
    }
}
