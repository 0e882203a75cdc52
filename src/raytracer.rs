//! Picking: viewport pixels to world-space rays, plus plane and sphere hit tests.

use glam::{Mat4, Vec2, Vec3};

use crate::camera::CameraTransform;

/// Directions whose relevant component is smaller than this count as parallel
const PARALLEL_EPSILON: f32 = 1e-6;

/// A world-space ray. `direction` is not necessarily normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Point at parameter `t`
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Nearest forward intersection with a sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereHit {
    pub t: f32,
    pub hit: Vec3,
    pub normal: Vec3,
}

/// Unprojects viewport pixels through a fixed camera transform.
///
/// Pixel `(0, 0)` is the top-left corner of the viewport.
#[derive(Debug, Clone)]
pub struct Raytracer {
    eye: Vec3,
    inv_view_proj: Mat4,
    viewport: Vec2,
}

impl Raytracer {
    pub fn new(transform: &CameraTransform) -> Self {
        Self {
            eye: transform.eye(),
            inv_view_proj: transform.view_proj().inverse(),
            viewport: Vec2::new(
                transform.viewport.0.max(1) as f32,
                transform.viewport.1.max(1) as f32,
            ),
        }
    }

    /// Camera eye point in world space (origin of every picking ray)
    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    /// Ray from the eye through the far-plane point under pixel `(px, py)`
    pub fn ray_for_pixel(&self, px: f32, py: f32) -> Ray {
        let ndc_x = 2.0 * px / self.viewport.x - 1.0;
        let ndc_y = 1.0 - 2.0 * py / self.viewport.y;
        let far = self.inv_view_proj.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));
        Ray::new(self.eye, far - self.eye)
    }

    /// Ray through the viewport center (the camera's forward direction)
    pub fn center_ray(&self) -> Ray {
        self.ray_for_pixel(self.viewport.x * 0.5, self.viewport.y * 0.5)
    }
}

/// Ray parameter where the ray meets the plane through `point` with `normal`.
/// `None` when the ray runs parallel to the plane.
pub fn intersect_plane_through(ray: &Ray, point: Vec3, normal: Vec3) -> Option<f32> {
    let denom = normal.dot(ray.direction);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = -normal.dot(ray.origin - point) / denom;
    t.is_finite().then_some(t)
}

/// Intersection with the horizontal plane `y = plane_y`.
///
/// `None` when the ray is parallel to the plane or the plane lies behind the
/// ray origin.
pub fn intersect_plane(ray: &Ray, plane_y: f32) -> Option<Vec3> {
    if ray.direction.y.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = (plane_y - ray.origin.y) / ray.direction.y;
    if !t.is_finite() || t < 0.0 {
        return None;
    }
    Some(ray.at(t))
}

/// Nearest intersection with positive `t`, or `None` on a miss.
pub fn intersect_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<SphereHit> {
    let offset = ray.origin - center;
    let a = ray.direction.length_squared();
    if a < PARALLEL_EPSILON * PARALLEL_EPSILON {
        return None;
    }
    let b = 2.0 * ray.direction.dot(offset);
    let c = offset.length_squared() - radius * radius;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let near = (-b - sqrt_d) / (2.0 * a);
    let far = (-b + sqrt_d) / (2.0 * a);
    let t = if near > 0.0 {
        near
    } else if far > 0.0 {
        far
    } else {
        return None;
    };

    let hit = ray.at(t);
    Some(SphereHit {
        t,
        hit,
        normal: (hit - center) / radius,
    })
}
