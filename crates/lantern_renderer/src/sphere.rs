//! Sphere primitives for ray tracing.

use std::f32::consts::PI;
use std::sync::Arc;

use crate::{HitRecord, Hittable, Material};
use lantern_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// A sphere primitive.
#[derive(Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval, _rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        hit_sphere(self.center, self.radius, self.material.as_ref(), ray, ray_t)
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(self.bbox)
    }
}

/// A sphere whose center moves linearly from `center0` at `time0` to
/// `center1` at `time1`.
#[derive(Clone)]
pub struct MovingSphere {
    center0: Vec3,
    center1: Vec3,
    time0: f32,
    time1: f32,
    radius: f32,
    material: Arc<dyn Material>,
}

impl MovingSphere {
    pub fn new(
        center0: Vec3,
        center1: Vec3,
        time0: f32,
        time1: f32,
        radius: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        Self {
            center0,
            center1,
            time0,
            time1,
            radius: radius.max(0.0),
            material,
        }
    }

    /// Center at the given shutter time.
    pub fn center(&self, time: f32) -> Vec3 {
        let span = self.time1 - self.time0;
        if span == 0.0 {
            return self.center0;
        }
        self.center0 + ((time - self.time0) / span) * (self.center1 - self.center0)
    }

    fn box_at(&self, time: f32) -> Aabb {
        let rvec = Vec3::splat(self.radius);
        let center = self.center(time);
        Aabb::from_points(center - rvec, center + rvec)
    }
}

impl Hittable for MovingSphere {
    fn hit(&self, ray: &Ray, ray_t: Interval, _rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        hit_sphere(
            self.center(ray.time()),
            self.radius,
            self.material.as_ref(),
            ray,
            ray_t,
        )
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        Some(Aabb::surrounding(&self.box_at(time0), &self.box_at(time1)))
    }
}

/// Nearest root of the ray/sphere quadratic strictly inside `ray_t`.
fn hit_sphere<'a>(
    center: Vec3,
    radius: f32,
    material: &'a dyn Material,
    ray: &Ray,
    ray_t: Interval,
) -> Option<HitRecord<'a>> {
    let oc = center - ray.origin();
    let a = ray.direction().length_squared();
    let h = ray.direction().dot(oc);
    let c = oc.length_squared() - radius * radius;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();

    // Find the nearest root in the acceptable range
    let mut root = (h - sqrtd) / a;
    if !ray_t.surrounds(root) {
        root = (h + sqrtd) / a;
        if !ray_t.surrounds(root) {
            return None;
        }
    }

    let p = ray.at(root);
    let outward_normal = (p - center) / radius;
    let (u, v) = get_sphere_uv(outward_normal);

    Some(HitRecord {
        t: root,
        p,
        normal: outward_normal,
        u,
        v,
        material,
    })
}

/// Get the UV coordinates for a point on the unit sphere.
fn get_sphere_uv(p: Vec3) -> (f32, f32) {
    // p is a point on the unit sphere centered at origin
    // theta: angle down from +Y
    // phi: angle around Y axis from +X
    let theta = (-p.y).clamp(-1.0, 1.0).acos();
    let phi = (-p.z).atan2(p.x) + PI;

    let u = phi / (2.0 * PI);
    let v = theta / PI;
    (u, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lambertian;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grey() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Vec3::new(0.5, 0.5, 0.5)))
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey());
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let mut rng = StdRng::seed_from_u64(42);

        let rec = sphere
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .unwrap();
        assert!((rec.t - 0.5).abs() < 0.001); // Should hit at t=0.5
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey());
        let mut rng = StdRng::seed_from_u64(42);

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), 0.0);
        assert!(sphere
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .is_none());
    }

    #[test]
    fn test_sphere_hit_from_inside_reports_outward_normal() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0, grey());
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.0);
        let mut rng = StdRng::seed_from_u64(42);

        let rec = sphere
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .unwrap();
        assert!((rec.t - 2.0).abs() < 1e-5);
        assert!((rec.normal - Vec3::X).length() < 1e-5);
        assert!(!rec.front_face(&ray));
    }

    #[test]
    fn test_sphere_window_is_exclusive() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey());
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let mut rng = StdRng::seed_from_u64(42);

        // Window ends exactly at the near root; the far root is outside too.
        assert!(sphere.hit(&ray, Interval::new(0.001, 0.5), &mut rng).is_none());
    }

    #[test]
    fn test_sphere_uv() {
        let (u, v) = get_sphere_uv(Vec3::new(1.0, 0.0, 0.0));
        assert!((u - 0.5).abs() < 1e-5);
        assert!((v - 0.5).abs() < 1e-5);

        let (_, v) = get_sphere_uv(Vec3::Y);
        assert!((v - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_moving_sphere_center_and_box() {
        let sphere = MovingSphere::new(
            Vec3::ZERO,
            Vec3::new(0.0, 2.0, 0.0),
            0.0,
            1.0,
            0.5,
            grey(),
        );

        assert_eq!(sphere.center(0.5), Vec3::new(0.0, 1.0, 0.0));

        let bbox = sphere.bounding_box(0.0, 1.0).unwrap();
        assert_eq!(bbox.min(), Vec3::splat(-0.5));
        assert_eq!(bbox.max(), Vec3::new(0.5, 2.5, 0.5));
    }

    #[test]
    fn test_moving_sphere_hit_uses_ray_time() {
        let sphere = MovingSphere::new(
            Vec3::new(0.0, 0.0, -2.0),
            Vec3::new(10.0, 0.0, -2.0),
            0.0,
            1.0,
            0.5,
            grey(),
        );
        let mut rng = StdRng::seed_from_u64(42);
        let window = Interval::new(0.001, f32::INFINITY);

        let early = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(sphere.hit(&early, window, &mut rng).is_some());

        let late = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 1.0);
        assert!(sphere.hit(&late, window, &mut rng).is_none());
    }
}
