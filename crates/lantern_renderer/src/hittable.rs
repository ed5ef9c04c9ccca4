//! Hittable trait and HitRecord for ray-object intersection.

use crate::{Material, Primitive};
use lantern_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Record of a ray-object intersection.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal as reported by the geometry (unit length).
    ///
    /// Not flipped toward the ray; materials that care about the side
    /// use [`HitRecord::front_face`].
    pub normal: Vec3,
    /// UV texture coordinates
    pub u: f32,
    pub v: f32,
    /// Material at the intersection point
    pub material: &'a dyn Material,
}

impl<'a> HitRecord<'a> {
    /// Whether the ray arrived from the side the normal points to.
    #[inline]
    pub fn front_face(&self, ray: &Ray) -> bool {
        ray.direction().dot(self.normal) < 0.0
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Closest intersection with `ray` inside `ray_t`, if any.
    ///
    /// `rng` is only consumed by stochastic geometry (participating media).
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>>;

    /// Bounding box valid for every time in `[time0, time1]`.
    ///
    /// `None` means the object is unbounded or empty.
    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb>;
}

/// A list of primitives tested by linear scan.
#[derive(Default)]
pub struct HittableList {
    objects: Vec<Primitive>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: impl Into<Primitive>) {
        self.objects.push(object.into());
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Hand the objects over, e.g. to build a BVH.
    pub fn into_objects(self) -> Vec<Primitive> {
        self.objects
    }
}

impl From<Vec<Primitive>> for HittableList {
    fn from(objects: Vec<Primitive>) -> Self {
        Self { objects }
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;

        for object in &self.objects {
            let window = closest.map_or(ray_t, |rec| ray_t.with_max(rec.t));
            if let Some(rec) = object.hit(ray, window, rng) {
                closest = Some(rec);
            }
        }

        closest
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        let mut objects = self.objects.iter();
        let first = objects.next()?.bounding_box(time0, time1)?;

        objects.try_fold(first, |acc, object| {
            object
                .bounding_box(time0, time1)
                .map(|bbox| Aabb::surrounding(&acc, &bbox))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn sphere_at(z: f32) -> Sphere {
        Sphere::new(Vec3::new(0.0, 0.0, z), 0.5, Arc::new(Lambertian::new(Vec3::splat(0.5))))
    }

    #[test]
    fn test_list_returns_closest_hit() {
        let mut list = HittableList::new();
        list.add(sphere_at(-5.0));
        list.add(sphere_at(-2.0));
        list.add(sphere_at(-8.0));

        let mut rng = StdRng::seed_from_u64(42);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let rec = list.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng).unwrap();

        assert!((rec.t - 1.5).abs() < 1e-5);
        assert!(rec.front_face(&ray));
    }

    #[test]
    fn test_list_bounding_box() {
        let mut list = HittableList::new();
        assert!(list.bounding_box(0.0, 1.0).is_none());

        list.add(sphere_at(-5.0));
        list.add(sphere_at(2.0));

        let bbox = list.bounding_box(0.0, 1.0).unwrap();
        assert_eq!(bbox.min(), Vec3::new(-0.5, -0.5, -5.5));
        assert_eq!(bbox.max(), Vec3::new(0.5, 0.5, 2.5));
    }

    #[test]
    fn test_list_miss() {
        let mut list = HittableList::new();
        list.add(sphere_at(-5.0));

        let mut rng = StdRng::seed_from_u64(42);
        let ray = Ray::new(Vec3::ZERO, Vec3::Y, 0.0);
        assert!(list.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng).is_none());
    }
}
