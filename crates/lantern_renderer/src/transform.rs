//! Wrappers that forward hit queries through a coordinate or normal change.

use crate::{HitRecord, Hittable, Primitive};
use lantern_math::{Aabb, Interval, Ray, Rotation, Vec3};
use rand::RngCore;

/// Moves a child primitive by a fixed offset.
pub struct Translate {
    object: Box<Primitive>,
    offset: Vec3,
}

impl Translate {
    pub fn new(object: impl Into<Primitive>, offset: Vec3) -> Self {
        Self {
            object: Box::new(object.into()),
            offset,
        }
    }
}

impl Hittable for Translate {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let moved = ray.offset_origin(-self.offset);
        let mut rec = self.object.hit(&moved, ray_t, rng)?;
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.object
            .bounding_box(time0, time1)
            .map(|bbox| bbox.translate(self.offset))
    }
}

/// Rotates a child primitive about the coordinate axes, x then y then z.
pub struct Rotate {
    object: Box<Primitive>,
    rotation: Rotation,
}

impl Rotate {
    /// Rotate by per-axis angles in degrees.
    pub fn new(object: impl Into<Primitive>, angles_degrees: Vec3) -> Self {
        Self {
            object: Box::new(object.into()),
            rotation: Rotation::from_degrees(angles_degrees),
        }
    }
}

impl Hittable for Rotate {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let rotated = Ray::new(
            self.rotation.apply_inverse(ray.origin()),
            self.rotation.apply_inverse(ray.direction()),
            ray.time(),
        );

        let mut rec = self.object.hit(&rotated, ray_t, rng)?;
        rec.p = self.rotation.apply(rec.p);
        rec.normal = self.rotation.apply(rec.normal);
        Some(rec)
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.object
            .bounding_box(time0, time1)
            .map(|bbox| self.rotation.transform_aabb(&bbox))
    }
}

/// Reports the child's hits with the normal negated.
pub struct FlipNormals {
    object: Box<Primitive>,
}

impl FlipNormals {
    pub fn new(object: impl Into<Primitive>) -> Self {
        Self {
            object: Box::new(object.into()),
        }
    }
}

impl Hittable for FlipNormals {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let mut rec = self.object.hit(ray, ray_t, rng)?;
        rec.normal = -rec.normal;
        Some(rec)
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.object.bounding_box(time0, time1)
    }
}
