//! The closed set of scene primitives.

use lantern_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

use crate::{
    AxisRect, BoxShape, Bvh, ConstantMedium, FlipNormals, HitRecord, Hittable, HittableList,
    MovingSphere, Rotate, Sphere, Translate, Triangle, TriangleMesh,
};

/// Any object that can live in the scene graph.
///
/// Dispatch happens through a single `match`, so adding a variant forces
/// every query to handle it.
pub enum Primitive {
    Sphere(Sphere),
    MovingSphere(MovingSphere),
    Rect(AxisRect),
    Box(BoxShape),
    Triangle(Triangle),
    Mesh(TriangleMesh),
    List(HittableList),
    Bvh(Bvh),
    Translate(Translate),
    Rotate(Rotate),
    FlipNormals(FlipNormals),
    ConstantMedium(ConstantMedium),
}

impl Primitive {
    /// Wrap in a [`Translate`] by `offset`.
    pub fn translated(self, offset: Vec3) -> Primitive {
        Translate::new(self, offset).into()
    }

    /// Wrap in a [`Rotate`] by per-axis angles in degrees.
    pub fn rotated(self, angles_degrees: Vec3) -> Primitive {
        Rotate::new(self, angles_degrees).into()
    }

    /// Wrap in a [`FlipNormals`].
    pub fn flipped(self) -> Primitive {
        FlipNormals::new(self).into()
    }
}

impl Hittable for Primitive {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        match self {
            Primitive::Sphere(p) => p.hit(ray, ray_t, rng),
            Primitive::MovingSphere(p) => p.hit(ray, ray_t, rng),
            Primitive::Rect(p) => p.hit(ray, ray_t, rng),
            Primitive::Box(p) => p.hit(ray, ray_t, rng),
            Primitive::Triangle(p) => p.hit(ray, ray_t, rng),
            Primitive::Mesh(p) => p.hit(ray, ray_t, rng),
            Primitive::List(p) => p.hit(ray, ray_t, rng),
            Primitive::Bvh(p) => p.hit(ray, ray_t, rng),
            Primitive::Translate(p) => p.hit(ray, ray_t, rng),
            Primitive::Rotate(p) => p.hit(ray, ray_t, rng),
            Primitive::FlipNormals(p) => p.hit(ray, ray_t, rng),
            Primitive::ConstantMedium(p) => p.hit(ray, ray_t, rng),
        }
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        match self {
            Primitive::Sphere(p) => p.bounding_box(time0, time1),
            Primitive::MovingSphere(p) => p.bounding_box(time0, time1),
            Primitive::Rect(p) => p.bounding_box(time0, time1),
            Primitive::Box(p) => p.bounding_box(time0, time1),
            Primitive::Triangle(p) => p.bounding_box(time0, time1),
            Primitive::Mesh(p) => p.bounding_box(time0, time1),
            Primitive::List(p) => p.bounding_box(time0, time1),
            Primitive::Bvh(p) => p.bounding_box(time0, time1),
            Primitive::Translate(p) => p.bounding_box(time0, time1),
            Primitive::Rotate(p) => p.bounding_box(time0, time1),
            Primitive::FlipNormals(p) => p.bounding_box(time0, time1),
            Primitive::ConstantMedium(p) => p.bounding_box(time0, time1),
        }
    }
}

macro_rules! impl_from_primitive {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Primitive {
                fn from(value: $ty) -> Self {
                    Primitive::$variant(value)
                }
            }
        )*
    };
}

impl_from_primitive! {
    Sphere => Sphere,
    MovingSphere => MovingSphere,
    Rect => AxisRect,
    Box => BoxShape,
    Triangle => Triangle,
    Mesh => TriangleMesh,
    List => HittableList,
    Bvh => Bvh,
    Translate => Translate,
    Rotate => Rotate,
    FlipNormals => FlipNormals,
    ConstantMedium => ConstantMedium,
}
