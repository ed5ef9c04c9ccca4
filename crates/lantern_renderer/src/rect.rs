//! Axis-aligned rectangles and boxes built from them.

use std::sync::Arc;

use crate::{FlipNormals, HitRecord, Hittable, HittableList, Material};
use lantern_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Plane a rectangle lies in. The rectangle's normal is the remaining axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// Spans x and y at fixed z.
    XY,
    /// Spans x and z at fixed y.
    XZ,
    /// Spans y and z at fixed x.
    YZ,
}

impl Plane {
    /// Axis indices `(a, b, normal)`: the two in-plane axes, then the normal axis.
    #[inline]
    fn axes(self) -> (usize, usize, usize) {
        match self {
            Plane::XY => (0, 1, 2),
            Plane::XZ => (0, 2, 1),
            Plane::YZ => (1, 2, 0),
        }
    }
}

/// Rectangle `[a0, a1] × [b0, b1]` on the plane `normal_axis = k`.
///
/// The reported normal is always the positive normal axis; wrap in
/// [`FlipNormals`] for the other orientation.
#[derive(Clone)]
pub struct AxisRect {
    plane: Plane,
    a: Interval,
    b: Interval,
    k: f32,
    material: Arc<dyn Material>,
}

impl AxisRect {
    pub fn new(
        plane: Plane,
        (a0, a1): (f32, f32),
        (b0, b1): (f32, f32),
        k: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        Self {
            plane,
            a: Interval::new(a0, a1),
            b: Interval::new(b0, b1),
            k,
            material,
        }
    }

    pub fn xy(x: (f32, f32), y: (f32, f32), z: f32, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::XY, x, y, z, material)
    }

    pub fn xz(x: (f32, f32), z: (f32, f32), y: f32, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::XZ, x, z, y, material)
    }

    pub fn yz(y: (f32, f32), z: (f32, f32), x: f32, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::YZ, y, z, x, material)
    }
}

impl Hittable for AxisRect {
    fn hit(&self, ray: &Ray, ray_t: Interval, _rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let (a_axis, b_axis, n_axis) = self.plane.axes();
        let origin = ray.origin();
        let direction = ray.direction();

        // NaN (ray parallel to and inside the plane) fails `contains`.
        let t = (self.k - origin[n_axis]) / direction[n_axis];
        if !ray_t.contains(t) {
            return None;
        }

        let a = origin[a_axis] + t * direction[a_axis];
        let b = origin[b_axis] + t * direction[b_axis];
        if !self.a.contains(a) || !self.b.contains(b) {
            return None;
        }

        let mut normal = Vec3::ZERO;
        normal[n_axis] = 1.0;

        Some(HitRecord {
            t,
            p: ray.at(t),
            normal,
            u: (a - self.a.min) / self.a.size(),
            v: (b - self.b.min) / self.b.size(),
            material: self.material.as_ref(),
        })
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        let (a_axis, b_axis, n_axis) = self.plane.axes();
        let mut min = Vec3::ZERO;
        let mut max = Vec3::ZERO;

        min[a_axis] = self.a.min;
        max[a_axis] = self.a.max;
        min[b_axis] = self.b.min;
        max[b_axis] = self.b.max;
        min[n_axis] = self.k - 0.0001;
        max[n_axis] = self.k + 0.0001;

        Some(Aabb::from_corners(min, max))
    }
}

/// Axis-aligned box made of six rectangles.
///
/// Faces on the maximum corner face outward directly; the three faces on
/// the minimum corner are flipped so that every normal points outward.
pub struct BoxShape {
    sides: HittableList,
    bbox: Aabb,
}

impl BoxShape {
    pub fn new(p0: Vec3, p1: Vec3, material: Arc<dyn Material>) -> Self {
        let (min, max) = (p0.min(p1), p0.max(p1));
        let mut sides = HittableList::new();

        let x = (min.x, max.x);
        let y = (min.y, max.y);
        let z = (min.z, max.z);

        sides.add(AxisRect::xy(x, y, max.z, material.clone()));
        sides.add(FlipNormals::new(AxisRect::xy(x, y, min.z, material.clone())));
        sides.add(AxisRect::xz(x, z, max.y, material.clone()));
        sides.add(FlipNormals::new(AxisRect::xz(x, z, min.y, material.clone())));
        sides.add(AxisRect::yz(y, z, max.x, material.clone()));
        sides.add(FlipNormals::new(AxisRect::yz(y, z, min.x, material)));

        Self {
            sides,
            bbox: Aabb::from_corners(min, max),
        }
    }
}

impl Hittable for BoxShape {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        self.sides.hit(ray, ray_t, rng)
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(self.bbox)
    }
}
