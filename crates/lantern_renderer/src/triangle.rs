//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use std::sync::Arc;

use crate::{HitRecord, Hittable, Material};
use lantern_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Determinants at or below this magnitude count as a parallel ray.
const PARALLEL_EPSILON: f32 = 1e-7;

/// Möller-Trumbore ray-triangle intersection.
///
/// Returns `(t, u, v)` with barycentric `u`, `v` weighting `v1` and `v2`.
/// `t` must lie strictly inside `ray_t`.
#[inline]
pub fn intersect_triangle(ray: &Ray, [v0, v1, v2]: [Vec3; 3], ray_t: Interval) -> Option<(f32, f32, f32)> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction().cross(edge2);
    let det = edge1.dot(h);

    // Ray is parallel to triangle
    if det.abs() <= PARALLEL_EPSILON {
        return None;
    }

    let f = 1.0 / det;
    let s = ray.origin() - v0;
    let u = f * s.dot(h);
    if u < 0.0 {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction().dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if !ray_t.surrounds(t) {
        return None;
    }

    Some((t, u, v))
}

/// Unit face normal `normalize(e1 × e2)`, following counter-clockwise winding.
#[inline]
pub(crate) fn face_normal([v0, v1, v2]: [Vec3; 3]) -> Vec3 {
    (v1 - v0).cross(v2 - v0).normalize_or_zero()
}

/// Padded bounding box of three points.
pub(crate) fn triangle_bounds(vertices: [Vec3; 3]) -> Aabb {
    let mut bbox = Aabb::EMPTY;
    for vertex in vertices {
        bbox.extend(vertex);
    }
    bbox.padded()
}

/// A single flat-shaded triangle.
#[derive(Clone)]
pub struct Triangle {
    vertices: [Vec3; 3],
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<dyn Material>) -> Self {
        let vertices = [v0, v1, v2];
        Self {
            vertices,
            normal: face_normal(vertices),
            material,
            bbox: triangle_bounds(vertices),
        }
    }
}

impl Hittable for Triangle {
    fn hit(&self, ray: &Ray, ray_t: Interval, _rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let (t, u, v) = intersect_triangle(ray, self.vertices, ray_t)?;

        Some(HitRecord {
            t,
            p: ray.at(t),
            normal: self.normal,
            u,
            v,
            material: self.material.as_ref(),
        })
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(self.bbox)
    }
}
