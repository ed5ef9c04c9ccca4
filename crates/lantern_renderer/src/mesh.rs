//! Triangle mesh primitive backed by a [`MeshBvh`].

use std::sync::Arc;

use lantern_core::Mesh;
use lantern_math::{Aabb, Interval, Ray, Vec2, Vec3};
use rand::RngCore;

use crate::triangle::face_normal;
use crate::{HitRecord, Hittable, Material, MeshBvh};

/// An imported mesh with one material.
///
/// Shading normals are interpolated from per-vertex normals when the mesh
/// has them and fall back to the flat face normal otherwise. UVs likewise
/// fall back to the barycentric coordinates of the hit.
pub struct TriangleMesh {
    mesh: Arc<Mesh>,
    bvh: MeshBvh,
    material: Arc<dyn Material>,
}

impl TriangleMesh {
    pub fn new(mesh: Arc<Mesh>, material: Arc<dyn Material>) -> Self {
        let bvh = MeshBvh::build(&mesh);
        Self { mesh, bvh, material }
    }

    pub fn with_leaf_size(mesh: Arc<Mesh>, material: Arc<dyn Material>, leaf_size: usize) -> Self {
        let bvh = MeshBvh::build_with_leaf_size(&mesh, leaf_size);
        Self { mesh, bvh, material }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    fn shading_normal(&self, triangle: usize, u: f32, v: f32) -> Vec3 {
        let face = face_normal(self.mesh.triangle_positions(triangle));
        let Some(normals) = &self.mesh.normals else {
            return face;
        };

        let [i0, i1, i2] = self.mesh.triangle_indices(triangle);
        let interpolated = (1.0 - u - v) * normals[i0] + u * normals[i1] + v * normals[i2];
        let interpolated = interpolated.normalize_or_zero();

        if interpolated == Vec3::ZERO {
            face
        } else {
            interpolated
        }
    }

    fn surface_uv(&self, triangle: usize, u: f32, v: f32) -> Vec2 {
        match &self.mesh.uvs {
            Some(uvs) => {
                let [i0, i1, i2] = self.mesh.triangle_indices(triangle);
                (1.0 - u - v) * uvs[i0] + u * uvs[i1] + v * uvs[i2]
            }
            None => Vec2::new(u, v),
        }
    }
}

impl Hittable for TriangleMesh {
    fn hit(&self, ray: &Ray, ray_t: Interval, _rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let hit = self.bvh.hit(&self.mesh, ray, ray_t)?;
        let uv = self.surface_uv(hit.triangle, hit.u, hit.v);

        Some(HitRecord {
            t: hit.t,
            p: ray.at(hit.t),
            normal: self.shading_normal(hit.triangle, hit.u, hit.v),
            u: uv.x,
            v: uv.y,
            material: self.material.as_ref(),
        })
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        self.bvh.bounds()
    }
}
