//! Lantern Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer over a closed set of primitives:
//! - Analytic shapes (spheres, moving spheres, axis-aligned rectangles, triangles)
//! - Triangle meshes with their own BVH over triangle indices
//! - Transform wrappers (translate, rotate, flip normals) and constant-density media
//! - A general BVH over heterogeneous primitives
//!
//! Rendering distributes image rows over a thread pool through a shared
//! atomic row counter.

mod bvh;
mod camera;
mod framebuffer;
mod hittable;
mod material;
mod medium;
mod mesh;
mod mesh_bvh;
mod perlin;
mod primitive;
mod rect;
mod renderer;
mod scheduler;
mod sphere;
mod texture;
mod transform;
mod triangle;

pub use bvh::{Bvh, BuildError};
pub use camera::Camera;
pub use framebuffer::Framebuffer;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    Color, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterResult,
};
pub use medium::{ConstantMedium, MediumError};
pub use mesh::TriangleMesh;
pub use mesh_bvh::{MeshBvh, DEFAULT_LEAF_SIZE};
pub use perlin::Perlin;
pub use primitive::Primitive;
pub use rect::{AxisRect, BoxShape, Plane};
pub use renderer::{linear_to_gamma, ray_color, render_pixel, RenderConfig, HIT_EPSILON};
pub use scheduler::{render, RenderError};
pub use sphere::{MovingSphere, Sphere};
pub use texture::{CheckerTexture, ImageTexture, NoiseTexture, SolidColor, Texture};
pub use transform::{FlipNormals, Rotate, Translate};
pub use triangle::{intersect_triangle, Triangle};

/// Re-export common math types from lantern_math
pub use lantern_math::{Aabb, Interval, Ray, Vec3};

use rand::{Rng, RngCore};

/// Uniform sample in [0, 1).
#[inline]
pub(crate) fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}
