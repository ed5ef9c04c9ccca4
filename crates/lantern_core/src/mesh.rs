//! Mesh geometry representation and OBJ import.
//!
//! A `Mesh` is plain triangle-soup data: positions, optional per-vertex
//! normals and UVs, and triangle index triples. The renderer builds its
//! acceleration structure on top of it.

use std::path::Path;

use lantern_math::{Aabb, Vec2, Vec3};
use thiserror::Error;

/// Errors that can occur while importing or validating a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("OBJ load error: {0}")]
    Load(#[from] tobj::LoadError),

    #[error("Only triangle faces are supported, found a face with {arity} vertices")]
    UnsupportedFace { arity: u32 },

    #[error("Triangle index {index} out of range for {vertex_count} vertices")]
    InvalidIndex { index: u32, vertex_count: usize },

    #[error("Index count {0} is not a multiple of 3")]
    PartialTriangle(usize),

    #[error("Mesh contains no triangles")]
    Empty,
}

pub type MeshResult<T> = Result<T, MeshError>;

/// A triangle mesh with optional per-vertex attributes.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Vertex normals, one per vertex when present
    pub normals: Option<Vec<Vec3>>,

    /// UV coordinates, one per vertex when present
    pub uvs: Option<Vec<Vec2>>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Axis-aligned bounding box of all positions
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a mesh from positions and indices, optionally with normals.
    ///
    /// Indices are validated; attribute arrays whose length does not match
    /// the vertex count are dropped so that lookups can never go out of range.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>, normals: Option<Vec<Vec3>>) -> MeshResult<Self> {
        Self::new_with_uvs(positions, indices, normals, None)
    }

    /// Create a mesh with UV coordinates.
    pub fn new_with_uvs(
        positions: Vec<Vec3>,
        indices: Vec<u32>,
        normals: Option<Vec<Vec3>>,
        uvs: Option<Vec<Vec2>>,
    ) -> MeshResult<Self> {
        if indices.is_empty() {
            return Err(MeshError::Empty);
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::PartialTriangle(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(MeshError::InvalidIndex {
                index,
                vertex_count: positions.len(),
            });
        }

        let normals = matching_attribute("normals", normals, positions.len());
        let uvs = matching_attribute("uvs", uvs, positions.len());
        let bounds = Self::compute_bounds(&positions);

        Ok(Self {
            positions,
            normals,
            uvs,
            indices,
            bounds,
        })
    }

    /// Compute axis-aligned bounding box from positions.
    fn compute_bounds(positions: &[Vec3]) -> Aabb {
        let mut bounds = Aabb::EMPTY;
        for &pos in positions {
            bounds.extend(pos);
        }
        bounds
    }

    /// Check if the mesh has normals.
    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Check if the mesh has UV coordinates.
    pub fn has_uvs(&self) -> bool {
        self.uvs.is_some()
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Vertex indices of triangle `triangle`.
    #[inline]
    pub fn triangle_indices(&self, triangle: usize) -> [usize; 3] {
        let base = 3 * triangle;
        [
            self.indices[base] as usize,
            self.indices[base + 1] as usize,
            self.indices[base + 2] as usize,
        ]
    }

    /// Vertex positions of triangle `triangle`.
    #[inline]
    pub fn triangle_positions(&self, triangle: usize) -> [Vec3; 3] {
        let [i0, i1, i2] = self.triangle_indices(triangle);
        [self.positions[i0], self.positions[i1], self.positions[i2]]
    }
}

/// Keep a per-vertex attribute only if it has one entry per vertex.
fn matching_attribute<T>(name: &str, values: Option<Vec<T>>, vertex_count: usize) -> Option<Vec<T>> {
    match values {
        Some(values) if values.len() == vertex_count => Some(values),
        Some(values) => {
            log::warn!(
                "Ignoring {}: {} entries for {} vertices",
                name,
                values.len(),
                vertex_count
            );
            None
        }
        None => None,
    }
}

/// Load a Wavefront OBJ file into a single mesh.
///
/// All models in the file are merged. Faces must be triangles; any other
/// arity is reported as [`MeshError::UnsupportedFace`].
pub fn load_obj(path: impl AsRef<Path>) -> MeshResult<Mesh> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            single_index: true,
            triangulate: false,
            ..Default::default()
        },
    )?;

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut uvs = Vec::new();
    let mut indices = Vec::new();
    let mut all_have_normals = true;
    let mut all_have_uvs = true;

    for model in &models {
        let mesh = &model.mesh;
        if let Some(&arity) = mesh.face_arities.iter().find(|&&arity| arity != 3) {
            return Err(MeshError::UnsupportedFace { arity });
        }

        let base = positions.len() as u32;
        let vertex_count = mesh.positions.len() / 3;

        positions.extend(mesh.positions.chunks_exact(3).map(Vec3::from_slice));
        indices.extend(mesh.indices.iter().map(|&i| base + i));

        if mesh.normals.len() == 3 * vertex_count {
            normals.extend(mesh.normals.chunks_exact(3).map(Vec3::from_slice));
        } else {
            all_have_normals = false;
        }

        if mesh.texcoords.len() == 2 * vertex_count {
            uvs.extend(mesh.texcoords.chunks_exact(2).map(Vec2::from_slice));
        } else {
            all_have_uvs = false;
        }
    }

    if !all_have_normals {
        log::debug!("{}: no per-vertex normals, using face normals", path.display());
    }
    if !all_have_uvs {
        log::debug!("{}: no per-vertex UVs", path.display());
    }

    let mesh = Mesh::new_with_uvs(
        positions,
        indices,
        all_have_normals.then_some(normals),
        all_have_uvs.then_some(uvs),
    )?;

    log::info!(
        "Loaded {}: {} triangles, {} vertices, normals: {}, uvs: {}",
        path.display(),
        mesh.triangle_count(),
        mesh.vertex_count(),
        mesh.has_normals(),
        mesh.has_uvs()
    );

    Ok(mesh)
}
