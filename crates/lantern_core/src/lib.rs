//! Lantern Core - scene data imported from outside the renderer.
//!
//! This crate provides:
//!
//! - **Meshes**: `Mesh` triangle soup with optional normals/UVs, loaded from OBJ
//! - **Texture images**: `TextureImage` float RGB pixels, loaded with `image`
//!
//! # Example
//!
//! ```ignore
//! use lantern_core::{load_obj, load_texture_image};
//!
//! let mesh = load_obj("bunny.obj")?;
//! println!("Loaded {} triangles", mesh.triangle_count());
//!
//! let earth = load_texture_image("earth.jpeg")?;
//! ```

pub mod mesh;
pub mod texture;

// Re-export commonly used types
pub use mesh::{load_obj, Mesh, MeshError, MeshResult};
pub use texture::{load_texture_image, TextureError, TextureImage, TextureResult};
