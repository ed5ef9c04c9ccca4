//! Texture image loading.
//!
//! Images are decoded with the `image` crate and stored as linear float
//! RGB so that the renderer can sample them without further conversion.

use std::path::Path;

use lantern_math::Vec3;
use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Texture has no pixels: {0}")]
    Empty(String),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A decoded image with linear RGB pixels.
#[derive(Clone, Debug)]
pub struct TextureImage {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Row-major pixels, first row at the top of the image
    pub pixels: Vec<[f32; 3]>,
}

impl TextureImage {
    /// Create an image from raw pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<[f32; 3]>) -> TextureResult<Self> {
        if width == 0 || height == 0 || pixels.len() != (width * height) as usize {
            return Err(TextureError::Empty(format!(
                "{}x{} image with {} pixels",
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Nearest-neighbour lookup at texture coordinates.
    ///
    /// `v = 1` is the top row. Coordinates outside [0, 1] clamp to the edge.
    pub fn sample(&self, u: f32, v: f32) -> Vec3 {
        let nx = self.width as f32;
        let ny = self.height as f32;

        // Float-to-int casts saturate, so NaN and negatives land on 0.
        let i = ((u * nx) as u32).min(self.width - 1);
        let j = (((1.0 - v) * ny - 0.001) as u32).min(self.height - 1);

        Vec3::from(self.pixels[(j * self.width + i) as usize])
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<[f32; 3]>()
    }
}

/// Load an image file as a linear RGB texture.
pub fn load_texture_image(path: impl AsRef<Path>) -> TextureResult<TextureImage> {
    let path = path.as_ref();
    let rgb = image::open(path)?.to_rgb8();
    let (width, height) = rgb.dimensions();

    let pixels: Vec<[f32; 3]> = rgb
        .pixels()
        .map(|p| [srgb_to_linear(p[0]), srgb_to_linear(p[1]), srgb_to_linear(p[2])])
        .collect();

    let texture = TextureImage::new(width, height, pixels)
        .map_err(|_| TextureError::Empty(path.display().to_string()))?;

    log::debug!(
        "Loaded texture: {} ({}x{}, {:.1} KB)",
        path.display(),
        texture.width,
        texture.height,
        texture.size_bytes() as f32 / 1024.0
    );

    Ok(texture)
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> TextureImage {
        // Top row: red, green. Bottom row: blue, white.
        TextureImage::new(
            2,
            2,
            vec![
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
                [1.0, 1.0, 1.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_sample_corners() {
        let tex = two_by_two();
        assert_eq!(tex.sample(0.0, 1.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(tex.sample(0.99, 1.0), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(tex.sample(0.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(tex.sample(1.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_sample_clamps_out_of_range() {
        let tex = two_by_two();
        assert_eq!(tex.sample(-3.0, 7.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(tex.sample(5.0, -2.0), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(tex.sample(f32::NAN, 1.0), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_new_rejects_mismatched_pixels() {
        assert!(TextureImage::new(2, 2, vec![[0.0; 3]; 3]).is_err());
        assert!(TextureImage::new(0, 0, vec![]).is_err());
    }

    #[test]
    fn test_srgb_to_linear() {
        // Black stays black
        assert!((srgb_to_linear(0) - 0.0).abs() < 0.001);

        // White stays white
        assert!((srgb_to_linear(255) - 1.0).abs() < 0.001);

        // Mid-gray is darker in linear
        let mid = srgb_to_linear(128);
        assert!(mid < 0.5);
        assert!(mid > 0.1);
    }

    #[test]
    fn test_load_missing_texture() {
        assert!(load_texture_image("/definitely/not/here.png").is_err());
    }
}
