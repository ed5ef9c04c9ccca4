//! Floating-point RGB output buffer with padded rows.

use std::path::Path;

use image::{ImageFormat, ImageResult, Rgb32FImage, RgbImage};

use crate::Color;

/// Row alignment of the backing buffer, in samples (256 bytes).
const ROW_ALIGNMENT: usize = 256 / std::mem::size_of::<f32>();

/// Rendered image of gamma-corrected `f32` samples, stored bottom row first.
///
/// Rows are padded to a multiple of 256 bytes so that concurrently written
/// rows never share a cache line. Values above 1 are kept; only the 8-bit
/// conversion clamps them.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<f32>,
}

impl Framebuffer {
    /// Create a black framebuffer.
    pub fn new(width: u32, height: u32) -> Self {
        let row_samples = width as usize * 3;
        let stride = row_samples.div_ceil(ROW_ALIGNMENT) * ROW_ALIGNMENT;
        Self {
            width,
            height,
            stride,
            data: vec![0.0; stride * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Samples between the starts of consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Samples of row `y` (0 = bottom), without padding.
    pub fn row(&self, y: u32) -> &[f32] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize * 3]
    }

    /// Mutable samples of every row, bottom row first.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [f32]> {
        let row_samples = self.width as usize * 3;
        self.data
            .chunks_exact_mut(self.stride.max(1))
            .map(move |row| &mut row[..row_samples])
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let offset = y as usize * self.stride + x as usize * 3;
        Color::from_slice(&self.data[offset..offset + 3])
    }

    /// Store a gamma-corrected color at `(x, y)`, row 0 being the bottom.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        let offset = y as usize * self.stride + x as usize * 3;
        color.write_to_slice(&mut self.data[offset..offset + 3]);
    }

    /// Convert to a top-down 8-bit image, clamping to [0, 1].
    pub fn to_rgb8(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            image::Rgb(quantize(self.pixel(x, self.height - 1 - y)))
        })
    }

    /// Convert to a top-down floating-point image, values unchanged.
    pub fn to_rgb32f(&self) -> Rgb32FImage {
        Rgb32FImage::from_fn(self.width, self.height, |x, y| {
            image::Rgb(self.pixel(x, self.height - 1 - y).to_array())
        })
    }

    /// Write the image to `path`; the format follows the file extension.
    ///
    /// OpenEXR files get the float samples, every other format the clamped
    /// 8-bit conversion.
    pub fn save(&self, path: impl AsRef<Path>) -> ImageResult<()> {
        let path = path.as_ref();
        match ImageFormat::from_path(path)? {
            ImageFormat::OpenExr => self.to_rgb32f().save(path)?,
            _ => self.to_rgb8().save(path)?,
        }
        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// Quantize a gamma-corrected color to 8 bits per channel.
fn quantize(color: Color) -> [u8; 3] {
    let channel = |c: f32| (255.99 * c.clamp(0.0, 1.0)) as u8;
    [channel(color.x), channel(color.y), channel(color.z)]
}
