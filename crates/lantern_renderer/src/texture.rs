//! Textures: color lookups by surface coordinates and hit point.

use std::sync::Arc;

use lantern_core::TextureImage;
use lantern_math::Vec3;
use rand::RngCore;

use crate::perlin::TURBULENCE_DEPTH;
use crate::{Color, Perlin};

/// A color lookup used by materials.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// A single constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    color: Color,
}

impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.color
    }
}

/// 3D checkerboard: picks `odd` where `sin(10x)·sin(10y)·sin(10z)` is
/// negative and `even` elsewhere.
#[derive(Clone)]
pub struct CheckerTexture {
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self { even, odd }
    }

    /// Checkerboard of two solid colors.
    pub fn from_colors(even: Color, odd: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(even)), Arc::new(SolidColor::new(odd)))
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let sines = (10.0 * p.x).sin() * (10.0 * p.y).sin() * (10.0 * p.z).sin();
        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

/// Marble-like stripes along z, perturbed by turbulence.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
}

impl NoiseTexture {
    pub fn new(scale: f32, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        let phase = self.scale * p.z + 10.0 * self.noise.turb(p, TURBULENCE_DEPTH);
        Color::ONE * 0.5 * (1.0 + phase.sin())
    }
}

/// Nearest-neighbour lookup into a decoded image.
#[derive(Clone)]
pub struct ImageTexture {
    image: Arc<TextureImage>,
}

impl ImageTexture {
    pub fn new(image: Arc<TextureImage>) -> Self {
        Self { image }
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        self.image.sample(u, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_solid_color() {
        let tex = SolidColor::new(Color::new(1.0, 0.5, 0.0));
        assert_eq!(tex.value(0.3, 0.7, Vec3::splat(4.0)), Color::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn test_checker_sign() {
        let even = Color::new(0.9, 0.9, 0.9);
        let odd = Color::new(0.2, 0.3, 0.1);
        let tex = CheckerTexture::from_colors(even, odd);

        // All three sines positive
        assert_eq!(tex.value(0.0, 0.0, Vec3::splat(0.1)), even);
        // One sine negative (10 * 0.4 = 4 rad lies in (pi, 2pi))
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(0.4, 0.1, 0.1)), odd);
    }

    #[test]
    fn test_noise_texture_is_grey_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let tex = NoiseTexture::new(5.0, &mut rng);

        for step in 0..50 {
            let c = tex.value(0.0, 0.0, Vec3::new(step as f32 * 0.2, 1.0, -(step as f32)));
            assert_eq!(c.x, c.y);
            assert_eq!(c.y, c.z);
            assert!((0.0..=1.0).contains(&c.x));
        }
    }

    #[test]
    fn test_image_texture_flips_v() {
        let image = TextureImage::new(1, 2, vec![[1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]).unwrap();
        let tex = ImageTexture::new(Arc::new(image));

        assert_eq!(tex.value(0.5, 0.9, Vec3::ZERO), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.value(0.5, 0.1, Vec3::ZERO), Color::new(0.0, 0.0, 1.0));
    }
}
