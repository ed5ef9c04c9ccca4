//! Core path tracing integrator.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing bounded by a depth limit
//! - Emission added at every hit, scattering while depth remains
//! - Jittered multi-sampling and gamma correction

use lantern_math::Interval;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::{gen_f32, Camera, Color, Hittable, Ray};

/// Minimum hit distance, avoids self-intersection ("shadow acne").
pub const HIT_EPSILON: f32 = 0.001;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum number of scattering events along a path
    pub max_depth: u32,
    /// Worker threads, including the calling thread
    pub threads: usize,
    /// Background color when ray doesn't hit anything
    pub background: Color,
    /// Whether to use sky gradient instead of solid background
    pub use_sky_gradient: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 450,
            samples_per_pixel: 100,
            max_depth: 10,
            threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            background: Color::ZERO,
            use_sky_gradient: false,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Compute the color seen by a ray.
///
/// Emission is collected at every hit. A hit scatters further only while
/// `depth` is non-zero; a path that is absorbed or runs out of depth keeps
/// only the emission gathered so far.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let Some(rec) = world.hit(ray, Interval::new(HIT_EPSILON, f32::INFINITY), rng) else {
        if config.use_sky_gradient {
            return sky_gradient(ray);
        }
        return config.background;
    };

    let emission = rec.material.emitted(rec.u, rec.v, rec.p);
    if depth == 0 {
        return emission;
    }

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered_color = ray_color(&result.scattered, world, depth - 1, config, rng);
            emission + result.attenuation * scattered_color
        }
        None => emission,
    }
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Render a single pixel with jittered multi-sampling.
///
/// `y` counts rows from the bottom of the image. The result is averaged
/// and gamma corrected, but not clamped.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let samples = config.samples_per_pixel.max(1);
    let mut pixel_color = Color::ZERO;

    for _ in 0..samples {
        let s = (x as f32 + gen_f32(rng)) / config.width as f32;
        let t = (y as f32 + gen_f32(rng)) / config.height as f32;
        let ray = camera.get_ray(s, t, rng);
        pixel_color += ray_color(&ray, world, config.max_depth, config, rng);
    }

    let average = pixel_color / samples as f32;
    Color::new(
        linear_to_gamma(average.x),
        linear_to_gamma(average.y),
        linear_to_gamma(average.z),
    )
}
