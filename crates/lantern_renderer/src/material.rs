//! Material trait for surface scattering.

use std::sync::Arc;

use crate::{gen_f32, HitRecord, SolidColor, Texture};
use lantern_math::{Ray, Vec3};
use rand::RngCore;
use rand_distr::{Distribution, UnitBall};

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Result of scattering a ray off a material.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Color attenuation applied to light arriving along `scattered`
    pub attenuation: Color,
    /// The outgoing ray
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult>;

    /// Get emitted light from this material.
    ///
    /// Most materials return black (no emission).
    fn emitted(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        Color::ZERO
    }
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    albedo: Arc<dyn Texture>,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self::textured(Arc::new(SolidColor::new(albedo)))
    }

    /// Create a Lambertian material whose albedo is looked up in a texture.
    pub fn textured(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let mut scatter_direction = rec.normal + random_in_unit_ball(rng);

        // Catch degenerate scatter direction
        if scatter_direction.length_squared() < 1e-8 {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, scatter_direction, ray_in.time()),
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.min(1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let scattered_dir = reflected + self.fuzz * random_in_unit_ball(rng);

        // Only scatter if the reflected ray is in the same hemisphere as the normal
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, scattered_dir, ray_in.time()),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f32, ior: f32) -> f32 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        // Geometry reports outward normals, so orient against the ray here.
        let (normal, refraction_ratio) = if rec.front_face(ray_in) {
            (rec.normal, 1.0 / self.ior)
        } else {
            (-rec.normal, self.ior)
        };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Check for total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction =
            if cannot_refract || Self::reflectance(cos_theta, refraction_ratio) > gen_f32(rng) {
                reflect(unit_direction, normal)
            } else {
                refract(unit_direction, normal, refraction_ratio)
            };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

/// Diffuse light emitter.
#[derive(Clone)]
pub struct DiffuseLight {
    emit: Arc<dyn Texture>,
}

impl DiffuseLight {
    /// Create a new diffuse light with the given emission color.
    pub fn new(emit: Color) -> Self {
        Self::textured(Arc::new(SolidColor::new(emit)))
    }

    /// Create a light whose emission is looked up in a texture.
    pub fn textured(emit: Arc<dyn Texture>) -> Self {
        Self { emit }
    }
}

impl Material for DiffuseLight {
    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterResult> {
        // Lights don't scatter rays
        None
    }

    fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        self.emit.value(u, v, p)
    }
}

/// Phase function of a constant-density medium: scatters uniformly.
#[derive(Clone)]
pub struct Isotropic {
    albedo: Arc<dyn Texture>,
}

impl Isotropic {
    pub fn new(albedo: Color) -> Self {
        Self::textured(Arc::new(SolidColor::new(albedo)))
    }

    pub fn textured(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }
}

impl Material for Isotropic {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        Some(ScatterResult {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, random_in_unit_ball(rng), ray_in.time()),
        })
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a vector through a surface.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Uniform random point inside the unit ball.
#[inline]
fn random_in_unit_ball(rng: &mut dyn RngCore) -> Vec3 {
    let p: [f32; 3] = UnitBall.sample(rng);
    Vec3::from(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(material: &dyn Material, normal: Vec3) -> HitRecord<'_> {
        HitRecord {
            t: 1.0,
            p: Vec3::ZERO,
            normal,
            u: 0.0,
            v: 0.0,
            material,
        }
    }

    #[test]
    fn test_lambertian_scatters_into_normal_hemisphere() {
        let material = Lambertian::new(Color::new(0.5, 0.25, 1.0));
        let rec = record(&material, Vec3::Y);
        let ray_in = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0), 0.0);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let result = material.scatter(&ray_in, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::new(0.5, 0.25, 1.0));
            assert!(result.scattered.direction().y >= 0.0);
        }
    }

    #[test]
    fn test_metal_mirror_reflection() {
        let material = Metal::new(Color::ONE, 0.0);
        let rec = record(&material, Vec3::Y);
        let ray_in = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), 0.0);
        let mut rng = StdRng::seed_from_u64(42);

        let result = material.scatter(&ray_in, &rec, &mut rng).unwrap();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((result.scattered.direction() - expected).length() < 1e-5);
    }

    #[test]
    fn test_metal_fuzz_is_capped() {
        let metal = Metal::new(Color::ONE, 7.0);
        assert_eq!(metal.fuzz, 1.0);
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let material = Dielectric::new(1.5);
        // Leaving the glass at a grazing angle: the ray travels along the
        // outward normal side, so this is a back-face hit.
        let rec = record(&material, Vec3::Y);
        let direction = Vec3::new(1.0, 0.2, 0.0).normalize();
        let ray_in = Ray::new(Vec3::ZERO, direction, 0.0);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..20 {
            let result = material.scatter(&ray_in, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::ONE);
            // Reflected back inside, never transmitted
            assert!(result.scattered.direction().y < 0.0);
        }
    }

    #[test]
    fn test_diffuse_light_emits_and_absorbs() {
        let light = DiffuseLight::new(Color::splat(15.0));
        let rec = record(&light, Vec3::Y);
        let ray_in = Ray::new(Vec3::Y, -Vec3::Y, 0.0);
        let mut rng = StdRng::seed_from_u64(42);

        assert!(light.scatter(&ray_in, &rec, &mut rng).is_none());
        assert_eq!(light.emitted(0.5, 0.5, Vec3::ZERO), Color::splat(15.0));
        assert_eq!(Lambertian::new(Color::ONE).emitted(0.5, 0.5, Vec3::ZERO), Color::ZERO);
    }

    #[test]
    fn test_isotropic_direction_inside_unit_ball() {
        let material = Isotropic::new(Color::splat(0.8));
        let rec = record(&material, Vec3::X);
        let ray_in = Ray::new(Vec3::ZERO, Vec3::Z, 0.25);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let result = material.scatter(&ray_in, &rec, &mut rng).unwrap();
            assert!(result.scattered.direction().length() <= 1.0);
            assert_eq!(result.scattered.time(), 0.25);
        }
    }
}
