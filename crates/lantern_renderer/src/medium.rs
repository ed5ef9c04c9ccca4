//! Constant-density participating medium.

use std::sync::Arc;

use lantern_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use rand_distr::{Distribution, Exp};
use thiserror::Error;

use crate::{Color, HitRecord, Hittable, Isotropic, Primitive, Texture};

/// Offset past the entry point when searching for the exit crossing.
const EXIT_SEARCH_OFFSET: f32 = 1e-4;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MediumError {
    #[error("Medium density must be finite and positive, got {0}")]
    InvalidDensity(f32),
}

/// Fog filling the inside of a closed boundary primitive.
///
/// A ray crossing the boundary scatters at an exponentially distributed
/// free-flight distance, or passes through if that distance exceeds the
/// chord inside the boundary.
pub struct ConstantMedium {
    boundary: Box<Primitive>,
    free_flight: Exp<f32>,
    phase: Isotropic,
}

impl ConstantMedium {
    pub fn new(boundary: impl Into<Primitive>, density: f32, albedo: Color) -> Result<Self, MediumError> {
        Self::build(boundary.into(), density, Isotropic::new(albedo))
    }

    pub fn textured(
        boundary: impl Into<Primitive>,
        density: f32,
        albedo: Arc<dyn Texture>,
    ) -> Result<Self, MediumError> {
        Self::build(boundary.into(), density, Isotropic::textured(albedo))
    }

    fn build(boundary: Primitive, density: f32, phase: Isotropic) -> Result<Self, MediumError> {
        if !(density.is_finite() && density > 0.0) {
            return Err(MediumError::InvalidDensity(density));
        }
        let free_flight = Exp::new(density).map_err(|_| MediumError::InvalidDensity(density))?;

        Ok(Self {
            boundary: Box::new(boundary),
            free_flight,
            phase,
        })
    }
}

impl Hittable for ConstantMedium {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let enter = self.boundary.hit(ray, Interval::UNIVERSE, rng)?.t;
        let exit = self
            .boundary
            .hit(ray, Interval::new(enter + EXIT_SEARCH_OFFSET, f32::INFINITY), rng)?
            .t;

        let mut enter = enter.max(ray_t.min);
        let exit = exit.min(ray_t.max);
        if enter >= exit {
            return None;
        }
        enter = enter.max(0.0);

        let ray_length = ray.direction().length();
        let distance_inside = (exit - enter) * ray_length;
        let hit_distance = self.free_flight.sample(rng);
        if hit_distance >= distance_inside {
            return None;
        }

        let t = enter + hit_distance / ray_length;
        Some(HitRecord {
            t,
            p: ray.at(t),
            // Arbitrary: the isotropic phase function ignores it
            normal: Vec3::X,
            u: 0.0,
            v: 0.0,
            material: &self.phase,
        })
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.boundary.bounding_box(time0, time1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const WINDOW: Interval = Interval::new(0.001, f32::INFINITY);

    fn unit_sphere() -> Sphere {
        Sphere::new(Vec3::ZERO, 1.0, Arc::new(Lambertian::new(Vec3::ONE)))
    }

    #[test]
    fn test_rejects_bad_density() {
        for density in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(ConstantMedium::new(unit_sphere(), density, Color::ONE).is_err());
        }
    }

    #[test]
    fn test_scatter_probability_matches_beer_lambert() {
        let density = 0.5;
        let medium = ConstantMedium::new(unit_sphere(), density, Color::ONE).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        // Straight through the center: chord length 2
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        let samples = 20_000;
        let mut scattered = 0;
        for _ in 0..samples {
            if let Some(rec) = medium.hit(&ray, WINDOW, &mut rng) {
                assert!(rec.t > 4.0 && rec.t < 6.0);
                scattered += 1;
            }
        }

        let expected = 1.0 - (-density * 2.0f32).exp();
        let observed = scattered as f32 / samples as f32;
        assert!(
            (observed - expected).abs() < 0.02,
            "observed {} expected {}",
            observed,
            expected
        );
    }

    #[test]
    fn test_scaled_direction_gives_same_distance() {
        let medium = ConstantMedium::new(unit_sphere(), 1000.0, Color::ONE).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        // Dense fog scatters almost immediately after entry, in world units
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 4.0), 0.0);
        let rec = medium.hit(&ray, WINDOW, &mut rng).unwrap();
        assert!((rec.p.z + 1.0).abs() < 0.05);
        assert!((rec.t - 1.0).abs() < 0.02);
    }

    #[test]
    fn test_ray_starting_inside() {
        let medium = ConstantMedium::new(unit_sphere(), 1000.0, Color::ONE).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.0);
        let rec = medium.hit(&ray, WINDOW, &mut rng).unwrap();
        assert!(rec.t >= WINDOW.min && rec.t < 0.05);
    }

    #[test]
    fn test_miss_and_bounding_box() {
        let medium = ConstantMedium::new(unit_sphere(), 1000.0, Color::ONE).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let ray = Ray::new(Vec3::new(0.0, 5.0, -5.0), Vec3::Z, 0.0);
        assert!(medium.hit(&ray, WINDOW, &mut rng).is_none());

        // Boundary lies behind the window
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z, 0.0);
        assert!(medium.hit(&ray, WINDOW, &mut rng).is_none());

        let bbox = medium.bounding_box(0.0, 1.0).unwrap();
        assert_eq!(bbox.min(), Vec3::splat(-1.0));
        assert_eq!(bbox.max(), Vec3::splat(1.0));
    }
}
