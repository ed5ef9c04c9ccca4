//! Gradient noise with turbulence.

use lantern_math::Vec3;
use rand::seq::SliceRandom;
use rand::RngCore;

use crate::gen_f32;

const POINT_COUNT: usize = 256;

/// Default number of octaves summed by [`Perlin::turb`].
pub const TURBULENCE_DEPTH: u32 = 7;

/// Perlin noise generator: random unit gradients hashed through three
/// independent permutation tables.
pub struct Perlin {
    gradients: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let gradients = (0..POINT_COUNT)
            .map(|_| {
                Vec3::new(
                    -1.0 + 2.0 * gen_f32(rng),
                    -1.0 + 2.0 * gen_f32(rng),
                    -1.0 + 2.0 * gen_f32(rng),
                )
                .normalize_or_zero()
            })
            .collect();

        Self {
            gradients,
            perm_x: generate_perm(rng),
            perm_y: generate_perm(rng),
            perm_z: generate_perm(rng),
        }
    }

    /// Smoothed gradient noise, roughly in [-1, 1].
    pub fn noise(&self, p: Vec3) -> f32 {
        let floor = p.floor();
        let frac = p - floor;
        let (i, j, k) = (floor.x as i32, floor.y as i32, floor.z as i32);

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, corner) in row.iter_mut().enumerate() {
                    let index = self.perm_x[((i + di as i32) & 255) as usize]
                        ^ self.perm_y[((j + dj as i32) & 255) as usize]
                        ^ self.perm_z[((k + dk as i32) & 255) as usize];
                    *corner = self.gradients[index];
                }
            }
        }

        trilinear_interp(&c, frac)
    }

    /// Sum of `depth` noise octaves, each at double frequency and half weight.
    pub fn turb(&self, p: Vec3, depth: u32) -> f32 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }
}

fn generate_perm(rng: &mut dyn RngCore) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..POINT_COUNT).collect();
    perm.shuffle(rng);
    perm
}

/// Hermite-smoothed trilinear blend of the corner gradients.
fn trilinear_interp(c: &[[[Vec3; 2]; 2]; 2], frac: Vec3) -> f32 {
    let smooth = frac * frac * (Vec3::splat(3.0) - 2.0 * frac);
    let mut accum = 0.0;

    for (i, plane) in c.iter().enumerate() {
        let fi = i as f32;
        for (j, row) in plane.iter().enumerate() {
            let fj = j as f32;
            for (k, gradient) in row.iter().enumerate() {
                let fk = k as f32;
                let weight_v = frac - Vec3::new(fi, fj, fk);
                accum += (fi * smooth.x + (1.0 - fi) * (1.0 - smooth.x))
                    * (fj * smooth.y + (1.0 - fj) * (1.0 - smooth.y))
                    * (fk * smooth.z + (1.0 - fk) * (1.0 - smooth.z))
                    * gradient.dot(weight_v);
            }
        }
    }

    (accum + 1.0) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_perm_tables_are_permutations() {
        let mut rng = StdRng::seed_from_u64(42);
        let perlin = Perlin::new(&mut rng);

        for perm in [&perlin.perm_x, &perlin.perm_y, &perlin.perm_z] {
            let mut sorted = perm.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..POINT_COUNT).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_noise_range_and_continuity() {
        let mut rng = StdRng::seed_from_u64(42);
        let perlin = Perlin::new(&mut rng);

        for step in 0..500 {
            let p = Vec3::new(step as f32 * 0.137, -3.0 + step as f32 * 0.05, 11.3);
            let n = perlin.noise(p);
            assert!((0.0..=1.0).contains(&n), "noise {} out of range at {:?}", n, p);

            // Small moves give small changes
            let nearby = perlin.noise(p + Vec3::splat(1e-3));
            assert!((n - nearby).abs() < 0.05);
        }
    }

    #[test]
    fn test_noise_at_lattice_points() {
        let mut rng = StdRng::seed_from_u64(3);
        let perlin = Perlin::new(&mut rng);

        // Gradient noise vanishes on integer lattice points.
        assert!((perlin.noise(Vec3::new(2.0, -5.0, 7.0)) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_turbulence_is_non_negative() {
        let mut rng = StdRng::seed_from_u64(42);
        let perlin = Perlin::new(&mut rng);

        for step in 0..100 {
            let p = Vec3::splat(step as f32 * 0.31);
            assert!(perlin.turb(p, TURBULENCE_DEPTH) >= 0.0);
        }
        assert_eq!(perlin.turb(Vec3::ONE, 0), 0.0);
    }
}
