//! Random sampling helpers.
//!
//! Every function takes an explicit generator; nothing in the renderer draws
//! from global or thread-local randomness, which is what keeps renders
//! reproducible per worker.

use ember_math::{Color, Vec3};
use rand::{Rng, RngCore};

/// Uniform in [0, 1).
#[inline]
pub fn random_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen()
}

/// Uniform in [min, max).
#[inline]
pub fn random_range(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    rng.gen_range(min..max)
}

/// Uniformly distributed point on the unit sphere, by rejection from the
/// enclosing cube. The lower bound on the squared length rejects vectors too
/// short to normalize reliably.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            random_range(rng, -1.0, 1.0),
            random_range(rng, -1.0, 1.0),
            random_range(rng, -1.0, 1.0),
        );
        let len_sq = p.length_squared();
        if len_sq > 1e-8 && len_sq <= 1.0 {
            return p / len_sq.sqrt();
        }
    }
}

/// Uniformly distributed point in the unit disk (z = 0).
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            random_range(rng, -1.0, 1.0),
            random_range(rng, -1.0, 1.0),
            0.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// A colour with each channel uniform in [0, 1).
pub fn random_color(rng: &mut dyn RngCore) -> Color {
    Color::new(random_f32(rng), random_f32(rng), random_f32(rng))
}

/// A colour with each channel uniform in [min, max).
pub fn random_color_range(rng: &mut dyn RngCore, min: f32, max: f32) -> Color {
    Color::new(
        random_range(rng, min, max),
        random_range(rng, min, max),
        random_range(rng, min, max),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn unit_vectors_have_unit_length() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn disk_samples_stay_in_the_disk() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..100 {
            let p = random_in_unit_disk(&mut rng);
            assert!(p.length_squared() < 1.0);
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn ranges_are_respected() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let x = random_range(&mut rng, 2.0, 3.0);
            assert!((2.0..3.0).contains(&x));

            let c = random_color(&mut rng);
            for channel in [c.x, c.y, c.z] {
                assert!((0.0..1.0).contains(&channel));
            }
        }
    }
}
