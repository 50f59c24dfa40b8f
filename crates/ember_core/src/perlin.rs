//! Gradient-noise table for procedural textures.

use ember_math::Vec3;
use rand::{Rng, RngCore};

const POINT_COUNT: usize = 256;

/// A Perlin noise table: 256 random gradient vectors plus one shuffled
/// permutation per axis.
///
/// Built once at scene-assembly time from a caller-supplied generator; the
/// renderer consumes it as a pure `point -> scalar` function.
pub struct Perlin {
    ranvec: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let ranvec = (0..POINT_COUNT)
            .map(|_| {
                Vec3::new(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                )
                .normalize()
            })
            .collect();

        Self {
            ranvec,
            perm_x: generate_perm(rng),
            perm_y: generate_perm(rng),
            perm_z: generate_perm(rng),
        }
    }

    /// Smoothed gradient noise in roughly [-1, 1].
    pub fn noise(&self, p: Vec3) -> f32 {
        let u = p.x - p.x.floor();
        let v = p.y - p.y.floor();
        let w = p.z - p.z.floor();

        let i = p.x.floor() as i32;
        let j = p.y.floor() as i32;
        let k = p.z.floor() as i32;

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, ci) in c.iter_mut().enumerate() {
            for (dj, cj) in ci.iter_mut().enumerate() {
                for (dk, corner) in cj.iter_mut().enumerate() {
                    let idx = self.perm_x[((i + di as i32) & 255) as usize]
                        ^ self.perm_y[((j + dj as i32) & 255) as usize]
                        ^ self.perm_z[((k + dk as i32) & 255) as usize];
                    *corner = self.ranvec[idx];
                }
            }
        }

        perlin_interp(&c, u, v, w)
    }

    /// Turbulence: summed octaves of |noise|.
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
    let mut p: Vec<usize> = (0..POINT_COUNT).collect();
    for i in (1..POINT_COUNT).rev() {
        let target = rng.gen_range(0..=i);
        p.swap(i, target);
    }
    p
}

fn perlin_interp(c: &[[[Vec3; 2]; 2]; 2], u: f32, v: f32, w: f32) -> f32 {
    // Hermitian smoothing removes the grid-aligned banding of raw trilinear.
    let uu = u * u * (3.0 - 2.0 * u);
    let vv = v * v * (3.0 - 2.0 * v);
    let ww = w * w * (3.0 - 2.0 * w);

    let mut accum = 0.0;
    for (di, ci) in c.iter().enumerate() {
        for (dj, cj) in ci.iter().enumerate() {
            for (dk, corner) in cj.iter().enumerate() {
                let (fi, fj, fk) = (di as f32, dj as f32, dk as f32);
                let weight = Vec3::new(u - fi, v - fj, w - fk);
                accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                    * (fj * vv + (1.0 - fj) * (1.0 - vv))
                    * (fk * ww + (1.0 - fk) * (1.0 - ww))
                    * corner.dot(weight);
            }
        }
    }
    accum
}
