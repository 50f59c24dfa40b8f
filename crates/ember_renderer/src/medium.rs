//! Constant-density participating medium (fog, smoke).

use std::sync::Arc;

use ember_math::{Aabb, Color, Interval, Ray, Vec3};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable};
use crate::material::{Isotropic, Material};
use crate::sampling::random_f32;
use crate::texture::Texture;

/// A volume of uniform scattering probability per unit distance, bounded by
/// an arbitrary intersectable.
///
/// The boundary only defines where the volume starts and ends; scattering
/// inside is exponential free-path sampling, so the query needs the worker's
/// generator.
pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    neg_inv_density: f32,
    phase_function: Arc<dyn Material>,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<dyn Hittable>, density: f32, albedo: Color) -> Self {
        Self::with_phase(boundary, density, Arc::new(Isotropic::new(albedo)))
    }

    pub fn from_texture(
        boundary: Arc<dyn Hittable>,
        density: f32,
        texture: Arc<dyn Texture>,
    ) -> Self {
        Self::with_phase(boundary, density, Arc::new(Isotropic::from_texture(texture)))
    }

    fn with_phase(
        boundary: Arc<dyn Hittable>,
        density: f32,
        phase_function: Arc<dyn Material>,
    ) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function,
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord> {
        // Probe the boundary twice to find where the ray enters and leaves
        // the volume. The searches are unbounded on purpose: the entry point
        // may lie behind the caller's interval (the ray can start inside).
        let mut entry = self.boundary.hit(ray, Interval::UNIVERSE, rng)?;
        let mut exit = self
            .boundary
            .hit(ray, Interval::new(entry.t + 0.0001, f32::INFINITY), rng)?;

        entry.t = entry.t.max(ray_t.min).max(0.0);
        exit.t = exit.t.min(ray_t.max);
        if entry.t >= exit.t {
            return None;
        }

        let ray_length = ray.direction.length();
        let distance_inside = (exit.t - entry.t) * ray_length;
        let hit_distance = self.neg_inv_density * random_f32(rng).ln();

        if hit_distance > distance_inside {
            return None;
        }

        let t = entry.t + hit_distance / ray_length;

        // The normal and face flag are arbitrary: isotropic scattering never
        // looks at them.
        Some(HitRecord {
            p: ray.at(t),
            normal: Vec3::X,
            material: self.phase_function.clone(),
            u: 0.0,
            v: 0.0,
            t,
            front_face: true,
        })
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn boundary_sphere() -> Arc<dyn Hittable> {
        Arc::new(Sphere::new(
            Vec3::new(0.0, 0.0, -5.0),
            1.0,
            Arc::new(Lambertian::new(Color::splat(0.5))),
        ))
    }

    fn full_range() -> Interval {
        Interval::new(0.001, f32::INFINITY)
    }

    #[test]
    fn dense_medium_scatters_inside_the_boundary() {
        let medium = ConstantMedium::new(boundary_sphere(), 1e6, Color::ONE);
        let ray = Ray::at_time_zero(Vec3::ZERO, -Vec3::Z);
        let mut rng = StdRng::seed_from_u64(1);

        let rec = medium
            .hit(&ray, full_range(), &mut rng)
            .expect("an extremely dense medium scatters almost immediately");
        // The boundary spans t in [4, 6] along this ray.
        assert!(rec.t >= 4.0 && rec.t <= 6.0);
    }

    #[test]
    fn vanishing_density_becomes_transparent() {
        let medium = ConstantMedium::new(boundary_sphere(), 1e-12, Color::ONE);
        let ray = Ray::at_time_zero(Vec3::ZERO, -Vec3::Z);
        let mut rng = StdRng::seed_from_u64(2);

        // With density -> 0 the sampled free path is effectively infinite, so
        // essentially every query passes straight through.
        let hits = (0..200)
            .filter(|_| medium.hit(&ray, full_range(), &mut rng).is_some())
            .count();
        assert_eq!(hits, 0);
    }

    #[test]
    fn ray_missing_the_boundary_misses_the_medium() {
        let medium = ConstantMedium::new(boundary_sphere(), 10.0, Color::ONE);
        let ray = Ray::at_time_zero(Vec3::ZERO, Vec3::Y);
        let mut rng = StdRng::seed_from_u64(3);

        assert!(medium.hit(&ray, full_range(), &mut rng).is_none());
    }

    #[test]
    fn ray_starting_inside_still_scatters() {
        let medium = ConstantMedium::new(boundary_sphere(), 1e6, Color::ONE);
        // Origin at the boundary's centre: entry is clamped to the interval.
        let ray = Ray::at_time_zero(Vec3::new(0.0, 0.0, -5.0), -Vec3::Z);
        let mut rng = StdRng::seed_from_u64(4);

        let rec = medium.hit(&ray, full_range(), &mut rng).unwrap();
        assert!(rec.t > 0.0 && rec.t <= 1.0);
    }
}
