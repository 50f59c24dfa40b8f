//! Surface scattering and emission.

use std::sync::Arc;

use ember_math::{Color, Ray, Vec3};
use rand::RngCore;

use crate::hittable::HitRecord;
use crate::sampling::{random_f32, random_unit_vector};
use crate::texture::{SolidColor, Texture};

/// Outcome of a scattering event.
pub struct Scatter {
    pub attenuation: Color,
    pub scattered: Ray,
}

/// How light interacts with a surface.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray, or return `None` when it is absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter>;

    /// Light emitted at the hit point. Black for everything but lights.
    fn emitted(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        Color::ZERO
    }
}

/// Diffuse surface scattering around the normal.
pub struct Lambertian {
    texture: Arc<dyn Texture>,
}

impl Lambertian {
    pub fn new(albedo: Color) -> Self {
        Self::from_texture(Arc::new(SolidColor::new(albedo)))
    }

    pub fn from_texture(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }
}

impl Material for Lambertian {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter> {
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // The random offset can cancel the normal almost exactly; fall back to
        // the normal itself rather than tracing a zero-length direction.
        if scatter_direction.length_squared() < 1e-8 {
            scatter_direction = rec.normal;
        }

        Some(Scatter {
            attenuation: self.texture.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, scatter_direction, ray_in.time),
        })
    }
}

/// Specular reflection with an optional fuzz perturbation.
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// `fuzz` 0 is a perfect mirror, 1 is very rough; clamped to [0, 1].
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter> {
        let reflected = reflect(ray_in.direction.normalize(), rec.normal);
        let direction = reflected + self.fuzz * random_unit_vector(rng);

        // A fuzzed direction below the horizon would re-enter the surface.
        if direction.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(Scatter {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, direction, ray_in.time),
        })
    }
}

/// Clear refractive material (glass, water, diamond).
pub struct Dielectric {
    refraction_index: f32,
}

impl Dielectric {
    pub fn new(refraction_index: f32) -> Self {
        Self { refraction_index }
    }

    /// Schlick's polynomial approximation of Fresnel reflectance.
    fn reflectance(cosine: f32, refraction_index: f32) -> f32 {
        let r0 = ((1.0 - refraction_index) / (1.0 + refraction_index)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.refraction_index
        } else {
            self.refraction_index
        };

        let unit_direction = ray_in.direction.normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let cannot_refract = refraction_ratio * sin_theta > 1.0;
        let direction = if cannot_refract
            || Self::reflectance(cos_theta, refraction_ratio) > random_f32(rng)
        {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        Some(Scatter {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction, ray_in.time),
        })
    }
}

/// Pure emitter. Never scatters.
pub struct DiffuseLight {
    texture: Arc<dyn Texture>,
}

impl DiffuseLight {
    pub fn new(emit: Color) -> Self {
        Self::from_texture(Arc::new(SolidColor::new(emit)))
    }

    pub fn from_texture(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }
}

impl Material for DiffuseLight {
    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<Scatter> {
        None
    }

    fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        self.texture.value(u, v, p)
    }
}

/// Direction-free scattering, used as the phase function of participating
/// media.
pub struct Isotropic {
    texture: Arc<dyn Texture>,
}

impl Isotropic {
    pub fn new(albedo: Color) -> Self {
        Self::from_texture(Arc::new(SolidColor::new(albedo)))
    }

    pub fn from_texture(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }
}

impl Material for Isotropic {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter> {
        Some(Scatter {
            attenuation: self.texture.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, random_unit_vector(rng), ray_in.time),
        })
    }
}

#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record_at_origin(material: Arc<dyn Material>) -> HitRecord {
        let ray = Ray::at_time_zero(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y);
        HitRecord::new(&ray, 1.0, Vec3::Y, 0.5, 0.5, material)
    }

    #[test]
    fn lambertian_attenuation_is_a_valid_albedo() {
        let material = Arc::new(Lambertian::new(Color::new(0.3, 0.6, 0.9)));
        let rec = record_at_origin(material.clone());
        let ray = Ray::at_time_zero(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y);
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..50 {
            let scatter = material.scatter(&ray, &rec, &mut rng).unwrap();
            for channel in [
                scatter.attenuation.x,
                scatter.attenuation.y,
                scatter.attenuation.z,
            ] {
                assert!((0.0..=1.0).contains(&channel));
            }
            // Scattered rays leave the surface on the normal's side.
            assert!(scatter.scattered.direction.length_squared() > 0.0);
        }
    }

    #[test]
    fn metal_absorbs_below_horizon_directions() {
        // Fuzz 1 on a grazing reflection frequently pushes the direction under
        // the surface; those samples must be absorbed, never scattered inward.
        let material = Arc::new(Metal::new(Color::ONE, 1.0));
        let ray = Ray::at_time_zero(Vec3::new(-1.0, 1.001, 0.0), Vec3::new(1.0, -0.001, 0.0));
        let rec = HitRecord::new(&ray, 1.0, Vec3::Y, 0.0, 0.0, material.clone());
        let mut rng = StdRng::seed_from_u64(2);

        for _ in 0..100 {
            if let Some(scatter) = material.scatter(&ray, &rec, &mut rng) {
                assert!(scatter.scattered.direction.dot(rec.normal) > 0.0);
            }
        }
    }

    #[test]
    fn mirror_metal_reflects_exactly() {
        let material = Arc::new(Metal::new(Color::ONE, 0.0));
        let ray = Ray::at_time_zero(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let rec = HitRecord::new(&ray, 1.0, Vec3::Y, 0.0, 0.0, material.clone());
        let mut rng = StdRng::seed_from_u64(3);

        let scatter = material.scatter(&ray, &rec, &mut rng).unwrap();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((scatter.scattered.direction.normalize() - expected).length() < 1e-5);
    }

    #[test]
    fn dielectric_at_normal_incidence_passes_straight_through() {
        // Equal indices on both sides: the identity refraction, no bending.
        let material = Arc::new(Dielectric::new(1.0));
        let ray = Ray::at_time_zero(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y);
        let rec = HitRecord::new(&ray, 1.0, Vec3::Y, 0.0, 0.0, material.clone());
        let mut rng = StdRng::seed_from_u64(4);

        let scatter = material.scatter(&ray, &rec, &mut rng).unwrap();
        assert_eq!(scatter.attenuation, Color::ONE);
        assert!((scatter.scattered.direction.normalize() - (-Vec3::Y)).length() < 1e-5);
    }

    #[test]
    fn refraction_into_denser_medium_bends_toward_the_normal() {
        let incident = Vec3::new(1.0, -1.0, 0.0).normalize();
        let refracted = refract(incident, Vec3::Y, 1.0 / 1.5);

        // The tangential component shrinks, so the refracted ray makes a
        // smaller angle with the (negated) normal than the incident one.
        let cos_in = (-incident).dot(Vec3::Y);
        let cos_out = (-refracted.normalize()).dot(Vec3::Y);
        assert!(cos_out > cos_in);
    }

    #[test]
    fn diffuse_light_emits_and_never_scatters() {
        let material = Arc::new(DiffuseLight::new(Color::new(4.0, 4.0, 4.0)));
        let rec = record_at_origin(material.clone());
        let ray = Ray::at_time_zero(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y);
        let mut rng = StdRng::seed_from_u64(5);

        assert!(material.scatter(&ray, &rec, &mut rng).is_none());
        assert_eq!(
            material.emitted(0.0, 0.0, Vec3::ZERO),
            Color::new(4.0, 4.0, 4.0)
        );
    }

    #[test]
    fn isotropic_scatters_in_unit_directions() {
        let material = Arc::new(Isotropic::new(Color::splat(0.8)));
        let rec = record_at_origin(material.clone());
        let ray = Ray::at_time_zero(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y);
        let mut rng = StdRng::seed_from_u64(6);

        let scatter = material.scatter(&ray, &rec, &mut rng).unwrap();
        assert!((scatter.scattered.direction.length() - 1.0).abs() < 1e-5);
    }
}
