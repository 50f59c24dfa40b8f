//! Sphere primitive, static or linearly moving.

use std::f32::consts::PI;
use std::sync::Arc;

use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable};
use crate::Material;

/// A sphere whose centre is itself a ray: `center.at(time)` interpolates the
/// position over the shutter interval, giving motion blur for free.
pub struct Sphere {
    center: Ray,
    radius: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// A stationary sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);

        Self {
            center: Ray::at_time_zero(center, Vec3::ZERO),
            radius,
            material,
            bbox: Aabb::from_points(center - rvec, center + rvec),
        }
    }

    /// A sphere moving linearly from `center0` (time 0) to `center1` (time 1).
    pub fn new_moving(
        center0: Vec3,
        center1: Vec3,
        radius: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let center = Ray::at_time_zero(center0, center1 - center0);

        let box0 = Aabb::from_points(center.at(0.0) - rvec, center.at(0.0) + rvec);
        let box1 = Aabb::from_points(center.at(1.0) - rvec, center.at(1.0) + rvec);

        Self {
            center,
            radius,
            material,
            bbox: Aabb::surrounding(&box0, &box1),
        }
    }

    /// Where the centre sits at a given ray time.
    pub fn center_at(&self, time: f32) -> Vec3 {
        self.center.at(time)
    }

    /// Spherical-coordinate parameterization of a point on the unit sphere:
    /// theta from the south pole, phi around the Y axis from -X.
    fn sphere_uv(p: Vec3) -> (f32, f32) {
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval, _rng: &mut dyn RngCore) -> Option<HitRecord> {
        let current_center = self.center.at(ray.time);
        let oc = current_center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrtd = discriminant.sqrt();

        // Prefer the nearer root, fall back to the farther one.
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - current_center) / self.radius;
        let (u, v) = Self::sphere_uv(outward_normal);

        Some(HitRecord::new(
            ray,
            root,
            outward_normal,
            u,
            v,
            self.material.clone(),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lambertian;
    use ember_math::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grey() -> Arc<Lambertian> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    fn full_range() -> Interval {
        Interval::new(0.001, f32::INFINITY)
    }

    #[test]
    fn hit_point_lies_on_the_surface() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -3.0), 0.5, grey());
        let ray = Ray::at_time_zero(Vec3::ZERO, -Vec3::Z);
        let mut rng = StdRng::seed_from_u64(0);

        let rec = sphere.hit(&ray, full_range(), &mut rng).unwrap();
        assert!((rec.t - 2.5).abs() < 1e-5);

        let distance = (ray.at(rec.t) - sphere.center_at(ray.time)).length();
        assert!((distance - 0.5).abs() < 1e-4);
    }

    #[test]
    fn nearer_root_is_preferred_and_interval_excludes_it_when_asked() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -3.0), 0.5, grey());
        let ray = Ray::at_time_zero(Vec3::ZERO, -Vec3::Z);
        let mut rng = StdRng::seed_from_u64(0);

        // Narrowing the interval past the front face exposes the back face.
        let rec = sphere
            .hit(&ray, Interval::new(2.6, f32::INFINITY), &mut rng)
            .unwrap();
        assert!((rec.t - 3.5).abs() < 1e-5);
        assert!(!rec.front_face);
    }

    #[test]
    fn miss_returns_none() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -3.0), 0.5, grey());
        let ray = Ray::at_time_zero(Vec3::ZERO, Vec3::Y);
        let mut rng = StdRng::seed_from_u64(0);

        assert!(sphere.hit(&ray, full_range(), &mut rng).is_none());
    }

    #[test]
    fn moving_sphere_follows_ray_time() {
        let sphere = Sphere::new_moving(
            Vec3::new(0.0, 0.0, -3.0),
            Vec3::new(2.0, 0.0, -3.0),
            0.5,
            grey(),
        );
        let mut rng = StdRng::seed_from_u64(0);

        // At time 0 the sphere sits on the z axis.
        let early = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);
        assert!(sphere.hit(&early, full_range(), &mut rng).is_some());

        // At time 1 it has moved two units in +x, so the same ray misses.
        let late = Ray::new(Vec3::ZERO, -Vec3::Z, 1.0);
        assert!(sphere.hit(&late, full_range(), &mut rng).is_none());

        // The surface property holds mid-flight too.
        let mid = Ray::new(Vec3::new(1.0, 0.0, 0.0), -Vec3::Z, 0.5);
        let rec = sphere.hit(&mid, full_range(), &mut rng).unwrap();
        let distance = (mid.at(rec.t) - sphere.center_at(mid.time)).length();
        assert!((distance - 0.5).abs() < 1e-4);
    }

    #[test]
    fn moving_sphere_bbox_covers_both_endpoints() {
        let sphere = Sphere::new_moving(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
            1.0,
            grey(),
        );
        let bbox = sphere.bounding_box();
        assert!(bbox.x.min <= -1.0);
        assert!(bbox.x.max >= 5.0);
    }

    #[test]
    fn uv_covers_the_poles_and_equator() {
        // North pole, south pole, and a point on the equator at -Z.
        let (_, v_north) = Sphere::sphere_uv(Vec3::Y);
        let (_, v_south) = Sphere::sphere_uv(-Vec3::Y);
        assert!((v_north - 1.0).abs() < 1e-5);
        assert!(v_south.abs() < 1e-5);

        let (u, v) = Sphere::sphere_uv(-Vec3::Z);
        assert!((u - 0.75).abs() < 1e-5);
        assert!((v - 0.5).abs() < 1e-5);
    }
}
