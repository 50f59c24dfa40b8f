//! Instance transforms: move the ray into object space instead of moving the
//! geometry.

use std::sync::Arc;

use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable};

/// A child object displaced by a fixed offset.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box().translate(offset);
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl Hittable for Translate {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord> {
        // Trace the inverse-displaced ray, then move the hit back out.
        let offset_ray = Ray::new(ray.origin - self.offset, ray.direction, ray.time);

        let mut rec = self.object.hit(&offset_ray, ray_t, rng)?;
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// A child object rotated about the world Y axis.
pub struct RotateY {
    object: Arc<dyn Hittable>,
    sin_theta: f32,
    cos_theta: f32,
    bbox: Aabb,
}

impl RotateY {
    pub fn new(object: Arc<dyn Hittable>, angle_degrees: f32) -> Self {
        let radians = angle_degrees.to_radians();
        let sin_theta = radians.sin();
        let cos_theta = radians.cos();

        // Sweep the eight corners of the child's box through the rotation.
        let child_box = object.bounding_box();
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);

        for i in 0..2 {
            for j in 0..2 {
                for k in 0..2 {
                    let x = if i == 0 { child_box.x.min } else { child_box.x.max };
                    let y = if j == 0 { child_box.y.min } else { child_box.y.max };
                    let z = if k == 0 { child_box.z.min } else { child_box.z.max };

                    let corner = Vec3::new(
                        cos_theta * x + sin_theta * z,
                        y,
                        -sin_theta * x + cos_theta * z,
                    );
                    min = min.min(corner);
                    max = max.max(corner);
                }
            }
        }

        Self {
            object,
            sin_theta,
            cos_theta,
            bbox: Aabb::from_points(min, max),
        }
    }

    /// World to object space (rotate by -theta).
    fn to_object(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x - self.sin_theta * v.z,
            v.y,
            self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }

    /// Object back to world space (rotate by +theta).
    fn to_world(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x + self.sin_theta * v.z,
            v.y,
            -self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }
}

impl Hittable for RotateY {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord> {
        let rotated = Ray::new(
            self.to_object(ray.origin),
            self.to_object(ray.direction),
            ray.time,
        );

        let mut rec = self.object.hit(&rotated, ray_t, rng)?;
        rec.p = self.to_world(rec.p);
        rec.normal = self.to_world(rec.normal);
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
