//! The intersectable-object capability shared by all scene geometry.

use std::sync::Arc;

use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

use crate::Material;

/// Everything the integrator needs to know about one ray-surface crossing.
///
/// Built fresh per query and never stored; the material handle is shared with
/// the scene and immutable for the duration of a render.
#[derive(Clone)]
pub struct HitRecord {
    /// Point of intersection.
    pub p: Vec3,
    /// Unit surface normal, always facing against the incoming ray.
    pub normal: Vec3,
    /// Material at the intersection point.
    pub material: Arc<dyn Material>,
    /// Surface parameterization.
    pub u: f32,
    pub v: f32,
    /// Ray parameter of the intersection.
    pub t: f32,
    /// Whether the outward normal faced the ray (hit from outside).
    pub front_face: bool,
}

impl HitRecord {
    /// Build a record from an outward normal, flipping it to oppose the ray
    /// and remembering which side was struck.
    pub fn new(
        ray: &Ray,
        t: f32,
        outward_normal: Vec3,
        u: f32,
        v: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        let front_face = ray.direction.dot(outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };

        Self {
            p: ray.at(t),
            normal,
            material,
            u,
            v,
            t,
            front_face,
        }
    }
}

/// Objects a ray can intersect.
///
/// `hit` must report the closest intersection with `ray_t.surrounds(t)`, or
/// `None`. The generator is threaded through because participating media
/// sample their scattering distance inside the query.
pub trait Hittable: Send + Sync {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord>;

    /// A conservative axis-aligned bound, computed at construction.
    fn bounding_box(&self) -> Aabb;
}

/// An unordered aggregate searched by linear scan.
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
    bbox: Aabb,
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl HittableList {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Hand the children over, e.g. for BVH construction.
    pub fn into_objects(self) -> Vec<Arc<dyn Hittable>> {
        self.objects
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord> {
        let mut closest: Option<HitRecord> = None;

        for object in &self.objects {
            // Narrow the admissible interval to the best hit so far, so a
            // farther candidate can never replace a nearer one.
            let max_t = closest.as_ref().map_or(ray_t.max, |rec| rec.t);
            if let Some(rec) = object.hit(ray, Interval::new(ray_t.min, max_t), rng) {
                closest = Some(rec);
            }
        }

        closest
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Sphere};
    use ember_math::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grey() -> Arc<Lambertian> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    #[test]
    fn empty_list_reports_no_hit() {
        let list = HittableList::new();
        let ray = Ray::at_time_zero(Vec3::ZERO, Vec3::Z);
        let mut rng = StdRng::seed_from_u64(0);

        assert!(list
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .is_none());
    }

    #[test]
    fn list_returns_the_nearest_of_several_hits() {
        let mut list = HittableList::new();
        list.add(Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, grey())));
        list.add(Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, grey())));

        let ray = Ray::at_time_zero(Vec3::ZERO, -Vec3::Z);
        let mut rng = StdRng::seed_from_u64(0);
        let rec = list
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .expect("both spheres sit on the ray");

        assert!((rec.t - 1.5).abs() < 1e-5);
    }

    #[test]
    fn record_normal_opposes_the_ray() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, grey());
        let ray = Ray::at_time_zero(Vec3::ZERO, -Vec3::Z);
        let mut rng = StdRng::seed_from_u64(0);

        let rec = sphere
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .unwrap();
        assert!(rec.front_face);
        assert!(rec.normal.dot(ray.direction) < 0.0);

        // From inside the sphere the flipped normal still opposes the ray.
        let inside = Ray::at_time_zero(Vec3::new(0.0, 0.0, -3.0), -Vec3::Z);
        let rec = sphere
            .hit(&inside, Interval::new(0.001, f32::INFINITY), &mut rng)
            .unwrap();
        assert!(!rec.front_face);
        assert!(rec.normal.dot(inside.direction) < 0.0);
    }

    #[test]
    fn list_bbox_is_the_running_union() {
        let mut list = HittableList::new();
        list.add(Arc::new(Sphere::new(Vec3::new(-2.0, 0.0, 0.0), 1.0, grey())));
        list.add(Arc::new(Sphere::new(Vec3::new(3.0, 0.0, 0.0), 1.0, grey())));

        let bbox = list.bounding_box();
        assert!(bbox.x.min <= -3.0);
        assert!(bbox.x.max >= 4.0);
    }
}
