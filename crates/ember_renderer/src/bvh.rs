//! Bounding-volume hierarchy over scene primitives.
//!
//! Built once at scene-assembly time and never mutated, so worker threads can
//! traverse it concurrently without locks.

use std::cmp::Ordering;
use std::sync::Arc;

use ember_math::{Aabb, Interval, Ray};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable, HittableList};

/// A node of the hierarchy: an internal split, a single primitive, or the
/// empty scene.
pub enum BvhNode {
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    Leaf {
        object: Arc<dyn Hittable>,
        bbox: Aabb,
    },
    Empty,
}

impl BvhNode {
    pub fn new(objects: Vec<Arc<dyn Hittable>>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }
        Self::build(objects)
    }

    pub fn from_list(list: HittableList) -> Self {
        Self::new(list.into_objects())
    }

    /// Recursive median split: widest axis of the span's total box, primitives
    /// ordered by their box minimum on that axis.
    fn build(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        let bbox = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| Aabb::surrounding(&acc, &o.bounding_box()));

        if objects.len() == 1 {
            return BvhNode::Leaf {
                object: objects.swap_remove(0),
                bbox,
            };
        }

        let axis = bbox.longest_axis();
        objects.sort_unstable_by(|a, b| {
            let a_min = a.bounding_box().axis_interval(axis).min;
            let b_min = b.bounding_box().axis_interval(axis).min;
            a_min.partial_cmp(&b_min).unwrap_or(Ordering::Equal)
        });

        let right_objects = objects.split_off(objects.len() / 2);
        let left = Self::build(objects);
        let right = Self::build(right_objects);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
        }
    }
}

impl Hittable for BvhNode {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Leaf { object, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }
                object.hit(ray, ray_t, rng)
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.hit(ray, ray_t, rng);

                // The right subtree only needs to beat the best hit so far.
                let right_max = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rng);

                hit_right.or(hit_left)
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::{random_range, random_unit_vector};
    use crate::{Lambertian, Sphere};
    use ember_math::{Color, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grey() -> Arc<Lambertian> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    fn full_range() -> Interval {
        Interval::new(0.001, f32::INFINITY)
    }

    #[test]
    fn empty_scene_never_hits() {
        let bvh = BvhNode::new(Vec::new());
        let ray = Ray::at_time_zero(Vec3::ZERO, Vec3::Z);
        let mut rng = StdRng::seed_from_u64(0);

        assert!(matches!(bvh, BvhNode::Empty));
        assert!(bvh.hit(&ray, full_range(), &mut rng).is_none());
    }

    #[test]
    fn single_object_becomes_a_leaf() {
        let objects: Vec<Arc<dyn Hittable>> =
            vec![Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, grey()))];
        let bvh = BvhNode::new(objects);
        assert!(matches!(bvh, BvhNode::Leaf { .. }));

        let ray = Ray::at_time_zero(Vec3::ZERO, -Vec3::Z);
        let mut rng = StdRng::seed_from_u64(0);
        let rec = bvh.hit(&ray, full_range(), &mut rng).unwrap();
        assert!((rec.t - 1.5).abs() < 1e-5);
    }

    #[test]
    fn node_boxes_contain_their_children() {
        fn check(node: &BvhNode) {
            if let BvhNode::Branch { left, right, bbox } = node {
                for child in [left.as_ref(), right.as_ref()] {
                    let cb = child.bounding_box();
                    for axis in 0..3 {
                        assert!(bbox.axis_interval(axis).min <= cb.axis_interval(axis).min);
                        assert!(bbox.axis_interval(axis).max >= cb.axis_interval(axis).max);
                    }
                    check(child);
                }
            }
        }

        let mut rng = StdRng::seed_from_u64(9);
        let objects: Vec<Arc<dyn Hittable>> = (0..64)
            .map(|_| {
                let center = Vec3::new(
                    random_range(&mut rng, -20.0, 20.0),
                    random_range(&mut rng, -20.0, 20.0),
                    random_range(&mut rng, -20.0, 20.0),
                );
                Arc::new(Sphere::new(center, random_range(&mut rng, 0.1, 2.0), grey()))
                    as Arc<dyn Hittable>
            })
            .collect();

        check(&BvhNode::new(objects));
    }

    #[test]
    fn bvh_agrees_with_the_linear_list_for_random_scenes() {
        let mut rng = StdRng::seed_from_u64(42);

        for n in [0usize, 1, 2, 3, 7, 32] {
            let mut list = HittableList::new();
            let mut objects: Vec<Arc<dyn Hittable>> = Vec::new();
            for _ in 0..n {
                let center = Vec3::new(
                    random_range(&mut rng, -10.0, 10.0),
                    random_range(&mut rng, -10.0, 10.0),
                    random_range(&mut rng, -10.0, 10.0),
                );
                let sphere: Arc<dyn Hittable> =
                    Arc::new(Sphere::new(center, random_range(&mut rng, 0.2, 1.5), grey()));
                list.add(sphere.clone());
                objects.push(sphere);
            }
            let bvh = BvhNode::new(objects);

            for _ in 0..200 {
                let origin = random_unit_vector(&mut rng) * 30.0;
                let target = Vec3::new(
                    random_range(&mut rng, -5.0, 5.0),
                    random_range(&mut rng, -5.0, 5.0),
                    random_range(&mut rng, -5.0, 5.0),
                );
                let ray = Ray::at_time_zero(origin, target - origin);

                // Spheres ignore the generator, so both queries see identical
                // conditions.
                let mut probe_rng = StdRng::seed_from_u64(0);
                let from_list = list.hit(&ray, full_range(), &mut probe_rng);
                let from_bvh = bvh.hit(&ray, full_range(), &mut probe_rng);

                match (&from_list, &from_bvh) {
                    (None, None) => {}
                    (Some(a), Some(b)) => {
                        assert!((a.t - b.t).abs() < 1e-4, "nearest hits disagree");
                    }
                    _ => panic!("BVH and list disagree on whether the ray hits"),
                }
            }
        }
    }
}
