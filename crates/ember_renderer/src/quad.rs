//! Planar quadrilateral patch and the box composite built from six of them.

use std::sync::Arc;

use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::Material;

/// A parallelogram: corner `q` plus edge vectors `u` and `v`.
pub struct Quad {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    /// Plane basis vector for expressing hits in (alpha, beta) coordinates.
    w: Vec3,
    normal: Vec3,
    /// Plane offset: dot(normal, x) = d for all x on the plane.
    d: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Quad {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        let n = u.cross(v);
        let normal = n.normalize();

        let bbox_diagonal1 = Aabb::from_points(q, q + u + v);
        let bbox_diagonal2 = Aabb::from_points(q + u, q + v);

        Self {
            q,
            u,
            v,
            w: n / n.dot(n),
            normal,
            d: normal.dot(q),
            material,
            bbox: Aabb::surrounding(&bbox_diagonal1, &bbox_diagonal2),
        }
    }
}

impl Hittable for Quad {
    fn hit(&self, ray: &Ray, ray_t: Interval, _rng: &mut dyn RngCore) -> Option<HitRecord> {
        let denom = self.normal.dot(ray.direction);

        // Parallel (or degenerate) rays never cross the plane.
        if denom.abs() < 1e-8 {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin)) / denom;
        if !ray_t.surrounds(t) {
            return None;
        }

        // Express the planar hit point in the quad's edge basis.
        let planar_hit = ray.at(t) - self.q;
        let alpha = self.w.dot(planar_hit.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hit));

        if !Interval::UNIT.contains(alpha) || !Interval::UNIT.contains(beta) {
            return None;
        }

        Some(HitRecord::new(
            ray,
            t,
            self.normal,
            alpha,
            beta,
            self.material.clone(),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// The closed hexahedron between two opposite corners, as six quads.
pub fn make_box(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> HittableList {
    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    let mut sides = HittableList::new();
    sides.add(Arc::new(Quad::new(
        Vec3::new(min.x, min.y, max.z),
        dx,
        dy,
        material.clone(),
    ))); // front
    sides.add(Arc::new(Quad::new(
        Vec3::new(max.x, min.y, max.z),
        -dz,
        dy,
        material.clone(),
    ))); // right
    sides.add(Arc::new(Quad::new(
        Vec3::new(max.x, min.y, min.z),
        -dx,
        dy,
        material.clone(),
    ))); // back
    sides.add(Arc::new(Quad::new(
        Vec3::new(min.x, min.y, min.z),
        dz,
        dy,
        material.clone(),
    ))); // left
    sides.add(Arc::new(Quad::new(
        Vec3::new(min.x, max.y, max.z),
        dx,
        -dz,
        material.clone(),
    ))); // top
    sides.add(Arc::new(Quad::new(
        Vec3::new(min.x, min.y, min.z),
        dx,
        dz,
        material,
    ))); // bottom

    sides
}
