use crate::{Interval, Ray, Vec3};

/// Axis-aligned bounding box: one interval per axis.
///
/// Boxes are conservative hit targets for the BVH; they are padded so that
/// planar geometry (quads) never produces a zero-thickness slab.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

/// Minimum thickness of any axis after construction.
const MIN_THICKNESS: f32 = 0.0001;

impl Aabb {
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub const UNIVERSE: Aabb = Aabb {
        x: Interval::UNIVERSE,
        y: Interval::UNIVERSE,
        z: Interval::UNIVERSE,
    };

    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// The box spanned by two opposite corners, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self::new(
            Interval::new(a.x.min(b.x), a.x.max(b.x)),
            Interval::new(a.y.min(b.y), a.y.max(b.y)),
            Interval::new(a.z.min(b.z), a.z.max(b.z)),
        )
    }

    /// The tightest box containing both inputs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Slab test: does the ray pass through the box within `ray_t`?
    ///
    /// A zero direction component yields ±inf (or NaN when the origin sits on
    /// the slab plane); the comparisons below reject such candidates without
    /// any special casing.
    pub fn hit(&self, ray: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let ax = self.axis_interval(axis);
            let origin = axis_component(ray.origin, axis);
            let adinv = 1.0 / axis_component(ray.direction, axis);

            let mut t0 = (ax.min - origin) * adinv;
            let mut t1 = (ax.max - origin) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }
        true
    }

    /// Index of the widest axis (0 = x, 1 = y, 2 = z).
    pub fn longest_axis(&self) -> usize {
        let (x, y, z) = (self.x.size(), self.y.size(), self.z.size());
        if x > y && x > z {
            0
        } else if y > z {
            1
        } else {
            2
        }
    }

    /// The box shifted by an offset vector.
    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb {
            x: self.x.add_scalar(offset.x),
            y: self.y.add_scalar(offset.y),
            z: self.z.add_scalar(offset.z),
        }
    }

    fn pad_to_minimums(&mut self) {
        if self.x.size() < MIN_THICKNESS {
            self.x = self.x.expand(MIN_THICKNESS);
        }
        if self.y.size() < MIN_THICKNESS {
            self.y = self.y.expand(MIN_THICKNESS);
        }
        if self.z.size() < MIN_THICKNESS {
            self.z = self.z.expand(MIN_THICKNESS);
        }
    }
}

fn axis_component(v: Vec3, axis: usize) -> f32 {
    match axis {
        0 => v.x,
        1 => v.y,
        _ => v.z,
    }
}
