use crate::Vec3;

/// A parametric ray: origin plus a (not necessarily normalized) direction.
///
/// `time` lies in [0, 1] and selects where moving geometry sits when the ray
/// is traced, which is how motion blur is sampled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub time: f32,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3, time: f32) -> Self {
        Self {
            origin,
            direction,
            time,
        }
    }

    /// A ray at time zero.
    pub fn at_time_zero(origin: Vec3, direction: Vec3) -> Self {
        Self::new(origin, direction, 0.0)
    }

    /// The point `origin + t * direction`.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::at_time_zero(Vec3::ZERO, Vec3::Z)
    }
}
