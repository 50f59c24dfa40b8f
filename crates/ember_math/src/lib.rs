// Re-export glam for convenience
pub use glam::*;

/// RGB colour with components in linear space, typically 0-1.
pub type Color = Vec3;

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec3_algebra() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
        assert!((Vec3::new(3.0, 4.0, 0.0).length() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn vec3_normalize_is_unit_length() {
        let v = Vec3::new(1.0, -2.0, 0.5).normalize();
        assert!((v.length() - 1.0).abs() < 1e-6);
    }
}
