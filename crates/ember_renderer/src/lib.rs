//! A Monte Carlo path tracer.
//!
//! Geometry, materials and textures are immutable trait objects shared with
//! `Arc`; the scene is built once, wrapped in a BVH, and traversed read-only
//! by a pool of worker threads, each with its own seeded generator.

mod bvh;
mod camera;
mod hittable;
mod material;
mod medium;
mod quad;
mod renderer;
mod sampling;
mod sphere;
mod texture;
mod transform;

pub use bvh::BvhNode;
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, Scatter};
pub use medium::ConstantMedium;
pub use quad::{make_box, Quad};
pub use renderer::{ray_color, render, render_to, write_ppm, Framebuffer};
pub use sampling::{
    random_color, random_color_range, random_f32, random_in_unit_disk, random_range,
    random_unit_vector,
};
pub use sphere::Sphere;
pub use texture::{CheckerTexture, ImageTexture, NoiseTexture, SolidColor, Texture};
pub use transform::{RotateY, Translate};

/// Re-export the math types the public API is built from.
pub use ember_math::{Aabb, Color, Interval, Ray, Vec3};
