//! Camera: projection geometry and per-sample ray generation.

use ember_math::{Color, Ray, Vec3};
use rand::RngCore;

use crate::sampling::{random_f32, random_in_unit_disk};

/// Camera configuration plus the projection state derived from it.
///
/// Set the public fields, then call [`Camera::initialize`] (the renderer does
/// this on a clone before any pixel work) to compute the viewport basis.
#[derive(Clone)]
pub struct Camera {
    /// Ratio of image width over height.
    pub aspect_ratio: f32,
    /// Rendered image width in pixels.
    pub image_width: u32,
    /// Random samples averaged per pixel.
    pub samples_per_pixel: u32,
    /// Maximum number of ray bounces into the scene.
    pub max_depth: u32,

    /// Vertical field of view in degrees.
    pub vfov: f32,
    pub lookfrom: Vec3,
    pub lookat: Vec3,
    /// Camera-relative "up".
    pub vup: Vec3,

    /// Cone angle (degrees) of rays through each pixel; <= 0 disables
    /// depth of field.
    pub defocus_angle: f32,
    /// Distance from lookfrom to the plane of perfect focus.
    pub focus_dist: f32,

    /// Colour returned for rays that escape the scene.
    pub background: Color,
    /// Replace the flat background with the classic white-to-blue sky ramp.
    pub use_sky_gradient: bool,

    // Derived projection state, valid after initialize().
    image_height: u32,
    pixel_samples_scale: f32,
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 10,
            max_depth: 10,
            vfov: 90.0,
            lookfrom: Vec3::ZERO,
            lookat: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            background: Color::ZERO,
            use_sky_gradient: false,
            image_height: 0,
            pixel_samples_scale: 0.0,
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
        }
    }

    /// Derive the projection state. Invalid configuration is normalized to
    /// safe minimums rather than rejected, so a render always completes.
    pub fn initialize(&mut self) {
        self.image_width = self.image_width.max(1);
        self.samples_per_pixel = self.samples_per_pixel.max(1);
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            self.aspect_ratio = 1.0;
        }

        self.image_height = ((self.image_width as f32 / self.aspect_ratio) as u32).max(1);
        self.pixel_samples_scale = 1.0 / self.samples_per_pixel as f32;
        self.center = self.lookfrom;

        // Viewport dimensions on the focus plane.
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width =
            viewport_height * (self.image_width as f32 / self.image_height as f32);

        // Orthonormal camera frame.
        self.w = (self.lookfrom - self.lookat).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        // Across and down the viewport, then per-pixel steps.
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;
        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        let viewport_upper_left =
            self.center - self.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;
    }

    /// A clone with the projection state derived.
    pub fn initialized(&self) -> Camera {
        let mut cam = self.clone();
        cam.initialize();
        cam
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn pixel_samples_scale(&self) -> f32 {
        self.pixel_samples_scale
    }

    /// A ray through pixel (i, j), jittered inside the pixel for antialiasing,
    /// originating on the defocus disk when depth of field is enabled, with a
    /// uniform shutter time for motion blur.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset_x = random_f32(rng) - 0.5;
        let offset_y = random_f32(rng) - 0.5;

        let pixel_sample = self.pixel00_loc
            + (i as f32 + offset_x) * self.pixel_delta_u
            + (j as f32 + offset_y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        Ray::new(ray_origin, pixel_sample - ray_origin, random_f32(rng))
    }

    /// Colour for a ray that left the scene.
    pub fn background_color(&self, ray: &Ray) -> Color {
        if !self.use_sky_gradient {
            return self.background;
        }

        let unit_direction = ray.direction.normalize();
        let a = 0.5 * (unit_direction.y + 1.0);
        (1.0 - a) * Color::ONE + a * Color::new(0.5, 0.7, 1.0)
    }

    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
