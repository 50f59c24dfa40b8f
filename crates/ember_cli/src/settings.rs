//! Optional JSON overlay for the camera configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use ember_renderer::{Camera, Color, Vec3};
use serde::Deserialize;

/// Camera options recognized in a settings file. Every field is optional;
/// present fields replace the scene's defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    pub aspect_ratio: Option<f32>,
    pub image_width: Option<u32>,
    pub samples_per_pixel: Option<u32>,
    pub max_depth: Option<u32>,
    pub vfov: Option<f32>,
    pub lookfrom: Option<[f32; 3]>,
    pub lookat: Option<[f32; 3]>,
    pub vup: Option<[f32; 3]>,
    pub defocus_angle: Option<f32>,
    pub focus_dist: Option<f32>,
    pub background: Option<[f32; 3]>,
}

impl RenderSettings {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("cannot open settings file {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("cannot parse settings file {}", path.display()))
    }

    pub fn apply(&self, camera: &mut Camera) {
        if let Some(aspect_ratio) = self.aspect_ratio {
            camera.aspect_ratio = aspect_ratio;
        }
        if let Some(image_width) = self.image_width {
            camera.image_width = image_width;
        }
        if let Some(samples_per_pixel) = self.samples_per_pixel {
            camera.samples_per_pixel = samples_per_pixel;
        }
        if let Some(max_depth) = self.max_depth {
            camera.max_depth = max_depth;
        }
        if let Some(vfov) = self.vfov {
            camera.vfov = vfov;
        }
        if let Some([x, y, z]) = self.lookfrom {
            camera.lookfrom = Vec3::new(x, y, z);
        }
        if let Some([x, y, z]) = self.lookat {
            camera.lookat = Vec3::new(x, y, z);
        }
        if let Some([x, y, z]) = self.vup {
            camera.vup = Vec3::new(x, y, z);
        }
        if let Some(defocus_angle) = self.defocus_angle {
            camera.defocus_angle = defocus_angle;
        }
        if let Some(focus_dist) = self.focus_dist {
            camera.focus_dist = focus_dist;
        }
        if let Some([r, g, b]) = self.background {
            camera.background = Color::new(r, g, b);
            camera.use_sky_gradient = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_only_touch_named_fields() {
        let settings: RenderSettings =
            serde_json::from_str(r#"{"image_width": 640, "vfov": 35.0}"#).unwrap();

        let mut camera = Camera::new();
        camera.samples_per_pixel = 77;
        settings.apply(&mut camera);

        assert_eq!(camera.image_width, 640);
        assert_eq!(camera.vfov, 35.0);
        assert_eq!(camera.samples_per_pixel, 77);
    }

    #[test]
    fn vectors_deserialize_from_triples() {
        let settings: RenderSettings = serde_json::from_str(
            r#"{"lookfrom": [1.0, 2.0, 3.0], "background": [0.1, 0.2, 0.3]}"#,
        )
        .unwrap();

        let mut camera = Camera::new();
        camera.use_sky_gradient = true;
        settings.apply(&mut camera);

        assert_eq!(camera.lookfrom, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.background, Color::new(0.1, 0.2, 0.3));
        // An explicit background replaces the gradient.
        assert!(!camera.use_sky_gradient);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<RenderSettings, _> = serde_json::from_str(r#"{"imagewidth": 640}"#);
        assert!(result.is_err());
    }
}
