//! Decoded image pixel buffers for image-mapped materials.

use std::path::Path;

use ember_math::Color;
use thiserror::Error;

/// Errors that can occur while loading a texture image.
#[derive(Error, Debug)]
pub enum ImageDataError {
    #[error("failed to load image {path}: {source}")]
    Decode {
        path: String,
        source: image::ImageError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An image decoded into linear-space RGB floats, row-major from the top row.
#[derive(Clone, Debug)]
pub struct ImageData {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl ImageData {
    /// Decode an image file into linear RGB.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ImageDataError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| ImageDataError::Decode {
            path: path.display().to_string(),
            source,
        })?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels = rgb
            .pixels()
            .map(|p| {
                Color::new(
                    srgb_to_linear(p[0]),
                    srgb_to_linear(p[1]),
                    srgb_to_linear(p[2]),
                )
            })
            .collect();

        log::debug!("loaded texture image {} ({}x{})", path.display(), width, height);

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build from an already-decoded pixel buffer (row-major, top row first).
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Self {
        assert_eq!(pixels.len(), (width * height) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Nearest-texel lookup. `u` runs left to right, `v` bottom to top; both
    /// are clamped to [0, 1].
    pub fn sample(&self, u: f32, v: f32) -> Color {
        if self.pixels.is_empty() {
            // Solid cyan marks a missing image without aborting a render.
            return Color::new(0.0, 1.0, 1.0);
        }

        let u = u.clamp(0.0, 1.0);
        let v = 1.0 - v.clamp(0.0, 1.0); // flip to image row order

        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);
        self.pixels[(y * self.width + x) as usize]
    }
}

fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
