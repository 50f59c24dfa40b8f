//! Data providers consumed by the renderer as opaque value functions:
//! decoded texture images and the Perlin noise table.

mod perlin;
mod texture;

pub use perlin::Perlin;
pub use texture::{ImageData, ImageDataError};
