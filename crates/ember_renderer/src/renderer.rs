//! The integrator and the multi-threaded render loop.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;

use ember_math::{Color, Interval, Ray};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::camera::Camera;
use crate::hittable::Hittable;

/// Hit-distance epsilon: keeps bounced rays from re-hitting the surface they
/// just left (shadow acne).
const T_MIN: f32 = 0.001;

/// Channel clamp before quantization.
const INTENSITY: Interval = Interval {
    min: 0.0,
    max: 0.999,
};

/// Accumulated pixel colours, row-major. Each pixel is written exactly once,
/// by exactly one worker.
pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }
}

/// Recursively evaluate the colour carried back along a ray.
///
/// Termination is exact: a miss, an absorption, or the bounce budget running
/// out. There is no roulette, so the worst-case recursion depth is always
/// `depth` and renders are reproducible.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    camera: &Camera,
    rng: &mut dyn RngCore,
) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(T_MIN, f32::INFINITY), rng) else {
        return camera.background_color(ray);
    };

    let emitted = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(scatter) => {
            emitted
                + scatter.attenuation * ray_color(&scatter.scattered, world, depth - 1, camera, rng)
        }
        None => emitted,
    }
}

/// Number of render workers: detected hardware parallelism, or 4 when the
/// platform cannot report it.
fn worker_count() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Render the scene into a framebuffer.
///
/// Image rows are divided into contiguous per-worker ranges (remainder rows
/// go to the first workers) and the framebuffer is split along the same
/// boundaries, so no synchronization is needed on the pixels. Each worker
/// seeds its own generator from `seed` plus its index: output is
/// byte-identical for a fixed (scene, seed, worker count), but a different
/// worker count re-partitions the rows and produces a different noise
/// pattern.
pub fn render(camera: &Camera, world: &dyn Hittable, seed: u64) -> Framebuffer {
    let cam = camera.initialized();
    let width = cam.image_width as usize;
    let height = cam.image_height() as usize;
    let mut frame = Framebuffer::new(cam.image_width, cam.image_height());

    let workers = worker_count();
    let rows_per_worker = height / workers;
    let extra_rows = height % workers;

    // Advisory progress counter; relaxed ordering is enough since nothing is
    // published through it.
    let lines_done = AtomicU32::new(0);

    log::info!(
        "rendering {}x{} at {} spp on {} workers",
        width,
        height,
        cam.samples_per_pixel,
        workers
    );

    thread::scope(|s| {
        let cam = &cam;
        let lines_done = &lines_done;
        let mut rest = frame.pixels.as_mut_slice();
        let mut next_row = 0usize;

        for worker in 0..workers {
            let rows = rows_per_worker + usize::from(worker < extra_rows);
            let remaining = std::mem::take(&mut rest);
            let (chunk, tail) = remaining.split_at_mut(rows * width);
            rest = tail;
            let first_row = next_row;
            next_row += rows;

            s.spawn(move || {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(worker as u64));

                for (row_offset, row) in chunk.chunks_mut(width).enumerate() {
                    let j = (first_row + row_offset) as u32;
                    for (i, pixel) in row.iter_mut().enumerate() {
                        let mut color = Color::ZERO;
                        for _ in 0..cam.samples_per_pixel {
                            let ray = cam.get_ray(i as u32, j, &mut rng);
                            color += ray_color(&ray, world, cam.max_depth, cam, &mut rng);
                        }
                        *pixel = color * cam.pixel_samples_scale();
                    }

                    let done = lines_done.fetch_add(1, Ordering::Relaxed) + 1;
                    if done % 10 == 0 || done as usize == height {
                        log::info!("scanlines remaining: {}", height as u32 - done);
                    }
                }
            });
        }
    });

    frame
}

/// Render and serialize in one step. The workers are joined inside
/// [`render`], so nothing is written until every pixel is final.
pub fn render_to(
    camera: &Camera,
    world: &dyn Hittable,
    seed: u64,
    out: &mut dyn Write,
) -> io::Result<()> {
    let frame = render(camera, world, seed);
    write_ppm(&frame, out)
}

/// Plain-text PPM ("P3"): header, then one gamma-corrected triplet per pixel
/// in row-major order.
pub fn write_ppm(frame: &Framebuffer, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "P3")?;
    writeln!(out, "{} {}", frame.width, frame.height)?;
    writeln!(out, "255")?;

    for color in &frame.pixels {
        let r = quantize(color.x);
        let g = quantize(color.y);
        let b = quantize(color.z);
        writeln!(out, "{r} {g} {b}")?;
    }

    Ok(())
}

/// Gamma-2 transfer back to display space.
#[inline]
fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

#[inline]
fn quantize(channel: f32) -> u8 {
    (256.0 * INTENSITY.clamp(linear_to_gamma(channel))) as u8
}
