//! Command-line driver: pick a scene, render it, write a PPM.

mod scenes;
mod settings;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;

use crate::settings::RenderSettings;

#[derive(Debug, Parser)]
#[command(version, about = "CPU Monte Carlo path tracer")]
struct Args {
    /// Scene to render (see --list)
    #[arg(default_value = "bouncing_spheres")]
    scene: String,

    /// Where the rendered PPM image is written
    #[arg(short, long, default_value = "output.ppm")]
    output: PathBuf,

    /// Base seed for scene assembly and per-worker generators
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Override the scene's image width
    #[arg(long)]
    width: Option<u32>,

    /// Override the scene's samples per pixel
    #[arg(long)]
    samples: Option<u32>,

    /// Override the scene's maximum bounce depth
    #[arg(long)]
    max_depth: Option<u32>,

    /// JSON file with camera overrides
    #[arg(long)]
    settings: Option<PathBuf>,

    /// List the available scenes and exit
    #[arg(long)]
    list: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.list {
        for name in scenes::SCENE_NAMES {
            println!("{name}");
        }
        return Ok(());
    }

    let scenes::Scene { world, mut camera } = scenes::build(&args.scene, args.seed)?;

    if let Some(path) = &args.settings {
        RenderSettings::load(path)?.apply(&mut camera);
    }
    if let Some(width) = args.width {
        camera.image_width = width;
    }
    if let Some(samples) = args.samples {
        camera.samples_per_pixel = samples;
    }
    if let Some(max_depth) = args.max_depth {
        camera.max_depth = max_depth;
    }

    // Open the sink before spending minutes on rendering.
    let file = File::create(&args.output)
        .with_context(|| format!("cannot open {} for writing", args.output.display()))?;
    let mut out = BufWriter::new(file);

    let start = Instant::now();
    ember_renderer::render_to(&camera, world.as_ref(), args.seed, &mut out)
        .with_context(|| format!("writing {}", args.output.display()))?;
    out.flush()?;

    log::info!(
        "rendered '{}' to {} in {:.1?}",
        args.scene,
        args.output.display(),
        start.elapsed()
    );

    Ok(())
}
