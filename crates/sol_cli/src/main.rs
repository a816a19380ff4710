use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use sol_renderer::RenderTarget;
use sol_scene::Scene;

mod cli;
mod settings;

use cli::{Args, OutputFormat};
use settings::RenderSettings;

const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    log::info!("Starting sol");

    let settings = match &args.settings {
        Some(path) => RenderSettings::load(path)?,
        None => RenderSettings::default(),
    };

    let mut scene = Scene::demo(16.0, 9.0);
    configure(&mut scene, &settings, &args);

    let threads = args
        .threads
        .or(settings.threads)
        .unwrap_or_else(num_cpus::get);

    let start = Instant::now();
    let job = scene.render_in_background(threads)?;
    while !job.is_finished() {
        std::thread::sleep(PROGRESS_INTERVAL);
        log::info!("{}", job.progress().message());
    }
    let Some(frame) = job.wait() else {
        bail!("Render did not finish");
    };
    log::info!("Rendered in {:.2?}", start.elapsed());

    if frame.is_empty() {
        bail!("Nothing to save: rendered image is {}x{}", frame.width(), frame.height());
    }
    write_frame(&frame, &args.output, args.format)?;
    log::info!("Wrote {}", args.output.display());

    Ok(())
}

/// Settings file first, then command-line flags on top.
fn configure(scene: &mut Scene, settings: &RenderSettings, args: &Args) {
    let camera = scene.camera_mut();
    settings.apply(camera);

    if let Some(width) = args.width {
        camera.image_width = width;
    }
    if let Some(samples) = args.samples {
        camera.samples_per_pixel = samples;
    }
    if let Some(depth) = args.depth {
        camera.max_depth = depth;
    }
}

fn write_frame(frame: &RenderTarget, path: &Path, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Png => frame
            .save_png_to_file(path)
            .with_context(|| format!("Failed to write PNG {}", path.display())),
        OutputFormat::Ppm => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            frame
                .write_ppm(BufWriter::new(file))
                .with_context(|| format!("Failed to write PPM {}", path.display()))
        }
    }
}
