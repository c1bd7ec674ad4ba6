use anyhow::{Context, Result};
use clap::Parser;
use lux_renderer::{render_with_cancel, scenes, ImageBuffer};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

mod settings;

use settings::{Args, Settings};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let settings = Settings::resolve(&args)?;

    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }
    settings.validate().context("Invalid render settings")?;

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let handler_cancel = cancel.clone();
        ctrlc::set_handler(move || {
            log::warn!("Interrupted, finishing buckets in flight");
            handler_cancel.store(true, Ordering::Relaxed);
        })
        .context("Failed to install Ctrl-C handler")?;
    }

    log::info!("Starting Lux");
    let start = Instant::now();

    let scene = scenes::cornell_box(settings.split_method);
    let camera = scenes::cornell_box_camera(settings.width, settings.height);
    let image = render_with_cancel(&camera, &scene, &settings.render, &cancel);

    save_image(&image, &args.output)?;
    log::info!("Wrote {} in {:.2?}", args.output.display(), start.elapsed());

    if cancel.load(Ordering::Relaxed) {
        log::warn!("Render was interrupted; unfinished buckets are black");
    }
    Ok(())
}

fn save_image(image: &ImageBuffer, path: &Path) -> Result<()> {
    let rgba = image::RgbaImage::from_raw(image.width, image.height, image.to_rgba())
        .context("Image buffer size does not match its dimensions")?;
    rgba.save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}
