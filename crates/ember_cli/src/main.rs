//! `ember` - render a built-in scene to an image file.

mod cli;
mod logger;
mod output;
mod scenes;

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use ember_core::RenderSettings;
use ember_renderer::{render, Camera, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

use cli::Args;

fn load_settings(args: &Args) -> Result<RenderSettings> {
    let mut settings = match &args.config {
        Some(path) => RenderSettings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => {
            let mut settings = RenderSettings::default();
            if let Some(scene) = &args.scene {
                settings.scene = scene.clone();
            }
            let scene = settings.scene.clone();
            scenes::apply_preset(&scene, &mut settings);
            settings
        }
    };
    args.apply(&mut settings);
    settings.validate().context("Invalid render settings")?;
    Ok(settings)
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_logger(args.log_level.into());

    let settings = load_settings(&args)?;
    log::debug!("{:?}", settings);

    let mut rng = StdRng::seed_from_u64(settings.seed);
    let start = Instant::now();
    let world = scenes::build(&settings.scene, &settings, args.mesh.as_deref(), &mut rng)
        .with_context(|| format!("Failed to build scene '{}'", settings.scene))?;
    log::info!(
        "Built scene '{}' with {} top-level objects in {:.2?}",
        settings.scene,
        world.len(),
        start.elapsed()
    );

    let camera = Camera::from_settings(&settings);
    let image = render(
        &camera,
        &world,
        settings.width,
        settings.image_height(),
        &RenderConfig::from(&settings),
    );

    output::save(&image, &args.output)
}
