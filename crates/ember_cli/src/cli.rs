use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use ember_core::RenderSettings;
use log::LevelFilter;

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Render one of the built-in scenes to an image file.
#[derive(Parser, Debug)]
#[command(name = "ember")]
#[command(about = "A CPU path tracer", version)]
pub struct Args {
    /// Render settings file (.rt or .json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output image (.ppm or .png)
    #[arg(short, long, default_value = "image.ppm")]
    pub output: PathBuf,

    /// Built-in scene: random, light, cornell, cornell-fog, mesh, blocks
    #[arg(long)]
    pub scene: Option<String>,

    /// OBJ file for the mesh scene
    #[arg(long)]
    pub mesh: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Samples per pixel
    #[arg(short = 's', long)]
    pub samples: Option<u32>,

    /// Seed for scene generation and sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Logging level; RUST_LOG filters still apply on top
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Override file settings with whatever was given on the command line.
    pub fn apply(&self, settings: &mut RenderSettings) {
        if let Some(scene) = &self.scene {
            settings.scene = scene.clone();
        }
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(samples) = self.samples {
            settings.samples_per_pixel = samples;
        }
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }
    }
}
