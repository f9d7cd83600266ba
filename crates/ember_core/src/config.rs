//! Render settings and the readers for the two settings file formats.
//!
//! `.rt` files use a line-oriented `key=value` syntax; vector values start
//! with a comma, e.g. `from=,13,2,3`. Lines beginning with `#` or whitespace
//! are ignored. `.json` files are a serialized [`RenderSettings`].

use std::fs;
use std::path::Path;

use ember_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while reading render settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Everything the renderer needs besides the scene itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Image width in pixels
    pub width: u32,
    /// Width / height
    pub aspect: f32,
    /// Samples per pixel
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: i32,
    /// Color returned by rays that escape the scene
    pub background: Vec3,

    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
    pub focus_dist: f32,
    /// Lens diameter; 0 gives a pinhole camera
    pub aperture: f32,
    pub shutter_open: f32,
    pub shutter_close: f32,

    /// Seed for scene construction and sampling
    pub seed: u64,
    /// Name of the built-in scene to render
    pub scene: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 400,
            aspect: 16.0 / 9.0,
            samples_per_pixel: 50,
            max_depth: 50,
            background: Vec3::new(0.7, 0.8, 1.0),
            look_from: Vec3::new(13.0, 2.0, 3.0),
            look_at: Vec3::ZERO,
            vup: Vec3::Y,
            vfov: 20.0,
            focus_dist: 10.0,
            aperture: 0.1,
            shutter_open: 0.0,
            shutter_close: 1.0,
            seed: 0,
            scene: "random".to_string(),
        }
    }
}

impl RenderSettings {
    /// Image height derived from width and aspect ratio.
    pub fn image_height(&self) -> u32 {
        (self.width as f32 / self.aspect) as u32 + 1
    }

    /// Load settings from a file, picking the format from its extension.
    ///
    /// `.json` is parsed with serde; anything else is read as `.rt`.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let settings = if is_json {
            Self::from_json_str(&text)?
        } else {
            Self::from_rt_str(&text)?
        };

        log::debug!("Loaded render settings from {}: {:?}", path.display(), settings);
        Ok(settings)
    }

    /// Parse JSON settings; missing fields take their defaults.
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let settings: RenderSettings = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse `.rt` settings on top of the defaults.
    pub fn from_rt_str(text: &str) -> ConfigResult<Self> {
        let mut settings = RenderSettings::default();

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            if raw.is_empty() || raw.starts_with('#') || raw.starts_with(char::is_whitespace) {
                continue;
            }

            let (key, value) = raw.split_once('=').ok_or_else(|| ConfigError::Parse {
                line,
                message: format!("expected key=value, found '{raw}'"),
            })?;
            settings.apply(key.trim(), value.trim(), line)?;
        }

        settings.validate()?;
        Ok(settings)
    }

    fn apply(&mut self, key: &str, value: &str, line: usize) -> ConfigResult<()> {
        match key {
            "width" => self.width = parse_scalar::<f64>(value, line)? as u32,
            "aspect" => self.aspect = parse_scalar(value, line)?,
            "ns" => self.samples_per_pixel = parse_scalar::<f64>(value, line)? as u32,
            "max_depth" => self.max_depth = parse_scalar::<f64>(value, line)? as i32,
            "bg" => self.background = parse_vector(value, line)?,
            "from" => self.look_from = parse_vector(value, line)?,
            "to" => self.look_at = parse_vector(value, line)?,
            "vup" => self.vup = parse_vector(value, line)?,
            "vof" => self.vfov = parse_scalar(value, line)?,
            "focus" => self.focus_dist = parse_scalar(value, line)?,
            "ap" => self.aperture = parse_scalar(value, line)?,
            "t0" => self.shutter_open = parse_scalar(value, line)?,
            "t1" => self.shutter_close = parse_scalar(value, line)?,
            "seed" => self.seed = parse_scalar(value, line)?,
            "scene" => self.scene = value.to_string(),
            _ => log::warn!("Ignoring unknown setting '{}' at line {}", key, line),
        }
        Ok(())
    }

    /// Reject settings the renderer cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 {
            return Err(ConfigError::Invalid("width must be positive".into()));
        }
        if !(self.aspect > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "aspect must be positive, got {}",
                self.aspect
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::Invalid("samples per pixel must be positive".into()));
        }
        if self.shutter_close < self.shutter_open {
            return Err(ConfigError::Invalid(format!(
                "shutter closes ({}) before it opens ({})",
                self.shutter_close, self.shutter_open
            )));
        }
        Ok(())
    }
}

fn parse_scalar<T: std::str::FromStr>(value: &str, line: usize) -> ConfigResult<T> {
    value.parse().map_err(|_| ConfigError::Parse {
        line,
        message: format!("invalid number '{value}'"),
    })
}

fn parse_vector(value: &str, line: usize) -> ConfigResult<Vec3> {
    let components = value
        .strip_prefix(',')
        .ok_or_else(|| ConfigError::Parse {
            line,
            message: format!("vector values start with ',', found '{value}'"),
        })?
        .split(',')
        .map(|c| parse_scalar::<f32>(c.trim(), line))
        .collect::<ConfigResult<Vec<_>>>()?;

    match components.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(ConfigError::Parse {
            line,
            message: format!("expected 3 components, found {}", components.len()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOW_RT: &str = "\
# low quality preview
width=200
aspect=1.5
ns=10
max_depth=8
bg=,0.7,0.8,1.0
from=,13,2,3
to=,0,0,0
vup=,0,1,0
vof=20
focus=10
ap=0.1
";

    #[test]
    fn test_rt_parsing() {
        let settings = RenderSettings::from_rt_str(LOW_RT).unwrap();

        assert_eq!(settings.width, 200);
        assert_eq!(settings.aspect, 1.5);
        assert_eq!(settings.samples_per_pixel, 10);
        assert_eq!(settings.max_depth, 8);
        assert_eq!(settings.background, Vec3::new(0.7, 0.8, 1.0));
        assert_eq!(settings.look_from, Vec3::new(13.0, 2.0, 3.0));
        assert_eq!(settings.look_at, Vec3::ZERO);
        assert_eq!(settings.vup, Vec3::Y);
        assert_eq!(settings.vfov, 20.0);
        assert_eq!(settings.focus_dist, 10.0);
        assert_eq!(settings.aperture, 0.1);
    }

    #[test]
    fn test_rt_skips_comments_and_indented_lines() {
        let settings = RenderSettings::from_rt_str("#width=1\n  width=2\nwidth=300\n").unwrap();
        assert_eq!(settings.width, 300);
    }

    #[test]
    fn test_rt_scene_name_and_unknown_keys() {
        let settings = RenderSettings::from_rt_str("scene=cornell\nbogus=1\n").unwrap();
        assert_eq!(settings.scene, "cornell");
    }

    #[test]
    fn test_rt_bad_number_reports_line() {
        let err = RenderSettings::from_rt_str("width=200\nns=lots\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_rt_short_vector_is_rejected() {
        let err = RenderSettings::from_rt_str("from=,1,2\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_rt_missing_equals_is_rejected() {
        assert!(RenderSettings::from_rt_str("width 200\n").is_err());
    }

    #[test]
    fn test_image_height_matches_original_rounding() {
        let settings = RenderSettings {
            width: 400,
            aspect: 2.0,
            ..Default::default()
        };
        assert_eq!(settings.image_height(), 201);
    }

    #[test]
    fn test_json_parsing_with_defaults() {
        let settings =
            RenderSettings::from_json_str(r#"{"width": 64, "look_from": [1.0, 2.0, 3.0]}"#)
                .unwrap();

        assert_eq!(settings.width, 64);
        assert_eq!(settings.look_from, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(settings.samples_per_pixel, RenderSettings::default().samples_per_pixel);
    }

    #[test]
    fn test_validation() {
        assert!(RenderSettings::from_rt_str("width=0\n").is_err());
        assert!(RenderSettings::from_rt_str("aspect=-1\n").is_err());
        assert!(RenderSettings::from_rt_str("ns=0\n").is_err());
        assert!(RenderSettings::from_rt_str("t0=1\nt1=0.5\n").is_err());
    }
}
