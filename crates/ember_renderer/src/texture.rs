//! Procedural textures: color as a function of `(u, v, p)`.

use std::sync::Arc;

use ember_math::{Color, Vec3};

/// A texture that can be evaluated at a surface point.
///
/// Textures are shared between materials through `Arc`.
#[derive(Debug, Clone)]
pub enum Texture {
    /// The same color everywhere.
    Solid(Color),
    /// 3D checkerboard alternating between two sub-textures.
    Checker { even: Arc<Texture>, odd: Arc<Texture> },
}

impl Texture {
    pub fn solid(color: Color) -> Self {
        Texture::Solid(color)
    }

    /// Checkerboard of two solid colors.
    pub fn checker(even: Color, odd: Color) -> Self {
        Texture::Checker {
            even: Arc::new(Texture::Solid(even)),
            odd: Arc::new(Texture::Solid(odd)),
        }
    }

    /// Color at texture coordinates `(u, v)` and world point `p`.
    pub fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        match self {
            Texture::Solid(color) => *color,
            Texture::Checker { even, odd } => {
                let sines = (10.0 * p.x).sin() * (10.0 * p.y).sin() * (10.0 * p.z).sin();
                if sines < 0.0 {
                    odd.value(u, v, p)
                } else {
                    even.value(u, v, p)
                }
            }
        }
    }
}

impl From<Color> for Texture {
    fn from(color: Color) -> Self {
        Texture::Solid(color)
    }
}
