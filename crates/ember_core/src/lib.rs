//! Ember Core - renderer-agnostic inputs for the Ember path tracer.
//!
//! This crate provides:
//!
//! - **Render settings**: `RenderSettings`, read from `.rt` or `.json` files
//! - **Mesh data**: `Mesh` vertex/face lists and an OBJ loader
//!
//! # Example
//!
//! ```ignore
//! use ember_core::{load_obj, RenderSettings};
//!
//! let settings = RenderSettings::load("config/low.rt")?;
//! let bunny = load_obj("bunny.obj")?;
//! println!("{} triangles at {}x{}",
//!     bunny.triangle_count(),
//!     settings.width,
//!     settings.image_height());
//! ```

pub mod config;
pub mod mesh;

// Re-export commonly used types
pub use config::{ConfigError, ConfigResult, RenderSettings};
pub use mesh::{load_obj, parse_obj, Mesh, MeshError, MeshResult};
