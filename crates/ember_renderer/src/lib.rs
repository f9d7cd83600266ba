//! Ember Renderer - CPU path tracing
//!
//! A Monte Carlo path tracer in the "ray tracing in a weekend" family:
//! spheres, rectangles, boxes, triangle meshes, instancing transforms and
//! constant-density fog, accelerated by a BVH and rendered in parallel.

mod bvh;
mod camera;
mod constant_medium;
mod error;
mod hittable;
mod material;
mod object;
mod rect;
mod renderer;
pub mod sampling;
mod sphere;
mod texture;
mod transform;
mod triangle;

pub use bvh::BvhNode;
pub use camera::Camera;
pub use constant_medium::ConstantMedium;
pub use error::{SceneError, SceneResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{reflect, refract, Material, ScatterResult};
pub use object::Object;
pub use rect::{Cube, Rect, RectPlane};
pub use renderer::{ray_color, render, render_pixel, ImageBuffer, RenderConfig};
pub use sphere::{MovingSphere, Sphere};
pub use texture::Texture;
pub use transform::{Axis, Rotate, Translate};
pub use triangle::{intersect_triangle, Triangle, TriangleHit, TriangleMesh};

/// Re-export math types from ember_math
pub use ember_math::{Aabb, Color, Interval, Ray, Vec3};
