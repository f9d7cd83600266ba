//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Anti-aliasing via jittered multi-sampling
//! - Row-parallel rendering with rayon, one seeded RNG per row

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use ember_core::RenderSettings;
use ember_math::{Color, Interval, Ray};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

use crate::camera::Camera;
use crate::hittable::Hittable;
use crate::sampling::gen_f32;

/// Smallest `t` accepted for secondary hits, to avoid self-intersection.
const SHADOW_EPSILON: f32 = 0.001;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: i32,
    /// Background color when ray doesn't hit anything
    pub background: Color,
    /// Base seed for the per-row generators
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            background: Color::ZERO,
            seed: 0,
        }
    }
}

impl From<&RenderSettings> for RenderConfig {
    fn from(settings: &RenderSettings) -> Self {
        Self {
            samples_per_pixel: settings.samples_per_pixel,
            max_depth: settings.max_depth,
            background: settings.background,
            seed: settings.seed,
        }
    }
}

/// Compute the color seen by a ray.
///
/// Returns black once the bounce budget is spent, the background on a
/// miss, and otherwise the emitted light plus the attenuated color of the
/// scattered ray.
pub fn ray_color(
    ray: &Ray,
    background: Color,
    world: &dyn Hittable,
    depth: i32,
    rng: &mut dyn RngCore,
) -> Color {
    if depth <= 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(SHADOW_EPSILON, f32::INFINITY), rng) else {
        return background;
    };

    let emitted = rec.material.emitted(rec.u, rec.v, rec.p);
    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            emitted
                + result.attenuation
                    * ray_color(&result.scattered, background, world, depth - 1, rng)
        }
        None => emitted,
    }
}

/// Zero out NaN channels so one bad sample cannot poison a pixel.
#[inline]
fn scrub_nan(c: Color) -> Color {
    Color::select(c.is_nan_mask(), Color::ZERO, c)
}

/// Sum of `samples_per_pixel` jittered samples for pixel `(x, y)`.
///
/// `y` counts rows from the top of the image; the camera's `t` coordinate
/// counts from the bottom.
#[allow(clippy::too_many_arguments)]
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let j = height - 1 - y;
    let s_scale = (width.saturating_sub(1)).max(1) as f32;
    let t_scale = (height.saturating_sub(1)).max(1) as f32;

    let mut sum = Color::ZERO;
    for _ in 0..config.samples_per_pixel {
        let s = (x as f32 + gen_f32(rng)) / s_scale;
        let t = (j as f32 + gen_f32(rng)) / t_scale;
        let ray = camera.get_ray(s, t, rng);
        sum += scrub_nan(ray_color(&ray, config.background, world, config.max_depth, rng));
    }
    sum
}

/// Row-major offset, computed in `usize` so large images do not wrap.
#[inline]
fn pixel_index(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}

/// Linear radiance sums for every pixel, rows top to bottom.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    /// Samples accumulated into every pixel
    pub samples_per_pixel: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32, samples_per_pixel: u32) -> Self {
        Self {
            width,
            height,
            samples_per_pixel,
            pixels: vec![Color::ZERO; pixel_index(width, 0, height)],
        }
    }

    /// Get the accumulated sum at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[pixel_index(self.width, x, y)]
    }

    /// Set the accumulated sum at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[pixel_index(self.width, x, y)] = color;
    }

    /// Mean radiance at (x, y).
    pub fn average(&self, x: u32, y: u32) -> Color {
        self.get(x, y) / self.samples_per_pixel.max(1) as f32
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        self.pixels.chunks(self.width.max(1) as usize)
    }
}

/// Render the entire scene to an image buffer in parallel.
///
/// Each row draws from its own `StdRng` seeded with `config.seed` and the
/// row index, so the result does not depend on thread scheduling.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    width: u32,
    height: u32,
    config: &RenderConfig,
) -> ImageBuffer {
    let mut image = ImageBuffer::new(width, height, config.samples_per_pixel);
    if width == 0 || height == 0 {
        return image;
    }

    log::info!(
        "Rendering {}x{} at {} spp, max depth {}, {} threads",
        width,
        height,
        config.samples_per_pixel,
        config.max_depth,
        rayon::current_num_threads()
    );
    let start = Instant::now();
    let rows_done = AtomicUsize::new(0);
    let report_every = (height as usize / 10).max(1);

    image
        .pixels
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let mut rng = StdRng::seed_from_u64(row_seed(config.seed, y as u64));
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = render_pixel(
                    camera, world, x as u32, y as u32, width, height, config, &mut rng,
                );
            }

            let done = rows_done.fetch_add(1, Ordering::Relaxed) + 1;
            if done % report_every == 0 {
                log::debug!("{}/{} rows", done, height);
            }
        });

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}

fn row_seed(seed: u64, row: u64) -> u64 {
    seed ^ row.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BvhNode, HittableList, Material, Rect, Sphere};
    use ember_math::Vec3;
    use std::sync::Arc;

    fn sky() -> Color {
        Color::new(0.5, 0.7, 1.0)
    }

    #[test]
    fn test_depth_zero_is_black() {
        let mut world = HittableList::new();
        world.add(Sphere::new(Vec3::ZERO, 1.0, Arc::new(Material::light(Color::ONE))));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, 0.0);
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(ray_color(&ray, sky(), &world, 0, &mut rng), Color::ZERO);
        assert_eq!(ray_color(&ray, sky(), &world, -3, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_empty_scene_returns_background() {
        let world = HittableList::new();
        let mut rng = StdRng::seed_from_u64(0);

        for dir in [Vec3::X, Vec3::NEG_Y, Vec3::new(1.0, 2.0, 3.0)] {
            let ray = Ray::new(Vec3::ZERO, dir, 0.0);
            assert_eq!(ray_color(&ray, sky(), &world, 50, &mut rng), sky());
        }
    }

    #[test]
    fn test_light_returns_emission_only() {
        let mut world = HittableList::new();
        world.add(Rect::xy(
            (-1.0, 1.0),
            (-1.0, 1.0),
            -2.0,
            Arc::new(Material::light(Color::new(4.0, 3.0, 2.0))),
        ));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z, 0.0);
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(
            ray_color(&ray, Color::ZERO, &world, 1, &mut rng),
            Color::new(4.0, 3.0, 2.0)
        );
    }

    #[test]
    fn test_mirror_reflects_background() {
        let mut world = HittableList::new();
        world.add(Rect::xz(
            (-10.0, 10.0),
            (-10.0, 10.0),
            0.0,
            Arc::new(Material::metal(Color::splat(0.5), 0.0)),
        ));
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), 0.0);
        let mut rng = StdRng::seed_from_u64(0);

        // One bounce then escape
        let color = ray_color(&ray, sky(), &world, 5, &mut rng);
        assert!((color - 0.5 * sky()).length() < 1e-6);
        // Out of bounces on the way back up
        assert_eq!(ray_color(&ray, sky(), &world, 1, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_scrub_nan() {
        let c = scrub_nan(Color::new(f32::NAN, 0.5, f32::NAN));
        assert_eq!(c, Color::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn test_pixel_index_does_not_wrap() {
        assert_eq!(pixel_index(4, 1, 2), 9);
        assert_eq!(pixel_index(100_000, 7, 50_000), 5_000_000_007);

        let mut image = ImageBuffer::new(3, 2, 1);
        assert_eq!(image.pixels.len(), 6);
        image.set(2, 1, Color::ONE);
        assert_eq!(image.pixels[5], Color::ONE);
    }

    #[test]
    fn test_render_pixel_sums_samples() {
        let world = HittableList::new();
        let camera = Camera::new();
        let config = RenderConfig {
            samples_per_pixel: 4,
            max_depth: 5,
            background: sky(),
            seed: 0,
        };
        let mut rng = StdRng::seed_from_u64(42);

        let sum = render_pixel(&camera, &world, 1, 1, 4, 3, &config, &mut rng);
        assert!((sum - 4.0 * sky()).length() < 1e-5);
    }

    #[test]
    fn test_render_is_deterministic_and_hits_scene() {
        let gray = Arc::new(Material::diffuse(Color::splat(0.5)));
        let mut list = HittableList::new();
        list.add(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray));
        let mut rng = StdRng::seed_from_u64(7);
        let world = BvhNode::from_list(&list, 0.0, 1.0, &mut rng).unwrap();

        let mut camera = Camera::new().with_aspect(1.0);
        camera.initialize();
        let config = RenderConfig {
            samples_per_pixel: 2,
            max_depth: 4,
            background: sky(),
            seed: 11,
        };

        let a = render(&camera, &world, 9, 9, &config);
        let b = render(&camera, &world, 9, 9, &config);
        assert_eq!(a.pixels, b.pixels);
        assert_eq!(a.rows().count(), 9);

        // Center pixel sees the sphere, so it is darker than the sky
        assert!(a.average(4, 4).z < sky().z);
        // Corner pixel sees only sky
        assert!((a.average(0, 0) - sky()).length() < 1e-5);
    }
}
