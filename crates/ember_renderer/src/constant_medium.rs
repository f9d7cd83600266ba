//! Homogeneous participating medium (fog, smoke) inside a closed boundary.

use std::sync::Arc;

use ember_math::{Aabb, Color, Interval, Ray, Vec3};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;
use crate::object::Object;
use crate::sampling::gen_f32;
use crate::texture::Texture;

/// Offset past the entry point when searching for the exit point.
const EXIT_EPSILON: f32 = 0.0001;

/// Constant-density volume bounded by a closed convex object.
///
/// A ray entering the volume scatters after an exponentially distributed
/// distance; rays that would scatter beyond the exit pass straight through.
#[derive(Debug, Clone)]
pub struct ConstantMedium {
    boundary: Box<Object>,
    neg_inv_density: f32,
    phase_function: Arc<Material>,
}

impl ConstantMedium {
    pub fn new(boundary: impl Into<Object>, density: f32, albedo: Color) -> Self {
        Self::with_texture(boundary, density, Arc::new(Texture::Solid(albedo)))
    }

    pub fn with_texture(boundary: impl Into<Object>, density: f32, texture: Arc<Texture>) -> Self {
        Self {
            boundary: Box::new(boundary.into()),
            neg_inv_density: -1.0 / density,
            phase_function: Arc::new(Material::isotropic_textured(texture)),
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let entry = self.boundary.hit(ray, Interval::UNIVERSE, rng)?;
        let exit = self
            .boundary
            .hit(ray, Interval::new(entry.t + EXIT_EPSILON, f32::INFINITY), rng)?;

        let mut t0 = entry.t.max(ray_t.min);
        let t1 = exit.t.min(ray_t.max);
        if t0 >= t1 {
            return None;
        }
        t0 = t0.max(0.0);

        let ray_length = ray.direction().length();
        let distance_inside = (t1 - t0) * ray_length;
        let hit_distance = self.neg_inv_density * gen_f32(rng).ln();
        if hit_distance > distance_inside {
            return None;
        }

        let t = t0 + hit_distance / ray_length;
        // Normal and face are arbitrary inside a volume
        Some(HitRecord {
            p: ray.at(t),
            normal: Vec3::X,
            material: &self.phase_function,
            t,
            u: 0.0,
            v: 0.0,
            front_face: true,
        })
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.boundary.bounding_box(time0, time1)
    }
}
