//! Surface and volume scattering models.

use std::sync::Arc;

use ember_math::{Color, Ray, Vec3};
use rand::RngCore;

use crate::hittable::HitRecord;
use crate::sampling::{gen_f32, random_in_unit_sphere, random_unit_vector};
use crate::texture::Texture;

/// Result of a scatter event.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Per-channel color multiplier for the scattered path
    pub attenuation: Color,
    /// The continuation ray
    pub scattered: Ray,
}

/// How light interacts with whatever was hit.
///
/// Materials are shared between primitives as `Arc<Material>`.
#[derive(Debug, Clone)]
pub enum Material {
    /// Lambertian reflector.
    Diffuse { texture: Arc<Texture> },
    /// Mirror reflection perturbed by `fuzz` (0 = perfect mirror).
    Metal { albedo: Color, fuzz: f32 },
    /// Dielectric that refracts or reflects per Snell's law and Schlick.
    Glass { ior: f32 },
    /// Phase function for participating media: scatters uniformly.
    Isotropic { texture: Arc<Texture> },
    /// Emitter; absorbs everything that hits it.
    DiffuseLight { texture: Arc<Texture> },
}

impl Material {
    pub fn diffuse(albedo: Color) -> Self {
        Material::Diffuse {
            texture: Arc::new(Texture::Solid(albedo)),
        }
    }

    pub fn diffuse_textured(texture: Arc<Texture>) -> Self {
        Material::Diffuse { texture }
    }

    /// Metal with `fuzz` clamped to `[0, 1]`.
    pub fn metal(albedo: Color, fuzz: f32) -> Self {
        Material::Metal {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    /// Glass with the given index of refraction (1.5 for window glass).
    pub fn glass(ior: f32) -> Self {
        Material::Glass { ior }
    }

    pub fn isotropic(albedo: Color) -> Self {
        Material::Isotropic {
            texture: Arc::new(Texture::Solid(albedo)),
        }
    }

    pub fn isotropic_textured(texture: Arc<Texture>) -> Self {
        Material::Isotropic { texture }
    }

    pub fn light(emit: Color) -> Self {
        Material::DiffuseLight {
            texture: Arc::new(Texture::Solid(emit)),
        }
    }

    /// Scatter an incoming ray.
    ///
    /// Returns `None` when the ray is absorbed. The scattered ray starts at
    /// the hit point and keeps the incoming ray's time.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match self {
            Material::Diffuse { texture } => {
                let mut direction = rec.normal + random_unit_vector(rng);

                // Catch degenerate scatter direction
                if near_zero(direction) {
                    direction = rec.normal;
                }

                Some(ScatterResult {
                    attenuation: texture.value(rec.u, rec.v, rec.p),
                    scattered: Ray::new(rec.p, direction, ray_in.time()),
                })
            }
            Material::Metal { albedo, fuzz } => {
                let reflected = reflect(ray_in.direction().normalize(), rec.normal);
                let direction = reflected + *fuzz * random_in_unit_sphere(rng);
                Some(ScatterResult {
                    attenuation: *albedo,
                    scattered: Ray::new(rec.p, direction, ray_in.time()),
                })
            }
            Material::Glass { ior } => {
                let refraction_ratio = if rec.front_face { 1.0 / ior } else { *ior };

                let unit_direction = ray_in.direction().normalize();
                let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);

                let direction = if cannot_refract(cos_theta, refraction_ratio)
                    || reflectance(cos_theta, refraction_ratio) > gen_f32(rng)
                {
                    reflect(unit_direction, rec.normal)
                } else {
                    refract(unit_direction, rec.normal, refraction_ratio)
                };

                Some(ScatterResult {
                    attenuation: Color::ONE,
                    scattered: Ray::new(rec.p, direction, ray_in.time()),
                })
            }
            Material::Isotropic { texture } => Some(ScatterResult {
                attenuation: texture.value(rec.u, rec.v, rec.p),
                scattered: Ray::new(rec.p, random_in_unit_sphere(rng), ray_in.time()),
            }),
            Material::DiffuseLight { .. } => None,
        }
    }

    /// Light emitted at a surface point. Black for everything but lights.
    pub fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        match self {
            Material::DiffuseLight { texture } => texture.value(u, v, p),
            _ => Color::ZERO,
        }
    }
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with relative index `etai_over_etat`.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Total internal reflection test from Snell's law.
#[inline]
fn cannot_refract(cos_theta: f32, refraction_ratio: f32) -> bool {
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    refraction_ratio * sin_theta > 1.0
}

/// Schlick's approximation for reflectance.
#[inline]
fn reflectance(cosine: f32, ratio: f32) -> f32 {
    let r0 = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

#[inline]
fn near_zero(v: Vec3) -> bool {
    const S: f32 = 1e-8;
    v.abs().cmplt(Vec3::splat(S)).all()
}
