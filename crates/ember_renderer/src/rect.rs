//! Axis-aligned rectangles and the boxes built from them.

use std::sync::Arc;

use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::material::Material;

/// Thickness given to planar boxes so they never degenerate.
const PLANE_PAD: f32 = 0.0001;

/// The plane a [`Rect`] lies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectPlane {
    /// Spans x and y at constant z; outward normal +Z.
    Xy,
    /// Spans x and z at constant y; outward normal +Y.
    Xz,
    /// Spans y and z at constant x; outward normal +X.
    Yz,
}

impl RectPlane {
    /// Axis indices `(a, b, k)`: the two spanned axes, then the constant one.
    #[inline]
    fn axes(self) -> (usize, usize, usize) {
        match self {
            RectPlane::Xy => (0, 1, 2),
            RectPlane::Xz => (0, 2, 1),
            RectPlane::Yz => (1, 2, 0),
        }
    }

    fn normal(self) -> Vec3 {
        match self {
            RectPlane::Xy => Vec3::Z,
            RectPlane::Xz => Vec3::Y,
            RectPlane::Yz => Vec3::X,
        }
    }
}

/// Rectangle `[a0, a1] x [b0, b1]` on the plane `k` along the constant axis.
#[derive(Debug, Clone)]
pub struct Rect {
    plane: RectPlane,
    a0: f32,
    a1: f32,
    b0: f32,
    b1: f32,
    k: f32,
    material: Arc<Material>,
}

impl Rect {
    pub fn new(
        plane: RectPlane,
        (a0, a1): (f32, f32),
        (b0, b1): (f32, f32),
        k: f32,
        material: Arc<Material>,
    ) -> Self {
        Self {
            plane,
            a0,
            a1,
            b0,
            b1,
            k,
            material,
        }
    }

    /// Rectangle `[x0, x1] x [y0, y1]` at `z = k`.
    pub fn xy(x: (f32, f32), y: (f32, f32), k: f32, material: Arc<Material>) -> Self {
        Self::new(RectPlane::Xy, x, y, k, material)
    }

    /// Rectangle `[x0, x1] x [z0, z1]` at `y = k`.
    pub fn xz(x: (f32, f32), z: (f32, f32), k: f32, material: Arc<Material>) -> Self {
        Self::new(RectPlane::Xz, x, z, k, material)
    }

    /// Rectangle `[y0, y1] x [z0, z1]` at `x = k`.
    pub fn yz(y: (f32, f32), z: (f32, f32), k: f32, material: Arc<Material>) -> Self {
        Self::new(RectPlane::Yz, y, z, k, material)
    }

    fn point(&self, a: f32, b: f32, k: f32) -> Vec3 {
        let (ai, bi, ki) = self.plane.axes();
        let mut p = Vec3::ZERO;
        p[ai] = a;
        p[bi] = b;
        p[ki] = k;
        p
    }
}

impl Hittable for Rect {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let (ai, bi, ki) = self.plane.axes();
        let origin = ray.origin();
        let direction = ray.direction();

        // Parallel rays give an infinite or NaN t and fall out here
        let t = (self.k - origin[ki]) / direction[ki];
        if !ray_t.contains(t) {
            return None;
        }

        let a = origin[ai] + t * direction[ai];
        let b = origin[bi] + t * direction[bi];
        if a < self.a0 || a > self.a1 || b < self.b0 || b > self.b1 {
            return None;
        }

        let u = (a - self.a0) / (self.a1 - self.a0);
        let v = (b - self.b0) / (self.b1 - self.b0);
        Some(HitRecord::new(ray, t, self.plane.normal(), &self.material, u, v))
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(Aabb::from_points(
            self.point(self.a0, self.b0, self.k - PLANE_PAD),
            self.point(self.a1, self.b1, self.k + PLANE_PAD),
        ))
    }
}

/// Axis-aligned box made of six rectangles sharing one material.
#[derive(Debug, Clone)]
pub struct Cube {
    min: Vec3,
    max: Vec3,
    sides: HittableList,
}

impl Cube {
    /// Box spanning the corners `p0` (minimum) and `p1` (maximum).
    pub fn new(p0: Vec3, p1: Vec3, material: Arc<Material>) -> Self {
        let mut sides = HittableList::new();

        sides.add(Rect::xy((p0.x, p1.x), (p0.y, p1.y), p1.z, material.clone()));
        sides.add(Rect::xy((p0.x, p1.x), (p0.y, p1.y), p0.z, material.clone()));

        sides.add(Rect::xz((p0.x, p1.x), (p0.z, p1.z), p1.y, material.clone()));
        sides.add(Rect::xz((p0.x, p1.x), (p0.z, p1.z), p0.y, material.clone()));

        sides.add(Rect::yz((p0.y, p1.y), (p0.z, p1.z), p1.x, material.clone()));
        sides.add(Rect::yz((p0.y, p1.y), (p0.z, p1.z), p0.x, material));

        Self {
            min: p0,
            max: p1,
            sides,
        }
    }
}

impl Hittable for Cube {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        self.sides.hit(ray, ray_t, rng)
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(Aabb::new(self.min, self.max))
    }
}
