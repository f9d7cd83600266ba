//! Instancing decorators: translation and rotation about a coordinate axis.
//!
//! Both move the ray into the wrapped object's frame, intersect there, and
//! move the hit back out. The face orientation decided in object space is
//! kept as is; rigid motions do not change which side the ray came from.

use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable};
use crate::object::Object;

/// Moves the wrapped object by `offset`.
#[derive(Debug, Clone)]
pub struct Translate {
    object: Box<Object>,
    offset: Vec3,
}

impl Translate {
    pub fn new(object: impl Into<Object>, offset: Vec3) -> Self {
        Self {
            object: Box::new(object.into()),
            offset,
        }
    }
}

impl Hittable for Translate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let local = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());
        let mut rec = self.object.hit(&local, ray_t, rng)?;
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.object
            .bounding_box(time0, time1)
            .map(|b| b.translate(self.offset))
    }
}

/// Coordinate axis for [`Rotate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// The rotated plane `(a, b)`, ordered so positive angles turn `a` toward `b`.
    #[inline]
    fn plane(self) -> (usize, usize) {
        match self {
            Axis::X => (1, 2),
            Axis::Y => (2, 0),
            Axis::Z => (0, 1),
        }
    }
}

/// Rotates the wrapped object about a coordinate axis through the origin.
#[derive(Debug, Clone)]
pub struct Rotate {
    object: Box<Object>,
    axis: Axis,
    sin_theta: f32,
    cos_theta: f32,
    bbox: Option<Aabb>,
}

impl Rotate {
    /// Rotate by `degrees`, counter-clockwise looking down the axis.
    ///
    /// The box is computed once over the shutter interval `[0, 1]`.
    pub fn new(object: impl Into<Object>, axis: Axis, degrees: f32) -> Self {
        let object = Box::new(object.into());
        let radians = degrees.to_radians();
        let mut rotate = Self {
            object,
            axis,
            sin_theta: radians.sin(),
            cos_theta: radians.cos(),
            bbox: None,
        };

        rotate.bbox = rotate
            .object
            .bounding_box(0.0, 1.0)
            .and_then(|b| Aabb::enclosing(b.corners().map(|c| rotate.to_world(c))));
        rotate
    }

    pub fn x(object: impl Into<Object>, degrees: f32) -> Self {
        Self::new(object, Axis::X, degrees)
    }

    pub fn y(object: impl Into<Object>, degrees: f32) -> Self {
        Self::new(object, Axis::Y, degrees)
    }

    pub fn z(object: impl Into<Object>, degrees: f32) -> Self {
        Self::new(object, Axis::Z, degrees)
    }

    /// Object space to world space.
    fn to_world(&self, v: Vec3) -> Vec3 {
        let (a, b) = self.axis.plane();
        let mut out = v;
        out[a] = self.cos_theta * v[a] - self.sin_theta * v[b];
        out[b] = self.sin_theta * v[a] + self.cos_theta * v[b];
        out
    }

    /// World space to object space.
    fn to_object(&self, v: Vec3) -> Vec3 {
        let (a, b) = self.axis.plane();
        let mut out = v;
        out[a] = self.cos_theta * v[a] + self.sin_theta * v[b];
        out[b] = -self.sin_theta * v[a] + self.cos_theta * v[b];
        out
    }
}

impl Hittable for Rotate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let local = Ray::new(
            self.to_object(ray.origin()),
            self.to_object(ray.direction()),
            ray.time(),
        );

        let mut rec = self.object.hit(&local, ray_t, rng)?;
        rec.p = self.to_world(rec.p);
        rec.normal = self.to_world(rec.normal);
        Some(rec)
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        self.bbox
    }
}
