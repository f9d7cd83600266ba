//! The closed set of scene objects.
//!
//! Scenes, BVH nodes and decorators hold `Object`s rather than trait objects
//! so traversal dispatches through a `match`.

use ember_math::{Aabb, Interval, Ray};
use rand::RngCore;

use crate::{
    BvhNode, ConstantMedium, Cube, HitRecord, Hittable, HittableList, MovingSphere, Rect, Rotate,
    Sphere, Translate, Triangle, TriangleMesh,
};

/// Any intersectable element of a scene.
#[derive(Debug, Clone)]
pub enum Object {
    Sphere(Sphere),
    MovingSphere(MovingSphere),
    Rect(Rect),
    Cube(Cube),
    Triangle(Triangle),
    Mesh(TriangleMesh),
    Bvh(BvhNode),
    List(HittableList),
    Translate(Translate),
    Rotate(Rotate),
    ConstantMedium(ConstantMedium),
}

macro_rules! dispatch {
    ($self:ident, $inner:ident => $body:expr) => {
        match $self {
            Object::Sphere($inner) => $body,
            Object::MovingSphere($inner) => $body,
            Object::Rect($inner) => $body,
            Object::Cube($inner) => $body,
            Object::Triangle($inner) => $body,
            Object::Mesh($inner) => $body,
            Object::Bvh($inner) => $body,
            Object::List($inner) => $body,
            Object::Translate($inner) => $body,
            Object::Rotate($inner) => $body,
            Object::ConstantMedium($inner) => $body,
        }
    };
}

impl Hittable for Object {
    #[inline]
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        dispatch!(self, inner => inner.hit(ray, ray_t, rng))
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        dispatch!(self, inner => inner.bounding_box(time0, time1))
    }
}

macro_rules! impl_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Object {
                fn from(value: $ty) -> Self {
                    Object::$variant(value)
                }
            }
        )*
    };
}

impl_from!(
    Sphere(Sphere),
    MovingSphere(MovingSphere),
    Rect(Rect),
    Cube(Cube),
    Triangle(Triangle),
    Mesh(TriangleMesh),
    Bvh(BvhNode),
    List(HittableList),
    Translate(Translate),
    Rotate(Rotate),
    ConstantMedium(ConstantMedium),
);
