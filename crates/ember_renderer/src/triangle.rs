//! Triangle primitives: single triangles and indexed triangle meshes.
//!
//! Both use the Möller-Trumbore algorithm for ray-triangle intersection.

use std::sync::Arc;

use ember_core::Mesh;
use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

use crate::error::SceneResult;
use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;

/// Determinant below which a ray counts as parallel to the triangle.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Padding for boxes of triangles lying in an axis plane.
const BOX_PAD: f32 = 0.0001;

/// Barycentric hit on a triangle: distance and the weights of `v1` and `v2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    pub t: f32,
    pub u: f32,
    pub v: f32,
}

/// Möller-Trumbore ray-triangle intersection.
///
/// Returns the hit when it lies inside the triangle and `t` lies in `ray_t`
/// (bounds inclusive).
#[inline]
pub fn intersect_triangle(
    ray: &Ray,
    ray_t: Interval,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<TriangleHit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction().cross(edge2);
    let a = edge1.dot(h);
    if a.abs() < PARALLEL_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin() - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction().dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if !ray_t.contains(t) {
        return None;
    }

    Some(TriangleHit { t, u, v })
}

fn triangle_box(v0: Vec3, v1: Vec3, v2: Vec3) -> Aabb {
    Aabb::new(v0.min(v1).min(v2), v0.max(v1).max(v2)).pad(BOX_PAD)
}

/// A single triangle primitive.
#[derive(Debug, Clone)]
pub struct Triangle {
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Unit geometric normal, `(v1 - v0) x (v2 - v0)`
    normal: Vec3,
    material: Arc<Material>,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<Material>) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        Self {
            v0,
            v1,
            v2,
            normal,
            material,
        }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }
}

impl Hittable for Triangle {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let hit = intersect_triangle(ray, ray_t, self.v0, self.v1, self.v2)?;
        Some(HitRecord::new(ray, hit.t, self.normal, &self.material, hit.u, hit.v))
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(triangle_box(self.v0, self.v1, self.v2))
    }
}

/// Indexed triangle mesh with a single material.
///
/// Faces are scanned linearly; put large meshes in a scene BVH as a whole or
/// split them with [`TriangleMesh::into_triangles`].
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    vertices: Arc<[Vec3]>,
    faces: Vec<[u32; 3]>,
    bbox: Option<Aabb>,
    material: Arc<Material>,
}

impl TriangleMesh {
    /// Build from a validated mesh. Out-of-range indices are rejected here so
    /// intersection never has to check them.
    pub fn new(mesh: &Mesh, material: Arc<Material>) -> SceneResult<Self> {
        mesh.validate()?;

        let degenerate = mesh
            .faces()
            .filter(|f| {
                let [a, b, c] = f.map(|i| mesh.positions[i as usize]);
                (b - a).cross(c - a).length_squared() == 0.0
            })
            .count();
        if degenerate > 0 {
            log::warn!(
                "Mesh has {} zero-area faces out of {}; they will never be hit",
                degenerate,
                mesh.triangle_count()
            );
        }

        let bbox = mesh.bounds().map(|b| b.pad(BOX_PAD));
        Ok(Self {
            vertices: mesh.positions.clone().into(),
            faces: mesh.faces().collect(),
            bbox,
            material,
        })
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    fn corners(&self, face: [u32; 3]) -> (Vec3, Vec3, Vec3) {
        (
            self.vertices[face[0] as usize],
            self.vertices[face[1] as usize],
            self.vertices[face[2] as usize],
        )
    }

    /// Split into standalone triangles, e.g. to build a BVH over the faces.
    pub fn into_triangles(self) -> Vec<Triangle> {
        self.faces
            .iter()
            .map(|&face| {
                let (v0, v1, v2) = self.corners(face);
                Triangle::new(v0, v1, v2, self.material.clone())
            })
            .collect()
    }
}

impl Hittable for TriangleMesh {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        if !self.bbox?.hit(ray, ray_t) {
            return None;
        }

        let mut closest: Option<(TriangleHit, [u32; 3])> = None;
        for &face in &self.faces {
            let window = ray_t.with_max(closest.map_or(ray_t.max, |(hit, _)| hit.t));
            let (v0, v1, v2) = self.corners(face);
            if let Some(hit) = intersect_triangle(ray, window, v0, v1, v2) {
                if closest.map_or(true, |(best, _)| hit.t < best.t) {
                    closest = Some((hit, face));
                }
            }
        }

        let (hit, face) = closest?;
        let (v0, v1, v2) = self.corners(face);
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        Some(HitRecord::new(ray, hit.t, normal, &self.material, hit.u, hit.v))
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        self.bbox
    }
}
