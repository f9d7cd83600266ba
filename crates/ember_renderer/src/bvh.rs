//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Each node splits its objects at the median along a randomly chosen axis,
//! ordered by the minimum corner of their boxes. Leaves are the objects
//! themselves; a node over a single object points both children at it.

use std::sync::Arc;

use ember_math::{Aabb, Interval, Ray};
use rand::{Rng, RngCore};

use crate::error::{SceneError, SceneResult};
use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::object::Object;

/// BVH node - either a branch with two children or an empty tree.
#[derive(Debug, Clone)]
pub enum BvhNode {
    /// Internal node; children are primitives or further nodes.
    Branch {
        left: Arc<Object>,
        right: Arc<Object>,
        bbox: Aabb,
    },
    /// Tree built from no objects. Never hit.
    Empty,
}

type Entry = (Arc<Object>, Aabb);

impl BvhNode {
    /// Build a BVH over `objects` for the shutter interval `[time0, time1]`.
    ///
    /// Fails if any object has no bounding box.
    pub fn new(
        objects: &[Arc<Object>],
        time0: f32,
        time1: f32,
        rng: &mut dyn RngCore,
    ) -> SceneResult<Self> {
        let mut entries = objects
            .iter()
            .enumerate()
            .map(|(index, object)| {
                object
                    .bounding_box(time0, time1)
                    .map(|bbox| (object.clone(), bbox))
                    .ok_or(SceneError::MissingBoundingBox { index })
            })
            .collect::<SceneResult<Vec<Entry>>>()?;

        if entries.is_empty() {
            return Ok(BvhNode::Empty);
        }

        let (node, _) = Self::build(&mut entries, rng);
        log::debug!(
            "Built BVH over {} objects, depth {}",
            entries.len(),
            node.depth()
        );
        Ok(node)
    }

    /// Build a BVH over the members of a list.
    pub fn from_list(
        list: &HittableList,
        time0: f32,
        time1: f32,
        rng: &mut dyn RngCore,
    ) -> SceneResult<Self> {
        Self::new(list.objects(), time0, time1, rng)
    }

    /// Returns the node together with its box.
    fn build(entries: &mut [Entry], rng: &mut dyn RngCore) -> (Self, Aabb) {
        let axis = rng.gen_range(0..3);
        let key = |entry: &Entry| entry.1.min[axis];

        let (left, right) = match entries.len() {
            1 => (entries[0].clone(), entries[0].clone()),
            2 => {
                if key(&entries[0]) <= key(&entries[1]) {
                    (entries[0].clone(), entries[1].clone())
                } else {
                    (entries[1].clone(), entries[0].clone())
                }
            }
            n => {
                entries.sort_by(|a, b| key(a).total_cmp(&key(b)));
                let (lo, hi) = entries.split_at_mut(n / 2);
                let (left, left_box) = Self::build(lo, rng);
                let (right, right_box) = Self::build(hi, rng);
                (
                    (Arc::new(Object::Bvh(left)), left_box),
                    (Arc::new(Object::Bvh(right)), right_box),
                )
            }
        };

        let bbox = Aabb::surrounding(&left.1, &right.1);
        let node = BvhNode::Branch {
            left: left.0,
            right: right.0,
            bbox,
        };
        (node, bbox)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, BvhNode::Empty)
    }

    /// Number of node levels down to the deepest primitive.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Branch { left, right, .. } => {
                let child_depth = |child: &Object| match child {
                    Object::Bvh(node) => node.depth(),
                    _ => 0,
                };
                1 + child_depth(left).max(child_depth(right))
            }
        }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        match self {
            BvhNode::Empty => None,
            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.hit(ray, ray_t, rng);

                // Only check right up to closest hit
                let right_max = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
                let hit_right = right.hit(ray, ray_t.with_max(right_max), rng);

                match (hit_left, hit_right) {
                    (Some(l), Some(r)) if r.t < l.t => Some(r),
                    (Some(l), _) => Some(l),
                    (None, r) => r,
                }
            }
        }
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        match self {
            BvhNode::Empty => None,
            BvhNode::Branch { bbox, .. } => Some(*bbox),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::{gen_range, random_unit_vector, random_vec3};
    use crate::{Material, MovingSphere, Sphere, Triangle};
    use ember_math::Vec3;
    use proptest::prelude::{prop_assert, prop_assert_eq, ProptestConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use test_strategy::proptest;

    fn gray() -> Arc<Material> {
        Arc::new(Material::diffuse(Vec3::splat(0.5)))
    }

    fn forward() -> Interval {
        Interval::new(0.001, f32::INFINITY)
    }

    #[test]
    fn test_bvh_empty() {
        let mut rng = StdRng::seed_from_u64(0);
        let bvh = BvhNode::new(&[], 0.0, 1.0, &mut rng).unwrap();

        assert!(bvh.is_empty());
        assert!(bvh.bounding_box(0.0, 1.0).is_none());
        let ray = Ray::new(Vec3::ZERO, Vec3::Z, 0.0);
        assert!(bvh.hit(&ray, forward(), &mut rng).is_none());
    }

    #[test]
    fn test_bvh_rejects_unbounded_object() {
        let mut rng = StdRng::seed_from_u64(0);
        let objects = vec![
            Arc::new(Object::from(Sphere::new(Vec3::ZERO, 1.0, gray()))),
            Arc::new(Object::from(HittableList::new())),
        ];

        match BvhNode::new(&objects, 0.0, 1.0, &mut rng) {
            Err(SceneError::MissingBoundingBox { index }) => assert_eq!(index, 1),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_bvh_single_sphere() {
        let mut rng = StdRng::seed_from_u64(0);
        let objects = vec![Arc::new(Object::from(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            gray(),
        )))];
        let bvh = BvhNode::new(&objects, 0.0, 1.0, &mut rng).unwrap();

        match &bvh {
            BvhNode::Branch { left, right, .. } => assert!(Arc::ptr_eq(left, right)),
            BvhNode::Empty => panic!("expected a branch"),
        }

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z, 0.0);
        let rec = bvh.hit(&ray, forward(), &mut rng).unwrap();
        assert!((rec.t - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut list = HittableList::new();
        for i in 0..10 {
            list.add(Sphere::new(Vec3::new(i as f32, 0.0, -5.0), 0.5, gray()));
        }
        let bvh = BvhNode::from_list(&list, 0.0, 1.0, &mut rng).unwrap();

        // Hit point should be near z = -4.5 (sphere at z=-5, radius 0.5)
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::NEG_Z, 0.0);
        let rec = bvh.hit(&ray, forward(), &mut rng).unwrap();
        assert!((rec.p.z - (-4.5)).abs() < 0.01);

        let bbox = bvh.bounding_box(0.0, 1.0).unwrap();
        assert_eq!(bbox.min, Vec3::new(-0.5, -0.5, -5.5));
        assert_eq!(bbox.max, Vec3::new(9.5, 0.5, -4.5));

        // 10 -> 5 -> 3 -> 2 objects per level
        assert_eq!(bvh.depth(), 4);
    }

    #[test]
    fn test_bvh_tie_keeps_earlier_object() {
        let first = Arc::new(Material::diffuse(Vec3::X));
        let mut list = HittableList::new();
        list.add(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, first.clone()));
        for _ in 0..2 {
            list.add(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, gray()));
        }

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z, 0.0);
        for seed in 0..8 {
            let mut rng = StdRng::seed_from_u64(seed);
            let bvh = BvhNode::from_list(&list, 0.0, 1.0, &mut rng).unwrap();
            let rec = bvh.hit(&ray, forward(), &mut rng).unwrap();

            assert!((rec.t - 4.0).abs() < 1e-5);
            assert!(std::ptr::eq(rec.material, &*first), "seed {seed}");
        }
    }

    fn random_scene(count: usize, rng: &mut StdRng) -> HittableList {
        let mut list = HittableList::new();
        for i in 0..count {
            let center = random_vec3(rng, -10.0, 10.0);
            let radius = gen_range(rng, 0.1, 1.0);
            match i % 3 {
                0 => list.add(Sphere::new(center, radius, gray())),
                1 => list.add(MovingSphere::new(
                    center,
                    center + random_vec3(rng, -1.0, 1.0),
                    0.0,
                    1.0,
                    radius,
                    gray(),
                )),
                _ => list.add(Triangle::new(
                    center,
                    center + random_vec3(rng, -1.0, 1.0),
                    center + random_vec3(rng, -1.0, 1.0),
                    gray(),
                )),
            }
        }
        list
    }

    #[proptest(ProptestConfig { cases: 32, ..ProptestConfig::default() })]
    fn bvh_nearest_hit_matches_linear_scan(
        #[strategy(1usize..1000)] count: usize,
        seed: u64,
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let list = random_scene(count, &mut rng);
        let bvh = BvhNode::from_list(&list, 0.0, 1.0, &mut rng).unwrap();

        for _ in 0..64 {
            let origin = random_vec3(&mut rng, -15.0, 15.0);
            let ray = Ray::new(origin, random_unit_vector(&mut rng), gen_range(&mut rng, 0.0, 1.0));

            let expected = list.hit(&ray, forward(), &mut rng);
            let actual = bvh.hit(&ray, forward(), &mut rng);

            prop_assert_eq!(expected.is_some(), actual.is_some());
            if let (Some(e), Some(a)) = (expected, actual) {
                prop_assert!(
                    (e.t - a.t).abs() <= 1e-4 * e.t.max(1.0),
                    "linear t={} bvh t={}",
                    e.t,
                    a.t
                );
                prop_assert!(std::ptr::eq(e.material, a.material));
            }
        }
    }
}
