use crate::{Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// Stored as its two extreme corners with `min <= max` on every axis.
/// Zero-thickness boxes are allowed; planar primitives pad themselves
/// before handing a box to the BVH.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create an AABB from its minimum and maximum corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from two arbitrary corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            min: box0.min.min(box1.min),
            max: box0.max.max(box1.max),
        }
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Slab method: each axis clips the running `[t_enter, t_exit]` window,
    /// bailing out as soon as the window closes.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let adinv = 1.0 / r.direction[axis];
            let mut t0 = (self.min[axis] - r.origin[axis]) * adinv;
            let mut t1 = (self.max[axis] - r.origin[axis]) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            // An infinite entry means a parallel ray outside this slab
            if ray_t.max < ray_t.min || ray_t.min == f32::INFINITY {
                return false;
            }
        }
        true
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    ///
    /// X only wins when strictly longest; between Y and Z ties go to Y.
    pub fn longest_axis(&self) -> usize {
        let extent = self.extent();

        if extent.x > extent.y && extent.x > extent.z {
            0
        } else if extent.y >= extent.z {
            1
        } else {
            2
        }
    }

    /// Surface area of the box.
    pub fn area(&self) -> f32 {
        let e = self.extent();
        2.0 * (e.x * e.y + e.y * e.z + e.x * e.z)
    }

    /// Side lengths along each axis.
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Translate (move) the AABB by an offset vector.
    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb::new(self.min + offset, self.max + offset)
    }

    /// Grow the box by `delta` on both sides of every axis thinner than `delta`.
    pub fn pad(&self, delta: f32) -> Aabb {
        let thin = self.extent().cmplt(Vec3::splat(delta));
        let pad = Vec3::select(thin, Vec3::splat(delta), Vec3::ZERO);
        Aabb::new(self.min - pad, self.max + pad)
    }

    /// The 8 corners of the box.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Smallest box containing every point, `None` for an empty iterator.
    pub fn enclosing(points: impl IntoIterator<Item = Vec3>) -> Option<Aabb> {
        points.into_iter().fold(None, |acc, p| match acc {
            None => Some(Aabb::new(p, p)),
            Some(b) => Some(Aabb::new(b.min.min(p), b.max.max(p))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn test_aabb_from_points_orders_corners() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 5.0), Vec3::new(0.0, 10.0, -5.0));

        assert_eq!(aabb.min, Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(aabb.max, Vec3::new(10.0, 10.0, 5.0));
    }

    #[test]
    fn test_aabb_surrounding_self_is_identity() {
        let a = Aabb::new(Vec3::new(-1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(Aabb::surrounding(&a, &a), a);
    }

    #[test]
    fn test_aabb_surrounding_is_componentwise() {
        let a = Aabb::new(Vec3::new(0.0, 3.0, -2.0), Vec3::new(5.0, 4.0, 1.0));
        let b = Aabb::new(Vec3::new(1.0, -1.0, 0.0), Vec3::new(2.0, 10.0, 7.0));
        let s = Aabb::surrounding(&a, &b);

        assert_eq!(s.min, Vec3::new(0.0, -1.0, -2.0));
        assert_eq!(s.max, Vec3::new(5.0, 10.0, 7.0));
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = unit_box();

        // Ray pointing at center
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Ray pointing away
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Ray missing the box
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_aabb_hit_negative_direction() {
        let aabb = unit_box();
        let ray = Ray::new(Vec3::new(5.0, 0.5, 0.5), Vec3::new(-2.0, 0.0, 0.0), 0.0);
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_aabb_hit_respects_window() {
        let aabb = unit_box();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);

        // Box spans t in [4, 6]
        assert!(!aabb.hit(&ray, Interval::new(0.0, 3.5)));
        assert!(!aabb.hit(&ray, Interval::new(6.5, 10.0)));
        assert!(aabb.hit(&ray, Interval::new(5.0, 5.5)));
    }

    #[test]
    fn test_aabb_hit_touching_edge() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0));
        let ray = Ray::new(Vec3::new(-1.0, 1.0, 1.0), Vec3::new(1.0, -1.0, -1.0), 0.0);

        // Enters and leaves at t=1
        assert!(aabb.hit(&ray, Interval::new(0.001, f32::INFINITY)));
    }

    #[test]
    fn test_aabb_parallel_ray_outside_slab() {
        let aabb = unit_box();
        let ray = Ray::new(Vec3::new(-5.0, -3.0, 0.0), Vec3::X, 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.001, f32::INFINITY)));

        let ray = Ray::new(Vec3::new(-5.0, 0.5, 0.5), Vec3::X, 0.0);
        assert!(aabb.hit(&ray, Interval::new(0.001, f32::INFINITY)));
    }

    #[test]
    fn test_aabb_longest_axis() {
        let aabb_x = Aabb::from_points(Vec3::ZERO, Vec3::new(10.0, 1.0, 1.0));
        assert_eq!(aabb_x.longest_axis(), 0);

        let aabb_y = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 10.0, 1.0));
        assert_eq!(aabb_y.longest_axis(), 1);

        let aabb_z = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 1.0, 10.0));
        assert_eq!(aabb_z.longest_axis(), 2);
    }

    #[test]
    fn test_aabb_longest_axis_ties() {
        let cube = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        assert_eq!(cube.longest_axis(), 1);

        let yz = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 2.0, 2.0));
        assert_eq!(yz.longest_axis(), 1);

        let xy = Aabb::from_points(Vec3::ZERO, Vec3::new(2.0, 2.0, 1.0));
        assert_eq!(xy.longest_axis(), 1);
    }

    #[test]
    fn test_aabb_area() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(aabb.area(), 22.0);
    }

    #[test]
    fn test_aabb_translate() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let translated = aabb.translate(Vec3::new(5.0, 0.0, 0.0));

        assert_eq!(translated.min, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(translated.max, Vec3::new(6.0, 1.0, 1.0));
    }

    #[test]
    fn test_aabb_pad_only_thin_axes() {
        let flat = Aabb::new(Vec3::new(0.0, 0.0, 2.0), Vec3::new(1.0, 1.0, 2.0));
        let padded = flat.pad(0.0001);

        assert_eq!(padded.min.x, 0.0);
        assert_eq!(padded.max.y, 1.0);
        assert!(padded.min.z < 2.0 && padded.max.z > 2.0);
    }

    #[test]
    fn test_aabb_enclosing() {
        assert!(Aabb::enclosing(std::iter::empty()).is_none());

        let b = Aabb::enclosing(unit_box().corners()).unwrap();
        assert_eq!(b, unit_box());
    }
}
