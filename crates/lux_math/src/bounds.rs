use crate::{Ray, Vec3};

/// Axis-aligned bounding box used by the BVH.
///
/// A box is defined by its two extreme corners. `Bounds3::EMPTY` stores
/// +inf/-inf sentinels so that the union of an empty box with any other box
/// yields that box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds3 {
    pub p_min: Vec3,
    pub p_max: Vec3,
}

impl Default for Bounds3 {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Bounds3 {
    /// A box that contains nothing.
    pub const EMPTY: Bounds3 = Bounds3 {
        p_min: Vec3::splat(f32::INFINITY),
        p_max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Create a box from two arbitrary corner points.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            p_min: a.min(b),
            p_max: a.max(b),
        }
    }

    /// A degenerate box containing a single point.
    pub fn from_point(p: Vec3) -> Self {
        Self { p_min: p, p_max: p }
    }

    /// Returns true if the box contains no points.
    pub fn is_empty(&self) -> bool {
        self.p_min.x > self.p_max.x || self.p_min.y > self.p_max.y || self.p_min.z > self.p_max.z
    }

    /// Smallest box enclosing both boxes.
    pub fn union(&self, other: &Bounds3) -> Bounds3 {
        Bounds3 {
            p_min: self.p_min.min(other.p_min),
            p_max: self.p_max.max(other.p_max),
        }
    }

    /// Smallest box enclosing this box and a point.
    pub fn union_point(&self, p: Vec3) -> Bounds3 {
        Bounds3 {
            p_min: self.p_min.min(p),
            p_max: self.p_max.max(p),
        }
    }

    /// Overlap of two boxes; empty if they do not overlap.
    pub fn intersect(&self, other: &Bounds3) -> Bounds3 {
        let b = Bounds3 {
            p_min: self.p_min.max(other.p_min),
            p_max: self.p_max.min(other.p_max),
        };
        if b.is_empty() {
            Bounds3::EMPTY
        } else {
            b
        }
    }

    pub fn overlaps(&self, other: &Bounds3) -> bool {
        !self.intersect(other).is_empty()
    }

    /// Returns true if `p` lies inside the box (boundary included).
    pub fn inside(&self, p: Vec3) -> bool {
        p.cmpge(self.p_min).all() && p.cmple(self.p_max).all()
    }

    pub fn diagonal(&self) -> Vec3 {
        self.p_max - self.p_min
    }

    /// Index (0=X, 1=Y, 2=Z) of the axis with the largest extent.
    pub fn max_extent(&self) -> usize {
        let d = self.diagonal();
        if d.x > d.y && d.x > d.z {
            0
        } else if d.y > d.z {
            1
        } else {
            2
        }
    }

    pub fn centroid(&self) -> Vec3 {
        0.5 * self.p_min + 0.5 * self.p_max
    }

    /// Surface area of the box. Empty boxes have zero area.
    pub fn surface_area(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let d = self.diagonal();
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }

    /// Position of `p` relative to the box corners, (0,0,0) at `p_min` and
    /// (1,1,1) at `p_max`. Flat axes map to 0.
    pub fn offset(&self, p: Vec3) -> Vec3 {
        let mut o = p - self.p_min;
        let d = self.diagonal();
        for axis in 0..3 {
            if d[axis] > 0.0 {
                o[axis] /= d[axis];
            } else {
                o[axis] = 0.0;
            }
        }
        o
    }

    /// Slab test against a ray.
    ///
    /// `inv_dir` and `dir_is_neg` are precomputed once per ray; a negative
    /// direction swaps the near and far planes of that axis. The hit interval
    /// is clipped to the ray's `t_range`. Touching intervals count as hits so
    /// flat boxes around axis-aligned geometry are not missed.
    #[inline]
    pub fn intersect_p(&self, ray: &Ray, inv_dir: Vec3, dir_is_neg: [bool; 3]) -> bool {
        let t_lo = (self.p_min - ray.origin) * inv_dir;
        let t_hi = (self.p_max - ray.origin) * inv_dir;

        let mut t_enter = ray.t_range.min;
        let mut t_exit = ray.t_range.max;
        for axis in 0..3 {
            let (near, far) = if dir_is_neg[axis] {
                (t_hi[axis], t_lo[axis])
            } else {
                (t_lo[axis], t_hi[axis])
            };
            // f32::max/min discard the NaN produced by 0 * inf.
            t_enter = t_enter.max(near);
            t_exit = t_exit.min(far);
        }

        t_enter <= t_exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Bounds3 {
        Bounds3::new(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    fn hits(b: &Bounds3, ray: &Ray) -> bool {
        b.intersect_p(ray, ray.direction_inv, ray.dir_is_neg())
    }

    #[test]
    fn test_bounds_new_sorts_corners() {
        let b = Bounds3::new(Vec3::new(10.0, 0.0, 5.0), Vec3::new(0.0, 10.0, -5.0));
        assert_eq!(b.p_min, Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(b.p_max, Vec3::new(10.0, 10.0, 5.0));
    }

    #[test]
    fn test_bounds_union_with_empty() {
        let b = unit_box();
        assert_eq!(Bounds3::EMPTY.union(&b), b);
        assert_eq!(b.union(&Bounds3::EMPTY), b);
        assert!(Bounds3::EMPTY.is_empty());
    }

    #[test]
    fn test_bounds_union() {
        let box1 = Bounds3::new(Vec3::ZERO, Vec3::splat(5.0));
        let box2 = Bounds3::new(Vec3::splat(3.0), Vec3::splat(10.0));
        let u = box1.union(&box2);

        assert_eq!(u.p_min, Vec3::ZERO);
        assert_eq!(u.p_max, Vec3::splat(10.0));
    }

    #[test]
    fn test_bounds_union_point() {
        let b = Bounds3::EMPTY
            .union_point(Vec3::new(1.0, 2.0, 3.0))
            .union_point(Vec3::new(-1.0, 0.0, 4.0));
        assert_eq!(b.p_min, Vec3::new(-1.0, 0.0, 3.0));
        assert_eq!(b.p_max, Vec3::new(1.0, 2.0, 4.0));
    }

    #[test]
    fn test_bounds_derived_values() {
        let b = Bounds3::new(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(b.centroid(), Vec3::new(0.5, 1.0, 1.5));
        assert_eq!(b.diagonal(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(b.surface_area(), 2.0 * (2.0 + 6.0 + 3.0));
        assert_eq!(b.max_extent(), 2);
        assert_eq!(Bounds3::EMPTY.surface_area(), 0.0);
        assert_eq!(Bounds3::from_point(Vec3::ONE).surface_area(), 0.0);
    }

    #[test]
    fn test_bounds_max_extent() {
        assert_eq!(Bounds3::new(Vec3::ZERO, Vec3::new(10.0, 1.0, 1.0)).max_extent(), 0);
        assert_eq!(Bounds3::new(Vec3::ZERO, Vec3::new(1.0, 10.0, 1.0)).max_extent(), 1);
        assert_eq!(Bounds3::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 10.0)).max_extent(), 2);
    }

    #[test]
    fn test_bounds_intersect_and_overlap() {
        let a = Bounds3::new(Vec3::ZERO, Vec3::splat(2.0));
        let b = Bounds3::new(Vec3::ONE, Vec3::splat(3.0));
        let c = Bounds3::new(Vec3::splat(5.0), Vec3::splat(6.0));

        assert_eq!(a.intersect(&b), Bounds3::new(Vec3::ONE, Vec3::splat(2.0)));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_bounds_inside_and_offset() {
        let b = Bounds3::new(Vec3::ZERO, Vec3::new(2.0, 4.0, 0.0));
        assert!(b.inside(Vec3::new(1.0, 1.0, 0.0)));
        assert!(!b.inside(Vec3::new(3.0, 1.0, 0.0)));
        assert_eq!(b.offset(Vec3::new(1.0, 1.0, 0.0)), Vec3::new(0.5, 0.25, 0.0));
    }

    #[test]
    fn test_slab_hit_and_miss() {
        let b = unit_box();

        // Ray pointing at center
        assert!(hits(&b, &Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z)));

        // Ray pointing away
        assert!(!hits(&b, &Ray::new(Vec3::new(0.0, 0.0, -5.0), -Vec3::Z)));

        // Ray missing the box
        assert!(!hits(&b, &Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::Z)));
    }

    #[test]
    fn test_slab_negative_direction() {
        let b = unit_box();
        let ray = Ray::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(-1.0, -1.0, -1.0));
        assert!(hits(&b, &ray));
    }

    #[test]
    fn test_slab_origin_inside() {
        let b = unit_box();
        assert!(hits(&b, &Ray::new(Vec3::ZERO, Vec3::new(0.3, -0.2, 0.9))));
    }

    #[test]
    fn test_slab_flat_box() {
        // Zero thickness along Y, as produced by an axis-aligned quad.
        let b = Bounds3::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 0.0, 1.0));
        assert!(hits(&b, &Ray::new(Vec3::new(0.2, 5.0, 0.1), -Vec3::Y)));
        assert!(!hits(&b, &Ray::new(Vec3::new(3.0, 5.0, 0.1), -Vec3::Y)));
    }

    #[test]
    fn test_slab_negated_axis_directions() {
        let b = unit_box();
        for (origin, dir) in [
            (Vec3::new(0.5, 0.5, 5.0), -Vec3::Z),
            (Vec3::new(5.0, -0.5, 0.5), -Vec3::X),
            (Vec3::new(0.0, 5.0, 0.0), -Vec3::Y),
            (Vec3::new(0.2, 5.0, 0.1), Vec3::new(-0.0, -1.0, 0.0)),
        ] {
            assert!(hits(&b, &Ray::new(origin, dir)), "{origin:?} {dir:?}");
        }
        assert!(!hits(&b, &Ray::new(Vec3::new(3.0, 5.0, 0.0), -Vec3::Y)));
    }

    #[test]
    fn test_slab_respects_ray_range() {
        let b = unit_box();
        let near = Ray::with_range(
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::Z,
            crate::Interval::new(0.0, 3.0),
        );
        assert!(!hits(&b, &near));

        let far = Ray::with_range(
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::Z,
            crate::Interval::new(0.0, 4.5),
        );
        assert!(hits(&b, &far));
    }

    #[test]
    fn test_slab_zero_direction_component_on_boundary() {
        // Origin lies exactly on the x = 1 plane with no x motion: 0 * inf = NaN.
        let b = unit_box();
        let ray = Ray::new(Vec3::new(1.0, 0.0, -5.0), Vec3::Z);
        assert!(hits(&b, &ray));
    }
}
