use crate::{Interval, Vec3};

/// A ray in 3D space.
///
/// The reciprocal of the direction is computed once at construction so that
/// box slab tests never divide on the hot path. `t_range` limits the ray
/// parameters that count as hits.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub direction_inv: Vec3,
    pub t_range: Interval,
}

impl Ray {
    /// Create a ray valid for every `t >= 0`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self::with_range(origin, direction, Interval::FORWARD)
    }

    /// Create a ray valid only inside `t_range`.
    pub fn with_range(origin: Vec3, direction: Vec3, t_range: Interval) -> Self {
        Self {
            origin,
            direction,
            // Zero components become +-inf, which the slab test tolerates.
            direction_inv: direction.recip(),
            t_range,
        }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Per-axis flags telling whether the direction component is negative.
    ///
    /// Uses the sign bit, so `-0.0` counts as negative and agrees with the
    /// `-inf` stored in `direction_inv`.
    #[inline]
    pub fn dir_is_neg(&self) -> [bool; 3] {
        [
            self.direction.x.is_sign_negative(),
            self.direction.y.is_sign_negative(),
            self.direction.z.is_sign_negative(),
        ]
    }
}
