//! Lux math - vectors, rays and bounding volumes for the path tracer.

// Re-export glam for convenience
pub use glam::*;

mod bounds;
mod interval;
mod ray;

pub use bounds::Bounds3;
pub use interval::Interval;
pub use ray::Ray;

/// Small distance used to reject self-intersections at a ray's origin.
pub const EPSILON: f32 = 1e-4;

/// Normalize `v`, returning the zero vector for degenerate input instead of NaN.
#[inline]
pub fn safe_normalize(v: Vec3) -> Vec3 {
    v.normalize_or_zero()
}
