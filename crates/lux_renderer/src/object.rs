//! The primitive capability set consumed by the BVH and the scene.

use crate::{Intersection, SurfaceSample};
use lux_math::{Bounds3, Ray};
use rand::RngCore;

/// Anything that can be hit by rays and, if it emits, sampled as a light.
pub trait Object: Send + Sync {
    /// Nearest intersection of `ray` with this object.
    fn intersect(&self, ray: &Ray) -> Intersection<'_>;

    /// Axis-aligned bounds of the object.
    fn bounds(&self) -> Bounds3;

    /// Total surface area.
    fn area(&self) -> f32;

    /// Returns true if the object is a light source.
    fn has_emit(&self) -> bool;

    /// Sample a point uniformly by area.
    ///
    /// The returned pdf is with respect to area (`1 / area()`), or zero for
    /// objects without surface area.
    fn sample(&self, rng: &mut dyn RngCore) -> SurfaceSample;
}

impl<T: Object + ?Sized> Object for Box<T> {
    #[inline]
    fn intersect(&self, ray: &Ray) -> Intersection<'_> {
        (**self).intersect(ray)
    }

    #[inline]
    fn bounds(&self) -> Bounds3 {
        (**self).bounds()
    }

    fn area(&self) -> f32 {
        (**self).area()
    }

    fn has_emit(&self) -> bool {
        (**self).has_emit()
    }

    fn sample(&self, rng: &mut dyn RngCore) -> SurfaceSample {
        (**self).sample(rng)
    }
}

/// Area pdf for an object of the given area, zero when degenerate.
#[inline]
pub(crate) fn area_pdf(area: f32) -> f32 {
    if area > 0.0 {
        1.0 / area
    } else {
        0.0
    }
}
