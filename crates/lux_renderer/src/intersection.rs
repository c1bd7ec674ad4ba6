//! Ray query results.

use crate::{Color, Material, Object};
use lux_math::Vec3;

/// Record of a ray-scene query.
///
/// A miss is a valid value, not an error: `happened` is false and `distance`
/// is +inf, so any real hit compares closer.
#[derive(Clone, Copy)]
pub struct Intersection<'a> {
    /// Whether anything was hit
    pub happened: bool,
    /// Point of intersection
    pub coords: Vec3,
    /// Surface normal at the hit, facing the incoming ray
    pub normal: Vec3,
    /// Ray parameter of the hit
    pub distance: f32,
    /// The primitive that was hit
    pub object: Option<&'a dyn Object>,
    /// Material of the hit primitive
    pub material: Option<&'a Material>,
}

impl<'a> Intersection<'a> {
    /// The no-hit result.
    #[inline]
    pub fn none() -> Self {
        Self {
            happened: false,
            coords: Vec3::ZERO,
            normal: Vec3::ZERO,
            distance: f32::INFINITY,
            object: None,
            material: None,
        }
    }

    /// Returns true if this hit lies on an emitting surface.
    pub fn is_emissive(&self) -> bool {
        self.happened && self.material.is_some_and(Material::has_emission)
    }

    /// Returns true if both records refer to the same primitive.
    pub fn same_object(&self, other: &Intersection<'_>) -> bool {
        match (self.object, other.object) {
            (Some(a), Some(b)) => std::ptr::eq(
                a as *const dyn Object as *const u8,
                b as *const dyn Object as *const u8,
            ),
            _ => false,
        }
    }
}

impl Default for Intersection<'_> {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Intersection<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Intersection")
            .field("happened", &self.happened)
            .field("coords", &self.coords)
            .field("normal", &self.normal)
            .field("distance", &self.distance)
            .field("material", &self.material)
            .finish_non_exhaustive()
    }
}

/// A point sampled on the surface of a primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub coords: Vec3,
    pub normal: Vec3,
    /// Radiance emitted at the point
    pub emit: Color,
    /// Density with respect to surface area
    pub pdf: f32,
}
