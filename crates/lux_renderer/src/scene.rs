//! Scene: the object list, its BVH and light sampling.

use crate::bvh::{Bvh, SplitMethod};
use crate::sampling::gen_f32;
use crate::{Intersection, Object, SurfaceSample};
use lux_math::{Bounds3, Ray};
use rand::RngCore;

/// The set of objects rendered together.
///
/// [`Scene::build_bvh`] must be called after the last object is added and
/// before any query; until then [`Scene::intersect`] reports no hits.
#[derive(Default)]
pub struct Scene {
    objects: Vec<Box<dyn Object>>,
    bvh: Option<Bvh>,
    split_method: SplitMethod,
}

impl Scene {
    /// Create an empty scene using the SAH split method.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty scene that builds its BVH with `split_method`.
    pub fn with_split_method(split_method: SplitMethod) -> Self {
        Self {
            split_method,
            ..Self::default()
        }
    }

    /// Add an object. Invalidates a previously built BVH.
    pub fn add(&mut self, object: Box<dyn Object>) {
        self.objects.push(object);
        self.bvh = None;
    }

    /// Build the acceleration structure over every object added so far.
    pub fn build_bvh(&mut self) {
        log::info!(
            "Generating BVH over {} objects ({} emissive)",
            self.objects.len(),
            self.objects.iter().filter(|o| o.has_emit()).count()
        );
        self.bvh = Some(Bvh::build(&self.objects, self.split_method));
    }

    /// Nearest intersection of `ray` with the scene.
    pub fn intersect(&self, ray: &Ray) -> Intersection<'_> {
        match &self.bvh {
            Some(bvh) => bvh.intersect(&self.objects, ray),
            None => Intersection::none(),
        }
    }

    /// Nearest intersection found by testing every object in turn.
    ///
    /// Same result as [`Scene::intersect`] without the BVH; slow, but needs no
    /// build step.
    pub fn trace(&self, ray: &Ray) -> Intersection<'_> {
        self.objects
            .iter()
            .map(|o| o.intersect(ray))
            .fold(Intersection::none(), |nearest, hit| {
                if hit.happened && hit.distance < nearest.distance {
                    hit
                } else {
                    nearest
                }
            })
    }

    /// Total area of all emissive objects.
    pub fn emit_area_sum(&self) -> f32 {
        self.emitters().map(|o| o.area()).sum()
    }

    /// Pick a point on the lights, choosing each light with probability
    /// proportional to its area.
    ///
    /// Returns `None` when the scene has no emitting surface area. The pdf of
    /// the returned sample is that of the chosen object.
    pub fn sample_light(&self, rng: &mut dyn RngCore) -> Option<SurfaceSample> {
        let emit_area_sum = self.emit_area_sum();
        if emit_area_sum <= 0.0 || !emit_area_sum.is_finite() {
            return None;
        }

        let p = gen_f32(rng) * emit_area_sum;
        let mut accumulated = 0.0;
        let mut chosen = None;
        for light in self.emitters() {
            accumulated += light.area();
            chosen = Some(light);
            if p <= accumulated {
                break;
            }
        }
        // Rounding can leave p just above the final sum; the last light wins then.
        chosen.map(|light| light.sample(rng))
    }

    /// Emissive objects with a usable surface.
    fn emitters(&self) -> impl Iterator<Item = &dyn Object> {
        self.objects
            .iter()
            .map(|o| &**o)
            .filter(|o| o.has_emit() && o.area() > 0.0)
    }

    pub fn objects(&self) -> &[Box<dyn Object>] {
        &self.objects
    }

    pub fn bvh(&self) -> Option<&Bvh> {
        self.bvh.as_ref()
    }

    /// Union of every object's bounds.
    pub fn bounds(&self) -> Bounds3 {
        self.objects
            .iter()
            .fold(Bounds3::EMPTY, |acc, o| acc.union(&o.bounds()))
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
