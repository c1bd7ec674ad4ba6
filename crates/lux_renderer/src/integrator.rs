//! Monte Carlo path tracing integrator.
//!
//! Estimates the rendering equation with next-event estimation: every
//! non-emissive hit samples one point on the lights directly and continues
//! with one BRDF-sampled bounce, terminated by Russian roulette. Lights found
//! by a bounce are not counted again, since the previous vertex already
//! sampled them directly; only camera rays see emitters.

use crate::sampling::gen_f32;
use crate::{Color, Intersection, Material, Scene, SurfaceSample};
use lux_math::{Ray, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Integrator settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorConfig {
    /// Probability that a path continues past each hit
    pub russian_roulette: f32,
    /// Hard cap on path depth; indirect light stops at this depth
    pub max_depth: u32,
    /// A shadow ray counts as reaching the light when it stops this close to
    /// the sampled light point (world units)
    pub light_epsilon: f32,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            russian_roulette: 0.8,
            max_depth: 64,
            light_epsilon: 1e-2,
        }
    }
}

/// Radiance carried by one path, plus how many surfaces it touched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    pub radiance: Color,
    /// Number of surface interactions, 0 when the camera ray missed
    pub vertices: u32,
}

impl PathSample {
    const MISS: PathSample = PathSample {
        radiance: Color::ZERO,
        vertices: 0,
    };
}

/// Unidirectional path tracer.
#[derive(Debug, Clone, Default)]
pub struct PathTracer {
    config: IntegratorConfig,
}

impl PathTracer {
    pub fn new(config: IntegratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IntegratorConfig {
        &self.config
    }

    /// Radiance arriving at the origin of `ray` from along its direction.
    ///
    /// `depth` is 0 for camera rays.
    pub fn cast_ray(&self, scene: &Scene, ray: &Ray, depth: u32, rng: &mut dyn RngCore) -> Color {
        self.trace_path(scene, ray, depth, rng).radiance
    }

    /// Like [`PathTracer::cast_ray`], also reporting the path length.
    pub fn trace_path(
        &self,
        scene: &Scene,
        ray: &Ray,
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> PathSample {
        let hit = scene.intersect(ray);
        self.shade(scene, ray, &hit, depth, rng)
    }

    fn shade(
        &self,
        scene: &Scene,
        ray: &Ray,
        hit: &Intersection<'_>,
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> PathSample {
        let Some(material) = hit.material.filter(|_| hit.happened) else {
            return PathSample::MISS;
        };

        if material.has_emission() {
            return PathSample {
                radiance: if depth == 0 {
                    material.emission()
                } else {
                    Color::ZERO
                },
                vertices: 1,
            };
        }

        let n = hit.normal;
        let p = hit.coords;
        let wi = ray.direction.normalize_or_zero();

        let l_dir = scene
            .sample_light(rng)
            .map_or(Color::ZERO, |light| self.direct_light(scene, material, p, n, wi, &light));

        let mut vertices = 1;
        let mut l_indir = Color::ZERO;
        let rr = self.config.russian_roulette;
        if depth < self.config.max_depth && rr > 0.0 && gen_f32(rng) < rr {
            let wo = material.sample(wi, n, rng);
            let pdf = material.pdf(wi, wo, n);
            if pdf > 0.0 {
                let bounce = Ray::new(p, wo);
                let next = scene.intersect(&bounce);
                if next.happened && !next.is_emissive() {
                    let path = self.shade(scene, &bounce, &next, depth + 1, rng);
                    vertices += path.vertices;

                    let f_r = material.eval(wi, wo, n);
                    let cos = wo.dot(n).max(0.0);
                    l_indir = finite_or_zero(path.radiance * f_r * cos / pdf / rr);
                }
            }
        }

        PathSample {
            radiance: l_dir + l_indir,
            vertices,
        }
    }

    /// Contribution of one light sample at the shading point `p`.
    fn direct_light(
        &self,
        scene: &Scene,
        material: &Material,
        p: Vec3,
        n: Vec3,
        wi: Vec3,
        light: &SurfaceSample,
    ) -> Color {
        if light.pdf <= 0.0 {
            return Color::ZERO;
        }

        let to_light = light.coords - p;
        let distance_squared = to_light.length_squared();
        if distance_squared <= 0.0 {
            return Color::ZERO;
        }
        let wl = to_light / distance_squared.sqrt();

        // Visible only if the shadow ray stops at the sampled point.
        let shadow = scene.intersect(&Ray::new(p, wl));
        if !shadow.happened || (shadow.coords - light.coords).length() >= self.config.light_epsilon
        {
            return Color::ZERO;
        }

        let f_r = material.eval(wi, wl, n);
        let cos_surface = wl.dot(n).max(0.0);
        let cos_light = (-wl).dot(light.normal).max(0.0);
        finite_or_zero(
            light.emit * f_r * cos_surface * cos_light / distance_squared / light.pdf,
        )
    }
}

/// Drop contributions poisoned by degenerate geometry.
#[inline]
fn finite_or_zero(c: Color) -> Color {
    if c.is_finite() {
        c
    } else {
        Color::ZERO
    }
}
