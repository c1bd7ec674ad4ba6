//! Surface materials: BRDF evaluation, direction sampling and emission.
//!
//! Directions follow one convention throughout: `wi` is the direction of the
//! incoming ray (pointing *into* the surface), `wo` points away from the
//! surface and `n` is the unit shading normal facing the incoming ray.

use crate::sampling::{to_world, uniform_hemisphere};
use lux_math::Vec3;
use rand::RngCore;
use std::f32::consts::PI;

/// Color type alias (linear RGB radiance or reflectance)
pub type Color = Vec3;

/// Emission below this magnitude is treated as none.
const EMISSION_EPSILON: f32 = 1e-5;

/// Scattering model of a material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialKind {
    /// Ideal Lambertian reflector.
    Diffuse,
    /// Cook-Torrance GGX specular lobe layered over a Lambertian base.
    Microfacet {
        /// Perceptual roughness in (0, 1]
        roughness: f32,
        /// Index of refraction used for the Schlick Fresnel term
        ior: f32,
    },
}

/// A surface material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    /// Diffuse reflectance
    pub kd: Color,
    /// Specular tint (microfacet only)
    pub ks: Color,
    /// Emitted radiance
    pub emission: Color,
}

impl Default for Material {
    fn default() -> Self {
        Self::diffuse(Color::splat(0.5))
    }
}

impl Material {
    /// Create a Lambertian material with the given albedo.
    pub fn diffuse(kd: Color) -> Self {
        Self {
            kind: MaterialKind::Diffuse,
            kd,
            ks: Color::ZERO,
            emission: Color::ZERO,
        }
    }

    /// Create a diffuse area light.
    pub fn emissive(kd: Color, emission: Color) -> Self {
        Self {
            emission,
            ..Self::diffuse(kd)
        }
    }

    /// Create a glossy microfacet material.
    ///
    /// - `roughness`: 0 = near mirror, 1 = very rough (clamped to [0.05, 1])
    /// - `ior`: index of refraction driving the Fresnel reflectance
    pub fn microfacet(kd: Color, ks: Color, roughness: f32, ior: f32) -> Self {
        Self {
            kind: MaterialKind::Microfacet {
                roughness: roughness.clamp(0.05, 1.0),
                ior: ior.max(1.0),
            },
            kd,
            ks,
            emission: Color::ZERO,
        }
    }

    pub fn emission(&self) -> Color {
        self.emission
    }

    pub fn has_emission(&self) -> bool {
        self.emission.length() > EMISSION_EPSILON
    }

    /// Sample an outgoing direction for the incoming direction `wi`.
    ///
    /// Both kinds sample the hemisphere around `n` uniformly.
    pub fn sample(&self, _wi: Vec3, n: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        to_world(uniform_hemisphere(rng), n).normalize_or_zero()
    }

    /// Density of [`Material::sample`] producing `wo`, per unit solid angle.
    pub fn pdf(&self, _wi: Vec3, wo: Vec3, n: Vec3) -> f32 {
        if wo.dot(n) > 0.0 {
            0.5 / PI
        } else {
            0.0
        }
    }

    /// Evaluate the BRDF for light arriving along `wo` and leaving toward `-wi`.
    pub fn eval(&self, wi: Vec3, wo: Vec3, n: Vec3) -> Color {
        let cos_o = wo.dot(n);
        if cos_o <= 0.0 {
            return Color::ZERO;
        }

        match self.kind {
            MaterialKind::Diffuse => self.kd / PI,
            MaterialKind::Microfacet { roughness, ior } => {
                let v = -wi;
                let cos_v = v.dot(n);
                if cos_v <= 0.0 {
                    return Color::ZERO;
                }
                let h = (v + wo).normalize_or_zero();
                if h == Vec3::ZERO {
                    return Color::ZERO;
                }

                let alpha = roughness * roughness;
                let d = ggx_distribution(n.dot(h), alpha);
                let g = smith_geometry(cos_v, roughness) * smith_geometry(cos_o, roughness);
                let f = schlick_fresnel(v.dot(h).max(0.0), ior);

                let specular = d * g * f / (4.0 * cos_v * cos_o);
                (1.0 - f) * self.kd / PI + self.ks * specular
            }
        }
    }
}

/// GGX / Trowbridge-Reitz normal distribution.
fn ggx_distribution(cos_h: f32, alpha: f32) -> f32 {
    if cos_h <= 0.0 {
        return 0.0;
    }
    let a2 = alpha * alpha;
    let denom = cos_h * cos_h * (a2 - 1.0) + 1.0;
    a2 / (PI * denom * denom)
}

/// Schlick-GGX masking term for one direction.
fn smith_geometry(cos: f32, roughness: f32) -> f32 {
    let k = (roughness + 1.0) * (roughness + 1.0) / 8.0;
    cos / (cos * (1.0 - k) + k)
}

fn schlick_fresnel(cos: f32, ior: f32) -> f32 {
    let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cos).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_diffuse_eval() {
        let m = Material::diffuse(Color::new(0.5, 0.25, 1.0));
        let wi = Vec3::new(0.0, -1.0, 0.0);

        let f = m.eval(wi, Vec3::Y, Vec3::Y);
        assert!((f - Color::new(0.5, 0.25, 1.0) / PI).length() < 1e-6);

        // Below the surface contributes nothing
        assert_eq!(m.eval(wi, -Vec3::Y, Vec3::Y), Color::ZERO);
    }

    #[test]
    fn test_sample_stays_in_hemisphere() {
        let m = Material::diffuse(Color::ONE);
        let n = Vec3::new(1.0, 1.0, 0.0).normalize();
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..500 {
            let wo = m.sample(-n, n, &mut rng);
            assert!(wo.dot(n) >= 0.0);
            assert!((wo.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_pdf_uniform_hemisphere() {
        let m = Material::diffuse(Color::ONE);
        assert!((m.pdf(-Vec3::Z, Vec3::Z, Vec3::Z) - 1.0 / (2.0 * PI)).abs() < 1e-6);
        assert_eq!(m.pdf(-Vec3::Z, -Vec3::Z, Vec3::Z), 0.0);
    }

    #[test]
    fn test_diffuse_albedo_estimate() {
        // E[f * cos / pdf] over the sampled hemisphere equals the albedo.
        let kd = Color::new(0.8, 0.5, 0.2);
        let m = Material::diffuse(kd);
        let n = Vec3::Z;
        let wi = -Vec3::Z;
        let mut rng = StdRng::seed_from_u64(5);

        let count = 50_000;
        let mut sum = Color::ZERO;
        for _ in 0..count {
            let wo = m.sample(wi, n, &mut rng);
            let pdf = m.pdf(wi, wo, n);
            if pdf > 0.0 {
                sum += m.eval(wi, wo, n) * wo.dot(n) / pdf;
            }
        }
        let estimate = sum / count as f32;
        assert!((estimate - kd).abs().max_element() < 0.02, "estimate={estimate:?}");
    }

    #[test]
    fn test_emission() {
        assert!(!Material::diffuse(Color::ONE).has_emission());

        let light = Material::emissive(Color::splat(0.65), Color::new(47.8, 38.6, 31.1));
        assert!(light.has_emission());
        assert_eq!(light.emission(), Color::new(47.8, 38.6, 31.1));
    }

    #[test]
    fn test_microfacet_is_non_negative_and_finite() {
        let m = Material::microfacet(Color::splat(0.3), Color::ONE, 0.4, 1.5);
        let n = Vec3::Z;
        let wi = Vec3::new(0.3, 0.1, -1.0).normalize();
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..1000 {
            let wo = m.sample(wi, n, &mut rng);
            let f = m.eval(wi, wo, n);
            assert!(f.is_finite());
            assert!(f.min_element() >= 0.0);
        }
    }

    #[test]
    fn test_microfacet_peaks_at_mirror_direction() {
        let m = Material::microfacet(Color::ZERO, Color::ONE, 0.2, 1.5);
        let n = Vec3::Z;
        let wi = Vec3::new(1.0, 0.0, -1.0).normalize();
        let mirror = Vec3::new(1.0, 0.0, 1.0).normalize();
        let off = Vec3::new(-0.2, 0.5, 1.0).normalize();

        assert!(m.eval(wi, mirror, n).x > m.eval(wi, off, n).x);
    }
}
