//! Random sampling helpers shared by materials, primitives and the camera.

use lux_math::Vec3;
use rand::{Rng, RngCore};
use std::f32::consts::PI;

/// Uniform float in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniformly distributed direction on the hemisphere around +Z.
pub fn uniform_hemisphere(rng: &mut dyn RngCore) -> Vec3 {
    let z = (1.0 - 2.0 * gen_f32(rng)).abs();
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * gen_f32(rng);
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Uniformly distributed direction on the unit sphere.
pub fn uniform_sphere(rng: &mut dyn RngCore) -> Vec3 {
    let z = 1.0 - 2.0 * gen_f32(rng);
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * gen_f32(rng);
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Rotate a direction expressed around +Z into the frame around `n`.
///
/// `n` must be unit length.
pub fn to_world(local: Vec3, n: Vec3) -> Vec3 {
    // Branchless orthonormal basis (Duff et al. 2017).
    let sign = 1.0f32.copysign(n.z);
    let a = -1.0 / (sign + n.z);
    let b = n.x * n.y * a;
    let tangent = Vec3::new(1.0 + sign * n.x * n.x * a, sign * b, -sign * n.x);
    let bitangent = Vec3::new(b, sign + n.y * n.y * a, -n.y);
    local.x * tangent + local.y * bitangent + local.z * n
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_uniform_hemisphere_is_unit_and_upper() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let d = uniform_hemisphere(&mut rng);
            assert!((d.length() - 1.0).abs() < 1e-4);
            assert!(d.z >= 0.0);
        }
    }

    #[test]
    fn test_uniform_sphere_mean_is_near_zero() {
        let mut rng = StdRng::seed_from_u64(11);
        let n = 20_000;
        let sum: Vec3 = (0..n).map(|_| uniform_sphere(&mut rng)).sum();
        assert!((sum / n as f32).length() < 0.03);
    }

    #[test]
    fn test_to_world_maps_z_to_normal() {
        for n in [Vec3::X, -Vec3::Y, Vec3::Z, -Vec3::Z, Vec3::new(1.0, 2.0, -3.0).normalize()] {
            let w = to_world(Vec3::Z, n);
            assert!((w - n).length() < 1e-5, "n={n:?} w={w:?}");

            let t = to_world(Vec3::X, n);
            assert!(t.dot(n).abs() < 1e-5);
            assert!((t.length() - 1.0).abs() < 1e-5);
        }
    }
}
