//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection. Back
//! faces are culled: a ray travelling along the face normal passes through,
//! which keeps rays leaving a surface from re-hitting it.

use crate::object::area_pdf;
use crate::sampling::gen_f32;
use crate::{Intersection, Material, Object, SurfaceSample};
use lux_math::{Bounds3, Ray, Vec3};
use rand::RngCore;

/// Determinants below this are treated as a ray parallel to the triangle.
const PARALLEL_EPSILON: f32 = 1e-8;

/// A single-sided triangle.
#[derive(Debug, Clone)]
pub struct Triangle {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Edges v1 - v0 and v2 - v0
    e1: Vec3,
    e2: Vec3,
    /// Unit face normal, zero for degenerate triangles
    normal: Vec3,
    area: f32,
    material: Material,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    ///
    /// The front face is the side the counter-clockwise winding faces.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Material) -> Self {
        let e1 = v1 - v0;
        let e2 = v2 - v0;
        let cross = e1.cross(e2);

        Self {
            v0,
            v1,
            v2,
            e1,
            e2,
            normal: cross.normalize_or_zero(),
            area: 0.5 * cross.length(),
            material,
        }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn material(&self) -> &Material {
        &self.material
    }
}

impl Object for Triangle {
    fn intersect(&self, ray: &Ray) -> Intersection<'_> {
        if ray.direction.dot(self.normal) > 0.0 {
            return Intersection::none();
        }

        let pvec = ray.direction.cross(self.e2);
        let det = self.e1.dot(pvec);
        if det.abs() < PARALLEL_EPSILON {
            return Intersection::none();
        }

        let det_inv = 1.0 / det;
        let tvec = ray.origin - self.v0;
        let u = tvec.dot(pvec) * det_inv;
        if !(0.0..=1.0).contains(&u) {
            return Intersection::none();
        }

        let qvec = tvec.cross(self.e1);
        let v = ray.direction.dot(qvec) * det_inv;
        if v < 0.0 || u + v > 1.0 {
            return Intersection::none();
        }

        let t = self.e2.dot(qvec) * det_inv;
        if t <= 0.0 || !ray.t_range.contains(t) {
            return Intersection::none();
        }

        Intersection {
            happened: true,
            coords: ray.at(t),
            normal: self.normal,
            distance: t,
            object: Some(self),
            material: Some(&self.material),
        }
    }

    fn bounds(&self) -> Bounds3 {
        Bounds3::new(self.v0, self.v1).union_point(self.v2)
    }

    fn area(&self) -> f32 {
        self.area
    }

    fn has_emit(&self) -> bool {
        self.material.has_emission()
    }

    fn sample(&self, rng: &mut dyn RngCore) -> SurfaceSample {
        // sqrt warp keeps the barycentric distribution uniform in area
        let x = gen_f32(rng).sqrt();
        let y = gen_f32(rng);
        SurfaceSample {
            coords: self.v0 * (1.0 - x) + self.v1 * (x * (1.0 - y)) + self.v2 * (x * y),
            normal: self.normal,
            emit: self.material.emission(),
            pdf: area_pdf(self.area),
        }
    }
}
