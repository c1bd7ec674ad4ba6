//! Sphere primitive.

use crate::object::area_pdf;
use crate::sampling::uniform_sphere;
use crate::{Intersection, Material, Object, SurfaceSample};
use lux_math::{Bounds3, Interval, Ray, Vec3, EPSILON};
use rand::RngCore;
use std::f32::consts::PI;

/// A sphere primitive.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Material,
    area: f32,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32, material: Material) -> Self {
        let radius = radius.max(0.0);
        Self {
            center,
            radius,
            material,
            area: 4.0 * PI * radius * radius,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material(&self) -> &Material {
        &self.material
    }
}

impl Object for Sphere {
    fn intersect(&self, ray: &Ray) -> Intersection<'_> {
        if self.radius <= 0.0 {
            return Intersection::none();
        }

        let oc = ray.origin - self.center;
        let a = ray.direction.length_squared();
        let half_b = oc.dot(ray.direction);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = half_b * half_b - a * c;
        if a <= 0.0 || discriminant < 0.0 {
            return Intersection::none();
        }
        let sqrtd = discriminant.sqrt();

        // Reject hits at the origin so secondary rays leave the surface.
        let valid = Interval::new(ray.t_range.min.max(EPSILON), ray.t_range.max);

        // Find the nearest root in the acceptable range
        let mut t = (-half_b - sqrtd) / a;
        if !valid.contains(t) {
            t = (-half_b + sqrtd) / a;
            if !valid.contains(t) {
                return Intersection::none();
            }
        }

        let coords = ray.at(t);
        let outward = (coords - self.center) / self.radius;
        let normal = if ray.direction.dot(outward) > 0.0 {
            -outward
        } else {
            outward
        };

        Intersection {
            happened: true,
            coords,
            normal,
            distance: t,
            object: Some(self),
            material: Some(&self.material),
        }
    }

    fn bounds(&self) -> Bounds3 {
        let r = Vec3::splat(self.radius);
        Bounds3::new(self.center - r, self.center + r)
    }

    fn area(&self) -> f32 {
        self.area
    }

    fn has_emit(&self) -> bool {
        self.material.has_emission()
    }

    fn sample(&self, rng: &mut dyn RngCore) -> SurfaceSample {
        let dir = uniform_sphere(rng);
        SurfaceSample {
            coords: self.center + self.radius * dir,
            normal: dir,
            emit: self.material.emission(),
            pdf: area_pdf(self.area),
        }
    }
}
