//! Triangle meshes with their own acceleration structure.

use crate::bvh::{Bvh, SplitMethod};
use crate::object::area_pdf;
use crate::sampling::gen_f32;
use crate::{Intersection, Material, Object, SurfaceSample, Triangle};
use lux_math::{Bounds3, Ray, Vec3};
use rand::RngCore;
use thiserror::Error;

/// Errors that can occur while assembling a mesh from indexed data.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MeshError {
    #[error("Index count {0} is not a multiple of 3")]
    IndexCount(usize),

    #[error("Vertex index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
}

/// A set of triangles sharing one material, queried through a private BVH.
///
/// Light sampling picks a triangle proportionally to its area, so points are
/// uniform over the whole mesh and the pdf is `1 / area()`.
#[derive(Debug, Clone)]
pub struct MeshTriangle {
    triangles: Vec<Triangle>,
    bvh: Bvh,
    bounds: Bounds3,
    area: f32,
    /// Running sum of triangle areas, used to pick a triangle when sampling
    cumulative_area: Vec<f32>,
    material: Material,
}

impl MeshTriangle {
    /// Build a mesh from a vertex list and triangle indices (three per face).
    pub fn new(vertices: &[Vec3], indices: &[u32], material: Material) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::IndexCount(indices.len()));
        }

        let vertex = |index: u32| {
            vertices
                .get(index as usize)
                .copied()
                .ok_or(MeshError::IndexOutOfRange {
                    index,
                    vertex_count: vertices.len(),
                })
        };

        let triangles = indices
            .chunks_exact(3)
            .map(|face| -> Result<Triangle, MeshError> {
                Ok(Triangle::new(
                    vertex(face[0])?,
                    vertex(face[1])?,
                    vertex(face[2])?,
                    material,
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_triangles(triangles, material))
    }

    /// Wrap already constructed triangles.
    pub fn from_triangles(triangles: Vec<Triangle>, material: Material) -> Self {
        let bounds = triangles
            .iter()
            .fold(Bounds3::EMPTY, |acc, t| acc.union(&t.bounds()));

        let cumulative_area: Vec<f32> = triangles
            .iter()
            .scan(0.0, |sum, t| {
                *sum += t.area();
                Some(*sum)
            })
            .collect();
        let area = cumulative_area.last().copied().unwrap_or(0.0);

        let bvh = Bvh::build(&triangles, SplitMethod::Sah);
        log::debug!(
            "Mesh: {} triangles, area {:.3}, {} BVH nodes",
            triangles.len(),
            area,
            bvh.node_count()
        );

        Self {
            triangles,
            bvh,
            bounds,
            area,
            cumulative_area,
            material,
        }
    }

    /// A planar quad `a b c d` (in order around its edge) whose front side
    /// faces `facing`.
    pub fn quad(corners: [Vec3; 4], facing: Vec3, material: Material) -> Self {
        Self::from_triangles(oriented_quad(corners, facing, material).to_vec(), material)
    }

    /// A closed prism: the quad `base` extruded by `height` along +Y, with
    /// every face pointing outward.
    pub fn prism(base: [Vec3; 4], height: f32, material: Material) -> Self {
        let up = Vec3::new(0.0, height, 0.0);
        let top = base.map(|p| p + up);
        let center = base.iter().chain(top.iter()).copied().sum::<Vec3>() / 8.0;

        let mut faces = vec![base, top];
        for i in 0..4 {
            let j = (i + 1) % 4;
            faces.push([base[i], base[j], top[j], top[i]]);
        }

        let triangles = faces
            .into_iter()
            .flat_map(|face| {
                let face_center = face.iter().copied().sum::<Vec3>() / 4.0;
                oriented_quad(face, face_center - center, material)
            })
            .collect();
        Self::from_triangles(triangles, material)
    }

    /// An axis-aligned box with outward facing sides.
    pub fn cuboid(min: Vec3, max: Vec3, material: Material) -> Self {
        let base = [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(min.x, min.y, max.z),
        ];
        Self::prism(base, max.y - min.y, material)
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn material(&self) -> &Material {
        &self.material
    }
}

/// Split a planar quad into two triangles wound so their normals face `facing`.
fn oriented_quad(corners: [Vec3; 4], facing: Vec3, material: Material) -> [Triangle; 2] {
    let [a, b, c, d] = corners;
    let normal = (b - a).cross(c - a);
    if normal.dot(facing) >= 0.0 {
        [
            Triangle::new(a, b, c, material),
            Triangle::new(a, c, d, material),
        ]
    } else {
        [
            Triangle::new(a, c, b, material),
            Triangle::new(a, d, c, material),
        ]
    }
}

impl Object for MeshTriangle {
    fn intersect(&self, ray: &Ray) -> Intersection<'_> {
        self.bvh.intersect(&self.triangles, ray)
    }

    fn bounds(&self) -> Bounds3 {
        self.bounds
    }

    fn area(&self) -> f32 {
        self.area
    }

    fn has_emit(&self) -> bool {
        self.material.has_emission()
    }

    fn sample(&self, rng: &mut dyn RngCore) -> SurfaceSample {
        if self.triangles.is_empty() {
            return SurfaceSample {
                coords: Vec3::ZERO,
                normal: Vec3::ZERO,
                emit: self.material.emission(),
                pdf: 0.0,
            };
        }

        let p = gen_f32(rng) * self.area;
        let index = self
            .cumulative_area
            .partition_point(|&sum| sum < p)
            .min(self.triangles.len() - 1);

        SurfaceSample {
            pdf: area_pdf(self.area),
            ..self.triangles[index].sample(rng)
        }
    }
}
