//! Lux - BVH-accelerated CPU path tracing.
//!
//! Objects (spheres, triangles and triangle meshes) are collected in a
//! [`Scene`], organised into a bounding volume hierarchy and rendered with a
//! unidirectional [`PathTracer`] that samples area lights directly and
//! terminates paths with Russian roulette.

mod bucket;
mod bvh;
mod camera;
mod integrator;
mod intersection;
mod material;
mod mesh;
mod object;
mod renderer;
pub mod sampling;
mod scene;
pub mod scenes;
mod sphere;
mod triangle;

pub use bucket::{bucket_rng, generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::{Bvh, BvhNode, NodeId, SplitMethod, SAH_CANDIDATES};
pub use camera::Camera;
pub use integrator::{IntegratorConfig, PathSample, PathTracer};
pub use intersection::{Intersection, SurfaceSample};
pub use material::{Color, Material, MaterialKind};
pub use mesh::{MeshError, MeshTriangle};
pub use object::Object;
pub use renderer::{
    color_to_rgba, render, render_pixel, render_with_cancel, validate_resolution, ConfigError,
    ImageBuffer, RenderConfig,
};
pub use scene::Scene;
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export the math types that appear in the public API
pub use lux_math::{Bounds3, Interval, Ray, Vec3};
