//! Built-in scenes.

use crate::bvh::SplitMethod;
use crate::{Camera, Color, Material, MeshTriangle, Scene};
use lux_math::Vec3;

const WIDTH: f32 = 552.8;
const HEIGHT: f32 = 548.8;
const DEPTH: f32 = 559.2;
/// The light hangs just below the ceiling so it is hit before it.
const LIGHT_Y: f32 = 548.0;

/// The Cornell box in its measured millimetre coordinates.
///
/// Open toward -Z; the BVH is built before returning. Seen from
/// [`cornell_box_camera`], the red wall is on the left.
pub fn cornell_box(split_method: SplitMethod) -> Scene {
    let red = Material::diffuse(Color::new(0.63, 0.065, 0.05));
    let green = Material::diffuse(Color::new(0.14, 0.45, 0.091));
    let white = Material::diffuse(Color::new(0.725, 0.71, 0.68));
    let light = Material::emissive(Color::splat(0.65), light_emission());

    let mut scene = Scene::with_split_method(split_method);

    // Floor, ceiling and back wall
    scene.add(Box::new(MeshTriangle::quad(
        [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(WIDTH, 0.0, 0.0),
            Vec3::new(WIDTH, 0.0, DEPTH),
            Vec3::new(0.0, 0.0, DEPTH),
        ],
        Vec3::Y,
        white,
    )));
    scene.add(Box::new(MeshTriangle::quad(
        [
            Vec3::new(0.0, HEIGHT, 0.0),
            Vec3::new(WIDTH, HEIGHT, 0.0),
            Vec3::new(WIDTH, HEIGHT, DEPTH),
            Vec3::new(0.0, HEIGHT, DEPTH),
        ],
        -Vec3::Y,
        white,
    )));
    scene.add(Box::new(MeshTriangle::quad(
        [
            Vec3::new(0.0, 0.0, DEPTH),
            Vec3::new(WIDTH, 0.0, DEPTH),
            Vec3::new(WIDTH, HEIGHT, DEPTH),
            Vec3::new(0.0, HEIGHT, DEPTH),
        ],
        -Vec3::Z,
        white,
    )));

    // Side walls
    scene.add(Box::new(MeshTriangle::quad(
        [
            Vec3::new(WIDTH, 0.0, 0.0),
            Vec3::new(WIDTH, 0.0, DEPTH),
            Vec3::new(WIDTH, HEIGHT, DEPTH),
            Vec3::new(WIDTH, HEIGHT, 0.0),
        ],
        -Vec3::X,
        red,
    )));
    scene.add(Box::new(MeshTriangle::quad(
        [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, DEPTH),
            Vec3::new(0.0, HEIGHT, DEPTH),
            Vec3::new(0.0, HEIGHT, 0.0),
        ],
        Vec3::X,
        green,
    )));

    // Blocks
    scene.add(Box::new(MeshTriangle::prism(
        [
            Vec3::new(130.0, 0.0, 65.0),
            Vec3::new(82.0, 0.0, 225.0),
            Vec3::new(240.0, 0.0, 272.0),
            Vec3::new(290.0, 0.0, 114.0),
        ],
        165.0,
        white,
    )));
    scene.add(Box::new(MeshTriangle::prism(
        [
            Vec3::new(423.0, 0.0, 247.0),
            Vec3::new(265.0, 0.0, 296.0),
            Vec3::new(314.0, 0.0, 456.0),
            Vec3::new(472.0, 0.0, 406.0),
        ],
        330.0,
        white,
    )));

    scene.add(Box::new(MeshTriangle::quad(
        [
            Vec3::new(343.0, LIGHT_Y, 227.0),
            Vec3::new(343.0, LIGHT_Y, 332.0),
            Vec3::new(213.0, LIGHT_Y, 332.0),
            Vec3::new(213.0, LIGHT_Y, 227.0),
        ],
        -Vec3::Y,
        light,
    )));

    scene.build_bvh();
    scene
}

/// Warm white light built from three spectral peaks folded into RGB.
fn light_emission() -> Color {
    8.0 * Color::new(0.747 + 0.058, 0.747 + 0.258, 0.747)
        + 15.6 * Color::new(0.740 + 0.287, 0.740 + 0.160, 0.740)
        + 18.4 * Color::new(0.737 + 0.642, 0.737 + 0.159, 0.737)
}

/// The camera matching [`cornell_box`], initialized for `width` x `height`.
pub fn cornell_box_camera(width: u32, height: u32) -> Camera {
    let mut camera = Camera::new()
        .with_resolution(width, height)
        .with_position(
            Vec3::new(278.0, 273.0, -800.0),
            Vec3::new(278.0, 273.0, 0.0),
            Vec3::Y,
        )
        .with_fov(40.0);
    camera.initialize();
    camera
}
