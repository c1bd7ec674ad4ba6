//! End-to-end checks of light sampling and the path tracer.

use lux_renderer::scenes::{cornell_box, cornell_box_camera};
use lux_renderer::{
    render, Color, IntegratorConfig, Material, MeshTriangle, PathTracer, Ray, RenderConfig,
    Scene, Sphere, SplitMethod, Vec3,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A closed diffuse sphere observed from its center, without any lights.
fn dark_sphere() -> Scene {
    let mut scene = Scene::new();
    scene.add(Box::new(Sphere::new(Vec3::ZERO, 5.0, Material::diffuse(Color::splat(0.8)))));
    scene.build_bvh();
    scene
}

#[test]
fn single_emitter_samples_have_uniform_area_pdf() {
    init_logging();
    let light = Material::emissive(Color::splat(0.65), Color::splat(3.0));
    let mut scene = Scene::new();
    scene.add(Box::new(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 2.0, light)));
    scene.add(Box::new(MeshTriangle::cuboid(
        Vec3::splat(-1.0),
        Vec3::splat(1.0),
        Material::default(),
    )));
    scene.build_bvh();

    let area = 4.0 * std::f32::consts::PI * 4.0;
    assert!((scene.emit_area_sum() - area).abs() < 1e-3);

    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..2000 {
        let s = scene.sample_light(&mut rng).unwrap();
        assert!((s.pdf - 1.0 / area).abs() < 1e-6);
        assert!(((s.coords - Vec3::new(0.0, 10.0, 0.0)).length() - 2.0).abs() < 1e-4);
        assert_eq!(s.emit, Color::splat(3.0));
    }
}

#[test]
fn emitters_are_seen_only_by_camera_rays() {
    init_logging();
    let emission = Color::new(5.0, 4.0, 3.0);
    let mut scene = Scene::new();
    scene.add(Box::new(Sphere::new(
        Vec3::new(0.0, 0.0, -4.0),
        1.0,
        Material::emissive(Color::splat(0.65), emission),
    )));
    scene.build_bvh();

    let tracer = PathTracer::default();
    let mut rng = StdRng::seed_from_u64(8);
    let ray = Ray::new(Vec3::ZERO, -Vec3::Z);

    assert_eq!(tracer.cast_ray(&scene, &ray, 0, &mut rng), emission);
    assert_eq!(tracer.cast_ray(&scene, &ray, 1, &mut rng), Color::ZERO);
    assert_eq!(tracer.cast_ray(&scene, &Ray::new(Vec3::ZERO, Vec3::Z), 0, &mut rng), Color::ZERO);
}

#[test]
fn mean_path_length_follows_russian_roulette() {
    init_logging();
    let scene = dark_sphere();
    let mut rng = StdRng::seed_from_u64(21);

    for p in [0.5f32, 0.8] {
        let tracer = PathTracer::new(IntegratorConfig {
            russian_roulette: p,
            max_depth: 10_000,
            ..IntegratorConfig::default()
        });

        let n = 20_000;
        let total: u64 = (0..n)
            .map(|i| {
                let dir = Vec3::new((i as f32).sin(), (i as f32 * 0.7).cos(), 0.5).normalize();
                let path = tracer.trace_path(&scene, &Ray::new(Vec3::ZERO, dir), 0, &mut rng);
                assert_eq!(path.radiance, Color::ZERO);
                u64::from(path.vertices)
            })
            .sum();

        let mean = total as f32 / n as f32;
        let expected = 1.0 / (1.0 - p);
        assert!((mean - expected).abs() < 0.05 * expected, "p={p} mean={mean}");
    }
}

#[test]
fn cornell_box_radiance_is_finite_and_non_negative() {
    init_logging();
    let scene = cornell_box(SplitMethod::Sah);
    let camera = cornell_box_camera(24, 24);
    let config = RenderConfig {
        samples_per_pixel: 2,
        bucket_size: 8,
        seed: 3,
        ..RenderConfig::default()
    };

    let image = render(&camera, &scene, &config);
    assert_eq!(image.pixels.len(), 24 * 24);
    for c in &image.pixels {
        assert!(c.is_finite(), "{c:?}");
        assert!(c.min_element() >= 0.0, "{c:?}");
    }

    // The box is lit: the average pixel is clearly not black
    let mean = image.pixels.iter().copied().sum::<Color>() / image.pixels.len() as f32;
    assert!(mean.max_element() > 0.05, "mean={mean:?}");
}

#[test]
fn cornell_box_walls_tint_the_floor() {
    init_logging();
    let scene = cornell_box(SplitMethod::Sah);
    let tracer = PathTracer::default();
    let mut rng = StdRng::seed_from_u64(17);

    // Average radiance leaving the floor near each side wall
    let mut estimate = |x: f32| {
        let ray = Ray::new(Vec3::new(x, 100.0, 120.0), Vec3::new(0.0, -1.0, 0.2).normalize());
        let n = 3000;
        (0..n).map(|_| tracer.cast_ray(&scene, &ray, 0, &mut rng)).sum::<Color>() / n as f32
    };

    let near_red = estimate(530.0);
    let near_green = estimate(20.0);
    assert!(near_red.x / near_red.y > near_green.x / near_green.y);
}

#[test]
fn short_block_top_sees_the_light() {
    init_logging();
    let scene = cornell_box(SplitMethod::Sah);
    let tracer = PathTracer::new(IntegratorConfig {
        russian_roulette: 0.0,
        ..IntegratorConfig::default()
    });
    let mut rng = StdRng::seed_from_u64(2);

    let top = Ray::new(Vec3::new(200.0, 200.0, 150.0), -Vec3::Y);
    let hit = scene.intersect(&top);
    assert!(hit.happened);
    assert!((hit.coords.y - 165.0).abs() < 1e-3);

    let lit = (0..500)
        .map(|_| tracer.cast_ray(&scene, &top, 0, &mut rng))
        .sum::<Color>();
    assert!(lit.max_element() > 0.0);
}
