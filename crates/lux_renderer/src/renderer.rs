//! Image rendering driver.
//!
//! Renders a [`Scene`] through a [`Camera`] with the path tracer:
//! - Multi-sampled pixels with sub-pixel jitter
//! - Parallel bucket rendering with rayon, reproducible for a given seed
//! - Gamma correction on output

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::{Camera, Color, IntegratorConfig, PathTracer, Scene};
use rand::RngCore;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;
use thiserror::Error;

/// Invalid render settings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("samples_per_pixel must be at least 1")]
    ZeroSamples,

    #[error("Image size {width}x{height} has no pixels")]
    ZeroImageSize { width: u32, height: u32 },

    #[error("Russian roulette probability {0} must be in (0, 1]")]
    RussianRoulette(f32),

    #[error("bucket_size must be at least 1")]
    ZeroBucketSize,

    #[error("light_epsilon {0} must be positive")]
    LightEpsilon(f32),
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    pub integrator: IntegratorConfig,
    /// Base seed; every bucket derives its own stream from it
    pub seed: u64,
    /// Edge length of a render bucket in pixels
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 16,
            integrator: IntegratorConfig::default(),
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderConfig {
    /// Check the settings before a render.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if self.bucket_size == 0 {
            return Err(ConfigError::ZeroBucketSize);
        }
        let rr = self.integrator.russian_roulette;
        if rr.is_nan() || rr <= 0.0 || rr > 1.0 {
            return Err(ConfigError::RussianRoulette(rr));
        }
        let eps = self.integrator.light_epsilon;
        if eps.is_nan() || eps <= 0.0 {
            return Err(ConfigError::LightEpsilon(eps));
        }
        Ok(())
    }
}

/// Reject images without pixels.
pub fn validate_resolution(width: u32, height: u32) -> Result<(), ConfigError> {
    if width == 0 || height == 0 {
        return Err(ConfigError::ZeroImageSize { width, height });
    }
    Ok(())
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Clamp a value to [0, 1] range.
#[inline]
fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * clamp_01(linear_to_gamma(color.x))) as u8;
    let g = (255.0 * clamp_01(linear_to_gamma(color.y))) as u8;
    let b = (255.0 * clamp_01(linear_to_gamma(color.z))) as u8;
    [r, g, b, 255]
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    tracer: &PathTracer,
    x: u32,
    y: u32,
    samples_per_pixel: u32,
    rng: &mut dyn RngCore,
) -> Color {
    if samples_per_pixel == 0 {
        return Color::ZERO;
    }

    let mut pixel_color = Color::ZERO;
    for _ in 0..samples_per_pixel {
        let ray = camera.get_ray(x, y, rng);
        pixel_color += tracer.cast_ray(scene, &ray, 0, rng);
    }

    pixel_color / samples_per_pixel as f32
}

/// Simple image buffer for storing render output.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let b = &result.bucket;
        let width = b.width as usize;
        if width == 0 {
            return;
        }
        for (row, colors) in result.pixels.chunks(width).enumerate() {
            let start = self.index(b.x, b.y + row as u32);
            self.pixels[start..start + colors.len()].copy_from_slice(colors);
        }
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|color| color_to_rgba(*color))
            .collect()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Render the whole image in parallel.
///
/// `camera` must already be initialized.
pub fn render(camera: &Camera, scene: &Scene, config: &RenderConfig) -> ImageBuffer {
    render_with_cancel(camera, scene, config, &AtomicBool::new(false))
}

/// Like [`render`], but stops starting new buckets once `cancel` is set.
///
/// Buckets that were already running finish; the rest stay black.
pub fn render_with_cancel(
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
    cancel: &AtomicBool,
) -> ImageBuffer {
    let width = camera.image_width;
    let height = camera.image_height;
    let mut image = ImageBuffer::new(width, height);

    if scene.emit_area_sum() <= 0.0 {
        log::warn!("Scene has no emitting surfaces; the image will be black");
    }

    let buckets = generate_buckets(width, height, config.bucket_size);
    let total = buckets.len();
    log::info!(
        "Rendering {}x{} at {} spp ({} buckets of {}px)",
        width,
        height,
        config.samples_per_pixel,
        total,
        config.bucket_size
    );

    let tracer = PathTracer::new(config.integrator);
    let completed = AtomicUsize::new(0);
    let start = Instant::now();

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .filter_map(|bucket| {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }
            let result = render_bucket(bucket, camera, scene, &tracer, config);
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!("Bucket {} done ({}/{})", bucket.index, done, total);
            Some(result)
        })
        .collect();

    for result in &results {
        image.write_bucket(result);
    }

    let elapsed = start.elapsed();
    if results.len() < total {
        log::warn!(
            "Render cancelled after {}/{} buckets ({:.2?})",
            results.len(),
            total,
            elapsed
        );
    } else {
        log::info!("Render finished in {:.2?}", elapsed);
    }

    image
}
