//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with fixed-depth termination
//! - Gamma correction
//! - Anti-aliasing via multi-sampling
//! - PPM (P3) image output

use std::io::{self, Write};

use crate::{Camera, HitRecord, Hittable, Ray};
use glint_math::{Color, Interval};
use rand::RngCore;

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It traces the ray through
/// the scene, bouncing off surfaces and accumulating color. Recursion
/// is bounded by `depth`; rays that miss everything pick up the
/// background color.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    background: Color,
    rng: &mut dyn RngCore,
) -> Color {
    // If we've exceeded max depth, no more light is gathered
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();

    // t_min of 0.001 suppresses self-intersection (shadow acne)
    if !world.hit(ray, Interval::new(0.001, f64::INFINITY), &mut rec) {
        return background;
    }

    // Emission contributes whether or not the ray scatters
    let emission = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered_color = ray_color(&result.scattered, world, depth - 1, background, rng);
            emission + result.attenuation * scattered_color
        }
        None => {
            // Ray was absorbed - just return emission
            emission
        }
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Intensity range used when quantizing a channel to 8 bits.
const INTENSITY: Interval = Interval {
    min: 0.0,
    max: 0.999,
};

/// Convert a linear color to gamma-corrected 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let r = linear_to_gamma(color.x);
    let g = linear_to_gamma(color.y);
    let b = linear_to_gamma(color.z);

    [
        (255.0 * INTENSITY.clamp(r)) as u8,
        (255.0 * INTENSITY.clamp(g)) as u8,
        (255.0 * INTENSITY.clamp(b)) as u8,
    ]
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel {
        // Camera.get_ray already adds random offset for anti-aliasing
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, camera.max_depth, camera.background, rng);
    }

    // Average the samples
    pixel_color * camera.samples_scale()
}

/// Simple image buffer for storing render output.
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
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Convert to RGBA bytes (for display or PNG saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 4) as usize);
        for color in &self.pixels {
            let [r, g, b] = color_to_rgb8(*color);
            bytes.extend_from_slice(&[r, g, b, 255]);
        }
        bytes
    }
}

/// Write the image as a plain-text portable pixmap (P3).
///
/// Rows go top-to-bottom, pixels left-to-right, one `R G B` triplet per
/// pixel. Progress and diagnostics never touch this stream.
pub fn write_ppm<W: Write>(image: &ImageBuffer, out: &mut W) -> io::Result<()> {
    writeln!(out, "P3")?;
    writeln!(out, "{} {}", image.width, image.height)?;
    writeln!(out, "255")?;

    for y in 0..image.height {
        for x in 0..image.width {
            let [r, g, b] = color_to_rgb8(image.get(x, y));
            writeln!(out, "{} {} {}", r, g, b)?;
        }
    }

    out.flush()
}

/// Render the entire scene to an image buffer.
///
/// Single-threaded reference path: pixels in scan order, top rows
/// first. Scanline progress goes to the log (stderr), not the image.
pub fn render(camera: &Camera, world: &dyn Hittable, rng: &mut dyn RngCore) -> ImageBuffer {
    let height = camera.image_height();
    let mut image = ImageBuffer::new(camera.image_width, height);

    for y in 0..height {
        log::info!("scanlines remaining: {}", height - y);
        for x in 0..camera.image_width {
            let color = render_pixel(camera, world, x, y, rng);
            image.set(x, y, color);
        }
    }
    log::info!("done");

    image
}
