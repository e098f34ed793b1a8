//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel using rayon. Each bucket draws its
//! samples from a PRNG seeded from the render seed and the bucket
//! index, so a render with the same seed reproduces bit for bit
//! regardless of thread scheduling.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::renderer::{render_pixel, ImageBuffer};
use crate::{Camera, Color, Hittable};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets for an image, sorted in spiral order from center.
///
/// Buckets are rendered from the center outward, the same pattern
/// production renderers use so the most important part of the image
/// finishes first.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let mut buckets = Vec::new();
    let mut index = 0;

    // Generate grid of buckets
    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bucket_size;
        }
        y += bucket_size;
    }

    // Sort by distance from center (spiral order)
    sort_spiral(&mut buckets, width, height);

    // Update indices after sorting
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center (spiral order).
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f64 / 2.0;
    let center_y = height as f64 / 2.0;

    buckets.sort_by(|a, b| {
        let a_center_x = a.x as f64 + a.width as f64 / 2.0;
        let a_center_y = a.y as f64 + a.height as f64 / 2.0;
        let b_center_x = b.x as f64 + b.width as f64 / 2.0;
        let b_center_y = b.y as f64 + b.height as f64 / 2.0;

        let a_dist = (a_center_x - center_x).powi(2) + (a_center_y - center_y).powi(2);
        let b_dist = (b_center_x - center_x).powi(2) + (b_center_y - center_y).powi(2);

        a_dist.partial_cmp(&b_dist).unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Render a single bucket to a vector of colors.
///
/// Returns pixels in row-major order within the bucket. The caller
/// supplies the bucket's PRNG so results stay reproducible.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    world: &dyn Hittable,
    rng: &mut StdRng,
) -> Vec<Color> {
    let mut pixels = Vec::with_capacity((bucket.width * bucket.height) as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let global_x = bucket.x + local_x;
            let global_y = bucket.y + local_y;
            let color = render_pixel(camera, world, global_x, global_y, rng);
            pixels.push(color);
        }
    }

    pixels
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
}

impl BucketResult {
    /// Create a new bucket result.
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }
}

/// Render the full image in parallel, one rayon task per bucket.
///
/// Every bucket gets its own PRNG seeded from `seed` and the bucket
/// index, so the output is identical across runs and thread counts.
pub fn render_parallel(camera: &Camera, world: &dyn Hittable, seed: u64) -> ImageBuffer {
    let width = camera.image_width;
    let height = camera.image_height();
    let buckets = generate_buckets(width, height, DEFAULT_BUCKET_SIZE);
    let total = buckets.len();

    log::info!(
        "rendering {} buckets ({}x{} px, {} spp)",
        total,
        width,
        height,
        camera.samples_per_pixel
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let mut rng = StdRng::seed_from_u64(seed ^ bucket.index as u64);
            let pixels = render_bucket(bucket, camera, world, &mut rng);
            log::debug!("bucket {}/{} done", bucket.index + 1, total);
            BucketResult::new(*bucket, pixels)
        })
        .collect();

    let mut image = ImageBuffer::new(width, height);
    for result in results {
        let b = result.bucket;
        for local_y in 0..b.height {
            for local_x in 0..b.width {
                let color = result.pixels[(local_y * b.width + local_x) as usize];
                image.set(b.x + local_x, b.y + local_y, color);
            }
        }
    }

    log::info!("done");
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HittableList, Lambertian, Sphere, Vec3};
    use std::sync::Arc;

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid

        // Total pixels should equal image size
        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(100, 100, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid with partial buckets

        // Total pixels should equal image size
        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 100);
    }

    #[test]
    fn test_spiral_order() {
        let buckets = generate_buckets(192, 192, 64);
        assert_eq!(buckets.len(), 9); // 3x3 grid

        // First bucket should be the center one
        let first = &buckets[0];
        assert_eq!(first.x, 64);
        assert_eq!(first.y, 64);
    }

    #[test]
    fn test_parallel_matches_seed() {
        // Two renders with the same seed are bit-identical.
        let mut world = HittableList::new();
        world.add(Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Arc::new(Lambertian::from_color(Color::new(0.5, 0.5, 0.5))),
        )));

        let mut camera = Camera::new()
            .with_image(1.0, 16)
            .with_quality(2, 3)
            .with_background(Color::new(0.7, 0.8, 1.0));
        camera.initialize();

        let a = render_parallel(&camera, &world, 7);
        let b = render_parallel(&camera, &world, 7);
        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn test_parallel_covers_every_pixel() {
        // Solid background, empty world: every pixel carries the
        // background color, including partial edge buckets.
        let world = HittableList::new();
        let background = Color::new(0.25, 0.5, 0.75);
        let mut camera = Camera::new()
            .with_image(1.0, 70)
            .with_quality(1, 1)
            .with_background(background);
        camera.initialize();

        let image = render_parallel(&camera, &world, 0);
        assert_eq!(image.width, 70);
        assert_eq!(image.height, 70);
        for color in &image.pixels {
            assert_eq!(*color, background);
        }
    }
}
