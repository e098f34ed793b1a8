//! Glint Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for physically-based rendering: implicit
//! primitives, a small material palette, and recursive backward path
//! tracing with fixed-depth termination.

mod bucket;
mod bvh;
mod camera;
mod hittable;
mod material;
mod quad;
mod renderer;
mod sampling;
mod scene;
mod sphere;
mod texture;

pub use bucket::{
    generate_buckets, render_bucket, render_parallel, Bucket, BucketResult, DEFAULT_BUCKET_SIZE,
};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterResult,
};
pub use quad::{box_sides, Quad, Tri};
pub use renderer::{color_to_rgb8, ray_color, render, render_pixel, write_ppm, ImageBuffer};
pub use sampling::{
    gen_f64, random_in_unit_disk, random_in_unit_sphere, random_on_hemisphere, random_unit_vector,
};
pub use scene::{build_camera, build_scene};
pub use sphere::Sphere;
pub use texture::{Checker, SolidColor, Texture};

/// Re-export common math types from glint_math
pub use glint_math::{Aabb, Color, Interval, Point3, Ray, Vec3};
