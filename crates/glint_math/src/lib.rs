// Re-export glam for convenience
pub use glam::*;

/// Double-precision 3-vector used throughout the renderer.
pub type Vec3 = glam::DVec3;

/// Documentary aliases: same representation, different intent.
pub type Point3 = Vec3;
pub type Color = Vec3;

mod aabb;
mod interval;
mod ray;
mod vec;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use vec::{near_zero, reflect, refract};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        let c = a + b;
        assert_eq!(c, Vec3::new(5.0, 7.0, 9.0));
    }
}
