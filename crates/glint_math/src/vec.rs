//! Vector helpers shared by materials and planar primitives.

use crate::Vec3;

/// Returns true if every component is smaller than 1e-8 in magnitude.
///
/// Used to catch degenerate scatter directions before they turn into
/// zero-length rays.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    const EPS: f64 = 1e-8;
    v.x.abs() < EPS && v.y.abs() < EPS && v.z.abs() < EPS
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with the given index ratio.
///
/// Snell's law; `uv` must be unit length and `n` the unit normal against
/// the incoming ray.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_zero() {
        assert!(near_zero(Vec3::new(1e-9, -1e-9, 0.0)));
        assert!(!near_zero(Vec3::new(1e-7, 0.0, 0.0)));
        assert!(!near_zero(Vec3::X));
    }

    #[test]
    fn test_reflect_preserves_length() {
        let v = Vec3::new(1.0, -2.0, 0.5);
        let n = Vec3::Y;
        let r = reflect(v, n);
        assert!((r.length() - v.length()).abs() < 1e-12);
        assert_eq!(r, Vec3::new(1.0, 2.0, 0.5));
    }

    #[test]
    fn test_refract_identity_ratio() {
        // With an index ratio of 1 the direction passes through unchanged.
        let uv = Vec3::new(1.0, -1.0, 0.0).normalize();
        let n = Vec3::Y;
        let refracted = refract(uv, n, 1.0);
        assert!((refracted - uv).length() < 1e-12);
    }

    #[test]
    fn test_refract_bends_towards_normal() {
        // Entering a denser medium bends the ray towards the normal.
        let uv = Vec3::new(1.0, -1.0, 0.0).normalize();
        let n = Vec3::Y;
        let refracted = refract(uv, n, 1.0 / 1.5);
        assert!(refracted.x.abs() < uv.x.abs());
        assert!(refracted.y < 0.0);
    }
}
