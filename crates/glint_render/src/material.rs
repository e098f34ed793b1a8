//! Material trait for surface scattering and emission.

use std::sync::Arc;

use glint_math::{near_zero, reflect, refract, Color, Point3, Ray};
use rand::RngCore;

use crate::hittable::HitRecord;
use crate::sampling::{gen_f64, random_unit_vector};
use crate::texture::{SolidColor, Texture};

/// Outcome of a successful scatter: the attenuation applied to the
/// incoming radiance and the continuation ray.
pub struct ScatterResult {
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns Some(ScatterResult) if the ray scatters, or None if the
    /// ray is absorbed and the path terminates at this surface.
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult>;

    /// Get emitted light from this material.
    ///
    /// Returns the radiance emitted at the given UV coordinates and point.
    /// Most materials return black (no emission).
    fn emitted(&self, _u: f64, _v: f64, _p: Point3) -> Color {
        Color::ZERO
    }
}

/// Lambertian (diffuse) material.
pub struct Lambertian {
    tex: Arc<dyn Texture>,
}

impl Lambertian {
    /// Create a Lambertian material from a texture.
    pub fn new(tex: Arc<dyn Texture>) -> Self {
        Self { tex }
    }

    /// Create a Lambertian material with a constant albedo.
    pub fn from_color(albedo: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(albedo)))
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        // Cosine-weighted hemisphere sampling around the normal
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if near_zero(scatter_direction) {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.tex.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, scatter_direction, ray_in.time()),
        })
    }
}

/// Metal (specular) material.
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: the color of the metal
    /// - `fuzz`: roughness, 0.0 = perfect mirror, 1.0 = very rough;
    ///   clamped to [0, 1] at construction
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction(), rec.normal);
        let scattered_dir = reflected.normalize() + self.fuzz * random_unit_vector(rng);

        // Only scatter if the reflected ray stays above the surface
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, scattered_dir, ray_in.time()),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
pub struct Dielectric {
    /// Index of refraction
    refraction_index: f64,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `refraction_index`: 1.0 = air, 1.5 = glass, 2.4 = diamond
    pub fn new(refraction_index: f64) -> Self {
        Self { refraction_index }
    }

    /// Schlick's approximation for reflectance.
    fn reflectance(cosine: f64, refraction_index: f64) -> f64 {
        let r0 = ((1.0 - refraction_index) / (1.0 + refraction_index)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        // Glass absorbs nothing
        let attenuation = Color::ONE;
        let ri = if rec.front_face {
            1.0 / self.refraction_index
        } else {
            self.refraction_index
        };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Total internal reflection
        let cannot_refract = ri * sin_theta > 1.0;

        let direction = if cannot_refract || Self::reflectance(cos_theta, ri) > gen_f64(rng) {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, ri)
        };

        Some(ScatterResult {
            attenuation,
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

/// Diffuse light emitter.
pub struct DiffuseLight {
    tex: Arc<dyn Texture>,
}

impl DiffuseLight {
    /// Create a diffuse light from a texture.
    pub fn new(tex: Arc<dyn Texture>) -> Self {
        Self { tex }
    }

    /// Create a diffuse light with a constant emission color.
    pub fn from_color(emit: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(emit)))
    }
}

impl Material for DiffuseLight {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        // Lights don't scatter rays
        None
    }

    fn emitted(&self, u: f64, v: f64, p: Point3) -> Color {
        self.tex.value(u, v, p)
    }
}

/// Isotropic material: scatters uniformly over the sphere.
/// Used for participating media.
pub struct Isotropic {
    tex: Arc<dyn Texture>,
}

impl Isotropic {
    pub fn new(tex: Arc<dyn Texture>) -> Self {
        Self { tex }
    }

    pub fn from_color(albedo: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(albedo)))
    }
}

impl Material for Isotropic {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        Some(ScatterResult {
            attenuation: self.tex.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, random_unit_vector(rng), ray_in.time()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn front_hit(normal: Vec3) -> HitRecord<'static> {
        HitRecord {
            p: Vec3::ZERO,
            normal,
            t: 1.0,
            front_face: true,
            ..HitRecord::default()
        }
    }

    #[test]
    fn test_lambertian_always_scatters() {
        let mat = Lambertian::from_color(Color::new(0.5, 0.5, 0.5));
        let rec = front_hit(Vec3::Y);
        let ray = Ray::new_simple(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..100 {
            let result = mat.scatter(&ray, &rec, &mut rng).expect("diffuse scatter");
            assert_eq!(result.attenuation, Color::new(0.5, 0.5, 0.5));
            // Degenerate directions fall back to the normal, never zero.
            assert!(result.scattered.direction().length_squared() > 0.0);
        }
    }

    #[test]
    fn test_lambertian_keeps_ray_time() {
        let mat = Lambertian::from_color(Color::ONE);
        let rec = front_hit(Vec3::Y);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0), 0.37);
        let mut rng = StdRng::seed_from_u64(1);

        let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
        assert_eq!(result.scattered.time(), 0.37);
    }

    #[test]
    fn test_metal_fuzz_clamped() {
        // A fuzz above 1 is clamped at construction; scattered rays that
        // would dip below the surface are absorbed instead.
        let mat = Metal::new(Color::new(0.8, 0.8, 0.8), 5.0);
        let rec = front_hit(Vec3::Y);
        let ray = Ray::new_simple(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(2);

        for _ in 0..200 {
            if let Some(result) = mat.scatter(&ray, &rec, &mut rng) {
                assert!(result.scattered.direction().dot(rec.normal) > 0.0);
            }
        }
    }

    #[test]
    fn test_metal_mirror_reflects_exactly() {
        let mat = Metal::new(Color::ONE, 0.0);
        let rec = front_hit(Vec3::Y);
        let ray = Ray::new_simple(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(3);

        let result = mat.scatter(&ray, &rec, &mut rng).expect("mirror scatter");
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((result.scattered.direction() - expected).length() < 1e-12);
    }

    #[test]
    fn test_dielectric_attenuation_is_white() {
        let mat = Dielectric::new(1.5);
        let rec = front_hit(Vec3::Y);
        let ray = Ray::new_simple(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.3, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(4);

        for _ in 0..50 {
            let result = mat.scatter(&ray, &rec, &mut rng).expect("glass scatter");
            assert_eq!(result.attenuation, Color::ONE);
        }
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        // Ray inside the glass (back face, ratio = eta) at a grazing
        // angle beyond the critical angle must reflect in every sample.
        let eta = 1.5;
        let mat = Dielectric::new(eta);

        let normal = Vec3::Y;
        let rec = HitRecord {
            p: Vec3::ZERO,
            normal,
            t: 1.0,
            front_face: false,
            ..HitRecord::default()
        };

        // sin_theta = 0.995 > 1/eta = 0.667: cannot refract.
        let sin_theta: f64 = 0.995;
        let cos_theta = (1.0 - sin_theta * sin_theta).sqrt();
        let incoming = Vec3::new(sin_theta, -cos_theta, 0.0);
        let ray = Ray::new_simple(Vec3::new(0.0, 1.0, 0.0), incoming);

        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let result = mat.scatter(&ray, &rec, &mut rng).expect("glass scatter");
            let expected = reflect(incoming, normal);
            assert!((result.scattered.direction() - expected).length() < 1e-12);
        }
    }

    #[test]
    fn test_diffuse_light_emits_and_absorbs() {
        let mat = DiffuseLight::from_color(Color::new(4.0, 4.0, 4.0));
        let rec = front_hit(Vec3::Y);
        let ray = Ray::new_simple(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(6);

        assert!(mat.scatter(&ray, &rec, &mut rng).is_none());
        assert_eq!(mat.emitted(0.5, 0.5, Vec3::ZERO), Color::new(4.0, 4.0, 4.0));
    }

    #[test]
    fn test_default_emission_is_black() {
        let mat = Lambertian::from_color(Color::ONE);
        assert_eq!(mat.emitted(0.0, 0.0, Vec3::ZERO), Color::ZERO);
    }

    #[test]
    fn test_isotropic_scatters_any_direction() {
        let mat = Isotropic::from_color(Color::new(0.2, 0.4, 0.6));
        let rec = front_hit(Vec3::Y);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0), 0.8);
        let mut rng = StdRng::seed_from_u64(7);

        let result = mat.scatter(&ray, &rec, &mut rng).expect("volume scatter");
        assert_eq!(result.attenuation, Color::new(0.2, 0.4, 0.6));
        assert_eq!(result.scattered.time(), 0.8);
        assert!((result.scattered.direction().length() - 1.0).abs() < 1e-9);
    }
}
