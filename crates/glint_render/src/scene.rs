//! Build renderable worlds from persisted scene descriptions.

use std::sync::Arc;

use glint_core::{CameraDesc, LightDesc, MaterialKind, QuadDesc, SceneDesc, SphereDesc};

use crate::{
    BvhNode, Camera, Dielectric, DiffuseLight, HittableList, Lambertian, Material, Metal, Quad,
    Sphere,
};
use glint_math::Color;

/// Map a material record to a renderer material.
///
/// `param` is fuzz for metal and refraction index for dielectric.
/// For diffuse light it scales the color into emitted radiance.
fn make_material(kind: MaterialKind, color: Color, param: f64) -> Arc<dyn Material> {
    match kind {
        MaterialKind::Lambertian => Arc::new(Lambertian::from_color(color)),
        MaterialKind::Metal => Arc::new(Metal::new(color, param)),
        MaterialKind::Dielectric => Arc::new(Dielectric::new(param)),
        MaterialKind::DiffuseLight => Arc::new(DiffuseLight::from_color(color * param)),
    }
}

fn build_sphere(desc: &SphereDesc) -> Sphere {
    let material = make_material(desc.material, desc.albedo, desc.param);
    Sphere::new(desc.center, desc.radius, material)
}

fn build_light(desc: &LightDesc) -> Sphere {
    let material = Arc::new(DiffuseLight::from_color(desc.color * desc.intensity));
    Sphere::new(desc.center, desc.radius, material)
}

fn build_quad(desc: &QuadDesc) -> Quad {
    let material = make_material(desc.material, desc.color, desc.param);
    Quad::new(desc.corner, desc.side_a, desc.side_b, material)
}

/// Turn a camera header into an initialized render camera.
pub fn build_camera(desc: &CameraDesc) -> Camera {
    let mut camera = Camera::new()
        .with_image(desc.aspect_ratio, desc.image_width)
        .with_quality(desc.samples_per_pixel, desc.max_depth)
        .with_position(desc.lookfrom, desc.lookat, glint_math::Vec3::Y)
        .with_lens(desc.vfov, desc.defocus_angle, desc.focus_dist)
        .with_background(desc.background);
    camera.initialize();
    camera
}

/// Build the renderable world and camera from a scene description.
///
/// The world is returned behind a BVH so large scenes stay tractable.
pub fn build_scene(desc: &SceneDesc) -> (BvhNode, Camera) {
    let mut world = HittableList::new();

    for sphere in &desc.spheres {
        world.add(Box::new(build_sphere(sphere)));
    }
    for light in &desc.lights {
        world.add(Box::new(build_light(light)));
    }
    for quad in &desc.quads {
        world.add(Box::new(build_quad(quad)));
    }

    log::info!(
        "built scene: {} spheres, {} lights, {} quads",
        desc.spheres.len(),
        desc.lights.len(),
        desc.quads.len()
    );

    (BvhNode::new(world.into_objects()), build_camera(&desc.camera))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ray_color, HitRecord, Hittable};
    use glint_math::{Interval, Ray, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn one_sphere_desc() -> SceneDesc {
        SceneDesc {
            spheres: vec![SphereDesc {
                center: Vec3::new(0.0, 0.0, -2.0),
                radius: 0.5,
                material: MaterialKind::Lambertian,
                albedo: Color::new(0.8, 0.2, 0.2),
                param: 0.0,
            }],
            ..SceneDesc::default()
        }
    }

    #[test]
    fn test_build_scene_world_is_hittable() {
        let (world, _) = build_scene(&one_sphere_desc());

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(world.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
        assert!((rec.t - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_build_camera_from_header() {
        let desc = CameraDesc {
            image_width: 300,
            samples_per_pixel: 8,
            aspect_ratio: 1.5,
            ..CameraDesc::default()
        };
        let camera = build_camera(&desc);
        assert_eq!(camera.image_width, 300);
        assert_eq!(camera.image_height(), 200);
        assert_eq!(camera.samples_per_pixel, 8);
        assert_eq!(camera.background, Color::new(0.70, 0.80, 1.00));
    }

    #[test]
    fn test_light_record_emits_scaled_color() {
        let desc = SceneDesc {
            lights: vec![LightDesc {
                center: Vec3::new(0.0, 0.0, -3.0),
                radius: 1.0,
                color: Color::new(1.0, 0.5, 0.25),
                intensity: 4.0,
            }],
            ..SceneDesc::default()
        };
        let (world, _) = build_scene(&desc);

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(0);
        let color = ray_color(&ray, &world, 5, Color::ZERO, &mut rng);
        assert_eq!(color, Color::new(4.0, 2.0, 1.0));
    }

    #[test]
    fn test_quad_record_builds_geometry() {
        let desc = SceneDesc {
            quads: vec![QuadDesc {
                corner: Vec3::new(-1.0, -1.0, -2.0),
                side_a: Vec3::new(2.0, 0.0, 0.0),
                side_b: Vec3::new(0.0, 2.0, 0.0),
                material: MaterialKind::Metal,
                color: Color::new(0.9, 0.9, 0.9),
                param: 0.1,
            }],
            ..SceneDesc::default()
        };
        let (world, _) = build_scene(&desc);

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(world.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
        assert!((rec.t - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_build_scene_closest_hit_across_record_kinds() {
        // Spheres, lights, and quads all land in one world; the closest
        // primitive along the ray wins regardless of record kind.
        let desc = SceneDesc {
            spheres: vec![SphereDesc {
                center: Vec3::new(0.0, 0.0, -6.0),
                radius: 0.5,
                material: MaterialKind::Lambertian,
                albedo: Color::new(0.5, 0.5, 0.5),
                param: 0.0,
            }],
            lights: vec![LightDesc {
                center: Vec3::new(0.0, 0.0, -10.0),
                radius: 1.0,
                color: Color::ONE,
                intensity: 4.0,
            }],
            quads: vec![QuadDesc {
                corner: Vec3::new(-1.0, -1.0, -3.0),
                side_a: Vec3::new(2.0, 0.0, 0.0),
                side_b: Vec3::new(0.0, 2.0, 0.0),
                material: MaterialKind::Lambertian,
                color: Color::new(0.5, 0.5, 0.5),
                param: 0.0,
            }],
            ..SceneDesc::default()
        };
        let (world, _) = build_scene(&desc);

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(world.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
        assert!((rec.t - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_scene_builds_empty_world() {
        let (world, camera) = build_scene(&SceneDesc::default());
        assert!(matches!(world, BvhNode::Empty));
        assert_eq!(camera.image_width, 400);

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(!world.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
    }
}
