//! Planar primitives: parallelogram (quad) and triangle.
//!
//! Both share the same representation: a corner point and two side
//! vectors spanning a plane. A hit is found on the plane first, then
//! accepted or rejected by the primitive's planar-coordinate gate.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    HittableList, Material, Ray,
};
use glint_math::{Aabb, Interval, Point3, Vec3};

/// A parallelogram defined by a corner and two side vectors.
pub struct Quad {
    corner: Point3,
    side_a: Vec3,
    side_b: Vec3,
    material: Arc<dyn Material>,
    /// Unit plane normal
    normal: Vec3,
    /// Plane offset: dot(normal, x) + d = 0 for points x on the plane
    d: f64,
    /// Decode vector for planar coordinates: (A x B) / dot(A x B, A x B)
    w: Vec3,
    bbox: Aabb,
}

impl Quad {
    /// Create a new parallelogram.
    ///
    /// Collinear side vectors produce a zero cross product; the quad is
    /// retained but its hit test can never accept (NaN planar
    /// coordinates fail the gate), so it contributes no radiance.
    pub fn new(corner: Point3, side_a: Vec3, side_b: Vec3, material: Arc<dyn Material>) -> Self {
        let n = side_a.cross(side_b);
        let normal = n.normalize_or_zero();
        let d = -normal.dot(corner);
        let w = n / n.dot(n);

        // Bounding box of all four vertices
        let diag1 = Aabb::from_points(corner, corner + side_a + side_b);
        let diag2 = Aabb::from_points(corner + side_a, corner + side_b);
        let bbox = Aabb::surrounding(&diag1, &diag2);

        Self {
            corner,
            side_a,
            side_b,
            material,
            normal,
            d,
            w,
            bbox,
        }
    }

    /// Plane intersection shared by quad and triangle; `gate` decides
    /// whether the planar coordinates (alpha, beta) lie inside the
    /// primitive.
    fn hit_planar<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        gate: fn(f64, f64) -> bool,
    ) -> bool {
        let denom = self.normal.dot(ray.direction());

        // No hit if the ray is parallel to the plane.
        if denom.abs() < 1e-8 {
            return false;
        }

        // Reject if the hit point parameter t is outside the ray interval.
        let t = (-self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return false;
        }

        // Decode the hit point into plane coordinates.
        let intersection = ray.at(t);
        let planar_hit = intersection - self.corner;
        let alpha = self.w.dot(planar_hit.cross(self.side_b));
        let beta = self.w.dot(self.side_a.cross(planar_hit));

        if !gate(alpha, beta) {
            return false;
        }

        rec.t = t;
        rec.p = intersection;
        rec.u = alpha;
        rec.v = beta;
        rec.material = self.material.as_ref();
        rec.set_face_normal(ray, self.normal);

        true
    }
}

impl Hittable for Quad {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        self.hit_planar(ray, ray_t, rec, |a, b| {
            (0.0..=1.0).contains(&a) && (0.0..=1.0).contains(&b)
        })
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// A triangle sharing the quad's representation, gated by barycentric
/// coordinates.
pub struct Tri(Quad);

impl Tri {
    /// Create a triangle with corner `o` and edge vectors `a`, `b`.
    ///
    /// The bounding box is the surrounding parallelogram's: a
    /// conservative superset of the triangle's true box.
    pub fn new(corner: Point3, side_a: Vec3, side_b: Vec3, material: Arc<dyn Material>) -> Self {
        Self(Quad::new(corner, side_a, side_b, material))
    }
}

impl Hittable for Tri {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        self.0
            .hit_planar(ray, ray_t, rec, |a, b| a >= 0.0 && b >= 0.0 && a + b <= 1.0)
    }

    fn bounding_box(&self) -> Aabb {
        self.0.bbox
    }
}

/// The six quads of the 3D box spanned by two opposite vertices.
///
/// Degenerate axes (equal coordinates) produce zero-area quads that
/// never hit; callers should ensure non-degeneracy.
pub fn box_sides(a: Point3, b: Point3, material: Arc<dyn Material>) -> HittableList {
    let mut sides = HittableList::new();

    let min = Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z));
    let max = Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z));

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    // front
    sides.add(Box::new(Quad::new(
        Point3::new(min.x, min.y, max.z),
        dx,
        dy,
        material.clone(),
    )));
    // right
    sides.add(Box::new(Quad::new(
        Point3::new(max.x, min.y, max.z),
        -dz,
        dy,
        material.clone(),
    )));
    // back
    sides.add(Box::new(Quad::new(
        Point3::new(max.x, min.y, min.z),
        -dx,
        dy,
        material.clone(),
    )));
    // left
    sides.add(Box::new(Quad::new(
        Point3::new(min.x, min.y, min.z),
        dz,
        dy,
        material.clone(),
    )));
    // top
    sides.add(Box::new(Quad::new(
        Point3::new(min.x, max.y, max.z),
        dx,
        -dz,
        material.clone(),
    )));
    // bottom
    sides.add(Box::new(Quad::new(
        Point3::new(min.x, min.y, min.z),
        dx,
        dz,
        material,
    )));

    sides
}
