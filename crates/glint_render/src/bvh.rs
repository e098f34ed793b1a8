//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over primitive bounding boxes. Purely an optimization:
//! traversal reports exactly the closest hit the flat list would.

use crate::{HitRecord, Hittable, Ray};
use glint_math::{Aabb, Interval};

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// BVH node - either a branch with two children or a leaf with primitives.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node with a small number of primitives.
    Leaf {
        objects: Vec<Box<dyn Hittable>>,
        bbox: Aabb,
    },
    /// Empty node (for edge cases).
    Empty,
}

impl BvhNode {
    /// Create a BVH from a list of hittable objects.
    pub fn new(objects: Vec<Box<dyn Hittable>>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }
        Self::build(objects)
    }

    /// Recursive BVH construction.
    ///
    /// Simple median-split approach: sort objects by centroid on longest axis,
    /// split in half, recurse.
    fn build(mut objects: Vec<Box<dyn Hittable>>) -> Self {
        let n = objects.len();

        // Compute bounding box of all objects
        let bounds = objects
            .iter()
            .map(|o| o.bounding_box())
            .fold(objects[0].bounding_box(), |acc, b| {
                Aabb::surrounding(&acc, &b)
            });

        // Create leaf for small sets
        if n <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                objects,
                bbox: bounds,
            };
        }

        // Compute centroid bounds to choose split axis
        let centroid_bounds = objects.iter().fold(Aabb::EMPTY, |acc, obj| {
            let c = obj.bounding_box().centroid();
            Aabb::surrounding(&acc, &Aabb::from_points(c, c))
        });

        // Choose split axis based on centroid spread
        let axis = centroid_bounds.longest_axis();

        // Sort objects by centroid on chosen axis
        objects.sort_unstable_by(|a, b| {
            let a_val = a.bounding_box().centroid()[axis];
            let b_val = b.bounding_box().centroid()[axis];
            a_val
                .partial_cmp(&b_val)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // Split at midpoint
        let mid = n / 2;
        let right_objects = objects.split_off(mid);
        let left_objects = objects;

        // Recurse
        let left = Self::build(left_objects);
        let right = Self::build(right_objects);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox: bounds,
        }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        match self {
            BvhNode::Empty => false,

            BvhNode::Leaf { objects, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let mut hit_anything = false;
                let mut closest = ray_t.max;

                for obj in objects {
                    let interval = Interval::new(ray_t.min, closest);
                    if obj.hit(ray, interval, rec) {
                        hit_anything = true;
                        closest = rec.t;
                    }
                }
                hit_anything
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let hit_left = left.hit(ray, ray_t, rec);

                // Only check right up to closest hit
                let right_max = if hit_left { rec.t } else { ray_t.max };
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rec);

                hit_left || hit_right
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HittableList, Lambertian, Sphere};
    use glint_math::{Color, Vec3};
    use std::sync::Arc;

    fn grey() -> Arc<Lambertian> {
        Arc::new(Lambertian::from_color(Color::new(0.5, 0.5, 0.5)))
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = BvhNode::new(vec![]);
        assert!(matches!(bvh, BvhNode::Empty));

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(!bvh.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
    }

    #[test]
    fn test_bvh_single_sphere() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey());

        let objects: Vec<Box<dyn Hittable>> = vec![Box::new(sphere)];
        let bvh = BvhNode::new(objects);

        // Should create a leaf
        assert!(matches!(bvh, BvhNode::Leaf { .. }));

        // Test ray hit
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let spheres: Vec<Box<dyn Hittable>> = (0..10)
            .map(|i| {
                let sphere = Sphere::new(Vec3::new(i as f64, 0.0, -5.0), 0.5, grey());
                Box::new(sphere) as Box<dyn Hittable>
            })
            .collect();

        let bvh = BvhNode::new(spheres);

        // Test ray that hits sphere at x=5
        let ray = Ray::new_simple(Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));

        // Hit point should be near z = -4.5 (sphere at z=-5, radius 0.5)
        assert!((rec.p.z - (-4.5)).abs() < 1e-9);
    }

    #[test]
    fn test_bvh_matches_flat_list() {
        // Same closest-hit answer as the flat list, along an axis where
        // several spheres overlap the ray.
        let make = |list: &mut HittableList, objs: &mut Vec<Box<dyn Hittable>>| {
            for z in [-9.0, -2.0, -5.0, -7.0, -3.0, -11.0] {
                list.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, z), 0.5, grey())));
                objs.push(Box::new(Sphere::new(Vec3::new(0.0, 0.0, z), 0.5, grey())));
            }
        };

        let mut list = HittableList::new();
        let mut objs = Vec::new();
        make(&mut list, &mut objs);
        let bvh = BvhNode::new(objs);

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let mut rec_list = HitRecord::default();
        let mut rec_bvh = HitRecord::default();
        assert!(list.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec_list));
        assert!(bvh.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec_bvh));
        assert!((rec_list.t - rec_bvh.t).abs() < 1e-12);
        assert!((rec_bvh.t - 1.5).abs() < 1e-9);
    }
}
