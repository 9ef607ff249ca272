//! Ray casting against triangle meshes

use meshpick_core::{Point3f, TriangleMesh, Vector3f};

const PARALLEL_EPSILON: f32 = 1e-8;

/// A half-line starting at `origin`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3f,
    pub direction: Vector3f,
}

impl Ray {
    /// Create a ray; the direction is normalized so hit distances are in world units
    pub fn new(origin: Point3f, direction: Vector3f) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Ray from `origin` through `through`
    pub fn through(origin: Point3f, through: Point3f) -> Self {
        Self::new(origin, through - origin)
    }

    pub fn at(&self, distance: f32) -> Point3f {
        self.origin + self.direction * distance
    }
}

/// Where a ray first meets a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Point3f,
    pub face: usize,
    pub distance: f32,
}

/// Möller–Trumbore intersection, double sided.
///
/// Returns the distance along the ray, or `None` when the ray misses or
/// runs parallel to the triangle.
pub fn intersect_triangle(ray: &Ray, a: &Point3f, b: &Point3f, c: &Point3f) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    let h = ray.direction.cross(&edge2);
    let det = edge1.dot(&h);
    if det.abs() < PARALLEL_EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - a;
    let u = inv_det * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = inv_det * ray.direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = inv_det * edge2.dot(&q);
    (t > PARALLEL_EPSILON).then_some(t)
}

/// Nearest intersection of `ray` with any face of `mesh`
pub fn pick_mesh(mesh: &TriangleMesh, ray: &Ray) -> Option<RayHit> {
    let mut best: Option<RayHit> = None;
    for face in 0..mesh.faces.len() {
        let [a, b, c] = mesh.triangle(face);
        if let Some(distance) = intersect_triangle(ray, &a, &b, &c) {
            if best.map_or(true, |hit| distance < hit.distance) {
                best = Some(RayHit {
                    point: ray.at(distance),
                    face,
                    distance,
                });
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ray_hits_triangle() {
        let ray = Ray::new(Point3f::new(0.2, 0.2, 5.0), Vector3f::new(0.0, 0.0, -2.0));
        let t = intersect_triangle(
            &ray,
            &Point3f::new(0.0, 0.0, 0.0),
            &Point3f::new(1.0, 0.0, 0.0),
            &Point3f::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        assert_relative_eq!(t, 5.0, epsilon = 1e-6);
        assert_relative_eq!(ray.at(t), Point3f::new(0.2, 0.2, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_ray_misses() {
        let a = Point3f::new(0.0, 0.0, 0.0);
        let b = Point3f::new(1.0, 0.0, 0.0);
        let c = Point3f::new(0.0, 1.0, 0.0);

        let outside = Ray::new(Point3f::new(0.8, 0.8, 1.0), Vector3f::new(0.0, 0.0, -1.0));
        assert!(intersect_triangle(&outside, &a, &b, &c).is_none());

        let behind = Ray::new(Point3f::new(0.2, 0.2, 1.0), Vector3f::new(0.0, 0.0, 1.0));
        assert!(intersect_triangle(&behind, &a, &b, &c).is_none());

        let parallel = Ray::new(Point3f::new(0.2, 0.2, 0.0), Vector3f::new(1.0, 0.0, 0.0));
        assert!(intersect_triangle(&parallel, &a, &b, &c).is_none());
    }

    #[test]
    fn test_pick_mesh_returns_front_face() {
        let mesh = TriangleMesh::cuboid(Point3f::origin(), Point3f::new(1.0, 1.0, 1.0));
        let ray = Ray::through(Point3f::new(0.4, 0.7, 4.0), Point3f::new(0.4, 0.7, 0.0));
        let hit = pick_mesh(&mesh, &ray).unwrap();
        assert_relative_eq!(hit.point, Point3f::new(0.4, 0.7, 1.0), epsilon = 1e-5);
        assert_relative_eq!(hit.distance, 3.0, epsilon = 1e-5);
        assert!(hit.face == 2 || hit.face == 3);
    }

    #[test]
    fn test_pick_mesh_miss() {
        let mesh = TriangleMesh::cuboid(Point3f::origin(), Point3f::new(1.0, 1.0, 1.0));
        let ray = Ray::new(Point3f::new(3.0, 3.0, 3.0), Vector3f::new(1.0, 0.0, 0.0));
        assert!(pick_mesh(&mesh, &ray).is_none());
    }
}
