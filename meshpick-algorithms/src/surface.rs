//! Closest-point queries against triangles and triangle meshes

use meshpick_core::{Point3f, TriangleMesh};
use rayon::prelude::*;

/// A point on a mesh surface together with the face it lies on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint {
    pub point: Point3f,
    pub face: usize,
    pub distance: f32,
}

/// Closest point to `p` on triangle `(a, b, c)`.
///
/// Classifies `p` against the Voronoi regions of the triangle's vertices,
/// edges and face, so the result always lies on the triangle.
pub fn closest_point_on_triangle(p: &Point3f, a: &Point3f, b: &Point3f, c: &Point3f) -> Point3f {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return *a;
    }

    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return *b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return a + ab * v;
    }

    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return *c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return a + ac * w;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w;
    }

    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    a + ab * v + ac * w
}

/// Closest point to `query` anywhere on the mesh surface.
///
/// Scans every face in parallel; among equally close faces the lowest face
/// index wins. Returns `None` for a mesh without faces.
pub fn closest_point_on_mesh(mesh: &TriangleMesh, query: &Point3f) -> Option<SurfacePoint> {
    (0..mesh.faces.len())
        .into_par_iter()
        .map(|face| {
            let [a, b, c] = mesh.triangle(face);
            let point = closest_point_on_triangle(query, &a, &b, &c);
            SurfacePoint {
                point,
                face,
                distance: nalgebra::distance(&point, query),
            }
        })
        .min_by(|x, y| {
            x.distance
                .partial_cmp(&y.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(x.face.cmp(&y.face))
        })
}
