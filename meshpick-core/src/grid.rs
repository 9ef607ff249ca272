//! Uniform 3D sampling lattice laid over a bounding box

use crate::error::{Error, Result};
use crate::mesh::TriangleMesh;
use crate::point::*;
use crate::point_cloud::PointCloud3f;
use crate::traits::Drawable;
use serde::{Deserialize, Serialize};

/// Largest lattice accepted, in points
pub const MAX_GRID_POINTS: usize = 1 << 24;

/// A `dim × dim × dim` lattice with uniform spacing per axis.
///
/// Points are enumerated with x varying fastest, then y, then z, so the
/// point at lattice coordinate `(i, j, k)` has index `i + j·dim + k·dim²`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniformGrid {
    origin: Point3f,
    spacing: Vector3f,
    dim: usize,
}

impl UniformGrid {
    /// Build a lattice whose corners coincide with `min` and `max`
    pub fn from_bounds(min: Point3f, max: Point3f, dim: usize) -> Result<Self> {
        if dim < 2 {
            return Err(Error::InvalidData(format!(
                "grid resolution must be at least 2, got {}",
                dim
            )));
        }
        let count = dim.checked_mul(dim).and_then(|square| square.checked_mul(dim));
        if !count.is_some_and(|count| count <= MAX_GRID_POINTS) {
            return Err(Error::InvalidData(format!(
                "grid resolution {} exceeds the limit of {} points",
                dim, MAX_GRID_POINTS
            )));
        }
        let steps = (dim - 1) as f32;
        Ok(Self {
            origin: min,
            spacing: (max - min) / steps,
            dim,
        })
    }

    /// Build a lattice over the axis-aligned bounding box of a mesh
    pub fn over_mesh(mesh: &TriangleMesh, dim: usize) -> Result<Self> {
        if mesh.vertices.is_empty() {
            return Err(Error::InvalidData("cannot build a grid over an empty mesh".to_string()));
        }
        let (min, max) = mesh.bounding_box();
        Self::from_bounds(min, max, dim)
    }

    /// Lattice point `(0, 0, 0)`
    pub fn origin(&self) -> Point3f {
        self.origin
    }

    /// Distance between neighbours along each axis
    pub fn spacing(&self) -> Vector3f {
        self.spacing
    }

    /// Number of points along each axis
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Total number of lattice points (`dim³`)
    pub fn point_count(&self) -> usize {
        self.dim * self.dim * self.dim
    }

    /// Flat index of lattice coordinate `(i, j, k)`
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        i + j * self.dim + k * self.dim * self.dim
    }

    /// Position of lattice coordinate `(i, j, k)`
    pub fn point(&self, i: usize, j: usize, k: usize) -> Point3f {
        Point3f::new(
            self.origin.x + i as f32 * self.spacing.x,
            self.origin.y + j as f32 * self.spacing.y,
            self.origin.z + k as f32 * self.spacing.z,
        )
    }

    /// All lattice points in enumeration order
    pub fn points(&self) -> PointCloud3f {
        let n = self.dim;
        (0..n)
            .flat_map(|k| (0..n).flat_map(move |j| (0..n).map(move |i| (i, j, k))))
            .map(|(i, j, k)| self.point(i, j, k))
            .collect()
    }

    /// Wireframe edges between axis neighbours, as index pairs into [`Self::points`].
    ///
    /// There are `3·dim²·(dim-1)` of them; no face or cell diagonals.
    pub fn edges(&self) -> Vec<[usize; 2]> {
        let n = self.dim;
        let mut edges = Vec::with_capacity(3 * n * n * (n - 1));
        for k in 0..n {
            for j in 0..n {
                for i in 0..n {
                    let here = self.index(i, j, k);
                    if i + 1 < n {
                        edges.push([here, self.index(i + 1, j, k)]);
                    }
                    if j + 1 < n {
                        edges.push([here, self.index(i, j + 1, k)]);
                    }
                    if k + 1 < n {
                        edges.push([here, self.index(i, j, k + 1)]);
                    }
                }
            }
        }
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_cube() -> TriangleMesh {
        TriangleMesh::cuboid(Point3f::origin(), Point3f::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_point_count_is_dim_cubed() {
        for dim in 2..7 {
            let grid = UniformGrid::over_mesh(&unit_cube(), dim).unwrap();
            assert_eq!(grid.point_count(), dim * dim * dim);
            assert_eq!(grid.points().len(), dim * dim * dim);
        }
    }

    #[test]
    fn test_spacing_per_axis() {
        let grid = UniformGrid::from_bounds(
            Point3f::new(-1.0, 0.0, 2.0),
            Point3f::new(2.0, 4.0, 2.5),
            5,
        )
        .unwrap();
        assert_relative_eq!(grid.spacing().x, 0.75);
        assert_relative_eq!(grid.spacing().y, 1.0);
        assert_relative_eq!(grid.spacing().z, 0.125);
        assert_eq!(grid.origin(), Point3f::new(-1.0, 0.0, 2.0));

        let points = grid.points();
        assert_relative_eq!(points[0], Point3f::new(-1.0, 0.0, 2.0));
        assert_relative_eq!(points[grid.point_count() - 1], Point3f::new(2.0, 4.0, 2.5));
    }

    #[test]
    fn test_enumeration_order_is_x_fastest() {
        let grid = UniformGrid::over_mesh(&unit_cube(), 3).unwrap();
        let points = grid.points();
        assert_relative_eq!(points[1], Point3f::new(0.5, 0.0, 0.0));
        assert_relative_eq!(points[3], Point3f::new(0.0, 0.5, 0.0));
        assert_relative_eq!(points[9], Point3f::new(0.0, 0.0, 0.5));
        assert_relative_eq!(points[grid.index(2, 1, 2)], grid.point(2, 1, 2));
    }

    #[test]
    fn test_edges_join_axis_neighbours_only() {
        for dim in 2..6 {
            let grid = UniformGrid::over_mesh(&unit_cube(), dim).unwrap();
            let points = grid.points();
            let edges = grid.edges();
            assert_eq!(edges.len(), 3 * dim * dim * (dim - 1));

            let step = 1.0 / (dim - 1) as f32;
            for [a, b] in edges {
                let delta = points[b] - points[a];
                let moved_axes = delta.iter().filter(|c| c.abs() > 1e-6).count();
                assert_eq!(moved_axes, 1, "edge {}-{} is a diagonal", a, b);
                assert_relative_eq!(delta.norm(), step, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_rejects_low_resolution() {
        assert!(UniformGrid::over_mesh(&unit_cube(), 1).is_err());
        assert!(UniformGrid::over_mesh(&unit_cube(), 0).is_err());
        assert!(UniformGrid::over_mesh(&TriangleMesh::new(), 4).is_err());
    }

    #[test]
    fn test_rejects_oversized_resolution() {
        let (min, max) = (Point3f::origin(), Point3f::new(1.0, 1.0, 1.0));
        // 256³ is exactly the limit
        let grid = UniformGrid::from_bounds(min, max, 256).unwrap();
        assert_eq!(grid.point_count(), MAX_GRID_POINTS);

        for dim in [257, 2_000, 3_000_000, usize::MAX] {
            match UniformGrid::from_bounds(min, max, dim) {
                Err(Error::InvalidData(msg)) => assert!(msg.contains("exceeds")),
                other => panic!("dim {} accepted: {:?}", dim, other),
            }
        }
    }

    #[test]
    fn test_flat_mesh_collapses_axis() {
        let mesh = TriangleMesh::from_vertices_and_faces(
            vec![Point3f::origin(), Point3f::new(1.0, 0.0, 0.0), Point3f::new(0.0, 1.0, 0.0)],
            vec![[0, 1, 2]],
        );
        let grid = UniformGrid::over_mesh(&mesh, 3).unwrap();
        assert_eq!(grid.spacing().z, 0.0);
        assert!(grid.points().iter().all(|p| p.z == 0.0));
    }
}
