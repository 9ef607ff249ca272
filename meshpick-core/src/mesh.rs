//! Triangle mesh data structure

use crate::error::{Error, Result};
use crate::point::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A triangle mesh with vertices and faces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Closed axis-aligned box spanning `min` to `max`, two triangles per side,
    /// wound counter-clockwise when seen from outside.
    pub fn cuboid(min: Point3f, max: Point3f) -> Self {
        let vertices = vec![
            Point3f::new(min.x, min.y, min.z),
            Point3f::new(max.x, min.y, min.z),
            Point3f::new(max.x, max.y, min.z),
            Point3f::new(min.x, max.y, min.z),
            Point3f::new(min.x, min.y, max.z),
            Point3f::new(max.x, min.y, max.z),
            Point3f::new(max.x, max.y, max.z),
            Point3f::new(min.x, max.y, max.z),
        ];
        let faces = vec![
            [0, 2, 1], [0, 3, 2], // -z
            [4, 5, 6], [4, 6, 7], // +z
            [0, 1, 5], [0, 5, 4], // -y
            [3, 7, 6], [3, 6, 2], // +y
            [0, 4, 7], [0, 7, 3], // -x
            [1, 2, 6], [1, 6, 5], // +x
        ];
        Self { vertices, faces }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Corner positions of face `index`
    pub fn triangle(&self, index: usize) -> [Point3f; 3] {
        let [a, b, c] = self.faces[index];
        [self.vertices[a], self.vertices[b], self.vertices[c]]
    }

    /// Check that the mesh has geometry and every face references an existing vertex
    pub fn validate(&self) -> Result<()> {
        if self.vertices.is_empty() {
            return Err(Error::InvalidData("mesh has no vertices".to_string()));
        }
        if self.faces.is_empty() {
            return Err(Error::InvalidData("mesh has no faces".to_string()));
        }
        let count = self.vertices.len();
        if let Some((index, face)) = self
            .faces
            .iter()
            .enumerate()
            .find(|(_, face)| face.iter().any(|&v| v >= count))
        {
            return Err(Error::InvalidData(format!(
                "face {} references vertex {:?} but the mesh has {} vertices",
                index, face, count
            )));
        }
        Ok(())
    }

    /// Unique undirected edges, each stored as `[low, high]` and sorted
    pub fn edges(&self) -> Vec<[usize; 2]> {
        let mut edges = BTreeSet::new();
        for face in &self.faces {
            for (a, b) in [(face[0], face[1]), (face[1], face[2]), (face[2], face[0])] {
                edges.insert([a.min(b), a.max(b)]);
            }
        }
        edges.into_iter().collect()
    }

    /// Calculate face normals; degenerate faces get a zero normal
    pub fn calculate_face_normals(&self) -> Vec<Vector3f> {
        (0..self.faces.len())
            .map(|index| {
                let [v0, v1, v2] = self.triangle(index);
                (v1 - v0)
                    .cross(&(v2 - v0))
                    .try_normalize(f32::EPSILON)
                    .unwrap_or_else(Vector3f::zeros)
            })
            .collect()
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cuboid_is_closed() {
        let mesh = TriangleMesh::cuboid(Point3f::origin(), Point3f::new(1.0, 1.0, 1.0));
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 12);
        assert!(mesh.validate().is_ok());
        // 12 cube edges plus one diagonal per side
        assert_eq!(mesh.edges().len(), 18);
    }

    #[test]
    fn test_cuboid_normals_point_outward() {
        let mesh = TriangleMesh::cuboid(Point3f::origin(), Point3f::new(1.0, 1.0, 1.0));
        let center = Point3f::new(0.5, 0.5, 0.5);
        for (index, normal) in mesh.calculate_face_normals().iter().enumerate() {
            let [a, _, _] = mesh.triangle(index);
            assert!(normal.dot(&(a - center)) > 0.0, "face {} points inward", index);
            assert_relative_eq!(normal.norm(), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_validate_rejects_bad_meshes() {
        assert!(TriangleMesh::new().validate().is_err());

        let no_faces = TriangleMesh::from_vertices_and_faces(vec![Point3f::origin()], vec![]);
        assert!(no_faces.validate().is_err());

        let out_of_range = TriangleMesh::from_vertices_and_faces(
            vec![Point3f::origin(), Point3f::new(1.0, 0.0, 0.0), Point3f::new(0.0, 1.0, 0.0)],
            vec![[0, 1, 3]],
        );
        match out_of_range.validate() {
            Err(Error::InvalidData(msg)) => assert!(msg.contains("face 0")),
            other => panic!("expected InvalidData, got {:?}", other),
        }
    }

    #[test]
    fn test_degenerate_face_normal_is_zero() {
        let mesh = TriangleMesh::from_vertices_and_faces(
            vec![Point3f::origin(), Point3f::new(1.0, 0.0, 0.0), Point3f::new(2.0, 0.0, 0.0)],
            vec![[0, 1, 2]],
        );
        assert_eq!(mesh.calculate_face_normals()[0], Vector3f::zeros());
    }
}
