//! Mesh loading and point output

use anyhow::{Context, Result};
use log::{debug, info};
use meshpick_core::{Point3f, TriangleMesh};
use obj::ObjData;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Load an OBJ mesh, or a unit cube when no path is given
pub fn load_mesh(path: Option<&Path>) -> Result<TriangleMesh> {
    let Some(path) = path else {
        info!("no mesh given, using a unit cube");
        return Ok(TriangleMesh::cuboid(Point3f::origin(), Point3f::new(1.0, 1.0, 1.0)));
    };
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mesh = read_obj(BufReader::new(file)).with_context(|| format!("failed to read {}", path.display()))?;
    info!(
        "loaded {} with {} vertices and {} faces",
        path.display(),
        mesh.vertex_count(),
        mesh.face_count()
    );
    Ok(mesh)
}

/// Parse OBJ data; polygons with more than three corners are fan triangulated
pub fn read_obj<R: Read>(input: R) -> Result<TriangleMesh> {
    let data = ObjData::load_buf(input)?;
    let vertices = data
        .position
        .iter()
        .map(|p| Point3f::new(p[0], p[1], p[2]))
        .collect();

    let mut faces = Vec::new();
    for polygon in data
        .objects
        .iter()
        .flat_map(|object| &object.groups)
        .flat_map(|group| &group.polys)
    {
        let corners: Vec<usize> = polygon.0.iter().map(|tuple| tuple.0).collect();
        if corners.len() < 3 {
            debug!("skipping polygon with {} corners", corners.len());
            continue;
        }
        for i in 1..corners.len() - 1 {
            faces.push([corners[0], corners[i], corners[i + 1]]);
        }
    }

    Ok(TriangleMesh::from_vertices_and_faces(vertices, faces))
}

/// One `x y z` line per point
pub fn write_points<W: Write>(points: &[Point3f], output: W) -> std::io::Result<()> {
    let mut output = BufWriter::new(output);
    for point in points {
        writeln!(output, "{} {} {}", point.x, point.y, point.z)?;
    }
    output.flush()
}

/// Write points to a file
pub fn save_points(points: &[Point3f], path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    write_points(points, file).with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote {} points to {}", points.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD_AND_TRIANGLE: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0 0 1
f 1 2 3 4
f 1 2 5
";

    #[test]
    fn test_read_obj_triangulates() {
        let mesh = read_obj(QUAD_AND_TRIANGLE.as_bytes()).unwrap();
        assert_eq!(mesh.vertex_count(), 5);
        assert_eq!(mesh.faces, vec![[0, 1, 2], [0, 2, 3], [0, 1, 4]]);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_read_obj_without_faces_fails_validation() {
        let mesh = read_obj("v 0 0 0\nv 1 0 0\n".as_bytes()).unwrap();
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_default_mesh_is_unit_cube() {
        let mesh = load_mesh(None).unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 12);
    }

    #[test]
    fn test_write_points() {
        let mut buffer = Vec::new();
        write_points(&[Point3f::new(1.0, 2.5, -3.0), Point3f::origin()], &mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "1 2.5 -3\n0 0 0\n");
    }
}
