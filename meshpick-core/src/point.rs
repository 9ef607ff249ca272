//! Point types and related functionality

use nalgebra::{Point2, Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// A 2D point in screen space, measured in pixels from the top-left corner
pub type Point2f = Point2<f32>;

/// Flatten a point into a plain coordinate array
pub fn to_array(point: &Point3f) -> [f32; 3] {
    [point.x, point.y, point.z]
}
