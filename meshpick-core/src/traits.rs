//! Core traits for meshpick

use crate::{mesh::*, point::*, point_cloud::*};

/// Trait for nearest neighbor search functionality
pub trait NearestNeighborSearch {
    /// Find the nearest candidate to a query point, returning its index and distance
    fn find_nearest(&self, query: &Point3f) -> Option<(usize, f32)>;
}

/// Trait for objects with a spatial extent
pub trait Drawable {
    /// Get the axis-aligned bounding box of the object as `(min, max)`
    fn bounding_box(&self) -> (Point3f, Point3f);
}

/// Bounding box of a set of points; the origin twice when empty
pub fn bounds_of<'a, I>(points: I) -> (Point3f, Point3f)
where
    I: IntoIterator<Item = &'a Point3f>,
{
    let mut iter = points.into_iter();
    let Some(first) = iter.next() else {
        return (Point3f::origin(), Point3f::origin());
    };
    iter.fold((*first, *first), |(min, max), p| (min.inf(p), max.sup(p)))
}

impl Drawable for PointCloud<Point3f> {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        bounds_of(self.iter())
    }
}

impl Drawable for TriangleMesh {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        bounds_of(self.vertices.iter())
    }
}
