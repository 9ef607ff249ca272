//! Nearest neighbor search implementations

use meshpick_core::{to_array, NearestNeighborSearch, Point2f, Point3f};
use rstar::{primitives::GeomWithData, PointDistance, RTree};

type IndexedPoint = GeomWithData<[f32; 3], usize>;

/// R*-tree backed nearest neighbor search, used for mesh vertex queries.
///
/// Equidistant candidates resolve to the lowest index.
pub struct SpatialIndex {
    tree: RTree<IndexedPoint>,
}

impl SpatialIndex {
    /// Index `points`; query results refer to positions in this slice
    pub fn new(points: &[Point3f]) -> Self {
        let entries = points
            .iter()
            .enumerate()
            .map(|(idx, point)| IndexedPoint::new(to_array(point), idx))
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl NearestNeighborSearch for SpatialIndex {
    fn find_nearest(&self, query: &Point3f) -> Option<(usize, f32)> {
        let query = to_array(query);
        let nearest = self.tree.nearest_neighbor(&query)?;
        let best = nearest.distance_2(&query);
        let idx = self
            .tree
            .locate_within_distance(query, best)
            .map(|entry| entry.data)
            .min()
            .unwrap_or(nearest.data);
        Some((idx, best.sqrt()))
    }
}

/// Index of the screen-space candidate closest to `query`.
///
/// Ties resolve to the first candidate in slice order. Candidates with NaN
/// coordinates never match; `None` if no candidate qualifies.
pub fn nearest_screen_point(candidates: &[Point2f], query: &Point2f) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, candidate) in candidates.iter().enumerate() {
        let distance = nalgebra::distance(candidate, query);
        if distance.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((idx, distance));
        }
    }
    best.map(|(idx, _)| idx)
}
