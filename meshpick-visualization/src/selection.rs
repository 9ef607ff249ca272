//! Ordered selection list and the marker that displays it

use crate::scene::{ObjectId, Scene, SceneObject, Style};
use log::debug;
use meshpick_core::{to_array, Point3f, PointCloud3f};
use ndarray::Array2;

/// Points picked so far, in selection order.
///
/// The list is the single source of truth: after every mutation the marker
/// object is removed from the scene and rebuilt from the whole list, and
/// no marker exists while the list is empty.
#[derive(Debug, Clone)]
pub struct Selection {
    points: Vec<Point3f>,
    marker: Option<ObjectId>,
    marker_style: Style,
}

impl Selection {
    /// Empty selection whose marker is drawn with `marker_style`
    pub fn new(marker_style: Style) -> Self {
        Self {
            points: Vec::new(),
            marker: None,
            marker_style,
        }
    }

    /// Append a point and refresh the marker
    pub fn push<S: Scene>(&mut self, scene: &mut S, point: Point3f) {
        self.points.push(point);
        debug!("selected {:?} ({} points)", point, self.points.len());
        self.refresh_marker(scene);
    }

    /// Remove the most recent point; does nothing when the list is empty
    pub fn pop<S: Scene>(&mut self, scene: &mut S) -> Option<Point3f> {
        let point = self.points.pop()?;
        debug!("removed {:?} ({} points left)", point, self.points.len());
        self.refresh_marker(scene);
        Some(point)
    }

    fn refresh_marker<S: Scene>(&mut self, scene: &mut S) {
        if let Some(previous) = self.marker.take() {
            scene.remove(previous);
        }
        if !self.points.is_empty() {
            let marker = SceneObject::points(PointCloud3f::from_points(self.points.clone()))
                .styled(self.marker_style)
                .pickable(false);
            self.marker = Some(scene.add(marker));
        }
    }

    /// Selected points, oldest first
    pub fn points(&self) -> &[Point3f] {
        &self.points
    }

    /// Number of selected points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True while nothing is selected
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Scene handle of the current marker
    pub fn marker(&self) -> Option<ObjectId> {
        self.marker
    }

    /// Copy of the selection as an `n × 3` array
    pub fn to_array(&self) -> Array2<f32> {
        let rows: Vec<[f32; 3]> = self.points.iter().map(to_array).collect();
        Array2::from(rows)
    }
}
