//! Scene composition and the capability traits selectors are written against

use crate::camera::{Camera, Viewport};
use crate::event::KeyPressEvent;
use meshpick_algorithms::pick_mesh;
use meshpick_core::{bounds_of, Drawable, Point2f, Point3f, PointCloud3f, Result, TriangleMesh};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Handle to an object added to a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(u64);

/// Appearance of a scene object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// RGB in `[0, 1]`; for text this is the glyph color
    pub color: [f32; 3],
    pub opacity: f32,
    /// Point diameter in pixels
    pub point_size: f32,
    /// Draw mesh edges on top of the faces
    pub show_edges: bool,
}

impl Style {
    pub fn new(color: [f32; 3]) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_point_size(mut self, point_size: f32) -> Self {
        self.point_size = point_size;
        self
    }

    pub fn with_edges(mut self, show_edges: bool) -> Self {
        self.show_edges = show_edges;
        self
    }
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: [0.8, 0.8, 0.8],
            opacity: 1.0,
            point_size: 5.0,
            show_edges: false,
        }
    }
}

/// Screen corner a text overlay is pinned to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Geometry of a scene object
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Mesh(TriangleMesh),
    Wireframe {
        vertices: Vec<Point3f>,
        edges: Vec<[usize; 2]>,
    },
    Points(PointCloud3f),
    Text {
        text: String,
        anchor: TextAnchor,
        background: [f32; 3],
    },
}

/// Something displayed in a scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub kind: ObjectKind,
    pub style: Style,
    pub pickable: bool,
}

impl SceneObject {
    fn with_kind(kind: ObjectKind) -> Self {
        Self {
            kind,
            style: Style::default(),
            pickable: false,
        }
    }

    pub fn mesh(mesh: TriangleMesh) -> Self {
        Self::with_kind(ObjectKind::Mesh(mesh))
    }

    pub fn wireframe(vertices: Vec<Point3f>, edges: Vec<[usize; 2]>) -> Self {
        Self::with_kind(ObjectKind::Wireframe { vertices, edges })
    }

    pub fn points(points: PointCloud3f) -> Self {
        Self::with_kind(ObjectKind::Points(points))
    }

    pub fn text(text: impl Into<String>, anchor: TextAnchor, background: [f32; 3]) -> Self {
        Self::with_kind(ObjectKind::Text {
            text: text.into(),
            anchor,
            background,
        })
    }

    pub fn styled(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Only pickable meshes take part in hit testing
    pub fn pickable(mut self, pickable: bool) -> Self {
        self.pickable = pickable;
        self
    }

    /// World-space bounds; `None` for overlays and empty geometry
    pub fn bounds(&self) -> Option<(Point3f, Point3f)> {
        match &self.kind {
            ObjectKind::Mesh(mesh) if !mesh.vertices.is_empty() => Some(mesh.bounding_box()),
            ObjectKind::Wireframe { vertices, .. } if !vertices.is_empty() => Some(bounds_of(vertices)),
            ObjectKind::Points(points) if !points.is_empty() => Some(points.bounding_box()),
            _ => None,
        }
    }
}

/// Scene composition and picking queries a selector needs
pub trait Scene {
    /// Add an object and return its handle
    fn add(&mut self, object: SceneObject) -> ObjectId;

    /// Remove an object; `false` if the handle is unknown
    fn remove(&mut self, id: ObjectId) -> bool;

    /// Project world points to screen pixels with the current camera
    fn project_to_screen(&self, points: &[Point3f]) -> Vec<Point2f>;

    /// Ask the session to end
    fn close(&mut self);

    fn is_closed(&self) -> bool;
}

/// A scene that can run an interactive session
pub trait Interactive: Scene + Sized {
    /// Block until the session ends, calling `on_key_press` synchronously
    /// for every key press.
    fn show<F>(&mut self, on_key_press: F) -> Result<()>
    where
        F: FnMut(&mut Self, &KeyPressEvent);
}

/// Backend-independent scene state: objects, camera and viewport
#[derive(Debug, Clone)]
pub struct SceneGraph {
    objects: BTreeMap<ObjectId, SceneObject>,
    next_id: u64,
    camera: Camera,
    viewport: Viewport,
    revision: u64,
    closed: bool,
}

impl SceneGraph {
    pub fn new(viewport: Viewport) -> Self {
        let mut camera = Camera::default();
        camera.aspect_ratio = viewport.aspect_ratio();
        Self {
            objects: BTreeMap::new(),
            next_id: 0,
            camera,
            viewport,
            revision: 0,
            closed: false,
        }
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    /// Objects in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects.iter().map(|(id, object)| (*id, object))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.aspect_ratio = viewport.aspect_ratio();
    }

    /// Incremented whenever an object is added or removed
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Point the camera at the bounds of every object with geometry
    pub fn fit_camera(&mut self) {
        let corners: Vec<Point3f> = self
            .objects
            .values()
            .filter_map(SceneObject::bounds)
            .flat_map(|(min, max)| [min, max])
            .collect();
        if corners.is_empty() {
            return;
        }
        let (min, max) = bounds_of(&corners);
        self.camera.fit_bounds(&min, &max);
    }

    /// Nearest pickable mesh hit under a screen position
    pub fn pick(&self, screen: &Point2f) -> Option<(ObjectId, Point3f)> {
        let ray = self.camera.screen_ray(screen, &self.viewport)?;
        self.objects
            .iter()
            .filter(|(_, object)| object.pickable)
            .filter_map(|(id, object)| match &object.kind {
                ObjectKind::Mesh(mesh) => pick_mesh(mesh, &ray).map(|hit| (*id, hit)),
                _ => None,
            })
            .min_by(|(_, a), (_, b)| {
                a.distance
                    .partial_cmp(&b.distance)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(id, hit)| (id, hit.point))
    }

    /// Build the event a key press at `screen` produces
    pub fn key_press(&self, key: impl Into<String>, screen: Point2f) -> KeyPressEvent {
        let hit = self.pick(&screen);
        KeyPressEvent {
            key: key.into(),
            picked2d: screen,
            picked3d: hit.map(|(_, point)| point),
            actor: hit.map(|(id, _)| id),
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl Scene for SceneGraph {
    fn add(&mut self, object: SceneObject) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.insert(id, object);
        self.revision += 1;
        id
    }

    fn remove(&mut self, id: ObjectId) -> bool {
        let removed = self.objects.remove(&id).is_some();
        if removed {
            self.revision += 1;
        }
        removed
    }

    fn project_to_screen(&self, points: &[Point3f]) -> Vec<Point2f> {
        self.camera.world_to_screen(points, &self.viewport)
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
