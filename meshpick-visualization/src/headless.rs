//! A scene without a display, driven by a scripted sequence of key presses

use crate::camera::Viewport;
use crate::event::KeyPressEvent;
use crate::scene::{Interactive, ObjectId, Scene, SceneGraph, SceneObject};
use log::debug;
use meshpick_core::{Point2f, Point3f, Result};
use std::collections::VecDeque;

/// Where the cursor is when a scripted key is pressed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cursor {
    /// Screen position in pixels
    Screen(Point2f),
    /// World position, projected with the camera at the time of the press
    World(Point3f),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedKey {
    pub key: String,
    pub cursor: Cursor,
}

impl ScriptedKey {
    pub fn at_screen(key: impl Into<String>, screen: Point2f) -> Self {
        Self {
            key: key.into(),
            cursor: Cursor::Screen(screen),
        }
    }

    pub fn at_world(key: impl Into<String>, world: Point3f) -> Self {
        Self {
            key: key.into(),
            cursor: Cursor::World(world),
        }
    }
}

/// Offscreen [`Scene`] that replays queued key presses when shown.
///
/// The session ends once the script is exhausted or a handler closes the scene.
#[derive(Debug, Clone, Default)]
pub struct HeadlessScene {
    graph: SceneGraph,
    script: VecDeque<ScriptedKey>,
}

impl HeadlessScene {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            graph: SceneGraph::new(viewport),
            script: VecDeque::new(),
        }
    }

    pub fn with_script<I>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = ScriptedKey>,
    {
        self.script.extend(keys);
        self
    }

    pub fn push_key(&mut self, key: ScriptedKey) {
        self.script.push_back(key);
    }

    /// Key presses not yet replayed
    pub fn pending(&self) -> usize {
        self.script.len()
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    fn resolve(&self, cursor: Cursor) -> Point2f {
        match cursor {
            Cursor::Screen(screen) => screen,
            Cursor::World(world) => self.graph.project_to_screen(&[world])[0],
        }
    }
}

impl Scene for HeadlessScene {
    fn add(&mut self, object: SceneObject) -> ObjectId {
        self.graph.add(object)
    }

    fn remove(&mut self, id: ObjectId) -> bool {
        self.graph.remove(id)
    }

    fn project_to_screen(&self, points: &[Point3f]) -> Vec<Point2f> {
        self.graph.project_to_screen(points)
    }

    fn close(&mut self) {
        self.graph.close();
    }

    fn is_closed(&self) -> bool {
        self.graph.is_closed()
    }
}

impl Interactive for HeadlessScene {
    fn show<F>(&mut self, mut on_key_press: F) -> Result<()>
    where
        F: FnMut(&mut Self, &KeyPressEvent),
    {
        self.graph.fit_camera();
        while !self.is_closed() {
            let Some(scripted) = self.script.pop_front() else {
                break;
            };
            let screen = self.resolve(scripted.cursor);
            let event = self.graph.key_press(scripted.key, screen);
            debug!("replaying key {:?} at {:?}", event.key, event.picked2d);
            on_key_press(self, &event);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshpick_core::TriangleMesh;

    #[test]
    fn test_show_replays_until_closed() {
        let mut scene = HeadlessScene::default().with_script([
            ScriptedKey::at_screen("a", Point2f::origin()),
            ScriptedKey::at_screen("q", Point2f::origin()),
            ScriptedKey::at_screen("b", Point2f::origin()),
        ]);
        let mut seen = Vec::new();
        scene
            .show(|scene, event| {
                seen.push(event.key.clone());
                if event.key == "q" {
                    scene.close();
                }
            })
            .unwrap();

        assert_eq!(seen, vec!["a", "q"]);
        assert_eq!(scene.pending(), 1);
    }

    #[test]
    fn test_world_cursor_picks_mesh() {
        let mut scene = HeadlessScene::default();
        let cube = TriangleMesh::cuboid(Point3f::origin(), Point3f::new(1.0, 1.0, 1.0));
        let id = scene.add(SceneObject::mesh(cube).pickable(true));
        scene.push_key(ScriptedKey::at_world("z", Point3f::new(0.3, 0.6, 1.0)));

        let mut events = Vec::new();
        scene.show(|_, event| events.push(event.clone())).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].actor, Some(id));
        assert!(events[0].picked3d.is_some());
    }
}
