//! Pick landmark points on mesh vertices or anywhere on the surface

use crate::config::LandmarkSelectorConfig;
use crate::event::{KeyBindings, KeyPressEvent, SelectorAction};
use crate::scene::{Interactive, ObjectId, Scene, SceneObject, TextAnchor};
use crate::selection::Selection;
use log::{debug, info};
use meshpick_algorithms::{closest_point_on_mesh, SpatialIndex};
use meshpick_core::{NearestNeighborSearch, Point3f, Result, TriangleMesh};
use ndarray::Array2;

/// Displays a pickable mesh and lets the user select landmarks on it.
///
/// A landmark is either the mesh vertex nearest the picked surface point or
/// the closest point on the surface itself, depending on the key pressed.
pub struct LandmarkSelector<S> {
    scene: S,
    handler: LandmarkHandler,
}

/// Key handling state, kept apart from the scene so both can be borrowed at once
struct LandmarkHandler {
    mesh: TriangleMesh,
    mesh_id: ObjectId,
    vertices: SpatialIndex,
    selection: Selection,
    keys: KeyBindings,
}

impl<S: Scene> LandmarkSelector<S> {
    /// Selector with default styling and key bindings
    pub fn new(mesh: &TriangleMesh, scene: S) -> Result<Self> {
        Self::with_config(mesh, scene, &LandmarkSelectorConfig::default())
    }

    /// Selector with styling and key bindings taken from `config`
    pub fn with_config(mesh: &TriangleMesh, mut scene: S, config: &LandmarkSelectorConfig) -> Result<Self> {
        mesh.validate()?;
        let mesh = mesh.clone();
        let vertices = SpatialIndex::new(&mesh.vertices);

        let mesh_id = scene.add(
            SceneObject::mesh(mesh.clone())
                .styled(config.mesh_style)
                .pickable(true),
        );

        let mut instructions = config.keys.instructions();
        if !config.keys.binds(SelectorAction::Quit) {
            instructions.push_str("\nClose the window to finish");
        }
        scene.add(
            SceneObject::text(instructions, TextAnchor::BottomLeft, config.instructions_background)
                .styled(config.instructions_style),
        );

        Ok(Self {
            scene,
            handler: LandmarkHandler {
                mesh,
                mesh_id,
                vertices,
                selection: Selection::new(config.marker_style),
                keys: config.keys.clone(),
            },
        })
    }

    /// React to one key press
    pub fn handle_key_press(&mut self, event: &KeyPressEvent) {
        self.handler.handle(&mut self.scene, event);
    }

    /// Snapshot of the selected landmarks as an `n × 3` array
    pub fn points(&self) -> Array2<f32> {
        self.handler.selection.to_array()
    }

    /// Selected landmarks, oldest first
    pub fn selection(&self) -> &[Point3f] {
        self.handler.selection.points()
    }

    /// The selector's own copy of the mesh
    pub fn mesh(&self) -> &TriangleMesh {
        &self.handler.mesh
    }

    /// Scene handle of the pickable mesh
    pub fn mesh_id(&self) -> ObjectId {
        self.handler.mesh_id
    }

    /// The scene the selector draws into
    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Mutable access to the scene, e.g. to move the camera
    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }
}

impl<S: Interactive> LandmarkSelector<S> {
    /// Run the interactive session until it ends, then hand the selector back
    pub fn start(mut self) -> Result<Self> {
        info!("landmark selection started");
        let handler = &mut self.handler;
        self.scene.show(|scene, event| handler.handle(scene, event))?;
        info!("landmark selection finished with {} points", self.handler.selection.len());
        Ok(self)
    }
}

impl LandmarkHandler {
    fn handle<S: Scene>(&mut self, scene: &mut S, event: &KeyPressEvent) {
        let Some(action) = self.keys.action_for(&event.key) else {
            return;
        };
        match action {
            SelectorAction::AddVertexPoint | SelectorAction::AddSurfacePoint => {
                if let Some(point) = self.resolve(action, event) {
                    self.selection.push(scene, point);
                }
            }
            SelectorAction::DeleteLast => {
                self.selection.pop(scene);
            }
            SelectorAction::Quit => scene.close(),
            SelectorAction::AddGridPoint => debug!("{:?} does not apply to landmark selection", action),
        }
    }

    /// Landmark for an add action, if the cursor is over the mesh
    fn resolve(&self, action: SelectorAction, event: &KeyPressEvent) -> Option<Point3f> {
        if event.actor != Some(self.mesh_id) {
            debug!("{:?} ignored: cursor is not over the mesh", action);
            return None;
        }
        let picked = event.picked3d?;
        match action {
            SelectorAction::AddVertexPoint => self
                .vertices
                .find_nearest(&picked)
                .map(|(index, _)| self.mesh.vertices[index]),
            _ => closest_point_on_mesh(&self.mesh, &picked).map(|hit| hit.point),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneGraph;
    use approx::assert_relative_eq;
    use meshpick_core::Point2f;

    fn unit_cube() -> TriangleMesh {
        TriangleMesh::cuboid(Point3f::origin(), Point3f::new(1.0, 1.0, 1.0))
    }

    fn selector() -> LandmarkSelector<SceneGraph> {
        let mut selector = LandmarkSelector::new(&unit_cube(), SceneGraph::default()).unwrap();
        selector.scene_mut().fit_camera();
        selector
    }

    fn press_at(selector: &mut LandmarkSelector<SceneGraph>, key: &str, world: Point3f) {
        let scene = selector.scene();
        let screen = scene.project_to_screen(&[world])[0];
        let event = scene.key_press(key, screen);
        selector.handle_key_press(&event);
    }

    #[test]
    fn test_add_vertex_snaps_to_vertex() {
        let mut selector = selector();
        press_at(&mut selector, "z", Point3f::new(0.9, 0.8, 1.0));
        assert_eq!(selector.selection(), &[Point3f::new(1.0, 1.0, 1.0)]);
        assert!(selector.mesh().vertices.contains(&selector.selection()[0]));
    }

    #[test]
    fn test_add_surface_stays_on_surface() {
        let mut selector = selector();
        press_at(&mut selector, "e", Point3f::new(0.3, 0.6, 1.0));
        let point = selector.selection()[0];
        assert_relative_eq!(point, Point3f::new(0.3, 0.6, 1.0), epsilon = 1e-3);
        assert!(!selector.mesh().vertices.contains(&point));
    }

    #[test]
    fn test_add_outside_mesh_is_ignored() {
        let mut selector = selector();
        let event = selector.scene().key_press("z", Point2f::new(2.0, 2.0));
        selector.handle_key_press(&event);
        assert!(selector.selection().is_empty());

        // An event claiming another actor is ignored too
        let mut foreign = KeyPressEvent::at_screen("e", Point2f::origin());
        foreign.picked3d = Some(Point3f::new(0.5, 0.5, 1.0));
        selector.handle_key_press(&foreign);
        assert!(selector.selection().is_empty());
    }

    #[test]
    fn test_delete_keeps_order_and_camera() {
        let mut selector = selector();
        press_at(&mut selector, "z", Point3f::new(0.1, 0.1, 1.0));
        press_at(&mut selector, "e", Point3f::new(0.4, 0.7, 1.0));
        press_at(&mut selector, "z", Point3f::new(0.9, 0.1, 1.0));
        let first_two = selector.selection()[..2].to_vec();
        let camera_before = selector.scene().camera().position;

        // Delete applies wherever the cursor is
        selector.handle_key_press(&KeyPressEvent::at_screen("d", Point2f::origin()));
        assert_eq!(selector.selection(), first_two.as_slice());
        assert_eq!(selector.scene().camera().position, camera_before);

        selector.handle_key_press(&KeyPressEvent::at_screen("d", Point2f::origin()));
        selector.handle_key_press(&KeyPressEvent::at_screen("d", Point2f::origin()));
        selector.handle_key_press(&KeyPressEvent::at_screen("d", Point2f::origin()));
        assert!(selector.selection().is_empty());
        // mesh and instructions only
        assert_eq!(selector.scene().len(), 2);
    }

    #[test]
    fn test_no_default_quit_but_configurable() {
        let mut selector = selector();
        selector.handle_key_press(&KeyPressEvent::at_screen("q", Point2f::origin()));
        assert!(!selector.scene().is_closed());

        let config = LandmarkSelectorConfig {
            keys: KeyBindings::landmark_defaults().bind("q", SelectorAction::Quit),
            ..LandmarkSelectorConfig::default()
        };
        let mut selector = LandmarkSelector::with_config(&unit_cube(), SceneGraph::default(), &config).unwrap();
        selector.handle_key_press(&KeyPressEvent::at_screen("q", Point2f::origin()));
        assert!(selector.scene().is_closed());
    }
}
