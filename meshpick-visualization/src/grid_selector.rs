//! Pick points from a uniform lattice laid over a mesh

use crate::config::GridSelectorConfig;
use crate::event::{KeyBindings, KeyPressEvent, SelectorAction};
use crate::scene::{Interactive, ObjectId, Scene, SceneObject, TextAnchor};
use crate::selection::Selection;
use log::{debug, info};
use meshpick_algorithms::nearest_screen_point;
use meshpick_core::{Point2f, Point3f, PointCloud3f, Result, TriangleMesh, UniformGrid};
use ndarray::Array2;

/// Displays a mesh with a `dim³` sampling lattice over its bounding box and
/// lets the user select lattice vertices.
///
/// A pick resolves to the lattice vertex whose screen projection is closest
/// to the cursor, so vertices hidden behind the mesh can still be chosen.
pub struct GridPointSelector<S> {
    scene: S,
    mesh: TriangleMesh,
    grid: UniformGrid,
    mesh_id: ObjectId,
    handler: GridHandler,
}

/// Key handling state, kept apart from the scene so both can be borrowed at once
struct GridHandler {
    candidates: PointCloud3f,
    selection: Selection,
    keys: KeyBindings,
}

impl<S: Scene> GridPointSelector<S> {
    /// Selector with default styling and key bindings
    pub fn new(mesh: &TriangleMesh, dim: usize, scene: S) -> Result<Self> {
        let config = GridSelectorConfig {
            dim,
            ..GridSelectorConfig::default()
        };
        Self::with_config(mesh, scene, &config)
    }

    /// Selector with lattice size, styling and key bindings taken from `config`
    pub fn with_config(mesh: &TriangleMesh, mut scene: S, config: &GridSelectorConfig) -> Result<Self> {
        mesh.validate()?;
        let mesh = mesh.clone();
        let grid = UniformGrid::over_mesh(&mesh, config.dim)?;
        let candidates = grid.points();

        let mesh_id = scene.add(
            SceneObject::mesh(mesh.clone())
                .styled(config.mesh_style)
                .pickable(false),
        );
        scene.add(
            SceneObject::wireframe(candidates.points.clone(), grid.edges())
                .styled(config.grid_style)
                .pickable(false),
        );
        scene.add(
            SceneObject::points(candidates.clone())
                .styled(config.grid_point_style)
                .pickable(false),
        );
        scene.add(
            SceneObject::text(
                config.keys.instructions(),
                TextAnchor::BottomLeft,
                config.instructions_background,
            )
            .styled(config.instructions_style),
        );

        debug!(
            "grid selector over {} vertices with a {}x{}x{} lattice",
            mesh.vertex_count(),
            grid.dim(),
            grid.dim(),
            grid.dim()
        );

        Ok(Self {
            scene,
            mesh,
            grid,
            mesh_id,
            handler: GridHandler {
                candidates,
                selection: Selection::new(config.marker_style),
                keys: config.keys.clone(),
            },
        })
    }

    /// React to one key press
    pub fn handle_key_press(&mut self, event: &KeyPressEvent) {
        self.handler.handle(&mut self.scene, event);
    }

    /// Snapshot of the selected points as an `n × 3` array
    pub fn points(&self) -> Array2<f32> {
        self.handler.selection.to_array()
    }

    /// Selected lattice vertices, oldest first
    pub fn selection(&self) -> &[Point3f] {
        self.handler.selection.points()
    }

    /// The selector's own copy of the mesh
    pub fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    /// Scene handle of the displayed mesh
    pub fn mesh_id(&self) -> ObjectId {
        self.mesh_id
    }

    /// The sampling lattice
    pub fn grid(&self) -> &UniformGrid {
        &self.grid
    }

    /// Lattice vertices in enumeration order
    pub fn grid_points(&self) -> &PointCloud3f {
        &self.handler.candidates
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

impl<S: Interactive> GridPointSelector<S> {
    /// Run the interactive session until it ends, then hand the selector back
    pub fn start(mut self) -> Result<Self> {
        info!("grid selection started");
        let handler = &mut self.handler;
        self.scene.show(|scene, event| handler.handle(scene, event))?;
        info!("grid selection finished with {} points", self.handler.selection.len());
        Ok(self)
    }
}

impl GridHandler {
    fn handle<S: Scene>(&mut self, scene: &mut S, event: &KeyPressEvent) {
        match self.keys.action_for(&event.key) {
            Some(SelectorAction::AddGridPoint) => self.add_nearest(scene, &event.picked2d),
            Some(SelectorAction::DeleteLast) => {
                self.selection.pop(scene);
            }
            Some(SelectorAction::Quit) => scene.close(),
            Some(action) => debug!("{:?} does not apply to grid selection", action),
            None => {}
        }
    }

    fn add_nearest<S: Scene>(&mut self, scene: &mut S, cursor: &Point2f) {
        let on_screen = scene.project_to_screen(self.candidates.as_slice());
        match nearest_screen_point(&on_screen, cursor) {
            Some(index) => self.selection.push(scene, self.candidates[index]),
            None => debug!("no grid point visible near {:?}", cursor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{ObjectKind, SceneGraph};

    fn unit_cube() -> TriangleMesh {
        TriangleMesh::cuboid(Point3f::origin(), Point3f::new(1.0, 1.0, 1.0))
    }

    fn selector(dim: usize) -> GridPointSelector<SceneGraph> {
        let mut selector = GridPointSelector::new(&unit_cube(), dim, SceneGraph::default()).unwrap();
        selector.scene_mut().fit_camera();
        selector
    }

    fn press_at(selector: &mut GridPointSelector<SceneGraph>, key: &str, world: Point3f) {
        let screen = selector.scene().project_to_screen(&[world])[0];
        selector.handle_key_press(&KeyPressEvent::at_screen(key, screen));
    }

    #[test]
    fn test_scene_composition() {
        let selector = selector(3);
        let kinds: Vec<&ObjectKind> = selector.scene().iter().map(|(_, o)| &o.kind).collect();
        assert_eq!(kinds.len(), 4);
        assert!(matches!(kinds[0], ObjectKind::Mesh(_)));
        assert!(matches!(kinds[1], ObjectKind::Wireframe { edges, .. } if edges.len() == 54));
        assert!(matches!(kinds[2], ObjectKind::Points(p) if p.len() == 27));
        assert!(matches!(kinds[3], ObjectKind::Text { text, .. } if text.contains("Press z")));
        assert!(selector.scene().iter().all(|(_, o)| !o.pickable));
    }

    #[test]
    fn test_add_selects_grid_vertex_under_cursor() {
        let mut selector = selector(4);
        let target = selector.grid().point(3, 3, 3);
        press_at(&mut selector, "z", target);
        assert_eq!(selector.selection(), &[target]);
    }

    #[test]
    fn test_add_minimizes_screen_distance() {
        let mut selector = selector(4);
        let cursor = Point2f::new(517.0, 333.0);
        selector.handle_key_press(&KeyPressEvent::at_screen("z", cursor));

        let projected = selector.scene().project_to_screen(selector.grid_points().as_slice());
        let chosen = selector.selection()[0];
        let chosen_distance = projected
            .iter()
            .zip(selector.grid_points())
            .find(|(_, p)| **p == chosen)
            .map(|(s, _)| nalgebra::distance(s, &cursor))
            .unwrap();
        assert!(projected.iter().all(|s| nalgebra::distance(s, &cursor) >= chosen_distance));
    }

    #[test]
    fn test_delete_pops_last() {
        let mut selector = selector(4);
        let a = selector.grid().point(0, 0, 3);
        let b = selector.grid().point(3, 0, 3);
        press_at(&mut selector, "z", a);
        press_at(&mut selector, "z", b);
        selector.handle_key_press(&KeyPressEvent::at_screen("d", Point2f::origin()));
        assert_eq!(selector.selection(), &[a]);
        // mesh, wireframe, lattice points, text and one marker
        assert_eq!(selector.scene().len(), 5);
    }

    #[test]
    fn test_delete_on_empty_is_noop() {
        let mut selector = selector(2);
        let revision = selector.scene().revision();
        selector.handle_key_press(&KeyPressEvent::at_screen("d", Point2f::origin()));
        assert!(selector.selection().is_empty());
        assert_eq!(selector.scene().revision(), revision);
        assert_eq!(selector.points().shape(), &[0, 3]);
    }

    #[test]
    fn test_quit_and_unbound_keys() {
        let mut selector = selector(2);
        selector.handle_key_press(&KeyPressEvent::at_screen("x", Point2f::origin()));
        selector.handle_key_press(&KeyPressEvent::at_screen("e", Point2f::origin()));
        assert!(!selector.scene().is_closed());
        assert!(selector.selection().is_empty());

        selector.handle_key_press(&KeyPressEvent::at_screen("q", Point2f::origin()));
        assert!(selector.scene().is_closed());
    }

    #[test]
    fn test_mesh_is_copied() {
        let mut mesh = unit_cube();
        let selector = GridPointSelector::new(&mesh, 2, SceneGraph::default()).unwrap();
        mesh.vertices[0] = Point3f::new(-5.0, -5.0, -5.0);
        assert_eq!(selector.mesh(), &unit_cube());
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(GridPointSelector::new(&unit_cube(), 1, SceneGraph::default()).is_err());
        assert!(GridPointSelector::new(&TriangleMesh::new(), 4, SceneGraph::default()).is_err());
    }

    #[test]
    fn test_rejects_oversized_lattice() {
        let config = GridSelectorConfig {
            dim: 3_000_000,
            ..GridSelectorConfig::default()
        };
        assert!(GridPointSelector::with_config(&unit_cube(), SceneGraph::default(), &config).is_err());
    }
}
