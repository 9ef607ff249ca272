//! Windowed scene backend
//!
//! The [`Plotter`] owns a [`SceneGraph`] and shows it in a winit window drawn
//! by the [`SceneRenderer`]. Mouse input moves the camera, key presses are
//! turned into [`KeyPressEvent`]s for the selector.

use crate::camera::Viewport;
use crate::config::WindowConfig;
use crate::event::KeyPressEvent;
use crate::renderer::SceneRenderer;
use crate::scene::{Interactive, ObjectId, Scene, SceneGraph, SceneObject};
use log::{debug, info, warn};
use meshpick_core::{Error, Point2f, Point3f, Result};
use std::sync::Arc;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    platform::run_on_demand::EventLoopExtRunOnDemand,
    window::WindowBuilder,
};

const ORBIT_SPEED: f32 = 0.01;
const PAN_SPEED: f32 = 0.002;
const ZOOM_SPEED: f32 = 0.1;

/// Mouse state between cursor events
#[derive(Debug, Default)]
struct MouseState {
    left: bool,
    right: bool,
    last: Option<PhysicalPosition<f64>>,
}

/// Interactive window showing a scene.
///
/// The event loop is created on the first [`Interactive::show`] and reused by
/// later sessions; the window and GPU resources live only while `show` runs.
pub struct Plotter {
    graph: SceneGraph,
    config: WindowConfig,
    event_loop: Option<EventLoop<()>>,
}

impl Plotter {
    pub fn new(config: WindowConfig) -> Self {
        let viewport = Viewport::new(config.width as f32, config.height as f32);
        Self {
            graph: SceneGraph::new(viewport),
            config,
            event_loop: None,
        }
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }
}

impl Default for Plotter {
    fn default() -> Self {
        Self::new(WindowConfig::default())
    }
}

impl Scene for Plotter {
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

impl Interactive for Plotter {
    fn show<F>(&mut self, mut on_key_press: F) -> Result<()>
    where
        F: FnMut(&mut Self, &KeyPressEvent),
    {
        if self.is_closed() {
            return Ok(());
        }

        let mut event_loop = match self.event_loop.take() {
            Some(event_loop) => event_loop,
            None => EventLoop::new()
                .map_err(|e| Error::Visualization(format!("Failed to create event loop: {}", e)))?,
        };

        let window = Arc::new(
            WindowBuilder::new()
                .with_title(self.config.title.as_str())
                .with_inner_size(winit::dpi::LogicalSize::new(self.config.width, self.config.height))
                .build(&event_loop)
                .map_err(|e| Error::Visualization(format!("Failed to create window: {}", e)))?,
        );
        let mut renderer = pollster::block_on(SceneRenderer::new(window.clone(), self.config.background_color))?;

        let size = window.inner_size();
        self.graph
            .set_viewport(Viewport::new(size.width as f32, size.height as f32));
        self.graph.fit_camera();
        info!("window opened at {}x{}", size.width, size.height);

        let mut mouse = MouseState::default();
        let mut cursor = Point2f::origin();

        let result = event_loop.run_on_demand(|event, target| {
            target.set_control_flow(ControlFlow::Wait);

            let Event::WindowEvent { event, .. } = event else {
                return;
            };
            renderer.on_window_event(&window, &event);

            match event {
                WindowEvent::CloseRequested => target.exit(),
                WindowEvent::Resized(new_size) => {
                    renderer.resize(new_size);
                    self.graph
                        .set_viewport(Viewport::new(new_size.width as f32, new_size.height as f32));
                    window.request_redraw();
                }
                WindowEvent::MouseInput { state, button, .. } => match button {
                    MouseButton::Left => mouse.left = state == ElementState::Pressed,
                    MouseButton::Right => mouse.right = state == ElementState::Pressed,
                    _ => {}
                },
                WindowEvent::CursorMoved { position, .. } => {
                    if let Some(last) = mouse.last {
                        let dx = (position.x - last.x) as f32;
                        let dy = (position.y - last.y) as f32;
                        let camera = self.graph.camera_mut();
                        if mouse.left {
                            camera.orbit(dx * ORBIT_SPEED, dy * ORBIT_SPEED);
                            window.request_redraw();
                        } else if mouse.right {
                            camera.pan(dx * PAN_SPEED, dy * PAN_SPEED);
                            window.request_redraw();
                        }
                    }
                    mouse.last = Some(position);
                    cursor = Point2f::new(position.x as f32, position.y as f32);
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    let scroll = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y,
                        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                    };
                    self.graph.camera_mut().zoom(scroll * ZOOM_SPEED);
                    window.request_redraw();
                }
                WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                    match &event.logical_key {
                        Key::Named(NamedKey::Escape) => target.exit(),
                        Key::Character(key) => {
                            let press = self.graph.key_press(key.as_str(), cursor);
                            debug!("key {:?} at {:?}", press.key, press.picked2d);
                            on_key_press(self, &press);
                            window.request_redraw();
                        }
                        _ => {}
                    }
                }
                WindowEvent::RedrawRequested => {
                    if let Err(e) = renderer.render(&self.graph, &window) {
                        warn!("render error: {}", e);
                    }
                }
                _ => {}
            }

            if self.graph.is_closed() {
                target.exit();
            }
        });

        self.event_loop = Some(event_loop);
        result.map_err(|e| Error::Visualization(format!("Event loop error: {}", e)))?;
        info!("window closed");
        Ok(())
    }
}
