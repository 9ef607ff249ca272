//! Interactive point selection on 3D meshes
//!
//! This crate provides two selectors built on a small scene capability
//! interface:
//! - [`GridPointSelector`]: pick vertices of a uniform lattice laid over a mesh
//! - [`LandmarkSelector`]: pick mesh vertices or arbitrary surface points
//!
//! Selection logic only talks to the [`Scene`] and [`Interactive`] traits.
//! [`Plotter`] implements them with a winit window and a wgpu renderer;
//! [`HeadlessScene`] implements them without a display.

pub mod camera;
pub mod config;
pub mod event;
pub mod scene;
pub mod selection;
pub mod grid_selector;
pub mod landmark_selector;
pub mod headless;
pub mod plotter;
pub mod renderer;
pub mod shaders;

pub use camera::*;
pub use config::*;
pub use event::*;
pub use scene::*;
pub use selection::*;
pub use grid_selector::*;
pub use landmark_selector::*;
pub use headless::*;
pub use plotter::*;
