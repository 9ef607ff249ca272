//! Core data structures and traits for meshpick
//!
//! This crate provides the fundamental types shared by the selectors:
//! points, point clouds, triangle meshes, uniform sampling grids and
//! the traits used to query them.

pub mod point;
pub mod point_cloud;
pub mod mesh;
pub mod grid;
pub mod traits;
pub mod error;

pub use point::*;
pub use point_cloud::*;
pub use mesh::*;
pub use grid::*;
pub use traits::*;
pub use error::*;
