//! # meshpick algorithms
//!
//! Geometric queries behind point picking: nearest-neighbor search over
//! candidate sets, closest points on triangle meshes and ray casting.

pub mod nearest_neighbor;
pub mod surface;
pub mod picking;

// Re-export commonly used items
pub use nearest_neighbor::*;
pub use surface::*;
pub use picking::*;
