//! Selector and window configuration, loadable from TOML

use crate::event::KeyBindings;
use crate::scene::Style;
use meshpick_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const INSTRUCTIONS_BACKGROUND: [f32; 3] = [0.0, 0.5, 0.0];

/// Window configuration for the interactive plotter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background_color: [f64; 4],
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "meshpick".to_string(),
            width: 1200,
            height: 800,
            background_color: [0.1, 0.1, 0.1, 1.0],
        }
    }
}

/// Grid point selector settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSelectorConfig {
    /// Lattice points per axis
    pub dim: usize,
    pub instructions_background: [f32; 3],
    pub keys: KeyBindings,
    pub mesh_style: Style,
    pub grid_style: Style,
    pub grid_point_style: Style,
    pub marker_style: Style,
    pub instructions_style: Style,
}

impl Default for GridSelectorConfig {
    fn default() -> Self {
        Self {
            dim: 4,
            keys: KeyBindings::grid_defaults(),
            mesh_style: Style::new([0.5, 0.5, 0.5]).with_opacity(0.5),
            grid_style: Style::new([0.0, 0.0, 0.0]).with_opacity(0.5),
            grid_point_style: Style::new([0.0, 0.0, 0.0]).with_point_size(10.0),
            marker_style: Style::new([1.0, 0.0, 0.0]).with_point_size(15.0),
            instructions_style: Style::new([1.0, 1.0, 1.0]),
            instructions_background: INSTRUCTIONS_BACKGROUND,
        }
    }
}

/// Landmark selector settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkSelectorConfig {
    pub instructions_background: [f32; 3],
    pub keys: KeyBindings,
    pub mesh_style: Style,
    pub marker_style: Style,
    pub instructions_style: Style,
}

impl Default for LandmarkSelectorConfig {
    fn default() -> Self {
        Self {
            keys: KeyBindings::landmark_defaults(),
            mesh_style: Style::new([0.85, 0.75, 0.55]).with_edges(true),
            marker_style: Style::new([1.0, 0.0, 0.0]).with_point_size(15.0),
            instructions_style: Style::new([1.0, 1.0, 1.0]),
            instructions_background: INSTRUCTIONS_BACKGROUND,
        }
    }
}

/// Everything a session can be configured with
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub window: WindowConfig,
    pub grid: GridSelectorConfig,
    pub landmarks: LandmarkSelectorConfig,
}

impl SelectorConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| Error::InvalidData(format!("invalid configuration: {}", e)))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::InvalidData(format!("cannot serialize configuration: {}", e)))
    }

    /// Read a TOML configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}
