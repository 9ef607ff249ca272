//! Key press events and the actions they trigger

use crate::scene::ObjectId;
use meshpick_core::{Point2f, Point3f};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A key press delivered by a scene backend, with what was under the cursor
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPressEvent {
    /// The key as typed, e.g. `"z"`, or a named key such as `"Escape"`
    pub key: String,
    /// Cursor position in screen pixels
    pub picked2d: Point2f,
    /// World position under the cursor, if a pickable object was hit
    pub picked3d: Option<Point3f>,
    /// Pickable object under the cursor
    pub actor: Option<ObjectId>,
}

impl KeyPressEvent {
    /// Event with nothing under the cursor
    pub fn at_screen(key: impl Into<String>, picked2d: Point2f) -> Self {
        Self {
            key: key.into(),
            picked2d,
            picked3d: None,
            actor: None,
        }
    }
}

/// What a selector does in response to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorAction {
    AddGridPoint,
    AddVertexPoint,
    AddSurfacePoint,
    DeleteLast,
    Quit,
}

impl SelectorAction {
    pub fn describe(self) -> &'static str {
        match self {
            SelectorAction::AddGridPoint => "add a point",
            SelectorAction::AddVertexPoint => "add a vertex",
            SelectorAction::AddSurfacePoint => "add a point on the surface",
            SelectorAction::DeleteLast => "delete the last point",
            SelectorAction::Quit => "quit",
        }
    }
}

/// Key to action table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings(BTreeMap<String, SelectorAction>);

impl KeyBindings {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// `z` adds the nearest grid point, `d` deletes, `q` quits
    pub fn grid_defaults() -> Self {
        Self::new()
            .bind("z", SelectorAction::AddGridPoint)
            .bind("d", SelectorAction::DeleteLast)
            .bind("q", SelectorAction::Quit)
    }

    /// `z` adds the nearest vertex, `e` the nearest surface point, `d` deletes
    pub fn landmark_defaults() -> Self {
        Self::new()
            .bind("z", SelectorAction::AddVertexPoint)
            .bind("e", SelectorAction::AddSurfacePoint)
            .bind("d", SelectorAction::DeleteLast)
    }

    /// Bind `key` to `action`, replacing any previous binding of that key
    pub fn bind(mut self, key: impl Into<String>, action: SelectorAction) -> Self {
        self.0.insert(key.into(), action);
        self
    }

    pub fn action_for(&self, key: &str) -> Option<SelectorAction> {
        self.0.get(key).copied()
    }

    pub fn binds(&self, action: SelectorAction) -> bool {
        self.0.values().any(|bound| *bound == action)
    }

    /// One "Press <key> to <action>" line per binding, ordered by action
    pub fn instructions(&self) -> String {
        let mut lines: Vec<(SelectorAction, &str)> =
            self.0.iter().map(|(key, action)| (*action, key.as_str())).collect();
        lines.sort();
        lines
            .iter()
            .map(|(action, key)| format!("Press {} to {}", key, action.describe()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}
