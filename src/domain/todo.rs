//! The todo item resource.

use serde::{Deserialize, Serialize};

/// A persisted todo item. `id` is assigned by the store and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoItem {
    pub id: i64,
    pub title: String,
    pub completed: bool,
}

/// Request body for create and update.
///
/// Any `id` sent by the client is ignored; the store or the path decides it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TodoInput {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl TodoInput {
    pub fn new(title: impl Into<String>, completed: bool) -> Self {
        TodoInput {
            title: title.into(),
            completed,
        }
    }
}
