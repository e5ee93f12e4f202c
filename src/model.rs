//! Task, tag, and user records.
//!
//! Records serialize with camelCase field names so a stored collection reads
//! as `[{"id": .., "title": .., "completed": .., "tags": [..], "assignedUserId": ..}]`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the distinguished user that new tasks are assigned to.
pub const UNASSIGNED_USER_NAME: &str = "Unassigned";

/// Generate a fresh, collision-resistant entity id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub completed: bool,
    /// Tag ids in insertion order. The same id may appear more than once.
    #[serde(default)]
    pub tags: Vec<String>,
    pub assigned_user_id: String,
}

impl Task {
    /// A new, open, untagged task assigned to `assigned_user_id`.
    pub fn new(title: impl Into<String>, assigned_user_id: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            completed: false,
            tags: Vec::new(),
            assigned_user_id: assigned_user_id.into(),
        }
    }

    pub fn has_tag(&self, tag_id: &str) -> bool {
        self.tags.iter().any(|tag| tag == tag_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            color: color.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
        }
    }

    pub fn is_unassigned(&self) -> bool {
        self.name == UNASSIGNED_USER_NAME
    }
}
