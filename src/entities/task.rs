//! Task list entries

use serde::{Deserialize, Serialize};

use crate::core::entity::Resource;

/// One task, as served by `GET /api/tasks`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
}

impl Resource for Task {
    fn collection_path() -> &'static str {
        "/api/tasks"
    }

    fn resource_name() -> &'static str {
        "tasks"
    }

    fn id(&self) -> Option<&str> {
        Some(&self.id)
    }
}
