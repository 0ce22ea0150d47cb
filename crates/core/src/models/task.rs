use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::Record;

/// A to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_completed: bool,
}

impl Task {
    /// Creates a new active task with a random ID.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            is_completed: false,
        }
    }

    /// Sets a specific ID for this task (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn completed(mut self) -> Self {
        self.is_completed = true;
        self
    }

    pub fn activated(mut self) -> Self {
        self.is_completed = false;
        self
    }

    /// Title shown in lists, falling back to the description when the title is empty.
    pub fn title_for_list(&self) -> &str {
        if self.title.is_empty() {
            &self.description
        } else {
            &self.title
        }
    }

    pub fn is_active(&self) -> bool {
        !self.is_completed
    }
}

impl Record for Task {
    type Key = Uuid;
    const COLLECTION: &'static str = "tasks";

    fn key(&self) -> Uuid {
        self.id
    }

    fn group(&self) -> Option<String> {
        Some(if self.is_completed { "completed" } else { "active" }.to_string())
    }

    fn display_name(&self) -> String {
        self.title_for_list().to_string()
    }
}
