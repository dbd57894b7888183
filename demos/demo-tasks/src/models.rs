use garde::Validate;
use restkit::crud::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub done: bool,
}

impl Entity for Task {
    type Id = u64;

    fn table_name() -> &'static str {
        "tasks"
    }
    fn id_column() -> &'static str {
        "id"
    }
    fn columns() -> &'static [&'static str] {
        &["id", "title", "done"]
    }
    fn id(&self) -> &u64 {
        &self.id
    }
}

#[derive(Debug, Deserialize, Validate, schemars::JsonSchema)]
pub struct CreateTask {
    #[garde(length(min = 1, max = 200))]
    pub title: String,
    #[garde(skip)]
    #[serde(default)]
    pub done: bool,
}

#[derive(Debug, Deserialize, Validate, schemars::JsonSchema)]
pub struct UpdateTask {
    #[garde(length(min = 1, max = 200))]
    pub title: String,
    #[garde(skip)]
    pub done: bool,
}

/// Query-string filters for the task list.
#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct TaskFilter {
    /// Keep only tasks with this completion state.
    pub done: Option<bool>,
    /// Keep only tasks whose title contains this substring.
    pub q: Option<String>,
}

/// Published on the event bus when `create` stores a task. Emission happens
/// inside the operation, so a later rollback does not retract the event.
#[derive(Debug, Clone)]
pub struct TaskCreatedEvent {
    pub id: u64,
    pub title: String,
}
