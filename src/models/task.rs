use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Input structure for creating or updating a task.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The task's name. At most 100 characters.
    #[validate(length(max = 100, message = "name must be at most 100 characters"))]
    pub name: String,

    /// Whether the task is done. Defaults to `false` when omitted.
    #[serde(rename = "isComplete", default)]
    pub is_complete: bool,
}

/// A task as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Server-assigned identifier.
    pub id: i32,
    pub name: String,
    #[serde(rename = "isComplete")]
    pub is_complete: bool,
}

impl Task {
    /// Builds a task with the given id from client input.
    pub fn from_input(id: i32, input: TaskInput) -> Self {
        Self {
            id,
            name: input.name,
            is_complete: input.is_complete,
        }
    }
}
