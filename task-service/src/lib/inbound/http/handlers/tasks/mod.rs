pub mod create_task;
pub mod delete_task;
pub mod get_task;
pub mod list_tasks;
pub mod update_task;

pub use create_task::create_task;
pub use delete_task::delete_task;
pub use get_task::get_task;
pub use list_tasks::list_tasks;
pub use update_task::update_task;

use serde::Serialize;

use crate::domain::task::models::Task;

/// Client-facing view of a task. The owner is implied by the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskData {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub completed: bool,
}

impl From<&Task> for TaskData {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.as_i64(),
            title: task.title.as_str().to_string(),
            description: task.description.clone(),
            completed: task.completed,
        }
    }
}
