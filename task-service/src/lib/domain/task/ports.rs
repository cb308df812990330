use async_trait::async_trait;

use crate::domain::task::errors::TaskError;
use crate::domain::task::models::CreateTaskCommand;
use crate::domain::task::models::Task;
use crate::domain::task::models::TaskId;
use crate::domain::task::models::UpdateTaskCommand;
use crate::domain::user::models::UserId;

/// Port for task domain service operations.
///
/// Every operation takes the authenticated owner as its first argument.
/// A task owned by another user behaves exactly as if it did not exist.
#[async_trait]
pub trait TaskServicePort: Send + Sync + 'static {
    /// Create a task owned by `owner_id`.
    ///
    /// # Returns
    /// Identifier of the new task
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create_task(
        &self,
        owner_id: UserId,
        command: CreateTaskCommand,
    ) -> Result<TaskId, TaskError>;

    /// Replace title, description and completion flag of an owned task.
    ///
    /// # Errors
    /// * `TaskNotFound` - No task with this id belongs to `owner_id`
    /// * `DatabaseError` - Database operation failed
    async fn update_task(
        &self,
        owner_id: UserId,
        id: TaskId,
        command: UpdateTaskCommand,
    ) -> Result<(), TaskError>;

    /// Delete an owned task.
    ///
    /// # Errors
    /// * `TaskNotFound` - No task with this id belongs to `owner_id`
    /// * `DatabaseError` - Database operation failed
    async fn delete_task(&self, owner_id: UserId, id: TaskId) -> Result<(), TaskError>;

    /// Retrieve an owned task.
    ///
    /// # Errors
    /// * `TaskNotFound` - No task with this id belongs to `owner_id`
    /// * `DatabaseError` - Database operation failed
    async fn get_task(&self, owner_id: UserId, id: TaskId) -> Result<Task, TaskError>;

    /// List every task of `owner_id`; empty when there are none.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_tasks(&self, owner_id: UserId) -> Result<Vec<Task>, TaskError>;
}

/// Persistence operations for task aggregate.
///
/// Implementations must scope every statement by owner in the query itself
/// (`WHERE id = $1 AND owner_id = $2`), never by fetching first and
/// filtering afterwards.
#[async_trait]
pub trait TaskRepository: Send + Sync + 'static {
    /// Persist a new task for `owner_id` and assign its id.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, owner_id: UserId, command: CreateTaskCommand)
        -> Result<Task, TaskError>;

    /// Update the task matching both `id` and `owner_id`.
    ///
    /// # Errors
    /// * `TaskNotFound` - No row matched
    /// * `DatabaseError` - Database operation failed
    async fn update(
        &self,
        owner_id: UserId,
        id: TaskId,
        command: UpdateTaskCommand,
    ) -> Result<(), TaskError>;

    /// Delete the task matching both `id` and `owner_id`.
    ///
    /// # Errors
    /// * `TaskNotFound` - No row matched
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, owner_id: UserId, id: TaskId) -> Result<(), TaskError>;

    /// Retrieve the task matching both `id` and `owner_id`.
    ///
    /// # Returns
    /// Optional task entity (None if not found or not owned)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, owner_id: UserId, id: TaskId) -> Result<Option<Task>, TaskError>;

    /// Retrieve all tasks of `owner_id`, ordered by id.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_all(&self, owner_id: UserId) -> Result<Vec<Task>, TaskError>;
}
