use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::task::errors::TaskError;
use crate::domain::task::models::CreateTaskCommand;
use crate::domain::task::models::Task;
use crate::domain::task::models::TaskId;
use crate::domain::task::models::UpdateTaskCommand;
use crate::domain::task::ports::TaskRepository;
use crate::domain::task::ports::TaskServicePort;
use crate::domain::user::models::UserId;

/// Domain service implementation for task operations.
pub struct TaskService<TR>
where
    TR: TaskRepository,
{
    repository: Arc<TR>,
}

impl<TR> TaskService<TR>
where
    TR: TaskRepository,
{
    /// Create a new task service.
    ///
    /// # Arguments
    /// * `repository` - Task persistence implementation
    pub fn new(repository: Arc<TR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<TR> TaskServicePort for TaskService<TR>
where
    TR: TaskRepository,
{
    #[tracing::instrument(skip(self, command), fields(user_id = %owner_id))]
    async fn create_task(
        &self,
        owner_id: UserId,
        command: CreateTaskCommand,
    ) -> Result<TaskId, TaskError> {
        let task = self.repository.create(owner_id, command).await?;

        tracing::info!(task_id = %task.id, "Task created");
        Ok(task.id)
    }

    #[tracing::instrument(skip(self, command), fields(user_id = %owner_id, task_id = %id))]
    async fn update_task(
        &self,
        owner_id: UserId,
        id: TaskId,
        command: UpdateTaskCommand,
    ) -> Result<(), TaskError> {
        self.repository.update(owner_id, id, command).await?;

        tracing::info!("Task updated");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(user_id = %owner_id, task_id = %id))]
    async fn delete_task(&self, owner_id: UserId, id: TaskId) -> Result<(), TaskError> {
        self.repository.delete(owner_id, id).await?;

        tracing::info!("Task deleted");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(user_id = %owner_id, task_id = %id))]
    async fn get_task(&self, owner_id: UserId, id: TaskId) -> Result<Task, TaskError> {
        self.repository
            .find_by_id(owner_id, id)
            .await?
            .ok_or(TaskError::TaskNotFound)
    }

    #[tracing::instrument(skip(self), fields(user_id = %owner_id))]
    async fn list_tasks(&self, owner_id: UserId) -> Result<Vec<Task>, TaskError> {
        self.repository.find_all(owner_id).await
    }
}
