use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use crate::domain::task::errors::TaskError;
use crate::domain::task::models::TaskId;
use crate::domain::task::models::TaskTitle;
use crate::domain::task::models::UpdateTaskCommand;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiJson;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::MessageResponseData;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// HTTP request body for updating a task (raw JSON)
///
/// Every field is required; an update replaces the whole task.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl UpdateTaskRequest {
    fn try_into_command(self) -> Result<UpdateTaskCommand, TaskError> {
        let title = TaskTitle::new(self.title.ok_or(TaskError::RequiredField("title"))?)?;
        let description = self
            .description
            .ok_or(TaskError::RequiredField("description"))?;
        let completed = self.completed.ok_or(TaskError::RequiredField("completed"))?;

        Ok(UpdateTaskCommand::new(title, description, completed))
    }
}

pub async fn update_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateTaskRequest>,
) -> Result<ApiSuccess<MessageResponseData>, ApiError> {
    // Parse task ID and request at HTTP boundary - errors automatically converted
    let task_id = id.parse::<TaskId>().map_err(TaskError::from)?;
    let command = req.try_into_command()?;

    state
        .task_service
        .update_task(user.user_id, task_id, command)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, MessageResponseData::new("task updated")))
}
