use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::task::errors::TaskError;
use crate::domain::task::models::CreateTaskCommand;
use crate::domain::task::models::TaskTitle;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiJson;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn create_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(body): ApiJson<CreateTaskRequest>,
) -> Result<ApiSuccess<CreateTaskResponseData>, ApiError> {
    state
        .task_service
        .create_task(user.user_id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|id| ApiSuccess::new(StatusCode::OK, CreateTaskResponseData { id: id.as_i64() }))
}

/// HTTP request body for creating a task (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

impl CreateTaskRequest {
    fn try_into_command(self) -> Result<CreateTaskCommand, TaskError> {
        let title = TaskTitle::new(self.title)?;
        Ok(CreateTaskCommand::new(title, self.description))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTaskResponseData {
    pub id: i64,
}
