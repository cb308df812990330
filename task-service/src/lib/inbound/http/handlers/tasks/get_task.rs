use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::TaskData;
use crate::domain::task::errors::TaskError;
use crate::domain::task::models::TaskId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn get_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<GetTaskResponseData>, ApiError> {
    let task_id = id.parse::<TaskId>().map_err(TaskError::from)?;

    state
        .task_service
        .get_task(user.user_id, task_id)
        .await
        .map_err(ApiError::from)
        .map(|ref task| {
            ApiSuccess::new(
                StatusCode::OK,
                GetTaskResponseData { task: task.into() },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetTaskResponseData {
    pub task: TaskData,
}
