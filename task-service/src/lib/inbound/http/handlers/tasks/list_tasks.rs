use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::TaskData;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<ListTasksResponseData>, ApiError> {
    let tasks = state.task_service.list_tasks(user.user_id).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ListTasksResponseData {
            tasks: tasks.iter().map(TaskData::from).collect(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListTasksResponseData {
    pub tasks: Vec<TaskData>,
}
