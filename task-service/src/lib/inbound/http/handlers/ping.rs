use axum::http::StatusCode;

use super::ApiSuccess;
use super::MessageResponseData;

/// Liveness probe; needs no token and touches no storage.
pub async fn ping() -> ApiSuccess<MessageResponseData> {
    ApiSuccess::new(StatusCode::OK, MessageResponseData::new("pong"))
}
