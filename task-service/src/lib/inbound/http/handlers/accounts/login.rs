use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::TokenResponseData;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::Username;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiJson;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Exchange credentials for a session token.
///
/// A username that could never have been registered fails exactly like a
/// wrong password.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    let username = Username::new(body.username).map_err(|_| UserError::InvalidLogin)?;

    let user_id = state
        .auth_service
        .login(LoginCommand::new(username, body.password))
        .await?;

    let token = state
        .authenticator
        .issue_token(user_id.as_i64())
        .map_err(|e| ApiError::InternalServerError(format!("Token generation failed: {}", e)))?;

    Ok(ApiSuccess::new(StatusCode::OK, TokenResponseData { token }))
}

/// HTTP request body for login (raw JSON)
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}
